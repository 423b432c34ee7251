use glam::Vec2;
use hecs::{Entity, World};
use tracing::{debug, info};

use crate::components::{despawn_recursive, find_in_children, AvatarAspect, BarrageAspect, BlastAspect};
use crate::engine::input::{ActionBus, ActionTrigger, InputSource, Subscription};
use crate::error::ControlError;
use crate::fsm::{AspectCtx, StateId, StateMachine};
use crate::scene::{manifest_avatar, AvatarKind, AvatarRoster};
use crate::systems::guards::{self, GuardFlags, JumpOutcome};
use crate::systems::{aim_vector, StateSet};

/// Signals for the feedback collaborator (audio, rumble).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Feedback {
    /// The action's guard failed; nothing changed.
    Rejected(ActionTrigger),
}

/// Entity handles of the three aspects the controller drives.
#[derive(Clone, Copy, Debug)]
struct AspectHandles {
    avatar: Entity,
    barrage: Entity,
    blast: Entity,
}

impl AspectHandles {
    /// Borrow all three aspects for the duration of `f`.
    fn with<R>(&self, world: &World, f: impl FnOnce(&mut AspectCtx) -> R) -> Result<R, ControlError> {
        let mut avatar = world.get::<&mut AvatarAspect>(self.avatar)?;
        let mut barrage = world.get::<&mut BarrageAspect>(self.barrage)?;
        let mut blast = world.get::<&mut BlastAspect>(self.blast)?;
        let mut ctx = AspectCtx {
            avatar: &mut *avatar,
            barrage: &mut *barrage,
            blast: &mut *blast,
        };
        Ok(f(&mut ctx))
    }

    fn guard_flags(&self, world: &World, current: StateId) -> Result<GuardFlags, ControlError> {
        let avatar = world.get::<&AvatarAspect>(self.avatar)?;
        let barrage = world.get::<&BarrageAspect>(self.barrage)?;
        let blast = world.get::<&BlastAspect>(self.blast)?;
        Ok(GuardFlags::snapshot(current, &avatar, &barrage, &blast))
    }
}

/// Drives the avatar's state machine from tick updates and action triggers.
pub struct PlayerController {
    handles: AspectHandles,
    target: Option<Entity>,
    states: StateSet,
    fsm: StateMachine,
    aiming: bool,
    feedback: Vec<Feedback>,
    subscriptions: Option<Vec<Subscription>>,
}

impl PlayerController {
    /// Manifest `kind` from `roster` and attach a controller to it.
    ///
    /// On failure nothing manifested here is left in `world`.
    pub fn setup(
        world: &mut World,
        roster: &AvatarRoster,
        kind: AvatarKind,
        target: Option<Entity>,
    ) -> Result<Self, ControlError> {
        let avatar = manifest_avatar(world, roster, kind)?;
        Self::attach(world, avatar, target).inspect_err(|_| despawn_recursive(world, avatar))
    }

    /// Resolve the aspects of an already spawned avatar and enter Active.
    pub fn attach(world: &World, avatar: Entity, target: Option<Entity>) -> Result<Self, ControlError> {
        let has_avatar = world.entity(avatar).map_or(false, |e| e.has::<AvatarAspect>());
        if !has_avatar {
            return Err(ControlError::MissingAspect { entity: avatar, aspect: "avatar" });
        }
        let barrage = find_in_children::<BarrageAspect>(world, avatar)
            .ok_or(ControlError::MissingAspect { entity: avatar, aspect: "barrage" })?;
        let blast = find_in_children::<BlastAspect>(world, avatar)
            .ok_or(ControlError::MissingAspect { entity: avatar, aspect: "blast" })?;

        world.get::<&mut BlastAspect>(blast)?.current_target = target;

        let handles = AspectHandles { avatar, barrage, blast };
        let mut states = StateSet::default();
        let fsm = handles.with(world, |ctx| StateMachine::start(&mut states, StateId::Active, ctx))?;

        info!(?avatar, ?barrage, ?blast, "controller attached");
        Ok(Self {
            handles,
            target,
            states,
            fsm,
            aiming: false,
            feedback: Vec::new(),
            subscriptions: None,
        })
    }

    pub fn avatar(&self) -> Entity {
        self.handles.avatar
    }

    pub fn barrage(&self) -> Entity {
        self.handles.barrage
    }

    pub fn blast(&self) -> Entity {
        self.handles.blast
    }

    pub fn current_state(&self) -> StateId {
        self.fsm.current()
    }

    pub fn current_state_name(&self) -> &'static str {
        self.fsm.current_name()
    }

    pub fn fsm(&self) -> &StateMachine {
        &self.fsm
    }

    pub fn states(&self) -> &StateSet {
        &self.states
    }

    pub fn is_aiming(&self) -> bool {
        self.aiming
    }

    pub fn target(&self) -> Option<Entity> {
        self.target
    }

    pub fn set_target(&mut self, world: &World, target: Option<Entity>) -> Result<(), ControlError> {
        self.target = target;
        world.get::<&mut BlastAspect>(self.handles.blast)?.current_target = target;
        Ok(())
    }

    /// Take the feedback signals raised since the last call.
    pub fn drain_feedback(&mut self) -> Vec<Feedback> {
        std::mem::take(&mut self.feedback)
    }

    // -----------------------------------------------------------------------
    // Tick
    // -----------------------------------------------------------------------

    /// One fixed simulation tick.
    ///
    /// Game-over freezes everything, knockdown forces Down, hit-stun skips
    /// the tick. Otherwise the current state updates and input is sampled.
    pub fn fixed_update(&mut self, world: &World, input: &impl InputSource) -> Result<(), ControlError> {
        let (game_over, knocked_down, in_hit_stun) = {
            let avatar = world.get::<&AvatarAspect>(self.handles.avatar)?;
            (avatar.game_over, avatar.knocked_down, avatar.in_hit_stun)
        };

        if game_over {
            return Ok(());
        }
        if knocked_down {
            return self.change_state(world, StateId::Down);
        }
        if in_hit_stun {
            return Ok(());
        }

        self.state_controller_update(world)?;
        self.sample_movement(world, input)?;
        if self.aiming {
            self.sample_aim(input);
        }
        Ok(())
    }

    /// Update the current state and follow its completion.
    pub fn state_controller_update(&mut self, world: &World) -> Result<(), ControlError> {
        let (fsm, states) = (&mut self.fsm, &mut self.states);
        self.handles.with(world, |ctx| fsm.update(states, ctx))
    }

    /// Exit the current state and enter `next`, even if it is the current one.
    pub fn change_state(&mut self, world: &World, next: StateId) -> Result<(), ControlError> {
        let (fsm, states) = (&mut self.fsm, &mut self.states);
        self.handles.with(world, |ctx| fsm.change_state(states, next, ctx))
    }

    /// Movement only reaches Active while it is current and not recovering.
    fn sample_movement(&mut self, world: &World, input: &impl InputSource) -> Result<(), ControlError> {
        let recovering = world.get::<&BarrageAspect>(self.handles.barrage)?.recovering;
        let movement = if self.fsm.current() == StateId::Active && !recovering {
            input.movement()
        } else {
            Vec2::ZERO
        };
        self.states.active.set_inputs(movement);
        Ok(())
    }

    fn sample_aim(&mut self, input: &impl InputSource) {
        let aim = aim_vector(input.aim_x(), input.aim_y());
        self.states.blast.set_aim_inputs(aim);
        self.states.blast.set_movement_inputs(input.movement());
    }

    // -----------------------------------------------------------------------
    // Actions
    // -----------------------------------------------------------------------

    /// Route one trigger to its handler. Returns whether it was accepted.
    pub fn handle(
        &mut self,
        world: &World,
        trigger: ActionTrigger,
        input: &impl InputSource,
    ) -> Result<bool, ControlError> {
        match trigger {
            ActionTrigger::BarragePressed => self.barrage_pressed(world),
            ActionTrigger::BlastPressed => self.blast_pressed(world),
            ActionTrigger::BlastReleased => self.blast_released(world),
            ActionTrigger::JumpPressed => self.jump_pressed(world, input),
        }
    }

    pub fn barrage_pressed(&mut self, world: &World) -> Result<bool, ControlError> {
        let flags = self.handles.guard_flags(world, self.fsm.current())?;
        if !guards::can_barrage(&flags) {
            self.reject(ActionTrigger::BarragePressed);
            return Ok(false);
        }

        world.get::<&mut AvatarAspect>(self.handles.avatar)?.stop_jump_velocity();
        self.change_state(world, StateId::Barrage)?;
        Ok(true)
    }

    pub fn blast_pressed(&mut self, world: &World) -> Result<bool, ControlError> {
        let flags = self.handles.guard_flags(world, self.fsm.current())?;
        if !guards::can_blast(&flags) {
            self.reject(ActionTrigger::BlastPressed);
            return Ok(false);
        }

        self.aiming = true;
        {
            let mut avatar = world.get::<&mut AvatarAspect>(self.handles.avatar)?;
            avatar.stop_jump_velocity();
            avatar.slow_move_velocity();
        }
        self.change_state(world, StateId::Blast)?;
        Ok(true)
    }

    /// Blast release. A refused release is silent: it is the normal
    /// follow-up of a rejected press.
    pub fn blast_released(&mut self, world: &World) -> Result<bool, ControlError> {
        let flags = self.handles.guard_flags(world, self.fsm.current())?;
        if !guards::can_neutral(&flags) {
            return Ok(false);
        }

        self.aiming = false;
        self.change_state(world, StateId::Active)?;
        Ok(true)
    }

    pub fn jump_pressed(&mut self, world: &World, input: &impl InputSource) -> Result<bool, ControlError> {
        let flags = self.handles.guard_flags(world, self.fsm.current())?;
        match guards::jump_outcome(&flags) {
            JumpOutcome::AirDash => {
                self.states.dash.set_inputs(input.movement());
                self.change_state(world, StateId::Dash)?;
                Ok(true)
            }
            JumpOutcome::Jump => {
                self.states.active.request_jump();
                Ok(true)
            }
            JumpOutcome::Rejected => {
                self.reject(ActionTrigger::JumpPressed);
                Ok(false)
            }
        }
    }

    fn reject(&mut self, trigger: ActionTrigger) {
        debug!(?trigger, state = self.fsm.current_name(), "action rejected");
        self.feedback.push(Feedback::Rejected(trigger));
    }

    // -----------------------------------------------------------------------
    // Subscription lifecycle
    // -----------------------------------------------------------------------

    /// Subscribe the action handlers. Calling it while enabled is a no-op.
    pub fn enable(&mut self, bus: &mut ActionBus) {
        if self.subscriptions.is_some() {
            return;
        }
        let subs = ActionTrigger::ALL.iter().map(|t| bus.subscribe(*t)).collect();
        self.subscriptions = Some(subs);
    }

    /// Revoke every subscription taken by `enable`.
    pub fn disable(&mut self, bus: &mut ActionBus) {
        if let Some(subs) = self.subscriptions.take() {
            for sub in subs {
                bus.unsubscribe(sub);
            }
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.subscriptions.is_some()
    }

    /// Handle every queued trigger this controller is subscribed to.
    pub fn pump_actions(
        &mut self,
        world: &World,
        bus: &mut ActionBus,
        input: &impl InputSource,
    ) -> Result<(), ControlError> {
        let Some(subs) = &self.subscriptions else {
            return Ok(());
        };
        for trigger in bus.deliver(subs) {
            self.handle(world, trigger, input)?;
        }
        Ok(())
    }
}
