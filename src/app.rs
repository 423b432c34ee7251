use std::collections::VecDeque;

use hecs::World;
use tracing::{debug, info};

use crate::components::{AvatarAspect, Target};
use crate::controller::{Feedback, PlayerController};
use crate::engine::input::{ActionBus, ActionTrigger, ScriptedInput};
use crate::engine::time::FixedStep;
use crate::error::ControlError;
use crate::fsm::StateId;
use crate::scene::{AvatarKind, AvatarRoster, ScriptEvent};
use crate::systems::aspect_system;

/// What happened during a session.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SessionReport {
    pub ticks: u32,
    /// `(tick, state)` each time a tick ended in a different state.
    pub transitions: Vec<(u32, StateId)>,
    pub rejections: Vec<(u32, ActionTrigger)>,
}

/// Headless game loop: one avatar, one target, a scripted input timeline.
pub struct Session {
    world: World,
    controller: PlayerController,
    bus: ActionBus,
    input: ScriptedInput,
    step: FixedStep,
    script: VecDeque<(u32, ScriptEvent)>,
    report: SessionReport,
}

impl Session {
    pub fn new(
        roster: &AvatarRoster,
        kind: AvatarKind,
        script: Vec<(u32, ScriptEvent)>,
    ) -> Result<Self, ControlError> {
        let mut world = World::new();
        let target = world.spawn((Target,));
        let mut controller = PlayerController::setup(&mut world, roster, kind, Some(target))?;

        let mut bus = ActionBus::new();
        controller.enable(&mut bus);

        Ok(Self {
            world,
            controller,
            bus,
            input: ScriptedInput::default(),
            step: FixedStep::new(),
            script: script.into(),
            report: SessionReport::default(),
        })
    }

    pub fn ticks(&self) -> u32 {
        self.report.ticks
    }

    pub fn controller(&self) -> &PlayerController {
        &self.controller
    }

    /// Feed one render frame; runs every fixed tick that became due.
    pub fn advance_frame(&mut self, frame_dt: f32) -> Result<u32, ControlError> {
        let due = self.step.advance(frame_dt);
        for _ in 0..due {
            self.fixed_tick()?;
        }
        Ok(due)
    }

    pub fn fixed_tick(&mut self) -> Result<(), ControlError> {
        let tick = self.report.ticks;
        while self.script.front().is_some_and(|(at, _)| *at <= tick) {
            if let Some((_, event)) = self.script.pop_front() {
                self.apply(event)?;
            }
        }

        let before = self.controller.current_state();
        // Actions first, then the tick, then the collaborators' timers.
        self.controller.pump_actions(&self.world, &mut self.bus, &self.input)?;
        self.controller.fixed_update(&self.world, &self.input)?;
        aspect_system(&mut self.world);

        let after = self.controller.current_state();
        if after != before {
            info!(tick, from = ?before, to = ?after, "transition");
            self.report.transitions.push((tick, after));
        }
        for feedback in self.controller.drain_feedback() {
            let Feedback::Rejected(trigger) = feedback;
            info!(tick, ?trigger, "rejected");
            self.report.rejections.push((tick, trigger));
        }

        self.report.ticks += 1;
        Ok(())
    }

    fn apply(&mut self, event: ScriptEvent) -> Result<(), ControlError> {
        debug!(tick = self.report.ticks, ?event, "script");
        match event {
            ScriptEvent::Action(trigger) => self.bus.publish(trigger),
            ScriptEvent::Move(movement) => self.input.movement = movement,
            ScriptEvent::Aim(aim) => self.input.aim = aim,
            _ => {
                let mut avatar = self.world.get::<&mut AvatarAspect>(self.controller.avatar())?;
                match event {
                    ScriptEvent::Airborne => avatar.grounded = false,
                    ScriptEvent::Land => avatar.land(),
                    ScriptEvent::Hit(stun) => avatar.take_hit(stun),
                    ScriptEvent::KnockDown => avatar.knocked_down = true,
                    ScriptEvent::GetUp => avatar.knocked_down = false,
                    ScriptEvent::GameOver => avatar.game_over = true,
                    ScriptEvent::Action(_) | ScriptEvent::Move(_) | ScriptEvent::Aim(_) => {}
                }
            }
        }
        Ok(())
    }

    /// Unsubscribe the controller and hand back the report.
    pub fn finish(mut self) -> SessionReport {
        self.controller.disable(&mut self.bus);
        self.report
    }
}
