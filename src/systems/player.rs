use glam::Vec2;

use crate::fsm::{AspectCtx, State, StateId, StateTable};

// ---------------------------------------------------------------------------
// Constants (fixed ticks at 60 Hz)
// ---------------------------------------------------------------------------

const BARRAGE_STRIKE_TICKS: u32 = 18;
const DASH_TICKS: u32 = 12;
const DOWN_RECOVERY_TICKS: u32 = 45;

/// Fraction of run speed available for drift while aiming a blast.
const AIM_DRIFT_FACTOR: f32 = 0.35;

// ---------------------------------------------------------------------------
// Active
// ---------------------------------------------------------------------------

/// Neutral home state: free movement and the jump latch.
#[derive(Default)]
pub struct ActiveState {
    movement: Vec2,
    jump_requested: bool,
}

impl ActiveState {
    pub fn set_inputs(&mut self, movement: Vec2) {
        self.movement = movement;
    }

    pub fn movement(&self) -> Vec2 {
        self.movement
    }

    /// Latch a jump for the next update.
    pub fn request_jump(&mut self) {
        self.jump_requested = true;
    }

    pub fn jump_requested(&self) -> bool {
        self.jump_requested
    }
}

impl State for ActiveState {
    fn name(&self) -> &'static str {
        "Active"
    }

    fn on_enter(&mut self, _ctx: &mut AspectCtx) {
        self.movement = Vec2::ZERO;
        self.jump_requested = false;
    }

    fn on_update(&mut self, ctx: &mut AspectCtx) {
        let avatar = &mut *ctx.avatar;

        // Latch is consumed whether or not the jump could fire.
        if std::mem::take(&mut self.jump_requested) && avatar.grounded {
            avatar.velocity.y = avatar.locomotion.jump_impulse;
            avatar.grounded = false;
        }

        avatar.velocity.x = self.movement.x * avatar.locomotion.run_speed;
        if self.movement.x != 0.0 {
            avatar.facing = self.movement.x.signum();
        }
    }

    fn on_exit(&mut self, _ctx: &mut AspectCtx) {
        self.movement = Vec2::ZERO;
    }

    fn is_done(&self) -> bool {
        false
    }

    fn next_state(&self) -> Option<StateId> {
        None
    }
}

// ---------------------------------------------------------------------------
// Barrage
// ---------------------------------------------------------------------------

/// Strike window. Ends by opening the barrage aspect's recovery window.
#[derive(Default)]
pub struct BarrageState {
    ticks: u32,
    done: bool,
}

impl State for BarrageState {
    fn name(&self) -> &'static str {
        "Barrage"
    }

    fn on_enter(&mut self, ctx: &mut AspectCtx) {
        self.ticks = 0;
        self.done = false;
        ctx.barrage.begin_strike();
        ctx.avatar.velocity.x = 0.0;
    }

    fn on_update(&mut self, ctx: &mut AspectCtx) {
        if self.done {
            return;
        }
        self.ticks += 1;
        if self.ticks >= BARRAGE_STRIKE_TICKS {
            ctx.barrage.end_strike();
            self.done = true;
        }
    }

    fn on_exit(&mut self, ctx: &mut AspectCtx) {
        // An interrupted strike still pays its recovery.
        if ctx.barrage.striking {
            ctx.barrage.end_strike();
        }
    }

    fn is_done(&self) -> bool {
        self.done
    }

    fn next_state(&self) -> Option<StateId> {
        Some(StateId::Active)
    }
}

// ---------------------------------------------------------------------------
// Blast
// ---------------------------------------------------------------------------

/// Aiming a projectile. Left only through release or a forced transition;
/// the shot goes off on exit.
#[derive(Default)]
pub struct BlastState {
    aim: Vec2,
    movement: Vec2,
}

impl BlastState {
    pub fn set_aim_inputs(&mut self, aim: Vec2) {
        self.aim = aim;
    }

    pub fn set_movement_inputs(&mut self, movement: Vec2) {
        self.movement = movement;
    }

    pub fn aim(&self) -> Vec2 {
        self.aim
    }

    pub fn movement(&self) -> Vec2 {
        self.movement
    }
}

impl State for BlastState {
    fn name(&self) -> &'static str {
        "Blast"
    }

    fn on_enter(&mut self, ctx: &mut AspectCtx) {
        self.aim = Vec2::ZERO;
        self.movement = Vec2::ZERO;
        ctx.blast.begin_aim();
    }

    fn on_update(&mut self, ctx: &mut AspectCtx) {
        let run_speed = ctx.avatar.locomotion.run_speed;
        ctx.avatar.velocity.x = self.movement.x * run_speed * AIM_DRIFT_FACTOR;
        ctx.blast.aim = self.aim;
    }

    fn on_exit(&mut self, ctx: &mut AspectCtx) {
        if self.aim != Vec2::ZERO && !ctx.avatar.knocked_down {
            ctx.blast.fire(self.aim);
        } else {
            ctx.blast.cancel_aim();
        }
    }

    fn is_done(&self) -> bool {
        false
    }

    fn next_state(&self) -> Option<StateId> {
        Some(StateId::Active)
    }
}

// ---------------------------------------------------------------------------
// Dash
// ---------------------------------------------------------------------------

/// Air dash along the movement vector captured when it was triggered.
#[derive(Default)]
pub struct DashState {
    /// Raw movement sampled at trigger time. Entry parameter, cleared on exit.
    direction: Vec2,
    heading: Vec2,
    ticks: u32,
    done: bool,
}

impl DashState {
    pub fn set_inputs(&mut self, direction: Vec2) {
        self.direction = direction;
    }

    pub fn direction(&self) -> Vec2 {
        self.direction
    }
}

impl State for DashState {
    fn name(&self) -> &'static str {
        "Dash"
    }

    fn on_enter(&mut self, ctx: &mut AspectCtx) {
        self.ticks = 0;
        self.done = false;

        let avatar = &mut *ctx.avatar;
        // No stick input: dash the way the avatar faces.
        self.heading = self
            .direction
            .try_normalize()
            .unwrap_or(Vec2::new(avatar.facing, 0.0));
        avatar.dashing = true;
        avatar.remaining_air_dashes = avatar.remaining_air_dashes.saturating_sub(1);
        avatar.velocity = self.heading * avatar.locomotion.dash_speed;
    }

    fn on_update(&mut self, ctx: &mut AspectCtx) {
        if self.done {
            return;
        }
        self.ticks += 1;
        ctx.avatar.velocity = self.heading * ctx.avatar.locomotion.dash_speed;
        if self.ticks >= DASH_TICKS {
            self.done = true;
        }
    }

    fn on_exit(&mut self, ctx: &mut AspectCtx) {
        ctx.avatar.dashing = false;
        ctx.avatar.velocity = Vec2::ZERO;
        self.direction = Vec2::ZERO;
        self.heading = Vec2::ZERO;
    }

    fn is_done(&self) -> bool {
        self.done
    }

    fn next_state(&self) -> Option<StateId> {
        Some(StateId::Active)
    }
}

// ---------------------------------------------------------------------------
// Down
// ---------------------------------------------------------------------------

/// Knockdown recovery. Counts only once the knockdown flag has cleared.
#[derive(Default)]
pub struct DownState {
    ticks: u32,
    done: bool,
}

impl State for DownState {
    fn name(&self) -> &'static str {
        "Down"
    }

    fn on_enter(&mut self, ctx: &mut AspectCtx) {
        self.ticks = 0;
        self.done = false;
        ctx.avatar.velocity.x = 0.0;
    }

    fn on_update(&mut self, ctx: &mut AspectCtx) {
        if ctx.avatar.knocked_down {
            self.ticks = 0;
            return;
        }
        self.ticks += 1;
        if self.ticks >= DOWN_RECOVERY_TICKS {
            self.done = true;
        }
    }

    fn on_exit(&mut self, _ctx: &mut AspectCtx) {}

    fn is_done(&self) -> bool {
        self.done
    }

    fn next_state(&self) -> Option<StateId> {
        Some(StateId::Active)
    }
}

// ---------------------------------------------------------------------------
// State set
// ---------------------------------------------------------------------------

/// The five states, built once per controller and reused across transitions.
#[derive(Default)]
pub struct StateSet {
    pub active: ActiveState,
    pub barrage: BarrageState,
    pub blast: BlastState,
    pub dash: DashState,
    pub down: DownState,
}

impl StateTable for StateSet {
    fn state_mut(&mut self, id: StateId) -> &mut dyn State {
        match id {
            StateId::Active => &mut self.active,
            StateId::Barrage => &mut self.barrage,
            StateId::Blast => &mut self.blast,
            StateId::Dash => &mut self.dash,
            StateId::Down => &mut self.down,
        }
    }
}
