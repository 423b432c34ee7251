use glam::Vec2;
use hecs::Entity;

// ---------------------------------------------------------------------------
// Avatar aspect
// ---------------------------------------------------------------------------

/// Movement tuning carried by each avatar variant.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Locomotion {
    /// Horizontal speed while in the Active state (units per second).
    pub run_speed: f32,
    /// Vertical velocity applied on jump.
    pub jump_impulse: f32,
    /// Speed of an air dash.
    pub dash_speed: f32,
    /// Fraction of horizontal velocity kept by `slow_move_velocity`.
    pub slow_factor: f32,
    /// Air dashes restored on landing.
    pub max_air_dashes: u32,
}

/// Physical flags and commands of the manifested avatar.
///
/// The flags are written by physics/combat collaborators. The controller
/// only reads them, apart from the two commands below and the jump/dash
/// bookkeeping issued by states.
#[derive(Clone, Debug)]
pub struct AvatarAspect {
    pub grounded: bool,
    pub dashing: bool,
    pub remaining_air_dashes: u32,
    pub in_hit_stun: bool,
    /// Ticks of hit-stun left. Counted down by `aspect_system`.
    pub hit_stun_ticks: u32,
    pub knocked_down: bool,
    pub game_over: bool,
    pub velocity: Vec2,
    /// +1.0 facing right, -1.0 facing left.
    pub facing: f32,
    pub locomotion: Locomotion,
}

impl AvatarAspect {
    pub fn new(locomotion: Locomotion) -> Self {
        Self {
            grounded: true,
            dashing: false,
            remaining_air_dashes: locomotion.max_air_dashes,
            in_hit_stun: false,
            hit_stun_ticks: 0,
            knocked_down: false,
            game_over: false,
            velocity: Vec2::ZERO,
            facing: 1.0,
            locomotion,
        }
    }

    /// Cancel any upward velocity so an attack starts from a hang.
    pub fn stop_jump_velocity(&mut self) {
        if self.velocity.y > 0.0 {
            self.velocity.y = 0.0;
        }
    }

    pub fn slow_move_velocity(&mut self) {
        self.velocity.x *= self.locomotion.slow_factor;
    }

    /// Ground contact: restores air dashes.
    pub fn land(&mut self) {
        self.grounded = true;
        self.velocity.y = 0.0;
        self.remaining_air_dashes = self.locomotion.max_air_dashes;
    }

    pub fn take_hit(&mut self, stun_ticks: u32) {
        self.in_hit_stun = stun_ticks > 0;
        self.hit_stun_ticks = stun_ticks;
    }
}

// ---------------------------------------------------------------------------
// Attack aspects
// ---------------------------------------------------------------------------

/// Melee barrage: a strike window followed by a recovery window.
#[derive(Clone, Debug, Default)]
pub struct BarrageAspect {
    pub recovering: bool,
    pub striking: bool,
    pub recovery_ticks: u32,
    /// Recovery length applied when a strike ends.
    pub recovery_duration: u32,
}

impl BarrageAspect {
    pub fn new(recovery_duration: u32) -> Self {
        Self {
            recovery_duration,
            ..Default::default()
        }
    }

    pub fn begin_strike(&mut self) {
        self.striking = true;
    }

    /// End the strike and open the recovery window.
    pub fn end_strike(&mut self) {
        self.striking = false;
        self.recovering = self.recovery_duration > 0;
        self.recovery_ticks = self.recovery_duration;
    }
}

/// Aimed projectile attack.
#[derive(Clone, Debug, Default)]
pub struct BlastAspect {
    pub aiming: bool,
    /// Set while the shot is being released.
    pub blasting: bool,
    pub projectile_active: bool,
    /// Ticks left in the release animation; `blasting` clears at zero.
    pub release_ticks: u32,
    pub release_duration: u32,
    /// Remaining lifetime of the projectile in ticks.
    pub projectile_ticks: u32,
    pub projectile_lifetime: u32,
    pub aim: Vec2,
    pub current_target: Option<Entity>,
}

impl BlastAspect {
    pub fn new(release_duration: u32, projectile_lifetime: u32) -> Self {
        Self {
            release_duration,
            projectile_lifetime,
            ..Default::default()
        }
    }

    pub fn begin_aim(&mut self) {
        self.aiming = true;
        self.aim = Vec2::ZERO;
    }

    /// Launch a projectile along `aim`.
    pub fn fire(&mut self, aim: Vec2) {
        self.aiming = false;
        self.aim = aim;
        self.blasting = true;
        self.release_ticks = self.release_duration;
        self.projectile_active = true;
        self.projectile_ticks = self.projectile_lifetime;
    }

    pub fn cancel_aim(&mut self) {
        self.aiming = false;
    }
}
