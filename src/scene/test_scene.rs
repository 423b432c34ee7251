use glam::Vec2;

use crate::engine::input::ActionTrigger;

/// One scripted happening, applied at the start of its tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ScriptEvent {
    /// Publish an action trigger on the bus.
    Action(ActionTrigger),
    /// Hold the movement stick at this value.
    Move(Vec2),
    /// Hold the aim stick at this value (raw axes, Y up).
    Aim(Vec2),
    /// Leave the ground (ledge, launch).
    Airborne,
    Land,
    /// Take a hit with this many ticks of stun.
    Hit(u32),
    KnockDown,
    GetUp,
    GameOver,
}

/// Build the demo timeline: walk, jump, air dash, barrage, aimed blast,
/// a rejected press, a hit, and a knockdown.
/// Returns `(tick, event)` pairs sorted by tick.
pub fn demo_script() -> Vec<(u32, ScriptEvent)> {
    use ActionTrigger::*;
    use ScriptEvent::*;

    vec![
        (5, Move(Vec2::new(1.0, 0.0))),
        (30, Action(JumpPressed)),
        (32, Airborne),
        (40, Action(JumpPressed)),
        (70, Land),
        (75, Move(Vec2::ZERO)),
        (80, Action(BarragePressed)),
        // Lands inside the recovery window and is refused.
        (100, Action(BarragePressed)),
        (140, Action(BlastPressed)),
        (142, Aim(Vec2::new(0.7, 0.7))),
        (150, Move(Vec2::new(-1.0, 0.0))),
        (170, Action(BlastReleased)),
        (171, Aim(Vec2::ZERO)),
        // Projectile still in flight.
        (180, Action(BlastPressed)),
        (181, Action(BlastReleased)),
        (200, Hit(20)),
        (205, Action(BarragePressed)),
        (260, KnockDown),
        (290, GetUp),
        (400, Move(Vec2::ZERO)),
        (560, GameOver),
    ]
}
