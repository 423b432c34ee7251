//! Gating rules for discrete actions.
//!
//! Every predicate is a pure function of [`GuardFlags`], a snapshot of the
//! current state and the aspect flags taken when the action arrives.

use crate::components::{AvatarAspect, BarrageAspect, BlastAspect};
use crate::fsm::StateId;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GuardFlags {
    pub current: StateId,
    pub barrage_recovering: bool,
    pub projectile_active: bool,
    pub blasting: bool,
    pub dashing: bool,
    pub grounded: bool,
    pub remaining_air_dashes: u32,
}

impl GuardFlags {
    pub fn snapshot(
        current: StateId,
        avatar: &AvatarAspect,
        barrage: &BarrageAspect,
        blast: &BlastAspect,
    ) -> Self {
        Self {
            current,
            barrage_recovering: barrage.recovering,
            projectile_active: blast.projectile_active,
            blasting: blast.blasting,
            dashing: avatar.dashing,
            grounded: avatar.grounded,
            remaining_air_dashes: avatar.remaining_air_dashes,
        }
    }

    /// Active and not in the barrage recovery window: the common prefix of
    /// every entry guard.
    fn free_to_act(&self) -> bool {
        self.current == StateId::Active && !self.barrage_recovering
    }
}

/// What a jump press turns into.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JumpOutcome {
    AirDash,
    Jump,
    Rejected,
}

pub fn can_barrage(flags: &GuardFlags) -> bool {
    flags.free_to_act()
}

pub fn can_blast(flags: &GuardFlags) -> bool {
    flags.free_to_act() && !flags.projectile_active && !flags.dashing
}

/// Blast release. Deliberately looser than the entry guards: recovery and
/// blast flags are not consulted.
pub fn can_neutral(flags: &GuardFlags) -> bool {
    flags.current != StateId::Active && !flags.dashing
}

pub fn jump_outcome(flags: &GuardFlags) -> JumpOutcome {
    if !flags.free_to_act() || flags.blasting {
        return JumpOutcome::Rejected;
    }

    if !flags.grounded && flags.remaining_air_dashes != 0 {
        JumpOutcome::AirDash
    } else if flags.grounded {
        JumpOutcome::Jump
    } else {
        JumpOutcome::Rejected
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open() -> GuardFlags {
        GuardFlags {
            current: StateId::Active,
            barrage_recovering: false,
            projectile_active: false,
            blasting: false,
            dashing: false,
            grounded: true,
            remaining_air_dashes: 1,
        }
    }

    #[test]
    fn barrage_accepted_only_from_active_without_recovery() {
        assert!(can_barrage(&open()));
        assert!(!can_barrage(&GuardFlags { barrage_recovering: true, ..open() }));
        assert!(!can_barrage(&GuardFlags { current: StateId::Blast, ..open() }));
        assert!(!can_barrage(&GuardFlags { current: StateId::Down, ..open() }));
    }

    #[test]
    fn barrage_ignores_blast_and_dash_flags() {
        let flags = GuardFlags { projectile_active: true, blasting: true, dashing: true, ..open() };
        assert!(can_barrage(&flags));
    }

    #[test]
    fn blast_needs_every_condition() {
        assert!(can_blast(&open()));
        assert!(!can_blast(&GuardFlags { current: StateId::Barrage, ..open() }));
        assert!(!can_blast(&GuardFlags { barrage_recovering: true, ..open() }));
        assert!(!can_blast(&GuardFlags { projectile_active: true, ..open() }));
        assert!(!can_blast(&GuardFlags { dashing: true, ..open() }));
        assert!(!can_blast(&GuardFlags {
            current: StateId::Dash,
            dashing: true,
            projectile_active: true,
            barrage_recovering: true,
            ..open()
        }));
    }

    #[test]
    fn neutral_only_checks_state_and_dashing() {
        let blasting = GuardFlags {
            current: StateId::Blast,
            barrage_recovering: true,
            projectile_active: true,
            blasting: true,
            ..open()
        };
        // Entry guards would refuse these flags; release does not look at them.
        assert!(can_neutral(&blasting));
        assert!(!can_neutral(&GuardFlags { dashing: true, ..blasting }));
        assert!(!can_neutral(&open()));
    }

    #[test]
    fn grounded_jump_press_latches_jump() {
        assert_eq!(jump_outcome(&open()), JumpOutcome::Jump);
        assert_eq!(
            jump_outcome(&GuardFlags { remaining_air_dashes: 0, ..open() }),
            JumpOutcome::Jump
        );
    }

    #[test]
    fn airborne_jump_press_depends_on_air_dashes() {
        let airborne = GuardFlags { grounded: false, ..open() };
        assert_eq!(
            jump_outcome(&GuardFlags { remaining_air_dashes: 2, ..airborne }),
            JumpOutcome::AirDash
        );
        assert_eq!(
            jump_outcome(&GuardFlags { remaining_air_dashes: 0, ..airborne }),
            JumpOutcome::Rejected
        );
    }

    #[test]
    fn jump_rejected_while_locked() {
        assert_eq!(
            jump_outcome(&GuardFlags { blasting: true, ..open() }),
            JumpOutcome::Rejected
        );
        assert_eq!(
            jump_outcome(&GuardFlags { barrage_recovering: true, ..open() }),
            JumpOutcome::Rejected
        );
        assert_eq!(
            jump_outcome(&GuardFlags { current: StateId::Dash, ..open() }),
            JumpOutcome::Rejected
        );
    }
}
