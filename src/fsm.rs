use tracing::debug;

use crate::components::{AvatarAspect, BarrageAspect, BlastAspect};

/// Handle to one of the controller's fixed set of states.
///
/// States are built once and live for the controller's lifetime; only the
/// current handle moves between them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StateId {
    Active,
    Barrage,
    Blast,
    Dash,
    Down,
}

/// Aspects borrowed for the duration of one state hook.
pub struct AspectCtx<'a> {
    pub avatar: &'a mut AvatarAspect,
    pub barrage: &'a mut BarrageAspect,
    pub blast: &'a mut BlastAspect,
}

/// Uniform contract shared by every controllable mode.
pub trait State {
    /// Diagnostic name.
    fn name(&self) -> &'static str;

    /// Reset input buffers and transient flags. `is_done()` must be false afterwards.
    fn on_enter(&mut self, ctx: &mut AspectCtx);

    /// Advance one fixed tick.
    fn on_update(&mut self, ctx: &mut AspectCtx);

    /// Release anything the state holds before the next state is entered.
    fn on_exit(&mut self, ctx: &mut AspectCtx);

    fn is_done(&self) -> bool;

    /// Follow-up state, only meaningful once `is_done()` is true.
    fn next_state(&self) -> Option<StateId>;
}

/// Owner of the concrete states, addressed by [`StateId`].
pub trait StateTable {
    fn state_mut(&mut self, id: StateId) -> &mut dyn State;
}

/// Current-state pointer plus the transition procedure.
///
/// **Transition logic is kept out of the machine**: states decide when they
/// are done, the controller decides which action-driven transitions fire.
/// The machine only runs hooks in order and tracks how long the current
/// state has been active.
pub struct StateMachine {
    current: StateId,
    previous: StateId,
    /// Fixed ticks spent in the current state. Reset on each transition.
    ticks_in_state: u32,
    entered_this_tick: bool,
    current_name: &'static str,
}

impl StateMachine {
    /// Enter `initial` with no previous state to exit.
    pub fn start<T: StateTable>(table: &mut T, initial: StateId, ctx: &mut AspectCtx) -> Self {
        let state = table.state_mut(initial);
        state.on_enter(ctx);
        Self {
            current: initial,
            previous: initial,
            ticks_in_state: 0,
            entered_this_tick: true,
            current_name: state.name(),
        }
    }

    pub fn current(&self) -> StateId {
        self.current
    }

    pub fn previous(&self) -> StateId {
        self.previous
    }

    pub fn ticks_in_state(&self) -> u32 {
        self.ticks_in_state
    }

    /// True from a transition until the end of the next `update`.
    pub fn just_entered(&self) -> bool {
        self.entered_this_tick
    }

    /// Name of the state that ran the most recent update.
    pub fn current_name(&self) -> &'static str {
        self.current_name
    }

    /// Exit the current state, then enter `next`.
    ///
    /// No dedup: changing to the already-current state exits and re-enters it.
    pub fn change_state<T: StateTable>(&mut self, table: &mut T, next: StateId, ctx: &mut AspectCtx) {
        table.state_mut(self.current).on_exit(ctx);

        self.previous = std::mem::replace(&mut self.current, next);
        self.ticks_in_state = 0;
        self.entered_this_tick = true;

        let state = table.state_mut(next);
        state.on_enter(ctx);
        self.current_name = state.name();
        debug!(from = ?self.previous, to = ?next, "state change");
    }

    /// Run the current state's update, then follow its `next_state` once it
    /// reports done.
    pub fn update<T: StateTable>(&mut self, table: &mut T, ctx: &mut AspectCtx) {
        self.entered_this_tick = false;
        self.ticks_in_state = self.ticks_in_state.saturating_add(1);

        let state = table.state_mut(self.current);
        state.on_update(ctx);
        self.current_name = state.name();

        if state.is_done() {
            if let Some(next) = state.next_state() {
                self.change_state(table, next, ctx);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::Locomotion;
    use std::cell::RefCell;
    use std::rc::Rc;

    type Log = Rc<RefCell<Vec<String>>>;

    struct Probe {
        name: &'static str,
        log: Log,
        done_after: Option<u32>,
        updates: u32,
    }

    impl State for Probe {
        fn name(&self) -> &'static str {
            self.name
        }
        fn on_enter(&mut self, _ctx: &mut AspectCtx) {
            self.updates = 0;
            self.log.borrow_mut().push(format!("enter {}", self.name));
        }
        fn on_update(&mut self, _ctx: &mut AspectCtx) {
            self.updates += 1;
        }
        fn on_exit(&mut self, _ctx: &mut AspectCtx) {
            self.log.borrow_mut().push(format!("exit {}", self.name));
        }
        fn is_done(&self) -> bool {
            self.done_after.is_some_and(|n| self.updates >= n)
        }
        fn next_state(&self) -> Option<StateId> {
            self.done_after.map(|_| StateId::Active)
        }
    }

    struct ProbeTable {
        active: Probe,
        dash: Probe,
    }

    impl StateTable for ProbeTable {
        fn state_mut(&mut self, id: StateId) -> &mut dyn State {
            match id {
                StateId::Dash => &mut self.dash,
                _ => &mut self.active,
            }
        }
    }

    fn probe_table(log: &Log) -> ProbeTable {
        ProbeTable {
            active: Probe { name: "active", log: log.clone(), done_after: None, updates: 0 },
            dash: Probe { name: "dash", log: log.clone(), done_after: Some(2), updates: 0 },
        }
    }

    fn aspects() -> (AvatarAspect, BarrageAspect, BlastAspect) {
        let locomotion = Locomotion {
            run_speed: 6.0,
            jump_impulse: 7.0,
            dash_speed: 12.0,
            slow_factor: 0.5,
            max_air_dashes: 1,
        };
        (AvatarAspect::new(locomotion), BarrageAspect::new(10), BlastAspect::new(8, 30))
    }

    #[test]
    fn exit_fires_once_before_enter() {
        let log: Log = Rc::default();
        let mut table = probe_table(&log);
        let (mut avatar, mut barrage, mut blast) = aspects();
        let mut ctx = AspectCtx { avatar: &mut avatar, barrage: &mut barrage, blast: &mut blast };

        let mut fsm = StateMachine::start(&mut table, StateId::Active, &mut ctx);
        fsm.change_state(&mut table, StateId::Dash, &mut ctx);

        assert_eq!(*log.borrow(), vec!["enter active", "exit active", "enter dash"]);
        assert_eq!(fsm.current(), StateId::Dash);
        assert_eq!(fsm.previous(), StateId::Active);
        assert!(fsm.just_entered());
    }

    #[test]
    fn changing_to_current_state_reenters() {
        let log: Log = Rc::default();
        let mut table = probe_table(&log);
        let (mut avatar, mut barrage, mut blast) = aspects();
        let mut ctx = AspectCtx { avatar: &mut avatar, barrage: &mut barrage, blast: &mut blast };

        let mut fsm = StateMachine::start(&mut table, StateId::Active, &mut ctx);
        fsm.change_state(&mut table, StateId::Active, &mut ctx);

        assert_eq!(*log.borrow(), vec!["enter active", "exit active", "enter active"]);
    }

    #[test]
    fn update_follows_next_state_once_done() {
        let log: Log = Rc::default();
        let mut table = probe_table(&log);
        let (mut avatar, mut barrage, mut blast) = aspects();
        let mut ctx = AspectCtx { avatar: &mut avatar, barrage: &mut barrage, blast: &mut blast };

        let mut fsm = StateMachine::start(&mut table, StateId::Dash, &mut ctx);
        fsm.update(&mut table, &mut ctx);
        assert_eq!(fsm.current(), StateId::Dash);
        assert_eq!(fsm.ticks_in_state(), 1);

        fsm.update(&mut table, &mut ctx);
        assert_eq!(fsm.current(), StateId::Active);
        assert_eq!(fsm.ticks_in_state(), 0);
    }

    #[test]
    fn update_without_completion_keeps_state() {
        let log: Log = Rc::default();
        let mut table = probe_table(&log);
        let (mut avatar, mut barrage, mut blast) = aspects();
        let mut ctx = AspectCtx { avatar: &mut avatar, barrage: &mut barrage, blast: &mut blast };

        let mut fsm = StateMachine::start(&mut table, StateId::Active, &mut ctx);
        for _ in 0..5 {
            fsm.update(&mut table, &mut ctx);
        }
        assert_eq!(fsm.current(), StateId::Active);
        assert_eq!(fsm.current_name(), "active");
        assert_eq!(log.borrow().len(), 1);
    }
}
