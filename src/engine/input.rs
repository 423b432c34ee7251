use std::collections::VecDeque;

use glam::Vec2;

/// Continuous input the controller samples each tick.
pub trait InputSource {
    fn movement(&self) -> Vec2;
    fn aim_x(&self) -> f32;
    fn aim_y(&self) -> f32;
}

/// Edge-triggered action events.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ActionTrigger {
    BarragePressed,
    BlastPressed,
    BlastReleased,
    JumpPressed,
}

impl ActionTrigger {
    pub const ALL: [ActionTrigger; 4] = [
        ActionTrigger::BarragePressed,
        ActionTrigger::BlastPressed,
        ActionTrigger::BlastReleased,
        ActionTrigger::JumpPressed,
    ];
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
struct SubscriptionId(u64);

/// Capability returned by [`ActionBus::subscribe`].
///
/// Not `Clone`: the only way to revoke it is to hand it back through
/// [`ActionBus::unsubscribe`].
#[derive(Debug, PartialEq, Eq)]
pub struct Subscription {
    id: SubscriptionId,
    trigger: ActionTrigger,
}

/// Queue between the input layer and the controller.
///
/// Triggers are only queued while someone is subscribed to them; anything
/// published with no live subscription is dropped.
#[derive(Default)]
pub struct ActionBus {
    next_id: u64,
    live: Vec<(SubscriptionId, ActionTrigger)>,
    queue: VecDeque<ActionTrigger>,
}

impl ActionBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, trigger: ActionTrigger) -> Subscription {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.live.push((id, trigger));
        Subscription { id, trigger }
    }

    pub fn unsubscribe(&mut self, subscription: Subscription) {
        self.live.retain(|(id, _)| *id != subscription.id);
    }

    pub fn subscriber_count(&self, trigger: ActionTrigger) -> usize {
        self.live.iter().filter(|(_, t)| *t == trigger).count()
    }

    pub fn publish(&mut self, trigger: ActionTrigger) {
        if self.subscriber_count(trigger) > 0 {
            self.queue.push_back(trigger);
        }
    }

    /// Pop queued triggers covered by `subscriptions`, in publish order.
    /// Revoked tokens never match since their id is no longer live.
    pub fn deliver(&mut self, subscriptions: &[Subscription]) -> Vec<ActionTrigger> {
        let mut delivered = Vec::new();
        let mut kept = VecDeque::new();
        while let Some(trigger) = self.queue.pop_front() {
            let covered = subscriptions.iter().any(|s| {
                s.trigger == trigger && self.live.iter().any(|(id, _)| *id == s.id)
            });
            if covered {
                delivered.push(trigger);
            } else {
                kept.push_back(trigger);
            }
        }
        self.queue = kept;
        delivered
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }
}

/// Fixed input values, used by the headless session and tests.
#[derive(Clone, Copy, Debug, Default)]
pub struct ScriptedInput {
    pub movement: Vec2,
    pub aim: Vec2,
}

impl InputSource for ScriptedInput {
    fn movement(&self) -> Vec2 {
        self.movement
    }

    fn aim_x(&self) -> f32 {
        self.aim.x
    }

    fn aim_y(&self) -> f32 {
        self.aim.y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsubscribed_triggers_are_dropped() {
        let mut bus = ActionBus::new();
        bus.publish(ActionTrigger::JumpPressed);
        assert_eq!(bus.pending(), 0);
    }

    #[test]
    fn deliver_keeps_publish_order() {
        let mut bus = ActionBus::new();
        let subs: Vec<_> = ActionTrigger::ALL.iter().map(|t| bus.subscribe(*t)).collect();
        bus.publish(ActionTrigger::BlastPressed);
        bus.publish(ActionTrigger::JumpPressed);
        bus.publish(ActionTrigger::BlastReleased);

        assert_eq!(
            bus.deliver(&subs),
            vec![
                ActionTrigger::BlastPressed,
                ActionTrigger::JumpPressed,
                ActionTrigger::BlastReleased
            ]
        );
        assert_eq!(bus.pending(), 0);
    }

    #[test]
    fn unsubscribe_revokes_by_identity() {
        let mut bus = ActionBus::new();
        let first = bus.subscribe(ActionTrigger::JumpPressed);
        let second = bus.subscribe(ActionTrigger::JumpPressed);
        assert_eq!(bus.subscriber_count(ActionTrigger::JumpPressed), 2);

        bus.unsubscribe(first);
        assert_eq!(bus.subscriber_count(ActionTrigger::JumpPressed), 1);

        bus.publish(ActionTrigger::JumpPressed);
        assert_eq!(bus.deliver(std::slice::from_ref(&second)), vec![ActionTrigger::JumpPressed]);
    }

    #[test]
    fn other_subscribers_triggers_stay_queued() {
        let mut bus = ActionBus::new();
        let jump = bus.subscribe(ActionTrigger::JumpPressed);
        let _barrage = bus.subscribe(ActionTrigger::BarragePressed);
        bus.publish(ActionTrigger::BarragePressed);

        assert!(bus.deliver(&[jump]).is_empty());
        assert_eq!(bus.pending(), 1);
    }
}
