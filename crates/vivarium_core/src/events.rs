//! Event buffering and observer registration.
//!
//! Engines append to an [`EventLog`] while a tick runs; the habitat returns the
//! buffered events and then hands them, in order, to every [`EventBus`]
//! subscriber.

use vivarium_data::{
    BehaviorState, CreatureId, LiveEvent, Position, RewardKind, StatKind,
};

/// Tick-stamped append-only view over an event buffer.
pub struct EventLog<'a> {
    pub tick: u64,
    buffer: &'a mut Vec<LiveEvent>,
}

impl<'a> EventLog<'a> {
    pub fn new(tick: u64, buffer: &'a mut Vec<LiveEvent>) -> Self {
        Self { tick, buffer }
    }

    pub fn push(&mut self, event: LiveEvent) {
        self.buffer.push(event);
    }

    pub fn stat_changed(&mut self, id: &CreatureId, stat: StatKind, value: f32) {
        self.push(LiveEvent::StatChanged {
            id: id.clone(),
            stat,
            value,
            tick: self.tick,
        });
    }

    pub fn sickness_changed(&mut self, id: &CreatureId, sick: bool) {
        self.push(LiveEvent::SicknessChanged {
            id: id.clone(),
            sick,
            tick: self.tick,
        });
    }

    pub fn state_changed(&mut self, id: &CreatureId, from: BehaviorState, to: BehaviorState) {
        self.push(LiveEvent::StateChanged {
            id: id.clone(),
            from,
            to,
            tick: self.tick,
        });
    }

    pub fn food_consumed(&mut self, id: &CreatureId) {
        self.push(LiveEvent::FoodConsumed {
            id: id.clone(),
            tick: self.tick,
        });
    }

    pub fn poked(&mut self, id: &CreatureId) {
        self.push(LiveEvent::Poked {
            id: id.clone(),
            tick: self.tick,
        });
    }

    pub fn reward_dropped(&mut self, id: &CreatureId, reward: RewardKind, position: Position) {
        self.push(LiveEvent::RewardDropped {
            id: id.clone(),
            reward,
            position,
            tick: self.tick,
        });
    }

    pub fn evolved(&mut self, old_id: &CreatureId, new_id: &CreatureId) {
        self.push(LiveEvent::Evolved {
            old_id: old_id.clone(),
            new_id: new_id.clone(),
            old_stage: old_id.stage,
            new_stage: new_id.stage,
            tick: self.tick,
        });
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

pub type Subscriber = Box<dyn FnMut(&LiveEvent) + Send>;

/// Ordered list of event observers. Subscribers are called in registration order.
#[derive(Default)]
pub struct EventBus {
    next_id: u64,
    subscribers: Vec<(SubscriptionId, Subscriber)>,
}

impl EventBus {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&mut self, subscriber: F) -> SubscriptionId
    where
        F: FnMut(&LiveEvent) + Send + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscribers.push((id, Box::new(subscriber)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sid, _)| *sid != id);
        self.subscribers.len() != before
    }

    pub fn publish(&mut self, events: &[LiveEvent]) {
        for event in events {
            for (_, subscriber) in &mut self.subscribers {
                subscriber(event);
            }
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }
}
