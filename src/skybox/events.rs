//! Host notifications and observer registration.
//!
//! The controller registers a channel sender with each event source and
//! drains the receiving end once per tick, so events that arrive between
//! ticks are coalesced into a single reconciliation.

use std::sync::mpsc::Sender;

use crate::skybox::weather::WeatherKind;

/// Fire-and-forget notifications from the host game.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HostEvent {
    WeatherChanged(WeatherKind),
    PlayerEnteredInterior,
    PlayerEnteredExterior,
    /// A save was loaded. The saved weather is authoritative.
    GameLoaded {
        weather: WeatherKind,
        player_inside: bool,
    },
    /// The host's ambient effect timer fired (thunder storms use it for lightning).
    AmbientEffect,
}

/// Handle returned by [`EventSource::subscribe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Something that pushes [`HostEvent`]s to registered observers.
pub trait EventSource {
    fn subscribe(&mut self, sender: Sender<HostEvent>) -> SubscriptionId;
    /// Remove a subscription. Returns whether it existed.
    fn unsubscribe(&mut self, id: SubscriptionId) -> bool;
}

/// Simple fan-out event source.
#[derive(Debug, Default)]
pub struct EventBus {
    subscribers: Vec<(SubscriptionId, Sender<HostEvent>)>,
    next_id: u64,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver `event` to every subscriber, dropping ones whose receiver is gone.
    pub fn publish(&mut self, event: HostEvent) {
        self.subscribers.retain(|(id, sender)| {
            let alive = sender.send(event).is_ok();
            if !alive {
                log::debug!("Dropping disconnected subscriber {:?}", id);
            }
            alive
        });
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

impl EventSource for EventBus {
    fn subscribe(&mut self, sender: Sender<HostEvent>) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscribers.push((id, sender));
        id
    }

    fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sub, _)| *sub != id);
        self.subscribers.len() != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    #[test]
    fn test_publish_reaches_subscribers() {
        let mut bus = EventBus::new();
        let (tx, rx) = mpsc::channel();
        bus.subscribe(tx);

        bus.publish(HostEvent::WeatherChanged(WeatherKind::Rain));
        bus.publish(HostEvent::PlayerEnteredInterior);

        let events: Vec<_> = rx.try_iter().collect();
        assert_eq!(
            events,
            vec![HostEvent::WeatherChanged(WeatherKind::Rain), HostEvent::PlayerEnteredInterior]
        );
    }

    #[test]
    fn test_unsubscribe() {
        let mut bus = EventBus::new();
        let (tx, rx) = mpsc::channel();
        let id = bus.subscribe(tx);
        assert!(bus.unsubscribe(id));
        assert!(!bus.unsubscribe(id));

        bus.publish(HostEvent::AmbientEffect);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_disconnected_subscriber_dropped() {
        let mut bus = EventBus::new();
        let (tx, rx) = mpsc::channel();
        bus.subscribe(tx);
        drop(rx);
        bus.publish(HostEvent::AmbientEffect);
        assert_eq!(bus.subscriber_count(), 0);
    }
}
