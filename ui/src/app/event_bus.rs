use crate::components::common::Msg;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex, PoisonError};

/// Application-scoped publish/subscribe channel for [`Msg`].
///
/// Every subscriber gets its own copy of each message, in publish order.
/// Subscribers whose receiver was dropped are pruned on the next publish.
#[derive(Clone, Default)]
pub struct EventBus {
    subscribers: Arc<Mutex<Vec<Sender<Msg>>>>,
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self) -> Receiver<Msg> {
        let (tx, rx) = mpsc::channel();
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(tx);
        rx
    }

    /// Returns how many subscribers received the message.
    pub fn publish(&self, msg: Msg) -> usize {
        log::debug!("Publishing {}", msg.event_name());
        let mut subscribers = self
            .subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        subscribers.retain(|tx| tx.send(msg.clone()).is_ok());
        subscribers.len()
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::common::{SearchActivityMsg, SidebarActivityMsg};
    use claims::*;

    #[test]
    fn test_every_subscriber_sees_every_message_in_order() {
        let bus = EventBus::new();
        let first = bus.subscribe();
        let second = bus.subscribe();

        assert_eq!(bus.publish(Msg::SidebarActivity(SidebarActivityMsg::Opened)), 2);
        assert_eq!(bus.publish(Msg::SearchActivity(SearchActivityMsg::Opened)), 2);

        for rx in [&first, &second] {
            assert_eq!(
                assert_ok!(rx.try_recv()),
                Msg::SidebarActivity(SidebarActivityMsg::Opened)
            );
            assert_eq!(
                assert_ok!(rx.try_recv()),
                Msg::SearchActivity(SearchActivityMsg::Opened)
            );
        }
    }

    #[test]
    fn test_dropped_subscribers_are_pruned() {
        let bus = EventBus::new();
        let kept = bus.subscribe();
        drop(bus.subscribe());

        assert_eq!(bus.publish(Msg::SidebarActivity(SidebarActivityMsg::Closed)), 1);
        assert_eq!(bus.subscriber_count(), 1);
        assert_ok!(kept.try_recv());
    }

    #[test]
    fn test_clones_share_subscribers() {
        let bus = EventBus::new();
        let rx = bus.subscribe();
        bus.clone()
            .publish(Msg::SidebarActivity(SidebarActivityMsg::Closed));
        assert_ok!(rx.try_recv());
    }
}
