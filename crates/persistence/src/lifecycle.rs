//! Lifecycle events fired by the entity manager before it writes.

use std::sync::Arc;

use cms_core::Capabilities;

/// Points in an entity's write path where subscribers may mutate it.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum LifecycleEvent {
    /// Before a new entity is inserted.
    PrePersist,
    /// Before an existing entity is written back.
    PreUpdate,
}

/// Synchronous listener attached to an [`EventManager`].
///
/// Subscribers receive the entity as a capability query object and must not
/// block or perform IO; they run inside the caller's write, strictly before
/// the store sees the entity.
pub trait LifecycleSubscriber: Send + Sync {
    /// Events this subscriber wants to receive.
    fn subscribed_events(&self) -> &'static [LifecycleEvent];

    fn pre_persist(&self, _entity: &mut dyn Capabilities) {}

    fn pre_update(&self, _entity: &mut dyn Capabilities) {}
}

/// Ordered registry of lifecycle subscribers.
#[derive(Clone, Default)]
pub struct EventManager {
    subscribers: Vec<Arc<dyn LifecycleSubscriber>>,
}

impl core::fmt::Debug for EventManager {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("EventManager")
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

impl EventManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_subscriber(mut self, subscriber: Arc<dyn LifecycleSubscriber>) -> Self {
        self.add_subscriber(subscriber);
        self
    }

    pub fn add_subscriber(&mut self, subscriber: Arc<dyn LifecycleSubscriber>) {
        self.subscribers.push(subscriber);
    }

    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }

    /// Calls every subscriber registered for `event`, in registration order.
    pub fn dispatch(&self, event: LifecycleEvent, entity: &mut dyn Capabilities) {
        for subscriber in &self.subscribers {
            if !subscriber.subscribed_events().contains(&event) {
                continue;
            }
            match event {
                LifecycleEvent::PrePersist => subscriber.pre_persist(entity),
                LifecycleEvent::PreUpdate => subscriber.pre_update(entity),
            }
        }
        tracing::trace!(?event, subscribers = self.subscribers.len(), "lifecycle event dispatched");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct Plain;
    impl Capabilities for Plain {}

    #[derive(Default)]
    struct Recorder {
        seen: Mutex<Vec<(&'static str, LifecycleEvent)>>,
        name: &'static str,
        events: &'static [LifecycleEvent],
    }

    impl LifecycleSubscriber for Recorder {
        fn subscribed_events(&self) -> &'static [LifecycleEvent] {
            self.events
        }

        fn pre_persist(&self, _entity: &mut dyn Capabilities) {
            self.seen.lock().unwrap().push((self.name, LifecycleEvent::PrePersist));
        }

        fn pre_update(&self, _entity: &mut dyn Capabilities) {
            self.seen.lock().unwrap().push((self.name, LifecycleEvent::PreUpdate));
        }
    }

    #[test]
    fn only_subscribed_events_are_delivered() {
        let persist_only = Arc::new(Recorder {
            name: "persist",
            events: &[LifecycleEvent::PrePersist],
            ..Default::default()
        });
        let both = Arc::new(Recorder {
            name: "both",
            events: &[LifecycleEvent::PrePersist, LifecycleEvent::PreUpdate],
            ..Default::default()
        });
        let manager = EventManager::new()
            .with_subscriber(persist_only.clone())
            .with_subscriber(both.clone());
        assert_eq!(manager.len(), 2);

        manager.dispatch(LifecycleEvent::PreUpdate, &mut Plain);
        manager.dispatch(LifecycleEvent::PrePersist, &mut Plain);

        assert_eq!(
            *persist_only.seen.lock().unwrap(),
            vec![("persist", LifecycleEvent::PrePersist)]
        );
        assert_eq!(
            *both.seen.lock().unwrap(),
            vec![("both", LifecycleEvent::PreUpdate), ("both", LifecycleEvent::PrePersist)]
        );
    }

    #[test]
    fn empty_manager_is_a_no_op() {
        let manager = EventManager::new();
        assert!(manager.is_empty());
        manager.dispatch(LifecycleEvent::PrePersist, &mut Plain);
    }
}
