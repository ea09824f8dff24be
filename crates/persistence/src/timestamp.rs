//! Creation/update timestamp subscriber.

use std::sync::Arc;

use cms_core::Capabilities;

use crate::clock::{Clock, SystemClock};
use crate::lifecycle::{LifecycleEvent, LifecycleSubscriber};

/// Stamps `created_datetime` / `updated_datetime` on entities that opt in via
/// [`TimestampCreate`](cms_core::TimestampCreate) and
/// [`TimestampUpdate`](cms_core::TimestampUpdate).
///
/// - pre-persist: sets the creation instant if it is still unset, and always
///   sets the update instant (an entity never updated carries an update
///   timestamp equal to its creation timestamp).
/// - pre-update: sets the update instant; the creation instant is left alone.
#[derive(Debug, Clone)]
pub struct TimestampSubscriber {
    clock: Arc<dyn Clock>,
}

impl Default for TimestampSubscriber {
    fn default() -> Self {
        Self::new(Arc::new(SystemClock::new()))
    }
}

impl TimestampSubscriber {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }
}

impl LifecycleSubscriber for TimestampSubscriber {
    fn subscribed_events(&self) -> &'static [LifecycleEvent] {
        &[LifecycleEvent::PreUpdate, LifecycleEvent::PrePersist]
    }

    fn pre_persist(&self, entity: &mut dyn Capabilities) {
        let now = self.clock.now();

        if let Some(created) = entity.timestamp_create() {
            if created.created_datetime().is_none() {
                created.set_created_datetime(now);
            }
        }

        if let Some(updated) = entity.timestamp_update() {
            updated.set_updated_datetime(now);
        }
    }

    fn pre_update(&self, entity: &mut dyn Capabilities) {
        if let Some(updated) = entity.timestamp_update() {
            updated.set_updated_datetime(self.clock.now());
        }
    }
}
