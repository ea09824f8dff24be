//! Capability markers an entity may opt into.
//!
//! Capabilities are orthogonal: an entity can provide none, one or both. They
//! are discovered through [`Capabilities`], never by concrete type, so any
//! entity in the system can take part in cross-cutting persistence behavior.

use chrono::{DateTime, Utc};

/// The entity records when it was first stored.
///
/// Once set, the creation instant must never change.
pub trait TimestampCreate {
    fn created_datetime(&self) -> Option<DateTime<Utc>>;

    fn set_created_datetime(&mut self, at: DateTime<Utc>);
}

/// The entity records when it was last written.
pub trait TimestampUpdate {
    fn updated_datetime(&self) -> Option<DateTime<Utc>>;

    fn set_updated_datetime(&mut self, at: DateTime<Utc>);
}

/// Capability query interface (object safe).
///
/// The defaults answer "not supported"; an entity opts in by returning
/// `Some(self)` from the matching method.
pub trait Capabilities {
    fn timestamp_create(&mut self) -> Option<&mut dyn TimestampCreate> {
        None
    }

    fn timestamp_update(&mut self) -> Option<&mut dyn TimestampUpdate> {
        None
    }
}
