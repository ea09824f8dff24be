//! Persistence layer: entity stores, unit of work, lifecycle hooks.
//!
//! - `store`: storage abstraction (`EntityStore`) + in-memory implementation
//! - `manager`: `EntityManager`, which fires lifecycle events before each write
//! - `lifecycle`: lifecycle events and the subscriber registry
//! - `timestamp`: the creation/update timestamp subscriber
//! - `pagination`: page parameters and paged results
//! - `clock`: time source used by hooks

pub mod clock;
pub mod lifecycle;
pub mod manager;
pub mod pagination;
pub mod store;
pub mod timestamp;

pub use clock::{Clock, ManualClock, SystemClock};
pub use lifecycle::{EventManager, LifecycleEvent, LifecycleSubscriber};
pub use manager::EntityManager;
pub use pagination::{Page, Pagination, PaginationView};
pub use store::{
    Direction, EntityStore, FieldOrder, InMemoryEntityStore, ListQuery, OrderBy, StoreError,
};
pub use timestamp::TimestampSubscriber;
