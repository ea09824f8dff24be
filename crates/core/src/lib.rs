//! `cms-core`: building blocks shared by every CMS module.
//!
//! This crate contains **pure domain** primitives (no IO, no HTTP, no storage).

pub mod capability;
pub mod entity;
pub mod error;
pub mod id;

pub use capability::{Capabilities, TimestampCreate, TimestampUpdate};
pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::EntityId;
