//! Entity trait: identity + continuity across state changes.

use crate::capability::Capabilities;

/// Entity marker + minimal interface.
///
/// Every entity also answers capability queries, so lifecycle hooks can be
/// attached to it without knowing its concrete type.
pub trait Entity: Capabilities {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug + Send + Sync + 'static;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;
}
