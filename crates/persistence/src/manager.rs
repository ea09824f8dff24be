//! Entity manager: the unit of work for one entity type.

use std::marker::PhantomData;

use cms_core::Entity;

use crate::lifecycle::{EventManager, LifecycleEvent};
use crate::pagination::Page;
use crate::store::{EntityStore, ListQuery, StoreError};

/// Writes entities through a store, firing lifecycle events first.
///
/// Lifecycle subscribers run synchronously on the caller's task and always
/// finish before the store is called, so whatever they change is part of the
/// same write. Store failures are returned as-is.
#[derive(Debug)]
pub struct EntityManager<E, S> {
    store: S,
    events: EventManager,
    _entity: PhantomData<fn() -> E>,
}

impl<E, S> EntityManager<E, S>
where
    E: Entity + Send + Sync + 'static,
    S: EntityStore<E>,
{
    pub fn new(store: S, events: EventManager) -> Self {
        Self {
            store,
            events,
            _entity: PhantomData,
        }
    }

    pub async fn find(&self, id: &E::Id) -> Result<Option<E>, StoreError> {
        self.store.get(id).await
    }

    pub async fn list(&self, query: &ListQuery) -> Result<Page<E>, StoreError> {
        self.store.list(query).await
    }

    /// Inserts a new entity (`PrePersist` hooks first).
    pub async fn persist(&self, entity: &mut E) -> Result<(), StoreError> {
        self.events.dispatch(LifecycleEvent::PrePersist, entity);
        self.store.insert(entity).await?;
        tracing::debug!(id = ?entity.id(), "entity inserted");
        Ok(())
    }

    /// Writes back an existing entity (`PreUpdate` hooks first).
    pub async fn update(&self, entity: &mut E) -> Result<(), StoreError> {
        self.events.dispatch(LifecycleEvent::PreUpdate, entity);
        self.store.update(entity).await?;
        tracing::debug!(id = ?entity.id(), "entity updated");
        Ok(())
    }

    pub async fn remove(&self, id: &E::Id) -> Result<(), StoreError> {
        self.store.remove(id).await?;
        tracing::debug!(?id, "entity removed");
        Ok(())
    }
}
