//! Entity storage abstraction.
//!
//! Stores are plain key/value persistence for one entity type. They never run
//! lifecycle hooks themselves; writes that need hooks go through
//! [`EntityManager`](crate::EntityManager).

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use cms_core::Entity;
use thiserror::Error;

use crate::pagination::{Page, Pagination};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("record not found")]
    NotFound,

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("unknown order field: {0}")]
    UnknownField(String),

    #[error("storage backend failure: {0}")]
    Backend(String),

    #[cfg(feature = "postgres")]
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Sort direction.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

impl Direction {
    pub fn as_sql(&self) -> &'static str {
        match self {
            Direction::Asc => "ASC",
            Direction::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    pub field: String,
    pub direction: Direction,
}

/// Listing request: ordering + page.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ListQuery {
    pub order_by: Vec<OrderBy>,
    pub pagination: Pagination,
}

impl ListQuery {
    pub fn new(pagination: Pagination) -> Self {
        Self {
            order_by: Vec::new(),
            pagination,
        }
    }

    pub fn order_by(mut self, field: impl Into<String>, direction: Direction) -> Self {
        self.order_by.push(OrderBy {
            field: field.into(),
            direction,
        });
        self
    }
}

/// Field-wise comparison used by stores that sort in memory.
pub trait FieldOrder {
    /// Field names accepted by [`FieldOrder::compare_field`].
    const SORTABLE_FIELDS: &'static [&'static str];

    /// Compares two records on `field`; only called with names from
    /// [`FieldOrder::SORTABLE_FIELDS`].
    fn compare_field(&self, other: &Self, field: &str) -> Ordering;
}

/// Persistence for a single entity type.
#[async_trait]
pub trait EntityStore<E>: Send + Sync
where
    E: Entity + Send + Sync + 'static,
{
    async fn get(&self, id: &E::Id) -> Result<Option<E>, StoreError>;

    /// Fails with [`StoreError::Conflict`] when the id is already taken.
    async fn insert(&self, entity: &E) -> Result<(), StoreError>;

    /// Fails with [`StoreError::NotFound`] when the id is unknown.
    async fn update(&self, entity: &E) -> Result<(), StoreError>;

    /// Fails with [`StoreError::NotFound`] when the id is unknown.
    async fn remove(&self, id: &E::Id) -> Result<(), StoreError>;

    async fn list(&self, query: &ListQuery) -> Result<Page<E>, StoreError>;
}

#[async_trait]
impl<E, S> EntityStore<E> for Arc<S>
where
    E: Entity + Send + Sync + 'static,
    S: EntityStore<E> + ?Sized,
{
    async fn get(&self, id: &E::Id) -> Result<Option<E>, StoreError> {
        (**self).get(id).await
    }

    async fn insert(&self, entity: &E) -> Result<(), StoreError> {
        (**self).insert(entity).await
    }

    async fn update(&self, entity: &E) -> Result<(), StoreError> {
        (**self).update(entity).await
    }

    async fn remove(&self, id: &E::Id) -> Result<(), StoreError> {
        (**self).remove(id).await
    }

    async fn list(&self, query: &ListQuery) -> Result<Page<E>, StoreError> {
        (**self).list(query).await
    }
}

/// In-memory store for tests/dev.
///
/// Records are kept in id order, which is also the tie-breaker when the
/// requested ordering considers two records equal.
#[derive(Debug)]
pub struct InMemoryEntityStore<E: Entity> {
    inner: RwLock<BTreeMap<E::Id, E>>,
}

impl<E: Entity> InMemoryEntityStore<E> {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(BTreeMap::new()),
        }
    }
}

impl<E: Entity> Default for InMemoryEntityStore<E> {
    fn default() -> Self {
        Self::new()
    }
}

fn poisoned<T>(_: T) -> StoreError {
    StoreError::Backend("in-memory store lock poisoned".to_string())
}

fn check_fields<E: FieldOrder>(query: &ListQuery) -> Result<(), StoreError> {
    match query
        .order_by
        .iter()
        .find(|o| !E::SORTABLE_FIELDS.contains(&o.field.as_str()))
    {
        Some(unknown) => Err(StoreError::UnknownField(unknown.field.clone())),
        None => Ok(()),
    }
}

#[async_trait]
impl<E> EntityStore<E> for InMemoryEntityStore<E>
where
    E: Entity + FieldOrder + Clone + Send + Sync + 'static,
    E::Id: Ord,
{
    async fn get(&self, id: &E::Id) -> Result<Option<E>, StoreError> {
        let map = self.inner.read().map_err(poisoned)?;
        Ok(map.get(id).cloned())
    }

    async fn insert(&self, entity: &E) -> Result<(), StoreError> {
        let mut map = self.inner.write().map_err(poisoned)?;
        if map.contains_key(entity.id()) {
            return Err(StoreError::Conflict(format!(
                "record {:?} already exists",
                entity.id()
            )));
        }
        map.insert(entity.id().clone(), entity.clone());
        Ok(())
    }

    async fn update(&self, entity: &E) -> Result<(), StoreError> {
        let mut map = self.inner.write().map_err(poisoned)?;
        match map.get_mut(entity.id()) {
            Some(slot) => {
                *slot = entity.clone();
                Ok(())
            }
            None => Err(StoreError::NotFound),
        }
    }

    async fn remove(&self, id: &E::Id) -> Result<(), StoreError> {
        let mut map = self.inner.write().map_err(poisoned)?;
        map.remove(id).map(|_| ()).ok_or(StoreError::NotFound)
    }

    async fn list(&self, query: &ListQuery) -> Result<Page<E>, StoreError> {
        check_fields::<E>(query)?;

        let mut items: Vec<E> = {
            let map = self.inner.read().map_err(poisoned)?;
            map.values().cloned().collect()
        };

        // Stable sort: equal records keep id order.
        items.sort_by(|a, b| {
            query
                .order_by
                .iter()
                .map(|o| {
                    let ord = a.compare_field(b, &o.field);
                    match o.direction {
                        Direction::Asc => ord,
                        Direction::Desc => ord.reverse(),
                    }
                })
                .find(|ord| *ord != Ordering::Equal)
                .unwrap_or(Ordering::Equal)
        });

        let total = items.len() as u64;
        let items = items
            .into_iter()
            .skip(query.pagination.offset())
            .take(query.pagination.limit())
            .collect();

        Ok(Page {
            items,
            total,
            pagination: query.pagination,
        })
    }
}
