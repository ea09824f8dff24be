//! Catalog module: the `Product` entity and the services the CMS drives it with.
//!
//! - [`ProductProvider`] is the read side (listings, lookups).
//! - [`ProductProcessor`] is the write side; every write goes through the
//!   [`EntityManager`](cms_persistence::EntityManager), so lifecycle hooks
//!   (timestamps) apply.

pub mod dto;
pub mod error;
#[cfg(feature = "postgres")]
pub mod postgres;
pub mod processor;
pub mod product;
pub mod provider;

use std::sync::Arc;

use cms_persistence::{EntityManager, EntityStore, EventManager, InMemoryEntityStore};

pub use dto::{DeleteDto, MetaDto, ProductDto, ProductPatch};
pub use error::{CatalogError, CatalogResult};
pub use processor::ProductProcessor;
pub use product::{Product, ProductId, ProductMeta, slugify};
pub use provider::ProductProvider;

/// Store handle shared by the provider and the processor.
pub type ProductStore = Arc<dyn EntityStore<Product>>;

/// Entity manager for products.
pub type ProductManager = EntityManager<Product, ProductStore>;

/// Read and write services over one product store.
#[derive(Clone)]
pub struct Catalog {
    pub provider: ProductProvider,
    pub processor: ProductProcessor,
}

impl Catalog {
    pub fn new(store: ProductStore, events: EventManager) -> Self {
        let em = Arc::new(EntityManager::new(store, events));
        Self {
            provider: ProductProvider::new(em.clone()),
            processor: ProductProcessor::new(em),
        }
    }

    pub fn in_memory(events: EventManager) -> Self {
        Self::new(Arc::new(InMemoryEntityStore::<Product>::new()), events)
    }
}
