use std::sync::Arc;

use cms_core::DomainError;

use crate::dto::{DeleteDto, ProductDto, ProductPatch};
use crate::error::CatalogResult;
use crate::product::{Product, ProductId};
use crate::ProductManager;

/// Write side of the catalog.
///
/// Callers hand over DTOs that already passed form validation.
#[derive(Clone)]
pub struct ProductProcessor {
    em: Arc<ProductManager>,
}

impl ProductProcessor {
    pub fn new(em: Arc<ProductManager>) -> Self {
        Self { em }
    }

    pub async fn create(&self, dto: &ProductDto) -> CatalogResult<Product> {
        let mut product = Product::new(ProductId::generate());
        dto.apply(&mut product);
        self.em.persist(&mut product).await?;
        tracing::info!(product_id = %product.id_typed(), name = product.name(), "product created");
        Ok(product)
    }

    /// Writes `dto` onto `entity` and stores it; `entity` reflects the stored state afterwards.
    pub async fn update<P: ProductPatch>(&self, dto: &P, entity: &mut Product) -> CatalogResult<()> {
        dto.apply(entity);
        self.em.update(entity).await?;
        tracing::info!(product_id = %entity.id_typed(), "product updated");
        Ok(())
    }

    pub async fn delete(&self, dto: &DeleteDto) -> CatalogResult<ProductId> {
        let id = dto
            .id
            .ok_or_else(|| DomainError::validation("product id is required"))?;
        if self.em.find(&id).await?.is_none() {
            return Err(DomainError::not_found().into());
        }
        self.em.remove(&id).await?;
        tracing::info!(product_id = %id, "product deleted");
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::{DateTime, Duration, Utc};
    use cms_core::{TimestampCreate, TimestampUpdate};
    use cms_persistence::{EventManager, ManualClock, TimestampSubscriber};

    use crate::{Catalog, CatalogError, MetaDto, ProductDto};

    use super::*;

    fn start() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2024-02-10T09:30:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    fn catalog() -> (Arc<ManualClock>, Catalog) {
        let clock = Arc::new(ManualClock::new(start()));
        let events =
            EventManager::new().with_subscriber(Arc::new(TimestampSubscriber::new(clock.clone())));
        (clock, Catalog::in_memory(events))
    }

    fn dto(name: &str) -> ProductDto {
        ProductDto {
            name: name.to_string(),
            sort_order: 1,
            enabled: true,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn create_stamps_both_timestamps() {
        let (_clock, catalog) = catalog();
        let product = catalog.processor.create(&dto("Lamp")).await.unwrap();
        assert_eq!(product.created_datetime(), Some(start()));
        assert_eq!(product.updated_datetime(), Some(start()));
        assert_eq!(product.slug(), "lamp");

        let stored = catalog.provider.get(&product.id_typed()).await.unwrap().unwrap();
        assert_eq!(stored, product);
    }

    #[tokio::test]
    async fn update_with_either_dto_moves_only_updated_datetime() {
        let (clock, catalog) = catalog();
        let mut product = catalog.processor.create(&dto("Lamp")).await.unwrap();

        clock.advance(Duration::minutes(5));
        catalog
            .processor
            .update(&dto("Desk Lamp"), &mut product)
            .await
            .unwrap();
        assert_eq!(product.name(), "Desk Lamp");
        assert_eq!(product.created_datetime(), Some(start()));
        assert_eq!(product.updated_datetime(), Some(start() + Duration::minutes(5)));

        clock.advance(Duration::minutes(5));
        let meta = MetaDto {
            title: "Desk lamps".to_string(),
            ..Default::default()
        };
        catalog.processor.update(&meta, &mut product).await.unwrap();

        let stored = catalog.provider.get(&product.id_typed()).await.unwrap().unwrap();
        assert_eq!(stored.meta().title.as_deref(), Some("Desk lamps"));
        assert_eq!(stored.name(), "Desk Lamp");
        assert_eq!(stored.created_datetime(), Some(start()));
        assert_eq!(stored.updated_datetime(), Some(start() + Duration::minutes(10)));
    }

    #[tokio::test]
    async fn delete_removes_the_product() {
        let (_clock, catalog) = catalog();
        let product = catalog.processor.create(&dto("Lamp")).await.unwrap();
        let deleted = catalog
            .processor
            .delete(&DeleteDto {
                id: Some(product.id_typed()),
            })
            .await
            .unwrap();
        assert_eq!(deleted, product.id_typed());
        assert!(catalog.provider.get(&deleted).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn delete_of_unknown_product_is_not_found() {
        let (_clock, catalog) = catalog();
        let err = catalog
            .processor
            .delete(&DeleteDto {
                id: Some(ProductId::generate()),
            })
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn delete_without_id_is_a_validation_error() {
        let (_clock, catalog) = catalog();
        let err = catalog.processor.delete(&DeleteDto { id: None }).await.unwrap_err();
        assert!(matches!(err, CatalogError::Domain(DomainError::Validation(_))));
    }
}
