use std::sync::Arc;

use cms_persistence::{Direction, ListQuery, Page, Pagination};

use crate::error::CatalogResult;
use crate::product::{Product, ProductId};
use crate::ProductManager;

/// Read side of the catalog.
#[derive(Clone)]
pub struct ProductProvider {
    em: Arc<ProductManager>,
}

impl ProductProvider {
    pub fn new(em: Arc<ProductManager>) -> Self {
        Self { em }
    }

    /// Lists products ordered by `order` (field, direction) pairs.
    pub async fn list(
        &self,
        order: &[(&str, Direction)],
        pagination: Pagination,
    ) -> CatalogResult<Page<Product>> {
        let query = order
            .iter()
            .fold(ListQuery::new(pagination), |q, (field, dir)| q.order_by(*field, *dir));
        Ok(self.em.list(&query).await?)
    }

    pub async fn get(&self, id: &ProductId) -> CatalogResult<Option<Product>> {
        Ok(self.em.find(id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Catalog, ProductDto};
    use cms_persistence::{EventManager, StoreError};

    fn dto(name: &str, sort_order: i32) -> ProductDto {
        ProductDto {
            name: name.to_string(),
            sort_order,
            enabled: true,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn empty_catalog_lists_nothing() {
        let catalog = Catalog::in_memory(EventManager::new());
        let page = catalog
            .provider
            .list(&[("sort_order", Direction::Asc)], Pagination::default())
            .await
            .unwrap();
        assert!(page.items.is_empty());
        assert_eq!(page.total, 0);
    }

    #[tokio::test]
    async fn lists_by_sort_order_ascending() {
        let catalog = Catalog::in_memory(EventManager::new());
        for (name, order) in [("c", 30), ("a", 10), ("b", 20)] {
            catalog.processor.create(&dto(name, order)).await.unwrap();
        }
        let page = catalog
            .provider
            .list(&[("sort_order", Direction::Asc)], Pagination::default())
            .await
            .unwrap();
        let names: Vec<_> = page.items.iter().map(|p| p.name().to_string()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn unknown_sort_field_surfaces_store_error() {
        let catalog = Catalog::in_memory(EventManager::new());
        let err = catalog
            .provider
            .list(&[("price", Direction::Asc)], Pagination::default())
            .await
            .unwrap_err();
        assert!(matches!(err, crate::CatalogError::Store(StoreError::UnknownField(_))));
    }

    #[tokio::test]
    async fn get_unknown_id_is_none() {
        let catalog = Catalog::in_memory(EventManager::new());
        assert!(catalog.provider.get(&ProductId::generate()).await.unwrap().is_none());
    }
}
