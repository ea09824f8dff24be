//! Section navigation for the product screens.

use serde::Serialize;

use cms_catalog::Product;

use crate::app::routing::{
    PRODUCT_BLOCK_INDEX, PRODUCT_CREATE, PRODUCT_EDIT, PRODUCT_INDEX, PRODUCT_META, RouteTable,
    RoutingError,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavItem {
    /// Translation key.
    pub label: &'static str,
    pub route: &'static str,
    pub params: Vec<(&'static str, String)>,
}

impl NavItem {
    fn new(label: &'static str, route: &'static str) -> Self {
        Self {
            label,
            route,
            params: Vec::new(),
        }
    }

    fn with_param(mut self, name: &'static str, value: String) -> Self {
        self.params.push((name, value));
        self
    }
}

/// A nav item with its URL resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavLink {
    pub label: &'static str,
    pub route: &'static str,
    pub url: String,
}

/// Index and create always; the entity screens only once a product exists.
pub fn product_navigation(product: Option<&Product>) -> Vec<NavItem> {
    let mut items = vec![
        NavItem::new("common.nav.index", PRODUCT_INDEX),
        NavItem::new("common.nav.create", PRODUCT_CREATE),
    ];
    if let Some(product) = product {
        let id = product.id_typed().to_string();
        items.push(NavItem::new("common.nav.edit", PRODUCT_EDIT).with_param("id", id.clone()));
        items.push(NavItem::new("common.nav.blocks", PRODUCT_BLOCK_INDEX).with_param("parent", id.clone()));
        items.push(NavItem::new("common.nav.meta", PRODUCT_META).with_param("id", id));
    }
    items
}

pub fn resolve(routes: &RouteTable, items: &[NavItem]) -> Result<Vec<NavLink>, RoutingError> {
    items
        .iter()
        .map(|item| {
            let params: Vec<(&str, String)> = item.params.iter().map(|(k, v)| (*k, v.clone())).collect();
            Ok(NavLink {
                label: item.label,
                route: item.route,
                url: routes.url_for(item.route, &params)?,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use cms_catalog::ProductId;

    fn routes_of(items: &[NavItem]) -> Vec<&'static str> {
        items.iter().map(|i| i.route).collect()
    }

    #[test]
    fn without_product_only_index_and_create() {
        let items = product_navigation(None);
        assert_eq!(routes_of(&items), vec![PRODUCT_INDEX, PRODUCT_CREATE]);
        assert!(items.iter().all(|i| i.params.is_empty()));
    }

    #[test]
    fn with_product_all_five_entries() {
        let product = Product::new(ProductId::generate());
        let id = product.id_typed().to_string();
        let items = product_navigation(Some(&product));

        assert_eq!(
            routes_of(&items),
            vec![PRODUCT_INDEX, PRODUCT_CREATE, PRODUCT_EDIT, PRODUCT_BLOCK_INDEX, PRODUCT_META]
        );
        assert_eq!(items[2].params, vec![("id", id.clone())]);
        assert_eq!(items[3].params, vec![("parent", id.clone())]);
        assert_eq!(items[4].params, vec![("id", id)]);
        assert_eq!(items[3].label, "common.nav.blocks");
    }

    #[test]
    fn resolves_urls() {
        let product = Product::new(ProductId::generate());
        let id = product.id_typed().to_string();
        let links = resolve(&RouteTable::default(), &product_navigation(Some(&product))).unwrap();
        let urls: Vec<_> = links.iter().map(|l| l.url.clone()).collect();
        assert_eq!(
            urls,
            vec![
                "/product".to_string(),
                "/product/create".to_string(),
                format!("/product/edit/{id}"),
                format!("/product/{id}/block"),
                format!("/product/meta/{id}"),
            ]
        );
    }
}
