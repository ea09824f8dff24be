//! Named routes and URL generation.

use thiserror::Error;
use url::Url;

pub const PRODUCT_INDEX: &str = "cms_product_index";
pub const PRODUCT_CREATE: &str = "cms_product_create";
pub const PRODUCT_EDIT: &str = "cms_product_edit";
pub const PRODUCT_META: &str = "cms_product_meta";
pub const PRODUCT_DELETE: &str = "cms_product_delete";
pub const PRODUCT_BLOCK_INDEX: &str = "cms_product_block_index";

const ROUTES: &[(&str, &str)] = &[
    (PRODUCT_INDEX, "/product"),
    (PRODUCT_CREATE, "/product/create"),
    (PRODUCT_EDIT, "/product/edit/:id"),
    (PRODUCT_META, "/product/meta/:id"),
    (PRODUCT_DELETE, "/product/delete"),
    (PRODUCT_BLOCK_INDEX, "/product/:parent/block"),
];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RoutingError {
    #[error("unknown route {0:?}")]
    UnknownRoute(String),

    #[error("route {route:?} requires parameter {param:?}")]
    MissingParameter { route: String, param: String },
}

/// Route name -> path pattern (`:name` segments are parameters).
#[derive(Debug, Clone, Copy)]
pub struct RouteTable {
    routes: &'static [(&'static str, &'static str)],
}

impl Default for RouteTable {
    fn default() -> Self {
        Self { routes: ROUTES }
    }
}

impl RouteTable {
    pub fn pattern(&self, name: &str) -> Option<&'static str> {
        self.routes
            .iter()
            .find(|(route, _)| *route == name)
            .map(|(_, pattern)| *pattern)
    }

    /// Fills path parameters from `params`; parameters the path does not use
    /// become the query string.
    pub fn url_for(&self, name: &str, params: &[(&str, String)]) -> Result<String, RoutingError> {
        let pattern = self
            .pattern(name)
            .ok_or_else(|| RoutingError::UnknownRoute(name.to_string()))?;

        let mut url = Url::parse("http://localhost/").map_err(|_| RoutingError::UnknownRoute(name.to_string()))?;
        let mut used = Vec::new();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| RoutingError::UnknownRoute(name.to_string()))?;
            segments.clear();
            for segment in pattern.split('/').filter(|s| !s.is_empty()) {
                match segment.strip_prefix(':') {
                    Some(param) => {
                        let value = params
                            .iter()
                            .find(|(key, _)| *key == param)
                            .map(|(_, value)| value.as_str())
                            .ok_or_else(|| RoutingError::MissingParameter {
                                route: name.to_string(),
                                param: param.to_string(),
                            })?;
                        used.push(param);
                        segments.push(value);
                    }
                    None => {
                        segments.push(segment);
                    }
                }
            }
        }

        let extra: Vec<_> = params.iter().filter(|(key, _)| !used.contains(key)).collect();
        if !extra.is_empty() {
            let mut query = url.query_pairs_mut();
            for (key, value) in extra {
                query.append_pair(key, value);
            }
        }

        Ok(match url.query() {
            Some(query) => format!("{}?{}", url.path(), query),
            None => url.path().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_routes() {
        let routes = RouteTable::default();
        assert_eq!(routes.url_for(PRODUCT_INDEX, &[]).unwrap(), "/product");
        assert_eq!(routes.url_for(PRODUCT_DELETE, &[]).unwrap(), "/product/delete");
    }

    #[test]
    fn path_parameters_are_filled() {
        let routes = RouteTable::default();
        assert_eq!(
            routes.url_for(PRODUCT_EDIT, &[("id", "abc".to_string())]).unwrap(),
            "/product/edit/abc"
        );
        assert_eq!(
            routes
                .url_for(PRODUCT_BLOCK_INDEX, &[("parent", "abc".to_string())])
                .unwrap(),
            "/product/abc/block"
        );
    }

    #[test]
    fn extra_parameters_go_to_the_query_string() {
        let routes = RouteTable::default();
        assert_eq!(
            routes.url_for(PRODUCT_INDEX, &[("page", "2".to_string())]).unwrap(),
            "/product?page=2"
        );
    }

    #[test]
    fn values_are_escaped() {
        let routes = RouteTable::default();
        assert_eq!(
            routes.url_for(PRODUCT_EDIT, &[("id", "a/b c".to_string())]).unwrap(),
            "/product/edit/a%2Fb%20c"
        );
    }

    #[test]
    fn errors() {
        let routes = RouteTable::default();
        assert_eq!(
            routes.url_for("nope", &[]).unwrap_err(),
            RoutingError::UnknownRoute("nope".to_string())
        );
        assert!(matches!(
            routes.url_for(PRODUCT_META, &[]).unwrap_err(),
            RoutingError::MissingParameter { .. }
        ));
    }
}
