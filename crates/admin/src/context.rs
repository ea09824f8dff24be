//! Per-request extractors.

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{FromRequest, FromRequestParts, Path, Request};
use axum::http::request::Parts;

use cms_catalog::{Catalog, Product, ProductId};
use cms_persistence::Pagination;

use crate::app::csrf::CsrfTokens;
use crate::app::errors::AppError;
use crate::app::form::FormData;
use crate::app::response::Responder;
use crate::app::services::AppServices;

/// Request-scoped view of the injected services plus what the request asked for.
#[derive(Clone)]
pub struct RequestContext {
    services: Arc<AppServices>,
    pagination: Pagination,
}

impl RequestContext {
    pub fn new(services: Arc<AppServices>, pagination: Pagination) -> Self {
        Self { services, pagination }
    }

    pub fn pagination(&self) -> Pagination {
        self.pagination
    }

    pub fn catalog(&self) -> &Catalog {
        &self.services.catalog
    }

    pub fn csrf(&self) -> &CsrfTokens {
        &self.services.csrf
    }

    pub fn responder(&self) -> &Responder {
        &self.services.responder
    }
}

fn services(parts: &Parts) -> Result<Arc<AppServices>, AppError> {
    parts
        .extensions
        .get::<Arc<AppServices>>()
        .cloned()
        .ok_or(AppError::Internal("app services missing from request extensions"))
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for RequestContext
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let services = services(parts)?;
        let query: HashMap<String, String> = parts
            .uri
            .query()
            .map(|q| url::form_urlencoded::parse(q.as_bytes()).into_owned().collect())
            .unwrap_or_default();
        let pagination = Pagination::from_query(
            query.get("page").map(String::as_str),
            query.get("per_page").map(String::as_str),
            services.default_page_size,
        );
        Ok(Self::new(services, pagination))
    }
}

/// The product named by the `:id` path segment; unknown or malformed ids are 404.
pub struct ProductParam(pub Product);

#[axum::async_trait]
impl<S> FromRequestParts<S> for ProductParam
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| AppError::NotFound)?;
        let id: ProductId = raw.parse().map_err(|_| AppError::NotFound)?;

        let services = services(parts)?;
        let product = services
            .catalog
            .provider
            .get(&id)
            .await?
            .ok_or(AppError::NotFound)?;
        Ok(Self(product))
    }
}

/// Urlencoded form body; a missing or wrong content type is a JSON error.
pub struct Submission(pub FormData);

#[axum::async_trait]
impl<S> FromRequest<S> for Submission
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let axum::Form(data) = axum::Form::<FormData>::from_request(req, state).await?;
        Ok(Self(data))
    }
}
