use axum::extract::rejection::FormRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

use cms_catalog::CatalogError;
use cms_core::DomainError;
use cms_persistence::StoreError;

use crate::app::render::RenderError;
use crate::app::routing::RoutingError;

/// Handler error; converts into a JSON error response.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("not found")]
    NotFound,

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Form(#[from] FormRejection),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error(transparent)]
    Routing(#[from] RoutingError),

    #[error("{0}")]
    Internal(&'static str),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::NotFound => json_error(StatusCode::NOT_FOUND, "not_found", "not found"),
            AppError::Catalog(err) => catalog_error_to_response(err),
            AppError::Form(rejection) => json_error(rejection.status(), "invalid_form", rejection.body_text()),
            AppError::Render(err) => {
                tracing::error!(error = %err, "render failed");
                internal_error()
            }
            AppError::Routing(err) => {
                tracing::error!(error = %err, "url generation failed");
                internal_error()
            }
            AppError::Internal(msg) => {
                tracing::error!(error = msg, "internal error");
                internal_error()
            }
        }
    }
}

fn catalog_error_to_response(err: CatalogError) -> Response {
    if err.is_not_found() {
        return json_error(StatusCode::NOT_FOUND, "not_found", "not found");
    }
    match err {
        CatalogError::Domain(DomainError::Validation(msg)) => {
            json_error(StatusCode::BAD_REQUEST, "validation_error", msg)
        }
        CatalogError::Domain(DomainError::InvalidId(msg)) => {
            json_error(StatusCode::BAD_REQUEST, "invalid_id", msg)
        }
        CatalogError::Domain(DomainError::Conflict(msg)) | CatalogError::Store(StoreError::Conflict(msg)) => {
            json_error(StatusCode::CONFLICT, "conflict", msg)
        }
        other => {
            tracing::error!(error = %other, "store error");
            internal_error()
        }
    }
}

fn internal_error() -> Response {
    json_error(
        StatusCode::INTERNAL_SERVER_ERROR,
        "internal_error",
        "internal server error",
    )
}

pub fn json_error(status: StatusCode, code: &'static str, message: impl Into<String>) -> Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_maps_to_404() {
        assert_eq!(AppError::NotFound.into_response().status(), StatusCode::NOT_FOUND);
        let err = AppError::Catalog(CatalogError::Store(StoreError::NotFound));
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn backend_failures_map_to_500() {
        let err = AppError::Catalog(CatalogError::Store(StoreError::Backend("disk on fire".into())));
        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);

        let err = AppError::Render(RenderError::TemplateNotFound("x".into()));
        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn conflicts_map_to_409() {
        let err = AppError::Catalog(CatalogError::Store(StoreError::Conflict("dup".into())));
        assert_eq!(err.into_response().status(), StatusCode::CONFLICT);
    }
}
