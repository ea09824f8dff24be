//! HTTP application wiring (Axum router + service wiring).
//!
//! - `services.rs`: store and catalog wiring
//! - `routes/`: HTTP routes + handlers
//! - `form.rs` / `forms.rs`: form binding and validation
//! - `routing.rs` / `navigation.rs`: named routes and section navigation
//! - `render.rs` / `response.rs`: view rendering and response envelopes
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{Extension, Router, routing::get};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::config::AppConfig;

pub mod csrf;
pub mod errors;
pub mod form;
pub mod forms;
pub mod navigation;
pub mod render;
pub mod response;
pub mod routes;
pub mod routing;
pub mod services;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub async fn build_app(config: &AppConfig) -> anyhow::Result<Router> {
    let services = Arc::new(services::build_services(config).await?);
    Ok(router_with_services(services))
}

/// Router over already-built services (tests inject their own stores here).
pub fn router_with_services(services: Arc<services::AppServices>) -> Router {
    Router::new()
        .route("/health", get(routes::system::health))
        .merge(routes::router())
        .layer(Extension(services))
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
}
