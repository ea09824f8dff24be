use std::sync::Arc;

use axum::Json;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde_json::{Value, json};

use crate::app::errors::AppError;
use crate::app::form::FormErrors;
use crate::app::render::Renderer;
use crate::app::routing::RouteTable;

/// Builds the three kinds of controller responses.
#[derive(Clone)]
pub struct Responder {
    renderer: Arc<dyn Renderer>,
    routes: RouteTable,
}

impl Responder {
    pub fn new(renderer: Arc<dyn Renderer>, routes: RouteTable) -> Self {
        Self { renderer, routes }
    }

    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    pub fn url_for(&self, route: &str, params: &[(&str, String)]) -> Result<String, AppError> {
        Ok(self.routes.url_for(route, params)?)
    }

    pub fn render(&self, template: &str, context: Value) -> Result<Response, AppError> {
        let rendered = self.renderer.render(template, &context)?;
        Ok((
            StatusCode::OK,
            [(header::CONTENT_TYPE, rendered.content_type)],
            rendered.body,
        )
            .into_response())
    }

    /// `{"success": true, "redirect": <url of route>}`
    pub fn success_redirect(&self, route: &str, params: &[(&str, String)]) -> Result<Response, AppError> {
        let redirect = self.url_for(route, params)?;
        Ok(Json(json!({ "success": true, "redirect": redirect })).into_response())
    }

    pub fn rejected_form(&self, errors: &FormErrors) -> Response {
        (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({ "success": false, "errors": errors })),
        )
            .into_response()
    }
}
