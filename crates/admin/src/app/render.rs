//! Template rendering seam.
//!
//! Handlers only name a template and hand over a JSON context; the default
//! [`JsonRenderer`] returns both as a JSON document so any front end (or a
//! test) can consume the view data directly.

use serde_json::{Value, json};
use thiserror::Error;

pub const PRODUCT_INDEX_TEMPLATE: &str = "cms/catalog/product/index.html.twig";
pub const PRODUCT_CREATE_TEMPLATE: &str = "cms/catalog/product/create.html.twig";
pub const PRODUCT_EDIT_TEMPLATE: &str = "cms/catalog/product/edit.html.twig";

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("template {0:?} not found")]
    TemplateNotFound(String),

    #[error("failed to render {template}: {message}")]
    Failed { template: String, message: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub content_type: &'static str,
    pub body: String,
}

pub trait Renderer: Send + Sync {
    fn render(&self, template: &str, context: &Value) -> Result<Rendered, RenderError>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct JsonRenderer;

impl Renderer for JsonRenderer {
    fn render(&self, template: &str, context: &Value) -> Result<Rendered, RenderError> {
        if template.is_empty() {
            return Err(RenderError::TemplateNotFound(template.to_string()));
        }
        let body = serde_json::to_string(&json!({
            "template": template,
            "context": context,
        }))
        .map_err(|e| RenderError::Failed {
            template: template.to_string(),
            message: e.to_string(),
        })?;
        Ok(Rendered {
            content_type: "application/json",
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_renderer_wraps_template_and_context() {
        let rendered = JsonRenderer
            .render(PRODUCT_INDEX_TEMPLATE, &json!({"entities": []}))
            .unwrap();
        assert_eq!(rendered.content_type, "application/json");

        let body: Value = serde_json::from_str(&rendered.body).unwrap();
        assert_eq!(body["template"], PRODUCT_INDEX_TEMPLATE);
        assert_eq!(body["context"]["entities"], json!([]));
    }

    #[test]
    fn empty_template_name_is_an_error() {
        assert!(matches!(
            JsonRenderer.render("", &Value::Null),
            Err(RenderError::TemplateNotFound(_))
        ));
    }
}
