//! Request-scoped view models bound from CMS forms.

use serde::Serialize;
use validator::{Validate, ValidationError};

use crate::product::{Product, ProductId, ProductMeta};

/// A form model that can be written onto a product.
pub trait ProductPatch: Validate + Send + Sync {
    fn apply(&self, product: &mut Product);
}

/// Main product form.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Validate)]
pub struct ProductDto {
    #[validate(length(min = 1, max = 255, message = "Name must be between 1 and 255 characters."))]
    pub name: String,

    /// Left empty, the slug is derived from the name.
    #[validate(
        length(max = 255, message = "Slug must be at most 255 characters."),
        custom(function = "validate_slug")
    )]
    pub slug: String,

    #[validate(length(max = 65535, message = "Description is too long."))]
    pub description: String,

    #[validate(range(min = 0, max = 1_000_000, message = "Sort order must be between 0 and 1000000."))]
    pub sort_order: i32,

    pub enabled: bool,
}

impl ProductDto {
    pub fn from_entity(product: &Product) -> Self {
        Self {
            name: product.name().to_string(),
            slug: product.slug().to_string(),
            description: product.description().unwrap_or_default().to_string(),
            sort_order: product.sort_order(),
            enabled: product.is_enabled(),
        }
    }
}

impl ProductPatch for ProductDto {
    fn apply(&self, product: &mut Product) {
        product.set_name(self.name.trim());
        product.set_slug(self.slug.clone());
        product.set_description(non_empty(&self.description));
        product.set_sort_order(self.sort_order);
        product.set_enabled(self.enabled);
    }
}

fn validate_slug(slug: &str) -> Result<(), ValidationError> {
    let valid = slug
        .trim()
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
    if valid {
        Ok(())
    } else {
        let mut err = ValidationError::new("slug");
        err.message = Some("Slug may only contain lowercase letters, digits and dashes.".into());
        Err(err)
    }
}

/// SEO metadata form.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Validate)]
pub struct MetaDto {
    #[validate(length(max = 255, message = "Title must be at most 255 characters."))]
    pub title: String,

    #[validate(length(max = 1024, message = "Description must be at most 1024 characters."))]
    pub description: String,

    #[validate(length(max = 255, message = "Keywords must be at most 255 characters."))]
    pub keywords: String,
}

impl MetaDto {
    pub fn from_entity(product: &Product) -> Self {
        let meta = product.meta();
        Self {
            title: meta.title.clone().unwrap_or_default(),
            description: meta.description.clone().unwrap_or_default(),
            keywords: meta.keywords.clone().unwrap_or_default(),
        }
    }
}

impl ProductPatch for MetaDto {
    fn apply(&self, product: &mut Product) {
        product.set_meta(ProductMeta {
            title: non_empty(&self.title),
            description: non_empty(&self.description),
            keywords: non_empty(&self.keywords),
        });
    }
}

/// Delete confirmation form.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Validate)]
pub struct DeleteDto {
    #[validate(required(message = "This value should not be blank."))]
    pub id: Option<ProductId>,
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
