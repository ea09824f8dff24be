use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use cms_core::{Capabilities, DomainError, Entity, EntityId, TimestampCreate, TimestampUpdate};
use cms_persistence::FieldOrder;

/// Product identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub EntityId);

impl ProductId {
    pub fn new(id: EntityId) -> Self {
        Self(id)
    }

    pub fn generate() -> Self {
        Self(EntityId::new())
    }
}

impl core::fmt::Display for ProductId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl core::str::FromStr for ProductId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<EntityId>().map(Self)
    }
}

/// SEO metadata edited on its own form.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProductMeta {
    pub title: Option<String>,
    pub description: Option<String>,
    pub keywords: Option<String>,
}

/// Catalog entity: Product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Product {
    id: ProductId,
    name: String,
    slug: String,
    description: Option<String>,
    sort_order: i32,
    enabled: bool,
    meta: ProductMeta,
    created_datetime: Option<DateTime<Utc>>,
    updated_datetime: Option<DateTime<Utc>>,
}

impl Product {
    /// A blank, not-yet-stored product.
    pub fn new(id: ProductId) -> Self {
        Self {
            id,
            name: String::new(),
            slug: String::new(),
            description: None,
            sort_order: 0,
            enabled: true,
            meta: ProductMeta::default(),
            created_datetime: None,
            updated_datetime: None,
        }
    }

    /// Rebuilds a product from stored columns.
    #[allow(clippy::too_many_arguments)]
    pub fn restore(
        id: ProductId,
        name: String,
        slug: String,
        description: Option<String>,
        sort_order: i32,
        enabled: bool,
        meta: ProductMeta,
        created_datetime: Option<DateTime<Utc>>,
        updated_datetime: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            id,
            name,
            slug,
            description,
            sort_order,
            enabled,
            meta,
            created_datetime,
            updated_datetime,
        }
    }

    pub fn id_typed(&self) -> ProductId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn slug(&self) -> &str {
        &self.slug
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn sort_order(&self) -> i32 {
        self.sort_order
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn meta(&self) -> &ProductMeta {
        &self.meta
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// An empty slug is derived from the name.
    pub fn set_slug(&mut self, slug: impl Into<String>) {
        let slug = slug.into();
        self.slug = if slug.trim().is_empty() {
            slugify(&self.name)
        } else {
            slug.trim().to_string()
        };
    }

    pub fn set_description(&mut self, description: Option<String>) {
        self.description = description;
    }

    pub fn set_sort_order(&mut self, sort_order: i32) {
        self.sort_order = sort_order;
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn set_meta(&mut self, meta: ProductMeta) {
        self.meta = meta;
    }
}

/// Lowercase ASCII words joined by single dashes.
pub fn slugify(value: &str) -> String {
    let mut slug = String::with_capacity(value.len());
    for c in value.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

impl TimestampCreate for Product {
    fn created_datetime(&self) -> Option<DateTime<Utc>> {
        self.created_datetime
    }

    fn set_created_datetime(&mut self, at: DateTime<Utc>) {
        self.created_datetime = Some(at);
    }
}

impl TimestampUpdate for Product {
    fn updated_datetime(&self) -> Option<DateTime<Utc>> {
        self.updated_datetime
    }

    fn set_updated_datetime(&mut self, at: DateTime<Utc>) {
        self.updated_datetime = Some(at);
    }
}

impl Capabilities for Product {
    fn timestamp_create(&mut self) -> Option<&mut dyn TimestampCreate> {
        Some(self)
    }

    fn timestamp_update(&mut self) -> Option<&mut dyn TimestampUpdate> {
        Some(self)
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl FieldOrder for Product {
    const SORTABLE_FIELDS: &'static [&'static str] =
        &["sort_order", "name", "created_datetime", "updated_datetime"];

    fn compare_field(&self, other: &Self, field: &str) -> Ordering {
        match field {
            "sort_order" => self.sort_order.cmp(&other.sort_order),
            "name" => self.name.cmp(&other.name),
            "created_datetime" => self.created_datetime.cmp(&other.created_datetime),
            "updated_datetime" => self.updated_datetime.cmp(&other.updated_datetime),
            _ => Ordering::Equal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn new_product_has_no_timestamps() {
        let product = Product::new(ProductId::generate());
        assert_eq!(product.created_datetime(), None);
        assert_eq!(product.updated_datetime(), None);
        assert!(product.is_enabled());
    }

    #[test]
    fn slugify_collapses_separators() {
        assert_eq!(slugify("  Red Wine -- 2021! "), "red-wine-2021");
        assert_eq!(slugify("Ćevapi"), "evapi");
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn empty_slug_is_derived_from_name() {
        let mut product = Product::new(ProductId::generate());
        product.set_name("Garden Chair");
        product.set_slug("   ");
        assert_eq!(product.slug(), "garden-chair");

        product.set_slug("chair-01");
        assert_eq!(product.slug(), "chair-01");
    }

    #[test]
    fn product_opts_into_both_timestamp_capabilities() {
        let mut product = Product::new(ProductId::generate());
        assert!(product.timestamp_create().is_some());
        assert!(product.timestamp_update().is_some());
    }

    #[test]
    fn product_id_round_trips_through_text() {
        let id = ProductId::generate();
        assert_eq!(id.to_string().parse::<ProductId>().unwrap(), id);
        assert!("nope".parse::<ProductId>().is_err());
    }

    proptest! {
        #[test]
        fn slugify_output_is_a_valid_slug(input in ".{0,64}") {
            let slug = slugify(&input);
            prop_assert!(slug.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'));
            prop_assert!(!slug.starts_with('-') && !slug.ends_with('-'));
            prop_assert!(!slug.contains("--"));
            prop_assert_eq!(slugify(&slug), slug.clone());
        }
    }

    #[test]
    fn compare_by_sort_order() {
        let mut a = Product::new(ProductId::generate());
        let mut b = Product::new(ProductId::generate());
        a.set_sort_order(2);
        b.set_sort_order(1);
        assert_eq!(a.compare_field(&b, "sort_order"), Ordering::Greater);
    }
}
