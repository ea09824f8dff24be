//! Postgres-backed product store.
//!
//! Every query names its columns explicitly; ordering is restricted to
//! [`FieldOrder::SORTABLE_FIELDS`], which double as column names.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row, postgres::PgRow};
use uuid::Uuid;

use cms_core::EntityId;
use cms_persistence::{EntityStore, FieldOrder, ListQuery, Page, StoreError};

use crate::product::{Product, ProductId, ProductMeta};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS products (
    id UUID PRIMARY KEY,
    name TEXT NOT NULL,
    slug TEXT NOT NULL,
    description TEXT NULL,
    sort_order INTEGER NOT NULL DEFAULT 0,
    enabled BOOLEAN NOT NULL DEFAULT TRUE,
    meta_title TEXT NULL,
    meta_description TEXT NULL,
    meta_keywords TEXT NULL,
    created_datetime TIMESTAMPTZ NULL,
    updated_datetime TIMESTAMPTZ NULL
)
"#;

const COLUMNS: &str = "id, name, slug, description, sort_order, enabled, meta_title, \
                       meta_description, meta_keywords, created_datetime, updated_datetime";

pub struct PostgresProductStore {
    pool: PgPool,
}

impl PostgresProductStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates the `products` table when missing.
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        sqlx::query(SCHEMA).execute(&self.pool).await?;
        tracing::info!("products schema ready");
        Ok(())
    }
}

fn row_to_product(row: &PgRow) -> Result<Product, sqlx::Error> {
    let id: Uuid = row.try_get("id")?;
    Ok(Product::restore(
        ProductId::new(EntityId::from_uuid(id)),
        row.try_get("name")?,
        row.try_get("slug")?,
        row.try_get("description")?,
        row.try_get("sort_order")?,
        row.try_get("enabled")?,
        ProductMeta {
            title: row.try_get("meta_title")?,
            description: row.try_get("meta_description")?,
            keywords: row.try_get("meta_keywords")?,
        },
        row.try_get::<Option<DateTime<Utc>>, _>("created_datetime")?,
        row.try_get::<Option<DateTime<Utc>>, _>("updated_datetime")?,
    ))
}

fn order_clause(query: &ListQuery) -> Result<String, StoreError> {
    let mut parts = Vec::with_capacity(query.order_by.len() + 1);
    for o in &query.order_by {
        if !Product::SORTABLE_FIELDS.contains(&o.field.as_str()) {
            return Err(StoreError::UnknownField(o.field.clone()));
        }
        parts.push(format!("{} {}", o.field, o.direction.as_sql()));
    }
    parts.push("id ASC".to_string());
    Ok(parts.join(", "))
}

#[async_trait]
impl EntityStore<Product> for PostgresProductStore {
    async fn get(&self, id: &ProductId) -> Result<Option<Product>, StoreError> {
        let row = sqlx::query(&format!("SELECT {COLUMNS} FROM products WHERE id = $1"))
            .bind(id.0.as_uuid())
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.as_ref().map(row_to_product).transpose()?)
    }

    async fn insert(&self, entity: &Product) -> Result<(), StoreError> {
        let result = sqlx::query(&format!(
            "INSERT INTO products ({COLUMNS}) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) \
             ON CONFLICT (id) DO NOTHING"
        ))
        .bind(entity.id_typed().0.as_uuid())
        .bind(entity.name())
        .bind(entity.slug())
        .bind(entity.description())
        .bind(entity.sort_order())
        .bind(entity.is_enabled())
        .bind(entity.meta().title.as_deref())
        .bind(entity.meta().description.as_deref())
        .bind(entity.meta().keywords.as_deref())
        .bind(cms_core::TimestampCreate::created_datetime(entity))
        .bind(cms_core::TimestampUpdate::updated_datetime(entity))
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::Conflict(format!(
                "product {} already exists",
                entity.id_typed()
            )));
        }
        Ok(())
    }

    async fn update(&self, entity: &Product) -> Result<(), StoreError> {
        let result = sqlx::query(
            "UPDATE products SET name = $2, slug = $3, description = $4, sort_order = $5, \
             enabled = $6, meta_title = $7, meta_description = $8, meta_keywords = $9, \
             created_datetime = $10, updated_datetime = $11 WHERE id = $1",
        )
        .bind(entity.id_typed().0.as_uuid())
        .bind(entity.name())
        .bind(entity.slug())
        .bind(entity.description())
        .bind(entity.sort_order())
        .bind(entity.is_enabled())
        .bind(entity.meta().title.as_deref())
        .bind(entity.meta().description.as_deref())
        .bind(entity.meta().keywords.as_deref())
        .bind(cms_core::TimestampCreate::created_datetime(entity))
        .bind(cms_core::TimestampUpdate::updated_datetime(entity))
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn remove(&self, id: &ProductId) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id.0.as_uuid())
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn list(&self, query: &ListQuery) -> Result<Page<Product>, StoreError> {
        let order = order_clause(query)?;

        let total: i64 = sqlx::query("SELECT COUNT(*) AS total FROM products")
            .fetch_one(&self.pool)
            .await?
            .try_get("total")?;

        let rows = sqlx::query(&format!(
            "SELECT {COLUMNS} FROM products ORDER BY {order} LIMIT $1 OFFSET $2"
        ))
        .bind(query.pagination.limit() as i64)
        .bind(query.pagination.offset() as i64)
        .fetch_all(&self.pool)
        .await?;

        let items = rows
            .iter()
            .map(row_to_product)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Page {
            items,
            total: total.max(0) as u64,
            pagination: query.pagination,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cms_persistence::{Direction, Pagination};

    #[test]
    fn order_clause_always_ends_with_id() {
        let query = ListQuery::new(Pagination::default()).order_by("sort_order", Direction::Asc);
        assert_eq!(order_clause(&query).unwrap(), "sort_order ASC, id ASC");
    }

    #[test]
    fn order_clause_rejects_unknown_columns() {
        let query = ListQuery::new(Pagination::default()).order_by("1; DROP TABLE products", Direction::Desc);
        assert!(matches!(order_clause(&query), Err(StoreError::UnknownField(_))));
    }
}
