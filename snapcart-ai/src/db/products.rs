//! Product record operations
//!
//! The search term is stored verbatim as produced by the pipeline (or typed
//! by the user when nothing was detected).

use crate::types::ProductCategory;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

/// Saved product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub id: Uuid,
    pub name: String,
    pub search_term: String,
    pub category: ProductCategory,
    pub created_at: DateTime<Utc>,
}

impl ProductRecord {
    /// New record; the display name defaults to the search term
    pub fn new(name: Option<String>, search_term: String, category: Option<ProductCategory>) -> Self {
        let name = name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| search_term.clone());
        Self {
            id: Uuid::new_v4(),
            name,
            search_term,
            category: category.unwrap_or_default(),
            created_at: Utc::now(),
        }
    }
}

/// Insert or replace a product
pub async fn save_product(pool: &SqlitePool, product: &ProductRecord) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO products (id, name, search_term, category, created_at)
        VALUES (?, ?, ?, ?, ?)
        ON CONFLICT(id) DO UPDATE SET
            name = excluded.name,
            search_term = excluded.search_term,
            category = excluded.category
        "#,
    )
    .bind(product.id.to_string())
    .bind(&product.name)
    .bind(&product.search_term)
    .bind(product.category.as_str())
    .bind(product.created_at.to_rfc3339())
    .execute(pool)
    .await?;

    Ok(())
}

/// Load product by id
pub async fn load_product(pool: &SqlitePool, id: Uuid) -> Result<Option<ProductRecord>> {
    let row = sqlx::query(
        r#"
        SELECT id, name, search_term, category, created_at
        FROM products
        WHERE id = ?
        "#,
    )
    .bind(id.to_string())
    .fetch_optional(pool)
    .await?;

    row.map(|row| product_from_row(&row)).transpose()
}

/// All products, newest first
pub async fn list_products(pool: &SqlitePool) -> Result<Vec<ProductRecord>> {
    let rows = sqlx::query(
        r#"
        SELECT id, name, search_term, category, created_at
        FROM products
        ORDER BY created_at DESC, rowid DESC
        "#,
    )
    .fetch_all(pool)
    .await?;

    rows.iter().map(product_from_row).collect()
}

/// Delete product; returns false if it did not exist
pub async fn delete_product(pool: &SqlitePool, id: Uuid) -> Result<bool> {
    let result = sqlx::query("DELETE FROM products WHERE id = ?")
        .bind(id.to_string())
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

fn product_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<ProductRecord> {
    let id_str: String = row.get("id");
    let category: String = row.get("category");
    let created_at: String = row.get("created_at");

    Ok(ProductRecord {
        id: Uuid::parse_str(&id_str).with_context(|| format!("Invalid product id: {}", id_str))?,
        name: row.get("name"),
        search_term: row.get("search_term"),
        category: ProductCategory::from_str_lossy(&category),
        created_at: DateTime::parse_from_rfc3339(&created_at)
            .with_context(|| format!("Invalid created_at: {}", created_at))?
            .with_timezone(&Utc),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_memory_pool;

    #[tokio::test]
    async fn save_load_delete() {
        let pool = init_memory_pool().await.unwrap();
        let product = ProductRecord::new(
            Some("Desk lamp".to_string()),
            "Desk Lamp Lamp".to_string(),
            Some(ProductCategory::Home),
        );

        save_product(&pool, &product).await.unwrap();
        let loaded = load_product(&pool, product.id).await.unwrap().unwrap();
        assert_eq!(loaded.search_term, "Desk Lamp Lamp");
        assert_eq!(loaded.category, ProductCategory::Home);
        assert_eq!(loaded.created_at.timestamp(), product.created_at.timestamp());

        assert!(delete_product(&pool, product.id).await.unwrap());
        assert!(!delete_product(&pool, product.id).await.unwrap());
        assert!(load_product(&pool, product.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn list_is_newest_first() {
        let pool = init_memory_pool().await.unwrap();
        let mut older = ProductRecord::new(None, "Mug".to_string(), None);
        older.created_at = Utc::now() - chrono::Duration::hours(1);
        let newer = ProductRecord::new(None, "Kettle".to_string(), None);

        save_product(&pool, &older).await.unwrap();
        save_product(&pool, &newer).await.unwrap();

        let names: Vec<_> = list_products(&pool)
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, vec!["Kettle", "Mug"]);
    }

    #[test]
    fn name_defaults_to_search_term() {
        let product = ProductRecord::new(Some("  ".to_string()), "Red Mug".to_string(), None);
        assert_eq!(product.name, "Red Mug");
        assert_eq!(product.category, ProductCategory::Other);
    }
}
