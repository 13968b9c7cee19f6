//! Document model: generated files attached to products.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::error::AppResult;

/// A stored document row.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Document {
    pub id: Uuid,
    pub filename: String,
    pub path: String,
    pub product_id: Option<Uuid>,
    pub uploaded_at: NaiveDateTime,
}

impl Document {
    /// Find a document by ID.
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> AppResult<Option<Self>> {
        let document = sqlx::query_as::<_, Self>(
            "SELECT id, filename, path, product_id, uploaded_at FROM documents WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(document)
    }

    /// List documents attached to a product, newest first.
    pub async fn list_by_product(pool: &PgPool, product_id: Uuid) -> AppResult<Vec<Self>> {
        let documents = sqlx::query_as::<_, Self>(
            r#"
            SELECT id, filename, path, product_id, uploaded_at
            FROM documents WHERE product_id = $1
            ORDER BY uploaded_at DESC
            "#,
        )
        .bind(product_id)
        .fetch_all(pool)
        .await?;

        Ok(documents)
    }

    /// Insert a document row inside an open transaction scope.
    pub async fn insert(conn: &mut PgConnection, document: &Self) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO documents (id, filename, path, product_id, uploaded_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(document.id)
        .bind(&document.filename)
        .bind(&document.path)
        .bind(document.product_id)
        .bind(document.uploaded_at)
        .execute(&mut *conn)
        .await?;

        Ok(())
    }
}
