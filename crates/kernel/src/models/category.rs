//! Product category model.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::db::TransactionManager;
use crate::error::AppResult;
use crate::query::{Page, Pagination, SearchQuery, SortSpec};

/// Allowed category status values.
pub const CATEGORY_STATUSES: &[&str] = &["active", "deactive"];

/// A product category row.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub status: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Input for creating a category.
#[derive(Debug, Clone, Deserialize)]
pub struct NewCategory {
    pub name: String,
    pub status: String,
}

/// Validated category search criteria.
#[derive(Debug, Clone)]
pub struct CategorySearch {
    pub page: Page,
    pub sort: SortSpec,
    pub name: Option<String>,
    pub status: Option<String>,
}

impl Category {
    pub const SORTABLE_FIELDS: &'static [&'static str] = &["name", "status", "created_at"];

    pub const DEFAULT_SORT_FIELD: &'static str = "created_at";

    /// Find a category by ID.
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> AppResult<Option<Self>> {
        let category = sqlx::query_as::<_, Self>(
            "SELECT id, name, status, created_at, updated_at FROM product_categories WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(category)
    }

    /// Check if a category exists.
    pub async fn exists(pool: &PgPool, id: Uuid) -> AppResult<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM product_categories WHERE id = $1)")
                .bind(id)
                .fetch_one(pool)
                .await?;

        Ok(exists)
    }

    /// Create a category inside a transaction scope.
    pub async fn create(tm: &TransactionManager, input: NewCategory) -> AppResult<Self> {
        let now = chrono::Utc::now().naive_utc();
        let category = Self {
            id: Uuid::now_v7(),
            name: input.name,
            status: input.status,
            created_at: now,
            updated_at: now,
        };

        let row = category.clone();
        tm.run(move |conn| {
            Box::pin(async move {
                Self::insert(conn, &row).await?;
                Ok(())
            })
        })
        .await?;

        Ok(category)
    }

    /// Insert a category row inside an open transaction scope.
    pub async fn insert(conn: &mut PgConnection, category: &Self) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO product_categories (id, name, status, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(category.id)
        .bind(&category.name)
        .bind(&category.status)
        .bind(category.created_at)
        .bind(category.updated_at)
        .execute(&mut *conn)
        .await?;

        Ok(())
    }

    /// Search categories by optional name substring and exact status.
    pub async fn search(
        pool: &PgPool,
        search: &CategorySearch,
    ) -> AppResult<(Vec<Self>, Pagination)> {
        let query = SearchQuery::new("product_categories")
            .filter_contains("name", search.name.as_deref())
            .filter_eq("status", search.status.clone())
            .sort(search.sort.clone());

        let total: i64 = sqlx::query_scalar(&query.build_count())
            .fetch_one(pool)
            .await?;

        let rows = sqlx::query_as::<_, Self>(&query.build(search.page))
            .fetch_all(pool)
            .await?;

        Ok((rows, Pagination::new(search.page, total.max(0) as u64)))
    }
}
