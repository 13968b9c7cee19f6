//! Supplier model.

use serde::{Deserialize, Serialize};
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::db::TransactionManager;
use crate::error::AppResult;
use crate::query::{Page, Pagination, SearchQuery, SortSpec};

/// A supplier row.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Supplier {
    pub id: Uuid,
    pub name: String,
}

/// Input for creating a supplier.
#[derive(Debug, Clone, Deserialize)]
pub struct NewSupplier {
    pub name: String,
}

/// Validated supplier search criteria.
#[derive(Debug, Clone)]
pub struct SupplierSearch {
    pub page: Page,
    pub sort: SortSpec,
    pub name: Option<String>,
}

impl Supplier {
    pub const SORTABLE_FIELDS: &'static [&'static str] = &["name"];

    pub const DEFAULT_SORT_FIELD: &'static str = "name";

    /// Find a supplier by ID.
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> AppResult<Option<Self>> {
        let supplier =
            sqlx::query_as::<_, Self>("SELECT id, name FROM suppliers WHERE id = $1")
                .bind(id)
                .fetch_optional(pool)
                .await?;

        Ok(supplier)
    }

    /// Check if a supplier exists.
    pub async fn exists(pool: &PgPool, id: Uuid) -> AppResult<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM suppliers WHERE id = $1)")
                .bind(id)
                .fetch_one(pool)
                .await?;

        Ok(exists)
    }

    /// Create a supplier inside a transaction scope.
    pub async fn create(tm: &TransactionManager, input: NewSupplier) -> AppResult<Self> {
        let supplier = Self {
            id: Uuid::now_v7(),
            name: input.name,
        };

        let row = supplier.clone();
        tm.run(move |conn| {
            Box::pin(async move {
                Self::insert(conn, &row).await?;
                Ok(())
            })
        })
        .await?;

        Ok(supplier)
    }

    /// Insert a supplier row inside an open transaction scope.
    pub async fn insert(conn: &mut PgConnection, supplier: &Self) -> AppResult<()> {
        sqlx::query("INSERT INTO suppliers (id, name) VALUES ($1, $2)")
            .bind(supplier.id)
            .bind(&supplier.name)
            .execute(&mut *conn)
            .await?;

        Ok(())
    }

    /// Search suppliers by optional name substring.
    pub async fn search(
        pool: &PgPool,
        search: &SupplierSearch,
    ) -> AppResult<(Vec<Self>, Pagination)> {
        let query = SearchQuery::new("suppliers")
            .filter_contains("name", search.name.as_deref())
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
