//! Product model: searchable inventory records referencing a category and
//! a supplier.
//!
//! Products are addressed by their business reference (`PROD-YYYY-MM-XXXX`)
//! rather than the surrogate UUID. Search composes the query core; writes
//! run inside a [`TransactionManager`] scope after foreign keys have been
//! validated with plain pool reads.

use chrono::NaiveDate;
use rand::Rng;
use serde::{Deserialize, Serialize};
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::db::TransactionManager;
use crate::error::{AppError, AppResult};
use crate::query::{
    GroupSum, Page, Pagination, SearchQuery, SortSpec, StatRow, aggregate,
};

use super::{Category, Supplier};

/// Allowed product status values.
pub const PRODUCT_STATUSES: &[&str] = &["Available", "Out of Stock", "On Order"];

/// A product row.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Product {
    pub id: Uuid,
    pub reference: String,
    pub name: String,
    pub added_date: NaiveDate,
    pub status: String,
    pub category_id: Uuid,
    pub price: f64,
    pub stock_city: Option<String>,
    pub supplier_id: Uuid,
    pub quantity: i32,
}

/// Joined detail row: the product plus its category and supplier names.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ProductDetail {
    /// Surrogate key; used by the export sheet, not part of API payloads.
    #[serde(skip_serializing)]
    pub id: Uuid,
    pub reference: String,
    pub product_name: String,
    pub category: String,
    pub price: f64,
    pub status: String,
    pub stock_location: Option<String>,
    pub added_date: NaiveDate,
    pub quantity: i32,
    pub supplier: Option<String>,
}

/// Input for creating a product. A missing reference is generated.
#[derive(Debug, Clone, Deserialize)]
pub struct NewProduct {
    pub reference: Option<String>,
    pub name: String,
    pub category_id: Uuid,
    pub price: f64,
    pub status: String,
    pub stock_city: String,
    pub supplier_id: Uuid,
    pub quantity: i32,
}

/// Input for updating a product by reference.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateProduct {
    pub name: String,
    pub category_id: Uuid,
    pub price: f64,
    pub status: String,
    pub stock_city: String,
    pub added_date: NaiveDate,
    pub supplier_id: Uuid,
    pub quantity: i32,
}

/// Validated product search criteria. Absent filters impose no constraint.
#[derive(Debug, Clone)]
pub struct ProductSearch {
    pub page: Page,
    pub sort: SortSpec,
    pub reference: Option<String>,
    pub name: Option<String>,
    pub category_id: Option<Uuid>,
    pub supplier_id: Option<Uuid>,
    pub stock_city: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub added_from: Option<NaiveDate>,
    pub added_to: Option<NaiveDate>,
    pub status: Option<String>,
}

impl Product {
    /// Columns permitted as sort targets.
    pub const SORTABLE_FIELDS: &'static [&'static str] = &[
        "reference",
        "name",
        "price",
        "added_date",
        "quantity",
        "status",
    ];

    /// Default sort: newest additions first.
    pub const DEFAULT_SORT_FIELD: &'static str = "added_date";

    /// Find a product by its reference.
    pub async fn find_by_reference(pool: &PgPool, reference: &str) -> AppResult<Option<Self>> {
        let product = sqlx::query_as::<_, Self>(
            r#"
            SELECT id, reference, name, added_date, status, category_id, price,
                   stock_city, supplier_id, quantity
            FROM products WHERE reference = $1
            "#,
        )
        .bind(reference)
        .fetch_optional(pool)
        .await?;

        Ok(product)
    }

    /// Find a product with joined category/supplier names.
    pub async fn detail_by_reference(
        pool: &PgPool,
        reference: &str,
    ) -> AppResult<Option<ProductDetail>> {
        let detail = sqlx::query_as::<_, ProductDetail>(
            r#"
            SELECT p.id, p.reference, p.name AS product_name, c.name AS category,
                   p.price, p.status, p.stock_city AS stock_location,
                   p.added_date, p.quantity, s.name AS supplier
            FROM products p
            LEFT JOIN product_categories c ON c.id = p.category_id
            LEFT JOIN suppliers s ON s.id = p.supplier_id
            WHERE p.reference = $1
            "#,
        )
        .bind(reference)
        .fetch_optional(pool)
        .await?;

        Ok(detail)
    }

    /// Check whether a reference is already taken.
    pub async fn reference_exists(pool: &PgPool, reference: &str) -> AppResult<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM products WHERE reference = $1)")
                .bind(reference)
                .fetch_one(pool)
                .await?;

        Ok(exists)
    }

    /// Create a product.
    ///
    /// The referenced category and supplier must exist; those checks are
    /// pure reads and run before the transaction scope opens.
    pub async fn create(
        pool: &PgPool,
        tm: &TransactionManager,
        input: NewProduct,
    ) -> AppResult<Self> {
        if !Category::exists(pool, input.category_id).await? {
            return Err(AppError::ForeignKeyNotFound {
                entity: "category",
                id: input.category_id,
            });
        }
        if !Supplier::exists(pool, input.supplier_id).await? {
            return Err(AppError::ForeignKeyNotFound {
                entity: "supplier",
                id: input.supplier_id,
            });
        }

        let reference = match input.reference {
            Some(r) => r,
            None => Self::unique_reference(pool).await?,
        };

        let product = Self {
            id: Uuid::now_v7(),
            reference,
            name: input.name,
            added_date: chrono::Utc::now().date_naive(),
            status: input.status,
            category_id: input.category_id,
            price: input.price,
            stock_city: Some(input.stock_city),
            supplier_id: input.supplier_id,
            quantity: input.quantity,
        };

        let row = product.clone();
        tm.run(move |conn| {
            Box::pin(async move {
                Self::insert(conn, &row).await?;
                Ok(())
            })
        })
        .await?;

        Ok(product)
    }

    /// Insert a product row inside an open transaction scope.
    pub async fn insert(conn: &mut PgConnection, product: &Self) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO products (id, reference, name, added_date, status,
                                  category_id, price, stock_city, supplier_id, quantity)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(product.id)
        .bind(&product.reference)
        .bind(&product.name)
        .bind(product.added_date)
        .bind(&product.status)
        .bind(product.category_id)
        .bind(product.price)
        .bind(&product.stock_city)
        .bind(product.supplier_id)
        .bind(product.quantity)
        .execute(&mut *conn)
        .await?;

        Ok(())
    }

    /// Update a product by reference. Fails with `NotFound` when the
    /// reference does not resolve; foreign keys are re-validated.
    pub async fn update(
        pool: &PgPool,
        tm: &TransactionManager,
        reference: &str,
        input: UpdateProduct,
    ) -> AppResult<Self> {
        if !Category::exists(pool, input.category_id).await? {
            return Err(AppError::ForeignKeyNotFound {
                entity: "category",
                id: input.category_id,
            });
        }
        if !Supplier::exists(pool, input.supplier_id).await? {
            return Err(AppError::ForeignKeyNotFound {
                entity: "supplier",
                id: input.supplier_id,
            });
        }

        let existing = Self::find_by_reference(pool, reference)
            .await?
            .ok_or(AppError::NotFound)?;

        let updated = Self {
            id: existing.id,
            reference: existing.reference,
            name: input.name,
            added_date: input.added_date,
            status: input.status,
            category_id: input.category_id,
            price: input.price,
            stock_city: Some(input.stock_city),
            supplier_id: input.supplier_id,
            quantity: input.quantity,
        };

        let row = updated.clone();
        tm.run(move |conn| {
            Box::pin(async move {
                sqlx::query(
                    r#"
                    UPDATE products
                    SET name = $1, added_date = $2, status = $3, category_id = $4,
                        price = $5, stock_city = $6, supplier_id = $7, quantity = $8
                    WHERE reference = $9
                    "#,
                )
                .bind(&row.name)
                .bind(row.added_date)
                .bind(&row.status)
                .bind(row.category_id)
                .bind(row.price)
                .bind(&row.stock_city)
                .bind(row.supplier_id)
                .bind(row.quantity)
                .bind(&row.reference)
                .execute(&mut *conn)
                .await?;
                Ok(())
            })
        })
        .await?;

        Ok(updated)
    }

    /// Delete a product by reference. Existence is verified first so a
    /// missing reference is `NotFound`, not a silent no-op.
    pub async fn delete(pool: &PgPool, tm: &TransactionManager, reference: &str) -> AppResult<()> {
        if Self::find_by_reference(pool, reference).await?.is_none() {
            return Err(AppError::NotFound);
        }

        let reference = reference.to_string();
        tm.run(move |conn| {
            Box::pin(async move {
                sqlx::query("DELETE FROM products WHERE reference = $1")
                    .bind(&reference)
                    .execute(&mut *conn)
                    .await?;
                Ok(())
            })
        })
        .await
    }

    /// Search products: count the filtered set, then fetch the bounded page.
    pub async fn search(
        pool: &PgPool,
        search: &ProductSearch,
    ) -> AppResult<(Vec<ProductDetail>, Pagination)> {
        let query = SearchQuery::new("products")
            .column("id")
            .column("reference")
            .column_as("name", "product_name")
            .join_column("category", "name", "category")
            .column("price")
            .column("status")
            .column_as("stock_city", "stock_location")
            .column("added_date")
            .column("quantity")
            .join_column("supplier", "name", "supplier")
            .left_join("product_categories", "category", "category_id", "id")
            .left_join("suppliers", "supplier", "supplier_id", "id")
            .filter_eq("reference", search.reference.clone())
            .filter_contains("name", search.name.as_deref())
            .filter_eq("category_id", search.category_id)
            .filter_eq("supplier_id", search.supplier_id)
            .filter_eq("stock_city", search.stock_city.clone())
            .filter_gte("price", search.min_price)
            .filter_lte("price", search.max_price)
            .filter_gte("added_date", search.added_from.map(|d| d.to_string()))
            .filter_lte("added_date", search.added_to.map(|d| d.to_string()))
            .filter_eq("status", search.status.clone())
            .sort(search.sort.clone());

        let total: i64 = sqlx::query_scalar(&query.build_count())
            .fetch_one(pool)
            .await?;

        let rows = sqlx::query_as::<_, ProductDetail>(&query.build(search.page))
            .fetch_all(pool)
            .await?;

        Ok((rows, Pagination::new(search.page, total.max(0) as u64)))
    }

    /// Global inventory quantity across all products.
    pub async fn sum_quantity(pool: &PgPool) -> AppResult<i64> {
        let total: i64 =
            sqlx::query_scalar("SELECT COALESCE(SUM(quantity), 0)::bigint FROM products")
                .fetch_one(pool)
                .await?;

        Ok(total)
    }

    /// Share of total inventory quantity per category.
    pub async fn stats_per_category(pool: &PgPool) -> AppResult<Vec<StatRow>> {
        let total = Self::sum_quantity(pool).await?;

        let groups = sqlx::query_as::<_, GroupSum>(
            r#"
            SELECT c.id AS group_id, c.name AS group_name,
                   COALESCE(SUM(p.quantity), 0)::bigint AS quantity_sum
            FROM products p
            JOIN product_categories c ON c.id = p.category_id
            GROUP BY c.id, c.name
            ORDER BY c.name
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(aggregate(groups, total))
    }

    /// Share of total inventory quantity per supplier.
    pub async fn stats_per_supplier(pool: &PgPool) -> AppResult<Vec<StatRow>> {
        let total = Self::sum_quantity(pool).await?;

        let groups = sqlx::query_as::<_, GroupSum>(
            r#"
            SELECT s.id AS group_id, s.name AS group_name,
                   COALESCE(SUM(p.quantity), 0)::bigint AS quantity_sum
            FROM products p
            JOIN suppliers s ON s.id = p.supplier_id
            GROUP BY s.id, s.name
            ORDER BY s.name
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(aggregate(groups, total))
    }

    /// Generate a reference not yet present in the store.
    async fn unique_reference(pool: &PgPool) -> AppResult<String> {
        loop {
            let candidate = generate_reference();
            if !Self::reference_exists(pool, &candidate).await? {
                return Ok(candidate);
            }
        }
    }
}

/// Generate a product reference: `PROD-YYYY-MM-XXXX`.
fn generate_reference() -> String {
    let suffix: u32 = rand::thread_rng().gen_range(0..10_000);
    format!("PROD-{}-{suffix:04}", chrono::Utc::now().format("%Y-%m"))
}

#[cfg(test)]
// Tests are allowed to use unwrap/expect freely.
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::query::SortDirection;

    #[test]
    fn generated_reference_shape() {
        let reference = generate_reference();
        assert!(reference.starts_with("PROD-"));
        // PROD-YYYY-MM-XXXX
        let parts: Vec<&str> = reference.split('-').collect();
        assert_eq!(parts.len(), 4);
        assert_eq!(parts[1].len(), 4);
        assert_eq!(parts[2].len(), 2);
        assert_eq!(parts[3].len(), 4);
    }

    #[test]
    fn search_composes_only_present_filters() {
        let search = ProductSearch {
            page: Page::new(1, 10),
            sort: SortSpec {
                field: Product::DEFAULT_SORT_FIELD.to_string(),
                direction: SortDirection::Desc,
            },
            reference: None,
            name: Some("munch".to_string()),
            category_id: None,
            supplier_id: None,
            stock_city: None,
            min_price: Some(5.0),
            max_price: None,
            added_from: None,
            added_to: None,
            status: None,
        };

        let query = SearchQuery::new("products")
            .filter_eq("reference", search.reference.clone())
            .filter_contains("name", search.name.as_deref())
            .filter_eq("category_id", search.category_id)
            .filter_eq("supplier_id", search.supplier_id)
            .filter_eq("stock_city", search.stock_city.clone())
            .filter_gte("price", search.min_price)
            .filter_lte("price", search.max_price)
            .filter_gte("added_date", search.added_from.map(|d| d.to_string()))
            .filter_lte("added_date", search.added_to.map(|d| d.to_string()))
            .filter_eq("status", search.status.clone());

        assert_eq!(query.predicate_count(), 2);
    }

    #[test]
    fn sortable_fields_cover_defaults() {
        assert!(Product::SORTABLE_FIELDS.contains(&Product::DEFAULT_SORT_FIELD));
    }

    #[test]
    fn status_whitelist() {
        assert!(PRODUCT_STATUSES.contains(&"Available"));
        assert!(PRODUCT_STATUSES.contains(&"Out of Stock"));
        assert!(PRODUCT_STATUSES.contains(&"On Order"));
        assert!(!PRODUCT_STATUSES.contains(&"available"));
    }
}
