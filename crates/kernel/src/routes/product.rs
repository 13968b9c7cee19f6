//! Product API routes.

use std::sync::LazyLock;

use axum::extract::{Path, Query, State};
use axum::response::Json;
use axum::routing::{delete, get, post, put};
use axum::Router;
use chrono::NaiveDate;
use regex::Regex;
use serde::Deserialize;
use uuid::Uuid;

use crate::error::{AppError, AppResult, FieldViolation};
use crate::models::{
    Document, NewProduct, PRODUCT_STATUSES, Product, ProductDetail, ProductSearch, UpdateProduct,
};
use crate::query::{Page, SortDirection, SortSpec, StatRow};
use crate::state::AppState;

use super::SearchResponse;

/// Business reference pattern: uppercase letters, digits, hyphens.
///
/// Panics if the hard-coded regex literal is invalid (impossible in
/// practice).
#[allow(clippy::expect_used)]
static REFERENCE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z0-9-]+$").expect("valid regex literal"));

/// Create the product router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/products", get(search_products))
        .route("/api/products/stats/category", get(category_stats))
        .route("/api/products/stats/supplier", get(supplier_stats))
        .route("/api/product", post(create_product))
        .route("/api/product/{reference}", get(get_product))
        .route("/api/product/{reference}", put(update_product))
        .route("/api/product/{reference}", delete(delete_product))
        .route("/api/product/{reference}/export", post(export_product))
        .route("/api/product/{reference}/documents", get(list_documents))
}

// -------------------------------------------------------------------------
// Request types
// -------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct SearchProductQuery {
    pub page: u32,
    pub size: u32,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
    pub reference: Option<String>,
    pub product_name: Option<String>,
    pub category_id: Option<Uuid>,
    pub supplier_id: Option<Uuid>,
    pub stock_city: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub date_added_from: Option<NaiveDate>,
    pub date_added_to: Option<NaiveDate>,
    pub status: Option<String>,
}

impl SearchProductQuery {
    /// Field-level violations; empty when the request is well-formed.
    pub fn validate(&self) -> Vec<FieldViolation> {
        let mut violations = Page::new(self.page, self.size).validate();

        if let Some(ref reference) = self.reference {
            if !REFERENCE_PATTERN.is_match(reference) {
                violations.push(FieldViolation::new(
                    "reference",
                    "must contain only uppercase letters, digits, and hyphens",
                ));
            }
        }
        if let Some(ref name) = self.product_name {
            if name.len() < 3 || name.len() > 100 {
                violations.push(FieldViolation::new(
                    "product_name",
                    "must be between 3 and 100 characters",
                ));
            }
        }
        if let Some(ref status) = self.status {
            if !PRODUCT_STATUSES.contains(&status.as_str()) {
                violations.push(FieldViolation::new(
                    "status",
                    format!("must be one of {PRODUCT_STATUSES:?}"),
                ));
            }
        }

        violations
    }

    /// Validate the request and resolve it into search criteria.
    pub fn into_search(self) -> AppResult<ProductSearch> {
        let violations = self.validate();
        if !violations.is_empty() {
            return Err(AppError::Validation(violations));
        }

        let sort = SortSpec::resolve(
            self.sort_by.as_deref(),
            self.sort_order.as_deref(),
            Product::SORTABLE_FIELDS,
            Product::DEFAULT_SORT_FIELD,
            SortDirection::Desc,
        )?;

        Ok(ProductSearch {
            page: Page::new(self.page, self.size),
            sort,
            reference: self.reference,
            name: self.product_name,
            category_id: self.category_id,
            supplier_id: self.supplier_id,
            stock_city: self.stock_city,
            min_price: self.min_price,
            max_price: self.max_price,
            added_from: self.date_added_from,
            added_to: self.date_added_to,
            status: self.status,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    pub reference: Option<String>,
    pub product_name: String,
    pub category_id: Uuid,
    pub price: f64,
    pub status: String,
    pub stock_location: String,
    pub supplier_id: Uuid,
    pub quantity: i32,
}

impl CreateProductRequest {
    pub fn validate(&self) -> Vec<FieldViolation> {
        let mut violations = Vec::new();

        if let Some(ref reference) = self.reference {
            if !REFERENCE_PATTERN.is_match(reference) {
                violations.push(FieldViolation::new(
                    "reference",
                    "must contain only uppercase letters, digits, and hyphens",
                ));
            }
        }
        validate_product_fields(
            &mut violations,
            &self.product_name,
            self.price,
            &self.status,
            &self.stock_location,
            self.quantity,
        );

        violations
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateProductRequest {
    pub product_name: String,
    pub category_id: Uuid,
    pub price: f64,
    pub status: String,
    pub stock_location: String,
    pub added_date: NaiveDate,
    pub supplier_id: Uuid,
    pub quantity: i32,
}

impl UpdateProductRequest {
    pub fn validate(&self) -> Vec<FieldViolation> {
        let mut violations = Vec::new();
        validate_product_fields(
            &mut violations,
            &self.product_name,
            self.price,
            &self.status,
            &self.stock_location,
            self.quantity,
        );
        violations
    }
}

/// Constraints shared by create and update payloads.
fn validate_product_fields(
    violations: &mut Vec<FieldViolation>,
    product_name: &str,
    price: f64,
    status: &str,
    stock_location: &str,
    quantity: i32,
) {
    if product_name.len() < 3 || product_name.len() > 100 {
        violations.push(FieldViolation::new(
            "product_name",
            "must be between 3 and 100 characters",
        ));
    }
    if price <= 0.0 {
        violations.push(FieldViolation::new("price", "must be greater than zero"));
    }
    if !PRODUCT_STATUSES.contains(&status) {
        violations.push(FieldViolation::new(
            "status",
            format!("must be one of {PRODUCT_STATUSES:?}"),
        ));
    }
    if stock_location.is_empty() {
        violations.push(FieldViolation::new("stock_location", "must not be empty"));
    }
    if quantity <= 0 {
        violations.push(FieldViolation::new("quantity", "must be greater than zero"));
    }
}

// -------------------------------------------------------------------------
// Handlers
// -------------------------------------------------------------------------

async fn search_products(
    State(state): State<AppState>,
    Query(query): Query<SearchProductQuery>,
) -> AppResult<Json<SearchResponse<ProductDetail>>> {
    let search = query.into_search()?;
    let (rows, pagination) = Product::search(state.db(), &search).await?;

    Ok(Json(SearchResponse::new(rows, pagination)))
}

async fn get_product(
    State(state): State<AppState>,
    Path(reference): Path<String>,
) -> AppResult<Json<ProductDetail>> {
    let detail = Product::detail_by_reference(state.db(), &reference)
        .await?
        .ok_or(AppError::NotFound)?;

    Ok(Json(detail))
}

async fn create_product(
    State(state): State<AppState>,
    Json(request): Json<CreateProductRequest>,
) -> AppResult<Json<Product>> {
    let violations = request.validate();
    if !violations.is_empty() {
        return Err(AppError::Validation(violations));
    }

    let product = Product::create(
        state.db(),
        state.tx(),
        NewProduct {
            reference: request.reference,
            name: request.product_name,
            category_id: request.category_id,
            price: request.price,
            status: request.status,
            stock_city: request.stock_location,
            supplier_id: request.supplier_id,
            quantity: request.quantity,
        },
    )
    .await?;

    Ok(Json(product))
}

async fn update_product(
    State(state): State<AppState>,
    Path(reference): Path<String>,
    Json(request): Json<UpdateProductRequest>,
) -> AppResult<Json<Product>> {
    let violations = request.validate();
    if !violations.is_empty() {
        return Err(AppError::Validation(violations));
    }

    let product = Product::update(
        state.db(),
        state.tx(),
        &reference,
        UpdateProduct {
            name: request.product_name,
            category_id: request.category_id,
            price: request.price,
            status: request.status,
            stock_city: request.stock_location,
            added_date: request.added_date,
            supplier_id: request.supplier_id,
            quantity: request.quantity,
        },
    )
    .await?;

    Ok(Json(product))
}

async fn delete_product(
    State(state): State<AppState>,
    Path(reference): Path<String>,
) -> AppResult<Json<serde_json::Value>> {
    Product::delete(state.db(), state.tx(), &reference).await?;

    Ok(Json(serde_json::json!({})))
}

async fn category_stats(State(state): State<AppState>) -> AppResult<Json<Vec<StatRow>>> {
    Ok(Json(Product::stats_per_category(state.db()).await?))
}

async fn supplier_stats(State(state): State<AppState>) -> AppResult<Json<Vec<StatRow>>> {
    Ok(Json(Product::stats_per_supplier(state.db()).await?))
}

async fn export_product(
    State(state): State<AppState>,
    Path(reference): Path<String>,
) -> AppResult<Json<Document>> {
    let document = state
        .export()
        .export_product(state.db(), state.tx(), &reference)
        .await?;

    Ok(Json(document))
}

async fn list_documents(
    State(state): State<AppState>,
    Path(reference): Path<String>,
) -> AppResult<Json<Vec<Document>>> {
    let product = Product::find_by_reference(state.db(), &reference)
        .await?
        .ok_or(AppError::NotFound)?;

    Ok(Json(Document::list_by_product(state.db(), product.id).await?))
}
