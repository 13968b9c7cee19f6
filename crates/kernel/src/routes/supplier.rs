//! Supplier API routes.

use axum::extract::{Path, Query, State};
use axum::response::Json;
use axum::routing::{get, post};
use axum::Router;
use serde::Deserialize;
use uuid::Uuid;

use crate::error::{AppError, AppResult, FieldViolation};
use crate::models::{NewSupplier, Supplier, SupplierSearch};
use crate::query::{Page, SortDirection, SortSpec};
use crate::state::AppState;

use super::SearchResponse;

/// Create the supplier router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/suppliers", get(search_suppliers))
        .route("/api/supplier", post(create_supplier))
        .route("/api/supplier/{id}", get(get_supplier))
}

#[derive(Debug, Deserialize)]
pub struct SearchSupplierQuery {
    pub page: u32,
    pub size: u32,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
    pub name: Option<String>,
}

impl SearchSupplierQuery {
    pub fn into_search(self) -> AppResult<SupplierSearch> {
        let violations = Page::new(self.page, self.size).validate();
        if !violations.is_empty() {
            return Err(AppError::Validation(violations));
        }

        let sort = SortSpec::resolve(
            self.sort_by.as_deref(),
            self.sort_order.as_deref(),
            Supplier::SORTABLE_FIELDS,
            Supplier::DEFAULT_SORT_FIELD,
            SortDirection::Desc,
        )?;

        Ok(SupplierSearch {
            page: Page::new(self.page, self.size),
            sort,
            name: self.name,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateSupplierRequest {
    pub name: String,
}

impl CreateSupplierRequest {
    pub fn validate(&self) -> Vec<FieldViolation> {
        let mut violations = Vec::new();

        if self.name.is_empty() || self.name.len() > 100 {
            violations.push(FieldViolation::new(
                "name",
                "must be between 1 and 100 characters",
            ));
        }

        violations
    }
}

async fn search_suppliers(
    State(state): State<AppState>,
    Query(query): Query<SearchSupplierQuery>,
) -> AppResult<Json<SearchResponse<Supplier>>> {
    let search = query.into_search()?;
    let (rows, pagination) = Supplier::search(state.db(), &search).await?;

    Ok(Json(SearchResponse::new(rows, pagination)))
}

async fn get_supplier(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Supplier>> {
    let supplier = Supplier::find_by_id(state.db(), id)
        .await?
        .ok_or(AppError::NotFound)?;

    Ok(Json(supplier))
}

async fn create_supplier(
    State(state): State<AppState>,
    Json(request): Json<CreateSupplierRequest>,
) -> AppResult<Json<Supplier>> {
    let violations = request.validate();
    if !violations.is_empty() {
        return Err(AppError::Validation(violations));
    }

    let supplier = Supplier::create(state.tx(), NewSupplier { name: request.name }).await?;

    Ok(Json(supplier))
}
