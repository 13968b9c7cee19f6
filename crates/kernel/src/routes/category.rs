//! Category API routes.

use axum::extract::{Path, Query, State};
use axum::response::Json;
use axum::routing::{get, post};
use axum::Router;
use serde::Deserialize;
use uuid::Uuid;

use crate::error::{AppError, AppResult, FieldViolation};
use crate::models::{CATEGORY_STATUSES, Category, CategorySearch, NewCategory};
use crate::query::{Page, SortDirection, SortSpec};
use crate::state::AppState;

use super::SearchResponse;

/// Create the category router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/categories", get(search_categories))
        .route("/api/category", post(create_category))
        .route("/api/category/{id}", get(get_category))
}

#[derive(Debug, Deserialize)]
pub struct SearchCategoryQuery {
    pub page: u32,
    pub size: u32,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
    pub name: Option<String>,
    pub status: Option<String>,
}

impl SearchCategoryQuery {
    pub fn validate(&self) -> Vec<FieldViolation> {
        let mut violations = Page::new(self.page, self.size).validate();

        if let Some(ref status) = self.status {
            if !CATEGORY_STATUSES.contains(&status.as_str()) {
                violations.push(FieldViolation::new(
                    "status",
                    format!("must be one of {CATEGORY_STATUSES:?}"),
                ));
            }
        }

        violations
    }

    pub fn into_search(self) -> AppResult<CategorySearch> {
        let violations = self.validate();
        if !violations.is_empty() {
            return Err(AppError::Validation(violations));
        }

        let sort = SortSpec::resolve(
            self.sort_by.as_deref(),
            self.sort_order.as_deref(),
            Category::SORTABLE_FIELDS,
            Category::DEFAULT_SORT_FIELD,
            SortDirection::Desc,
        )?;

        Ok(CategorySearch {
            page: Page::new(self.page, self.size),
            sort,
            name: self.name,
            status: self.status,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateCategoryRequest {
    pub name: String,
    pub status: String,
}

impl CreateCategoryRequest {
    pub fn validate(&self) -> Vec<FieldViolation> {
        let mut violations = Vec::new();

        if self.name.is_empty() || self.name.len() > 100 {
            violations.push(FieldViolation::new(
                "name",
                "must be between 1 and 100 characters",
            ));
        }
        if !CATEGORY_STATUSES.contains(&self.status.as_str()) {
            violations.push(FieldViolation::new(
                "status",
                format!("must be one of {CATEGORY_STATUSES:?}"),
            ));
        }

        violations
    }
}

async fn search_categories(
    State(state): State<AppState>,
    Query(query): Query<SearchCategoryQuery>,
) -> AppResult<Json<SearchResponse<Category>>> {
    let search = query.into_search()?;
    let (rows, pagination) = Category::search(state.db(), &search).await?;

    Ok(Json(SearchResponse::new(rows, pagination)))
}

async fn get_category(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Category>> {
    let category = Category::find_by_id(state.db(), id)
        .await?
        .ok_or(AppError::NotFound)?;

    Ok(Json(category))
}

async fn create_category(
    State(state): State<AppState>,
    Json(request): Json<CreateCategoryRequest>,
) -> AppResult<Json<Category>> {
    let violations = request.validate();
    if !violations.is_empty() {
        return Err(AppError::Validation(violations));
    }

    let category = Category::create(
        state.tx(),
        NewCategory {
            name: request.name,
            status: request.status,
        },
    )
    .await?;

    Ok(Json(category))
}
