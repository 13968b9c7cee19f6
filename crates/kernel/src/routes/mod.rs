//! HTTP routing and request binding. Thin glue over the models and the
//! query core; every request type validates explicitly before anything
//! touches the store.

pub mod category;
pub mod distance;
pub mod health;
pub mod product;
pub mod supplier;

use serde::Serialize;

use crate::query::Pagination;

/// Search response envelope: a page of rows plus pagination metadata.
#[derive(Debug, Serialize)]
pub struct SearchResponse<T> {
    pub data: Vec<T>,
    #[serde(flatten)]
    pub pagination: Pagination,
}

impl<T> SearchResponse<T> {
    pub fn new(data: Vec<T>, pagination: Pagination) -> Self {
        Self { data, pagination }
    }
}
