//! Sort field whitelisting and direction normalization.
//!
//! Requested sort fields are checked against a fixed per-entity whitelist
//! before any SQL is generated, so arbitrary column expressions can never
//! reach the query builder.

use sea_query::Order;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

/// Sort direction, restricted to exactly ascending/descending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    /// Parse `asc`/`desc` (case-insensitive).
    pub fn parse(raw: &str) -> AppResult<Self> {
        match raw.to_ascii_lowercase().as_str() {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            _ => Err(AppError::InvalidSortDirection(raw.to_string())),
        }
    }

    pub fn as_order(self) -> Order {
        match self {
            SortDirection::Asc => Order::Asc,
            SortDirection::Desc => Order::Desc,
        }
    }
}

/// A validated sort specification: a whitelisted column plus a direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    pub field: String,
    pub direction: SortDirection,
}

impl SortSpec {
    /// Resolve a requested sort against an entity's whitelist.
    ///
    /// Absent field/direction fall back to the entity defaults. A non-empty
    /// field outside the whitelist is [`AppError::InvalidSortField`] —
    /// never silently coerced.
    pub fn resolve(
        requested_field: Option<&str>,
        requested_direction: Option<&str>,
        whitelist: &[&str],
        default_field: &str,
        default_direction: SortDirection,
    ) -> AppResult<Self> {
        let field = match requested_field {
            Some(f) if !f.is_empty() => {
                if !whitelist.contains(&f) {
                    return Err(AppError::InvalidSortField(f.to_string()));
                }
                f.to_string()
            }
            _ => default_field.to_string(),
        };

        let direction = match requested_direction {
            Some(d) if !d.is_empty() => SortDirection::parse(d)?,
            _ => default_direction,
        };

        Ok(Self { field, direction })
    }
}
