//! Per-group percentage-of-total aggregation.

use serde::Serialize;
use uuid::Uuid;

/// A per-group sum of the measured quantity, as returned by a
/// `SUM ... GROUP BY ... JOIN` query. Groups with no joined rows never
/// appear here.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct GroupSum {
    pub group_id: Uuid,
    pub group_name: String,
    pub quantity_sum: i64,
}

/// One group's share of the global total, rounded to the nearest whole
/// percent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatRow {
    pub group_id: Uuid,
    pub group_name: String,
    pub percentage: f64,
}

/// Compute each group's rounded percentage of `total`.
///
/// A non-positive total yields no rows: there is nothing to apportion and
/// no division takes place.
pub fn aggregate(groups: Vec<GroupSum>, total: i64) -> Vec<StatRow> {
    if total <= 0 {
        return Vec::new();
    }

    groups
        .into_iter()
        .map(|g| StatRow {
            group_id: g.group_id,
            group_name: g.group_name,
            // f64::round is half-away-from-zero, i.e. half-up for the
            // non-negative sums we apportion.
            percentage: (g.quantity_sum as f64 * 100.0 / total as f64).round(),
        })
        .collect()
}
