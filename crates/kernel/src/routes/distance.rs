//! Distance API route.
//!
//! Reports the great-circle distance between the caller's location
//! (resolved from their IP) and a named city.

use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::response::Json;
use axum::routing::get;
use axum::Router;
use serde::Deserialize;

use crate::error::{AppError, AppResult, FieldViolation};
use crate::services::DistanceReport;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/api/distance", get(distance))
}

#[derive(Debug, Deserialize)]
pub struct DistanceQuery {
    pub city: String,
    /// Explicit caller IP, for clients not behind a proxy.
    pub ip: Option<String>,
}

/// Caller IP resolution order: X-Forwarded-For (first hop), X-Real-IP,
/// then the explicit `ip` query parameter.
fn client_ip(headers: &HeaderMap, fallback: Option<&str>) -> Option<String> {
    if let Some(forwarded) = headers.get("x-forwarded-for").and_then(|v| v.to_str().ok()) {
        if let Some(first) = forwarded.split(',').next() {
            let first = first.trim();
            if !first.is_empty() {
                return Some(first.to_string());
            }
        }
    }
    if let Some(real_ip) = headers.get("x-real-ip").and_then(|v| v.to_str().ok()) {
        if !real_ip.is_empty() {
            return Some(real_ip.to_string());
        }
    }

    fallback.map(str::to_string)
}

async fn distance(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<DistanceQuery>,
) -> AppResult<Json<DistanceReport>> {
    if query.city.trim().is_empty() {
        return Err(AppError::Validation(vec![FieldViolation::new(
            "city",
            "must not be empty",
        )]));
    }

    let ip = client_ip(&headers, query.ip.as_deref()).ok_or_else(|| {
        AppError::Validation(vec![FieldViolation::new(
            "ip",
            "caller IP could not be determined",
        )])
    })?;

    let report = state.distance().distance(&ip, &query.city).await?;

    Ok(Json(report))
}

#[cfg(test)]
// Tests are allowed to use unwrap/expect freely.
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn forwarded_for_takes_first_hop() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", "10.0.0.1, 10.0.0.2".parse().unwrap());
        headers.insert("x-real-ip", "10.0.0.3".parse().unwrap());

        assert_eq!(client_ip(&headers, None), Some("10.0.0.1".to_string()));
    }

    #[test]
    fn real_ip_when_no_forwarded_for() {
        let mut headers = HeaderMap::new();
        headers.insert("x-real-ip", "10.0.0.3".parse().unwrap());

        assert_eq!(client_ip(&headers, None), Some("10.0.0.3".to_string()));
    }

    #[test]
    fn query_fallback_when_no_headers() {
        let headers = HeaderMap::new();

        assert_eq!(
            client_ip(&headers, Some("10.0.0.4")),
            Some("10.0.0.4".to_string())
        );
        assert_eq!(client_ip(&headers, None), None);
    }
}
