//! Geolocation distance utility.
//!
//! Great-circle (haversine) distance between the caller's IP location and
//! a named city. The third-party lookups live behind [`GeoLocator`]; the
//! distance math is local and tested.

use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::AppResult;

/// Earth radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// A named point on the globe.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoPoint {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// Resolves IPs and city names to coordinates.
#[async_trait]
pub trait GeoLocator: Send + Sync {
    async fn locate_ip(&self, ip: &str) -> Result<GeoPoint>;
    async fn locate_city(&self, city: &str) -> Result<GeoPoint>;
}

/// [`GeoLocator`] backed by ip-api and nominatim shaped HTTP endpoints.
pub struct HttpGeoLocator {
    client: reqwest::Client,
    ip_api_url: String,
    city_api_url: String,
}

impl HttpGeoLocator {
    pub fn new(client: reqwest::Client, ip_api_url: String, city_api_url: String) -> Self {
        Self {
            client,
            ip_api_url,
            city_api_url,
        }
    }
}

#[async_trait]
impl GeoLocator for HttpGeoLocator {
    async fn locate_ip(&self, ip: &str) -> Result<GeoPoint> {
        #[derive(Deserialize)]
        struct IpApiResponse {
            lat: f64,
            lon: f64,
            city: String,
        }

        let url = format!("{}/{}", self.ip_api_url.trim_end_matches('/'), ip);
        let response: IpApiResponse = self
            .client
            .get(&url)
            .send()
            .await
            .context("IP geolocation request failed")?
            .error_for_status()
            .context("IP geolocation request rejected")?
            .json()
            .await
            .context("failed to decode IP geolocation response")?;

        Ok(GeoPoint {
            name: response.city,
            latitude: response.lat,
            longitude: response.lon,
        })
    }

    async fn locate_city(&self, city: &str) -> Result<GeoPoint> {
        // Nominatim returns coordinates as strings.
        #[derive(Deserialize)]
        struct CityResult {
            lat: String,
            lon: String,
            name: String,
        }

        let results: Vec<CityResult> = self
            .client
            .get(&self.city_api_url)
            .query(&[("q", city), ("format", "json"), ("limit", "1")])
            .send()
            .await
            .context("city geocoding request failed")?
            .error_for_status()
            .context("city geocoding request rejected")?
            .json()
            .await
            .context("failed to decode city geocoding response")?;

        let first = results
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("no location found for city: {city}"))?;

        Ok(GeoPoint {
            name: first.name,
            latitude: first.lat.parse().context("latitude is not a number")?,
            longitude: first.lon.parse().context("longitude is not a number")?,
        })
    }
}

/// Haversine great-circle distance in kilometers.
pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Distance between two named locations.
#[derive(Debug, Clone, Serialize)]
pub struct DistanceReport {
    pub from: String,
    pub to: String,
    pub kilometers: f64,
}

/// Computes the distance between a caller's IP location and a city.
#[derive(Clone)]
pub struct DistanceService {
    locator: Arc<dyn GeoLocator>,
}

impl DistanceService {
    pub fn new(locator: Arc<dyn GeoLocator>) -> Self {
        Self { locator }
    }

    pub async fn distance(&self, ip: &str, city: &str) -> AppResult<DistanceReport> {
        let from = self
            .locator
            .locate_ip(ip)
            .await
            .context("failed to get geolocation")?;
        let to = self
            .locator
            .locate_city(city)
            .await
            .context("failed to get geolocation")?;

        Ok(DistanceReport {
            kilometers: haversine_km(from.latitude, from.longitude, to.latitude, to.longitude),
            from: from.name,
            to: to.name,
        })
    }
}

#[cfg(test)]
// Tests are allowed to use unwrap/expect freely.
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    const PARIS: (f64, f64) = (48.8566, 2.3522);
    const LONDON: (f64, f64) = (51.5074, -0.1278);

    #[test]
    fn paris_to_london_is_about_344_km() {
        let d = haversine_km(PARIS.0, PARIS.1, LONDON.0, LONDON.1);
        assert!((340.0..350.0).contains(&d), "got {d}");
    }

    #[test]
    fn zero_distance_for_same_point() {
        assert_eq!(haversine_km(PARIS.0, PARIS.1, PARIS.0, PARIS.1), 0.0);
    }

    #[test]
    fn distance_is_symmetric() {
        let forward = haversine_km(PARIS.0, PARIS.1, LONDON.0, LONDON.1);
        let back = haversine_km(LONDON.0, LONDON.1, PARIS.0, PARIS.1);
        assert!((forward - back).abs() < 1e-9);
    }

    #[test]
    fn antipodal_distance_is_half_circumference() {
        let d = haversine_km(0.0, 0.0, 0.0, 180.0);
        let half_circumference = std::f64::consts::PI * EARTH_RADIUS_KM;
        assert!((d - half_circumference).abs() < 1.0, "got {d}");
    }

    struct FixedLocator;

    #[async_trait]
    impl GeoLocator for FixedLocator {
        async fn locate_ip(&self, _ip: &str) -> Result<GeoPoint> {
            Ok(GeoPoint {
                name: "Paris".to_string(),
                latitude: PARIS.0,
                longitude: PARIS.1,
            })
        }

        async fn locate_city(&self, _city: &str) -> Result<GeoPoint> {
            Ok(GeoPoint {
                name: "London".to_string(),
                latitude: LONDON.0,
                longitude: LONDON.1,
            })
        }
    }

    #[tokio::test]
    async fn distance_service_reports_endpoints() {
        let service = DistanceService::new(Arc::new(FixedLocator));
        let report = service.distance("1.2.3.4", "London").await.unwrap();

        assert_eq!(report.from, "Paris");
        assert_eq!(report.to, "London");
        assert!((340.0..350.0).contains(&report.kilometers));
    }

    struct FailingLocator;

    #[async_trait]
    impl GeoLocator for FailingLocator {
        async fn locate_ip(&self, _ip: &str) -> Result<GeoPoint> {
            Err(anyhow!("lookup unavailable"))
        }

        async fn locate_city(&self, _city: &str) -> Result<GeoPoint> {
            Err(anyhow!("lookup unavailable"))
        }
    }

    #[tokio::test]
    async fn lookup_failure_propagates() {
        let service = DistanceService::new(Arc::new(FailingLocator));
        assert!(service.distance("1.2.3.4", "London").await.is_err());
    }
}
