//! Configuration loaded from environment variables.

use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port (default: 3000).
    pub port: u16,

    /// PostgreSQL connection URL.
    pub database_url: String,

    /// Maximum database connections in pool (default: 10).
    pub database_max_connections: u32,

    /// CORS allowed origins (comma-separated, default: "*").
    pub cors_allowed_origins: Vec<String>,

    /// Directory where exported product sheets are written
    /// (default: ./storage/exports).
    pub storage_dir: PathBuf,

    /// Base URL of the IP geolocation endpoint.
    pub geo_ip_api_url: String,

    /// Base URL of the city geocoding endpoint.
    pub geo_city_api_url: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .context("PORT must be a valid u16")?;

        let database_url =
            env::var("DATABASE_URL").context("DATABASE_URL environment variable is required")?;

        let database_max_connections = env::var("DATABASE_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "10".to_string())
            .parse()
            .context("DATABASE_MAX_CONNECTIONS must be a valid u32")?;

        let cors_allowed_origins = parse_origins(
            &env::var("CORS_ALLOWED_ORIGINS").unwrap_or_else(|_| "*".to_string()),
        );

        let storage_dir = PathBuf::from(
            env::var("STORAGE_DIR").unwrap_or_else(|_| "./storage/exports".to_string()),
        );

        let geo_ip_api_url =
            env::var("GEO_IP_API_URL").unwrap_or_else(|_| "http://ip-api.com/json".to_string());

        let geo_city_api_url = env::var("GEO_CITY_API_URL")
            .unwrap_or_else(|_| "https://nominatim.openstreetmap.org/search".to_string());

        Ok(Self {
            port,
            database_url,
            database_max_connections,
            cors_allowed_origins,
            storage_dir,
            geo_ip_api_url,
            geo_city_api_url,
        })
    }
}

/// Split a comma-separated origin list, dropping empty entries.
fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
        .collect()
}

#[cfg(test)]
// Tests are allowed to use unwrap/expect freely.
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn origins_split_and_trimmed() {
        assert_eq!(parse_origins("*"), vec!["*"]);
        assert_eq!(
            parse_origins("https://a.example, https://b.example"),
            vec!["https://a.example", "https://b.example"]
        );
        assert_eq!(parse_origins(""), Vec::<String>::new());
        assert_eq!(parse_origins("x,,y"), vec!["x", "y"]);
    }
}
