use std::env;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub catalog: CatalogConfig,
}

/// Settings for the three-source catalog chain.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    pub primary_url: String,
    pub secondary_url: String,
    pub request_timeout: Duration,
    /// Skip the network entirely and serve the bundled copy.
    pub offline: bool,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://storefront.db?mode=rwc".to_string());
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(3000);
        Ok(Self {
            database_url,
            host,
            port,
            catalog: CatalogConfig::from_env(),
        })
    }
}

impl CatalogConfig {
    pub fn from_env() -> Self {
        let primary_url = env::var("CATALOG_PRIMARY_URL")
            .unwrap_or_else(|_| "https://fakestoreapi.com/products".to_string());
        let secondary_url = env::var("CATALOG_SECONDARY_URL")
            .unwrap_or_else(|_| "https://fakestoreapi.github.io/products.json".to_string());
        let request_timeout = env::var("CATALOG_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or_else(|| Duration::from_secs(10));
        let offline = env::var("CATALOG_OFFLINE")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);
        Self {
            primary_url,
            secondary_url,
            request_timeout,
            offline,
        }
    }
}
