use std::collections::HashMap;
use std::sync::RwLock;

use crate::config::CatalogConfig;
use crate::models::Product;

use super::{CatalogError, CatalogOrigin, RemoteCatalogClient};

const BUNDLED_CATALOG: &str = include_str!("../../assets/products.json");

/// Aggregates the three product sources behind one lookup surface.
///
/// [`CatalogRepository::load`] walks the fallback chain; whichever source
/// wins replaces the id-indexed cache that detail lookups are served from.
pub struct CatalogRepository {
    client: RemoteCatalogClient,
    primary_url: String,
    secondary_url: String,
    offline: bool,
    cache: RwLock<HashMap<i64, Product>>,
}

impl CatalogRepository {
    pub fn new(config: &CatalogConfig) -> Result<Self, CatalogError> {
        Ok(Self {
            client: RemoteCatalogClient::new(config.request_timeout)?,
            primary_url: config.primary_url.clone(),
            secondary_url: config.secondary_url.clone(),
            offline: config.offline,
            cache: RwLock::new(HashMap::new()),
        })
    }

    /// Load the catalog from the best available source.
    ///
    /// Each source is attempted at most once per call; a failure is only the
    /// signal to move down the chain. Offline mode goes straight to the
    /// bundled copy without touching the network, and the bundled copy
    /// cannot fail: at worst it decodes to an empty catalog.
    pub async fn load(&self) -> (Vec<Product>, CatalogOrigin) {
        if self.offline {
            tracing::info!("offline mode, serving bundled catalog");
            let products = self.bundled();
            self.store(&products);
            return (products, CatalogOrigin::Bundled);
        }

        match self.client.fetch(&self.primary_url).await {
            Ok(products) => {
                tracing::debug!(count = products.len(), "catalog loaded from primary feed");
                self.store(&products);
                return (products, CatalogOrigin::Primary);
            }
            Err(err) => {
                tracing::warn!(error = %err, url = %self.primary_url, "primary catalog feed failed");
            }
        }

        match self.client.fetch(&self.secondary_url).await {
            Ok(products) => {
                tracing::debug!(count = products.len(), "catalog loaded from secondary feed");
                self.store(&products);
                (products, CatalogOrigin::Secondary)
            }
            Err(err) => {
                tracing::warn!(error = %err, url = %self.secondary_url, "secondary catalog feed failed, serving bundled catalog");
                let products = self.bundled();
                self.store(&products);
                (products, CatalogOrigin::Bundled)
            }
        }
    }

    /// Detail lookup against the in-memory cache only.
    pub fn product(&self, id: i64) -> Option<Product> {
        self.cache
            .read()
            .expect("catalog cache lock")
            .get(&id)
            .cloned()
    }

    /// Cache-first lookup that warms a cold cache once before answering.
    pub async fn lookup(&self, id: i64) -> Option<Product> {
        let cold = self.cache.read().expect("catalog cache lock").is_empty();
        if cold {
            self.load().await;
        }
        self.product(id)
    }

    fn bundled(&self) -> Vec<Product> {
        match serde_json::from_str::<Vec<Product>>(BUNDLED_CATALOG) {
            Ok(products) => products,
            Err(err) => {
                let err = CatalogError::from(err);
                tracing::warn!(error = %err, "bundled catalog failed to decode");
                Vec::new()
            }
        }
    }

    fn store(&self, products: &[Product]) {
        let mut cache = self.cache.write().expect("catalog cache lock");
        cache.clear();
        cache.extend(products.iter().map(|p| (p.id, p.clone())));
    }
}
