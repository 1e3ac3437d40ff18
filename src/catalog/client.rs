use std::time::Duration;

use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};

use crate::models::Product;

use super::CatalogError;

/// Thin reqwest wrapper shared by the two remote catalog feeds.
#[derive(Debug, Clone)]
pub struct RemoteCatalogClient {
    client: reqwest::Client,
}

impl RemoteCatalogClient {
    pub fn new(timeout: Duration) -> Result<Self, CatalogError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self { client })
    }

    /// One attempt against one feed. Transport errors, non-success statuses
    /// and decode failures all come back as [`CatalogError`].
    pub async fn fetch(&self, url: &str) -> Result<Vec<Product>, CatalogError> {
        let products = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .json::<Vec<Product>>()
            .await?;
        Ok(products)
    }
}
