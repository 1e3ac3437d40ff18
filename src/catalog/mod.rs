//! Product catalog aggregated from layered sources: the primary remote feed,
//! a secondary static JSON mirror, and a copy bundled into the binary.

mod client;
mod repository;

pub use client::RemoteCatalogClient;
pub use repository::CatalogRepository;

use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

/// Which source of the fallback chain produced the current catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum CatalogOrigin {
    Primary,
    Secondary,
    Bundled,
}

/// Failure of a single source. Never surfaced over HTTP; it is the signal
/// to move down the chain.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("bundled catalog is invalid: {0}")]
    Bundled(#[from] serde_json::Error),
}
