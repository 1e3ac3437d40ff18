use serde::Serialize;
use utoipa::ToSchema;

use crate::{catalog::CatalogOrigin, models::Product};

#[derive(Debug, Serialize, ToSchema)]
pub struct ProductList {
    pub items: Vec<Product>,
    /// Which source of the fallback chain served this listing.
    pub source: CatalogOrigin,
}
