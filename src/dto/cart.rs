use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::CartLine;

#[derive(Debug, Deserialize, ToSchema)]
pub struct AddToCartRequest {
    pub product_id: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CartList {
    pub items: Vec<CartLine>,
    /// Live sum of price times quantity over every line.
    pub total: f64,
}
