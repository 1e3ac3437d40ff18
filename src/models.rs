use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Catalog item as served by the remote product feeds and the bundled copy.
/// Unknown remote fields (ratings and the like) are dropped on decode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Product {
    pub id: i64,
    pub title: String,
    pub price: f64,
    pub description: String,
    pub category: String,
    pub image: String,
}

/// One cart line per product id; title, price and image are snapshotted at
/// add time so the cart survives catalog changes and offline sessions.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CartLine {
    pub id: i32,
    pub product_id: i64,
    pub title: String,
    pub price: f64,
    pub image: String,
    pub quantity: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Order {
    pub id: i32,
    pub order_number: String,
    pub total_amount: f64,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

/// Purchase-time snapshot of a cart line. Immutable once the order exists.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OrderLine {
    pub id: i32,
    pub order_id: i32,
    pub product_id: i64,
    pub title: String,
    pub price: f64,
    pub quantity: i32,
    pub image: String,
    pub created_at: DateTime<Utc>,
}

/// Saved payment method. Only the last four digits are ever kept.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SavedCard {
    pub id: i32,
    pub holder_name: String,
    pub last_four: String,
    pub expiry: String,
    pub network: String,
    pub is_default: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Profile {
    pub name: String,
    pub email: String,
    pub photo_path: Option<String>,
}
