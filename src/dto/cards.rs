use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::SavedCard;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct SaveCardRequest {
    pub holder_name: String,
    /// Full number as entered; only the last four digits are ever stored.
    pub card_number: String,
    /// MM/YYYY, display only.
    pub expiry: String,
    /// Card network tag (VISA, MASTERCARD, ...), used for duplicate detection
    /// together with the last four digits.
    pub network: String,
    #[serde(default)]
    pub set_default: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CardList {
    pub items: Vec<SavedCard>,
}
