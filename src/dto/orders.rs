use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    dto::cards::SaveCardRequest,
    models::{Order, OrderLine},
};

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct CheckoutRequest {
    /// Optionally persist the payment card used for this order. A failure
    /// here never fails the checkout itself.
    #[serde(default)]
    pub save_card: Option<SaveCardRequest>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderWithLines {
    pub order: Order,
    pub lines: Vec<OrderLine>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderList {
    pub items: Vec<Order>,
}
