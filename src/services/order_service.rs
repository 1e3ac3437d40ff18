use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    dto::orders::{CheckoutRequest, OrderList, OrderWithLines},
    entity::{
        cart_items::Entity as CartItems,
        order_items::{
            ActiveModel as OrderLineActive, Column as OrderLineCol, Entity as OrderItems,
            Model as OrderLineModel,
        },
        orders::{ActiveModel as OrderActive, Column as OrderCol, Entity as Orders, Model as OrderModel},
    },
    error::{AppError, AppResult},
    models::{Order, OrderLine},
    response::{ApiResponse, Meta},
    routes::params::Pagination,
    services::card_service,
    state::AppState,
};

/// Convert the cart snapshot into an immutable order.
///
/// The whole unit is one transaction: order header, one line per cart line,
/// and the cart clear either all land or none do. An empty cart fails before
/// anything is written.
pub async fn checkout(
    state: &AppState,
    payload: CheckoutRequest,
) -> AppResult<ApiResponse<OrderWithLines>> {
    let txn = state.orm.begin().await?;

    let cart_lines = CartItems::find().all(&txn).await?;
    if cart_lines.is_empty() {
        return Err(AppError::BadRequest("cart is empty".to_string()));
    }

    let total_amount: f64 = cart_lines
        .iter()
        .map(|line| line.price * f64::from(line.quantity))
        .sum();
    let now = Utc::now();

    let order = OrderActive {
        order_number: Set(build_order_number()),
        total_amount: Set(total_amount),
        status: Set("completed".to_string()),
        created_at: Set(now),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    let mut lines = Vec::with_capacity(cart_lines.len());
    for cart_line in &cart_lines {
        let line = OrderLineActive {
            order_id: Set(order.id),
            product_id: Set(cart_line.product_id),
            title: Set(cart_line.title.clone()),
            price: Set(cart_line.price),
            quantity: Set(cart_line.quantity),
            image: Set(cart_line.image.clone()),
            created_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
        lines.push(order_line_from_entity(line));
    }

    // the atomic unit that creates the order also empties the cart
    CartItems::delete_many().exec(&txn).await?;

    txn.commit().await?;

    state.feed.cart_changed();
    state.feed.orders_changed();

    // best-effort side step: a card save failure never fails the order
    if let Some(card) = payload.save_card {
        if let Err(err) = card_service::save_card(state, card).await {
            tracing::warn!(error = %err, "card save after checkout failed");
        }
    }

    Ok(ApiResponse::success(
        "Order created",
        OrderWithLines {
            order: order_from_entity(order),
            lines,
        },
        Some(Meta::empty()),
    ))
}

pub async fn list_orders(
    state: &AppState,
    pagination: Pagination,
) -> AppResult<ApiResponse<OrderList>> {
    let (page, limit, offset) = pagination.normalize();

    let finder = Orders::find().order_by_desc(OrderCol::CreatedAt);
    let total = finder.clone().count(&state.orm).await? as i64;

    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(order_from_entity)
        .collect();

    Ok(ApiResponse::success(
        "Orders",
        OrderList { items },
        Some(Meta::new(page, limit, total)),
    ))
}

pub async fn get_order(state: &AppState, id: i32) -> AppResult<ApiResponse<OrderWithLines>> {
    let order = Orders::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let lines = OrderItems::find()
        .filter(OrderLineCol::OrderId.eq(order.id))
        .all(&state.orm)
        .await?
        .into_iter()
        .map(order_line_from_entity)
        .collect();

    Ok(ApiResponse::success(
        "OK",
        OrderWithLines {
            order: order_from_entity(order),
            lines,
        },
        Some(Meta::empty()),
    ))
}

/// Every order header, newest first, for the change stream.
pub async fn snapshot(state: &AppState) -> AppResult<OrderList> {
    let items = Orders::find()
        .order_by_desc(OrderCol::CreatedAt)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(order_from_entity)
        .collect();
    Ok(OrderList { items })
}

fn order_from_entity(model: OrderModel) -> Order {
    Order {
        id: model.id,
        order_number: model.order_number,
        total_amount: model.total_amount,
        status: model.status,
        created_at: model.created_at,
    }
}

fn order_line_from_entity(model: OrderLineModel) -> OrderLine {
    OrderLine {
        id: model.id,
        order_id: model.order_id,
        product_id: model.product_id,
        title: model.title,
        price: model.price,
        quantity: model.quantity,
        image: model.image,
        created_at: model.created_at,
    }
}

fn build_order_number() -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("ORD-{}", suffix[..8].to_uppercase())
}
