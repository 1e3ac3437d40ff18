use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, ModelTrait, QueryFilter, QueryOrder, Set,
};

use crate::{
    db::DbPool,
    dto::cart::{AddToCartRequest, CartList},
    entity::cart_items::{
        ActiveModel as CartLineActive, Column as CartCol, Entity as CartItems,
        Model as CartLineModel,
    },
    error::{AppError, AppResult},
    models::CartLine,
    response::{ApiResponse, Meta},
    state::AppState,
};

pub async fn list_cart(state: &AppState) -> AppResult<ApiResponse<CartList>> {
    let data = snapshot(state).await?;
    let count = data.items.len() as i64;
    Ok(ApiResponse::success("OK", data, Some(Meta::new(1, count, count))))
}

/// Current cart contents plus the computed total, newest line first.
/// Shared by the list endpoint and the change stream.
pub async fn snapshot(state: &AppState) -> AppResult<CartList> {
    let items: Vec<CartLine> = CartItems::find()
        .order_by_desc(CartCol::CreatedAt)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(cart_line_from_entity)
        .collect();

    let total = cart_total(&state.pool).await?;
    Ok(CartList { items, total })
}

/// Live sum of price times quantity straight from the store.
pub async fn cart_total(pool: &DbPool) -> AppResult<f64> {
    let total: f64 =
        sqlx::query_scalar("SELECT COALESCE(SUM(price * quantity), 0.0) FROM cart_items")
            .fetch_one(pool)
            .await?;
    Ok(total)
}

/// Add one unit of a catalog product. An existing line is incremented, a new
/// line snapshots title, price and image from the catalog cache.
pub async fn add_to_cart(
    state: &AppState,
    payload: AddToCartRequest,
) -> AppResult<ApiResponse<CartLine>> {
    let product = state
        .catalog
        .lookup(payload.product_id)
        .await
        .ok_or_else(|| AppError::BadRequest("product not found in catalog".to_string()))?;

    let existing = CartItems::find()
        .filter(CartCol::ProductId.eq(payload.product_id))
        .one(&state.orm)
        .await?;

    let line = match existing {
        Some(line) => {
            let quantity = line.quantity + 1;
            let mut active: CartLineActive = line.into();
            active.quantity = Set(quantity);
            active.update(&state.orm).await?
        }
        None => {
            CartLineActive {
                product_id: Set(product.id),
                title: Set(product.title.clone()),
                price: Set(product.price),
                image: Set(product.image.clone()),
                quantity: Set(1),
                created_at: Set(Utc::now()),
                ..Default::default()
            }
            .insert(&state.orm)
            .await?
        }
    };

    state.feed.cart_changed();
    Ok(ApiResponse::success(
        "Added to cart",
        cart_line_from_entity(line),
        None,
    ))
}

/// Decrement a line's quantity; dropping below one removes the line.
pub async fn decrease_quantity(
    state: &AppState,
    product_id: i64,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let line = CartItems::find()
        .filter(CartCol::ProductId.eq(product_id))
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    if line.quantity > 1 {
        let quantity = line.quantity - 1;
        let mut active: CartLineActive = line.into();
        active.quantity = Set(quantity);
        active.update(&state.orm).await?;
    } else {
        line.delete(&state.orm).await?;
    }

    state.feed.cart_changed();
    Ok(ApiResponse::empty("Quantity updated"))
}

pub async fn remove_line(
    state: &AppState,
    product_id: i64,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let result = CartItems::delete_many()
        .filter(CartCol::ProductId.eq(product_id))
        .exec(&state.orm)
        .await?;

    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    state.feed.cart_changed();
    Ok(ApiResponse::empty("Removed from cart"))
}

pub async fn clear_cart(state: &AppState) -> AppResult<ApiResponse<serde_json::Value>> {
    CartItems::delete_many().exec(&state.orm).await?;
    state.feed.cart_changed();
    Ok(ApiResponse::empty("Cart cleared"))
}

fn cart_line_from_entity(model: CartLineModel) -> CartLine {
    CartLine {
        id: model.id,
        product_id: model.product_id,
        title: model.title,
        price: model.price,
        image: model.image,
        quantity: model.quantity,
        created_at: model.created_at,
    }
}
