use std::convert::Infallible;

use axum::{
    Json, Router,
    extract::{Path, State},
    response::sse::{Event, KeepAlive, Sse},
    routing::{delete, get, post},
};
use futures::Stream;

use crate::{
    dto::cart::{AddToCartRequest, CartList},
    error::AppResult,
    models::CartLine,
    response::ApiResponse,
    services::cart_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(cart_list).post(add_to_cart).delete(clear_cart))
        .route("/stream", get(stream_cart))
        .route("/{product_id}", delete(remove_from_cart))
        .route("/{product_id}/decrease", post(decrease_quantity))
}

#[utoipa::path(
    get,
    path = "/api/cart",
    responses(
        (status = 200, description = "Cart lines and computed total", body = ApiResponse<CartList>)
    ),
    tag = "Cart"
)]
pub async fn cart_list(State(state): State<AppState>) -> AppResult<Json<ApiResponse<CartList>>> {
    Ok(Json(cart_service::list_cart(&state).await?))
}

#[utoipa::path(
    post,
    path = "/api/cart",
    request_body = AddToCartRequest,
    responses(
        (status = 200, description = "Line added or quantity incremented", body = ApiResponse<CartLine>),
        (status = 400, description = "Product not in the catalog"),
    ),
    tag = "Cart"
)]
pub async fn add_to_cart(
    State(state): State<AppState>,
    Json(payload): Json<AddToCartRequest>,
) -> AppResult<Json<ApiResponse<CartLine>>> {
    Ok(Json(cart_service::add_to_cart(&state, payload).await?))
}

#[utoipa::path(
    post,
    path = "/api/cart/{product_id}/decrease",
    params(("product_id" = i64, Path, description = "Product id of the cart line")),
    responses(
        (status = 200, description = "Quantity decremented, line removed at one"),
        (status = 404, description = "No such cart line"),
    ),
    tag = "Cart"
)]
pub async fn decrease_quantity(
    State(state): State<AppState>,
    Path(product_id): Path<i64>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    Ok(Json(
        cart_service::decrease_quantity(&state, product_id).await?,
    ))
}

#[utoipa::path(
    delete,
    path = "/api/cart/{product_id}",
    params(("product_id" = i64, Path, description = "Product id of the cart line")),
    responses(
        (status = 200, description = "Line removed"),
        (status = 404, description = "No such cart line"),
    ),
    tag = "Cart"
)]
pub async fn remove_from_cart(
    State(state): State<AppState>,
    Path(product_id): Path<i64>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    Ok(Json(cart_service::remove_line(&state, product_id).await?))
}

#[utoipa::path(
    delete,
    path = "/api/cart",
    responses((status = 200, description = "Every line removed")),
    tag = "Cart"
)]
pub async fn clear_cart(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    Ok(Json(cart_service::clear_cart(&state).await?))
}

/// Re-emits the cart snapshot on every underlying change, starting with the
/// current contents.
#[utoipa::path(
    get,
    path = "/api/cart/stream",
    responses((status = 200, description = "Server-sent events of cart snapshots")),
    tag = "Cart"
)]
pub async fn stream_cart(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let mut rx = state.feed.subscribe_cart();
    rx.mark_changed();

    let stream = futures::stream::unfold((rx, state), |(mut rx, state)| async move {
        rx.changed().await.ok()?;
        let snapshot = match cart_service::snapshot(&state).await {
            Ok(snapshot) => snapshot,
            Err(err) => {
                tracing::warn!(error = %err, "cart stream snapshot failed");
                return None;
            }
        };
        let event = Event::default().json_data(&snapshot).ok()?;
        Some((Ok(event), (rx, state)))
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}
