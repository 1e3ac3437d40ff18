use std::convert::Infallible;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    response::sse::{Event, KeepAlive, Sse},
    routing::{get, post},
};
use futures::Stream;

use crate::{
    dto::orders::{CheckoutRequest, OrderList, OrderWithLines},
    error::AppResult,
    response::ApiResponse,
    routes::params::Pagination,
    services::order_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_orders))
        .route("/checkout", post(checkout))
        .route("/stream", get(stream_orders))
        .route("/{id}", get(get_order))
}

#[utoipa::path(
    get,
    path = "/api/orders",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20")
    ),
    responses(
        (status = 200, description = "Order headers, newest first", body = ApiResponse<OrderList>)
    ),
    tag = "Orders"
)]
pub async fn list_orders(
    State(state): State<AppState>,
    Query(pagination): Query<Pagination>,
) -> AppResult<Json<ApiResponse<OrderList>>> {
    Ok(Json(order_service::list_orders(&state, pagination).await?))
}

#[utoipa::path(
    post,
    path = "/api/orders/checkout",
    request_body = CheckoutRequest,
    responses(
        (status = 200, description = "Cart converted into an order", body = ApiResponse<OrderWithLines>),
        (status = 400, description = "Cart is empty"),
    ),
    tag = "Orders"
)]
pub async fn checkout(
    State(state): State<AppState>,
    payload: Option<Json<CheckoutRequest>>,
) -> AppResult<Json<ApiResponse<OrderWithLines>>> {
    let payload = payload.map(|Json(p)| p).unwrap_or_default();
    Ok(Json(order_service::checkout(&state, payload).await?))
}

#[utoipa::path(
    get,
    path = "/api/orders/{id}",
    params(("id" = i32, Path, description = "Order id")),
    responses(
        (status = 200, description = "Order header with its lines", body = ApiResponse<OrderWithLines>),
        (status = 404, description = "Unknown order"),
    ),
    tag = "Orders"
)]
pub async fn get_order(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<ApiResponse<OrderWithLines>>> {
    Ok(Json(order_service::get_order(&state, id).await?))
}

/// Re-emits the order history on every change, starting with the current one.
#[utoipa::path(
    get,
    path = "/api/orders/stream",
    responses((status = 200, description = "Server-sent events of order history snapshots")),
    tag = "Orders"
)]
pub async fn stream_orders(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let mut rx = state.feed.subscribe_orders();
    rx.mark_changed();

    let stream = futures::stream::unfold((rx, state), |(mut rx, state)| async move {
        rx.changed().await.ok()?;
        let snapshot = match order_service::snapshot(&state).await {
            Ok(snapshot) => snapshot,
            Err(err) => {
                tracing::warn!(error = %err, "order stream snapshot failed");
                return None;
            }
        };
        let event = Event::default().json_data(&snapshot).ok()?;
        Some((Ok(event), (rx, state)))
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}
