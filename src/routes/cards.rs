use std::convert::Infallible;

use axum::{
    Json, Router,
    extract::{Path, State},
    response::sse::{Event, KeepAlive, Sse},
    routing::{delete, get, put},
};
use futures::Stream;

use crate::{
    dto::cards::{CardList, SaveCardRequest},
    error::AppResult,
    models::SavedCard,
    response::ApiResponse,
    services::card_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_cards).post(save_card))
        .route("/stream", get(stream_cards))
        .route("/{id}", delete(delete_card))
        .route("/{id}/default", put(set_default_card))
}

#[utoipa::path(
    get,
    path = "/api/cards",
    responses(
        (status = 200, description = "Saved cards, default first", body = ApiResponse<CardList>)
    ),
    tag = "Cards"
)]
pub async fn list_cards(State(state): State<AppState>) -> AppResult<Json<ApiResponse<CardList>>> {
    Ok(Json(card_service::list_cards(&state).await?))
}

#[utoipa::path(
    post,
    path = "/api/cards",
    request_body = SaveCardRequest,
    responses(
        (status = 200, description = "Card stored, or the existing duplicate returned", body = ApiResponse<SavedCard>),
        (status = 400, description = "Card number too short"),
    ),
    tag = "Cards"
)]
pub async fn save_card(
    State(state): State<AppState>,
    Json(payload): Json<SaveCardRequest>,
) -> AppResult<Json<ApiResponse<SavedCard>>> {
    Ok(Json(card_service::save_card(&state, payload).await?))
}

#[utoipa::path(
    put,
    path = "/api/cards/{id}/default",
    params(("id" = i32, Path, description = "Card id")),
    responses(
        (status = 200, description = "Card is now the only default", body = ApiResponse<SavedCard>),
        (status = 404, description = "Unknown card"),
    ),
    tag = "Cards"
)]
pub async fn set_default_card(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<ApiResponse<SavedCard>>> {
    Ok(Json(card_service::set_default_card(&state, id).await?))
}

#[utoipa::path(
    delete,
    path = "/api/cards/{id}",
    params(("id" = i32, Path, description = "Card id")),
    responses(
        (status = 200, description = "Card deleted"),
        (status = 404, description = "Unknown card"),
    ),
    tag = "Cards"
)]
pub async fn delete_card(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    Ok(Json(card_service::delete_card(&state, id).await?))
}

/// Re-emits the saved-card list on every change, starting with the current
/// one.
#[utoipa::path(
    get,
    path = "/api/cards/stream",
    responses((status = 200, description = "Server-sent events of saved-card snapshots")),
    tag = "Cards"
)]
pub async fn stream_cards(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let mut rx = state.feed.subscribe_cards();
    rx.mark_changed();

    let stream = futures::stream::unfold((rx, state), |(mut rx, state)| async move {
        rx.changed().await.ok()?;
        let snapshot = match card_service::snapshot(&state).await {
            Ok(snapshot) => snapshot,
            Err(err) => {
                tracing::warn!(error = %err, "card stream snapshot failed");
                return None;
            }
        };
        let event = Event::default().json_data(&snapshot).ok()?;
        Some((Ok(event), (rx, state)))
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}
