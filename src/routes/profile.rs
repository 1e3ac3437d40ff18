use axum::{
    Json, Router,
    extract::State,
    routing::get,
};

use crate::{
    dto::profile::UpdateProfileRequest,
    error::AppResult,
    models::Profile,
    response::ApiResponse,
    services::profile_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(get_profile).put(update_profile))
}

#[utoipa::path(
    get,
    path = "/api/profile",
    responses(
        (status = 200, description = "The device profile", body = ApiResponse<Profile>),
        (status = 404, description = "No profile saved yet"),
    ),
    tag = "Profile"
)]
pub async fn get_profile(State(state): State<AppState>) -> AppResult<Json<ApiResponse<Profile>>> {
    Ok(Json(profile_service::get_profile(&state).await?))
}

#[utoipa::path(
    put,
    path = "/api/profile",
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Profile created or replaced", body = ApiResponse<Profile>)
    ),
    tag = "Profile"
)]
pub async fn update_profile(
    State(state): State<AppState>,
    Json(payload): Json<UpdateProfileRequest>,
) -> AppResult<Json<ApiResponse<Profile>>> {
    Ok(Json(profile_service::update_profile(&state, payload).await?))
}
