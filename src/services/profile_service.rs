use sea_orm::{ActiveModelTrait, EntityTrait, Set};

use crate::{
    dto::profile::UpdateProfileRequest,
    entity::profile::{ActiveModel as ProfileActive, Entity as ProfileRow, Model as ProfileModel},
    error::{AppError, AppResult},
    models::Profile,
    response::ApiResponse,
    state::AppState,
};

const PROFILE_ROW_ID: i32 = 0;

pub async fn get_profile(state: &AppState) -> AppResult<ApiResponse<Profile>> {
    let profile = ProfileRow::find_by_id(PROFILE_ROW_ID)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    Ok(ApiResponse::success(
        "Profile",
        profile_from_entity(profile),
        None,
    ))
}

/// Upsert of the single profile row.
pub async fn update_profile(
    state: &AppState,
    payload: UpdateProfileRequest,
) -> AppResult<ApiResponse<Profile>> {
    let existing = ProfileRow::find_by_id(PROFILE_ROW_ID).one(&state.orm).await?;

    let profile = match existing {
        Some(row) => {
            let mut active: ProfileActive = row.into();
            active.name = Set(payload.name);
            active.email = Set(payload.email);
            active.photo_path = Set(payload.photo_path);
            active.update(&state.orm).await?
        }
        None => {
            ProfileActive {
                id: Set(PROFILE_ROW_ID),
                name: Set(payload.name),
                email: Set(payload.email),
                photo_path: Set(payload.photo_path),
            }
            .insert(&state.orm)
            .await?
        }
    };

    Ok(ApiResponse::success(
        "Profile saved",
        profile_from_entity(profile),
        None,
    ))
}

fn profile_from_entity(model: ProfileModel) -> Profile {
    Profile {
        name: model.name,
        email: model.email,
        photo_path: model.photo_path,
    }
}
