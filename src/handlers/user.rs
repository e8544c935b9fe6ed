use axum::{Json, extract::State};

use crate::error::ApiError;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::user::{UpdateProfileRequest, UpdateResponse, UserResponse};
use crate::services;
use crate::state::AppState;

/// Returns the profile of whoever the token says is asking.
pub async fn current_profile(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<UserResponse>, ApiError> {
    let profile = services::user::profile(&state.db, &user.username).await?;
    Ok(Json(profile))
}

/// Applies a partial update to a user's profile.
///
/// The `AuthenticatedUser` parameter is what makes this route protected;
/// the update itself targets the username in the body.
pub async fn update_profile(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<Json<UpdateResponse>, ApiError> {
    let updated = services::user::update(&state.db, payload).await?;
    Ok(Json(updated))
}
