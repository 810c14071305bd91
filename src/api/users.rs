//! User profile endpoints

use axum::{extract::State, Json};

use crate::{
    error::AppResult,
    models::user::{UpdateProfile, UserProfile},
};

use super::AuthenticatedUser;

/// Get own profile
#[utoipa::path(
    get,
    path = "/users/me",
    tag = "users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Profile", body = UserProfile),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn get_profile(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<UserProfile>> {
    let user_id = claims.user_id()?;

    let user = state.services.auth.current_user(user_id).await?;
    Ok(Json(UserProfile::from(&user)))
}

/// Update own profile. The current password is required.
#[utoipa::path(
    put,
    path = "/users/me",
    tag = "users",
    security(("bearer_auth" = [])),
    request_body = UpdateProfile,
    responses(
        (status = 200, description = "Updated profile", body = UserProfile),
        (status = 400, description = "Password missing or wrong"),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn update_profile(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(update): Json<UpdateProfile>,
) -> AppResult<Json<UserProfile>> {
    let user_id = claims.user_id()?;

    let user = state.services.auth.update_profile(user_id, update).await?;
    Ok(Json(UserProfile::from(&user)))
}
