/// User account endpoints
///
/// - `POST /user` - Register (public)
/// - `GET /user` - Current profile
/// - `PUT /user` - Change email, name and/or password
/// - `DELETE /user` - Delete the account with all its groups and tasks

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::ValidatedJson,
    routes::auth::clear_session_cookie,
};
use axum::{extract::State, http::StatusCode, Extension, Json};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use stormtask_shared::auth::middleware::AuthContext;
use stormtask_shared::models::user::{NewUser, User, UserChanges};
use tracing::info;
use validator::Validate;

/// Register request
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Display name
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: String,

    /// Password
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Profile update request; absent fields keep their value
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,

    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: Option<String>,

    #[validate(length(min = 1, message = "Password must not be empty"))]
    pub password: Option<String>,
}

/// Register a new user
///
/// New accounts are never administrators.
///
/// # Errors
///
/// - `400 Bad Request`: Validation failed
/// - `409 Conflict`: Email already registered
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<RegisterRequest>,
) -> ApiResult<Json<User>> {
    let user = state
        .store
        .create_user(NewUser {
            email: req.email,
            name: req.name,
            password: req.password,
            is_admin: false,
        })
        .await?;

    Ok(Json(user))
}

/// Current user's profile
///
/// # Errors
///
/// - `404 Not Found`: The account was deleted after the token was issued
pub async fn get_current_user(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<User>> {
    let user = state
        .store
        .get_user_by_id(auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(user))
}

/// Update the current user
///
/// Claims in already-issued tokens keep the old email and name until the
/// next login.
///
/// # Errors
///
/// - `400 Bad Request`: Validation failed or nothing to change
/// - `404 Not Found`: The account no longer exists
/// - `409 Conflict`: New email belongs to another user
pub async fn update_current_user(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    ValidatedJson(req): ValidatedJson<UpdateUserRequest>,
) -> ApiResult<Json<User>> {
    let changes = UserChanges {
        email: req.email,
        name: req.name,
        password: req.password,
    };
    if changes.is_empty() {
        return Err(ApiError::BadRequest("No fields to update".to_string()));
    }

    let user = state
        .store
        .update_user(auth.user_id, changes)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(user))
}

/// Delete the current user together with their groups and tasks
///
/// Also clears the session cookie.
pub async fn delete_current_user(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    jar: CookieJar,
) -> ApiResult<(CookieJar, StatusCode)> {
    if !state.store.delete_user(auth.user_id).await? {
        return Err(ApiError::NotFound("User not found".to_string()));
    }

    info!(user_id = auth.user_id, "Account closed");
    Ok((clear_session_cookie(jar, state.cookie_name()), StatusCode::OK))
}
