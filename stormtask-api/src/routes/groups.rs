/// Group endpoints
///
/// Every route acts on behalf of the caller: groups are created for the
/// caller, listed for the caller, and touched only after an ownership check.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::{ResourceId, ValidatedJson},
};
use axum::{
    extract::State,
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use stormtask_shared::auth::authorization::authorize_group_ownership;
use stormtask_shared::auth::middleware::AuthContext;
use stormtask_shared::models::{group::Group, task::Task};
use validator::Validate;

/// Body of create and rename requests
#[derive(Debug, Deserialize, Validate)]
pub struct GroupRequest {
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: String,
}

/// `POST /group`
///
/// # Errors
///
/// - `409 Conflict`: The caller already has a group with this name
pub async fn create_group(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    ValidatedJson(req): ValidatedJson<GroupRequest>,
) -> ApiResult<Json<Group>> {
    let group = state.store.create_group(auth.user_id, &req.name).await?;
    Ok(Json(group))
}

/// `GET /groups`
pub async fn list_groups(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<Vec<Group>>> {
    let groups = state.store.list_groups_by_owner(auth.user_id).await?;
    Ok(Json(groups))
}

/// `GET /group/:id`
pub async fn get_group(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    ResourceId(id): ResourceId,
) -> ApiResult<Json<Group>> {
    let group = authorize_group_ownership(&state.store, auth.user_id, id).await?;
    Ok(Json(group))
}

/// `PUT /group/:id`
///
/// # Errors
///
/// - `401 Unauthorized`: The group belongs to another user
/// - `404 Not Found`: No such group
/// - `409 Conflict`: The caller already has a group with the new name
pub async fn rename_group(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    ResourceId(id): ResourceId,
    ValidatedJson(req): ValidatedJson<GroupRequest>,
) -> ApiResult<Json<Group>> {
    authorize_group_ownership(&state.store, auth.user_id, id).await?;

    let group = state
        .store
        .rename_group(id, &req.name)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("group {} not found", id)))?;

    Ok(Json(group))
}

/// `DELETE /group/:id`, removing its tasks first
pub async fn delete_group(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    ResourceId(id): ResourceId,
) -> ApiResult<StatusCode> {
    authorize_group_ownership(&state.store, auth.user_id, id).await?;

    if !state.store.delete_group(id).await? {
        return Err(ApiError::NotFound(format!("group {} not found", id)));
    }

    Ok(StatusCode::OK)
}

/// `GET /group/:id/tasks`
pub async fn list_group_tasks(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    ResourceId(id): ResourceId,
) -> ApiResult<Json<Vec<Task>>> {
    authorize_group_ownership(&state.store, auth.user_id, id).await?;

    let tasks = state.store.list_tasks_by_group(id).await?;
    Ok(Json(tasks))
}
