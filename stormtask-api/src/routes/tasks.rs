/// Task endpoints
///
/// A task belongs to whoever owns its group. Moving a task to another group
/// requires owning both groups.

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
use stormtask_shared::auth::authorization::{authorize_group_ownership, authorize_task_ownership};
use stormtask_shared::auth::middleware::AuthContext;
use stormtask_shared::models::task::{Task, TaskFields};
use validator::Validate;

/// Body of create and update requests
///
/// On update every field is replaced; omitted flags reset to `false` and an
/// omitted description to empty.
#[derive(Debug, Deserialize, Validate)]
pub struct TaskRequest {
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub finished: bool,

    #[serde(default)]
    pub archived: bool,

    pub group_id: i64,
}

impl From<TaskRequest> for TaskFields {
    fn from(req: TaskRequest) -> Self {
        TaskFields {
            name: req.name,
            description: req.description,
            finished: req.finished,
            archived: req.archived,
            group_id: req.group_id,
        }
    }
}

/// `POST /task`
///
/// # Errors
///
/// - `401 Unauthorized`: The target group belongs to another user
/// - `404 Not Found`: No such group
pub async fn create_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    ValidatedJson(req): ValidatedJson<TaskRequest>,
) -> ApiResult<Json<Task>> {
    authorize_group_ownership(&state.store, auth.user_id, req.group_id).await?;

    let task = state.store.create_task(req.into()).await?;
    Ok(Json(task))
}

/// `GET /task/:id`
pub async fn get_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    ResourceId(id): ResourceId,
) -> ApiResult<Json<Task>> {
    let task = authorize_task_ownership(&state.store, auth.user_id, id).await?;
    Ok(Json(task))
}

/// `PUT /task/:id`
///
/// # Errors
///
/// - `401 Unauthorized`: The task or the target group belongs to another user
/// - `404 Not Found`: No such task or target group
pub async fn update_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    ResourceId(id): ResourceId,
    ValidatedJson(req): ValidatedJson<TaskRequest>,
) -> ApiResult<Json<Task>> {
    let current = authorize_task_ownership(&state.store, auth.user_id, id).await?;
    if req.group_id != current.group_id {
        authorize_group_ownership(&state.store, auth.user_id, req.group_id).await?;
    }

    let task = state.store.update_task(id, req.into()).await?;
    Ok(Json(task))
}

/// `DELETE /task/:id`
pub async fn delete_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    ResourceId(id): ResourceId,
) -> ApiResult<StatusCode> {
    authorize_task_ownership(&state.store, auth.user_id, id).await?;

    if !state.store.delete_task(id).await? {
        return Err(ApiError::NotFound(format!("task {} not found", id)));
    }

    Ok(StatusCode::OK)
}
