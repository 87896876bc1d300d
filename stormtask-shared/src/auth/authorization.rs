/// Ownership checks for groups and tasks
///
/// Every mutation of a group or task must be preceded by one of these checks.
/// The check and the mutation stay separate steps so the caller can tell
/// "does not exist" from "exists but belongs to someone else".
///
/// # Ownership chain
///
/// ```text
/// Task --group_id--> Group --owner_id--> User
/// ```
///
/// # Example
///
/// ```no_run
/// use stormtask_shared::auth::authorization::{authorize_group_ownership, AuthzError};
/// use stormtask_shared::store::CredentialStore;
///
/// # async fn example(store: CredentialStore, caller: i64, group_id: i64) -> Result<(), Box<dyn std::error::Error>> {
/// match authorize_group_ownership(&store, caller, group_id).await {
///     Ok(group) => {
///         store.rename_group(group.id, "House").await?;
///     }
///     Err(AuthzError::NotFound { .. }) => println!("no such group"),
///     Err(AuthzError::Forbidden) => println!("not your group"),
///     Err(e) => return Err(e.into()),
/// }
/// # Ok(())
/// # }
/// ```

use crate::error::StoreError;
use crate::models::{group::Group, task::Task};
use crate::store::CredentialStore;

/// Error type for ownership checks
#[derive(Debug, thiserror::Error)]
pub enum AuthzError {
    /// The target resource does not exist
    #[error("{resource} {id} not found")]
    NotFound { resource: &'static str, id: i64 },

    /// The caller is authenticated but does not own the resource
    #[error("Not authorized to access this resource")]
    Forbidden,

    /// Looking up the resource failed
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Decides whether `user_id` may act on `group`
///
/// `group` is the result of looking up `group_id`.
pub fn check_group_owner(
    user_id: i64,
    group_id: i64,
    group: Option<Group>,
) -> Result<Group, AuthzError> {
    let group = group.ok_or(AuthzError::NotFound {
        resource: "group",
        id: group_id,
    })?;

    if !group.is_owned_by(user_id) {
        return Err(AuthzError::Forbidden);
    }

    Ok(group)
}

/// Confirms that `user_id` owns the group `group_id`
///
/// # Returns
///
/// The group on success.
///
/// # Errors
///
/// - `AuthzError::NotFound` if the group does not exist
/// - `AuthzError::Forbidden` if another user owns it
pub async fn authorize_group_ownership(
    store: &CredentialStore,
    user_id: i64,
    group_id: i64,
) -> Result<Group, AuthzError> {
    let group = store.get_group(group_id).await?;
    check_group_owner(user_id, group_id, group)
}

/// Confirms that `user_id` owns the group containing task `task_id`
///
/// # Returns
///
/// The task on success.
///
/// # Errors
///
/// - `AuthzError::NotFound` if the task (or its group) does not exist
/// - `AuthzError::Forbidden` if the task's group belongs to another user
pub async fn authorize_task_ownership(
    store: &CredentialStore,
    user_id: i64,
    task_id: i64,
) -> Result<Task, AuthzError> {
    let task = store.get_task(task_id).await?.ok_or(AuthzError::NotFound {
        resource: "task",
        id: task_id,
    })?;

    authorize_group_ownership(store, user_id, task.group_id).await?;
    Ok(task)
}
