use tracing::{debug, info};

use super::CredentialStore;
use crate::db::mapper::{self, Record};
use crate::error::{StoreError, StoreResult};
use crate::models::task::{Task, TaskFields};

impl CredentialStore {
    /// Creates a task inside a group
    ///
    /// # Errors
    ///
    /// - `StoreError::InvalidReference` if the group does not exist
    pub async fn create_task(&self, fields: TaskFields) -> StoreResult<Task> {
        let sql = mapper::returning_sql::<Task>(&format!(
            "INSERT INTO {} (name, description, finished, archived, group_id) \
             VALUES ($1, $2, $3, $4, $5)",
            Task::TABLE
        ));
        let task = sqlx::query_as::<_, Task>(&sql)
            .bind(&fields.name)
            .bind(&fields.description)
            .bind(fields.finished)
            .bind(fields.archived)
            .bind(fields.group_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                StoreError::classify(e, &format!("group {} does not exist", fields.group_id))
            })?;

        info!(task_id = task.id, group_id = task.group_id, "Task created");
        Ok(task)
    }

    /// Finds a task by ID
    pub async fn get_task(&self, id: i64) -> StoreResult<Option<Task>> {
        Ok(mapper::fetch_by(&self.pool, "id", id).await?)
    }

    /// Lists the tasks of a group
    ///
    /// Returns an empty vector when the group has none (or does not exist).
    pub async fn list_tasks_by_group(&self, group_id: i64) -> StoreResult<Vec<Task>> {
        Ok(mapper::fetch_all_by(&self.pool, "group_id", group_id).await?)
    }

    /// Replaces every field of a task, possibly moving it to another group
    ///
    /// # Errors
    ///
    /// - `StoreError::NotFound` if the task or the target group does not exist
    pub async fn update_task(&self, id: i64, fields: TaskFields) -> StoreResult<Task> {
        if self.get_group(fields.group_id).await?.is_none() {
            return Err(StoreError::NotFound(format!("group {}", fields.group_id)));
        }

        let sql = mapper::returning_sql::<Task>(&format!(
            "UPDATE {} SET name = $2, description = $3, finished = $4, archived = $5, \
             group_id = $6 WHERE id = $1",
            Task::TABLE
        ));
        let task = sqlx::query_as::<_, Task>(&sql)
            .bind(id)
            .bind(&fields.name)
            .bind(&fields.description)
            .bind(fields.finished)
            .bind(fields.archived)
            .bind(fields.group_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| match StoreError::classify(e, "") {
                // The group vanished between the check and the update
                StoreError::InvalidReference(_) => {
                    StoreError::NotFound(format!("group {}", fields.group_id))
                }
                other => other,
            })?
            .ok_or_else(|| StoreError::NotFound(format!("task {}", id)))?;

        debug!(task_id = id, group_id = task.group_id, "Task updated");
        Ok(task)
    }

    /// Deletes a single task; returns `false` if it did not exist
    pub async fn delete_task(&self, id: i64) -> StoreResult<bool> {
        let deleted = mapper::delete_by::<Task, _>(&self.pool, "id", id).await?;
        Ok(deleted > 0)
    }

    /// Deletes every task of a group and returns how many were removed
    pub async fn delete_tasks_by_group(&self, group_id: i64) -> StoreResult<u64> {
        Ok(mapper::delete_by::<Task, _>(&self.pool, "group_id", group_id).await?)
    }
}
