use tracing::info;

use super::CredentialStore;
use crate::db::mapper::{self, Record};
use crate::error::{StoreError, StoreResult};
use crate::models::group::Group;

impl CredentialStore {
    /// Creates a group for `owner_id`
    ///
    /// # Errors
    ///
    /// - `StoreError::Conflict` if the owner already has a group with this name
    /// - `StoreError::InvalidReference` if the owner does not exist
    pub async fn create_group(&self, owner_id: i64, name: &str) -> StoreResult<Group> {
        let sql = mapper::returning_sql::<Group>(&format!(
            "INSERT INTO {} (owner_id, name) VALUES ($1, $2)",
            Group::TABLE
        ));
        let group = sqlx::query_as::<_, Group>(&sql)
            .bind(owner_id)
            .bind(name)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| group_write_error(e, owner_id, name))?;

        info!(group_id = group.id, owner_id, "Group created");
        Ok(group)
    }

    /// Finds a group by ID
    pub async fn get_group(&self, id: i64) -> StoreResult<Option<Group>> {
        Ok(mapper::fetch_by(&self.pool, "id", id).await?)
    }

    /// Finds the group an owner has under `name`
    pub async fn get_group_by_owner_and_name(
        &self,
        owner_id: i64,
        name: &str,
    ) -> StoreResult<Option<Group>> {
        let sql = mapper::select_sql::<Group>("owner_id = $1 AND name = $2");
        let group = sqlx::query_as::<_, Group>(&sql)
            .bind(owner_id)
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;

        Ok(group)
    }

    /// Lists an owner's groups, oldest first
    ///
    /// Returns an empty vector when the owner has none.
    pub async fn list_groups_by_owner(&self, owner_id: i64) -> StoreResult<Vec<Group>> {
        Ok(mapper::fetch_all_by(&self.pool, "owner_id", owner_id).await?)
    }

    /// Renames a group
    ///
    /// Returns `None` if the group does not exist. Does not check who is
    /// asking.
    ///
    /// # Errors
    ///
    /// - `StoreError::Conflict` if the owner already has a group with the new name
    pub async fn rename_group(&self, id: i64, new_name: &str) -> StoreResult<Option<Group>> {
        let sql = mapper::returning_sql::<Group>(&format!(
            "UPDATE {} SET name = $2 WHERE id = $1",
            Group::TABLE
        ));
        let group = sqlx::query_as::<_, Group>(&sql)
            .bind(id)
            .bind(new_name)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StoreError::classify(e, &format!("group name '{}' already in use", new_name)))?;

        Ok(group)
    }

    /// Deletes a group and all of its tasks
    ///
    /// Tasks go first. Returns `false` if no group row was deleted.
    pub async fn delete_group(&self, id: i64) -> StoreResult<bool> {
        let tasks = self.delete_tasks_by_group(id).await?;
        let deleted = mapper::delete_by::<Group, _>(&self.pool, "id", id).await?;

        info!(group_id = id, tasks_deleted = tasks, "Group deleted");
        Ok(deleted > 0)
    }

    /// Deletes every group of an owner, one group at a time
    ///
    /// Each group goes through [`CredentialStore::delete_group`] so its tasks
    /// are removed too. Returns the number of groups deleted.
    pub async fn delete_groups_by_owner(&self, owner_id: i64) -> StoreResult<usize> {
        let groups = self.list_groups_by_owner(owner_id).await?;

        let mut deleted = 0;
        for group in &groups {
            if self.delete_group(group.id).await? {
                deleted += 1;
            }
        }

        Ok(deleted)
    }
}

fn group_write_error(err: sqlx::Error, owner_id: i64, name: &str) -> StoreError {
    match StoreError::classify(err, "") {
        StoreError::Conflict(_) => {
            StoreError::Conflict(format!("group name '{}' already in use", name))
        }
        StoreError::InvalidReference(_) => {
            StoreError::InvalidReference(format!("user {} does not exist", owner_id))
        }
        other => other,
    }
}
