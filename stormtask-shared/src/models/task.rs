/// Task model
///
/// # Schema
///
/// ```sql
/// CREATE TABLE tasks (
///     id BIGSERIAL PRIMARY KEY,
///     name VARCHAR(255) NOT NULL,
///     description TEXT NOT NULL DEFAULT '',
///     finished BOOLEAN NOT NULL DEFAULT FALSE,
///     archived BOOLEAN NOT NULL DEFAULT FALSE,
///     group_id BIGINT NOT NULL REFERENCES task_groups (id)
/// );
/// ```

use serde::{Deserialize, Serialize};

use crate::db::mapper::Record;

/// A work item inside a group
///
/// `finished` and `archived` are independent flags: a task can be archived
/// without being finished and vice versa.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    /// System-assigned identifier
    pub id: i64,

    /// Short title
    pub name: String,

    /// Free-text description
    pub description: String,

    /// Whether the task is done
    pub finished: bool,

    /// Whether the task is hidden from active lists
    pub archived: bool,

    /// Group the task belongs to
    pub group_id: i64,
}

impl Record for Task {
    const TABLE: &'static str = "tasks";
    const COLUMNS: &'static str = "id, name, description, finished, archived, group_id";
}

/// Field values for creating or replacing a task
///
/// Used for both inserts and full updates; on update `group_id` may point to
/// a different group, which re-assigns the task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskFields {
    pub name: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub finished: bool,

    #[serde(default)]
    pub archived: bool,

    pub group_id: i64,
}

impl TaskFields {
    /// A fresh, unfinished and unarchived task
    pub fn new(name: impl Into<String>, description: impl Into<String>, group_id: i64) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            finished: false,
            archived: false,
            group_id,
        }
    }
}
