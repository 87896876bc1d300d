/// Group model
///
/// # Schema
///
/// ```sql
/// CREATE TABLE task_groups (
///     id BIGSERIAL PRIMARY KEY,
///     owner_id BIGINT NOT NULL REFERENCES users (id),
///     name VARCHAR(255) NOT NULL,
///     UNIQUE (owner_id, name)
/// );
/// ```

use serde::{Deserialize, Serialize};

use crate::db::mapper::Record;

/// A named list of tasks owned by one user
///
/// `(owner_id, name)` is unique: a user cannot have two groups with the same
/// name, but two users can.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Group {
    /// System-assigned identifier
    pub id: i64,

    /// Owning user
    pub owner_id: i64,

    /// Display name, unique per owner
    pub name: String,
}

impl Record for Group {
    const TABLE: &'static str = "task_groups";
    const COLUMNS: &'static str = "id, owner_id, name";
}

impl Group {
    /// Whether `user_id` owns this group
    pub fn is_owned_by(&self, user_id: i64) -> bool {
        self.owner_id == user_id
    }
}
