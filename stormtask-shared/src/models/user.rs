/// User model
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id BIGSERIAL PRIMARY KEY,
///     email VARCHAR(255) NOT NULL UNIQUE,
///     name VARCHAR(255) NOT NULL,
///     password_hash VARCHAR(255) NOT NULL,
///     is_admin BOOLEAN NOT NULL DEFAULT FALSE
/// );
/// ```

use serde::{Deserialize, Serialize};

use crate::db::mapper::Record;

/// A registered account
///
/// The email is unique and compared exactly as stored. The password is kept
/// only as an Argon2id PHC string and is never serialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// System-assigned identifier
    pub id: i64,

    /// Login email, unique across users
    pub email: String,

    /// Display name
    pub name: String,

    /// Argon2id password hash
    #[serde(skip_serializing, default)]
    pub password_hash: String,

    /// Administrator flag
    pub is_admin: bool,
}

impl Record for User {
    const TABLE: &'static str = "users";
    const COLUMNS: &'static str = "id, email, name, password_hash, is_admin";
}

/// Input for registering a user
///
/// Carries the raw password; the store hashes it before anything is persisted.
#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    pub email: String,
    pub name: String,
    pub password: String,
    pub is_admin: bool,
}

/// Input for a profile update
///
/// Fields left as `None` keep their stored value. A supplied password is
/// re-hashed.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserChanges {
    pub email: Option<String>,
    pub name: Option<String>,
    pub password: Option<String>,
}

impl UserChanges {
    /// True when no field would change
    pub fn is_empty(&self) -> bool {
        self.email.is_none() && self.name.is_none() && self.password.is_none()
    }
}
