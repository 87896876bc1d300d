/// Credential store
///
/// The single entry point for reading and writing users, groups and tasks.
/// It enforces the storage-level invariants:
///
/// - user emails are unique (`Conflict`)
/// - `(owner, name)` is unique per group (`Conflict`)
/// - groups reference an existing user, tasks an existing group
///   (`InvalidReference`)
///
/// Cascade deletes are performed here, not by the database: tasks are removed
/// before their group and groups before their user, and any failure along the
/// way is returned to the caller.
///
/// The store does not know who is calling. Ownership is checked beforehand
/// by [`crate::auth::authorization`].
///
/// # Example
///
/// ```no_run
/// use stormtask_shared::auth::password::{HashParams, PasswordHasher};
/// use stormtask_shared::models::user::NewUser;
/// use stormtask_shared::store::CredentialStore;
/// use sqlx::PgPool;
///
/// # async fn example(pool: PgPool) -> Result<(), Box<dyn std::error::Error>> {
/// let store = CredentialStore::new(pool, PasswordHasher::new(HashParams::default())?);
///
/// let user = store
///     .create_user(NewUser {
///         email: "a@x.com".to_string(),
///         name: "Alice".to_string(),
///         password: "pw".to_string(),
///         is_admin: false,
///     })
///     .await?;
///
/// let home = store.create_group(user.id, "Home").await?;
/// assert_eq!(home.owner_id, user.id);
/// # Ok(())
/// # }
/// ```

mod groups;
mod tasks;
mod users;

use sqlx::PgPool;

use crate::auth::password::{PasswordError, PasswordHasher};

/// Storage-backed repository for users, groups and tasks
///
/// Cheap to clone: the pool and the hasher are both shared handles.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    pool: PgPool,
    hasher: PasswordHasher,
}

impl CredentialStore {
    /// Creates a store over an existing pool
    pub fn new(pool: PgPool, hasher: PasswordHasher) -> Self {
        Self { pool, hasher }
    }

    /// Underlying connection pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Hashes on a blocking thread so the async workers keep serving requests
    async fn hash_password(&self, password: String) -> Result<String, PasswordError> {
        let hasher = self.hasher.clone();
        tokio::task::spawn_blocking(move || hasher.hash_password(&password))
            .await
            .map_err(|e| PasswordError::HashError(format!("Hashing task failed: {}", e)))?
    }

    async fn verify_password(&self, password: String, hash: String) -> Result<bool, PasswordError> {
        let hasher = self.hasher.clone();
        tokio::task::spawn_blocking(move || hasher.verify_password(&password, &hash))
            .await
            .map_err(|e| PasswordError::VerifyError(format!("Verification task failed: {}", e)))?
    }
}
