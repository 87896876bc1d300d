use tracing::{debug, info};

use super::CredentialStore;
use crate::db::mapper::{self, Record};
use crate::error::{StoreError, StoreResult};
use crate::models::user::{NewUser, User, UserChanges};

impl CredentialStore {
    /// Registers a user
    ///
    /// The raw password is hashed before the row is written.
    ///
    /// # Errors
    ///
    /// - `StoreError::Conflict` if the email is already registered
    /// - `StoreError::Password` if hashing fails
    /// - `StoreError::Storage` on database failure
    pub async fn create_user(&self, data: NewUser) -> StoreResult<User> {
        let password_hash = self.hash_password(data.password).await?;

        let sql = mapper::returning_sql::<User>(&format!(
            "INSERT INTO {} (email, name, password_hash, is_admin) VALUES ($1, $2, $3, $4)",
            User::TABLE
        ));
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(&data.email)
            .bind(&data.name)
            .bind(password_hash)
            .bind(data.is_admin)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| StoreError::classify(e, "email already registered"))?;

        info!(user_id = user.id, "User created");
        Ok(user)
    }

    /// Finds a user by exact email
    pub async fn get_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        Ok(mapper::fetch_by(&self.pool, "email", email).await?)
    }

    /// Finds a user by ID
    pub async fn get_user_by_id(&self, id: i64) -> StoreResult<Option<User>> {
        Ok(mapper::fetch_by(&self.pool, "id", id).await?)
    }

    /// Checks an email/password pair
    ///
    /// Returns the user when the password matches and `None` otherwise. An
    /// unknown email and a wrong password give the same answer.
    pub async fn verify_credentials(&self, email: &str, password: &str) -> StoreResult<Option<User>> {
        let Some(user) = self.get_user_by_email(email).await? else {
            debug!("Credential check for unknown email");
            return Ok(None);
        };

        let matches = self
            .verify_password(password.to_string(), user.password_hash.clone())
            .await?;

        if matches {
            Ok(Some(user))
        } else {
            debug!(user_id = user.id, "Credential check with wrong password");
            Ok(None)
        }
    }

    /// Updates a user's email, name and/or password
    ///
    /// Returns `None` if the user does not exist.
    ///
    /// # Errors
    ///
    /// - `StoreError::Conflict` if the new email belongs to another user
    pub async fn update_user(&self, id: i64, changes: UserChanges) -> StoreResult<Option<User>> {
        if let Some(ref email) = changes.email {
            if let Some(existing) = self.get_user_by_email(email).await? {
                if existing.id != id {
                    return Err(StoreError::Conflict("email already registered".to_string()));
                }
            }
        }

        let password_hash = match changes.password {
            Some(password) => Some(self.hash_password(password).await?),
            None => None,
        };

        let sql = mapper::returning_sql::<User>(&format!(
            "UPDATE {} SET email = COALESCE($2, email), name = COALESCE($3, name), \
             password_hash = COALESCE($4, password_hash) WHERE id = $1",
            User::TABLE
        ));
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .bind(changes.email)
            .bind(changes.name)
            .bind(password_hash)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StoreError::classify(e, "email already registered"))?;

        if user.is_some() {
            info!(user_id = id, "User updated");
        }
        Ok(user)
    }

    /// Deletes a user together with their groups and tasks
    ///
    /// Groups (and through them, tasks) are removed first. Returns `false` if
    /// no user row was deleted.
    pub async fn delete_user(&self, id: i64) -> StoreResult<bool> {
        let groups = self.delete_groups_by_owner(id).await?;
        let deleted = mapper::delete_by::<User, _>(&self.pool, "id", id).await?;

        info!(user_id = id, groups_deleted = groups, "User deleted");
        Ok(deleted > 0)
    }
}
