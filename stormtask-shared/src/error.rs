/// Error taxonomy for the credential store
///
/// Lookups that miss are not errors: reads return `Option`. The variants here
/// cover constraint violations, missing references on updates, password
/// hashing failures and storage failures, which are always propagated.
///
/// # Mapping from the database
///
/// | PostgreSQL condition        | Variant                        |
/// |-----------------------------|--------------------------------|
/// | unique violation (23505)    | `StoreError::Conflict`         |
/// | foreign key violation (23503) | `StoreError::InvalidReference` |
/// | anything else               | `StoreError::Storage`          |

use crate::auth::password::PasswordError;

/// Result alias for credential store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Error type for credential store operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A unique constraint would be violated (duplicate email, duplicate group name)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// A referenced row does not exist (unknown owner or group)
    #[error("Invalid reference: {0}")]
    InvalidReference(String),

    /// The record targeted by an update does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Password hashing or verification failed
    #[error("Password operation failed: {0}")]
    Password(#[from] PasswordError),

    /// Transport or engine failure
    #[error("Storage failure: {0}")]
    Storage(#[source] sqlx::Error),
}

impl StoreError {
    /// Classifies a sqlx error, attaching `context` to constraint violations
    pub fn classify(err: sqlx::Error, context: &str) -> Self {
        if let sqlx::Error::Database(ref db_err) = err {
            if db_err.is_unique_violation() {
                return StoreError::Conflict(context.to_string());
            }
            if db_err.is_foreign_key_violation() {
                return StoreError::InvalidReference(context.to_string());
            }
        }
        StoreError::Storage(err)
    }

    /// True for transport/engine failures as opposed to domain outcomes
    pub fn is_storage_failure(&self) -> bool {
        matches!(self, StoreError::Storage(_))
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        StoreError::Storage(err)
    }
}
