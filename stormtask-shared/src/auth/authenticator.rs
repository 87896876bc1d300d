/// Stateless authenticator
///
/// ```text
/// Unauthenticated --[valid credentials]--> Authenticated(claims)
/// ```
///
/// Nothing is stored server-side: the only record of a login is the signed
/// token returned to the caller. A consequence is that tokens cannot be
/// revoked before they expire.
///
/// # Example
///
/// ```no_run
/// use stormtask_shared::auth::authenticator::Authenticator;
/// use stormtask_shared::store::CredentialStore;
///
/// # async fn example(store: CredentialStore) -> Result<(), Box<dyn std::error::Error>> {
/// let auth = Authenticator::new(store, "your-secret-key-at-least-32-bytes");
///
/// match auth.issue_token("a@x.com", "pw").await? {
///     Some(token) => {
///         let claims = auth.validate_token(&token)?.expect("fresh token is valid");
///         println!("Logged in as {}", claims.email);
///     }
///     None => println!("Wrong email or password"),
/// }
/// # Ok(())
/// # }
/// ```

use chrono::Duration;
use std::sync::Arc;
use tracing::{debug, warn};

use super::jwt::{self, Claims, JwtError};
use crate::error::StoreError;
use crate::store::CredentialStore;

/// Error type for authentication
///
/// Wrong credentials and bad tokens are not errors; see the `Option` results
/// on [`Authenticator`].
#[derive(Debug, thiserror::Error)]
pub enum AuthenticationError {
    /// Credential lookup or verification failed
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Token signing or processing failed
    #[error(transparent)]
    Token(#[from] JwtError),
}

/// Issues and validates session tokens
#[derive(Debug, Clone)]
pub struct Authenticator {
    store: CredentialStore,
    secret: Arc<str>,
    token_ttl: Duration,
}

impl Authenticator {
    /// Creates an authenticator issuing 24-hour tokens
    pub fn new(store: CredentialStore, secret: impl AsRef<str>) -> Self {
        Self {
            store,
            secret: Arc::from(secret.as_ref()),
            token_ttl: jwt::default_expiration(),
        }
    }

    /// Overrides the token lifetime
    pub fn with_token_ttl(mut self, ttl: Duration) -> Self {
        self.token_ttl = ttl;
        self
    }

    /// Token lifetime
    pub fn token_ttl(&self) -> Duration {
        self.token_ttl
    }

    /// Verifies credentials and signs a token for the matching user
    ///
    /// Returns `Ok(None)` when the email is unknown or the password is wrong;
    /// the two cases are indistinguishable to the caller.
    pub async fn issue_token(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<String>, AuthenticationError> {
        let Some(user) = self.store.verify_credentials(email, password).await? else {
            warn!("Authentication rejected");
            return Ok(None);
        };

        let claims = Claims::for_user(&user, self.token_ttl);
        let token = jwt::create_token(&claims, &self.secret)?;

        debug!(user_id = user.id, expires_at = claims.exp, "Session token issued");
        Ok(Some(token))
    }

    /// Validates a token and returns its claims
    ///
    /// Returns `Ok(None)` for tokens that are expired, tampered with or
    /// unparseable. Callers must treat that exactly like a missing token.
    pub fn validate_token(&self, token: &str) -> Result<Option<Claims>, AuthenticationError> {
        Ok(jwt::decode_token(token, &self.secret)?)
    }
}
