/// Session token generation and validation
///
/// Session tokens are JWTs signed with HS256 and a server-held secret. All
/// session state lives in the token: there is no session table, so a token
/// stays valid until it expires (it cannot be revoked earlier).
///
/// # Claims
///
/// - `sub`: user ID
/// - `email`, `name`, `is_admin`: identity copied from the user record
/// - `iss`: always "stormtask"
/// - `iat` / `exp`: issue and expiry timestamps (24 hours apart by default)
///
/// # Example
///
/// ```
/// use stormtask_shared::auth::jwt::{create_token, decode_token, Claims};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let claims = Claims::new(1, "a@x.com", "Alice", false);
/// let token = create_token(&claims, "your-secret-key-at-least-32-bytes")?;
///
/// let decoded = decode_token(&token, "your-secret-key-at-least-32-bytes")?;
/// assert_eq!(decoded.map(|c| c.sub), Some(1));
/// # Ok(())
/// # }
/// ```

use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};

use crate::models::user::User;

/// Issuer written into and required from every token
pub const ISSUER: &str = "stormtask";

/// Default token lifetime
pub fn default_expiration() -> Duration {
    Duration::hours(24)
}

/// Error type for JWT operations
///
/// Only internal failures are errors. A token that is expired, tampered with
/// or malformed decodes to `Ok(None)`.
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    /// Failed to create token
    #[error("Failed to create token: {0}")]
    CreateError(String),

    /// Token processing failed for a reason unrelated to the token itself
    #[error("Failed to process token: {0}")]
    ProcessingError(String),
}

/// Decoded payload of a session token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - user ID
    pub sub: i64,

    /// User email at issue time
    pub email: String,

    /// User display name at issue time
    pub name: String,

    /// Administrator flag at issue time
    pub is_admin: bool,

    /// Issuer - always "stormtask"
    pub iss: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// Creates claims expiring after the default 24 hours
    pub fn new(user_id: i64, email: impl Into<String>, name: impl Into<String>, is_admin: bool) -> Self {
        Self::with_expiration(user_id, email, name, is_admin, default_expiration())
    }

    /// Creates claims with a custom lifetime
    ///
    /// A negative duration produces an already-expired token, which is useful
    /// in tests.
    pub fn with_expiration(
        user_id: i64,
        email: impl Into<String>,
        name: impl Into<String>,
        is_admin: bool,
        expires_in: Duration,
    ) -> Self {
        let now = Utc::now();

        Self {
            sub: user_id,
            email: email.into(),
            name: name.into(),
            is_admin,
            iss: ISSUER.to_string(),
            iat: now.timestamp(),
            exp: (now + expires_in).timestamp(),
        }
    }

    /// Creates claims for a verified user
    pub fn for_user(user: &User, expires_in: Duration) -> Self {
        Self::with_expiration(user.id, &user.email, &user.name, user.is_admin, expires_in)
    }

    /// Checks if the token has expired
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }
}

/// Signs claims into a token string
pub fn create_token(claims: &Claims, secret: &str) -> Result<String, JwtError> {
    let key = EncodingKey::from_secret(secret.as_bytes());

    encode(&Header::new(Algorithm::HS256), claims, &key)
        .map_err(|e| JwtError::CreateError(e.to_string()))
}

/// Verifies a token and returns its claims
///
/// Checks the signature, the issuer and the expiration. Returns `Ok(None)`
/// when the token is not acceptable for any of those reasons or cannot be
/// parsed at all.
///
/// # Errors
///
/// Returns `JwtError::ProcessingError` only for failures that are not caused
/// by the token (for example a crypto backend error).
pub fn decode_token(token: &str, secret: &str) -> Result<Option<Claims>, JwtError> {
    let key = DecodingKey::from_secret(secret.as_bytes());

    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[ISSUER]);
    validation.validate_exp = true;
    validation.leeway = 0;

    match decode::<Claims>(token, &key, &validation) {
        Ok(data) => Ok(Some(data.claims)),
        Err(e) => match e.kind() {
            ErrorKind::InvalidToken
            | ErrorKind::InvalidSignature
            | ErrorKind::ExpiredSignature
            | ErrorKind::ImmatureSignature
            | ErrorKind::InvalidIssuer
            | ErrorKind::InvalidAlgorithm
            | ErrorKind::MissingRequiredClaim(_)
            | ErrorKind::Base64(_)
            | ErrorKind::Json(_)
            | ErrorKind::Utf8(_) => Ok(None),
            _ => Err(JwtError::ProcessingError(e.to_string())),
        },
    }
}
