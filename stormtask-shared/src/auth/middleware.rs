/// Session authentication middleware for Axum
///
/// Reads the session token from the configured cookie (falling back to an
/// `Authorization: Bearer` header), validates it and adds an [`AuthContext`]
/// to the request extensions. A missing token and an invalid token are
/// treated the same way: 401 Unauthorized.
///
/// # Example
///
/// ```no_run
/// use axum::{extract::Request, middleware::{self, Next}, routing::get, Extension, Router};
/// use stormtask_shared::auth::authenticator::Authenticator;
/// use stormtask_shared::auth::middleware::{require_session, AuthContext};
///
/// async fn whoami(Extension(auth): Extension<AuthContext>) -> String {
///     format!("Hello, {}!", auth.name)
/// }
///
/// fn router(authenticator: Authenticator) -> Router {
///     Router::new()
///         .route("/whoami", get(whoami))
///         .layer(middleware::from_fn(move |req: Request, next: Next| {
///             require_session(authenticator.clone(), "Token".to_string(), req, next)
///         }))
/// }
/// ```

use axum::{
    extract::Request,
    http::{header, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::CookieJar;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use super::authenticator::Authenticator;
use super::jwt::Claims;

/// Identity of the caller, added to request extensions after authentication
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthContext {
    /// Authenticated user ID
    pub user_id: i64,

    /// Email at token issue time
    pub email: String,

    /// Display name at token issue time
    pub name: String,

    /// Administrator flag at token issue time
    pub is_admin: bool,
}

impl From<Claims> for AuthContext {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.sub,
            email: claims.email,
            name: claims.name,
            is_admin: claims.is_admin,
        }
    }
}

/// Error type for authentication middleware
#[derive(Debug)]
pub enum AuthError {
    /// No token, or a token that did not validate
    Unauthenticated,

    /// Token processing failed internally
    Internal(String),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        match self {
            AuthError::Unauthenticated => {
                (StatusCode::UNAUTHORIZED, "Missing or invalid session token").into_response()
            }
            AuthError::Internal(msg) => {
                error!("Token processing failed: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
            }
        }
    }
}

/// Extracts the session token from a request's headers
///
/// The cookie named `cookie_name` wins; an `Authorization: Bearer` header is
/// used otherwise. Empty values count as absent.
pub fn extract_token(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    let jar = CookieJar::from_headers(headers);
    if let Some(cookie) = jar.get(cookie_name) {
        if !cookie.value().is_empty() {
            return Some(cookie.value().to_string());
        }
    }

    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
}

/// Rejects requests without a valid session token
///
/// On success the request continues with an [`AuthContext`] extension.
pub async fn require_session(
    authenticator: Authenticator,
    cookie_name: String,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let token = extract_token(req.headers(), &cookie_name).ok_or(AuthError::Unauthenticated)?;

    let claims = authenticator
        .validate_token(&token)
        .map_err(|e| AuthError::Internal(e.to_string()))?
        .ok_or_else(|| {
            debug!("Rejected invalid session token");
            AuthError::Unauthenticated
        })?;

    req.extensions_mut().insert(AuthContext::from(claims));

    Ok(next.run(req).await)
}
