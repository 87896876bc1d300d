/// Authentication endpoint
///
/// # Endpoints
///
/// - `POST /authenticate` - Exchange email and password for a session token

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::ValidatedJson,
};
use axum::{extract::State, Json};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Credentials
#[derive(Debug, Deserialize, Validate)]
pub struct AuthenticateRequest {
    /// Email address
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,

    /// Password
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Authenticate response
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthenticateResponse {
    /// Session token, also set as a cookie
    pub token: String,

    /// Token lifetime in seconds
    pub expires_in: i64,
}

/// Log in
///
/// Verifies the credentials, sets the session cookie and returns the token
/// for clients that prefer a Bearer header.
///
/// # Endpoint
///
/// ```text
/// POST /authenticate
/// Content-Type: application/json
///
/// {
///   "email": "user@example.com",
///   "password": "hunter2"
/// }
/// ```
///
/// # Response
///
/// ```text
/// Set-Cookie: Token=eyJ...; HttpOnly; SameSite=Lax; Path=/
///
/// { "token": "eyJ...", "expires_in": 86400 }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Malformed body
/// - `401 Unauthorized`: Unknown email or wrong password
/// - `500 Internal Server Error`: Server error
pub async fn authenticate(
    State(state): State<AppState>,
    jar: CookieJar,
    ValidatedJson(req): ValidatedJson<AuthenticateRequest>,
) -> ApiResult<(CookieJar, Json<AuthenticateResponse>)> {
    let token = state
        .authenticator
        .issue_token(&req.email, &req.password)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid email or password".to_string()))?;

    let cookie = Cookie::build((state.cookie_name().to_string(), token.clone()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build();

    Ok((
        jar.add(cookie),
        Json(AuthenticateResponse {
            token,
            expires_in: state.authenticator.token_ttl().num_seconds(),
        }),
    ))
}

/// Removes the session cookie from the client
pub(crate) fn clear_session_cookie(jar: CookieJar, cookie_name: &str) -> CookieJar {
    jar.remove(Cookie::build((cookie_name.to_string(), "")).path("/"))
}
