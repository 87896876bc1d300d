/// Authentication and authorization
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing with a configurable work factor
/// - [`jwt`]: Session token signing and validation (HS256)
/// - [`authenticator`]: Credential check → token issuance → token validation
/// - [`authorization`]: Ownership checks for groups and tasks
/// - [`middleware`]: Axum layer turning a session token into an `AuthContext`
///
/// # Flow
///
/// ```text
/// request ──token──> Authenticator::validate_token ──claims──> AuthContext
///         ──> authorize_{group,task}_ownership ──> CredentialStore mutation
/// ```

pub mod authenticator;
pub mod authorization;
pub mod jwt;
pub mod middleware;
pub mod password;
