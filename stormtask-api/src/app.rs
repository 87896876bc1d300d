/// Application state and router builder
///
/// This module defines the shared application state and provides
/// a function to build the Axum router with all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use stormtask_api::{app::AppState, config::Config};
/// use stormtask_shared::auth::password::PasswordHasher;
/// use stormtask_shared::store::CredentialStore;
/// use sqlx::PgPool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::load()?;
/// let pool = PgPool::connect(&config.database.url).await?;
/// let store = CredentialStore::new(pool, PasswordHasher::new(config.password)?);
/// let state = AppState::new(store, config);
/// let app = stormtask_api::app::build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::{config::Config, error::ApiError};
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use stormtask_shared::auth::{authenticator::Authenticator, middleware::require_session};
use stormtask_shared::store::CredentialStore;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

/// Shared application state
///
/// This is cloned for each request handler via Axum's `State` extractor.
/// Every field is a shared handle, so cloning is cheap.
#[derive(Clone)]
pub struct AppState {
    /// Users, groups and tasks
    pub store: CredentialStore,

    /// Session token issuer and validator
    pub authenticator: Authenticator,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates new application state
    ///
    /// The authenticator shares the store and takes its secret and token
    /// lifetime from `config`.
    pub fn new(store: CredentialStore, config: Config) -> Self {
        let authenticator =
            Authenticator::new(store.clone(), &config.jwt.secret).with_token_ttl(config.token_ttl());

        Self {
            store,
            authenticator,
            config: Arc::new(config),
        }
    }

    /// Name of the session cookie
    pub fn cookie_name(&self) -> &str {
        &self.config.jwt.cookie_name
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── GET    /health              # Health check (public)
/// ├── POST   /authenticate        # Log in, sets session cookie (public)
/// ├── POST   /user                # Register (public)
/// ├── GET    /user                # Current profile
/// ├── PUT    /user                # Update profile
/// ├── DELETE /user                # Delete account and everything in it
/// ├── POST   /group               # Create group
/// ├── GET    /groups              # List own groups
/// ├── GET    /group/:id           # Get group
/// ├── PUT    /group/:id           # Rename group
/// ├── DELETE /group/:id           # Delete group and its tasks
/// ├── GET    /group/:id/tasks     # List tasks of a group
/// ├── POST   /task                # Create task
/// ├── GET    /task/:id            # Get task
/// ├── PUT    /task/:id            # Replace task fields
/// └── DELETE /task/:id            # Delete task
/// ```
///
/// Everything except `/health`, `/authenticate` and `POST /user` requires a
/// valid session token.
///
/// # Middleware Stack
///
/// 1. Logging (tower-http TraceLayer)
/// 2. Session authentication (protected routes only)
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    // Public routes
    let public_routes = Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/authenticate", post(routes::auth::authenticate))
        .route("/user", post(routes::users::register));

    // Routes requiring a session
    let protected_routes = Router::new()
        .route(
            "/user",
            get(routes::users::get_current_user)
                .put(routes::users::update_current_user)
                .delete(routes::users::delete_current_user),
        )
        .route("/group", post(routes::groups::create_group))
        .route("/groups", get(routes::groups::list_groups))
        .route(
            "/group/:id",
            get(routes::groups::get_group)
                .put(routes::groups::rename_group)
                .delete(routes::groups::delete_group),
        )
        .route("/group/:id/tasks", get(routes::groups::list_group_tasks))
        .route("/task", post(routes::tasks::create_task))
        .route(
            "/task/:id",
            get(routes::tasks::get_task)
                .put(routes::tasks::update_task)
                .delete(routes::tasks::delete_task),
        )
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            session_auth_layer,
        ));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state)
}

/// Session authentication middleware layer
///
/// Reads the token from the session cookie or a Bearer header, validates it
/// and injects `AuthContext` into request extensions.
async fn session_auth_layer(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let cookie_name = state.cookie_name().to_string();
    require_session(state.authenticator, cookie_name, req, next)
        .await
        .map_err(ApiError::from)
}
