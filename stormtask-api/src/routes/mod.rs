/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Health check endpoint
/// - `auth`: Login (`POST /authenticate`)
/// - `users`: Registration and the caller's own account
/// - `groups`: Task groups owned by the caller
/// - `tasks`: Tasks inside the caller's groups

pub mod auth;
pub mod groups;
pub mod health;
pub mod tasks;
pub mod users;
