//! # StormTask Shared Library
//!
//! This crate contains the data-access and authentication core used by the
//! StormTask API server.
//!
//! ## Module Organization
//!
//! - `models`: Database records for users, groups and tasks
//! - `db`: Connection pool, migrations and the generic record mapper
//! - `store`: The credential store (all reads and writes, cascade deletes)
//! - `auth`: Password hashing, session tokens, authentication and ownership checks
//! - `error`: Store error taxonomy

pub mod auth;
pub mod db;
pub mod error;
pub mod models;
pub mod store;

/// Current version of the StormTask shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
