/// Database models for StormTask
///
/// This module contains the three persisted records and their input types.
/// Reads and writes go through [`crate::store::CredentialStore`]; each model
/// implements [`crate::db::mapper::Record`] so the store can share one set of
/// query helpers.
///
/// # Models
///
/// - `user`: Accounts with hashed credentials
/// - `group`: Named task lists owned by a user
/// - `task`: Work items inside a group
///
/// # Ownership
///
/// ```text
/// Task --group_id--> Group --owner_id--> User
/// ```

pub mod group;
pub mod task;
pub mod user;
