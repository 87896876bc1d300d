/// Database layer for StormTask
///
/// This module provides database connection pooling, migrations, and the
/// generic record mapper used by the credential store.
///
/// # Modules
///
/// - `pool`: PostgreSQL connection pool management with health checks
/// - `migrations`: Embedded schema migrations and database bootstrap
/// - `mapper`: Shared SQL building and row scanning for users, groups and tasks
///
/// # Example
///
/// ```no_run
/// use stormtask_shared::db::pool::{create_pool, DatabaseConfig};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = DatabaseConfig {
///         url: std::env::var("DATABASE_URL")?,
///         ..Default::default()
///     };
///
///     let pool = create_pool(config).await?;
///     Ok(())
/// }
/// ```

pub mod mapper;
pub mod migrations;
pub mod pool;
