/// Configuration management for the API server
///
/// Values are layered, later sources overriding earlier ones:
///
/// 1. Built-in defaults
/// 2. An optional JSON file (`STORMTASK_CONFIG`, default `stormtask.json`)
/// 3. Environment variables prefixed with `STORMTASK_`, nested with `__`
///
/// A `.env` file is loaded first, so its entries act as environment variables.
///
/// # Environment Variables
///
/// - `STORMTASK_API__HOST`, `STORMTASK_API__PORT`
/// - `STORMTASK_DATABASE__URL` (required unless set in the file)
/// - `STORMTASK_DATABASE__MAX_CONNECTIONS`
/// - `STORMTASK_JWT__SECRET` (required, at least 32 characters)
/// - `STORMTASK_JWT__COOKIE_NAME`, `STORMTASK_JWT__TOKEN_TTL_HOURS`
/// - `STORMTASK_PASSWORD__MEMORY_KIB`, `STORMTASK_PASSWORD__ITERATIONS`,
///   `STORMTASK_PASSWORD__PARALLELISM`
///
/// # Example
///
/// ```no_run
/// use stormtask_api::config::Config;
///
/// # fn example() -> anyhow::Result<()> {
/// let config = Config::load()?;
/// println!("Server will listen on {}", config.bind_address());
/// # Ok(())
/// # }
/// ```

use serde::{Deserialize, Serialize};
use stormtask_shared::auth::password::HashParams;

/// Environment variable naming the JSON config file
pub const CONFIG_FILE_VAR: &str = "STORMTASK_CONFIG";

/// Config file used when `STORMTASK_CONFIG` is unset
pub const DEFAULT_CONFIG_FILE: &str = "stormtask.json";

/// Minimum accepted length of the token signing secret
pub const MIN_SECRET_LEN: usize = 32;

/// Complete application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// API server configuration
    pub api: ApiConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// Session token configuration
    pub jwt: JwtConfig,

    /// Password hashing work factor
    #[serde(default)]
    pub password: HashParams,
}

/// API server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Host to bind to
    pub host: String,

    /// Port to bind to
    pub port: u16,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,

    /// Maximum number of connections in pool
    pub max_connections: u32,
}

/// Session token configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    /// Secret key for token signing
    ///
    /// IMPORTANT: This must be kept secret and should be at least 32 bytes.
    /// Generate with: `openssl rand -hex 32`
    pub secret: String,

    /// Name of the cookie carrying the session token
    pub cookie_name: String,

    /// Token lifetime in hours
    pub token_ttl_hours: i64,
}

impl Config {
    /// Loads configuration from defaults, the config file and the environment
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - A required value (database URL, token secret) is missing
    /// - A value has the wrong type
    /// - The token secret is shorter than 32 characters
    pub fn load() -> anyhow::Result<Self> {
        // Load .env file if present (for development)
        dotenvy::dotenv().ok();

        let path = std::env::var(CONFIG_FILE_VAR).unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());

        let builder = defaults()?
            .add_source(
                config::File::new(&path, config::FileFormat::Json).required(false),
            )
            .add_source(environment());

        Self::from_builder(builder)
    }

    /// Builds and validates a configuration from prepared sources
    pub fn from_builder(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> anyhow::Result<Self> {
        let config: Self = builder
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to build config: {}", e))?
            .try_deserialize()
            .map_err(|e| anyhow::anyhow!("Failed to deserialize config: {}", e))?;

        config.validate()?;
        Ok(config)
    }

    /// Checks constraints that types alone cannot express
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.database.url.is_empty() {
            anyhow::bail!("database.url is required");
        }

        if self.jwt.secret.len() < MIN_SECRET_LEN {
            anyhow::bail!("jwt.secret must be at least {} characters long", MIN_SECRET_LEN);
        }

        if self.jwt.cookie_name.is_empty() {
            anyhow::bail!("jwt.cookie_name must not be empty");
        }

        if self.jwt.token_ttl_hours <= 0 {
            anyhow::bail!("jwt.token_ttl_hours must be positive");
        }

        Ok(())
    }

    /// Returns the server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api.host, self.api.port)
    }

    /// Token lifetime as a duration
    pub fn token_ttl(&self) -> chrono::Duration {
        chrono::Duration::hours(self.jwt.token_ttl_hours)
    }
}

/// Environment source: `STORMTASK_<SECTION>__<KEY>`
pub fn environment() -> config::Environment {
    config::Environment::with_prefix("STORMTASK")
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

/// Built-in defaults, the lowest-priority source
pub fn defaults() -> anyhow::Result<config::ConfigBuilder<config::builder::DefaultState>> {
    let hash = HashParams::default();

    Ok(config::Config::builder()
        .set_default("api.host", "0.0.0.0")?
        .set_default("api.port", 8080)?
        .set_default("database.url", "")?
        .set_default("database.max_connections", 10)?
        .set_default("jwt.secret", "")?
        .set_default("jwt.cookie_name", "Token")?
        .set_default("jwt.token_ttl_hours", 24)?
        .set_default("password.memory_kib", i64::from(hash.memory_kib))?
        .set_default("password.iterations", i64::from(hash.iterations))?
        .set_default("password.parallelism", i64::from(hash.parallelism))?)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-key-at-least-32-bytes-long";

    fn from_json(json: &str) -> anyhow::Result<Config> {
        let builder = defaults()?.add_source(config::File::from_str(json, config::FileFormat::Json));
        Config::from_builder(builder)
    }

    fn from_env(vars: &[(&str, &str)]) -> anyhow::Result<Config> {
        let vars: config::Map<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_builder(defaults()?.add_source(environment().source(Some(vars))))
    }

    #[test]
    fn test_environment_variables_are_read() {
        let config = from_env(&[
            ("STORMTASK_DATABASE__URL", "postgresql://env/stormtask"),
            ("STORMTASK_JWT__SECRET", SECRET),
            ("STORMTASK_API__PORT", "9090"),
            ("STORMTASK_JWT__COOKIE_NAME", "Session"),
        ])
        .unwrap();

        assert_eq!(config.database.url, "postgresql://env/stormtask");
        assert_eq!(config.jwt.secret, SECRET);
        assert_eq!(config.api.port, 9090);
        assert_eq!(config.jwt.cookie_name, "Session");
    }

    #[test]
    fn test_unprefixed_variables_are_ignored() {
        let result = from_env(&[
            ("DATABASE__URL", "postgresql://env/stormtask"),
            ("JWT__SECRET", SECRET),
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_defaults_fill_missing_values() {
        let config = from_json(&format!(
            r#"{{ "database": {{ "url": "postgresql://localhost/stormtask" }}, "jwt": {{ "secret": "{}" }} }}"#,
            SECRET
        ))
        .unwrap();

        assert_eq!(config.api.host, "0.0.0.0");
        assert_eq!(config.api.port, 8080);
        assert_eq!(config.database.max_connections, 10);
        assert_eq!(config.jwt.cookie_name, "Token");
        assert_eq!(config.token_ttl(), chrono::Duration::hours(24));
        assert_eq!(config.password, HashParams::default());
    }

    #[test]
    fn test_file_values_override_defaults() {
        let config = from_json(&format!(
            r#"{{
                "api": {{ "host": "127.0.0.1", "port": 3000 }},
                "database": {{ "url": "postgresql://db/stormtask", "max_connections": 4 }},
                "jwt": {{ "secret": "{}", "cookie_name": "Session", "token_ttl_hours": 2 }},
                "password": {{ "memory_kib": 1024, "iterations": 1, "parallelism": 1 }}
            }}"#,
            SECRET
        ))
        .unwrap();

        assert_eq!(config.bind_address(), "127.0.0.1:3000");
        assert_eq!(config.database.max_connections, 4);
        assert_eq!(config.jwt.cookie_name, "Session");
        assert_eq!(config.token_ttl(), chrono::Duration::hours(2));
        assert_eq!(config.password.memory_kib, 1024);
    }

    #[test]
    fn test_short_secret_is_rejected() {
        let result = from_json(
            r#"{ "database": { "url": "postgresql://localhost/stormtask" }, "jwt": { "secret": "short" } }"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_database_url_is_rejected() {
        let result = from_json(&format!(r#"{{ "jwt": {{ "secret": "{}" }} }}"#, SECRET));
        assert!(result.is_err());
    }
}
