//! Application configuration.

use serde::Deserialize;
use std::path::Path;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Matching and cooldown rules.
    #[serde(default)]
    pub matching: MatchingConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Database connection configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// `PostgreSQL` connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

/// Matching engine configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct MatchingConfig {
    /// Days a donor must wait after a donation before donating again.
    #[serde(default = "default_cooldown_days")]
    pub cooldown_days: u32,
    /// Apply the full eligibility predicate when matching a new request.
    #[serde(default = "default_true")]
    pub apply_eligibility_on_create: bool,
    /// Require an accepted response before a donor can fulfill a request.
    #[serde(default = "default_true")]
    pub require_accepted_mapping_on_fulfill: bool,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            cooldown_days: default_cooldown_days(),
            apply_eligibility_on_create: true,
            require_accepted_mapping_on_fulfill: true,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Default `EnvFilter` directive when `RUST_LOG` is unset.
    #[serde(default = "default_log_filter")]
    pub filter: String,
    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
            json: false,
        }
    }
}

const fn default_max_connections() -> u32 {
    20
}

const fn default_min_connections() -> u32 {
    2
}

const fn default_cooldown_days() -> u32 {
    90
}

const fn default_true() -> bool {
    true
}

fn default_log_filter() -> String {
    "bloodlink=info,sea_orm=warn".to_string()
}

impl Config {
    /// Load configuration from files and environment variables.
    ///
    /// Configuration is loaded in the following order:
    /// 1. `.env` (if present)
    /// 2. `config/default.toml`
    /// 3. `config/{environment}.toml` (based on `BLOODLINK_ENV`)
    /// 4. Environment variables with `BLOODLINK__` prefix
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenvy::dotenv().ok();
        let env = std::env::var("BLOODLINK_ENV").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("BLOODLINK")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Load configuration from a specific file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::from(path.as_ref()))
            .add_source(
                config::Environment::with_prefix("BLOODLINK")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_from_file_applies_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[database]\nurl = \"postgres://localhost/bloodlink\"").unwrap();

        let config = Config::from_file(file.path()).unwrap();

        assert_eq!(config.database.url, "postgres://localhost/bloodlink");
        assert_eq!(config.database.max_connections, 20);
        assert_eq!(config.matching.cooldown_days, 90);
        assert!(config.matching.apply_eligibility_on_create);
        assert!(config.matching.require_accepted_mapping_on_fulfill);
        assert!(!config.logging.json);
    }

    #[test]
    fn test_from_file_overrides_matching() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[database]\nurl = \"postgres://db/x\"\n\n[matching]\ncooldown_days = 56\nrequire_accepted_mapping_on_fulfill = false"
        )
        .unwrap();

        let config = Config::from_file(file.path()).unwrap();

        assert_eq!(config.matching.cooldown_days, 56);
        assert!(!config.matching.require_accepted_mapping_on_fulfill);
        assert!(config.matching.apply_eligibility_on_create);
    }
}
