use std::env;

use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub jwt: JwtConfig,
    pub refresh: RefreshConfig,
    pub kafka: KafkaConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub http_port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub access_ttl_minutes: i64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RefreshConfig {
    pub ttl_days: i64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct KafkaConfig {
    pub brokers: String,
    pub topic: String,
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (DATABASE__URL, JWT__SECRET, etc.)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let configuration = ConfigBuilder::builder()
            // Start with default configuration
            .add_source(File::with_name("config/default").required(false))
            // Layer on environment-specific configuration
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Layer on environment variables (with __ as separator)
            // Example: DATABASE__URL=postgres://... overrides database.url
            // No prefix: with_prefix("") would require a leading underscore.
            .add_source(Environment::default().separator("__"))
            .build()?;

        let config: Config = configuration.try_deserialize()?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Single test so the process-wide environment is only mutated in one
    // place; cargo runs tests in the crate root, where config/default.toml
    // supplies the remaining fields.
    #[test]
    fn test_env_vars_override_file_values() {
        env::set_var("DATABASE__URL", "postgresql://override-host:5432/identity");
        env::set_var("JWT__SECRET", "secret-from-env-at-least-32-bytes!!");

        let config = Config::load().expect("Failed to load configuration");

        assert_eq!(
            config.database.url,
            "postgresql://override-host:5432/identity"
        );
        assert_eq!(config.jwt.secret, "secret-from-env-at-least-32-bytes!!");
        // Fields without an override keep their file values.
        assert_eq!(config.refresh.ttl_days, 7);

        env::remove_var("DATABASE__URL");
        env::remove_var("JWT__SECRET");
    }
}
