//! Typed application configuration.
//!
//! Settings are layered: built-in defaults, then an optional TOML file,
//! then `JOBBOARD_`-prefixed environment variables (`__` as the section
//! separator, e.g. `JOBBOARD_DATABASE__URL`).

use serde::Deserialize;

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("configuration error: {0}")]
    Configuration(#[from] config::ConfigError),
    #[error("validation error: {0}")]
    Validation(String),
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub api: ApiConfig,
    pub auth: AuthSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub connect_timeout_seconds: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    pub bind_address: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthSettings {
    pub jwt_secret: String,
    pub jwt_expiration_hours: i64,
}

impl AppConfig {
    /// Load configuration from defaults, an optional file and the environment.
    pub fn load(config_path: Option<&str>) -> ConfigResult<Self> {
        let mut builder = Self::builder_with_defaults()?;

        if let Some(path) = config_path {
            builder = builder.add_source(config::File::with_name(path).required(false));
        }

        let settings = builder
            .add_source(config::Environment::with_prefix("JOBBOARD").separator("__"))
            .build()?;

        let app_config: AppConfig = settings.try_deserialize()?;
        app_config.validate()?;
        Ok(app_config)
    }

    /// Parse configuration from a TOML string over the built-in defaults.
    pub fn from_toml(toml: &str) -> ConfigResult<Self> {
        let settings = Self::builder_with_defaults()?
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()?;

        let app_config: AppConfig = settings.try_deserialize()?;
        app_config.validate()?;
        Ok(app_config)
    }

    fn builder_with_defaults(
    ) -> ConfigResult<config::ConfigBuilder<config::builder::DefaultState>> {
        let builder = config::Config::builder()
            .set_default("database.url", "postgres://localhost:5432/jobboard")?
            .set_default("database.max_connections", 10)?
            .set_default("database.connect_timeout_seconds", 30)?
            .set_default("api.bind_address", "0.0.0.0:8080")?
            .set_default("auth.jwt_secret", "")?
            .set_default("auth.jwt_expiration_hours", 24)?;
        Ok(builder)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.database.url.is_empty() {
            return Err(ConfigError::Validation(
                "database.url must not be empty".to_string(),
            ));
        }
        if self.auth.jwt_secret.is_empty() {
            return Err(ConfigError::Validation(
                "auth.jwt_secret must be set (JOBBOARD_AUTH__JWT_SECRET)".to_string(),
            ));
        }
        if self.auth.jwt_expiration_hours <= 0 {
            return Err(ConfigError::Validation(
                "auth.jwt_expiration_hours must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_applied() {
        let cfg = AppConfig::from_toml("[auth]\njwt_secret = \"secret\"").unwrap();
        assert_eq!(cfg.database.max_connections, 10);
        assert_eq!(cfg.api.bind_address, "0.0.0.0:8080");
        assert_eq!(cfg.auth.jwt_expiration_hours, 24);
    }

    #[test]
    fn test_file_overrides_defaults() {
        let toml = r#"
            [database]
            url = "postgres://db.internal:5432/jobs"
            max_connections = 5

            [api]
            bind_address = "127.0.0.1:3000"

            [auth]
            jwt_secret = "secret"
            jwt_expiration_hours = 1
        "#;
        let cfg = AppConfig::from_toml(toml).unwrap();
        assert_eq!(cfg.database.url, "postgres://db.internal:5432/jobs");
        assert_eq!(cfg.database.max_connections, 5);
        assert_eq!(cfg.api.bind_address, "127.0.0.1:3000");
        assert_eq!(cfg.auth.jwt_expiration_hours, 1);
    }

    #[test]
    fn test_missing_jwt_secret_rejected() {
        let result = AppConfig::from_toml("");
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_non_positive_expiration_rejected() {
        let toml = "[auth]\njwt_secret = \"secret\"\njwt_expiration_hours = 0";
        assert!(matches!(
            AppConfig::from_toml(toml),
            Err(ConfigError::Validation(_))
        ));
    }
}
