//! API configuration

use serde::Deserialize;

use core_kernel::CoreError;

/// API configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// JWT secret for authentication
    pub jwt_secret: String,
    /// JWT expiration in seconds
    pub jwt_expiration_secs: u64,
    /// Database URL
    pub database_url: String,
    /// Log level
    pub log_level: String,
    /// Upper bound of the database pool
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

/// Longest token lifetime accepted: one year
pub const MAX_JWT_EXPIRATION_SECS: u64 = 365 * 24 * 60 * 60;

fn default_max_connections() -> u32 {
    10
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            jwt_secret: "change-me-in-production".to_string(),
            jwt_expiration_secs: 3600,
            database_url: "postgres://localhost/envelope".to_string(),
            log_level: "info".to_string(),
            max_connections: default_max_connections(),
        }
    }
}

impl ApiConfig {
    /// Loads configuration from `API_*` environment variables
    pub fn from_env() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::Environment::with_prefix("API"))
            .build()?
            .try_deserialize()
    }

    /// Returns the server address
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Rejects settings the server cannot start with
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.jwt_secret.trim().is_empty() {
            return Err(CoreError::configuration("jwt_secret must not be empty"));
        }
        if self.jwt_expiration_secs == 0 {
            return Err(CoreError::configuration("jwt_expiration_secs must be positive"));
        }
        if self.jwt_expiration_secs > MAX_JWT_EXPIRATION_SECS {
            return Err(CoreError::configuration(format!(
                "jwt_expiration_secs must not exceed {}",
                MAX_JWT_EXPIRATION_SECS
            )));
        }
        if self.max_connections == 0 {
            return Err(CoreError::configuration("max_connections must be positive"));
        }
        if self.database_url.trim().is_empty() {
            return Err(CoreError::configuration("database_url must not be empty"));
        }
        Ok(())
    }
}
