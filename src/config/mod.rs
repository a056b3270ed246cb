use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required configuration: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {key}: {value}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub security: SecurityConfig,
    pub filter: FilterConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub request_timeout_secs: u64,
}

#[derive(Clone)]
pub struct DatabaseConfig {
    /// Full connection URL; wins over the individual parts when set
    pub url: Option<String>,
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub name: String,
    pub ssl_mode: String,
    pub max_connections: u32,
    pub connect_timeout_secs: u64,
    /// Upper bound for every individual repository call
    pub query_timeout_secs: u64,
}

#[derive(Clone)]
pub struct SecurityConfig {
    pub jwt_secret: String,
    pub jwt_issuer: String,
    pub access_token_minutes: i64,
    pub refresh_token_days: i64,
    pub cors_origins: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterConfig {
    pub max_limit: Option<i64>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_source(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    pub fn from_source<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = match lookup("APP_ENV").as_deref() {
            Some("production") | Some("prod") => Environment::Production,
            Some("staging") | Some("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        let config = match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_overrides(&lookup)?;

        config.validate()?;
        Ok(config)
    }

    fn with_overrides<F>(mut self, lookup: &F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Server overrides
        if let Some(v) = lookup("MBP_HOST") {
            self.server.host = v;
        }
        if let Some(v) = lookup("MBP_PORT").or_else(|| lookup("PORT")) {
            self.server.port = parse("MBP_PORT", &v)?;
        }
        if let Some(v) = lookup("MBP_REQUEST_TIMEOUT") {
            self.server.request_timeout_secs = parse("MBP_REQUEST_TIMEOUT", &v)?;
        }

        // Database overrides
        if let Some(v) = lookup("DATABASE_URL") {
            self.database.url = Some(v);
        }
        if let Some(v) = lookup("MBP_PG_HOST") {
            self.database.host = v;
        }
        if let Some(v) = lookup("MBP_PG_PORT") {
            self.database.port = parse("MBP_PG_PORT", &v)?;
        }
        if let Some(v) = lookup("MBP_PG_USER") {
            self.database.user = v;
        }
        if let Some(v) = lookup("MBP_PG_PASSWORD") {
            self.database.password = v;
        }
        if let Some(v) = lookup("MBP_PG_NAME") {
            self.database.name = v;
        }
        if let Some(v) = lookup("MBP_PG_SSLMODE") {
            self.database.ssl_mode = v;
        }
        if let Some(v) = lookup("MBP_PG_MAX_CONNECTIONS") {
            self.database.max_connections = parse("MBP_PG_MAX_CONNECTIONS", &v)?;
        }
        if let Some(v) = lookup("MBP_PG_CONNECT_TIMEOUT") {
            self.database.connect_timeout_secs = parse("MBP_PG_CONNECT_TIMEOUT", &v)?;
        }
        if let Some(v) = lookup("MBP_PG_QUERY_TIMEOUT") {
            self.database.query_timeout_secs = parse("MBP_PG_QUERY_TIMEOUT", &v)?;
        }

        // Security overrides
        if let Some(v) = lookup("JWT_SECRET") {
            self.security.jwt_secret = v;
        }
        if let Some(v) = lookup("JWT_ISSUER") {
            self.security.jwt_issuer = v;
        }
        if let Some(v) = lookup("JWT_ACCESS_TOKEN_MINUTES") {
            self.security.access_token_minutes = parse("JWT_ACCESS_TOKEN_MINUTES", &v)?;
        }
        if let Some(v) = lookup("JWT_REFRESH_TOKEN_DAYS") {
            self.security.refresh_token_days = parse("JWT_REFRESH_TOKEN_DAYS", &v)?;
        }
        if let Some(v) = lookup("CORS_ORIGINS") {
            self.security.cors_origins = v
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }

        // Filter overrides
        if let Some(v) = lookup("FILTER_MAX_LIMIT") {
            self.filter.max_limit = Some(parse("FILTER_MAX_LIMIT", &v)?);
        }

        Ok(self)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.security.jwt_secret.trim().is_empty() {
            return Err(ConfigError::Missing("JWT_SECRET"));
        }
        if self.security.access_token_minutes <= 0 {
            return Err(ConfigError::Invalid {
                key: "JWT_ACCESS_TOKEN_MINUTES",
                value: self.security.access_token_minutes.to_string(),
            });
        }
        if self.security.refresh_token_days <= 0 {
            return Err(ConfigError::Invalid {
                key: "JWT_REFRESH_TOKEN_DAYS",
                value: self.security.refresh_token_days.to_string(),
            });
        }
        if self.database.query_timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                key: "MBP_PG_QUERY_TIMEOUT",
                value: "0".to_string(),
            });
        }
        Ok(())
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8000,
                request_timeout_secs: 30,
            },
            database: DatabaseConfig::defaults(10, 10),
            security: SecurityConfig::defaults(vec!["*".to_string()]),
            filter: FilterConfig {
                max_limit: Some(1000),
            },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8000,
                request_timeout_secs: 15,
            },
            database: DatabaseConfig::defaults(20, 5),
            security: SecurityConfig::defaults(vec![]),
            filter: FilterConfig {
                max_limit: Some(500),
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8000,
                request_timeout_secs: 10,
            },
            database: DatabaseConfig::defaults(50, 5),
            security: SecurityConfig::defaults(vec![]),
            filter: FilterConfig {
                max_limit: Some(100),
            },
        }
    }

    pub fn is_development(&self) -> bool {
        matches!(self.environment, Environment::Development)
    }
}

impl DatabaseConfig {
    fn defaults(max_connections: u32, connect_timeout_secs: u64) -> Self {
        Self {
            url: None,
            host: "localhost".to_string(),
            port: 5432,
            user: "postgres".to_string(),
            password: String::new(),
            name: "budget_planner".to_string(),
            ssl_mode: "disable".to_string(),
            max_connections,
            connect_timeout_secs,
            query_timeout_secs: 5,
        }
    }
}

impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("url", &self.url.as_ref().map(|_| "<redacted>"))
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("name", &self.name)
            .field("ssl_mode", &self.ssl_mode)
            .field("max_connections", &self.max_connections)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .field("query_timeout_secs", &self.query_timeout_secs)
            .finish()
    }
}

impl SecurityConfig {
    fn defaults(cors_origins: Vec<String>) -> Self {
        Self {
            jwt_secret: String::new(),
            jwt_issuer: "my-budget-planner".to_string(),
            access_token_minutes: 60,
            refresh_token_days: 7,
            cors_origins,
        }
    }

    pub fn cors_permissive(&self) -> bool {
        self.cors_origins.iter().any(|o| o == "*")
    }
}

impl fmt::Debug for SecurityConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecurityConfig")
            .field("jwt_secret", &"<redacted>")
            .field("jwt_issuer", &self.jwt_issuer)
            .field("access_token_minutes", &self.access_token_minutes)
            .field("refresh_token_days", &self.refresh_token_days)
            .field("cors_origins", &self.cors_origins)
            .finish()
    }
}

fn parse<T: std::str::FromStr>(key: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::Invalid {
        key,
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn source(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_development_config() {
        let config = AppConfig::from_source(source(&[("JWT_SECRET", "dev-secret")])).unwrap();
        assert_eq!(config.environment, Environment::Development);
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.filter.max_limit, Some(1000));
        assert_eq!(config.database.query_timeout_secs, 5);
        assert_eq!(config.security.access_token_minutes, 60);
        assert_eq!(config.security.refresh_token_days, 7);
        assert!(config.security.cors_permissive());
    }

    #[test]
    fn test_default_production_config() {
        let config = AppConfig::from_source(source(&[
            ("APP_ENV", "production"),
            ("JWT_SECRET", "prod-secret"),
        ]))
        .unwrap();
        assert_eq!(config.environment, Environment::Production);
        assert_eq!(config.filter.max_limit, Some(100));
        assert!(!config.security.cors_permissive());
    }

    #[test]
    fn jwt_secret_is_required() {
        let err = AppConfig::from_source(source(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("JWT_SECRET")));

        let err = AppConfig::from_source(source(&[("JWT_SECRET", "   ")])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("JWT_SECRET")));
    }

    #[test]
    fn env_overrides_apply() {
        let config = AppConfig::from_source(source(&[
            ("JWT_SECRET", "s"),
            ("MBP_PORT", "9001"),
            ("MBP_PG_HOST", "db.internal"),
            ("MBP_PG_PORT", "6543"),
            ("MBP_PG_USER", "budget"),
            ("MBP_PG_NAME", "ledger"),
            ("MBP_PG_QUERY_TIMEOUT", "2"),
            ("CORS_ORIGINS", "https://a.example, https://b.example"),
        ]))
        .unwrap();
        assert_eq!(config.server.port, 9001);
        assert_eq!(config.database.host, "db.internal");
        assert_eq!(config.database.port, 6543);
        assert_eq!(config.database.user, "budget");
        assert_eq!(config.database.name, "ledger");
        assert_eq!(config.database.query_timeout_secs, 2);
        assert_eq!(
            config.security.cors_origins,
            vec!["https://a.example".to_string(), "https://b.example".to_string()]
        );
    }

    #[test]
    fn invalid_numbers_are_rejected() {
        let err = AppConfig::from_source(source(&[("JWT_SECRET", "s"), ("MBP_PORT", "eighty")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "MBP_PORT", .. }));

        let err = AppConfig::from_source(source(&[("JWT_SECRET", "s"), ("FILTER_MAX_LIMIT", "lots")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "FILTER_MAX_LIMIT", .. }));

        let config = AppConfig::from_source(source(&[("JWT_SECRET", "s"), ("FILTER_MAX_LIMIT", "50")]))
            .unwrap();
        assert_eq!(config.filter.max_limit, Some(50));
    }

    #[test]
    fn debug_output_redacts_secrets() {
        let config = AppConfig::from_source(source(&[
            ("JWT_SECRET", "super-secret-value"),
            ("MBP_PG_PASSWORD", "hunter2"),
        ]))
        .unwrap();
        let printed = format!("{:?}", config);
        assert!(!printed.contains("super-secret-value"));
        assert!(!printed.contains("hunter2"));
    }
}
