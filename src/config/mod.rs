use serde::{Deserialize, Serialize};
use std::env;
use thiserror::Error;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub pagination: PaginationConfig,
    pub security: SecurityConfig,
    pub mail: MailConfig,
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
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// `memory` for the in-process store, otherwise a `sqlite:` URL
    pub url: String,
    pub max_connections: u32,
    pub seed_data: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationConfig {
    pub default_page_size: u32,
    pub max_page_size: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub jwt_secret: String,
    pub jwt_issuer: String,
    pub jwt_audience: String,
    pub jwt_expiry_hours: u64,
    pub enable_cors: bool,
    pub demo_user: DemoUserConfig,
}

/// Identity handed out by the demonstration credential endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DemoUserConfig {
    pub user_id: i64,
    pub given_name: String,
    pub family_name: String,
    pub city: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailConfig {
    pub mail_to_address: String,
    pub mail_from_address: String,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("JWT secret must be configured (SECURITY_JWT_SECRET)")]
    MissingJwtSecret,

    #[error("Invalid pagination settings: {0}")]
    InvalidPagination(String),
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // Server overrides
        if let Ok(v) = env::var("SERVER_HOST") {
            self.server.host = v;
        }
        if let Ok(v) = env::var("SERVER_PORT").or_else(|_| env::var("PORT")) {
            self.server.port = v.parse().unwrap_or(self.server.port);
        }

        // Database overrides
        if let Ok(v) = env::var("DATABASE_URL") {
            self.database.url = v;
        }
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Ok(v) = env::var("DATABASE_SEED_DATA") {
            self.database.seed_data = v.parse().unwrap_or(self.database.seed_data);
        }

        // Pagination overrides
        if let Ok(v) = env::var("PAGINATION_DEFAULT_PAGE_SIZE") {
            self.pagination.default_page_size = v.parse().unwrap_or(self.pagination.default_page_size);
        }
        if let Ok(v) = env::var("PAGINATION_MAX_PAGE_SIZE") {
            self.pagination.max_page_size = v.parse().unwrap_or(self.pagination.max_page_size);
        }

        // Security overrides
        if let Ok(v) = env::var("SECURITY_JWT_SECRET") {
            self.security.jwt_secret = v;
        }
        if let Ok(v) = env::var("SECURITY_JWT_ISSUER") {
            self.security.jwt_issuer = v;
        }
        if let Ok(v) = env::var("SECURITY_JWT_AUDIENCE") {
            self.security.jwt_audience = v;
        }
        if let Ok(v) = env::var("SECURITY_JWT_EXPIRY_HOURS") {
            self.security.jwt_expiry_hours = v.parse().unwrap_or(self.security.jwt_expiry_hours);
        }
        if let Ok(v) = env::var("SECURITY_ENABLE_CORS") {
            self.security.enable_cors = v.parse().unwrap_or(self.security.enable_cors);
        }

        // Mail overrides
        if let Ok(v) = env::var("MAIL_TO_ADDRESS") {
            self.mail.mail_to_address = v;
        }
        if let Ok(v) = env::var("MAIL_FROM_ADDRESS") {
            self.mail.mail_from_address = v;
        }

        self
    }

    /// Reject settings the server cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.security.jwt_secret.is_empty() {
            return Err(ConfigError::MissingJwtSecret);
        }
        if self.pagination.max_page_size == 0 || self.pagination.default_page_size == 0 {
            return Err(ConfigError::InvalidPagination(
                "page sizes must be greater than zero".to_string(),
            ));
        }
        if self.pagination.default_page_size > self.pagination.max_page_size {
            return Err(ConfigError::InvalidPagination(format!(
                "default page size {} exceeds maximum {}",
                self.pagination.default_page_size, self.pagination.max_page_size
            )));
        }
        Ok(())
    }

    /// Default tracing filter for the environment when RUST_LOG is unset
    pub fn default_log_filter(&self) -> &'static str {
        match self.environment {
            Environment::Development => "city_info_api=debug,tower_http=debug",
            Environment::Staging => "city_info_api=info,tower_http=info",
            Environment::Production => "city_info_api=info,tower_http=warn",
        }
    }

    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 3000,
            },
            database: DatabaseConfig {
                url: "memory".to_string(),
                max_connections: 5,
                seed_data: true,
            },
            pagination: PaginationConfig::default(),
            security: SecurityConfig {
                jwt_secret: "development-only-secret-change-me".to_string(),
                jwt_issuer: "https://localhost:3000".to_string(),
                jwt_audience: "cityinfoapi".to_string(),
                jwt_expiry_hours: 24,
                enable_cors: true,
                demo_user: DemoUserConfig::default(),
            },
            mail: MailConfig {
                mail_to_address: "admin@mycompany.com".to_string(),
                mail_from_address: "noreply@mycompany.com".to_string(),
            },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 3000,
            },
            database: DatabaseConfig {
                url: "sqlite://cityinfo.db?mode=rwc".to_string(),
                max_connections: 10,
                seed_data: true,
            },
            pagination: PaginationConfig::default(),
            security: SecurityConfig {
                jwt_secret: String::new(),
                jwt_issuer: "https://staging.example.com".to_string(),
                jwt_audience: "cityinfoapi".to_string(),
                jwt_expiry_hours: 24,
                enable_cors: true,
                demo_user: DemoUserConfig::default(),
            },
            mail: MailConfig {
                mail_to_address: "admin@mycompany.com".to_string(),
                mail_from_address: "noreply@mycompany.com".to_string(),
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8080,
            },
            database: DatabaseConfig {
                url: "sqlite://cityinfo.db?mode=rwc".to_string(),
                max_connections: 20,
                seed_data: false,
            },
            pagination: PaginationConfig::default(),
            security: SecurityConfig {
                jwt_secret: String::new(),
                jwt_issuer: "https://app.example.com".to_string(),
                jwt_audience: "cityinfoapi".to_string(),
                jwt_expiry_hours: 4,
                enable_cors: false,
                demo_user: DemoUserConfig::default(),
            },
            mail: MailConfig {
                mail_to_address: "admin@mycompany.com".to_string(),
                mail_from_address: "noreply@mycompany.com".to_string(),
            },
        }
    }
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_page_size: 10,
            max_page_size: 20,
        }
    }
}

impl Default for DemoUserConfig {
    fn default() -> Self {
        Self {
            user_id: 1,
            given_name: "Rhea".to_string(),
            family_name: "Doggie".to_string(),
            city: "Manila".to_string(),
        }
    }
}
