use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use super::memory::MemoryRepository;
use super::repository::CityInfoRepository;
use super::sql::SqlRepository;
use crate::config::DatabaseConfig;
use crate::filter::FilterError;

/// Errors raised by the persistence layer
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Unsupported database URL: {0}")]
    UnsupportedUrl(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Query error: {0}")]
    QueryError(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

impl From<FilterError> for DatabaseError {
    fn from(err: FilterError) -> Self {
        DatabaseError::QueryError(err.to_string())
    }
}

/// Builds the repository backend named by the configured URL
pub struct DatabaseManager;

impl DatabaseManager {
    /// URL selecting the in-process store
    pub const MEMORY_URL: &'static str = "memory";

    pub async fn connect(config: &DatabaseConfig) -> Result<Arc<dyn CityInfoRepository>, DatabaseError> {
        let repository: Arc<dyn CityInfoRepository> = if config.url == Self::MEMORY_URL {
            info!("Using in-memory city store");
            Arc::new(MemoryRepository::new())
        } else if config.url.starts_with("sqlite:") {
            let repo = SqlRepository::connect(&config.url, config.max_connections).await?;
            info!("Connected to SQLite database: {}", Self::redact(&config.url));
            Arc::new(repo)
        } else {
            return Err(DatabaseError::UnsupportedUrl(Self::redact(&config.url)));
        };

        if config.seed_data {
            super::seed::seed_cities(repository.as_ref()).await?;
        }

        Ok(repository)
    }

    /// Strip query parameters before a URL is logged
    fn redact(url: &str) -> String {
        url.split('?').next().unwrap_or(url).to_string()
    }
}
