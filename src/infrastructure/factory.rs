//! Repository factory for runtime backend selection.
//!
//! # Environment Variables
//!
//! - `STORAGE_MODE`: `in_memory` (default) | `postgres`
//! - `DATABASE_URL`: `PostgreSQL` connection URL (required when `STORAGE_MODE=postgres`)
//!
//! # Example
//!
//! ```ignore
//! let config = RepositoryConfig::from_env()?;
//! let repositories = RepositoryFactory::new(config).create().await?;
//! // ... serve requests ...
//! repositories.close().await;
//! ```

use std::env;
use std::str::FromStr;
use std::sync::Arc;

use sqlx::PgPool;
use thiserror::Error;

use super::{
    AgentRepository, CommentRepository, InMemoryAgentRepository, InMemoryCommentRepository,
    InMemoryLeadRepository, LeadRepository, PostgresAgentRepository, PostgresCommentRepository,
    PostgresLeadRepository, postgres,
};

// =============================================================================
// Configuration Types
// =============================================================================

/// Storage backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StorageMode {
    /// Process-local maps. Data is lost on restart.
    #[default]
    InMemory,
    /// `PostgreSQL`.
    Postgres,
}

impl FromStr for StorageMode {
    type Err = ConfigurationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "in_memory" | "inmemory" | "memory" => Ok(Self::InMemory),
            "postgres" | "postgresql" | "pg" => Ok(Self::Postgres),
            _ => Err(ConfigurationError::InvalidStorageMode(value.to_string())),
        }
    }
}

/// Configuration for the repository factory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepositoryConfig {
    pub storage_mode: StorageMode,
    /// `PostgreSQL` connection URL (required when `storage_mode` is `Postgres`).
    pub database_url: Option<String>,
}

impl RepositoryConfig {
    /// Creates a new configuration builder.
    pub fn builder() -> RepositoryConfigBuilder {
        RepositoryConfigBuilder::default()
    }

    /// Creates a configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError` if `STORAGE_MODE` is invalid or
    /// `DATABASE_URL` is missing when `STORAGE_MODE=postgres`.
    pub fn from_env() -> Result<Self, ConfigurationError> {
        Self::from_values(
            env::var("STORAGE_MODE").ok().as_deref(),
            env::var("DATABASE_URL").ok().as_deref(),
        )
    }

    /// Creates a configuration from raw variable values.
    ///
    /// Empty or whitespace-only values count as unset.
    ///
    /// # Errors
    ///
    /// See [`RepositoryConfig::from_env`].
    pub fn from_values(
        storage_mode: Option<&str>,
        database_url: Option<&str>,
    ) -> Result<Self, ConfigurationError> {
        let storage_mode = match storage_mode.map(str::trim).filter(|value| !value.is_empty()) {
            Some(value) => value.parse()?,
            None => StorageMode::default(),
        };
        let database_url = database_url
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(ToString::to_string);

        let config = Self {
            storage_mode,
            database_url,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::MissingDatabaseUrl` if the URL is missing
    /// for the `PostgreSQL` backend.
    pub const fn validate(&self) -> Result<(), ConfigurationError> {
        if matches!(self.storage_mode, StorageMode::Postgres) && self.database_url.is_none() {
            return Err(ConfigurationError::MissingDatabaseUrl);
        }
        Ok(())
    }
}

/// Builder for `RepositoryConfig`.
#[derive(Debug, Clone, Default)]
pub struct RepositoryConfigBuilder {
    storage_mode: StorageMode,
    database_url: Option<String>,
}

impl RepositoryConfigBuilder {
    #[must_use]
    pub const fn storage_mode(mut self, mode: StorageMode) -> Self {
        self.storage_mode = mode;
        self
    }

    #[must_use]
    pub fn database_url(mut self, url: impl Into<String>) -> Self {
        self.database_url = Some(url.into());
        self
    }

    /// Builds the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError` if the configuration is invalid.
    pub fn build(self) -> Result<RepositoryConfig, ConfigurationError> {
        let config = RepositoryConfig {
            storage_mode: self.storage_mode,
            database_url: self.database_url,
        };
        config.validate()?;
        Ok(config)
    }
}

// =============================================================================
// Error Types
// =============================================================================

/// Errors in repository configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("Invalid storage mode: '{0}'. Expected 'in_memory' or 'postgres'")]
    InvalidStorageMode(String),

    #[error("DATABASE_URL environment variable is required when STORAGE_MODE=postgres")]
    MissingDatabaseUrl,
}

/// Errors that can occur during factory initialization.
#[derive(Debug, Error)]
pub enum FactoryError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("Database connection error: {0}")]
    DatabaseConnection(String),

    #[error("Schema migration error: {0}")]
    Migration(String),
}

// =============================================================================
// Repository Factory
// =============================================================================

/// Collection of initialized repositories.
#[derive(Clone)]
pub struct Repositories {
    pub agent_repository: Arc<dyn AgentRepository + Send + Sync>,
    pub lead_repository: Arc<dyn LeadRepository + Send + Sync>,
    pub comment_repository: Arc<dyn CommentRepository + Send + Sync>,
    pool: Option<PgPool>,
}

impl Repositories {
    /// Creates empty in-memory repositories.
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            agent_repository: Arc::new(InMemoryAgentRepository::new()),
            lead_repository: Arc::new(InMemoryLeadRepository::new()),
            comment_repository: Arc::new(InMemoryCommentRepository::new()),
            pool: None,
        }
    }

    /// Creates `PostgreSQL`-backed repositories sharing one pool.
    #[must_use]
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            agent_repository: Arc::new(PostgresAgentRepository::new(pool.clone())),
            lead_repository: Arc::new(PostgresLeadRepository::new(pool.clone())),
            comment_repository: Arc::new(PostgresCommentRepository::new(pool.clone())),
            pool: Some(pool),
        }
    }

    /// Releases backend connections. A no-op for the in-memory backend.
    pub async fn close(&self) {
        if let Some(pool) = &self.pool {
            pool.close().await;
        }
    }
}

impl std::fmt::Debug for Repositories {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("Repositories")
            .field("agent_repository", &"Arc<dyn AgentRepository>")
            .field("lead_repository", &"Arc<dyn LeadRepository>")
            .field("comment_repository", &"Arc<dyn CommentRepository>")
            .field("postgres", &self.pool.is_some())
            .finish()
    }
}

/// Factory for creating repositories based on configuration.
#[derive(Debug, Clone)]
pub struct RepositoryFactory {
    config: RepositoryConfig,
}

impl RepositoryFactory {
    #[must_use]
    pub const fn new(config: RepositoryConfig) -> Self {
        Self { config }
    }

    /// Creates a new repository factory from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `FactoryError::Configuration` if environment configuration is invalid.
    pub fn from_env() -> Result<Self, FactoryError> {
        Ok(Self::new(RepositoryConfig::from_env()?))
    }

    #[must_use]
    pub const fn config(&self) -> &RepositoryConfig {
        &self.config
    }

    /// Creates all repositories, connecting and migrating the database when
    /// the `PostgreSQL` backend is selected.
    ///
    /// # Errors
    ///
    /// Returns `FactoryError` if the connection or schema setup fails.
    pub async fn create(&self) -> Result<Repositories, FactoryError> {
        match self.config.storage_mode {
            StorageMode::InMemory => Ok(Repositories::in_memory()),
            StorageMode::Postgres => {
                let pool = self.create_postgres_pool().await?;
                postgres::migrate(&pool)
                    .await
                    .map_err(|error| FactoryError::Migration(error.to_string()))?;
                Ok(Repositories::postgres(pool))
            }
        }
    }

    async fn create_postgres_pool(&self) -> Result<PgPool, FactoryError> {
        let database_url = self
            .config
            .database_url
            .as_ref()
            .ok_or(ConfigurationError::MissingDatabaseUrl)?;

        PgPool::connect(database_url)
            .await
            .map_err(|error| FactoryError::DatabaseConnection(error.to_string()))
    }
}

// =============================================================================
// Tests
// =============================================================================
