//! Infrastructure module: repository traits and their storage backends.

pub mod factory;
pub mod in_memory;
pub mod postgres;
pub mod repository;

pub use factory::{
    ConfigurationError, FactoryError, Repositories, RepositoryConfig, RepositoryConfigBuilder,
    RepositoryFactory, StorageMode,
};
pub use in_memory::{InMemoryAgentRepository, InMemoryCommentRepository, InMemoryLeadRepository};
pub use postgres::{PostgresAgentRepository, PostgresCommentRepository, PostgresLeadRepository};
pub use repository::{
    AgentRepository, CommentRepository, LeadRepository, RepositoryError, RepositoryFuture,
};
