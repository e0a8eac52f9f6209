//! Repository traits for domain entities.
//!
//! Every method returns a boxed `'static` future so the traits stay object
//! safe and can be shared as `Arc<dyn ... + Send + Sync>`. Each mutating
//! method is a single storage call that carries the fully resolved record or
//! change set.

use futures::future::BoxFuture;
use thiserror::Error;

use crate::domain::{
    Agent, AgentId, Comment, CommentId, EmailAddress, Lead, LeadChangeSet, LeadFilter, LeadId,
    LeadSort, Timestamp,
};

// =============================================================================
// Repository Error
// =============================================================================

/// Errors that can occur during repository operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    /// Entity was not found.
    #[error("Entity not found: {0}")]
    NotFound(String),

    /// A unique constraint was violated.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Database connection or query error.
    #[error("Database error: {0}")]
    DatabaseError(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for RepositoryError {
    fn from(error: serde_json::Error) -> Self {
        Self::SerializationError(error.to_string())
    }
}

/// Future returned by every repository method.
pub type RepositoryFuture<T> = BoxFuture<'static, Result<T, RepositoryError>>;

// =============================================================================
// Agent Repository
// =============================================================================

/// Repository trait for agents.
pub trait AgentRepository: Send + Sync {
    /// Finds an agent by id.
    fn find_by_id(&self, id: &AgentId) -> RepositoryFuture<Option<Agent>>;

    /// Finds an agent by normalized email.
    fn find_by_email(&self, email: &EmailAddress) -> RepositoryFuture<Option<Agent>>;

    /// Finds every agent whose id is in `ids`. Unknown ids are skipped.
    fn find_by_ids(&self, ids: &[AgentId]) -> RepositoryFuture<Vec<Agent>>;

    /// Lists all agents in creation order.
    fn list(&self) -> RepositoryFuture<Vec<Agent>>;

    /// Inserts or replaces an agent.
    ///
    /// # Errors
    ///
    /// Fails with `Conflict` if another agent already owns the email.
    fn save(&self, agent: &Agent) -> RepositoryFuture<()>;

    /// Deletes an agent, returning the removed record if it existed.
    fn delete(&self, id: &AgentId) -> RepositoryFuture<Option<Agent>>;
}

// =============================================================================
// Lead Repository
// =============================================================================

/// Repository trait for leads.
pub trait LeadRepository: Send + Sync {
    /// Inserts a new lead.
    fn insert(&self, lead: &Lead) -> RepositoryFuture<()>;

    /// Finds a lead by id.
    fn find_by_id(&self, id: &LeadId) -> RepositoryFuture<Option<Lead>>;

    /// Returns the leads matching `filter`, ordered by `sort`.
    fn find(&self, filter: &LeadFilter, sort: LeadSort) -> RepositoryFuture<Vec<Lead>>;

    /// Applies a resolved change set in one atomic write and returns the
    /// stored result, or `None` if the lead does not exist.
    fn update(&self, id: &LeadId, change_set: &LeadChangeSet) -> RepositoryFuture<Option<Lead>>;

    /// Deletes a lead, returning the removed record if it existed.
    fn delete(&self, id: &LeadId) -> RepositoryFuture<Option<Lead>>;
}

// =============================================================================
// Comment Repository
// =============================================================================

/// Repository trait for comments.
pub trait CommentRepository: Send + Sync {
    /// Inserts a new comment.
    fn insert(&self, comment: &Comment) -> RepositoryFuture<()>;

    /// Finds a comment by id.
    fn find_by_id(&self, id: &CommentId) -> RepositoryFuture<Option<Comment>>;

    /// Lists the comments on a lead, newest first.
    fn find_by_lead(&self, lead: &LeadId) -> RepositoryFuture<Vec<Comment>>;

    /// Replaces the text of a comment and returns the stored result, or
    /// `None` if the comment does not exist.
    fn update_text(
        &self,
        id: &CommentId,
        comment_text: &str,
        now: Timestamp,
    ) -> RepositoryFuture<Option<Comment>>;

    /// Deletes a comment, returning the removed record if it existed.
    fn delete(&self, id: &CommentId) -> RepositoryFuture<Option<Comment>>;
}
