//! Agent operations.

use std::sync::Arc;

use crate::domain::{Agent, AgentId, EmailAddress, Timestamp};
use crate::infrastructure::{AgentRepository, RepositoryError};

use super::error::ServiceError;
use super::input::AgentDraft;
use super::validation::{parse_agent_id, validate_agent};

fn duplicate_email(email: &EmailAddress) -> ServiceError {
    ServiceError::conflict(format!("Sales agent with email '{email}' already exists."))
}

fn agent_not_found() -> ServiceError {
    ServiceError::not_found("Agent not found.")
}

/// Agent operations.
#[derive(Clone)]
pub struct AgentService {
    agents: Arc<dyn AgentRepository + Send + Sync>,
}

impl AgentService {
    #[must_use]
    pub fn new(agents: Arc<dyn AgentRepository + Send + Sync>) -> Self {
        Self { agents }
    }

    async fn store(&self, agent: &Agent) -> Result<(), ServiceError> {
        self.agents.save(agent).await.map_err(|error| match error {
            RepositoryError::Conflict(_) => duplicate_email(&agent.email),
            other => other.into(),
        })
    }

    /// Registers a new agent.
    ///
    /// # Errors
    ///
    /// `BadRequest` for an invalid payload, `Conflict` if the email is taken.
    pub async fn create(&self, draft: &AgentDraft) -> Result<Agent, ServiceError> {
        let valid = validate_agent(draft)?;
        if self.agents.find_by_email(&valid.email).await?.is_some() {
            return Err(duplicate_email(&valid.email));
        }

        let agent = Agent::new(AgentId::generate(), valid.name, valid.email, Timestamp::now());
        self.store(&agent).await?;

        tracing::info!(agent_id = %agent.id, "Agent created");
        Ok(agent)
    }

    /// Lists every agent.
    ///
    /// # Errors
    ///
    /// `NotFound` when no agent exists yet.
    pub async fn list(&self) -> Result<Vec<Agent>, ServiceError> {
        let agents = self.agents.list().await?;
        if agents.is_empty() {
            return Err(ServiceError::not_found("No agents found."));
        }
        Ok(agents)
    }

    /// Replaces an agent's name and email.
    ///
    /// # Errors
    ///
    /// `BadRequest` for a malformed id or invalid payload, `NotFound` if the
    /// agent does not exist, `Conflict` if another agent owns the email.
    pub async fn update(&self, id: &str, draft: &AgentDraft) -> Result<Agent, ServiceError> {
        let id = parse_agent_id(id)?;
        let valid = validate_agent(draft)?;

        let existing = self
            .agents
            .find_by_id(&id)
            .await?
            .ok_or_else(agent_not_found)?;
        if let Some(owner) = self.agents.find_by_email(&valid.email).await?
            && owner.id != id
        {
            return Err(duplicate_email(&valid.email));
        }

        let updated = existing.with_details(valid.name, valid.email, Timestamp::now());
        self.store(&updated).await?;

        tracing::info!(agent_id = %id, "Agent updated");
        Ok(updated)
    }

    /// Deletes an agent and returns it. Leads and comments referencing the
    /// agent are kept.
    ///
    /// # Errors
    ///
    /// `BadRequest` for a malformed id, `NotFound` if absent.
    pub async fn delete(&self, id: &str) -> Result<Agent, ServiceError> {
        let id = parse_agent_id(id)?;
        let agent = self.agents.delete(&id).await?.ok_or_else(agent_not_found)?;
        tracing::info!(agent_id = %id, "Agent deleted");
        Ok(agent)
    }
}
