//! Comment operations.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::domain::{AgentId, AgentSummary, Comment, CommentId, LeadId, Timestamp};
use crate::infrastructure::{AgentRepository, CommentRepository, LeadRepository};

use super::error::ServiceError;
use super::input::{CommentDraft, CommentEdit};
use super::validation::{
    parse_comment_id, parse_lead_id, validate_comment_text, validate_new_comment,
};

/// A comment with its author looked up. `author` is `None` when the agent
/// has since been deleted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedComment {
    pub comment: Comment,
    pub author: Option<AgentSummary>,
}

fn comment_not_found(id: &CommentId) -> ServiceError {
    ServiceError::not_found(format!("Comment with ID '{id}' not found."))
}

/// Comment operations.
#[derive(Clone)]
pub struct CommentService {
    comments: Arc<dyn CommentRepository + Send + Sync>,
    leads: Arc<dyn LeadRepository + Send + Sync>,
    agents: Arc<dyn AgentRepository + Send + Sync>,
}

impl CommentService {
    #[must_use]
    pub fn new(
        comments: Arc<dyn CommentRepository + Send + Sync>,
        leads: Arc<dyn LeadRepository + Send + Sync>,
        agents: Arc<dyn AgentRepository + Send + Sync>,
    ) -> Self {
        Self {
            comments,
            leads,
            agents,
        }
    }

    async fn require_lead(&self, id: &LeadId) -> Result<(), ServiceError> {
        match self.leads.find_by_id(id).await? {
            Some(_) => Ok(()),
            None => Err(ServiceError::not_found(format!(
                "Lead with ID '{id}' not found."
            ))),
        }
    }

    async fn resolve(&self, comments: Vec<Comment>) -> Result<Vec<ResolvedComment>, ServiceError> {
        let mut ids: Vec<AgentId> = comments.iter().map(|comment| comment.author).collect();
        ids.sort_unstable();
        ids.dedup();

        let known: BTreeMap<AgentId, AgentSummary> = self
            .agents
            .find_by_ids(&ids)
            .await?
            .iter()
            .map(|agent| (agent.id, agent.summary()))
            .collect();

        Ok(comments
            .into_iter()
            .map(|comment| ResolvedComment {
                author: known.get(&comment.author).cloned(),
                comment,
            })
            .collect())
    }

    /// Adds a comment to a lead.
    ///
    /// # Errors
    ///
    /// `BadRequest` for malformed ids or empty text, `NotFound` if the author
    /// or lead does not exist.
    pub async fn add(
        &self,
        lead_id: &str,
        draft: &CommentDraft,
    ) -> Result<ResolvedComment, ServiceError> {
        let valid = validate_new_comment(lead_id, draft)?;

        let author = self
            .agents
            .find_by_id(&valid.author)
            .await?
            .ok_or_else(|| {
                ServiceError::not_found(format!("Author with ID '{}' not found.", valid.author))
            })?;
        self.require_lead(&valid.lead).await?;

        let comment = Comment::new(
            CommentId::generate(),
            valid.lead,
            valid.author,
            valid.comment_text,
            Timestamp::now(),
        );
        self.comments.insert(&comment).await?;

        tracing::info!(comment_id = %comment.id, lead_id = %comment.lead, "Comment added");
        Ok(ResolvedComment {
            comment,
            author: Some(author.summary()),
        })
    }

    /// Lists the comments on a lead, newest first.
    ///
    /// # Errors
    ///
    /// `BadRequest` for a malformed id, `NotFound` if the lead does not exist
    /// or has no comments.
    pub async fn list_for_lead(&self, lead_id: &str) -> Result<Vec<ResolvedComment>, ServiceError> {
        let lead = parse_lead_id(lead_id)?;
        self.require_lead(&lead).await?;

        let comments = self.comments.find_by_lead(&lead).await?;
        if comments.is_empty() {
            return Err(ServiceError::not_found("No comments found for this lead."));
        }
        self.resolve(comments).await
    }

    /// Replaces a comment's text.
    ///
    /// # Errors
    ///
    /// `BadRequest` for a malformed id or empty text, `NotFound` if absent.
    pub async fn update_text(
        &self,
        comment_id: &str,
        edit: &CommentEdit,
    ) -> Result<ResolvedComment, ServiceError> {
        let id = parse_comment_id(comment_id)?;
        let text = validate_comment_text(edit.comment_text.as_deref())?;

        let comment = self
            .comments
            .update_text(&id, &text, Timestamp::now())
            .await?
            .ok_or_else(|| comment_not_found(&id))?;

        tracing::info!(comment_id = %id, "Comment updated");
        let mut resolved = self.resolve(vec![comment]).await?;
        resolved.pop().ok_or_else(|| comment_not_found(&id))
    }

    /// Deletes a comment and returns it.
    ///
    /// # Errors
    ///
    /// `BadRequest` for a malformed id, `NotFound` if absent.
    pub async fn delete(&self, comment_id: &str) -> Result<Comment, ServiceError> {
        let id = parse_comment_id(comment_id)?;
        let comment = self
            .comments
            .delete(&id)
            .await?
            .ok_or_else(|| comment_not_found(&id))?;
        tracing::info!(comment_id = %id, "Comment deleted");
        Ok(comment)
    }
}
