//! Data Transfer Objects for API responses.
//!
//! Request bodies deserialize straight into the service input types in
//! `service::input`. Responses are built here from domain values so the wire
//! format stays independent of the stored document layout.

use serde::Serialize;

use crate::domain::{
    Agent, AgentLeadTotals, AgentSummary, Comment, Lead, LeadSource, LeadStatus, Priority,
    StatusCount,
};
use crate::service::{PipelineSummary, ResolvedComment, ResolvedLead};

// =============================================================================
// Envelope
// =============================================================================

/// The `{ success, message?, data }` wrapper used by lead, comment and
/// report endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct DataEnvelope<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub data: T,
}

impl<T> DataEnvelope<T> {
    /// A successful envelope without a message.
    #[must_use]
    pub const fn data(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data,
        }
    }

    /// A successful envelope with a message.
    #[must_use]
    pub fn with_message(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data,
        }
    }
}

// =============================================================================
// Agent DTOs
// =============================================================================

/// Response DTO for an agent.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&Agent> for AgentResponse {
    fn from(agent: &Agent) -> Self {
        Self {
            id: agent.id.to_string(),
            name: agent.name.clone(),
            email: agent.email.as_str().to_string(),
            created_at: agent.created_at.to_string(),
            updated_at: agent.updated_at.to_string(),
        }
    }
}

/// An agent as referenced from a lead or comment.
#[derive(Debug, Clone, Serialize)]
pub struct AgentRefResponse {
    pub id: String,
    pub name: String,
    pub email: String,
}

impl From<&AgentSummary> for AgentRefResponse {
    fn from(agent: &AgentSummary) -> Self {
        Self {
            id: agent.id.to_string(),
            name: agent.name.clone(),
            email: agent.email.as_str().to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentUpdatedResponse {
    pub message: &'static str,
    pub updated_agent: AgentResponse,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentDeletedResponse {
    pub message: &'static str,
    pub deleted_agent: AgentResponse,
}

// =============================================================================
// Lead DTOs
// =============================================================================

/// Response DTO for a lead with its agent resolved. `salesAgent` is `null`
/// when the agent no longer exists.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadResponse {
    pub id: String,
    pub name: String,
    pub source: LeadSource,
    pub sales_agent: Option<AgentRefResponse>,
    pub status: LeadStatus,
    pub tags: Vec<String>,
    pub time_to_close: f64,
    pub priority: Priority,
    pub closed_at: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&ResolvedLead> for LeadResponse {
    fn from(resolved: &ResolvedLead) -> Self {
        let lead = &resolved.lead;
        Self {
            id: lead.id.to_string(),
            name: lead.name.clone(),
            source: lead.source,
            sales_agent: resolved.sales_agent.as_ref().map(AgentRefResponse::from),
            status: lead.status,
            tags: lead.tags.clone(),
            time_to_close: lead.time_to_close,
            priority: lead.priority,
            closed_at: lead.closed_at.map(|closed_at| closed_at.to_string()),
            created_at: lead.created_at.to_string(),
            updated_at: lead.updated_at.to_string(),
        }
    }
}

impl LeadResponse {
    #[must_use]
    pub fn list(leads: &[ResolvedLead]) -> Vec<Self> {
        leads.iter().map(Self::from).collect()
    }
}

/// Response DTO for a stored lead without agent resolution. `salesAgent`
/// is the agent id.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadRecordResponse {
    pub id: String,
    pub name: String,
    pub source: LeadSource,
    pub sales_agent: String,
    pub status: LeadStatus,
    pub tags: Vec<String>,
    pub time_to_close: f64,
    pub priority: Priority,
    pub closed_at: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&Lead> for LeadRecordResponse {
    fn from(lead: &Lead) -> Self {
        Self {
            id: lead.id.to_string(),
            name: lead.name.clone(),
            source: lead.source,
            sales_agent: lead.sales_agent.to_string(),
            status: lead.status,
            tags: lead.tags.clone(),
            time_to_close: lead.time_to_close,
            priority: lead.priority,
            closed_at: lead.closed_at.map(|closed_at| closed_at.to_string()),
            created_at: lead.created_at.to_string(),
            updated_at: lead.updated_at.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LeadDeletedResponse {
    pub message: &'static str,
    pub data: LeadRecordResponse,
}

// =============================================================================
// Comment DTOs
// =============================================================================

/// Response DTO for a comment with its author resolved.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentResponse {
    pub id: String,
    pub lead: String,
    pub author: Option<AgentRefResponse>,
    pub comment_text: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&ResolvedComment> for CommentResponse {
    fn from(resolved: &ResolvedComment) -> Self {
        let comment = &resolved.comment;
        Self {
            id: comment.id.to_string(),
            lead: comment.lead.to_string(),
            author: resolved.author.as_ref().map(AgentRefResponse::from),
            comment_text: comment.comment_text.clone(),
            created_at: comment.created_at.to_string(),
            updated_at: comment.updated_at.to_string(),
        }
    }
}

/// Response DTO for a deleted comment; `author` is the agent id.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentRecordResponse {
    pub id: String,
    pub lead: String,
    pub author: String,
    pub comment_text: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&Comment> for CommentRecordResponse {
    fn from(comment: &Comment) -> Self {
        Self {
            id: comment.id.to_string(),
            lead: comment.lead.to_string(),
            author: comment.author.to_string(),
            comment_text: comment.comment_text.clone(),
            created_at: comment.created_at.to_string(),
            updated_at: comment.updated_at.to_string(),
        }
    }
}

// =============================================================================
// Report DTOs
// =============================================================================

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineResponse {
    pub total_leads_in_pipeline: u64,
}

impl From<&PipelineSummary> for PipelineResponse {
    fn from(summary: &PipelineSummary) -> Self {
        Self {
            total_leads_in_pipeline: summary.total_leads_in_pipeline,
        }
    }
}

/// One row of the leads-by-agent report.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentTotalsResponse {
    pub agent_id: String,
    pub agent_name: String,
    pub agent_email: String,
    pub total_leads: u64,
    pub closed_leads: u64,
}

impl From<&AgentLeadTotals> for AgentTotalsResponse {
    fn from(totals: &AgentLeadTotals) -> Self {
        Self {
            agent_id: totals.agent.id.to_string(),
            agent_name: totals.agent.name.clone(),
            agent_email: totals.agent.email.as_str().to_string(),
            total_leads: totals.total_leads,
            closed_leads: totals.closed_leads,
        }
    }
}

/// One row of the status distribution report.
pub type StatusCountResponse = StatusCount;
