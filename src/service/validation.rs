//! Pure validation of request payloads.
//!
//! Each function turns a raw payload into validated domain values or a
//! `ServiceError::BadRequest` naming the offending field. Checks that need
//! storage (agent existence, email uniqueness) belong to the services.

use crate::domain::{
    AgentId, CommentId, EmailAddress, Enumerated, LeadChanges, LeadFilter, LeadId, LeadSource,
    LeadStatus, NewLead, Priority, SortOrder,
};

use super::error::ServiceError;
use super::input::{AgentDraft, CommentDraft, LeadDraft, LeadFilterParams, present};

// =============================================================================
// Identifiers
// =============================================================================

/// Parses a lead id from a path segment.
///
/// # Errors
///
/// Returns `BadRequest` if the value is not a well-formed identifier.
pub fn parse_lead_id(value: &str) -> Result<LeadId, ServiceError> {
    LeadId::parse(value).ok_or_else(|| ServiceError::invalid_field("id", "Invalid Lead ID format."))
}

/// Parses an agent id from a path segment.
///
/// # Errors
///
/// Returns `BadRequest` if the value is not a well-formed identifier.
pub fn parse_agent_id(value: &str) -> Result<AgentId, ServiceError> {
    AgentId::parse(value)
        .ok_or_else(|| ServiceError::invalid_field("id", "Invalid Agent ID format."))
}

/// Parses a comment id from a path segment.
///
/// # Errors
///
/// Returns `BadRequest` if the value is not a well-formed identifier.
pub fn parse_comment_id(value: &str) -> Result<CommentId, ServiceError> {
    CommentId::parse(value)
        .ok_or_else(|| ServiceError::invalid_field("id", "Invalid Comment ID format."))
}

fn parse_sales_agent(value: &str) -> Result<AgentId, ServiceError> {
    AgentId::parse(value)
        .ok_or_else(|| ServiceError::invalid_field("salesAgent", "Invalid Sales Agent ID format."))
}

fn parse_enumerated<T: Enumerated>(field: &str, label: &str, value: &str) -> Result<T, ServiceError> {
    T::from_name(value.trim()).ok_or_else(|| {
        ServiceError::invalid_field(
            field,
            format!("Invalid {label}. Must be one of: {}", T::allowed_values()),
        )
    })
}

fn parse_source(value: &str) -> Result<LeadSource, ServiceError> {
    parse_enumerated("source", "source", value)
}

fn parse_status(value: &str) -> Result<LeadStatus, ServiceError> {
    parse_enumerated("status", "status", value)
}

fn parse_priority(value: &str) -> Result<Priority, ServiceError> {
    parse_enumerated("priority", "priority", value)
}

fn positive_time_to_close(value: f64, message: &str) -> Result<f64, ServiceError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(ServiceError::invalid_field("timeToClose", message))
    }
}

// =============================================================================
// Agents
// =============================================================================

/// Validated agent fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidAgent {
    pub name: String,
    pub email: EmailAddress,
}

/// Validates an agent payload for create and update.
///
/// # Errors
///
/// Returns `BadRequest` if the name or email is missing or the email is
/// malformed.
pub fn validate_agent(draft: &AgentDraft) -> Result<ValidAgent, ServiceError> {
    let name = present(draft.name.as_deref());
    let email = present(draft.email.as_deref());

    let (Some(name), Some(email)) = (name, email) else {
        let field = if name.is_none() { "name" } else { "email" };
        return Err(ServiceError::invalid_field(
            field,
            "Both name and email are required.",
        ));
    };

    let email = EmailAddress::parse(email).ok_or_else(|| {
        ServiceError::invalid_field(
            "email",
            "Invalid input: 'email' must be a valid email address.",
        )
    })?;

    Ok(ValidAgent {
        name: name.to_string(),
        email,
    })
}

// =============================================================================
// Leads
// =============================================================================

/// Validates a lead creation payload.
///
/// Presence is checked for every required field before any value check.
///
/// # Errors
///
/// Returns `BadRequest` naming the first missing or invalid field.
pub fn validate_new_lead(draft: &LeadDraft) -> Result<NewLead, ServiceError> {
    let name = present(draft.name.as_deref())
        .ok_or_else(|| ServiceError::invalid_field("name", "Lead name is required."))?;
    let source = present(draft.source.as_deref())
        .ok_or_else(|| ServiceError::invalid_field("source", "Lead Source is required"))?;
    let sales_agent = present(draft.sales_agent.as_deref())
        .ok_or_else(|| ServiceError::invalid_field("salesAgent", "Sales Agent ID is required."))?;
    let time_to_close = draft
        .time_to_close
        .ok_or_else(|| ServiceError::invalid_field("timeToClose", "Time to close is required."))?;
    let priority = present(draft.priority.as_deref())
        .ok_or_else(|| ServiceError::invalid_field("priority", "Priority is required"))?;
    let status = present(draft.status.as_deref())
        .ok_or_else(|| ServiceError::invalid_field("status", "Status is required"))?;

    let source = parse_source(source)?;
    let status = parse_status(status)?;
    let priority = parse_priority(priority)?;
    let time_to_close =
        positive_time_to_close(time_to_close, "Time to close must be a positive number.")?;
    let sales_agent = parse_sales_agent(sales_agent)?;

    Ok(NewLead {
        name: name.to_string(),
        source,
        sales_agent,
        status,
        tags: draft.tags.clone().unwrap_or_default(),
        time_to_close,
        priority,
    })
}

/// Validates a partial lead update. Absent fields are left alone; present
/// fields get the same checks as on creation.
///
/// # Errors
///
/// Returns `BadRequest` for an invalid field, or when no field is supplied.
pub fn validate_lead_changes(draft: &LeadDraft) -> Result<LeadChanges, ServiceError> {
    let name = draft
        .name
        .as_deref()
        .map(|name| {
            present(Some(name))
                .map(ToString::to_string)
                .ok_or_else(|| ServiceError::invalid_field("name", "Name cannot be empty."))
        })
        .transpose()?;

    let changes = LeadChanges {
        name,
        source: draft.source.as_deref().map(parse_source).transpose()?,
        sales_agent: draft
            .sales_agent
            .as_deref()
            .map(parse_sales_agent)
            .transpose()?,
        status: draft.status.as_deref().map(parse_status).transpose()?,
        tags: draft.tags.clone(),
        time_to_close: draft
            .time_to_close
            .map(|value| positive_time_to_close(value, "timeToClose must be a positive number."))
            .transpose()?,
        priority: draft.priority.as_deref().map(parse_priority).transpose()?,
    };

    if changes.is_empty() {
        return Err(ServiceError::bad_request(
            "No valid fields provided for update.",
        ));
    }
    Ok(changes)
}

// =============================================================================
// Filters
// =============================================================================

/// Validated listing parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ValidFilter {
    pub filter: LeadFilter,
    pub sort: Option<SortOrder>,
}

/// Validates listing parameters. Blank values are treated as absent.
///
/// # Errors
///
/// Returns `BadRequest` naming the invalid parameter and its allowed values.
pub fn validate_filter_params(params: &LeadFilterParams) -> Result<ValidFilter, ServiceError> {
    let sales_agent = present(params.sales_agent.as_deref())
        .map(parse_sales_agent)
        .transpose()?;
    let status = present(params.status.as_deref())
        .map(parse_status)
        .transpose()?;
    let source = present(params.source.as_deref())
        .map(parse_source)
        .transpose()?;
    let priority = present(params.priority.as_deref())
        .map(parse_priority)
        .transpose()?;
    let sort = present(params.sort.as_deref())
        .map(|value| parse_enumerated::<SortOrder>("sort", "Sort", value))
        .transpose()?;

    Ok(ValidFilter {
        filter: LeadFilter {
            sales_agent,
            status,
            source,
            priority,
        },
        sort,
    })
}

// =============================================================================
// Comments
// =============================================================================

/// Validated fields of a new comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidComment {
    pub lead: LeadId,
    pub author: AgentId,
    pub comment_text: String,
}

/// Validates a new comment on `lead_id`.
///
/// # Errors
///
/// Returns `BadRequest` for a malformed lead or author id or empty text.
pub fn validate_new_comment(
    lead_id: &str,
    draft: &CommentDraft,
) -> Result<ValidComment, ServiceError> {
    let lead = parse_lead_id(lead_id)?;
    let author = draft
        .author
        .as_deref()
        .and_then(AgentId::parse)
        .ok_or_else(|| ServiceError::invalid_field("author", "Invalid Author ID format."))?;
    let comment_text = present(draft.comment_text.as_deref())
        .ok_or_else(|| ServiceError::invalid_field("commentText", "Comment text is required"))?;

    Ok(ValidComment {
        lead,
        author,
        comment_text: comment_text.to_string(),
    })
}

/// Validates replacement comment text.
///
/// # Errors
///
/// Returns `BadRequest` if the text is missing or blank.
pub fn validate_comment_text(comment_text: Option<&str>) -> Result<String, ServiceError> {
    present(comment_text).map(ToString::to_string).ok_or_else(|| {
        ServiceError::invalid_field("commentText", "Comment text must be a non-empty string.")
    })
}

// =============================================================================
// Tests
// =============================================================================
