//! Sales agent domain model.
//!
//! Agents own leads and author comments. An agent is identified by a UUID and
//! by a unique, case-insensitive email address.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Timestamp;

static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\S+@\S+\.\S+$").expect("Invalid email regex"));

// =============================================================================
// Value Objects
// =============================================================================

/// Unique identifier for an agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AgentId(Uuid);

impl AgentId {
    /// Creates an `AgentId` from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the inner UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// Generates a new time-ordered `AgentId` (UUID v7).
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::now_v7())
    }

    /// Parses an identifier, returning `None` when it is not a well-formed UUID.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        Uuid::parse_str(value.trim()).ok().map(Self)
    }
}

impl std::fmt::Display for AgentId {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// A normalized email address.
///
/// Normalization trims surrounding whitespace and lowercases the address, so
/// two addresses that differ only in case compare equal.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Parses and normalizes an email address.
    ///
    /// Returns `None` if the trimmed value does not look like `local@domain.tld`.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        let trimmed = value.trim();
        EMAIL_PATTERN
            .is_match(trimmed)
            .then(|| Self(trimmed.to_lowercase()))
    }

    /// Returns the address as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for EmailAddress {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(&self.0)
    }
}

// =============================================================================
// Agent
// =============================================================================

/// A salesperson.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Agent {
    pub id: AgentId,
    pub name: String,
    pub email: EmailAddress,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Agent {
    /// Creates a new agent.
    #[must_use]
    pub fn new(id: AgentId, name: impl Into<String>, email: EmailAddress, now: Timestamp) -> Self {
        Self {
            id,
            name: name.into(),
            email,
            created_at: now,
            updated_at: now,
        }
    }

    /// Returns a copy with the name and email replaced.
    #[must_use]
    pub fn with_details(&self, name: impl Into<String>, email: EmailAddress, now: Timestamp) -> Self {
        Self {
            name: name.into(),
            email,
            updated_at: now,
            ..self.clone()
        }
    }

    /// Returns the identity fields exposed wherever an agent is referenced.
    #[must_use]
    pub fn summary(&self) -> AgentSummary {
        AgentSummary {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
        }
    }
}

/// The identity fields of an agent, used when resolving references from
/// leads and comments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentSummary {
    pub id: AgentId,
    pub name: String,
    pub email: EmailAddress,
}
