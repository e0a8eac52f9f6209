//! Comments left by agents on leads.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{AgentId, LeadId, Timestamp};

/// Unique identifier for a comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CommentId(Uuid);

impl CommentId {
    /// Creates a `CommentId` from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the inner UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// Generates a new time-ordered `CommentId` (UUID v7).
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

impl std::fmt::Display for CommentId {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// A note an agent attached to a lead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: CommentId,
    pub lead: LeadId,
    pub author: AgentId,
    pub comment_text: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Comment {
    #[must_use]
    pub fn new(
        id: CommentId,
        lead: LeadId,
        author: AgentId,
        comment_text: impl Into<String>,
        now: Timestamp,
    ) -> Self {
        Self {
            id,
            lead,
            author,
            comment_text: comment_text.into(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Returns a copy with the text replaced.
    #[must_use]
    pub fn with_text(&self, comment_text: impl Into<String>, now: Timestamp) -> Self {
        Self {
            comment_text: comment_text.into(),
            updated_at: now,
            ..self.clone()
        }
    }
}

/// Orders comments newest first. Ties fall back to the id so the order is
/// stable across backends.
pub fn sort_newest_first(comments: &mut [Comment]) {
    comments.sort_by(|left, right| {
        right
            .created_at
            .cmp(&left.created_at)
            .then_with(|| right.id.cmp(&left.id))
    });
}
