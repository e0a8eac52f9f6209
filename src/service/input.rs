//! Unvalidated request payloads.
//!
//! Every field is optional so that presence is checked by the validator,
//! which reports which field is missing. Enumerations and identifiers arrive
//! as raw strings for the same reason.

use serde::Deserialize;

/// Body of agent create and update requests.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentDraft {
    pub name: Option<String>,
    pub email: Option<String>,
}

/// Body of lead create and update requests.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadDraft {
    pub name: Option<String>,
    pub source: Option<String>,
    pub sales_agent: Option<String>,
    pub status: Option<String>,
    pub tags: Option<Vec<String>>,
    pub time_to_close: Option<f64>,
    pub priority: Option<String>,
}

/// Query parameters of lead listings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadFilterParams {
    pub sales_agent: Option<String>,
    pub status: Option<String>,
    pub source: Option<String>,
    pub priority: Option<String>,
    pub sort: Option<String>,
}

impl LeadFilterParams {
    /// Returns `true` if no parameter carries a value. Blank values count
    /// as absent.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        [
            &self.sales_agent,
            &self.status,
            &self.source,
            &self.priority,
            &self.sort,
        ]
        .into_iter()
        .all(|value| present(value.as_deref()).is_none())
    }
}

/// Body of a new comment.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentDraft {
    pub comment_text: Option<String>,
    pub author: Option<String>,
}

/// Body of a comment edit.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentEdit {
    pub comment_text: Option<String>,
}

/// Trims `value` and drops it if nothing is left.
pub(crate) fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|trimmed| !trimmed.is_empty())
}
