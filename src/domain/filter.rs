//! Equality filters and ordering for lead listings.
//!
//! [`LeadFilter::matches`] and [`LeadSort::apply`] define what a listing
//! returns. The in-memory backend uses them directly; the `PostgreSQL`
//! backend translates them into SQL with the same meaning.

use serde::{Deserialize, Serialize};

use super::{AgentId, Enumerated, Lead, LeadSource, LeadStatus, Priority};

/// Equality constraints on lead fields. `None` imposes no constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LeadFilter {
    pub sales_agent: Option<AgentId>,
    pub status: Option<LeadStatus>,
    pub source: Option<LeadSource>,
    pub priority: Option<Priority>,
}

impl LeadFilter {
    /// A filter that matches every lead.
    #[must_use]
    pub const fn all() -> Self {
        Self {
            sales_agent: None,
            status: None,
            source: None,
            priority: None,
        }
    }

    /// Returns `true` if `lead` satisfies every present constraint.
    #[must_use]
    pub fn matches(&self, lead: &Lead) -> bool {
        self.sales_agent.is_none_or(|agent| lead.sales_agent == agent)
            && self.status.is_none_or(|status| lead.status == status)
            && self.source.is_none_or(|source| lead.source == source)
            && self.priority.is_none_or(|priority| lead.priority == priority)
    }

    /// Returns `true` if no constraint is present.
    #[must_use]
    pub const fn is_unconstrained(&self) -> bool {
        self.sales_agent.is_none()
            && self.status.is_none()
            && self.source.is_none()
            && self.priority.is_none()
    }
}

/// The `sort` query value: `High` puts the slowest-to-close leads first,
/// `Low` the quickest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortOrder {
    High,
    Low,
}

impl Enumerated for SortOrder {
    const ALL: &'static [Self] = &[Self::High, Self::Low];

    fn as_str(self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Low => "Low",
        }
    }
}

/// Ordering applied to a lead listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LeadSort {
    /// Insertion order.
    #[default]
    Natural,
    /// `timeToClose` ascending.
    TimeToCloseAscending,
    /// `timeToClose` descending.
    TimeToCloseDescending,
}

impl LeadSort {
    #[must_use]
    pub const fn from_order(order: Option<SortOrder>) -> Self {
        match order {
            None => Self::Natural,
            Some(SortOrder::Low) => Self::TimeToCloseAscending,
            Some(SortOrder::High) => Self::TimeToCloseDescending,
        }
    }

    /// Sorts `leads` in place. The sort is stable, so ties keep the order
    /// they arrived in.
    pub fn apply(self, leads: &mut [Lead]) {
        match self {
            Self::Natural => {}
            Self::TimeToCloseAscending => {
                leads.sort_by(|left, right| left.time_to_close.total_cmp(&right.time_to_close));
            }
            Self::TimeToCloseDescending => {
                leads.sort_by(|left, right| right.time_to_close.total_cmp(&left.time_to_close));
            }
        }
    }
}
