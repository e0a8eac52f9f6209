//! Domain layer: entities, the lead lifecycle rule, filters and report folds.
//!
//! Nothing in this module performs I/O. Functions that depend on the clock
//! take `now` as an argument.

pub mod agent;
pub mod comment;
pub mod filter;
pub mod lead;
pub mod report;
pub mod timestamp;

pub use agent::{Agent, AgentId, AgentSummary, EmailAddress};
pub use comment::{Comment, CommentId, sort_newest_first};
pub use filter::{LeadFilter, LeadSort, SortOrder};
pub use lead::{
    ClosedAtChange, Enumerated, Lead, LeadChangeSet, LeadChanges, LeadId, LeadSource, LeadStatus,
    NewLead, Priority, derive_closed_at,
};
pub use report::{
    AgentLeadTotals, LeadTally, StatusCount, closed_report_window, closed_within,
    join_agent_totals, pipeline_backlog, status_distribution, tally_by_agent,
};
pub use timestamp::Timestamp;
