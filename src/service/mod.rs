//! Service layer: input validation, query building and the operations the
//! HTTP handlers call.
//!
//! Services hold their repositories as `Arc<dyn ... + Send + Sync>` and are
//! cheap to clone into handler state.

pub mod agents;
pub mod comments;
pub mod error;
pub mod input;
pub mod leads;
pub mod query;
pub mod reports;
pub mod validation;

pub use agents::AgentService;
pub use comments::{CommentService, ResolvedComment};
pub use error::ServiceError;
pub use input::{AgentDraft, CommentDraft, CommentEdit, LeadDraft, LeadFilterParams};
pub use leads::{LeadListing, LeadService, ResolvedLead};
pub use query::{LeadQuery, QueryBuilder};
pub use reports::{PipelineSummary, ReportService};
