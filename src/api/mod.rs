//! API module for HTTP handlers.
//!
//! This module contains route definitions and request/response handlers.

pub mod agents;
pub mod comments;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod leads;
pub mod reports;
pub mod routes;

pub use agents::{create_agent, delete_agent, list_agents, update_agent};
pub use comments::{add_comment, delete_comment, list_comments, update_comment};
pub use error::{ApiError, ApiErrorResponse, FieldError};
pub use handlers::{AppState, HealthResponse, health_check};
pub use leads::{create_lead, delete_lead, get_lead, list_leads, list_leads_by_agent, update_lead};
pub use reports::{
    closed_last_week_report, leads_by_agent_report, pipeline_report, status_distribution_report,
};
pub use routes::router;
