//! Route table.

use axum::Router;
use axum::routing::{get, post};

use super::agents::{create_agent, delete_agent, list_agents, update_agent};
use super::comments::{add_comment, delete_comment, list_comments, update_comment};
use super::handlers::{AppState, health_check};
use super::leads::{
    create_lead, delete_lead, get_lead, list_leads, list_leads_by_agent, update_lead,
};
use super::reports::{
    closed_last_week_report, leads_by_agent_report, pipeline_report, status_distribution_report,
};

/// Builds the application router over `state`. Middleware layers are added
/// by the caller.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        // Agents
        .route("/agents", post(create_agent).get(list_agents))
        .route("/agents/{id}", post(update_agent).delete(delete_agent))
        .route("/agents/leads/{id}", get(list_leads_by_agent))
        // Leads
        .route("/leads", post(create_lead).get(list_leads))
        .route(
            "/leads/{id}",
            get(get_lead).post(update_lead).delete(delete_lead),
        )
        // Comments
        .route("/comments/{lead_id}", post(add_comment).delete(delete_comment))
        .route("/comments/update/{id}", post(update_comment))
        .route("/leads/comments/{lead_id}", get(list_comments))
        // Reports
        .route("/report/pipeline", get(pipeline_report))
        .route("/report/last-week", get(closed_last_week_report))
        .route("/report/status-distribution", get(status_distribution_report))
        .route("/leads-by-agent", get(leads_by_agent_report))
        .with_state(state)
}
