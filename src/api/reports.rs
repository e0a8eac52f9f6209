//! Report handlers.

use axum::{Json, extract::State};

use super::dto::{
    AgentTotalsResponse, DataEnvelope, LeadResponse, PipelineResponse, StatusCountResponse,
};
use super::error::ApiErrorResponse;
use super::handlers::AppState;
use crate::domain::Timestamp;

/// `GET /report/pipeline`
///
/// Zero open leads is a 200 carrying `totalLeadsInPipeline: 0`.
///
/// # Errors
///
/// 500 on storage failure.
pub async fn pipeline_report(
    State(state): State<AppState>,
) -> Result<Json<DataEnvelope<PipelineResponse>>, ApiErrorResponse> {
    let summary = state.reports.pipeline().await?;
    let message = summary
        .message
        .unwrap_or("Total leads in pipeline fetched successfully.");
    Ok(Json(DataEnvelope::with_message(
        message,
        PipelineResponse::from(&summary),
    )))
}

/// `GET /report/last-week`
///
/// # Errors
///
/// 404 when no lead closed in the last seven days.
pub async fn closed_last_week_report(
    State(state): State<AppState>,
) -> Result<Json<DataEnvelope<Vec<LeadResponse>>>, ApiErrorResponse> {
    let leads = state.reports.closed_last_week(Timestamp::now()).await?;
    Ok(Json(DataEnvelope::with_message(
        "Closed leads from last week fetched successfully.",
        LeadResponse::list(&leads),
    )))
}

/// `GET /leads-by-agent`
///
/// # Errors
///
/// 404 when no existing agent has leads.
pub async fn leads_by_agent_report(
    State(state): State<AppState>,
) -> Result<Json<DataEnvelope<Vec<AgentTotalsResponse>>>, ApiErrorResponse> {
    let totals = state.reports.leads_by_agent().await?;
    Ok(Json(DataEnvelope::with_message(
        "Leads by agent fetched successfully.",
        totals.iter().map(AgentTotalsResponse::from).collect(),
    )))
}

/// `GET /report/status-distribution`
///
/// # Errors
///
/// 404 when there are no leads.
pub async fn status_distribution_report(
    State(state): State<AppState>,
) -> Result<Json<DataEnvelope<Vec<StatusCountResponse>>>, ApiErrorResponse> {
    let distribution = state.reports.status_distribution().await?;
    Ok(Json(DataEnvelope::with_message(
        "Lead status distribution fetched successfully.",
        distribution,
    )))
}
