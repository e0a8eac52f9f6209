//! Agent handlers.

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};

use super::dto::{AgentDeletedResponse, AgentResponse, AgentUpdatedResponse};
use super::error::ApiErrorResponse;
use super::handlers::AppState;
use crate::service::AgentDraft;

/// `POST /agents`
///
/// # Errors
///
/// 400 for an invalid payload, 409 if the email is already registered.
pub async fn create_agent(
    State(state): State<AppState>,
    payload: Result<Json<AgentDraft>, JsonRejection>,
) -> Result<(StatusCode, Json<AgentResponse>), ApiErrorResponse> {
    let Json(draft) = payload?;
    let agent = state.agents.create(&draft).await?;
    Ok((StatusCode::CREATED, Json(AgentResponse::from(&agent))))
}

/// `GET /agents`
///
/// # Errors
///
/// 404 when no agent exists.
pub async fn list_agents(
    State(state): State<AppState>,
) -> Result<Json<Vec<AgentResponse>>, ApiErrorResponse> {
    let agents = state.agents.list().await?;
    Ok(Json(agents.iter().map(AgentResponse::from).collect()))
}

/// `POST /agents/{id}`
///
/// # Errors
///
/// 400, 404 or 409 as reported by the agent service.
pub async fn update_agent(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<AgentDraft>, JsonRejection>,
) -> Result<Json<AgentUpdatedResponse>, ApiErrorResponse> {
    let Json(draft) = payload?;
    let agent = state.agents.update(&id, &draft).await?;
    Ok(Json(AgentUpdatedResponse {
        message: "Agent updated successfully.",
        updated_agent: AgentResponse::from(&agent),
    }))
}

/// `DELETE /agents/{id}`
///
/// # Errors
///
/// 400 for a malformed id, 404 if absent.
pub async fn delete_agent(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<AgentDeletedResponse>, ApiErrorResponse> {
    let agent = state.agents.delete(&id).await?;
    Ok(Json(AgentDeletedResponse {
        message: "Agent deleted successfully.",
        deleted_agent: AgentResponse::from(&agent),
    }))
}
