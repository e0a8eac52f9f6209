//! Lead handlers.

use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
};

use super::dto::{DataEnvelope, LeadDeletedResponse, LeadRecordResponse, LeadResponse};
use super::error::ApiErrorResponse;
use super::handlers::AppState;
use crate::service::{LeadDraft, LeadFilterParams, LeadListing};

type ListResponse = Json<DataEnvelope<Vec<LeadResponse>>>;

fn listing_response(listing: &LeadListing) -> ListResponse {
    let data = LeadResponse::list(&listing.leads);
    Json(match listing.message {
        Some(message) => DataEnvelope::with_message(message, data),
        None => DataEnvelope::data(data),
    })
}

/// `POST /leads`
///
/// # Errors
///
/// 400 for an invalid payload, 404 if the sales agent does not exist.
pub async fn create_lead(
    State(state): State<AppState>,
    payload: Result<Json<LeadDraft>, JsonRejection>,
) -> Result<(StatusCode, Json<DataEnvelope<LeadResponse>>), ApiErrorResponse> {
    let Json(draft) = payload?;
    let created = state.leads.create(&draft).await?;
    Ok((
        StatusCode::CREATED,
        Json(DataEnvelope::with_message(
            "Lead created successfully.",
            LeadResponse::from(&created),
        )),
    ))
}

/// `GET /leads?salesAgent&status&source&priority&sort`
///
/// An empty result is a 200 with an explanatory message.
///
/// # Errors
///
/// 400 for an invalid parameter.
pub async fn list_leads(
    State(state): State<AppState>,
    params: Result<Query<LeadFilterParams>, QueryRejection>,
) -> Result<ListResponse, ApiErrorResponse> {
    let Query(params) = params?;
    let listing = state.leads.list(&params).await?;
    Ok(listing_response(&listing))
}

/// `GET /agents/leads/{id}?status&source&priority&sort`
///
/// # Errors
///
/// 400 for a malformed agent id or an invalid parameter.
pub async fn list_leads_by_agent(
    State(state): State<AppState>,
    Path(agent_id): Path<String>,
    params: Result<Query<LeadFilterParams>, QueryRejection>,
) -> Result<ListResponse, ApiErrorResponse> {
    let Query(params) = params?;
    let listing = state.leads.list_by_agent(&agent_id, &params).await?;
    Ok(listing_response(&listing))
}

/// `GET /leads/{id}`
///
/// # Errors
///
/// 400 for a malformed id, 404 if absent.
pub async fn get_lead(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DataEnvelope<LeadResponse>>, ApiErrorResponse> {
    let lead = state.leads.get(&id).await?;
    Ok(Json(DataEnvelope::data(LeadResponse::from(&lead))))
}

/// `POST /leads/{id}`
///
/// Partial update; omitted fields keep their stored values.
///
/// # Errors
///
/// 400 for a malformed id or invalid payload, 404 if the lead or a newly
/// assigned agent does not exist.
pub async fn update_lead(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<LeadDraft>, JsonRejection>,
) -> Result<Json<LeadResponse>, ApiErrorResponse> {
    let Json(draft) = payload?;
    let updated = state.leads.update(&id, &draft).await?;
    Ok(Json(LeadResponse::from(&updated)))
}

/// `DELETE /leads/{id}`
///
/// # Errors
///
/// 400 for a malformed id, 404 if absent.
pub async fn delete_lead(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<LeadDeletedResponse>, ApiErrorResponse> {
    let lead = state.leads.delete(&id).await?;
    Ok(Json(LeadDeletedResponse {
        message: "Lead deleted successfully.",
        data: LeadRecordResponse::from(&lead),
    }))
}
