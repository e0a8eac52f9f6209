//! Comment handlers.

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};

use super::dto::{CommentRecordResponse, CommentResponse, DataEnvelope};
use super::error::ApiErrorResponse;
use super::handlers::AppState;
use crate::service::{CommentDraft, CommentEdit};

/// `POST /comments/{leadId}`
///
/// # Errors
///
/// 400 for malformed ids or empty text, 404 if the author or lead is missing.
pub async fn add_comment(
    State(state): State<AppState>,
    Path(lead_id): Path<String>,
    payload: Result<Json<CommentDraft>, JsonRejection>,
) -> Result<(StatusCode, Json<DataEnvelope<CommentResponse>>), ApiErrorResponse> {
    let Json(draft) = payload?;
    let comment = state.comments.add(&lead_id, &draft).await?;
    Ok((
        StatusCode::CREATED,
        Json(DataEnvelope::with_message(
            "Comment added successfully.",
            CommentResponse::from(&comment),
        )),
    ))
}

/// `GET /leads/comments/{leadId}`
///
/// # Errors
///
/// 400 for a malformed id, 404 if the lead is missing or has no comments.
pub async fn list_comments(
    State(state): State<AppState>,
    Path(lead_id): Path<String>,
) -> Result<Json<DataEnvelope<Vec<CommentResponse>>>, ApiErrorResponse> {
    let comments = state.comments.list_for_lead(&lead_id).await?;
    Ok(Json(DataEnvelope::with_message(
        "Comments fetched successfully.",
        comments.iter().map(CommentResponse::from).collect(),
    )))
}

/// `POST /comments/update/{id}`
///
/// # Errors
///
/// 400 for a malformed id or empty text, 404 if absent.
pub async fn update_comment(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<CommentEdit>, JsonRejection>,
) -> Result<Json<DataEnvelope<CommentResponse>>, ApiErrorResponse> {
    let Json(edit) = payload?;
    let comment = state.comments.update_text(&id, &edit).await?;
    Ok(Json(DataEnvelope::with_message(
        "Comment updated successfully.",
        CommentResponse::from(&comment),
    )))
}

/// `DELETE /comments/{id}`
///
/// # Errors
///
/// 400 for a malformed id, 404 if absent.
pub async fn delete_comment(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DataEnvelope<CommentRecordResponse>>, ApiErrorResponse> {
    let comment = state.comments.delete(&id).await?;
    Ok(Json(DataEnvelope::with_message(
        "Comment deleted successfully.",
        CommentRecordResponse::from(&comment),
    )))
}
