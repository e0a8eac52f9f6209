//! Shared handler state and the health endpoint.

use axum::Json;
use serde::Serialize;

use crate::infrastructure::Repositories;
use crate::service::{AgentService, CommentService, LeadService, ReportService};

// =============================================================================
// Application State
// =============================================================================

/// Services shared by every handler.
///
/// Built once from the repositories returned by `RepositoryFactory::create()`.
/// Cloning is cheap; each service only holds `Arc`s.
#[derive(Clone)]
pub struct AppState {
    pub agents: AgentService,
    pub leads: LeadService,
    pub comments: CommentService,
    pub reports: ReportService,
}

impl AppState {
    /// Wires the services over `repositories`. The repositories stay owned by
    /// the caller so their connections can be closed on shutdown.
    #[must_use]
    pub fn from_repositories(repositories: &Repositories) -> Self {
        Self {
            agents: AgentService::new(repositories.agent_repository.clone()),
            leads: LeadService::new(
                repositories.lead_repository.clone(),
                repositories.agent_repository.clone(),
            ),
            comments: CommentService::new(
                repositories.comment_repository.clone(),
                repositories.lead_repository.clone(),
                repositories.agent_repository.clone(),
            ),
            reports: ReportService::new(
                repositories.lead_repository.clone(),
                repositories.agent_repository.clone(),
            ),
        }
    }
}

// =============================================================================
// GET /health Handler
// =============================================================================

/// Health check response.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// Health check endpoint.
///
/// ```json
/// { "status": "healthy", "version": "0.1.0" }
/// ```
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}
