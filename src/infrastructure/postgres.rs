//! `PostgreSQL` repository implementations.
//!
//! Entities are stored as JSONB documents next to the few columns that need
//! indexing. Lead partial updates are a single `data || patch` statement, so
//! the resolved `closedAt` lands together with the status in one write.
//!
//! # Table Schema
//!
//! ```sql
//! CREATE TABLE agents (
//!     id UUID PRIMARY KEY,
//!     email TEXT NOT NULL UNIQUE,
//!     data JSONB NOT NULL,
//!     created_at TIMESTAMPTZ NOT NULL
//! );
//!
//! CREATE TABLE leads (
//!     id UUID PRIMARY KEY,
//!     data JSONB NOT NULL,
//!     created_at TIMESTAMPTZ NOT NULL
//! );
//!
//! CREATE TABLE comments (
//!     id UUID PRIMARY KEY,
//!     lead_id UUID NOT NULL,
//!     data JSONB NOT NULL,
//!     created_at TIMESTAMPTZ NOT NULL
//! );
//! CREATE INDEX idx_comments_lead_id ON comments(lead_id);
//! ```

use futures::FutureExt;
use sqlx::PgPool;

use crate::domain::{
    Agent, AgentId, Comment, CommentId, EmailAddress, Enumerated, Lead, LeadChangeSet,
    LeadFilter, LeadId, LeadSort, Timestamp,
};
use crate::infrastructure::{
    AgentRepository, CommentRepository, LeadRepository, RepositoryError, RepositoryFuture,
};

const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS agents (\
        id UUID PRIMARY KEY, \
        email TEXT NOT NULL UNIQUE, \
        data JSONB NOT NULL, \
        created_at TIMESTAMPTZ NOT NULL)",
    "CREATE TABLE IF NOT EXISTS leads (\
        id UUID PRIMARY KEY, \
        data JSONB NOT NULL, \
        created_at TIMESTAMPTZ NOT NULL)",
    "CREATE TABLE IF NOT EXISTS comments (\
        id UUID PRIMARY KEY, \
        lead_id UUID NOT NULL, \
        data JSONB NOT NULL, \
        created_at TIMESTAMPTZ NOT NULL)",
    "CREATE INDEX IF NOT EXISTS idx_comments_lead_id ON comments(lead_id)",
];

/// Creates the tables if they do not exist yet.
///
/// # Errors
///
/// Returns `RepositoryError::DatabaseError` if a statement fails.
pub async fn migrate(pool: &PgPool) -> Result<(), RepositoryError> {
    for statement in SCHEMA {
        sqlx::query(statement)
            .execute(pool)
            .await
            .map_err(database_error)?;
    }
    Ok(())
}

// =============================================================================
// Helpers
// =============================================================================

fn database_error(error: sqlx::Error) -> RepositoryError {
    if let sqlx::Error::Database(database) = &error
        && database.is_unique_violation()
    {
        return RepositoryError::Conflict(database.message().to_string());
    }
    RepositoryError::DatabaseError(error.to_string())
}

fn decode_rows<T: serde::de::DeserializeOwned>(
    rows: Vec<(serde_json::Value,)>,
) -> Result<Vec<T>, RepositoryError> {
    rows.into_iter()
        .map(|(data,)| serde_json::from_value(data).map_err(RepositoryError::from))
        .collect()
}

fn decode_row<T: serde::de::DeserializeOwned>(
    row: Option<(serde_json::Value,)>,
) -> Result<Option<T>, RepositoryError> {
    row.map(|(data,)| serde_json::from_value(data))
        .transpose()
        .map_err(RepositoryError::from)
}

/// Builds the `WHERE` conditions for a lead filter, with the values to bind
/// in placeholder order.
fn lead_filter_conditions(filter: &LeadFilter) -> (String, Vec<String>) {
    let mut conditions = vec!["1=1".to_string()];
    let mut values = Vec::new();

    let mut push = |column: &str, value: String| {
        values.push(value);
        conditions.push(format!("data->>'{column}' = ${}", values.len()));
    };

    if let Some(agent) = filter.sales_agent {
        push("salesAgent", agent.to_string());
    }
    if let Some(status) = filter.status {
        push("status", status.as_str().to_string());
    }
    if let Some(source) = filter.source {
        push("source", source.as_str().to_string());
    }
    if let Some(priority) = filter.priority {
        push("priority", priority.as_str().to_string());
    }

    (conditions.join(" AND "), values)
}

const fn lead_order_clause(sort: LeadSort) -> &'static str {
    match sort {
        LeadSort::Natural => "created_at ASC, id ASC",
        LeadSort::TimeToCloseAscending => {
            "(data->>'timeToClose')::double precision ASC, created_at ASC, id ASC"
        }
        LeadSort::TimeToCloseDescending => {
            "(data->>'timeToClose')::double precision DESC, created_at ASC, id ASC"
        }
    }
}

// =============================================================================
// PostgreSQL Agent Repository
// =============================================================================

/// `PostgreSQL` implementation of `AgentRepository`.
#[derive(Debug, Clone)]
pub struct PostgresAgentRepository {
    pool: PgPool,
}

impl PostgresAgentRepository {
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl AgentRepository for PostgresAgentRepository {
    fn find_by_id(&self, id: &AgentId) -> RepositoryFuture<Option<Agent>> {
        let pool = self.pool.clone();
        let id = *id;
        async move {
            let row: Option<(serde_json::Value,)> =
                sqlx::query_as("SELECT data FROM agents WHERE id = $1")
                    .bind(id.as_uuid())
                    .fetch_optional(&pool)
                    .await
                    .map_err(database_error)?;
            decode_row(row)
        }
        .boxed()
    }

    fn find_by_email(&self, email: &EmailAddress) -> RepositoryFuture<Option<Agent>> {
        let pool = self.pool.clone();
        let email = email.clone();
        async move {
            let row: Option<(serde_json::Value,)> =
                sqlx::query_as("SELECT data FROM agents WHERE email = $1")
                    .bind(email.as_str())
                    .fetch_optional(&pool)
                    .await
                    .map_err(database_error)?;
            decode_row(row)
        }
        .boxed()
    }

    fn find_by_ids(&self, ids: &[AgentId]) -> RepositoryFuture<Vec<Agent>> {
        let pool = self.pool.clone();
        let ids: Vec<uuid::Uuid> = ids.iter().map(|id| *id.as_uuid()).collect();
        async move {
            if ids.is_empty() {
                return Ok(Vec::new());
            }
            let rows: Vec<(serde_json::Value,)> = sqlx::query_as(
                "SELECT data FROM agents WHERE id = ANY($1) ORDER BY created_at ASC, id ASC",
            )
            .bind(&ids)
            .fetch_all(&pool)
            .await
            .map_err(database_error)?;
            decode_rows(rows)
        }
        .boxed()
    }

    fn list(&self) -> RepositoryFuture<Vec<Agent>> {
        let pool = self.pool.clone();
        async move {
            let rows: Vec<(serde_json::Value,)> =
                sqlx::query_as("SELECT data FROM agents ORDER BY created_at ASC, id ASC")
                    .fetch_all(&pool)
                    .await
                    .map_err(database_error)?;
            decode_rows(rows)
        }
        .boxed()
    }

    fn save(&self, agent: &Agent) -> RepositoryFuture<()> {
        let pool = self.pool.clone();
        let agent = agent.clone();
        async move {
            let data = serde_json::to_value(&agent)?;
            sqlx::query(
                "INSERT INTO agents (id, email, data, created_at) VALUES ($1, $2, $3, $4) \
                 ON CONFLICT (id) DO UPDATE SET email = EXCLUDED.email, data = EXCLUDED.data",
            )
            .bind(agent.id.as_uuid())
            .bind(agent.email.as_str())
            .bind(&data)
            .bind(agent.created_at.as_datetime())
            .execute(&pool)
            .await
            .map_err(database_error)?;
            Ok(())
        }
        .boxed()
    }

    fn delete(&self, id: &AgentId) -> RepositoryFuture<Option<Agent>> {
        let pool = self.pool.clone();
        let id = *id;
        async move {
            let row: Option<(serde_json::Value,)> =
                sqlx::query_as("DELETE FROM agents WHERE id = $1 RETURNING data")
                    .bind(id.as_uuid())
                    .fetch_optional(&pool)
                    .await
                    .map_err(database_error)?;
            decode_row(row)
        }
        .boxed()
    }
}

// =============================================================================
// PostgreSQL Lead Repository
// =============================================================================

/// `PostgreSQL` implementation of `LeadRepository`.
#[derive(Debug, Clone)]
pub struct PostgresLeadRepository {
    pool: PgPool,
}

impl PostgresLeadRepository {
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl LeadRepository for PostgresLeadRepository {
    fn insert(&self, lead: &Lead) -> RepositoryFuture<()> {
        let pool = self.pool.clone();
        let lead = lead.clone();
        async move {
            let data = serde_json::to_value(&lead)?;
            sqlx::query("INSERT INTO leads (id, data, created_at) VALUES ($1, $2, $3)")
                .bind(lead.id.as_uuid())
                .bind(&data)
                .bind(lead.created_at.as_datetime())
                .execute(&pool)
                .await
                .map_err(database_error)?;
            Ok(())
        }
        .boxed()
    }

    fn find_by_id(&self, id: &LeadId) -> RepositoryFuture<Option<Lead>> {
        let pool = self.pool.clone();
        let id = *id;
        async move {
            let row: Option<(serde_json::Value,)> =
                sqlx::query_as("SELECT data FROM leads WHERE id = $1")
                    .bind(id.as_uuid())
                    .fetch_optional(&pool)
                    .await
                    .map_err(database_error)?;
            decode_row(row)
        }
        .boxed()
    }

    fn find(&self, filter: &LeadFilter, sort: LeadSort) -> RepositoryFuture<Vec<Lead>> {
        let pool = self.pool.clone();
        let (where_clause, values) = lead_filter_conditions(filter);
        let sql = format!(
            "SELECT data FROM leads WHERE {where_clause} ORDER BY {}",
            lead_order_clause(sort)
        );
        async move {
            let mut query = sqlx::query_as::<_, (serde_json::Value,)>(&sql);
            for value in &values {
                query = query.bind(value);
            }
            let rows = query.fetch_all(&pool).await.map_err(database_error)?;
            decode_rows(rows)
        }
        .boxed()
    }

    fn update(&self, id: &LeadId, change_set: &LeadChangeSet) -> RepositoryFuture<Option<Lead>> {
        let pool = self.pool.clone();
        let id = *id;
        let patch = change_set.to_patch();
        async move {
            let patch = patch?;
            let row: Option<(serde_json::Value,)> =
                sqlx::query_as("UPDATE leads SET data = data || $2 WHERE id = $1 RETURNING data")
                    .bind(id.as_uuid())
                    .bind(&patch)
                    .fetch_optional(&pool)
                    .await
                    .map_err(database_error)?;
            decode_row(row)
        }
        .boxed()
    }

    fn delete(&self, id: &LeadId) -> RepositoryFuture<Option<Lead>> {
        let pool = self.pool.clone();
        let id = *id;
        async move {
            let row: Option<(serde_json::Value,)> =
                sqlx::query_as("DELETE FROM leads WHERE id = $1 RETURNING data")
                    .bind(id.as_uuid())
                    .fetch_optional(&pool)
                    .await
                    .map_err(database_error)?;
            decode_row(row)
        }
        .boxed()
    }
}

// =============================================================================
// PostgreSQL Comment Repository
// =============================================================================

/// `PostgreSQL` implementation of `CommentRepository`.
#[derive(Debug, Clone)]
pub struct PostgresCommentRepository {
    pool: PgPool,
}

impl PostgresCommentRepository {
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl CommentRepository for PostgresCommentRepository {
    fn insert(&self, comment: &Comment) -> RepositoryFuture<()> {
        let pool = self.pool.clone();
        let comment = comment.clone();
        async move {
            let data = serde_json::to_value(&comment)?;
            sqlx::query(
                "INSERT INTO comments (id, lead_id, data, created_at) VALUES ($1, $2, $3, $4)",
            )
            .bind(comment.id.as_uuid())
            .bind(comment.lead.as_uuid())
            .bind(&data)
            .bind(comment.created_at.as_datetime())
            .execute(&pool)
            .await
            .map_err(database_error)?;
            Ok(())
        }
        .boxed()
    }

    fn find_by_id(&self, id: &CommentId) -> RepositoryFuture<Option<Comment>> {
        let pool = self.pool.clone();
        let id = *id;
        async move {
            let row: Option<(serde_json::Value,)> =
                sqlx::query_as("SELECT data FROM comments WHERE id = $1")
                    .bind(id.as_uuid())
                    .fetch_optional(&pool)
                    .await
                    .map_err(database_error)?;
            decode_row(row)
        }
        .boxed()
    }

    fn find_by_lead(&self, lead: &LeadId) -> RepositoryFuture<Vec<Comment>> {
        let pool = self.pool.clone();
        let lead = *lead;
        async move {
            let rows: Vec<(serde_json::Value,)> = sqlx::query_as(
                "SELECT data FROM comments WHERE lead_id = $1 ORDER BY created_at DESC, id DESC",
            )
            .bind(lead.as_uuid())
            .fetch_all(&pool)
            .await
            .map_err(database_error)?;
            decode_rows(rows)
        }
        .boxed()
    }

    fn update_text(
        &self,
        id: &CommentId,
        comment_text: &str,
        now: Timestamp,
    ) -> RepositoryFuture<Option<Comment>> {
        let pool = self.pool.clone();
        let id = *id;
        let patch = serde_json::json!({
            "commentText": comment_text,
            "updatedAt": now,
        });
        async move {
            let row: Option<(serde_json::Value,)> = sqlx::query_as(
                "UPDATE comments SET data = data || $2 WHERE id = $1 RETURNING data",
            )
            .bind(id.as_uuid())
            .bind(&patch)
            .fetch_optional(&pool)
            .await
            .map_err(database_error)?;
            decode_row(row)
        }
        .boxed()
    }

    fn delete(&self, id: &CommentId) -> RepositoryFuture<Option<Comment>> {
        let pool = self.pool.clone();
        let id = *id;
        async move {
            let row: Option<(serde_json::Value,)> =
                sqlx::query_as("DELETE FROM comments WHERE id = $1 RETURNING data")
                    .bind(id.as_uuid())
                    .fetch_optional(&pool)
                    .await
                    .map_err(database_error)?;
            decode_row(row)
        }
        .boxed()
    }
}

// =============================================================================
// Tests
// =============================================================================
