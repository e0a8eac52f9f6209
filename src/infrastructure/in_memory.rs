//! In-memory repository implementations.
//!
//! Records live in `BTreeMap`s keyed by their UUID v7 ids, so iteration order
//! is insertion order. Each map sits behind an `Arc<RwLock<...>>`; every
//! mutating method takes the write lock once and does all of its work inside
//! it.

use std::collections::BTreeMap;
use std::sync::Arc;

use futures::FutureExt;
use tokio::sync::RwLock;

use crate::domain::{
    Agent, AgentId, Comment, CommentId, EmailAddress, Lead, LeadChangeSet, LeadFilter, LeadId,
    LeadSort, Timestamp, sort_newest_first,
};
use crate::infrastructure::{
    AgentRepository, CommentRepository, LeadRepository, RepositoryError, RepositoryFuture,
};

// =============================================================================
// In-Memory Agent Repository
// =============================================================================

/// In-memory implementation of `AgentRepository`.
#[derive(Debug, Clone, Default)]
pub struct InMemoryAgentRepository {
    agents: Arc<RwLock<BTreeMap<AgentId, Agent>>>,
}

impl InMemoryAgentRepository {
    /// Creates a new empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[allow(clippy::significant_drop_tightening)]
impl AgentRepository for InMemoryAgentRepository {
    fn find_by_id(&self, id: &AgentId) -> RepositoryFuture<Option<Agent>> {
        let agents = Arc::clone(&self.agents);
        let id = *id;
        async move { Ok(agents.read().await.get(&id).cloned()) }.boxed()
    }

    fn find_by_email(&self, email: &EmailAddress) -> RepositoryFuture<Option<Agent>> {
        let agents = Arc::clone(&self.agents);
        let email = email.clone();
        async move {
            let guard = agents.read().await;
            Ok(guard.values().find(|agent| agent.email == email).cloned())
        }
        .boxed()
    }

    fn find_by_ids(&self, ids: &[AgentId]) -> RepositoryFuture<Vec<Agent>> {
        let agents = Arc::clone(&self.agents);
        let ids = ids.to_vec();
        async move {
            let guard = agents.read().await;
            Ok(ids.iter().filter_map(|id| guard.get(id).cloned()).collect())
        }
        .boxed()
    }

    fn list(&self) -> RepositoryFuture<Vec<Agent>> {
        let agents = Arc::clone(&self.agents);
        async move { Ok(agents.read().await.values().cloned().collect()) }.boxed()
    }

    fn save(&self, agent: &Agent) -> RepositoryFuture<()> {
        let agents = Arc::clone(&self.agents);
        let agent = agent.clone();
        async move {
            let mut guard = agents.write().await;
            let taken = guard
                .values()
                .any(|existing| existing.email == agent.email && existing.id != agent.id);
            if taken {
                return Err(RepositoryError::Conflict(format!(
                    "email '{}' is already registered",
                    agent.email
                )));
            }
            guard.insert(agent.id, agent);
            Ok(())
        }
        .boxed()
    }

    fn delete(&self, id: &AgentId) -> RepositoryFuture<Option<Agent>> {
        let agents = Arc::clone(&self.agents);
        let id = *id;
        async move { Ok(agents.write().await.remove(&id)) }.boxed()
    }
}

// =============================================================================
// In-Memory Lead Repository
// =============================================================================

/// In-memory implementation of `LeadRepository`.
#[derive(Debug, Clone, Default)]
pub struct InMemoryLeadRepository {
    leads: Arc<RwLock<BTreeMap<LeadId, Lead>>>,
}

impl InMemoryLeadRepository {
    /// Creates a new empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[allow(clippy::significant_drop_tightening)]
impl LeadRepository for InMemoryLeadRepository {
    fn insert(&self, lead: &Lead) -> RepositoryFuture<()> {
        let leads = Arc::clone(&self.leads);
        let lead = lead.clone();
        async move {
            let mut guard = leads.write().await;
            if guard.contains_key(&lead.id) {
                return Err(RepositoryError::Conflict(format!(
                    "lead '{}' already exists",
                    lead.id
                )));
            }
            guard.insert(lead.id, lead);
            Ok(())
        }
        .boxed()
    }

    fn find_by_id(&self, id: &LeadId) -> RepositoryFuture<Option<Lead>> {
        let leads = Arc::clone(&self.leads);
        let id = *id;
        async move { Ok(leads.read().await.get(&id).cloned()) }.boxed()
    }

    fn find(&self, filter: &LeadFilter, sort: LeadSort) -> RepositoryFuture<Vec<Lead>> {
        let leads = Arc::clone(&self.leads);
        let filter = *filter;
        async move {
            let mut matching: Vec<Lead> = leads
                .read()
                .await
                .values()
                .filter(|lead| filter.matches(lead))
                .cloned()
                .collect();
            sort.apply(&mut matching);
            Ok(matching)
        }
        .boxed()
    }

    fn update(&self, id: &LeadId, change_set: &LeadChangeSet) -> RepositoryFuture<Option<Lead>> {
        let leads = Arc::clone(&self.leads);
        let id = *id;
        let change_set = change_set.clone();
        async move {
            let mut guard = leads.write().await;
            Ok(guard.get_mut(&id).map(|stored| {
                *stored = change_set.apply_to(stored);
                stored.clone()
            }))
        }
        .boxed()
    }

    fn delete(&self, id: &LeadId) -> RepositoryFuture<Option<Lead>> {
        let leads = Arc::clone(&self.leads);
        let id = *id;
        async move { Ok(leads.write().await.remove(&id)) }.boxed()
    }
}

// =============================================================================
// In-Memory Comment Repository
// =============================================================================

/// In-memory implementation of `CommentRepository`.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCommentRepository {
    comments: Arc<RwLock<BTreeMap<CommentId, Comment>>>,
}

impl InMemoryCommentRepository {
    /// Creates a new empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[allow(clippy::significant_drop_tightening)]
impl CommentRepository for InMemoryCommentRepository {
    fn insert(&self, comment: &Comment) -> RepositoryFuture<()> {
        let comments = Arc::clone(&self.comments);
        let comment = comment.clone();
        async move {
            comments.write().await.insert(comment.id, comment);
            Ok(())
        }
        .boxed()
    }

    fn find_by_id(&self, id: &CommentId) -> RepositoryFuture<Option<Comment>> {
        let comments = Arc::clone(&self.comments);
        let id = *id;
        async move { Ok(comments.read().await.get(&id).cloned()) }.boxed()
    }

    fn find_by_lead(&self, lead: &LeadId) -> RepositoryFuture<Vec<Comment>> {
        let comments = Arc::clone(&self.comments);
        let lead = *lead;
        async move {
            let mut found: Vec<Comment> = comments
                .read()
                .await
                .values()
                .filter(|comment| comment.lead == lead)
                .cloned()
                .collect();
            sort_newest_first(&mut found);
            Ok(found)
        }
        .boxed()
    }

    fn update_text(
        &self,
        id: &CommentId,
        comment_text: &str,
        now: Timestamp,
    ) -> RepositoryFuture<Option<Comment>> {
        let comments = Arc::clone(&self.comments);
        let id = *id;
        let comment_text = comment_text.to_string();
        async move {
            let mut guard = comments.write().await;
            Ok(guard.get_mut(&id).map(|stored| {
                *stored = stored.with_text(comment_text, now);
                stored.clone()
            }))
        }
        .boxed()
    }

    fn delete(&self, id: &CommentId) -> RepositoryFuture<Option<Comment>> {
        let comments = Arc::clone(&self.comments);
        let id = *id;
        async move { Ok(comments.write().await.remove(&id)) }.boxed()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        LeadChanges, LeadSource, LeadStatus, NewLead, Priority, SortOrder,
    };
    use rstest::rstest;

    fn agent(name: &str, email: &str) -> Agent {
        Agent::new(
            AgentId::generate(),
            name,
            EmailAddress::parse(email).unwrap(),
            Timestamp::now(),
        )
    }

    fn lead(agent: AgentId, status: LeadStatus, time_to_close: f64) -> Lead {
        Lead::new(
            LeadId::generate(),
            NewLead {
                name: "Acme".to_string(),
                source: LeadSource::Website,
                sales_agent: agent,
                status,
                tags: vec!["b2b".to_string()],
                time_to_close,
                priority: Priority::High,
            },
            Timestamp::now(),
        )
    }

    // -------------------------------------------------------------------------
    // Agents
    // -------------------------------------------------------------------------

    #[rstest]
    #[tokio::test]
    async fn test_agent_save_and_find() {
        let repository = InMemoryAgentRepository::new();
        let ana = agent("Ana", "ana@x.com");

        repository.save(&ana).await.unwrap();

        assert_eq!(repository.find_by_id(&ana.id).await.unwrap(), Some(ana.clone()));
        assert_eq!(
            repository.find_by_email(&ana.email).await.unwrap(),
            Some(ana.clone())
        );
        assert_eq!(repository.list().await.unwrap(), vec![ana]);
    }

    #[rstest]
    #[tokio::test]
    async fn test_agent_duplicate_email_conflicts() {
        let repository = InMemoryAgentRepository::new();
        repository.save(&agent("Ana", "ana@x.com")).await.unwrap();

        let result = repository.save(&agent("Other Ana", "ANA@x.com")).await;

        assert!(matches!(result, Err(RepositoryError::Conflict(_))));
    }

    #[rstest]
    #[tokio::test]
    async fn test_agent_resave_with_same_email_is_allowed() {
        let repository = InMemoryAgentRepository::new();
        let ana = agent("Ana", "ana@x.com");
        repository.save(&ana).await.unwrap();

        let renamed = ana.with_details("Ana B", ana.email.clone(), Timestamp::now());
        repository.save(&renamed).await.unwrap();

        assert_eq!(repository.list().await.unwrap(), vec![renamed]);
    }

    #[rstest]
    #[tokio::test]
    async fn test_agent_find_by_ids_skips_unknown() {
        let repository = InMemoryAgentRepository::new();
        let ana = agent("Ana", "ana@x.com");
        repository.save(&ana).await.unwrap();

        let found = repository
            .find_by_ids(&[ana.id, AgentId::generate()])
            .await
            .unwrap();

        assert_eq!(found, vec![ana]);
    }

    #[rstest]
    #[tokio::test]
    async fn test_agent_delete_returns_removed_record() {
        let repository = InMemoryAgentRepository::new();
        let ana = agent("Ana", "ana@x.com");
        repository.save(&ana).await.unwrap();

        assert_eq!(repository.delete(&ana.id).await.unwrap(), Some(ana.clone()));
        assert_eq!(repository.delete(&ana.id).await.unwrap(), None);
    }

    // -------------------------------------------------------------------------
    // Leads
    // -------------------------------------------------------------------------

    #[rstest]
    #[tokio::test]
    async fn test_lead_find_filters_and_sorts() {
        let repository = InMemoryLeadRepository::new();
        let agent_id = AgentId::generate();
        let slow = lead(agent_id, LeadStatus::New, 30.0);
        let fast = lead(agent_id, LeadStatus::New, 3.0);
        let closed = lead(agent_id, LeadStatus::Closed, 10.0);
        for entry in [&slow, &fast, &closed] {
            repository.insert(entry).await.unwrap();
        }

        let filter = LeadFilter {
            status: Some(LeadStatus::New),
            ..LeadFilter::default()
        };
        let ascending = repository
            .find(&filter, LeadSort::from_order(Some(SortOrder::Low)))
            .await
            .unwrap();
        let natural = repository.find(&LeadFilter::all(), LeadSort::Natural).await.unwrap();

        assert_eq!(
            ascending.iter().map(|l| l.id).collect::<Vec<_>>(),
            vec![fast.id, slow.id]
        );
        assert_eq!(
            natural.iter().map(|l| l.id).collect::<Vec<_>>(),
            vec![slow.id, fast.id, closed.id]
        );
    }

    #[rstest]
    #[tokio::test]
    async fn test_lead_update_applies_change_set() {
        let repository = InMemoryLeadRepository::new();
        let stored = lead(AgentId::generate(), LeadStatus::New, 5.0);
        repository.insert(&stored).await.unwrap();

        let now = Timestamp::now();
        let change_set = LeadChangeSet::from_changes(
            LeadChanges {
                status: Some(LeadStatus::Closed),
                ..LeadChanges::default()
            },
            now,
        );
        let updated = repository.update(&stored.id, &change_set).await.unwrap().unwrap();

        assert_eq!(updated.status, LeadStatus::Closed);
        assert_eq!(updated.closed_at, Some(now));
        assert_eq!(updated.tags, stored.tags);
        assert_eq!(repository.find_by_id(&stored.id).await.unwrap(), Some(updated));
    }

    #[rstest]
    #[tokio::test]
    async fn test_lead_update_missing_returns_none() {
        let repository = InMemoryLeadRepository::new();
        let change_set = LeadChangeSet::from_changes(
            LeadChanges {
                name: Some("x".to_string()),
                ..LeadChanges::default()
            },
            Timestamp::now(),
        );

        assert_eq!(
            repository.update(&LeadId::generate(), &change_set).await.unwrap(),
            None
        );
    }

    // -------------------------------------------------------------------------
    // Comments
    // -------------------------------------------------------------------------

    #[rstest]
    #[tokio::test]
    async fn test_comments_by_lead_newest_first() {
        let repository = InMemoryCommentRepository::new();
        let lead_id = LeadId::generate();
        let author = AgentId::generate();
        let older = Comment::new(CommentId::generate(), lead_id, author, "older", Timestamp::now());
        let newer = Comment::new(CommentId::generate(), lead_id, author, "newer", Timestamp::now());
        let elsewhere = Comment::new(
            CommentId::generate(),
            LeadId::generate(),
            author,
            "elsewhere",
            Timestamp::now(),
        );
        for comment in [&older, &newer, &elsewhere] {
            repository.insert(comment).await.unwrap();
        }

        let found = repository.find_by_lead(&lead_id).await.unwrap();

        assert_eq!(
            found.iter().map(|c| c.comment_text.as_str()).collect::<Vec<_>>(),
            vec!["newer", "older"]
        );
    }

    #[rstest]
    #[tokio::test]
    async fn test_comment_update_text() {
        let repository = InMemoryCommentRepository::new();
        let comment = Comment::new(
            CommentId::generate(),
            LeadId::generate(),
            AgentId::generate(),
            "draft",
            Timestamp::now(),
        );
        repository.insert(&comment).await.unwrap();

        let updated = repository
            .update_text(&comment.id, "final", Timestamp::now())
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.comment_text, "final");
        assert_eq!(updated.created_at, comment.created_at);
    }
}
