//! Lead operations: validation, the closed-timestamp rule, and agent
//! resolution around the lead repository.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::domain::{AgentId, AgentSummary, Lead, LeadChangeSet, LeadId, Timestamp};
use crate::infrastructure::{AgentRepository, LeadRepository};

use super::error::ServiceError;
use super::input::{LeadDraft, LeadFilterParams};
use super::query::{LeadQuery, QueryBuilder};
use super::validation::{parse_lead_id, validate_lead_changes, validate_new_lead};

/// A lead with its assigned agent looked up. `sales_agent` is `None` when
/// the agent has since been deleted.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedLead {
    pub lead: Lead,
    pub sales_agent: Option<AgentSummary>,
}

/// Result of a listing. `message` is set when nothing matched.
#[derive(Debug, Clone, PartialEq)]
pub struct LeadListing {
    pub leads: Vec<ResolvedLead>,
    pub message: Option<&'static str>,
}

/// Looks up the agents referenced by `leads` with one repository call.
pub(crate) async fn resolve_leads(
    agents: &(dyn AgentRepository + Send + Sync),
    leads: Vec<Lead>,
) -> Result<Vec<ResolvedLead>, ServiceError> {
    let mut ids: Vec<AgentId> = leads.iter().map(|lead| lead.sales_agent).collect();
    ids.sort_unstable();
    ids.dedup();

    let known: BTreeMap<AgentId, AgentSummary> = agents
        .find_by_ids(&ids)
        .await?
        .iter()
        .map(|agent| (agent.id, agent.summary()))
        .collect();

    Ok(leads
        .into_iter()
        .map(|lead| ResolvedLead {
            sales_agent: known.get(&lead.sales_agent).cloned(),
            lead,
        })
        .collect())
}

fn lead_not_found(id: &LeadId) -> ServiceError {
    ServiceError::not_found(format!("Lead with ID '{id}' not found."))
}

/// Lead operations.
#[derive(Clone)]
pub struct LeadService {
    leads: Arc<dyn LeadRepository + Send + Sync>,
    agents: Arc<dyn AgentRepository + Send + Sync>,
}

impl LeadService {
    #[must_use]
    pub fn new(
        leads: Arc<dyn LeadRepository + Send + Sync>,
        agents: Arc<dyn AgentRepository + Send + Sync>,
    ) -> Self {
        Self { leads, agents }
    }

    async fn require_agent(&self, id: &AgentId) -> Result<AgentSummary, ServiceError> {
        self.agents
            .find_by_id(id)
            .await?
            .map(|agent| agent.summary())
            .ok_or_else(|| ServiceError::not_found("Sales Agent not found."))
    }

    /// Creates a lead.
    ///
    /// # Errors
    ///
    /// `BadRequest` for an invalid payload, `NotFound` if the agent does not
    /// exist.
    pub async fn create(&self, draft: &LeadDraft) -> Result<ResolvedLead, ServiceError> {
        let fields = validate_new_lead(draft)?;
        let agent = self.require_agent(&fields.sales_agent).await?;

        let lead = Lead::new(LeadId::generate(), fields, Timestamp::now());
        self.leads.insert(&lead).await?;

        tracing::info!(lead_id = %lead.id, status = %lead.status, "Lead created");
        Ok(ResolvedLead {
            lead,
            sales_agent: Some(agent),
        })
    }

    /// Fetches one lead.
    ///
    /// # Errors
    ///
    /// `BadRequest` for a malformed id, `NotFound` if absent.
    pub async fn get(&self, id: &str) -> Result<ResolvedLead, ServiceError> {
        let id = parse_lead_id(id)?;
        let lead = self
            .leads
            .find_by_id(&id)
            .await?
            .ok_or_else(|| lead_not_found(&id))?;
        let mut resolved = resolve_leads(self.agents.as_ref(), vec![lead]).await?;
        resolved.pop().ok_or_else(|| lead_not_found(&id))
    }

    async fn run_query(&self, query: LeadQuery) -> Result<Vec<ResolvedLead>, ServiceError> {
        let leads = self.leads.find(&query.filter, query.sort).await?;
        resolve_leads(self.agents.as_ref(), leads).await
    }

    /// Lists leads matching `params`. An empty result is not an error.
    ///
    /// # Errors
    ///
    /// `BadRequest` for an invalid parameter.
    pub async fn list(&self, params: &LeadFilterParams) -> Result<LeadListing, ServiceError> {
        let query = QueryBuilder::build(params)?;
        let leads = self.run_query(query).await?;

        let message = leads.is_empty().then_some(if query.filtered {
            "Filter applied — no leads found."
        } else {
            "No leads available in the system yet."
        });
        Ok(LeadListing { leads, message })
    }

    /// Lists the leads assigned to one agent. The agent's existence is not
    /// checked; an unknown agent simply has no leads.
    ///
    /// # Errors
    ///
    /// `BadRequest` for a malformed agent id or an invalid parameter.
    pub async fn list_by_agent(
        &self,
        agent_id: &str,
        params: &LeadFilterParams,
    ) -> Result<LeadListing, ServiceError> {
        let (_, query) = QueryBuilder::build_for_agent(agent_id, params)?;
        let leads = self.run_query(query).await?;

        let message = leads.is_empty().then_some(if query.filtered {
            "Filter applied — no leads found for this agent."
        } else {
            "No leads assigned to this agent yet."
        });
        Ok(LeadListing { leads, message })
    }

    /// Applies a partial update in one storage write.
    ///
    /// # Errors
    ///
    /// `BadRequest` for a malformed id or invalid payload, `NotFound` if the
    /// lead or a newly assigned agent does not exist.
    pub async fn update(&self, id: &str, draft: &LeadDraft) -> Result<ResolvedLead, ServiceError> {
        let id = parse_lead_id(id)?;
        let changes = validate_lead_changes(draft)?;

        if let Some(agent) = &changes.sales_agent {
            self.require_agent(agent).await?;
        }

        let change_set = LeadChangeSet::from_changes(changes, Timestamp::now());
        let lead = self
            .leads
            .update(&id, &change_set)
            .await?
            .ok_or_else(|| lead_not_found(&id))?;

        tracing::info!(lead_id = %id, status = %lead.status, "Lead updated");
        let mut resolved = resolve_leads(self.agents.as_ref(), vec![lead]).await?;
        resolved.pop().ok_or_else(|| lead_not_found(&id))
    }

    /// Deletes a lead and returns it. Comments on the lead are kept.
    ///
    /// # Errors
    ///
    /// `BadRequest` for a malformed id, `NotFound` if absent.
    pub async fn delete(&self, id: &str) -> Result<Lead, ServiceError> {
        let id = parse_lead_id(id)?;
        let lead = self
            .leads
            .delete(&id)
            .await?
            .ok_or_else(|| lead_not_found(&id))?;
        tracing::info!(lead_id = %id, "Lead deleted");
        Ok(lead)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Agent, EmailAddress, LeadStatus, Priority};
    use crate::infrastructure::{InMemoryAgentRepository, InMemoryLeadRepository};
    use rstest::rstest;

    struct Fixture {
        service: LeadService,
        agents: Arc<InMemoryAgentRepository>,
        ana: Agent,
    }

    async fn fixture() -> Fixture {
        let agents = Arc::new(InMemoryAgentRepository::new());
        let ana = Agent::new(
            AgentId::generate(),
            "Ana",
            EmailAddress::parse("ana@x.com").unwrap(),
            Timestamp::now(),
        );
        agents.save(&ana).await.unwrap();
        let service = LeadService::new(Arc::new(InMemoryLeadRepository::new()), agents.clone());
        Fixture {
            service,
            agents,
            ana,
        }
    }

    fn draft(agent: &AgentId, status: &str, time_to_close: f64) -> LeadDraft {
        LeadDraft {
            name: Some("Acme".to_string()),
            source: Some("Website".to_string()),
            sales_agent: Some(agent.to_string()),
            status: Some(status.to_string()),
            tags: None,
            time_to_close: Some(time_to_close),
            priority: Some("High".to_string()),
        }
    }

    fn status_only(status: &str) -> LeadDraft {
        LeadDraft {
            status: Some(status.to_string()),
            ..LeadDraft::default()
        }
    }

    #[rstest]
    #[tokio::test]
    async fn test_create_resolves_agent_and_leaves_closed_at_empty() {
        let fixture = fixture().await;

        let created = fixture
            .service
            .create(&draft(&fixture.ana.id, "New", 10.0))
            .await
            .unwrap();

        assert_eq!(created.lead.closed_at, None);
        assert_eq!(created.sales_agent, Some(fixture.ana.summary()));
    }

    #[rstest]
    #[tokio::test]
    async fn test_create_with_unknown_agent_is_not_found() {
        let fixture = fixture().await;

        let error = fixture
            .service
            .create(&draft(&AgentId::generate(), "New", 10.0))
            .await
            .unwrap_err();

        assert_eq!(error, ServiceError::not_found("Sales Agent not found."));
        let listing = fixture.service.list(&LeadFilterParams::default()).await.unwrap();
        assert!(listing.leads.is_empty());
    }

    #[rstest]
    #[tokio::test]
    async fn test_close_and_reopen_lifecycle() {
        let fixture = fixture().await;
        let created = fixture
            .service
            .create(&draft(&fixture.ana.id, "New", 10.0))
            .await
            .unwrap();
        let id = created.lead.id.to_string();

        let before_close = Timestamp::now();
        let closed = fixture.service.update(&id, &status_only("Closed")).await.unwrap();
        let closed_at = closed.lead.closed_at.unwrap();
        assert!(closed_at >= before_close && closed_at <= Timestamp::now());

        let reopened = fixture
            .service
            .update(&id, &status_only("Contacted"))
            .await
            .unwrap();
        assert_eq!(reopened.lead.closed_at, None);
        assert_eq!(reopened.lead.status, LeadStatus::Contacted);
    }

    #[rstest]
    #[tokio::test]
    async fn test_update_then_get_returns_exactly_the_new_fields() {
        let fixture = fixture().await;
        let created = fixture
            .service
            .create(&draft(&fixture.ana.id, "Closed", 10.0))
            .await
            .unwrap();
        let id = created.lead.id.to_string();

        fixture
            .service
            .update(
                &id,
                &LeadDraft {
                    priority: Some("Low".to_string()),
                    tags: Some(vec!["renewal".to_string()]),
                    ..LeadDraft::default()
                },
            )
            .await
            .unwrap();
        let fetched = fixture.service.get(&id).await.unwrap().lead;

        assert_eq!(fetched.priority, Priority::Low);
        assert_eq!(fetched.tags, vec!["renewal".to_string()]);
        assert_eq!(fetched.name, created.lead.name);
        assert_eq!(fetched.status, LeadStatus::Closed);
        assert_eq!(fetched.closed_at, created.lead.closed_at);
    }

    #[rstest]
    #[tokio::test]
    async fn test_update_reassigning_to_unknown_agent_is_not_found() {
        let fixture = fixture().await;
        let created = fixture
            .service
            .create(&draft(&fixture.ana.id, "New", 10.0))
            .await
            .unwrap();

        let error = fixture
            .service
            .update(
                &created.lead.id.to_string(),
                &LeadDraft {
                    sales_agent: Some(AgentId::generate().to_string()),
                    ..LeadDraft::default()
                },
            )
            .await
            .unwrap_err();

        assert_eq!(error, ServiceError::not_found("Sales Agent not found."));
    }

    #[rstest]
    #[case("not-an-id", true)]
    #[case("0190f2b4-7c1e-7a3b-9c2d-1e2f3a4b5c6d", false)]
    #[tokio::test]
    async fn test_get_distinguishes_malformed_from_missing(
        #[case] id: &str,
        #[case] malformed: bool,
    ) {
        let fixture = fixture().await;
        let error = fixture.service.get(id).await.unwrap_err();
        assert_eq!(matches!(error, ServiceError::BadRequest { .. }), malformed);
        assert_eq!(matches!(error, ServiceError::NotFound(_)), !malformed);
    }

    #[rstest]
    #[tokio::test]
    async fn test_list_filters_by_status() {
        let fixture = fixture().await;
        fixture
            .service
            .create(&draft(&fixture.ana.id, "New", 10.0))
            .await
            .unwrap();
        let closed = fixture
            .service
            .create(&draft(&fixture.ana.id, "Closed", 5.0))
            .await
            .unwrap();

        let listing = fixture
            .service
            .list(&LeadFilterParams {
                status: Some("Closed".to_string()),
                ..LeadFilterParams::default()
            })
            .await
            .unwrap();

        assert_eq!(listing.leads.len(), 1);
        assert_eq!(listing.leads[0].lead.id, closed.lead.id);
        assert_eq!(listing.message, None);
    }

    #[rstest]
    #[tokio::test]
    async fn test_empty_listing_messages() {
        let fixture = fixture().await;

        let unfiltered = fixture.service.list(&LeadFilterParams::default()).await.unwrap();
        let filtered = fixture
            .service
            .list(&LeadFilterParams {
                priority: Some("Low".to_string()),
                ..LeadFilterParams::default()
            })
            .await
            .unwrap();
        let by_agent = fixture
            .service
            .list_by_agent(&fixture.ana.id.to_string(), &LeadFilterParams::default())
            .await
            .unwrap();

        assert_eq!(unfiltered.message, Some("No leads available in the system yet."));
        assert_eq!(filtered.message, Some("Filter applied — no leads found."));
        assert_eq!(by_agent.message, Some("No leads assigned to this agent yet."));
    }

    #[rstest]
    #[tokio::test]
    async fn test_deleted_agent_resolves_to_none() {
        let fixture = fixture().await;
        let created = fixture
            .service
            .create(&draft(&fixture.ana.id, "New", 10.0))
            .await
            .unwrap();
        fixture.agents.delete(&fixture.ana.id).await.unwrap();

        let fetched = fixture.service.get(&created.lead.id.to_string()).await.unwrap();

        assert_eq!(fetched.sales_agent, None);
    }

    #[rstest]
    #[tokio::test]
    async fn test_delete_returns_record_then_not_found() {
        let fixture = fixture().await;
        let created = fixture
            .service
            .create(&draft(&fixture.ana.id, "New", 10.0))
            .await
            .unwrap();
        let id = created.lead.id.to_string();

        assert_eq!(fixture.service.delete(&id).await.unwrap(), created.lead);
        assert!(matches!(
            fixture.service.delete(&id).await,
            Err(ServiceError::NotFound(_))
        ));
    }
}
