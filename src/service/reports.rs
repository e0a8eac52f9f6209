//! Reports over the whole lead collection.

use std::sync::Arc;

use crate::domain::{
    AgentLeadTotals, LeadFilter, LeadSort, LeadStatus, StatusCount, Timestamp,
    closed_report_window, closed_within, join_agent_totals, pipeline_backlog,
    status_distribution, tally_by_agent,
};
use crate::infrastructure::{AgentRepository, LeadRepository};

use super::error::ServiceError;
use super::leads::{ResolvedLead, resolve_leads};

/// Backlog count. `message` is set when the pipeline is empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineSummary {
    pub total_leads_in_pipeline: u64,
    pub message: Option<&'static str>,
}

/// Read-only reporting.
#[derive(Clone)]
pub struct ReportService {
    leads: Arc<dyn LeadRepository + Send + Sync>,
    agents: Arc<dyn AgentRepository + Send + Sync>,
}

impl ReportService {
    #[must_use]
    pub fn new(
        leads: Arc<dyn LeadRepository + Send + Sync>,
        agents: Arc<dyn AgentRepository + Send + Sync>,
    ) -> Self {
        Self { leads, agents }
    }

    /// Counts leads that are not closed. Zero is a valid answer.
    ///
    /// # Errors
    ///
    /// `Internal` on storage failure.
    pub async fn pipeline(&self) -> Result<PipelineSummary, ServiceError> {
        let leads = self.leads.find(&LeadFilter::all(), LeadSort::Natural).await?;
        let total = pipeline_backlog(&leads);
        Ok(PipelineSummary {
            total_leads_in_pipeline: total,
            message: (total == 0).then_some("No active leads found in the pipeline."),
        })
    }

    /// Leads closed during the seven days ending at `now`.
    ///
    /// # Errors
    ///
    /// `NotFound` when nothing closed in the window.
    pub async fn closed_last_week(&self, now: Timestamp) -> Result<Vec<ResolvedLead>, ServiceError> {
        let filter = LeadFilter {
            status: Some(LeadStatus::Closed),
            ..LeadFilter::all()
        };
        let closed = self.leads.find(&filter, LeadSort::Natural).await?;
        let recent = closed_within(&closed, now, closed_report_window());
        if recent.is_empty() {
            return Err(ServiceError::not_found("No leads were closed in the last week."));
        }
        resolve_leads(self.agents.as_ref(), recent).await
    }

    /// Total and closed lead counts per existing agent.
    ///
    /// # Errors
    ///
    /// `NotFound` when no existing agent has leads.
    pub async fn leads_by_agent(&self) -> Result<Vec<AgentLeadTotals>, ServiceError> {
        let leads = self.leads.find(&LeadFilter::all(), LeadSort::Natural).await?;
        let tallies = tally_by_agent(&leads);

        let ids: Vec<_> = tallies.iter().map(|tally| tally.agent).collect();
        let agents: Vec<_> = self
            .agents
            .find_by_ids(&ids)
            .await?
            .iter()
            .map(|agent| agent.summary())
            .collect();

        let totals = join_agent_totals(&tallies, &agents);
        if totals.is_empty() {
            return Err(ServiceError::not_found("No leads found for any agent."));
        }
        Ok(totals)
    }

    /// Lead counts per status.
    ///
    /// # Errors
    ///
    /// `NotFound` when there are no leads.
    pub async fn status_distribution(&self) -> Result<Vec<StatusCount>, ServiceError> {
        let leads = self.leads.find(&LeadFilter::all(), LeadSort::Natural).await?;
        let distribution = status_distribution(&leads);
        if distribution.is_empty() {
            return Err(ServiceError::not_found(
                "No leads found for status distribution.",
            ));
        }
        Ok(distribution)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        Agent, AgentId, EmailAddress, Lead, LeadId, LeadSource, NewLead, Priority,
    };
    use crate::infrastructure::{InMemoryAgentRepository, InMemoryLeadRepository};
    use chrono::TimeDelta;
    use rstest::rstest;

    struct Fixture {
        service: ReportService,
        leads: Arc<InMemoryLeadRepository>,
        agents: Arc<InMemoryAgentRepository>,
    }

    fn fixture() -> Fixture {
        let leads = Arc::new(InMemoryLeadRepository::new());
        let agents = Arc::new(InMemoryAgentRepository::new());
        Fixture {
            service: ReportService::new(leads.clone(), agents.clone()),
            leads,
            agents,
        }
    }

    async fn agent(fixture: &Fixture, name: &str) -> Agent {
        let agent = Agent::new(
            AgentId::generate(),
            name,
            EmailAddress::parse(&format!("{}@x.com", name.to_lowercase())).unwrap(),
            Timestamp::now(),
        );
        fixture.agents.save(&agent).await.unwrap();
        agent
    }

    async fn lead(fixture: &Fixture, agent: AgentId, status: LeadStatus, at: Timestamp) -> Lead {
        let lead = Lead::new(
            LeadId::generate(),
            NewLead {
                name: "Acme".to_string(),
                source: LeadSource::Website,
                sales_agent: agent,
                status,
                tags: vec![],
                time_to_close: 3.0,
                priority: Priority::High,
            },
            at,
        );
        fixture.leads.insert(&lead).await.unwrap();
        lead
    }

    #[rstest]
    #[tokio::test]
    async fn test_empty_pipeline_is_success() {
        let fixture = fixture();
        let summary = fixture.service.pipeline().await.unwrap();
        assert_eq!(summary.total_leads_in_pipeline, 0);
        assert!(summary.message.is_some());
    }

    #[rstest]
    #[tokio::test]
    async fn test_pipeline_counts_open_leads() {
        let fixture = fixture();
        let ana = agent(&fixture, "Ana").await;
        let now = Timestamp::now();
        lead(&fixture, ana.id, LeadStatus::New, now).await;
        lead(&fixture, ana.id, LeadStatus::Qualified, now).await;
        lead(&fixture, ana.id, LeadStatus::Closed, now).await;

        let summary = fixture.service.pipeline().await.unwrap();

        assert_eq!(summary.total_leads_in_pipeline, 2);
        assert_eq!(summary.message, None);
    }

    #[rstest]
    #[tokio::test]
    async fn test_closed_last_week_excludes_older_leads() {
        let fixture = fixture();
        let ana = agent(&fixture, "Ana").await;
        let now = Timestamp::now();
        let recent = lead(&fixture, ana.id, LeadStatus::Closed, now).await;
        lead(
            &fixture,
            ana.id,
            LeadStatus::Closed,
            now.saturating_sub(TimeDelta::days(8)),
        )
        .await;

        let report = fixture.service.closed_last_week(now).await.unwrap();

        assert_eq!(report.len(), 1);
        assert_eq!(report[0].lead.id, recent.id);
        assert_eq!(report[0].sales_agent, Some(ana.summary()));
    }

    #[rstest]
    #[tokio::test]
    async fn test_empty_reports_are_not_found() {
        let fixture = fixture();
        let now = Timestamp::now();

        assert!(matches!(
            fixture.service.closed_last_week(now).await,
            Err(ServiceError::NotFound(_))
        ));
        assert!(matches!(
            fixture.service.leads_by_agent().await,
            Err(ServiceError::NotFound(_))
        ));
        assert!(matches!(
            fixture.service.status_distribution().await,
            Err(ServiceError::NotFound(_))
        ));
    }

    #[rstest]
    #[tokio::test]
    async fn test_leads_by_agent_drops_deleted_agents() {
        let fixture = fixture();
        let ana = agent(&fixture, "Ana").await;
        let bea = agent(&fixture, "Bea").await;
        let now = Timestamp::now();
        lead(&fixture, ana.id, LeadStatus::Closed, now).await;
        lead(&fixture, bea.id, LeadStatus::New, now).await;
        lead(&fixture, bea.id, LeadStatus::New, now).await;
        lead(&fixture, AgentId::generate(), LeadStatus::New, now).await;

        let totals = fixture.service.leads_by_agent().await.unwrap();

        assert_eq!(totals.len(), 2);
        assert_eq!(totals[0].agent, bea.summary());
        assert_eq!(totals[0].total_leads, 2);
        assert_eq!(totals[1].closed_leads, 1);
    }

    #[rstest]
    #[tokio::test]
    async fn test_status_distribution_lists_present_statuses() {
        let fixture = fixture();
        let ana = agent(&fixture, "Ana").await;
        let now = Timestamp::now();
        lead(&fixture, ana.id, LeadStatus::New, now).await;
        lead(&fixture, ana.id, LeadStatus::Closed, now).await;
        lead(&fixture, ana.id, LeadStatus::New, now).await;

        let distribution = fixture.service.status_distribution().await.unwrap();

        assert_eq!(
            distribution,
            vec![
                StatusCount {
                    status: LeadStatus::New,
                    count: 2
                },
                StatusCount {
                    status: LeadStatus::Closed,
                    count: 1
                },
            ]
        );
    }
}
