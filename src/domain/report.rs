//! Pipeline metrics computed over the lead collection.
//!
//! Every function here is a pure fold over a slice of leads. Joining with
//! agents happens in the service layer.

use std::collections::BTreeMap;

use chrono::TimeDelta;
use serde::Serialize;

use super::{AgentId, AgentSummary, Enumerated, Lead, LeadStatus, Timestamp};

/// Look-back window of the closed-leads report.
#[must_use]
pub fn closed_report_window() -> TimeDelta {
    TimeDelta::days(7)
}

/// Number of leads not yet closed.
#[must_use]
pub fn pipeline_backlog(leads: &[Lead]) -> u64 {
    leads.iter().filter(|lead| !lead.status.is_closed()).count() as u64
}

/// Closed leads whose `closed_at` falls in `[now - window, now]`.
#[must_use]
pub fn closed_within(leads: &[Lead], now: Timestamp, window: TimeDelta) -> Vec<Lead> {
    let start = now.saturating_sub(window);
    leads
        .iter()
        .filter(|lead| lead.status.is_closed())
        .filter(|lead| {
            lead.closed_at
                .is_some_and(|closed_at| start <= closed_at && closed_at <= now)
        })
        .cloned()
        .collect()
}

/// Lead counts for one agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LeadTally {
    pub agent: AgentId,
    pub total_leads: u64,
    pub closed_leads: u64,
}

/// Counts total and closed leads per assigned agent, ordered by agent id.
/// Agents without leads do not appear.
#[must_use]
pub fn tally_by_agent(leads: &[Lead]) -> Vec<LeadTally> {
    leads
        .iter()
        .fold(BTreeMap::<AgentId, (u64, u64)>::new(), |mut tallies, lead| {
            let entry = tallies.entry(lead.sales_agent).or_default();
            entry.0 += 1;
            if lead.status.is_closed() {
                entry.1 += 1;
            }
            tallies
        })
        .into_iter()
        .map(|(agent, (total_leads, closed_leads))| LeadTally {
            agent,
            total_leads,
            closed_leads,
        })
        .collect()
}

/// A tally joined with the agent it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentLeadTotals {
    pub agent: AgentSummary,
    pub total_leads: u64,
    pub closed_leads: u64,
}

/// Joins tallies with known agents, dropping tallies whose agent no longer
/// exists. The result is ordered by total leads descending, then agent name.
#[must_use]
pub fn join_agent_totals(tallies: &[LeadTally], agents: &[AgentSummary]) -> Vec<AgentLeadTotals> {
    let by_id: BTreeMap<AgentId, &AgentSummary> =
        agents.iter().map(|agent| (agent.id, agent)).collect();

    let mut totals: Vec<AgentLeadTotals> = tallies
        .iter()
        .filter_map(|tally| {
            by_id.get(&tally.agent).map(|agent| AgentLeadTotals {
                agent: (*agent).clone(),
                total_leads: tally.total_leads,
                closed_leads: tally.closed_leads,
            })
        })
        .collect();

    totals.sort_by(|left, right| {
        right
            .total_leads
            .cmp(&left.total_leads)
            .then_with(|| left.agent.name.cmp(&right.agent.name))
    });
    totals
}

/// Number of leads in one status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusCount {
    pub status: LeadStatus,
    pub count: u64,
}

/// Counts leads per status, listing only statuses that occur, in pipeline order.
#[must_use]
pub fn status_distribution(leads: &[Lead]) -> Vec<StatusCount> {
    LeadStatus::ALL
        .iter()
        .map(|&status| StatusCount {
            status,
            count: leads.iter().filter(|lead| lead.status == status).count() as u64,
        })
        .filter(|entry| entry.count > 0)
        .collect()
}
