//! Turns listing parameters into a validated filter and sort.

use crate::domain::{AgentId, LeadFilter, LeadSort};

use super::error::ServiceError;
use super::input::LeadFilterParams;
use super::validation::{parse_agent_id, validate_filter_params};

/// A validated listing query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LeadQuery {
    pub filter: LeadFilter,
    pub sort: LeadSort,
    /// Whether the caller supplied any parameter. Only used to word the
    /// empty-result message.
    pub filtered: bool,
}

/// Builds lead queries from raw parameters.
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryBuilder;

impl QueryBuilder {
    /// Validates `params` and builds the equality filter and sort.
    ///
    /// # Errors
    ///
    /// Returns `BadRequest` naming the first invalid parameter.
    pub fn build(params: &LeadFilterParams) -> Result<LeadQuery, ServiceError> {
        let valid = validate_filter_params(params)?;
        Ok(LeadQuery {
            filter: valid.filter,
            sort: LeadSort::from_order(valid.sort),
            filtered: !params.is_empty(),
        })
    }

    /// Builds a query scoped to one agent. The agent id takes precedence
    /// over any `salesAgent` parameter.
    ///
    /// # Errors
    ///
    /// Returns `BadRequest` if the agent id is malformed or a parameter is
    /// invalid.
    pub fn build_for_agent(
        agent_id: &str,
        params: &LeadFilterParams,
    ) -> Result<(AgentId, LeadQuery), ServiceError> {
        let agent = parse_agent_id(agent_id)?;
        let scoped = LeadFilterParams {
            sales_agent: None,
            ..params.clone()
        };
        let mut query = Self::build(&scoped)?;
        query.filter.sales_agent = Some(agent);
        Ok((agent, query))
    }
}
