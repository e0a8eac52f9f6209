//! Lead domain model and the closed-timestamp state machine.
//!
//! A lead may move between any two statuses. The only rule the lifecycle
//! enforces is that `closed_at` is set exactly when the status is `Closed`.
//! [`derive_closed_at`] is the single place that rule is written; both the
//! full-record path ([`Lead::apply`]) and the partial field-set path
//! ([`LeadChangeSet`]) go through it.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{AgentId, Timestamp};

// =============================================================================
// Enumerations
// =============================================================================

/// A closed set of string-valued choices.
pub trait Enumerated: Copy + Sized + 'static {
    /// Every value, in declaration order.
    const ALL: &'static [Self];

    /// The wire spelling of this value.
    fn as_str(self) -> &'static str;

    /// Looks up a value by its exact wire spelling.
    fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|value| value.as_str() == name)
    }

    /// The allowed spellings joined with `", "`.
    fn allowed_values() -> String {
        Self::ALL
            .iter()
            .map(|value| value.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Where a lead came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LeadSource {
    Website,
    Referral,
    #[serde(rename = "Cold Call")]
    ColdCall,
    Advertisement,
    Email,
    Other,
}

impl Enumerated for LeadSource {
    const ALL: &'static [Self] = &[
        Self::Website,
        Self::Referral,
        Self::ColdCall,
        Self::Advertisement,
        Self::Email,
        Self::Other,
    ];

    fn as_str(self) -> &'static str {
        match self {
            Self::Website => "Website",
            Self::Referral => "Referral",
            Self::ColdCall => "Cold Call",
            Self::Advertisement => "Advertisement",
            Self::Email => "Email",
            Self::Other => "Other",
        }
    }
}

/// Position of a lead in the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum LeadStatus {
    New,
    Contacted,
    Qualified,
    #[serde(rename = "Proposal Sent")]
    ProposalSent,
    Closed,
}

impl LeadStatus {
    /// Returns `true` for the terminal status.
    #[must_use]
    pub const fn is_closed(self) -> bool {
        matches!(self, Self::Closed)
    }
}

impl Enumerated for LeadStatus {
    const ALL: &'static [Self] = &[
        Self::New,
        Self::Contacted,
        Self::Qualified,
        Self::ProposalSent,
        Self::Closed,
    ];

    fn as_str(self) -> &'static str {
        match self {
            Self::New => "New",
            Self::Contacted => "Contacted",
            Self::Qualified => "Qualified",
            Self::ProposalSent => "Proposal Sent",
            Self::Closed => "Closed",
        }
    }
}

/// Lead priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
}

impl Enumerated for Priority {
    const ALL: &'static [Self] = &[Self::High, Self::Medium, Self::Low];

    fn as_str(self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        }
    }
}

macro_rules! display_as_str {
    ($($name:ty),*) => {
        $(
            impl std::fmt::Display for $name {
                fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                    formatter.write_str(self.as_str())
                }
            }
        )*
    };
}

display_as_str!(LeadSource, LeadStatus, Priority);

// =============================================================================
// Identifier
// =============================================================================

/// Unique identifier for a lead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LeadId(Uuid);

impl LeadId {
    /// Creates a `LeadId` from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the inner UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// Generates a new time-ordered `LeadId` (UUID v7).
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::now_v7())
    }

    /// Parses an identifier, returning `None` when it is not a well-formed UUID.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        Uuid::parse_str(value.trim()).ok().map(Self)
    }
}

impl std::fmt::Display for LeadId {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

// =============================================================================
// State Machine
// =============================================================================

/// Computes `closed_at` after a write.
///
/// - `Some(Closed)` stamps `now`, replacing any earlier value.
/// - Any other new status clears the timestamp.
/// - `None` (status untouched) keeps `previous`.
#[must_use]
pub const fn derive_closed_at(
    previous: Option<Timestamp>,
    new_status: Option<LeadStatus>,
    now: Timestamp,
) -> Option<Timestamp> {
    match new_status {
        Some(LeadStatus::Closed) => Some(now),
        Some(_) => None,
        None => previous,
    }
}

/// What a partial update does to `closed_at`, resolved before storage sees it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClosedAtChange {
    /// Status is untouched; the stored value stays as it is.
    Keep,
    /// Status is written; `closed_at` becomes this value.
    Set(Option<Timestamp>),
}

impl ClosedAtChange {
    /// Resolves the change for a partial update that may carry a new status.
    #[must_use]
    pub const fn resolve(new_status: Option<LeadStatus>, now: Timestamp) -> Self {
        match new_status {
            None => Self::Keep,
            Some(_) => Self::Set(derive_closed_at(None, new_status, now)),
        }
    }

    /// Applies the change to a previously stored value.
    #[must_use]
    pub const fn apply(self, previous: Option<Timestamp>) -> Option<Timestamp> {
        match self {
            Self::Keep => previous,
            Self::Set(value) => value,
        }
    }
}

// =============================================================================
// Lead
// =============================================================================

/// Validated fields for a new lead.
#[derive(Debug, Clone, PartialEq)]
pub struct NewLead {
    pub name: String,
    pub source: LeadSource,
    pub sales_agent: AgentId,
    pub status: LeadStatus,
    pub tags: Vec<String>,
    pub time_to_close: f64,
    pub priority: Priority,
}

/// A sales opportunity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lead {
    pub id: LeadId,
    pub name: String,
    pub source: LeadSource,
    pub sales_agent: AgentId,
    pub status: LeadStatus,
    #[serde(default)]
    pub tags: Vec<String>,
    pub time_to_close: f64,
    #[serde(default)]
    pub priority: Priority,
    pub closed_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Lead {
    /// Creates a lead, stamping `closed_at` if it starts out closed.
    #[must_use]
    pub fn new(id: LeadId, fields: NewLead, now: Timestamp) -> Self {
        Self {
            id,
            closed_at: derive_closed_at(None, Some(fields.status), now),
            name: fields.name,
            source: fields.source,
            sales_agent: fields.sales_agent,
            status: fields.status,
            tags: fields.tags,
            time_to_close: fields.time_to_close,
            priority: fields.priority,
            created_at: now,
            updated_at: now,
        }
    }

    /// Returns a copy with `changes` applied to the loaded record.
    #[must_use]
    pub fn apply(&self, changes: &LeadChanges, now: Timestamp) -> Self {
        let mut updated = self.clone();
        changes.assign_to(&mut updated);
        updated.closed_at = derive_closed_at(self.closed_at, changes.status, now);
        updated.updated_at = now;
        updated
    }
}

/// Validated fields for a partial lead update. `None` means "leave as is".
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LeadChanges {
    pub name: Option<String>,
    pub source: Option<LeadSource>,
    pub sales_agent: Option<AgentId>,
    pub status: Option<LeadStatus>,
    pub tags: Option<Vec<String>>,
    pub time_to_close: Option<f64>,
    pub priority: Option<Priority>,
}

impl LeadChanges {
    /// Returns `true` if no field is set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.source.is_none()
            && self.sales_agent.is_none()
            && self.status.is_none()
            && self.tags.is_none()
            && self.time_to_close.is_none()
            && self.priority.is_none()
    }

    fn assign_to(&self, lead: &mut Lead) {
        if let Some(name) = &self.name {
            lead.name.clone_from(name);
        }
        if let Some(source) = self.source {
            lead.source = source;
        }
        if let Some(sales_agent) = self.sales_agent {
            lead.sales_agent = sales_agent;
        }
        if let Some(status) = self.status {
            lead.status = status;
        }
        if let Some(tags) = &self.tags {
            lead.tags.clone_from(tags);
        }
        if let Some(time_to_close) = self.time_to_close {
            lead.time_to_close = time_to_close;
        }
        if let Some(priority) = self.priority {
            lead.priority = priority;
        }
    }
}

/// A fully resolved partial update, ready for a single atomic storage call.
///
/// The closed-timestamp outcome is decided here, so storage never has to
/// read the record first.
#[derive(Debug, Clone, PartialEq)]
pub struct LeadChangeSet {
    pub changes: LeadChanges,
    pub closed_at: ClosedAtChange,
    pub updated_at: Timestamp,
}

impl LeadChangeSet {
    /// Resolves the closed-timestamp outcome for `changes`.
    #[must_use]
    pub fn from_changes(changes: LeadChanges, now: Timestamp) -> Self {
        let closed_at = ClosedAtChange::resolve(changes.status, now);
        Self {
            changes,
            closed_at,
            updated_at: now,
        }
    }

    /// Applies the change set to a stored record.
    #[must_use]
    pub fn apply_to(&self, lead: &Lead) -> Lead {
        let mut updated = lead.clone();
        self.changes.assign_to(&mut updated);
        updated.closed_at = self.closed_at.apply(lead.closed_at);
        updated.updated_at = self.updated_at;
        updated
    }

    /// Renders the change set as a JSON object of the camelCase fields it
    /// writes, for merging into a stored document.
    ///
    /// # Errors
    ///
    /// Returns an error if a value cannot be represented as JSON (for
    /// example a non-finite `timeToClose`).
    pub fn to_patch(&self) -> Result<serde_json::Value, serde_json::Error> {
        let mut patch = serde_json::Map::new();
        let changes = &self.changes;

        if let Some(name) = &changes.name {
            patch.insert("name".to_string(), serde_json::to_value(name)?);
        }
        if let Some(source) = changes.source {
            patch.insert("source".to_string(), serde_json::to_value(source)?);
        }
        if let Some(sales_agent) = changes.sales_agent {
            patch.insert("salesAgent".to_string(), serde_json::to_value(sales_agent)?);
        }
        if let Some(status) = changes.status {
            patch.insert("status".to_string(), serde_json::to_value(status)?);
        }
        if let Some(tags) = &changes.tags {
            patch.insert("tags".to_string(), serde_json::to_value(tags)?);
        }
        if let Some(time_to_close) = changes.time_to_close {
            let number = serde_json::Number::from_f64(time_to_close).ok_or_else(|| {
                <serde_json::Error as serde::ser::Error>::custom("timeToClose is not finite")
            })?;
            patch.insert("timeToClose".to_string(), serde_json::Value::Number(number));
        }
        if let Some(priority) = changes.priority {
            patch.insert("priority".to_string(), serde_json::to_value(priority)?);
        }
        if let ClosedAtChange::Set(closed_at) = self.closed_at {
            patch.insert("closedAt".to_string(), serde_json::to_value(closed_at)?);
        }
        patch.insert(
            "updatedAt".to_string(),
            serde_json::to_value(self.updated_at)?,
        );

        Ok(serde_json::Value::Object(patch))
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use proptest::prelude::*;
    use rstest::rstest;

    fn at(hour: u32) -> Timestamp {
        Timestamp::from_datetime(Utc.with_ymd_and_hms(2024, 6, 1, hour, 0, 0).unwrap())
    }

    fn new_lead(status: LeadStatus) -> NewLead {
        NewLead {
            name: "Acme".to_string(),
            source: LeadSource::Website,
            sales_agent: AgentId::generate(),
            status,
            tags: vec![],
            time_to_close: 10.0,
            priority: Priority::High,
        }
    }

    // -------------------------------------------------------------------------
    // Enumerations
    // -------------------------------------------------------------------------

    #[rstest]
    #[case("Cold Call", Some(LeadSource::ColdCall))]
    #[case("Website", Some(LeadSource::Website))]
    #[case("website", None)]
    #[case("Fax", None)]
    fn test_lead_source_from_name(#[case] name: &str, #[case] expected: Option<LeadSource>) {
        assert_eq!(LeadSource::from_name(name), expected);
    }

    #[rstest]
    fn test_allowed_values_are_listed_in_declaration_order() {
        assert_eq!(
            LeadStatus::allowed_values(),
            "New, Contacted, Qualified, Proposal Sent, Closed"
        );
        assert_eq!(Priority::allowed_values(), "High, Medium, Low");
    }

    #[rstest]
    fn test_wire_spelling_matches_serde() {
        for status in LeadStatus::ALL {
            let json = serde_json::to_value(status).unwrap();
            assert_eq!(json, serde_json::Value::String(status.as_str().to_string()));
        }
        for source in LeadSource::ALL {
            let json = serde_json::to_value(source).unwrap();
            assert_eq!(json, serde_json::Value::String(source.as_str().to_string()));
        }
    }

    #[rstest]
    fn test_priority_defaults_to_medium() {
        assert_eq!(Priority::default(), Priority::Medium);
    }

    // -------------------------------------------------------------------------
    // derive_closed_at
    // -------------------------------------------------------------------------

    #[rstest]
    #[case(None, Some(LeadStatus::Closed), Some(at(9)))]
    #[case(Some(at(1)), Some(LeadStatus::Closed), Some(at(9)))]
    #[case(Some(at(1)), Some(LeadStatus::Contacted), None)]
    #[case(None, Some(LeadStatus::New), None)]
    #[case(Some(at(1)), None, Some(at(1)))]
    #[case(None, None, None)]
    fn test_derive_closed_at(
        #[case] previous: Option<Timestamp>,
        #[case] status: Option<LeadStatus>,
        #[case] expected: Option<Timestamp>,
    ) {
        assert_eq!(derive_closed_at(previous, status, at(9)), expected);
    }

    #[rstest]
    fn test_new_closed_lead_is_stamped() {
        let lead = Lead::new(LeadId::generate(), new_lead(LeadStatus::Closed), at(3));
        assert_eq!(lead.closed_at, Some(at(3)));
    }

    #[rstest]
    fn test_new_open_lead_is_not_stamped() {
        let lead = Lead::new(LeadId::generate(), new_lead(LeadStatus::New), at(3));
        assert_eq!(lead.closed_at, None);
    }

    #[rstest]
    fn test_close_then_reopen() {
        let lead = Lead::new(LeadId::generate(), new_lead(LeadStatus::New), at(1));

        let closed = lead.apply(
            &LeadChanges {
                status: Some(LeadStatus::Closed),
                ..LeadChanges::default()
            },
            at(2),
        );
        assert_eq!(closed.closed_at, Some(at(2)));

        let reopened = closed.apply(
            &LeadChanges {
                status: Some(LeadStatus::Contacted),
                ..LeadChanges::default()
            },
            at(3),
        );
        assert_eq!(reopened.closed_at, None);
        assert_eq!(reopened.created_at, at(1));
        assert_eq!(reopened.updated_at, at(3));
    }

    #[rstest]
    fn test_unrelated_update_keeps_closed_at() {
        let lead = Lead::new(LeadId::generate(), new_lead(LeadStatus::Closed), at(1));
        let renamed = lead.apply(
            &LeadChanges {
                name: Some("Acme Corp".to_string()),
                ..LeadChanges::default()
            },
            at(5),
        );
        assert_eq!(renamed.closed_at, Some(at(1)));
        assert_eq!(renamed.name, "Acme Corp");
    }

    // -------------------------------------------------------------------------
    // LeadChangeSet
    // -------------------------------------------------------------------------

    #[rstest]
    fn test_change_set_without_status_keeps_closed_at() {
        let change_set = LeadChangeSet::from_changes(
            LeadChanges {
                priority: Some(Priority::Low),
                ..LeadChanges::default()
            },
            at(4),
        );
        assert_eq!(change_set.closed_at, ClosedAtChange::Keep);
    }

    #[rstest]
    fn test_patch_contains_only_written_fields() {
        let change_set = LeadChangeSet::from_changes(
            LeadChanges {
                status: Some(LeadStatus::ProposalSent),
                tags: Some(vec!["vip".to_string()]),
                ..LeadChanges::default()
            },
            at(4),
        );
        let patch = change_set.to_patch().unwrap();
        let object = patch.as_object().unwrap();

        assert_eq!(object["status"], "Proposal Sent");
        assert_eq!(object["tags"], serde_json::json!(["vip"]));
        assert!(object["closedAt"].is_null());
        assert!(object.contains_key("updatedAt"));
        assert!(!object.contains_key("name"));
        assert!(!object.contains_key("priority"));
    }

    #[rstest]
    fn test_patch_omits_closed_at_when_status_untouched() {
        let change_set = LeadChangeSet::from_changes(
            LeadChanges {
                name: Some("Renamed".to_string()),
                ..LeadChanges::default()
            },
            at(4),
        );
        let patch = change_set.to_patch().unwrap();
        assert!(!patch.as_object().unwrap().contains_key("closedAt"));
    }

    // -------------------------------------------------------------------------
    // Properties
    // -------------------------------------------------------------------------

    fn status_strategy() -> impl Strategy<Value = LeadStatus> {
        prop::sample::select(LeadStatus::ALL.to_vec())
    }

    fn changes_strategy() -> impl Strategy<Value = LeadChanges> {
        (
            prop::option::of("[a-z]{1,8}"),
            prop::option::of(status_strategy()),
            prop::option::of(0.5f64..500.0),
            prop::option::of(prop::sample::select(Priority::ALL.to_vec())),
        )
            .prop_map(|(name, status, time_to_close, priority)| LeadChanges {
                name,
                status,
                time_to_close,
                priority,
                ..LeadChanges::default()
            })
    }

    proptest! {
        #[test]
        fn prop_closed_at_tracks_status_after_any_update_sequence(
            initial in status_strategy(),
            updates in prop::collection::vec(changes_strategy(), 0..12),
        ) {
            let mut lead = Lead::new(LeadId::generate(), new_lead(initial), at(0));
            prop_assert_eq!(lead.closed_at.is_some(), lead.status.is_closed());

            for (hour, changes) in updates.iter().enumerate() {
                let now = at(u32::try_from(hour % 23).unwrap() + 1);
                lead = lead.apply(changes, now);
                prop_assert_eq!(lead.closed_at.is_some(), lead.status.is_closed());
            }
        }

        #[test]
        fn prop_both_write_paths_agree(
            initial in status_strategy(),
            changes in changes_strategy(),
        ) {
            let lead = Lead::new(LeadId::generate(), new_lead(initial), at(1));
            let full = lead.apply(&changes, at(2));
            let partial = LeadChangeSet::from_changes(changes, at(2)).apply_to(&lead);
            prop_assert_eq!(full, partial);
        }
    }
}
