//! Flat, exportable per-session rows.

use lumiere_reconstruction::{AssignmentSource, GroupAssignment};
use lumiere_session::{Group, SessionId, Variety};
use serde::Serialize;

use crate::metrics::EventMetrics;

/// One output row per session.
///
/// `group_source` keeps explicit, reconstructed and unresolved sessions apart;
/// consumers must not merge them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssignmentRecord {
    pub session_id: SessionId,
    pub group: Option<Group>,
    pub group_source: AssignmentSource,
    pub variety: Option<Variety>,
    pub ar_enabled: Option<bool>,
    /// Set when AR was read as absent for lack of evidence.
    pub ar_defaulted: bool,
    pub dropped_events: usize,
    /// Audit trail, for reconstructed and unresolved sessions.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub rationale: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metrics: Option<EventMetrics>,
}

impl AssignmentRecord {
    #[must_use]
    pub fn new(assignment: &GroupAssignment) -> Self {
        let group = assignment.group();
        let result = assignment.result();
        Self {
            session_id: assignment.session_id().clone(),
            group,
            group_source: assignment.source(),
            variety: group.map(Group::variety),
            ar_enabled: group.map(|g| g.ar().is_present()),
            ar_defaulted: result.is_some_and(|r| r.ar_default_applied()),
            dropped_events: result.map_or(0, |r| r.dropped_events()),
            rationale: result.map(|r| r.rationale_lines()).unwrap_or_default(),
            metrics: None,
        }
    }

    #[must_use]
    pub fn with_metrics(mut self, metrics: EventMetrics) -> Self {
        self.metrics = Some(metrics);
        self
    }
}

impl From<&GroupAssignment> for AssignmentRecord {
    fn from(assignment: &GroupAssignment) -> Self {
        Self::new(assignment)
    }
}
