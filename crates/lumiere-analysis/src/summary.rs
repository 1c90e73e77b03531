//! Batch-level totals over group assignments.

use std::{collections::BTreeMap, fmt};

use lumiere_reconstruction::GroupAssignment;
use lumiere_session::{Group, SessionId};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub total_sessions: usize,
    pub explicit: usize,
    pub reconstructed: usize,
    pub unresolved: usize,
    /// Sessions per group, explicit and reconstructed together.
    pub group_distribution: BTreeMap<Group, usize>,
    /// Sessions per group, reconstructed only.
    pub reconstructed_distribution: BTreeMap<Group, usize>,
    /// Malformed events dropped across all reconstructed sessions.
    pub dropped_events: usize,
    /// Sessions needing manual review, in input order.
    pub unresolved_sessions: Vec<SessionId>,
}

impl BatchSummary {
    pub fn from_assignments<'a, I>(assignments: I) -> Self
    where
        I: IntoIterator<Item = &'a GroupAssignment>,
    {
        let empty_distribution = || Group::ALL.into_iter().map(|g| (g, 0)).collect();
        let mut summary = Self {
            total_sessions: 0,
            explicit: 0,
            reconstructed: 0,
            unresolved: 0,
            group_distribution: empty_distribution(),
            reconstructed_distribution: empty_distribution(),
            dropped_events: 0,
            unresolved_sessions: vec![],
        };

        for assignment in assignments {
            summary.total_sessions += 1;
            if let Some(result) = assignment.result() {
                summary.dropped_events += result.dropped_events();
            }
            match assignment {
                GroupAssignment::Explicit { group, .. } => {
                    summary.explicit += 1;
                    *summary.group_distribution.entry(*group).or_default() += 1;
                }
                GroupAssignment::Reconstructed(result) => {
                    summary.reconstructed += 1;
                    if let Some(group) = result.group() {
                        *summary.group_distribution.entry(group).or_default() += 1;
                        *summary.reconstructed_distribution.entry(group).or_default() += 1;
                    }
                }
                GroupAssignment::Unresolved(result) => {
                    summary.unresolved += 1;
                    summary.unresolved_sessions.push(result.session_id().clone());
                }
            }
        }
        summary
    }

    /// Share of sessions without an explicit group that were reconstructed.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn recovery_rate(&self) -> Option<f64> {
        let attempted = self.reconstructed + self.unresolved;
        (attempted > 0).then(|| self.reconstructed as f64 / attempted as f64)
    }
}

impl fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Sessions: {}", self.total_sessions)?;
        writeln!(f, "  explicit group:      {}", self.explicit)?;
        writeln!(f, "  reconstructed group: {}", self.reconstructed)?;
        writeln!(f, "  unresolved:          {}", self.unresolved)?;
        if let Some(rate) = self.recovery_rate() {
            writeln!(f, "  recovery rate:       {:.1}%", rate * 100.0)?;
        }
        writeln!(f, "  dropped events:      {}", self.dropped_events)?;
        writeln!(f)?;
        writeln!(f, "Group distribution (reconstructed in parentheses):")?;
        for (group, count) in &self.group_distribution {
            let reconstructed = self
                .reconstructed_distribution
                .get(group)
                .copied()
                .unwrap_or_default();
            writeln!(
                f,
                "  {group} {:<24} {count:>5} ({reconstructed})",
                group.label()
            )?;
        }
        if !self.unresolved_sessions.is_empty() {
            writeln!(f)?;
            writeln!(f, "Unresolved sessions:")?;
            for session_id in &self.unresolved_sessions {
                writeln!(f, "  {session_id}")?;
            }
        }
        Ok(())
    }
}
