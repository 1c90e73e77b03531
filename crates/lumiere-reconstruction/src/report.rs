//! Reconstruction output and its audit trail.

use std::fmt;

use lumiere_session::{ArPresence, Group, SessionId, Variety};
use serde::Serialize;

use crate::{
    arbiter::{self, AxisOutcome},
    mapper::{self, ArBasis},
    signal::{Axis, Signal},
};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, derive_more::Display, derive_more::IsVariant,
)]
#[serde(rename_all = "snake_case")]
pub enum ResultStatus {
    #[display("reconstructed")]
    Reconstructed,
    #[display("unresolved")]
    Unresolved,
}

/// One line of the rationale trail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "entry", rename_all = "snake_case")]
pub enum RationaleEntry {
    /// A signal emitted by an extractor.
    Signal { signal: Signal },
    /// How an axis resolved.
    Axis { axis: Axis, outcome: AxisOutcome },
    /// AR had no evidence and was read as absent.
    ArAbsentDefault,
}

impl fmt::Display for RationaleEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Signal { signal } => write!(f, "signal {signal}"),
            Self::Axis { axis, outcome } => write!(f, "{axis} {outcome}"),
            Self::ArAbsentDefault => {
                f.write_str("ar defaulted to absent: no AR signal fired (not evidence of absence)")
            }
        }
    }
}

/// The engine's verdict for one session.
///
/// Immutable once built. Two results compare equal exactly when the session,
/// the signals and every decision derived from them are equal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReconstructionResult {
    session_id: SessionId,
    status: ResultStatus,
    group: Option<Group>,
    variety: AxisOutcome,
    ar: AxisOutcome,
    ar_default_applied: bool,
    dropped_events: usize,
    rationale: Vec<RationaleEntry>,
}

impl ReconstructionResult {
    /// Arbitrates `signals` (in extractor order) and maps the outcome to a group.
    #[must_use]
    pub fn from_signals(session_id: SessionId, signals: Vec<Signal>, dropped_events: usize) -> Self {
        let arbitration = arbiter::arbitrate(&signals);
        let mapping = mapper::map_group(&arbitration.variety, &arbitration.ar);
        let ar_default_applied = mapping.is_some_and(|m| m.ar_basis.is_absent_default());

        let mut rationale = signals
            .into_iter()
            .map(|signal| RationaleEntry::Signal { signal })
            .collect::<Vec<_>>();
        rationale.push(RationaleEntry::Axis {
            axis: Axis::Variety,
            outcome: arbitration.variety.clone(),
        });
        rationale.push(RationaleEntry::Axis {
            axis: Axis::Ar,
            outcome: arbitration.ar.clone(),
        });
        if ar_default_applied {
            rationale.push(RationaleEntry::ArAbsentDefault);
        }

        let group = mapping.map(|m| m.group);
        Self {
            session_id,
            status: if group.is_some() {
                ResultStatus::Reconstructed
            } else {
                ResultStatus::Unresolved
            },
            group,
            variety: arbitration.variety,
            ar: arbitration.ar,
            ar_default_applied,
            dropped_events,
            rationale,
        }
    }

    #[must_use]
    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    #[must_use]
    pub fn status(&self) -> ResultStatus {
        self.status
    }

    /// Reconstructed group, or `None` when unresolved.
    #[must_use]
    pub fn group(&self) -> Option<Group> {
        self.group
    }

    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.group.is_some()
    }

    #[must_use]
    pub fn variety_outcome(&self) -> &AxisOutcome {
        &self.variety
    }

    #[must_use]
    pub fn ar_outcome(&self) -> &AxisOutcome {
        &self.ar
    }

    /// Winning variety signal, if the variety axis resolved.
    #[must_use]
    pub fn variety_decision(&self) -> Option<&Signal> {
        self.variety.signal()
    }

    /// Winning AR signal. `None` also when AR was defaulted to absent.
    #[must_use]
    pub fn ar_decision(&self) -> Option<&Signal> {
        self.ar.signal()
    }

    #[must_use]
    pub fn ar_default_applied(&self) -> bool {
        self.ar_default_applied
    }

    #[must_use]
    pub fn ar_basis(&self) -> Option<ArBasis> {
        self.group?;
        Some(if self.ar_default_applied {
            ArBasis::AbsentDefault
        } else {
            ArBasis::Observed
        })
    }

    /// Condition of the reconstructed group.
    #[must_use]
    pub fn condition(&self) -> Option<(Variety, ArPresence)> {
        self.group.map(|g| (g.variety(), g.ar()))
    }

    /// Malformed events dropped while normalizing the session's log.
    #[must_use]
    pub fn dropped_events(&self) -> usize {
        self.dropped_events
    }

    /// Every signal emitted, in extractor order.
    pub fn signals(&self) -> impl Iterator<Item = &Signal> {
        self.rationale.iter().filter_map(|entry| match entry {
            RationaleEntry::Signal { signal } => Some(signal),
            _ => None,
        })
    }

    #[must_use]
    pub fn rationale(&self) -> &[RationaleEntry] {
        &self.rationale
    }

    #[must_use]
    pub fn rationale_lines(&self) -> Vec<String> {
        self.rationale.iter().map(ToString::to_string).collect()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::{
        arbiter::UnresolvedReason,
        signal::{SignalSource, SignalValue, Tier},
    };

    fn signal(value: SignalValue, tier: Tier, source: SignalSource, detail: &str) -> Signal {
        Signal::new(value, tier, source, detail.to_owned())
    }

    #[test]
    fn test_absent_default_is_recorded_last() {
        let signals = vec![signal(
            SignalValue::Variety(Variety::High),
            Tier::Definitive,
            SignalSource::ProductCount,
            "7 unique product(s) viewed, more than 5",
        )];
        let result = ReconstructionResult::from_signals(SessionId::from("s"), signals, 0);
        assert_eq!(result.group(), Some(Group::THREE));
        assert_eq!(result.status(), ResultStatus::Reconstructed);
        assert!(result.ar_default_applied());
        assert_eq!(result.ar_decision(), None);
        assert_eq!(result.ar_basis(), Some(ArBasis::AbsentDefault));
        assert_eq!(
            result.rationale_lines(),
            [
                "signal [definitive] product_count -> variety=high: 7 unique product(s) viewed, more than 5",
                "variety resolved to high by product_count (definitive)",
                "ar unresolved (no_evidence)",
                "ar defaulted to absent: no AR signal fired (not evidence of absence)",
            ]
        );
    }

    #[test]
    fn test_unresolved_variety_reports_both_axes() {
        let signals = vec![signal(
            SignalValue::Ar(ArPresence::Present),
            Tier::Definitive,
            SignalSource::ArEvents,
            "1 AR viewer event(s) recorded",
        )];
        let result = ReconstructionResult::from_signals(SessionId::from("s"), signals, 2);
        assert_eq!(result.group(), None);
        assert_eq!(result.status(), ResultStatus::Unresolved);
        assert!(!result.ar_default_applied());
        assert_eq!(result.ar_basis(), None);
        assert_eq!(
            result.ar_decision().map(Signal::source),
            Some(SignalSource::ArEvents)
        );
        assert_eq!(
            result.variety_outcome().unresolved_reason(),
            Some(UnresolvedReason::NoEvidence)
        );
        assert_eq!(result.dropped_events(), 2);
        assert_eq!(result.rationale().len(), 3);
        assert_eq!(result.signals().count(), 1);
    }

    #[test]
    fn test_result_json() {
        let signals = vec![
            signal(
                SignalValue::Ar(ArPresence::Present),
                Tier::Definitive,
                SignalSource::ArEvents,
                "1 AR viewer event(s) recorded",
            ),
            signal(
                SignalValue::Variety(Variety::High),
                Tier::Definitive,
                SignalSource::ExclusiveProduct,
                "viewed high-variety-exclusive product(s) 9",
            ),
        ];
        let result = ReconstructionResult::from_signals(SessionId::from("s-9"), signals, 0);
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["session_id"], json!("s-9"));
        assert_eq!(value["status"], json!("reconstructed"));
        assert_eq!(value["group"], json!(4));
        assert_eq!(value["variety"]["status"], json!("resolved"));
        assert_eq!(value["variety"]["signal"]["source"], json!("exclusive_product"));
        assert_eq!(value["ar_default_applied"], json!(false));
        assert_eq!(value["rationale"][0]["entry"], json!("signal"));
        assert_eq!(value["rationale"][2]["entry"], json!("axis"));
        assert_eq!(value["rationale"][2]["axis"], json!("variety"));
        assert_eq!(value["rationale"].as_array().unwrap().len(), 4);
    }
}
