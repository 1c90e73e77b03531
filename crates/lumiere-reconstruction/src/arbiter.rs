//! Per-axis resolution of extracted signals.
//!
//! Each axis is resolved on its own:
//!
//! 1. no signal on the axis: unresolved ([`UnresolvedReason::NoEvidence`])
//! 2. definitive signals exist: they decide alone; if they disagree the axis is
//!    unresolved ([`UnresolvedReason::DefinitiveConflict`]) and indicative
//!    signals are not consulted
//! 3. only indicative signals: they decide if they all agree, otherwise
//!    unresolved ([`UnresolvedReason::IndicativeConflict`])
//!
//! Conflicts are never broken in favor of one rule. The winning signal is the
//! first one, in extractor order, carrying the winning value at the deciding
//! tier.

use std::fmt;

use lumiere_session::{ArPresence, Variety};
use serde::Serialize;

use crate::signal::{Axis, Signal, SignalValue, Tier};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, derive_more::Display, derive_more::IsVariant,
)]
#[serde(rename_all = "snake_case")]
pub enum UnresolvedReason {
    #[display("no_evidence")]
    NoEvidence,
    #[display("definitive_conflict")]
    DefinitiveConflict,
    #[display("indicative_conflict")]
    IndicativeConflict,
}

/// Resolution of one axis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, derive_more::IsVariant)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AxisOutcome {
    Resolved { signal: Signal },
    Unresolved { reason: UnresolvedReason },
}

impl AxisOutcome {
    /// The winning signal, if the axis resolved.
    #[must_use]
    pub fn signal(&self) -> Option<&Signal> {
        match self {
            Self::Resolved { signal } => Some(signal),
            Self::Unresolved { .. } => None,
        }
    }

    #[must_use]
    pub fn unresolved_reason(&self) -> Option<UnresolvedReason> {
        match self {
            Self::Resolved { .. } => None,
            Self::Unresolved { reason } => Some(*reason),
        }
    }

    #[must_use]
    pub fn value(&self) -> Option<SignalValue> {
        self.signal().map(Signal::value)
    }

    #[must_use]
    pub fn variety(&self) -> Option<Variety> {
        self.value().and_then(SignalValue::as_variety)
    }

    #[must_use]
    pub fn ar(&self) -> Option<ArPresence> {
        self.value().and_then(SignalValue::as_ar)
    }
}

impl fmt::Display for AxisOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Resolved { signal } => {
                let value = signal.value();
                let value: &dyn fmt::Display = match &value {
                    SignalValue::Variety(v) => v,
                    SignalValue::Ar(ar) => ar,
                };
                write!(
                    f,
                    "resolved to {value} by {} ({})",
                    signal.source(),
                    signal.tier()
                )
            }
            Self::Unresolved { reason } => write!(f, "unresolved ({reason})"),
        }
    }
}

/// Both axis outcomes for one session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Arbitration {
    pub variety: AxisOutcome,
    pub ar: AxisOutcome,
}

#[must_use]
pub fn arbitrate(signals: &[Signal]) -> Arbitration {
    Arbitration {
        variety: resolve_axis(Axis::Variety, signals),
        ar: resolve_axis(Axis::Ar, signals),
    }
}

/// Resolves `axis` from every signal in `signals` that votes on it.
///
/// `signals` must be in extractor order; signals on other axes are ignored.
#[must_use]
pub fn resolve_axis(axis: Axis, signals: &[Signal]) -> AxisOutcome {
    let on_tier = |tier: Tier| {
        signals
            .iter()
            .filter(move |s| s.axis() == axis && s.tier() == tier)
            .collect::<Vec<_>>()
    };

    let definitive = on_tier(Tier::Definitive);
    if !definitive.is_empty() {
        return decide(&definitive, UnresolvedReason::DefinitiveConflict);
    }
    let indicative = on_tier(Tier::Indicative);
    if !indicative.is_empty() {
        return decide(&indicative, UnresolvedReason::IndicativeConflict);
    }
    AxisOutcome::Unresolved {
        reason: UnresolvedReason::NoEvidence,
    }
}

fn decide(candidates: &[&Signal], conflict: UnresolvedReason) -> AxisOutcome {
    let Some((first, rest)) = candidates.split_first() else {
        return AxisOutcome::Unresolved {
            reason: UnresolvedReason::NoEvidence,
        };
    };
    if rest.iter().all(|s| s.value() == first.value()) {
        AxisOutcome::Resolved {
            signal: (*first).clone(),
        }
    } else {
        AxisOutcome::Unresolved { reason: conflict }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::signal::SignalSource;

    fn variety(value: Variety, tier: Tier, source: SignalSource) -> Signal {
        Signal::new(SignalValue::Variety(value), tier, source, String::new())
    }

    fn ar_present() -> Signal {
        Signal::new(
            SignalValue::Ar(ArPresence::Present),
            Tier::Definitive,
            SignalSource::ArEvents,
            String::new(),
        )
    }

    #[test]
    fn test_no_signals() {
        let arbitration = arbitrate(&[]);
        assert_eq!(
            arbitration.variety.unresolved_reason(),
            Some(UnresolvedReason::NoEvidence)
        );
        assert_eq!(
            arbitration.ar.unresolved_reason(),
            Some(UnresolvedReason::NoEvidence)
        );
    }

    #[test]
    fn test_definitive_beats_indicative() {
        let signals = [
            variety(Variety::High, Tier::Definitive, SignalSource::ExclusiveProduct),
            variety(Variety::Low, Tier::Indicative, SignalSource::ScrollTiming),
        ];
        let outcome = resolve_axis(Axis::Variety, &signals);
        assert_eq!(outcome.variety(), Some(Variety::High));
        assert_eq!(
            outcome.signal().map(Signal::source),
            Some(SignalSource::ExclusiveProduct)
        );
    }

    #[test]
    fn test_agreeing_definitive_signals_pick_first() {
        let signals = [
            variety(Variety::High, Tier::Definitive, SignalSource::ExclusiveProduct),
            variety(Variety::High, Tier::Definitive, SignalSource::ProductCount),
        ];
        let outcome = resolve_axis(Axis::Variety, &signals);
        assert_eq!(
            outcome.signal().map(Signal::source),
            Some(SignalSource::ExclusiveProduct)
        );
    }

    #[test]
    fn test_definitive_conflict_is_not_broken() {
        let signals = [
            variety(Variety::High, Tier::Definitive, SignalSource::ExclusiveProduct),
            variety(Variety::Low, Tier::Definitive, SignalSource::ProductCount),
            variety(Variety::Low, Tier::Indicative, SignalSource::ScrollTiming),
        ];
        let outcome = resolve_axis(Axis::Variety, &signals);
        assert_eq!(
            outcome,
            AxisOutcome::Unresolved {
                reason: UnresolvedReason::DefinitiveConflict
            }
        );
    }

    #[test]
    fn test_indicative_only() {
        let agree = [
            variety(Variety::Low, Tier::Indicative, SignalSource::ScrollTiming),
            variety(Variety::Low, Tier::Indicative, SignalSource::ScrollTiming),
        ];
        assert_eq!(
            resolve_axis(Axis::Variety, &agree).variety(),
            Some(Variety::Low)
        );

        let disagree = [
            variety(Variety::Low, Tier::Indicative, SignalSource::ScrollTiming),
            variety(Variety::High, Tier::Indicative, SignalSource::ScrollTiming),
        ];
        assert_eq!(
            resolve_axis(Axis::Variety, &disagree).unresolved_reason(),
            Some(UnresolvedReason::IndicativeConflict)
        );
    }

    #[test]
    fn test_axes_are_independent() {
        let signals = [
            ar_present(),
            variety(Variety::High, Tier::Definitive, SignalSource::ExclusiveProduct),
            variety(Variety::Low, Tier::Definitive, SignalSource::ProductCount),
        ];
        let arbitration = arbitrate(&signals);
        assert_eq!(arbitration.ar.ar(), Some(ArPresence::Present));
        assert!(arbitration.variety.is_unresolved());
    }

    #[test]
    fn test_outcome_display_and_json() {
        let resolved = resolve_axis(Axis::Ar, &[ar_present()]);
        assert_eq!(
            resolved.to_string(),
            "resolved to present by ar_events (definitive)"
        );
        let unresolved = resolve_axis(Axis::Variety, &[ar_present()]);
        assert_eq!(unresolved.to_string(), "unresolved (no_evidence)");
        assert_eq!(
            serde_json::to_value(&unresolved).unwrap(),
            json!({"status": "unresolved", "reason": "no_evidence"})
        );
        assert_eq!(
            serde_json::to_value(&resolved).unwrap()["status"],
            json!("resolved")
        );
    }
}
