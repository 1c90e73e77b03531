//! Signal extractors: one independent evidentiary rule each.
//!
//! Each extractor inspects the normalized [`EventLog`] of one session and either
//! emits a single [`Signal`] on its axis or nothing at all. Extractors never see
//! each other's output; all cross-rule precedence lives in the
//! [`arbiter`](crate::arbiter).
//!
//! # Rules
//!
//! | rule | axis | tier | emits |
//! |---|---|---|---|
//! | [`rules::ArEvents`] | ar | definitive | `present` if any `ar_start`/`ar_end` |
//! | [`rules::ExclusiveProduct`] | variety | definitive | `high` if an exclusive product was viewed |
//! | [`rules::ProductCount`] | variety | definitive | `high` above the low-variety count, `low` for 1..=count |
//! | [`rules::ScrollTiming`] | variety | indicative | `low` on a fast first gallery scroll |
//!
//! Rules are one-directional where the evidence is: no AR events is not proof
//! that AR was absent, and viewing no exclusive product is not proof of low
//! variety, so those rules emit nothing rather than the opposite value.

use std::fmt;

use lumiere_session::EventLog;

use crate::{
    config::EngineConfig,
    signal::{Axis, Signal, SignalSource, SignalValue, Tier},
};

pub mod rules;

/// Returns every extractor, in rationale order.
#[must_use]
pub fn all_signal_extractors() -> Vec<BoxedSignalExtractor> {
    vec![
        Box::new(rules::ArEvents),
        Box::new(rules::ExclusiveProduct),
        Box::new(rules::ProductCount),
        Box::new(rules::ScrollTiming),
    ]
}

pub trait SignalExtractor: fmt::Debug + Send + Sync {
    #[must_use]
    fn source(&self) -> SignalSource;

    #[must_use]
    fn axis(&self) -> Axis;

    #[must_use]
    fn tier(&self) -> Tier;

    #[must_use]
    fn clone_boxed(&self) -> BoxedSignalExtractor;

    /// Inspects `log` and returns this rule's vote, if its evidence applies.
    #[must_use]
    fn extract(&self, log: &EventLog, config: &EngineConfig) -> Option<Signal>;

    #[must_use]
    fn id(&self) -> &'static str {
        self.source().id()
    }

    #[must_use]
    fn name(&self) -> &'static str {
        self.source().name()
    }

    /// Builds a signal attributed to this extractor.
    #[must_use]
    fn signal(&self, value: SignalValue, detail: String) -> Signal {
        debug_assert_eq!(value.axis(), self.axis());
        Signal::new(value, self.tier(), self.source(), detail)
    }
}

pub type BoxedSignalExtractor = Box<dyn SignalExtractor>;

impl Clone for BoxedSignalExtractor {
    fn clone(&self) -> Self {
        self.clone_boxed()
    }
}

impl SignalExtractor for BoxedSignalExtractor {
    fn source(&self) -> SignalSource {
        self.as_ref().source()
    }

    fn axis(&self) -> Axis {
        self.as_ref().axis()
    }

    fn tier(&self) -> Tier {
        self.as_ref().tier()
    }

    fn clone_boxed(&self) -> BoxedSignalExtractor {
        self.as_ref().clone_boxed()
    }

    fn extract(&self, log: &EventLog, config: &EngineConfig) -> Option<Signal> {
        self.as_ref().extract(log, config)
    }
}

/// Runs every extractor over `log`, keeping extractor order.
#[must_use]
pub fn extract_all(
    extractors: &[BoxedSignalExtractor],
    log: &EventLog,
    config: &EngineConfig,
) -> Vec<Signal> {
    extractors
        .iter()
        .filter_map(|extractor| extractor.extract(log, config))
        .collect()
}
