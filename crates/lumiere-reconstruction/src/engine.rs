use std::{num::NonZeroUsize, thread};

use lumiere_session::{EventLog, Session, SessionId};

use crate::{
    assignment::GroupAssignment,
    config::{ConfigError, EngineConfig},
    extractor::{self, BoxedSignalExtractor},
    report::ReconstructionResult,
};

/// Reconstructs experimental groups from session event logs.
///
/// The engine holds only immutable configuration and is `Send + Sync`, so one
/// instance can serve any number of threads.
#[derive(Debug, Clone)]
pub struct ReconstructionEngine {
    config: EngineConfig,
    extractors: Vec<BoxedSignalExtractor>,
}

impl ReconstructionEngine {
    /// Builds an engine running every signal extractor.
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            extractors: extractor::all_signal_extractors(),
        })
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[must_use]
    pub fn extractors(&self) -> &[BoxedSignalExtractor] {
        &self.extractors
    }

    /// Infers the group of `session` from its events.
    ///
    /// Always runs the extractors, whether or not the session carries a group
    /// label. Use [`assign`](Self::assign) to honor an existing label.
    #[must_use]
    pub fn reconstruct(&self, session: &Session) -> ReconstructionResult {
        let log = session.event_log();
        if log.dropped() > 0 {
            tracing::warn!(
                session_id = %session.session_id(),
                dropped = log.dropped(),
                "dropped malformed events"
            );
        }
        self.reconstruct_log(session.session_id().clone(), &log)
    }

    /// Infers a group from an already normalized log.
    #[must_use]
    pub fn reconstruct_log(&self, session_id: SessionId, log: &EventLog) -> ReconstructionResult {
        let signals = extractor::extract_all(&self.extractors, log, &self.config);
        let result = ReconstructionResult::from_signals(session_id, signals, log.dropped());
        tracing::debug!(
            session_id = %result.session_id(),
            status = %result.status(),
            group = ?result.group().map(|g| g.get()),
            variety = %result.variety_outcome(),
            ar = %result.ar_outcome(),
            "reconstructed session"
        );
        result
    }

    /// Returns the session's group, reconstructing it only when no valid
    /// label is stored.
    ///
    /// A stored label outside the study's groups is ignored (and logged); the
    /// session is then reconstructed like an unlabeled one.
    #[must_use]
    pub fn assign(&self, session: &Session) -> GroupAssignment {
        match session.explicit_group() {
            Ok(Some(group)) => {
                return GroupAssignment::Explicit {
                    session_id: session.session_id().clone(),
                    group,
                };
            }
            Ok(None) => {}
            Err(error) => {
                tracing::warn!(
                    session_id = %session.session_id(),
                    %error,
                    "ignoring invalid stored group"
                );
            }
        }
        GroupAssignment::from_result(self.reconstruct(session))
    }

    /// [`reconstruct`](Self::reconstruct) over many sessions in parallel.
    /// Results keep the input order.
    #[must_use]
    pub fn reconstruct_all(&self, sessions: &[Session]) -> Vec<ReconstructionResult> {
        par_map(sessions, |session| self.reconstruct(session))
    }

    /// [`assign`](Self::assign) over many sessions in parallel. Results keep
    /// the input order.
    #[must_use]
    pub fn assign_all(&self, sessions: &[Session]) -> Vec<GroupAssignment> {
        par_map(sessions, |session| self.assign(session))
    }
}

fn par_map<T, R, F>(items: &[T], f: F) -> Vec<R>
where
    T: Sync,
    R: Send,
    F: Fn(&T) -> R + Sync,
{
    if items.is_empty() {
        return vec![];
    }
    let workers = thread::available_parallelism().map_or(1, NonZeroUsize::get);
    let chunk_size = items.len().div_ceil(workers);

    let mut slots = items.iter().map(|_| None).collect::<Vec<Option<R>>>();
    thread::scope(|s| {
        for (inputs, outputs) in items.chunks(chunk_size).zip(slots.chunks_mut(chunk_size)) {
            let f = &f;
            s.spawn(move || {
                for (item, slot) in inputs.iter().zip(outputs) {
                    *slot = Some(f(item));
                }
            });
        }
    });
    slots.into_iter().flatten().collect()
}
