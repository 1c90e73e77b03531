use std::path::PathBuf;

use chrono::{DateTime, Utc};
use lumiere_analysis::{metrics::EventMetrics, record::AssignmentRecord, summary::BatchSummary};
use serde::Serialize;

use crate::util::{self, Output};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct ReconstructArg {
    /// Session documents (a JSON array, or an object with a `sessions` array)
    sessions: PathBuf,
    /// Engine configuration file
    #[arg(long)]
    config: PathBuf,
    /// Output file path (stdout if omitted)
    #[arg(long)]
    output: Option<PathBuf>,
    /// Emit every session, not only those missing an explicit group
    #[arg(long)]
    all: bool,
    /// Leave out sessions recorded with `debug_mode` on
    #[arg(long)]
    exclude_debug: bool,
}

#[derive(Debug, Serialize)]
struct ReconstructionReport {
    generated_at: DateTime<Utc>,
    summary: BatchSummary,
    records: Vec<AssignmentRecord>,
}

pub(crate) fn run(arg: &ReconstructArg) -> anyhow::Result<()> {
    let engine = util::load_engine(&arg.config)?;
    let mut sessions = util::read_sessions_file(&arg.sessions)?;
    if arg.exclude_debug {
        sessions = util::exclude_debug_sessions(sessions);
    }

    let assignments = engine.assign_all(&sessions);
    let summary = BatchSummary::from_assignments(&assignments);
    tracing::info!(
        explicit = summary.explicit,
        reconstructed = summary.reconstructed,
        unresolved = summary.unresolved,
        dropped_events = summary.dropped_events,
        "assigned groups"
    );

    let records = sessions
        .iter()
        .zip(&assignments)
        .filter(|(_, assignment)| arg.all || !assignment.is_explicit())
        .map(|(session, assignment)| {
            AssignmentRecord::new(assignment)
                .with_metrics(EventMetrics::from_session(session))
        })
        .collect();

    let report = ReconstructionReport {
        generated_at: Utc::now(),
        summary,
        records,
    };
    Output::save_json(&report, arg.output.clone())
}
