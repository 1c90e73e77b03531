use std::path::PathBuf;

use lumiere_analysis::summary::BatchSummary;

use crate::util::{self, Output};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct SummarizeArg {
    /// Session documents (a JSON array, or an object with a `sessions` array)
    sessions: PathBuf,
    /// Engine configuration file
    #[arg(long)]
    config: PathBuf,
    /// Print the summary as JSON
    #[arg(long)]
    json: bool,
    /// Leave out sessions recorded with `debug_mode` on
    #[arg(long)]
    exclude_debug: bool,
}

pub(crate) fn run(arg: &SummarizeArg) -> anyhow::Result<()> {
    let engine = util::load_engine(&arg.config)?;
    let mut sessions = util::read_sessions_file(&arg.sessions)?;
    if arg.exclude_debug {
        sessions = util::exclude_debug_sessions(sessions);
    }
    let summary = BatchSummary::from_assignments(&engine.assign_all(&sessions));

    if arg.json {
        Output::stdout().write_json(&summary)?;
    } else {
        print!("{summary}");
    }
    Ok(())
}
