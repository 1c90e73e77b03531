use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use self::{reconstruct::ReconstructArg, summarize::SummarizeArg};

mod reconstruct;
mod summarize;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// Enable debug logging (overridden by `RUST_LOG`)
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Assign groups to sessions, reconstructing missing ones, and write a JSON report
    Reconstruct(#[clap(flatten)] ReconstructArg),
    /// Print group assignment totals for a batch of sessions
    Summarize(#[clap(flatten)] SummarizeArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    init_logging(args.verbose);
    match args.mode {
        Mode::Reconstruct(arg) => reconstruct::run(&arg)?,
        Mode::Summarize(arg) => summarize::run(&arg)?,
    }
    Ok(())
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
