//! Reporting helpers built on top of group reconstruction.
//!
//! The reconstruction engine answers "which group?" per session. This crate
//! turns those answers into the shapes the study's analysis consumes:
//!
//! - [`record::AssignmentRecord`] - one flat row per session, with the group,
//!   its source (explicit / reconstructed / unresolved) and the derived
//!   condition columns
//! - [`metrics::EventMetrics`] - behavioral counts from a session's event log
//! - [`summary::BatchSummary`] - totals and group distributions over a batch,
//!   plus the list of sessions left for manual review
//!
//! # Example
//!
//! ```no_run
//! use lumiere_analysis::{metrics::EventMetrics, record::AssignmentRecord, summary::BatchSummary};
//! use lumiere_reconstruction::ReconstructionEngine;
//! use lumiere_session::Session;
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! # let engine: ReconstructionEngine = todo!();
//! let sessions: Vec<Session> = vec![]; // Load from file
//!
//! let assignments = engine.assign_all(&sessions);
//! let records = sessions
//!     .iter()
//!     .zip(&assignments)
//!     .map(|(session, assignment)| {
//!         AssignmentRecord::new(assignment).with_metrics(EventMetrics::from_session(session))
//!     })
//!     .collect::<Vec<_>>();
//!
//! let summary = BatchSummary::from_assignments(&assignments);
//! println!("{summary}");
//! # Ok(())
//! # }
//! ```

pub mod metrics;
pub mod record;
pub mod summary;
