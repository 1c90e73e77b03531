//! Group reconstruction for sessions that lost their group label.
//!
//! Each session of the study belongs to one of four groups (low/high product
//! variety × AR viewer absent/present). When the stored label is missing, this
//! crate infers the group from indirect evidence in the event log, or reports
//! the session as unresolved when the evidence is insufficient or
//! contradictory. It never guesses.
//!
//! # Pipeline
//!
//! ```text
//! Session
//!     ↓ normalize (lumiere_session::EventLog)
//! EventLog
//!     ↓ extract (one optional Signal per rule)
//! [Signal]
//!     ↓ arbitrate (per axis: definitive > indicative, conflicts stay unresolved)
//! (variety outcome, ar outcome)
//!     ↓ map (lookup table, AR absent-default)
//! ReconstructionResult
//! ```
//!
//! - [`extractor`] - the four evidentiary rules behind the [`SignalExtractor`] trait
//! - [`arbiter`] - per-axis precedence policy
//! - [`mapper`] - (variety, ar) → group lookup
//! - [`report`] - [`ReconstructionResult`] and its rationale trail
//! - [`engine`] - [`ReconstructionEngine`], the entry point
//!
//! # Evidence
//!
//! Signals are either *definitive* (decide the axis on their own) or
//! *indicative* (consulted only when no definitive signal exists). Rules assert
//! only what their evidence proves: seeing the AR viewer proves AR was
//! present, but not seeing it proves nothing. The group mapper therefore reads
//! an AR axis with no evidence as absent once variety is known, and records
//! that default in the rationale separately from observed evidence.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//!
//! use lumiere_reconstruction::{EngineConfig, ProductCatalog, ReconstructionEngine};
//! use lumiere_session::{Group, ProductId, Session};
//! use serde_json::json;
//!
//! let catalog = ProductCatalog::new(
//!     [1, 6, 10, 11, 14].map(ProductId::new),
//!     [2, 3, 4, 5, 7, 8, 9, 12, 13, 15].map(ProductId::new),
//! );
//! let engine = ReconstructionEngine::new(EngineConfig::new(catalog, Duration::from_secs(1)))?;
//!
//! let session: Session = serde_json::from_value(json!({
//!     "session_id": "abc",
//!     "events": [
//!         {"t": 0, "e": "view_page", "p": "gallery"},
//!         {"t": 1200, "e": "view_product", "p": 1},
//!         {"t": 1900, "e": "view_product", "p": 6},
//!         {"t": 2600, "e": "view_product", "p": 9},
//!         {"t": 3100, "e": "view_product", "p": 10},
//!         {"t": 3800, "e": "view_product", "p": 11},
//!         {"t": 4400, "e": "view_product", "p": 14},
//!         {"t": 5000, "e": "ar_start", "p": "9"},
//!     ],
//! }))?;
//!
//! let result = engine.reconstruct(&session);
//! assert_eq!(result.group(), Some(Group::FOUR));
//! for line in result.rationale_lines() {
//!     println!("{line}");
//! }
//!
//! // One exclusive product among five or fewer views is contradictory
//! // evidence, and contradictions are never broken.
//! let session: Session = serde_json::from_value(json!({
//!     "session_id": "def",
//!     "events": [{"t": 0, "e": "view_product", "p": 9}],
//! }))?;
//! assert_eq!(engine.reconstruct(&session).group(), None);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub use self::{
    arbiter::{AxisOutcome, UnresolvedReason},
    assignment::{AssignmentSource, GroupAssignment},
    config::{ConfigError, EngineConfig, ProductCatalog},
    engine::ReconstructionEngine,
    extractor::{BoxedSignalExtractor, SignalExtractor},
    mapper::ArBasis,
    report::{RationaleEntry, ReconstructionResult, ResultStatus},
    signal::{Axis, Signal, SignalSource, SignalValue, Tier},
};

pub mod arbiter;
pub mod assignment;
pub mod config;
pub mod engine;
pub mod extractor;
pub mod mapper;
pub mod report;
pub mod signal;
