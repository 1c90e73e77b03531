//! Session data model for the Lumiere shopping study.
//!
//! The study is a 2×2 factorial design (product variety × augmented reality).
//! Every participant run is stored as a session document holding an optional
//! group label and an event log written by the shop client.
//!
//! # Overview
//!
//! - [`Session`] - a stored session document; unknown fields pass through untouched
//! - [`RawEvent`] / [`Event`] - an event as stored, and its validated, typed form
//! - [`EventLog`] - the time-ordered view over a session's valid events
//! - [`Group`], [`Variety`], [`ArPresence`] - the four groups and the condition each encodes
//! - [`timestamp`] - normalization of the time shapes the document store produces
//!
//! # Normalization
//!
//! ```text
//! session.events (as stored)
//!     ↓ drop malformed (no kind, unparsable t), count them
//!     ↓ stable sort by t
//! EventLog
//! ```
//!
//! Normalization never fails: a session whose events are all malformed simply
//! yields an empty log with a non-zero [`EventLog::dropped`] count.
//!
//! # Example
//!
//! ```
//! use lumiere_session::{EventKind, Session};
//! use serde_json::json;
//!
//! let session: Session = serde_json::from_value(json!({
//!     "session_id": "abc",
//!     "events": [
//!         {"t": 900, "e": "scroll"},
//!         {"t": 0, "e": "view_page", "p": "gallery"},
//!         {"t": "??", "e": "scroll"},
//!     ],
//! }))
//! .unwrap();
//!
//! let log = session.event_log();
//! assert_eq!(log.len(), 2);
//! assert_eq!(log.dropped(), 1);
//! let gallery = log.first_page_view("gallery").unwrap();
//! let scroll = log.first_event_after_event(&EventKind::Scroll, gallery).unwrap();
//! assert_eq!(scroll.t() - gallery.t(), 900);
//! ```

pub use self::{
    event::{Event, EventKind, MalformedEvent, ProductId, RawEvent},
    group::{ArPresence, Group, GroupError, Variety},
    log::EventLog,
    session::{Session, SessionId},
};

pub mod event;
pub mod group;
pub mod log;
pub mod session;
pub mod timestamp;
