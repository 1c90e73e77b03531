//! Session documents.

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{
    event::RawEvent,
    group::{Group, GroupError},
    log::EventLog,
    timestamp,
};

/// Opaque session identity.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::From,
)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SessionId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

/// One participant's run through the experiment.
///
/// Only `session_id`, `group` and `events` are interpreted. Every other field
/// of the stored document (`final_cart`, `pid`, `survey`, ...) is kept as-is so
/// that a session written back out is unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    session_id: SessionId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    group: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    events: Option<Vec<RawEvent>>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl Session {
    #[must_use]
    pub fn new(session_id: impl Into<SessionId>) -> Self {
        Self {
            session_id: session_id.into(),
            group: None,
            events: None,
            extra: Map::new(),
        }
    }

    #[must_use]
    pub fn with_group(mut self, group: Group) -> Self {
        self.group = Some(Value::from(group.get()));
        self
    }

    #[must_use]
    pub fn with_events(mut self, events: Vec<RawEvent>) -> Self {
        self.events = Some(events);
        self
    }

    #[must_use]
    pub fn with_field(mut self, key: &str, value: Value) -> Self {
        self.extra.insert(key.to_owned(), value);
        self
    }

    #[must_use]
    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    /// The stored `group` value, if any, exactly as written.
    #[must_use]
    pub fn raw_group(&self) -> Option<&Value> {
        self.group.as_ref()
    }

    /// The explicit group label.
    ///
    /// `Ok(None)` when no label was stored; `Err` when a label was stored but
    /// is not a valid group.
    pub fn explicit_group(&self) -> Result<Option<Group>, GroupError> {
        self.group.as_ref().map(Group::from_json).transpose()
    }

    #[must_use]
    pub fn raw_events(&self) -> &[RawEvent] {
        self.events.as_deref().unwrap_or_default()
    }

    /// Builds the normalized event log for this session.
    #[must_use]
    pub fn event_log(&self) -> EventLog {
        EventLog::from_raw(self.raw_events())
    }

    /// Pass-through fields not interpreted by this crate.
    #[must_use]
    pub fn extra(&self) -> &Map<String, Value> {
        &self.extra
    }

    #[must_use]
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.extra.get("started_at").and_then(timestamp::datetime_from_json)
    }

    #[must_use]
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.extra
            .get("completed_at")
            .and_then(timestamp::datetime_from_json)
    }

    /// Wall-clock time between `started_at` and `completed_at`.
    ///
    /// `None` for incomplete sessions and for sessions whose completion is
    /// stamped before their start.
    #[must_use]
    pub fn duration(&self) -> Option<TimeDelta> {
        let duration = self.completed_at()? - self.started_at()?;
        (duration >= TimeDelta::zero()).then_some(duration)
    }

    #[must_use]
    pub fn duration_ms(&self) -> Option<u64> {
        u64::try_from(self.duration()?.num_milliseconds()).ok()
    }

    /// Whether the session was recorded with the client's debug mode on.
    ///
    /// A missing or non-boolean `debug_mode` reads as `false`.
    #[must_use]
    pub fn is_debug(&self) -> bool {
        self.extra.get("debug_mode").and_then(Value::as_bool) == Some(true)
    }
}
