//! Raw and normalized session events.
//!
//! A [`RawEvent`] is exactly what the client wrote into the session document and
//! is kept verbatim so that sessions re-serialize unchanged. [`RawEvent::normalize`]
//! turns it into a typed [`Event`], or reports why it is malformed.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::timestamp;

/// Identifier of a product in the study catalog.
#[derive(
    Debug,
    Clone,
    Copy,
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
pub struct ProductId(u32);

impl ProductId {
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }

    /// Reads a product id from an event payload (`5` or `"5"`).
    ///
    /// Zero, negative and non-integral values are not product ids.
    #[must_use]
    pub fn from_payload(payload: &Value) -> Option<Self> {
        let id = match payload {
            Value::Number(n) => u32::try_from(n.as_u64()?).ok()?,
            Value::String(s) => s.trim().parse::<u32>().ok()?,
            _ => return None,
        };
        (id > 0).then_some(Self(id))
    }
}

/// Kind of an event (`e` field).
///
/// The vocabulary is open: kinds the reconstruction rules do not look at are
/// kept as [`EventKind::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display, derive_more::IsVariant)]
pub enum EventKind {
    #[display("view_page")]
    ViewPage,
    #[display("view_product")]
    ViewProduct,
    #[display("ar_start")]
    ArStart,
    #[display("ar_end")]
    ArEnd,
    #[display("scroll")]
    Scroll,
    #[display("{_0}")]
    Other(String),
}

impl EventKind {
    /// Parses an event kind name. Returns `None` for an empty name.
    ///
    /// `view` is the product-view kind written by early clients and is read as
    /// [`EventKind::ViewProduct`].
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let kind = match name.trim() {
            "" => return None,
            "view_page" => Self::ViewPage,
            "view_product" | "view" => Self::ViewProduct,
            "ar_start" => Self::ArStart,
            "ar_end" => Self::ArEnd,
            "scroll" => Self::Scroll,
            other => Self::Other(other.to_owned()),
        };
        Some(kind)
    }

    /// Returns `true` for kinds that only occur inside the AR viewer.
    #[must_use]
    pub fn is_ar(&self) -> bool {
        matches!(self, Self::ArStart | Self::ArEnd)
    }

    /// Returns `true` if this is an unrecognized kind with the given name.
    #[must_use]
    pub fn is_other_named(&self, name: &str) -> bool {
        matches!(self, Self::Other(other) if other == name)
    }
}

/// Reason an event was dropped during normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum MalformedEvent {
    #[display("event is not an object")]
    NotAnObject,
    #[display("event has no kind")]
    MissingKind,
    #[display("event has no timestamp")]
    MissingTime,
    #[display("event timestamp cannot be parsed")]
    InvalidTime,
}

/// An event exactly as stored in the session document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, derive_more::From)]
#[serde(transparent)]
pub struct RawEvent(Value);

impl RawEvent {
    /// Builds a well-formed raw event; mostly useful for fixtures.
    #[must_use]
    pub fn new(t: u64, kind: &str, payload: Option<Value>) -> Self {
        let mut map = serde_json::Map::new();
        map.insert("t".to_owned(), Value::from(t));
        map.insert("e".to_owned(), Value::from(kind));
        if let Some(payload) = payload {
            map.insert("p".to_owned(), payload);
        }
        Self(Value::Object(map))
    }

    #[must_use]
    pub fn as_json(&self) -> &Value {
        &self.0
    }

    /// Validates and types this event.
    pub fn normalize(&self) -> Result<Event, MalformedEvent> {
        let Value::Object(map) = &self.0 else {
            return Err(MalformedEvent::NotAnObject);
        };
        let kind = map
            .get("e")
            .and_then(Value::as_str)
            .and_then(EventKind::from_name)
            .ok_or(MalformedEvent::MissingKind)?;
        let t = match map.get("t") {
            None | Some(Value::Null) => return Err(MalformedEvent::MissingTime),
            Some(t) => timestamp::millis_from_json(t).ok_or(MalformedEvent::InvalidTime)?,
        };
        let payload = map.get("p").filter(|p| !p.is_null()).cloned();
        Ok(Event {
            t,
            kind,
            payload,
            position: 0,
        })
    }
}

/// A validated event, positioned within its normalized [`EventLog`](crate::EventLog).
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    t: u64,
    kind: EventKind,
    payload: Option<Value>,
    position: usize,
}

impl Event {
    /// Offset from session start, in milliseconds.
    #[must_use]
    pub fn t(&self) -> u64 {
        self.t
    }

    #[must_use]
    pub fn kind(&self) -> &EventKind {
        &self.kind
    }

    #[must_use]
    pub fn payload(&self) -> Option<&Value> {
        self.payload.as_ref()
    }

    /// Index of this event in the time-ordered log.
    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }

    pub(crate) fn set_position(&mut self, position: usize) {
        self.position = position;
    }

    /// Page name, for `view_page` events.
    #[must_use]
    pub fn page(&self) -> Option<&str> {
        if !self.kind.is_view_page() {
            return None;
        }
        self.payload.as_ref()?.as_str()
    }

    /// Viewed product, for `view_product` events with a usable product id.
    #[must_use]
    pub fn product_id(&self) -> Option<ProductId> {
        if !self.kind.is_view_product() {
            return None;
        }
        ProductId::from_payload(self.payload.as_ref()?)
    }
}
