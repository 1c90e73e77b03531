//! Time-ordered, validated view over a session's events.

use std::collections::BTreeSet;

use crate::event::{Event, EventKind, ProductId, RawEvent};

/// Normalized event log of one session.
///
/// Built from the raw event array by dropping malformed events (they are
/// counted, see [`EventLog::dropped`]) and stable-sorting the rest by `t`.
/// Events sharing a timestamp keep their original relative order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventLog {
    events: Vec<Event>,
    dropped: usize,
}

impl EventLog {
    #[must_use]
    pub fn from_raw(raw: &[RawEvent]) -> Self {
        let mut dropped = 0;
        let mut events = raw
            .iter()
            .filter_map(|raw| {
                raw.normalize()
                    .inspect_err(|_| dropped += 1)
                    .ok()
            })
            .collect::<Vec<_>>();
        events.sort_by_key(Event::t);
        for (position, event) in events.iter_mut().enumerate() {
            event.set_position(position);
        }
        Self { events, dropped }
    }

    /// Number of malformed events dropped during normalization.
    #[must_use]
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Event> {
        self.events.iter()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Event] {
        &self.events
    }

    pub fn events_of_kind<'a>(&'a self, kind: &'a EventKind) -> impl Iterator<Item = &'a Event> {
        self.events.iter().filter(move |e| e.kind() == kind)
    }

    #[must_use]
    pub fn has_kind(&self, kind: &EventKind) -> bool {
        self.events.iter().any(|e| e.kind() == kind)
    }

    #[must_use]
    pub fn first_of_kind(&self, kind: &EventKind) -> Option<&Event> {
        self.events.iter().find(|e| e.kind() == kind)
    }

    /// First `view_page` event whose payload is `page`.
    #[must_use]
    pub fn first_page_view(&self, page: &str) -> Option<&Event> {
        self.events.iter().find(|e| e.page() == Some(page))
    }

    /// First event of `kind` after the first event of `reference_kind`.
    #[must_use]
    pub fn first_event_after(&self, kind: &EventKind, reference_kind: &EventKind) -> Option<&Event> {
        let reference = self.first_of_kind(reference_kind)?;
        self.first_event_after_event(kind, reference)
    }

    /// First event of `kind` positioned after `reference` in this log.
    ///
    /// `reference` must come from this log; positions are not comparable
    /// across logs.
    #[must_use]
    pub fn first_event_after_event(&self, kind: &EventKind, reference: &Event) -> Option<&Event> {
        self.events
            .get(reference.position() + 1..)?
            .iter()
            .find(|e| e.kind() == kind)
    }

    /// First event of `kind` with a timestamp of at least `t`.
    ///
    /// Unlike [`EventLog::first_event_after_event`] this only looks at
    /// timestamps, so events sharing `t` with the reference match no matter
    /// how the raw array ordered them.
    #[must_use]
    pub fn first_event_since(&self, kind: &EventKind, t: u64) -> Option<&Event> {
        self.events.iter().find(|e| e.t() >= t && e.kind() == kind)
    }

    /// Distinct products the participant opened.
    #[must_use]
    pub fn unique_product_ids_viewed(&self) -> BTreeSet<ProductId> {
        self.events.iter().filter_map(Event::product_id).collect()
    }
}

impl<'a> IntoIterator for &'a EventLog {
    type Item = &'a Event;
    type IntoIter = std::slice::Iter<'a, Event>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
