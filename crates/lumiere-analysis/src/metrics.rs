//! Per-session behavioral metrics.
//!
//! Computed over the normalized [`EventLog`], so malformed events are already
//! gone and events are in time order. [`EventMetrics::from_session`] also
//! reads the session's wall-clock duration.
//!
//! | metric | counted from |
//! |---|---|
//! | `page_views` | `view_page` |
//! | `unique_products_viewed` | distinct product ids of `view_product` |
//! | `ar_session_count` | `ar_end` |
//! | `cart_additions` | `cart_add_detail`, `cart_add_gallery` |
//! | `cart_removals` | `cart_remove` |
//! | `time_on_gallery_ms` | from each `gallery` page view to the next page view |
//! | `scrolled_to_bottom` | any `scroll_to_bottom` |
//! | `session_duration_ms` | `completed_at - started_at` of the session document |

use lumiere_session::{EventKind, EventLog, Session};
use serde::{Deserialize, Serialize};

const GALLERY_PAGE: &str = "gallery";
const CART_ADD_EVENTS: [&str; 2] = ["cart_add_detail", "cart_add_gallery"];
const CART_REMOVE_EVENT: &str = "cart_remove";
const SCROLL_TO_BOTTOM_EVENT: &str = "scroll_to_bottom";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventMetrics {
    pub page_views: usize,
    pub unique_products_viewed: usize,
    pub ar_session_count: usize,
    pub cart_additions: usize,
    pub cart_removals: usize,
    /// `None` when no time was spent on the gallery (or it was never left).
    pub time_on_gallery_ms: Option<u64>,
    pub scrolled_to_bottom: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_duration_ms: Option<u64>,
}

impl EventMetrics {
    #[must_use]
    pub fn from_session(session: &Session) -> Self {
        Self {
            session_duration_ms: session.duration_ms(),
            ..Self::from_log(&session.event_log())
        }
    }

    #[must_use]
    pub fn from_log(log: &EventLog) -> Self {
        let mut metrics = Self {
            unique_products_viewed: log.unique_product_ids_viewed().len(),
            scrolled_to_bottom: log.has_kind(&EventKind::Other(SCROLL_TO_BOTTOM_EVENT.to_owned())),
            ..Self::default()
        };
        let mut gallery_since = None;
        let mut gallery_time = 0;

        for event in log {
            match event.kind() {
                EventKind::ViewPage => {
                    metrics.page_views += 1;
                    if let Some(start) = gallery_since.take() {
                        gallery_time += event.t().saturating_sub(start);
                    }
                    if event.page() == Some(GALLERY_PAGE) {
                        gallery_since = Some(event.t());
                    }
                }
                EventKind::ArEnd => metrics.ar_session_count += 1,
                kind if CART_ADD_EVENTS.iter().any(|name| kind.is_other_named(name)) => {
                    metrics.cart_additions += 1;
                }
                kind if kind.is_other_named(CART_REMOVE_EVENT) => metrics.cart_removals += 1,
                _ => {}
            }
        }

        metrics.time_on_gallery_ms = (gallery_time > 0).then_some(gallery_time);
        metrics
    }
}

#[cfg(test)]
mod tests {
    use lumiere_session::RawEvent;
    use serde_json::json;

    use super::*;

    #[test]
    fn test_empty_log() {
        assert_eq!(EventMetrics::from_log(&EventLog::default()), EventMetrics::default());
    }

    #[test]
    fn test_metrics() {
        let events = [
            RawEvent::new(0, "view_page", Some(json!("welcome"))),
            RawEvent::new(1_000, "view_page", Some(json!("gallery"))),
            RawEvent::new(1_500, "scroll", None),
            RawEvent::new(2_000, "scroll_to_bottom", None),
            RawEvent::new(2_500, "cart_add_gallery", Some(json!(3))),
            RawEvent::new(3_000, "view_page", Some(json!("detail"))),
            RawEvent::new(3_100, "view", Some(json!("3"))),
            RawEvent::new(3_200, "ar_start", Some(json!("3"))),
            RawEvent::new(4_200, "ar_end", Some(json!("3"))),
            RawEvent::new(4_300, "cart_add_detail", Some(json!(3))),
            RawEvent::new(4_400, "cart_remove", Some(json!(3))),
            RawEvent::new(5_000, "view_page", Some(json!("gallery"))),
            RawEvent::new(5_500, "view_product", Some(json!(7))),
            RawEvent::new(6_000, "view_page", Some(json!("cart"))),
        ];
        let metrics = EventMetrics::from_log(&EventLog::from_raw(&events));
        assert_eq!(
            metrics,
            EventMetrics {
                page_views: 5,
                unique_products_viewed: 2,
                ar_session_count: 1,
                cart_additions: 2,
                cart_removals: 1,
                time_on_gallery_ms: Some(3_000),
                scrolled_to_bottom: true,
                session_duration_ms: None,
            }
        );
    }

    #[test]
    fn test_cart_events_need_exact_names() {
        let events = [
            RawEvent::new(0, "cart_add", Some(json!(3))),
            RawEvent::new(10, "cart_removed", Some(json!(3))),
            RawEvent::new(20, "scroll_to_bottom_gallery", None),
            RawEvent::new(30, "cart_add_gallery", Some(json!(4))),
        ];
        let metrics = EventMetrics::from_log(&EventLog::from_raw(&events));
        assert_eq!(metrics.cart_additions, 1);
        assert_eq!(metrics.cart_removals, 0);
        assert!(!metrics.scrolled_to_bottom);
    }

    #[test]
    fn test_from_session() {
        let session: Session = serde_json::from_value(json!({
            "session_id": "m-1",
            "started_at": {"_seconds": 1_700_000_000u64, "_nanoseconds": 0},
            "completed_at": {"_seconds": 1_700_000_095u64, "_nanoseconds": 500_000_000},
            "events": [
                {"t": 0, "e": "view_page", "p": "gallery"},
                {"t": 800, "e": "scroll_to_bottom"},
                {"t": 2_000, "e": "view_page", "p": "cart"},
            ],
        }))
        .unwrap();
        let metrics = EventMetrics::from_session(&session);
        assert_eq!(metrics.session_duration_ms, Some(95_500));
        assert_eq!(metrics.page_views, 2);
        assert_eq!(metrics.time_on_gallery_ms, Some(2_000));
        assert!(metrics.scrolled_to_bottom);

        let json = serde_json::to_value(EventMetrics::from_session(&Session::new("m-2"))).unwrap();
        assert!(json.get("session_duration_ms").is_none());
    }

    #[test]
    fn test_gallery_never_left() {
        let events = [RawEvent::new(0, "view_page", Some(json!("gallery")))];
        let metrics = EventMetrics::from_log(&EventLog::from_raw(&events));
        assert_eq!(metrics.page_views, 1);
        assert_eq!(metrics.time_on_gallery_ms, None);
    }
}
