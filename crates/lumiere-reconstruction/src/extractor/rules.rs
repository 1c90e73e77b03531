//! The four evidentiary rules.
//!
//! Each type implements [`SignalExtractor`] and looks at exactly one kind of
//! evidence in the normalized log.

use lumiere_session::{ArPresence, EventKind, EventLog, ProductId, Variety};

use super::{BoxedSignalExtractor, SignalExtractor};
use crate::{
    config::EngineConfig,
    signal::{Axis, Signal, SignalSource, SignalValue, Tier},
};

const GALLERY_PAGE: &str = "gallery";

/// AR viewer usage.
///
/// Only the AR conditions (groups 2 and 4) expose the viewer, so any
/// `ar_start` or `ar_end` event proves AR was present. The rule never asserts
/// `absent`: a participant in an AR group may simply never open the viewer.
#[derive(Debug, Clone)]
pub struct ArEvents;

impl SignalExtractor for ArEvents {
    fn source(&self) -> SignalSource {
        SignalSource::ArEvents
    }
    fn axis(&self) -> Axis {
        Axis::Ar
    }
    fn tier(&self) -> Tier {
        Tier::Definitive
    }
    fn clone_boxed(&self) -> BoxedSignalExtractor {
        Box::new(self.clone())
    }
    fn extract(&self, log: &EventLog, _config: &EngineConfig) -> Option<Signal> {
        let count = log.iter().filter(|event| event.kind().is_ar()).count();
        (count > 0).then(|| {
            self.signal(
                SignalValue::Ar(ArPresence::Present),
                format!("{count} AR viewer event(s) recorded"),
            )
        })
    }
}

/// Views of products only the high-variety gallery lists.
#[derive(Debug, Clone)]
pub struct ExclusiveProduct;

impl SignalExtractor for ExclusiveProduct {
    fn source(&self) -> SignalSource {
        SignalSource::ExclusiveProduct
    }
    fn axis(&self) -> Axis {
        Axis::Variety
    }
    fn tier(&self) -> Tier {
        Tier::Definitive
    }
    fn clone_boxed(&self) -> BoxedSignalExtractor {
        Box::new(self.clone())
    }
    fn extract(&self, log: &EventLog, config: &EngineConfig) -> Option<Signal> {
        let catalog = config.catalog();
        let exclusive = log
            .unique_product_ids_viewed()
            .into_iter()
            .filter(|&id| catalog.is_exclusive(id))
            .collect::<Vec<_>>();
        if exclusive.is_empty() {
            return None;
        }
        Some(self.signal(
            SignalValue::Variety(Variety::High),
            format!(
                "viewed high-variety-exclusive product(s) {}",
                join_ids(&exclusive)
            ),
        ))
    }
}

/// Number of distinct products viewed.
///
/// The low-variety gallery lists only `low_variety_product_count` products, so
/// seeing more than that proves high variety. Seeing between one and that many
/// emits `low` at the same tier.
#[derive(Debug, Clone)]
pub struct ProductCount;

impl SignalExtractor for ProductCount {
    fn source(&self) -> SignalSource {
        SignalSource::ProductCount
    }
    fn axis(&self) -> Axis {
        Axis::Variety
    }
    fn tier(&self) -> Tier {
        Tier::Definitive
    }
    fn clone_boxed(&self) -> BoxedSignalExtractor {
        Box::new(self.clone())
    }
    fn extract(&self, log: &EventLog, config: &EngineConfig) -> Option<Signal> {
        let count = log.unique_product_ids_viewed().len();
        let limit = config.low_variety_product_count();
        // the <= limit branch is weaker evidence than the > limit branch but
        // shares its tier
        let (variety, relation) = match count {
            0 => return None,
            n if n > limit => (Variety::High, "more than"),
            _ => (Variety::Low, "at most"),
        };
        Some(self.signal(
            SignalValue::Variety(variety),
            format!("{count} unique product(s) viewed, {relation} {limit}"),
        ))
    }
}

/// Time from opening the gallery to the first scroll.
///
/// A participant facing the short low-variety gallery tends to scroll (or
/// leave) quickly. This is the weakest rule and only asserts `low`.
#[derive(Debug, Clone)]
pub struct ScrollTiming;

impl SignalExtractor for ScrollTiming {
    fn source(&self) -> SignalSource {
        SignalSource::ScrollTiming
    }
    fn axis(&self) -> Axis {
        Axis::Variety
    }
    fn tier(&self) -> Tier {
        Tier::Indicative
    }
    fn clone_boxed(&self) -> BoxedSignalExtractor {
        Box::new(self.clone())
    }
    fn extract(&self, log: &EventLog, config: &EngineConfig) -> Option<Signal> {
        let gallery = log.first_page_view(GALLERY_PAGE)?;
        let scroll = log.first_event_since(&EventKind::Scroll, gallery.t())?;
        let elapsed = scroll.t() - gallery.t();
        let threshold = config.fast_scroll_threshold_ms();
        (elapsed < threshold).then(|| {
            self.signal(
                SignalValue::Variety(Variety::Low),
                format!("first gallery scroll after {elapsed} ms, below {threshold} ms"),
            )
        })
    }
}

fn join_ids(ids: &[ProductId]) -> String {
    ids.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use lumiere_session::RawEvent;
    use serde_json::json;

    use super::*;
    use crate::config::ProductCatalog;

    fn config() -> EngineConfig {
        let catalog = ProductCatalog::new(
            (1..=5).map(ProductId::new),
            (6..=15).map(ProductId::new),
        );
        EngineConfig::new(catalog, Duration::from_millis(1000))
    }

    fn log(events: &[RawEvent]) -> EventLog {
        EventLog::from_raw(events)
    }

    fn product_views(ids: impl IntoIterator<Item = u32>) -> Vec<RawEvent> {
        ids.into_iter()
            .enumerate()
            .map(|(i, id)| RawEvent::new(100 * i as u64, "view_product", Some(json!(id))))
            .collect()
    }

    #[test]
    fn test_ar_events() {
        let config = config();
        assert_eq!(ArEvents.extract(&log(&[]), &config), None);

        let events = [
            RawEvent::new(0, "view_page", Some(json!("gallery"))),
            RawEvent::new(10, "ar_start", Some(json!("5"))),
            RawEvent::new(20, "ar_end", Some(json!("5"))),
        ];
        let signal = ArEvents.extract(&log(&events), &config).unwrap();
        assert_eq!(signal.value(), SignalValue::Ar(ArPresence::Present));
        assert_eq!(signal.tier(), Tier::Definitive);
        assert_eq!(signal.detail(), "2 AR viewer event(s) recorded");
    }

    #[test]
    fn test_exclusive_product() {
        let config = config();
        assert_eq!(
            ExclusiveProduct.extract(&log(&product_views([1, 2, 3])), &config),
            None
        );

        let signal = ExclusiveProduct
            .extract(&log(&product_views([9, 1, 7, 9])), &config)
            .unwrap();
        assert_eq!(signal.value(), SignalValue::Variety(Variety::High));
        assert_eq!(signal.detail(), "viewed high-variety-exclusive product(s) 7, 9");
    }

    #[test]
    fn test_product_count_branches() {
        let config = config();
        assert_eq!(ProductCount.extract(&log(&[]), &config), None);

        let low = ProductCount
            .extract(&log(&product_views([1, 2, 2, 3])), &config)
            .unwrap();
        assert_eq!(low.value(), SignalValue::Variety(Variety::Low));
        assert_eq!(low.tier(), Tier::Definitive);
        assert_eq!(low.detail(), "3 unique product(s) viewed, at most 5");

        let boundary = ProductCount
            .extract(&log(&product_views(1..=5)), &config)
            .unwrap();
        assert_eq!(boundary.value(), SignalValue::Variety(Variety::Low));

        let high = ProductCount
            .extract(&log(&product_views(1..=6)), &config)
            .unwrap();
        assert_eq!(high.value(), SignalValue::Variety(Variety::High));
        assert_eq!(high.detail(), "6 unique product(s) viewed, more than 5");
    }

    #[test]
    fn test_product_count_uses_configured_limit() {
        let config = config().with_low_variety_product_count(8);
        let signal = ProductCount
            .extract(&log(&product_views(1..=7)), &config)
            .unwrap();
        assert_eq!(signal.value(), SignalValue::Variety(Variety::Low));
    }

    #[test]
    fn test_scroll_timing() {
        let config = config();
        let gallery = RawEvent::new(1_000, "view_page", Some(json!("gallery")));

        let fast = [gallery.clone(), RawEvent::new(1_400, "scroll", None)];
        let signal = ScrollTiming.extract(&log(&fast), &config).unwrap();
        assert_eq!(signal.value(), SignalValue::Variety(Variety::Low));
        assert_eq!(signal.tier(), Tier::Indicative);
        assert_eq!(
            signal.detail(),
            "first gallery scroll after 400 ms, below 1000 ms"
        );

        // threshold is exclusive
        let exact = [gallery.clone(), RawEvent::new(2_000, "scroll", None)];
        assert_eq!(ScrollTiming.extract(&log(&exact), &config), None);

        let slow = [gallery.clone(), RawEvent::new(5_000, "scroll", None)];
        assert_eq!(ScrollTiming.extract(&log(&slow), &config), None);

        let no_scroll = [gallery];
        assert_eq!(ScrollTiming.extract(&log(&no_scroll), &config), None);
    }

    #[test]
    fn test_scroll_timing_ignores_scrolls_before_gallery() {
        let config = config();
        let events = [
            RawEvent::new(0, "view_page", Some(json!("home"))),
            RawEvent::new(100, "scroll", None),
            RawEvent::new(3_000, "view_page", Some(json!("gallery"))),
            RawEvent::new(6_000, "scroll", None),
        ];
        assert_eq!(ScrollTiming.extract(&log(&events), &config), None);

        let no_gallery = [RawEvent::new(0, "scroll", None)];
        assert_eq!(ScrollTiming.extract(&log(&no_gallery), &config), None);
    }

    #[test]
    fn test_scroll_at_same_time_as_gallery() {
        let config = config();
        let gallery = RawEvent::new(500, "view_page", Some(json!("gallery")));
        let scroll = RawEvent::new(500, "scroll", None);

        for events in [[gallery.clone(), scroll.clone()], [scroll, gallery]] {
            let signal = ScrollTiming.extract(&log(&events), &config).unwrap();
            assert_eq!(signal.detail(), "first gallery scroll after 0 ms, below 1000 ms");
        }
    }

    #[test]
    fn test_all_signal_extractors_order() {
        let ids = crate::extractor::all_signal_extractors()
            .iter()
            .map(|extractor| extractor.id())
            .collect::<Vec<_>>();
        assert_eq!(
            ids,
            ["ar_events", "exclusive_product", "product_count", "scroll_timing"]
        );
    }
}
