//! Evidence produced by the extractors.

use std::fmt;

use lumiere_session::{ArPresence, Variety};
use serde::Serialize;

/// Condition axis a signal votes on.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, derive_more::Display, derive_more::IsVariant,
)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    #[display("variety")]
    Variety,
    #[display("ar")]
    Ar,
}

/// Value a signal asserts, tagged with its axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "axis", content = "value", rename_all = "snake_case")]
pub enum SignalValue {
    Variety(Variety),
    Ar(ArPresence),
}

impl SignalValue {
    #[must_use]
    pub fn axis(self) -> Axis {
        match self {
            Self::Variety(_) => Axis::Variety,
            Self::Ar(_) => Axis::Ar,
        }
    }

    #[must_use]
    pub fn as_variety(self) -> Option<Variety> {
        match self {
            Self::Variety(v) => Some(v),
            Self::Ar(_) => None,
        }
    }

    #[must_use]
    pub fn as_ar(self) -> Option<ArPresence> {
        match self {
            Self::Ar(ar) => Some(ar),
            Self::Variety(_) => None,
        }
    }
}

impl fmt::Display for SignalValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Variety(v) => write!(f, "variety={v}"),
            Self::Ar(ar) => write!(f, "ar={ar}"),
        }
    }
}

/// How much weight a signal carries in arbitration.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, derive_more::Display, derive_more::IsVariant,
)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    /// Sufficient on its own to decide the axis.
    #[display("definitive")]
    Definitive,
    /// Consulted only when the axis has no definitive signal.
    #[display("indicative")]
    Indicative,
}

/// The rule that produced a signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalSource {
    ArEvents,
    ExclusiveProduct,
    ProductCount,
    ScrollTiming,
}

impl SignalSource {
    #[must_use]
    pub fn id(self) -> &'static str {
        match self {
            Self::ArEvents => "ar_events",
            Self::ExclusiveProduct => "exclusive_product",
            Self::ProductCount => "product_count",
            Self::ScrollTiming => "scroll_timing",
        }
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::ArEvents => "AR Events",
            Self::ExclusiveProduct => "Exclusive Product",
            Self::ProductCount => "Product Count",
            Self::ScrollTiming => "Scroll Timing",
        }
    }
}

/// One vote from one extractor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Signal {
    #[serde(flatten)]
    value: SignalValue,
    tier: Tier,
    source: SignalSource,
    /// What the rule saw, for the audit trail.
    detail: String,
}

impl Signal {
    #[must_use]
    pub fn new(value: SignalValue, tier: Tier, source: SignalSource, detail: String) -> Self {
        Self {
            value,
            tier,
            source,
            detail,
        }
    }

    #[must_use]
    pub fn axis(&self) -> Axis {
        self.value.axis()
    }

    #[must_use]
    pub fn value(&self) -> SignalValue {
        self.value
    }

    #[must_use]
    pub fn tier(&self) -> Tier {
        self.tier
    }

    #[must_use]
    pub fn source(&self) -> SignalSource {
        self.source
    }

    #[must_use]
    pub fn detail(&self) -> &str {
        &self.detail
    }
}

impl fmt::Display for SignalSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} -> {}: {}",
            self.tier, self.source, self.value, self.detail
        )
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_signal_json_shape() {
        let signal = Signal::new(
            SignalValue::Variety(Variety::High),
            Tier::Definitive,
            SignalSource::ExclusiveProduct,
            "viewed exclusive product(s) 9".to_owned(),
        );
        assert_eq!(
            serde_json::to_value(&signal).unwrap(),
            json!({
                "axis": "variety",
                "value": "high",
                "tier": "definitive",
                "source": "exclusive_product",
                "detail": "viewed exclusive product(s) 9",
            })
        );
    }

    #[test]
    fn test_signal_display() {
        let signal = Signal::new(
            SignalValue::Ar(ArPresence::Present),
            Tier::Definitive,
            SignalSource::ArEvents,
            "1 AR viewer event(s)".to_owned(),
        );
        assert_eq!(
            signal.to_string(),
            "[definitive] ar_events -> ar=present: 1 AR viewer event(s)"
        );
        assert_eq!(signal.axis(), Axis::Ar);
    }
}
