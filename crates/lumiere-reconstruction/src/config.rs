//! Engine configuration: product catalog and rule thresholds.
//!
//! The catalog and the fast-scroll threshold have no defaults: both must match
//! the study build the sessions were recorded with.
//! [`ReconstructionEngine::new`](crate::engine::ReconstructionEngine::new)
//! validates the configuration and refuses to build on invalid input.
//!
//! # File format
//!
//! ```json
//! {
//!   "fast_scroll_threshold_ms": 1000,
//!   "low_variety_product_count": 5,
//!   "catalog": {
//!     "shared": [1, 6, 10, 11, 14],
//!     "high_variety_exclusive": [2, 3, 4, 5, 7, 8, 9, 12, 13, 15]
//!   }
//! }
//! ```

use std::{collections::BTreeSet, time::Duration};

use lumiere_session::ProductId;
use serde::{Deserialize, Serialize};

const DEFAULT_LOW_VARIETY_PRODUCT_COUNT: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ConfigError {
    #[display("catalog has no high-variety-exclusive products")]
    EmptyExclusiveSet,
    #[display("product {product_id} is listed as both shared and high-variety-exclusive")]
    OverlappingCatalog { product_id: ProductId },
    #[display("fast-scroll threshold must be greater than zero")]
    ZeroFastScrollThreshold,
    #[display("low-variety product count must be greater than zero")]
    ZeroProductCount,
}

/// Partition of the study's products by the conditions that show them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductCatalog {
    /// Products listed in both the low- and high-variety galleries.
    #[serde(default)]
    shared: BTreeSet<ProductId>,
    /// Products listed only in the high-variety gallery (groups 3 and 4).
    high_variety_exclusive: BTreeSet<ProductId>,
}

impl ProductCatalog {
    pub fn new<S, E>(shared: S, high_variety_exclusive: E) -> Self
    where
        S: IntoIterator<Item = ProductId>,
        E: IntoIterator<Item = ProductId>,
    {
        Self {
            shared: shared.into_iter().collect(),
            high_variety_exclusive: high_variety_exclusive.into_iter().collect(),
        }
    }

    #[must_use]
    pub fn shared(&self) -> &BTreeSet<ProductId> {
        &self.shared
    }

    #[must_use]
    pub fn high_variety_exclusive(&self) -> &BTreeSet<ProductId> {
        &self.high_variety_exclusive
    }

    #[must_use]
    pub fn is_exclusive(&self, id: ProductId) -> bool {
        self.high_variety_exclusive.contains(&id)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.high_variety_exclusive.is_empty() {
            return Err(ConfigError::EmptyExclusiveSet);
        }
        if let Some(&product_id) = self.shared.intersection(&self.high_variety_exclusive).next() {
            return Err(ConfigError::OverlappingCatalog { product_id });
        }
        Ok(())
    }
}

/// Everything the extractors need besides the session itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// A first gallery scroll sooner than this after opening the gallery
    /// indicates the short low-variety gallery.
    fast_scroll_threshold_ms: u64,
    /// Number of products the low-variety gallery lists.
    #[serde(default = "default_low_variety_product_count")]
    low_variety_product_count: usize,
    catalog: ProductCatalog,
}

fn default_low_variety_product_count() -> usize {
    DEFAULT_LOW_VARIETY_PRODUCT_COUNT
}

impl EngineConfig {
    #[must_use]
    pub fn new(catalog: ProductCatalog, fast_scroll_threshold: Duration) -> Self {
        Self {
            fast_scroll_threshold_ms: u64::try_from(fast_scroll_threshold.as_millis())
                .unwrap_or(u64::MAX),
            low_variety_product_count: DEFAULT_LOW_VARIETY_PRODUCT_COUNT,
            catalog,
        }
    }

    #[must_use]
    pub fn with_low_variety_product_count(mut self, count: usize) -> Self {
        self.low_variety_product_count = count;
        self
    }

    #[must_use]
    pub fn catalog(&self) -> &ProductCatalog {
        &self.catalog
    }

    #[must_use]
    pub fn fast_scroll_threshold(&self) -> Duration {
        Duration::from_millis(self.fast_scroll_threshold_ms)
    }

    #[must_use]
    pub fn fast_scroll_threshold_ms(&self) -> u64 {
        self.fast_scroll_threshold_ms
    }

    #[must_use]
    pub fn low_variety_product_count(&self) -> usize {
        self.low_variety_product_count
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.fast_scroll_threshold_ms == 0 {
            return Err(ConfigError::ZeroFastScrollThreshold);
        }
        if self.low_variety_product_count == 0 {
            return Err(ConfigError::ZeroProductCount);
        }
        self.catalog.validate()
    }
}
