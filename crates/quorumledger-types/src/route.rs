//! Weighted route model used by the routing gateway.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A delivery channel with a caller-defined weight (capacity or latency score).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeightedRoute {
    pub channel: String,
    pub weight: Decimal,
}

impl WeightedRoute {
    #[must_use]
    pub fn new(channel: impl Into<String>, weight: Decimal) -> Self {
        Self {
            channel: channel.into(),
            weight,
        }
    }

    /// Weight clamped at zero. Negative weights carry no capacity.
    #[must_use]
    pub fn effective_weight(&self) -> Decimal {
        self.weight.max(Decimal::ZERO)
    }
}
