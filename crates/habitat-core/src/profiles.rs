//! Profile weights and the cumulative distribution sampled for new humans.

use habitat_types::Profile;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Order in which weights are accumulated into thresholds.
const SAMPLE_ORDER: [Profile; 4] = [
    Profile::Pragmatic,
    Profile::Cautious,
    Profile::Selfish,
    Profile::Collectivist,
];

/// Relative weights of each profile among initial humans.
///
/// Weights need not sum to one. Negative or non-finite weights count as
/// zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProfileWeights {
    /// Weight of [`Profile::Pragmatic`].
    #[serde(default = "default_weight")]
    pub pragmatic: f64,
    /// Weight of [`Profile::Cautious`].
    #[serde(default = "default_weight")]
    pub cautious: f64,
    /// Weight of [`Profile::Selfish`].
    #[serde(default = "default_weight")]
    pub selfish: f64,
    /// Weight of [`Profile::Collectivist`].
    #[serde(default = "default_weight")]
    pub collectivist: f64,
}

const fn default_weight() -> f64 {
    1.0
}

impl Default for ProfileWeights {
    fn default() -> Self {
        Self {
            pragmatic: default_weight(),
            cautious: default_weight(),
            selfish: default_weight(),
            collectivist: default_weight(),
        }
    }
}

impl ProfileWeights {
    fn ordered(&self) -> [f64; 4] {
        let sane = |w: f64| if w.is_finite() { w.max(0.0) } else { 0.0 };
        [
            sane(self.pragmatic),
            sane(self.cautious),
            sane(self.selfish),
            sane(self.collectivist),
        ]
    }
}

/// Cumulative thresholds over Pragmatic, Cautious, Selfish, Collectivist.
///
/// Thresholds are non-decreasing and the last one is exactly `1.0`. A
/// zero total weight degenerates to "everyone is Pragmatic".
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProfileDistribution {
    thresholds: [f64; 4],
}

impl ProfileDistribution {
    /// Normalize `weights` into cumulative thresholds.
    pub fn from_weights(weights: &ProfileWeights) -> Self {
        let mut raw = weights.ordered();
        let mut total: f64 = raw.iter().sum();
        if total <= 0.0 {
            raw = [1.0, 0.0, 0.0, 0.0];
            total = 1.0;
        }

        let mut thresholds = [0.0; 4];
        let mut running = 0.0;
        for (threshold, weight) in thresholds.iter_mut().zip(raw) {
            running += weight / total;
            *threshold = running.min(1.0);
        }
        if let Some(last) = thresholds.last_mut() {
            *last = 1.0;
        }
        Self { thresholds }
    }

    /// The cumulative thresholds, in sampling order.
    pub const fn thresholds(&self) -> [f64; 4] {
        self.thresholds
    }

    /// Draw a profile: the first whose threshold exceeds a uniform `[0, 1)`
    /// draw.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Profile {
        let draw: f64 = rng.random();
        SAMPLE_ORDER
            .iter()
            .zip(self.thresholds)
            .find(|(_, threshold)| draw < *threshold)
            .map_or(Profile::Collectivist, |(profile, _)| *profile)
    }
}

impl Default for ProfileDistribution {
    fn default() -> Self {
        Self::from_weights(&ProfileWeights::default())
    }
}
