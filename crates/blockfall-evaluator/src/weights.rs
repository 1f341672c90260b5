use serde::{Deserialize, Serialize};

use crate::board_metrics::BoardMetrics;

/// The five board features consumed by the placement evaluator.
///
/// The feature set and the weight vector share this key set by
/// construction: [`WeightVector`] has exactly one coefficient per variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    AggregateHeight,
    CompleteLines,
    Holes,
    Bumpiness,
    WallProximity,
}

impl Feature {
    /// All features, in evaluation order.
    pub const ALL: [Feature; 5] = [
        Feature::AggregateHeight,
        Feature::CompleteLines,
        Feature::Holes,
        Feature::Bumpiness,
        Feature::WallProximity,
    ];

    /// Extracts this feature's scalar measurement from the board metrics.
    #[must_use]
    pub fn extract(self, metrics: &BoardMetrics) -> f64 {
        let raw = match self {
            Feature::AggregateHeight => metrics.aggregate_height(),
            Feature::CompleteLines => metrics.complete_lines(),
            Feature::Holes => metrics.holes(),
            Feature::Bumpiness => metrics.bumpiness(),
            Feature::WallProximity => metrics.wall_proximity(),
        };
        f64::from(raw)
    }
}

/// Per-feature linear coefficients, versioned by generation where stored.
///
/// Field names on the wire match the persistence endpoint and the original
/// client (`heightWeight`, `linesWeight`, ...). The vector is owned by the
/// session; it is mutated only by the trainer or replaced wholesale by a
/// weight-sync update.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightVector {
    #[serde(rename = "heightWeight")]
    pub height: f64,
    #[serde(rename = "linesWeight")]
    pub lines: f64,
    #[serde(rename = "holesWeight")]
    pub holes: f64,
    #[serde(rename = "bumpinessWeight")]
    pub bumpiness: f64,
    #[serde(rename = "wallWeight")]
    pub wall: f64,
}

impl WeightVector {
    /// Built-in default weights, used whenever the persistence endpoint is
    /// unreachable or returns a malformed payload.
    pub const DEFAULT: Self = Self {
        height: -0.510_066,
        lines: 0.760_666,
        holes: -0.356_63,
        bumpiness: -0.184_483,
        wall: 0.25,
    };

    /// Returns the coefficient for the given feature.
    #[must_use]
    pub fn get(&self, feature: Feature) -> f64 {
        match feature {
            Feature::AggregateHeight => self.height,
            Feature::CompleteLines => self.lines,
            Feature::Holes => self.holes,
            Feature::Bumpiness => self.bumpiness,
            Feature::WallProximity => self.wall,
        }
    }

    /// Returns a mutable reference to the coefficient for the given
    /// feature.
    pub fn get_mut(&mut self, feature: Feature) -> &mut f64 {
        match feature {
            Feature::AggregateHeight => &mut self.height,
            Feature::CompleteLines => &mut self.lines,
            Feature::Holes => &mut self.holes,
            Feature::Bumpiness => &mut self.bumpiness,
            Feature::WallProximity => &mut self.wall,
        }
    }
}

impl Default for WeightVector {
    fn default() -> Self {
        Self::DEFAULT
    }
}
