//! Exponential-smoothing trend predictor.
//!
//! Keeps only the latest raw value and smoothed estimate per metric; there is
//! no history buffer here. The predictor and the sliding-window detector are
//! independent and may disagree about the same metric.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::PredictorConfig;
use crate::error::InsightResult;

/// Default smoothing factor.
pub const DEFAULT_ALPHA: f64 = 0.3;

/// Default forecast horizon.
pub const DEFAULT_FORECAST_STEPS: usize = 10;

/// Fixed per-step growth assumed by [`TrendPredictor::predict_n_steps`].
pub const FORECAST_GROWTH_PER_STEP: f64 = 0.01;

/// Relative change below which a metric is considered stable.
pub const STABLE_BAND: f64 = 0.01;

/// Smoothing state for one metric.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SmoothingState {
    /// Most recent raw observation.
    pub last_observed: f64,
    /// Exponentially weighted estimate.
    pub smoothed: f64,
    /// Number of updates applied.
    pub observations: u64,
    pub updated_at: DateTime<Utc>,
}

/// Direction of a metric's recent movement.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Stable,
    Increasing,
    Decreasing,
}

impl std::fmt::Display for TrendDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Stable => write!(f, "stable"),
            Self::Increasing => write!(f, "increasing"),
            Self::Decreasing => write!(f, "decreasing"),
        }
    }
}

/// Trend classification with its raw slope.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Trend {
    pub direction: TrendDirection,
    /// `smoothed - last_observed`, or 0.0 when stable.
    pub slope: f64,
}

impl Trend {
    pub const STABLE: Trend = Trend {
        direction: TrendDirection::Stable,
        slope: 0.0,
    };
}

/// Per-metric exponential smoothing with a fixed-growth forecast.
pub struct TrendPredictor {
    alpha: f64,
    states: RwLock<HashMap<String, SmoothingState>>,
}

impl TrendPredictor {
    pub fn try_new(config: PredictorConfig) -> InsightResult<Self> {
        config.validate()?;
        Ok(Self {
            alpha: config.alpha,
            states: RwLock::new(HashMap::new()),
        })
    }

    pub fn with_defaults() -> Self {
        Self {
            alpha: DEFAULT_ALPHA,
            states: RwLock::new(HashMap::new()),
        }
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Fold a new observation into the metric's smoothed estimate.
    ///
    /// The first observation seeds both fields and is returned unchanged.
    pub fn update(&self, metric: &str, value: f64) -> f64 {
        self.update_at(metric, value, Utc::now())
    }

    /// [`update`](Self::update) with an explicit observation time.
    pub fn update_at(&self, metric: &str, value: f64, timestamp: DateTime<Utc>) -> f64 {
        let mut states = self.states.write();
        match states.get_mut(metric) {
            Some(state) => {
                state.smoothed = self.alpha * value + (1.0 - self.alpha) * state.smoothed;
                state.last_observed = value;
                state.observations += 1;
                state.updated_at = timestamp;
                state.smoothed
            }
            None => {
                debug!(metric, alpha = self.alpha, "initializing smoothing state");
                states.insert(
                    metric.to_string(),
                    SmoothingState {
                        last_observed: value,
                        smoothed: value,
                        observations: 1,
                        updated_at: timestamp,
                    },
                );
                value
            }
        }
    }

    /// Extrapolate `n` steps from the smoothed value assuming 1% growth per
    /// step: `smoothed * (1 + 0.01 * i)` for `i in 0..n`.
    ///
    /// The growth rate is fixed; it does not follow the metric's trajectory.
    pub fn predict_n_steps(&self, metric: &str, n: usize) -> Vec<f64> {
        let states = self.states.read();
        let Some(state) = states.get(metric) else {
            return Vec::new();
        };
        (0..n)
            .map(|i| state.smoothed * (1.0 + FORECAST_GROWTH_PER_STEP * i as f64))
            .collect()
    }

    /// Classify the gap between the smoothed estimate and the last raw value.
    pub fn detect_trend(&self, metric: &str) -> Trend {
        let states = self.states.read();
        let Some(state) = states.get(metric) else {
            return Trend::STABLE;
        };

        let diff = state.smoothed - state.last_observed;
        // An exact match is stable even when the band collapses at or below zero.
        if diff == 0.0 || diff.abs() < STABLE_BAND * state.last_observed {
            Trend::STABLE
        } else if diff > 0.0 {
            Trend {
                direction: TrendDirection::Increasing,
                slope: diff,
            }
        } else {
            Trend {
                direction: TrendDirection::Decreasing,
                slope: diff,
            }
        }
    }

    /// Copy of the metric's smoothing state, if it has been updated.
    pub fn state(&self, metric: &str) -> Option<SmoothingState> {
        self.states.read().get(metric).cloned()
    }

    pub fn metric_count(&self) -> usize {
        self.states.read().len()
    }
}

impl Default for TrendPredictor {
    fn default() -> Self {
        Self::with_defaults()
    }
}
