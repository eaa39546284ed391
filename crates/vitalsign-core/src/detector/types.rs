//! Detector output types.
//!
//! Everything here is a plain value handed back to the caller; none of it
//! borrows detector state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ── Identifier Types ────────────────────────────────────────────────────

/// Unique identifier for a flagged anomaly.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AnomalyId(pub String);

impl AnomalyId {
    /// Generate a new unique anomaly ID.
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

impl Default for AnomalyId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for AnomalyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "anomaly:{}", self.0)
    }
}

// ── Deviation Direction ─────────────────────────────────────────────────

/// Which side of the mean an anomalous value fell on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Deviation {
    Higher,
    Lower,
}

impl Deviation {
    pub(crate) fn of(z_score: f64) -> Self {
        if z_score > 0.0 {
            Self::Higher
        } else {
            Self::Lower
        }
    }
}

impl std::fmt::Display for Deviation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Higher => write!(f, "higher"),
            Self::Lower => write!(f, "lower"),
        }
    }
}

// ── Verdict ─────────────────────────────────────────────────────────────

/// Result of a single `detect_anomaly` call.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnomalyVerdict {
    pub is_anomaly: bool,
    /// Signed z-score; 0.0 when it could not be computed.
    pub z_score: f64,
    pub explanation: String,
}

impl AnomalyVerdict {
    pub(crate) fn insufficient_data() -> Self {
        Self {
            is_anomaly: false,
            z_score: 0.0,
            explanation: super::INSUFFICIENT_DATA.to_string(),
        }
    }

    pub(crate) fn no_variation() -> Self {
        Self {
            is_anomaly: false,
            z_score: 0.0,
            explanation: super::NO_VARIATION.to_string(),
        }
    }

    pub(crate) fn normal(z_score: f64) -> Self {
        Self {
            is_anomaly: false,
            z_score,
            explanation: super::NORMAL_BEHAVIOR.to_string(),
        }
    }
}

// ── Anomaly Log ─────────────────────────────────────────────────────────

/// A flagged anomaly, retained in the detector's bounded log.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AnomalyRecord {
    pub id: AnomalyId,
    pub metric: String,
    /// The value that was tested.
    pub value: f64,
    pub z_score: f64,
    pub direction: Deviation,
    /// Window mean at detection time.
    pub mean: f64,
    /// Window standard deviation at detection time.
    pub std_dev: f64,
    pub detected_at: DateTime<Utc>,
}

// ── Statistics ──────────────────────────────────────────────────────────

/// Summary of one metric's current window.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MetricStatistics {
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub max: f64,
    /// Most recently added sample.
    pub current: f64,
    pub count: usize,
}

/// Forecast of the next value from the weighted window average.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NextValuePrediction {
    /// `None` until the window holds enough samples.
    pub predicted: Option<f64>,
    /// `1 / (1 + variance)`; 0.0 when no prediction was made.
    pub confidence: f64,
}
