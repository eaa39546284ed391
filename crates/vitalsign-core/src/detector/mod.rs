//! Sliding-window z-score anomaly detection.
//!
//! ```text
//!   add_sample(metric, v) ──► VecDeque per metric (FIFO, ≤ window_size)
//!                                   │
//!   detect_anomaly(metric, x) ──────┤ mean / population std
//!                                   ▼
//!                 |z| > threshold ? ──► counter += 1, AnomalyRecord logged
//! ```

pub mod types;
pub mod window;

pub use types::{
    AnomalyId, AnomalyRecord, AnomalyVerdict, Deviation, MetricStatistics, NextValuePrediction,
};
pub use window::SlidingWindowDetector;

/// Default number of samples retained per metric.
pub const DEFAULT_WINDOW_SIZE: usize = 100;

/// Default z-score magnitude above which a sample is flagged.
pub const DEFAULT_Z_SCORE_THRESHOLD: f64 = 3.0;

/// Default cap on distinct metric names.
pub const DEFAULT_MAX_METRICS: usize = 64;

/// Samples required before `detect_anomaly` computes a z-score.
pub const MIN_DETECTION_SAMPLES: usize = 10;

/// Samples required before `predict_next_value` produces a value.
pub const MIN_PREDICTION_SAMPLES: usize = 5;

/// Maximum retained anomaly records (memory bound).
pub const MAX_ANOMALY_RECORDS: usize = 256;

pub(crate) const INSUFFICIENT_DATA: &str = "insufficient data";
pub(crate) const NO_VARIATION: &str = "no variation in data";
pub(crate) const NORMAL_BEHAVIOR: &str = "normal behavior";
