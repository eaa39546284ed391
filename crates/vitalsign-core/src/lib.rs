//! # vitalsign-core
//!
//! In-process statistical monitoring for a single service. Scalar samples
//! (response time, memory usage, error rate, CPU usage) go in; anomaly
//! flags, short-horizon forecasts and a composite health score come out.
//!
//! ## Architecture
//!
//! ```text
//!   sample(metric, value)
//!       │
//!       ├──► SlidingWindowDetector   bounded window, z-score test, anomaly log
//!       │
//!       └──► TrendPredictor          EWMA estimate, trend, 1%/step forecast
//!
//!   MetricsSnapshot ──► HealthScorer ──► score, status, issues, recommendations
//! ```
//!
//! The components are independent. [`ServiceMonitor`] bundles one of each
//! for callers that want the usual wiring.
//!
//! ## Guarantees
//!
//! - A metric's window never exceeds the configured size; eviction is FIFO.
//! - The anomaly counter only grows and lives as long as the detector.
//! - Too little data, zero variance and unknown metrics produce sentinel
//!   results, never errors.
//! - All state is in memory and guarded by one lock per component.
//!
//! ## Quick Start
//!
//! ```rust
//! use vitalsign_core::{MetricsSnapshot, ServiceMonitor};
//!
//! let monitor = ServiceMonitor::with_defaults();
//! for i in 0..20 {
//!     monitor.observe("response_time", 0.1 + (i % 3) as f64 * 0.01);
//! }
//! let insight = monitor.observe("response_time", 0.9);
//! assert!(insight.anomaly.is_anomaly);
//!
//! let report = monitor.health(MetricsSnapshot::new(0.01, 0.9, 40.0, 20.0));
//! assert_eq!(report.issues, vec!["Slow response time: 900ms".to_string()]);
//! ```

#![deny(unsafe_code)]

pub mod config;
pub mod detector;
pub mod error;
pub mod monitor;
pub mod predictor;
pub mod scorer;
pub mod snapshot;
pub mod stats;

// ── Re-exports ──────────────────────────────────────────────────────────

pub use config::{
    DetectorConfig, InsightConfig, MonitorConfig, PredictorConfig, ScoreWeights, ScorerConfig,
};
pub use detector::{
    AnomalyId, AnomalyRecord, AnomalyVerdict, Deviation, MetricStatistics, NextValuePrediction,
    SlidingWindowDetector,
};
pub use error::{InsightError, InsightResult};
pub use monitor::{HealthReport, SampleInsight, ServiceMonitor};
pub use predictor::{SmoothingState, Trend, TrendDirection, TrendPredictor};
pub use scorer::{HealthScorer, HealthStatus, Priority, Recommendation, ScoreResult};
pub use snapshot::{MetricKey, MetricsSnapshot};
