//! The sliding-window detector and its per-metric state.

use std::collections::{HashMap, VecDeque};

use chrono::Utc;
use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::config::DetectorConfig;
use crate::error::InsightResult;
use crate::stats;

use super::types::{
    AnomalyId, AnomalyRecord, AnomalyVerdict, Deviation, MetricStatistics, NextValuePrediction,
};
use super::{MAX_ANOMALY_RECORDS, MIN_DETECTION_SAMPLES, MIN_PREDICTION_SAMPLES};

/// Everything the detector mutates, guarded by one lock.
#[derive(Default)]
struct DetectorState {
    /// Bounded history per metric, oldest at the front.
    streams: HashMap<String, VecDeque<f64>>,
    /// Process-lifetime count of flagged anomalies. Never reset.
    anomaly_count: u64,
    /// Most recent anomalies, oldest at the front.
    recent: VecDeque<AnomalyRecord>,
}

/// Per-metric bounded history with a z-score anomaly test.
///
/// All methods take `&self`; a single mutex serializes every mutation and
/// read, so statistics are never computed over a half-evicted buffer. The
/// detector is created with the process and never persisted.
pub struct SlidingWindowDetector {
    config: DetectorConfig,
    state: Mutex<DetectorState>,
}

impl SlidingWindowDetector {
    /// Create a detector, validating the configuration.
    pub fn try_new(config: DetectorConfig) -> InsightResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            state: Mutex::new(DetectorState::default()),
        })
    }

    /// Create a detector with window 100 and threshold 3.0.
    pub fn with_defaults() -> Self {
        Self {
            config: DetectorConfig::default(),
            state: Mutex::new(DetectorState::default()),
        }
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// Append a sample to the metric's history, evicting the oldest sample
    /// once the window is full.
    ///
    /// The metric is created on first use. When `max_metrics` distinct names
    /// are already tracked, samples for a new name are dropped.
    pub fn add_sample(&self, metric: &str, value: f64) {
        let mut state = self.state.lock();

        if !state.streams.contains_key(metric) {
            if state.streams.len() >= self.config.max_metrics {
                warn!(
                    metric,
                    max_metrics = self.config.max_metrics,
                    "metric capacity reached, dropping sample"
                );
                return;
            }
            debug!(metric, window_size = self.config.window_size, "tracking new metric");
        }

        let window_size = self.config.window_size;
        let buffer = state
            .streams
            .entry(metric.to_string())
            .or_insert_with(|| VecDeque::with_capacity(window_size));
        while buffer.len() >= window_size {
            buffer.pop_front();
        }
        buffer.push_back(value);
    }

    /// Test `current` against the metric's window as it stands now.
    ///
    /// Whether the window already contains `current` depends on whether the
    /// caller added it first.
    pub fn detect_anomaly(&self, metric: &str, current: f64) -> AnomalyVerdict {
        let mut state = self.state.lock();

        let (mean, std) = match state.streams.get(metric) {
            Some(history) if history.len() >= MIN_DETECTION_SAMPLES => {
                match (stats::mean(history), stats::population_std(history)) {
                    (Some(mean), Some(std)) => (mean, std),
                    _ => return AnomalyVerdict::insufficient_data(),
                }
            }
            _ => return AnomalyVerdict::insufficient_data(),
        };

        if std == 0.0 {
            return AnomalyVerdict::no_variation();
        }

        let z_score = (current - mean) / std;
        // NaN never exceeds the threshold.
        if z_score.is_nan() || z_score.abs() <= self.config.threshold {
            return AnomalyVerdict::normal(z_score);
        }

        let direction = Deviation::of(z_score);
        state.anomaly_count += 1;
        if state.recent.len() >= MAX_ANOMALY_RECORDS {
            state.recent.pop_front();
        }
        state.recent.push_back(AnomalyRecord {
            id: AnomalyId::new(),
            metric: metric.to_string(),
            value: current,
            z_score,
            direction,
            mean,
            std_dev: std,
            detected_at: Utc::now(),
        });

        AnomalyVerdict {
            is_anomaly: true,
            z_score,
            explanation: format!(
                "{} is {:.2}σ {} than normal (mean={:.4}, std={:.4})",
                metric,
                z_score.abs(),
                direction,
                mean,
                std
            ),
        }
    }

    /// Window summary for every metric holding at least one sample.
    pub fn get_statistics(&self) -> HashMap<String, MetricStatistics> {
        let state = self.state.lock();
        state
            .streams
            .iter()
            .filter_map(|(name, history)| {
                let current = *history.back()?;
                let mean = stats::mean(history)?;
                let std = stats::population_std(history)?;
                let min = history.iter().copied().fold(f64::INFINITY, f64::min);
                let max = history.iter().copied().fold(f64::NEG_INFINITY, f64::max);
                Some((
                    name.clone(),
                    MetricStatistics {
                        mean,
                        std,
                        min,
                        max,
                        current,
                        count: history.len(),
                    },
                ))
            })
            .collect()
    }

    /// Exponentially weighted average of the window, most recent sample
    /// weighted most, with a variance-based confidence.
    pub fn predict_next_value(&self, metric: &str) -> NextValuePrediction {
        let state = self.state.lock();
        let none = NextValuePrediction {
            predicted: None,
            confidence: 0.0,
        };

        let history = match state.streams.get(metric) {
            Some(h) if h.len() >= MIN_PREDICTION_SAMPLES => h,
            _ => return none,
        };

        let weights = stats::exp_ramp_weights(history.len());
        let predicted: f64 = history.iter().zip(&weights).map(|(v, w)| v * w).sum();
        let variance = match stats::population_variance(history) {
            Some(v) => v,
            None => return none,
        };

        NextValuePrediction {
            predicted: Some(predicted),
            confidence: 1.0 / (1.0 + variance),
        }
    }

    /// Total anomalies flagged since the detector was created.
    pub fn anomaly_count(&self) -> u64 {
        self.state.lock().anomaly_count
    }

    /// Copy of the metric's window, oldest first. Empty for unknown metrics.
    pub fn history(&self, metric: &str) -> Vec<f64> {
        self.state
            .lock()
            .streams
            .get(metric)
            .map(|h| h.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Copy of the retained anomaly log, oldest first.
    pub fn recent_anomalies(&self) -> Vec<AnomalyRecord> {
        self.state.lock().recent.iter().cloned().collect()
    }

    /// Number of metrics currently tracked.
    pub fn metric_count(&self) -> usize {
        self.state.lock().streams.len()
    }
}

impl Default for SlidingWindowDetector {
    fn default() -> Self {
        Self::with_defaults()
    }
}
