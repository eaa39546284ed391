//! Configuration for the monitoring core.
//!
//! Every section has serde defaults, so a config file only needs to name
//! the values it overrides. Sources are layered as defaults, then an
//! optional file, then `VITALSIGN__*` environment variables
//! (`VITALSIGN__DETECTOR__WINDOW_SIZE=50`).

use serde::{Deserialize, Serialize};

use crate::detector::{DEFAULT_MAX_METRICS, DEFAULT_WINDOW_SIZE, DEFAULT_Z_SCORE_THRESHOLD};
use crate::error::{InsightError, InsightResult};
use crate::predictor::{DEFAULT_ALPHA, DEFAULT_FORECAST_STEPS};

/// Top-level configuration for a [`ServiceMonitor`](crate::ServiceMonitor).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InsightConfig {
    /// Sliding-window detector settings
    #[serde(default)]
    pub detector: DetectorConfig,

    /// Trend predictor settings
    #[serde(default)]
    pub predictor: PredictorConfig,

    /// Health scorer settings
    #[serde(default)]
    pub scorer: ScorerConfig,

    /// Composition settings
    #[serde(default)]
    pub monitor: MonitorConfig,
}

/// Sliding-window detector configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectorConfig {
    /// Samples retained per metric (oldest evicted first).
    #[serde(default = "default_window_size")]
    pub window_size: usize,

    /// |z| above which a value is flagged.
    #[serde(default = "default_threshold")]
    pub threshold: f64,

    /// Maximum number of distinct metric names tracked.
    #[serde(default = "default_max_metrics")]
    pub max_metrics: usize,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            window_size: DEFAULT_WINDOW_SIZE,
            threshold: DEFAULT_Z_SCORE_THRESHOLD,
            max_metrics: DEFAULT_MAX_METRICS,
        }
    }
}

impl DetectorConfig {
    pub fn validate(&self) -> InsightResult<()> {
        if self.window_size == 0 {
            return Err(InsightError::invalid(
                "detector.window_size",
                "must be at least 1",
            ));
        }
        if !self.threshold.is_finite() || self.threshold <= 0.0 {
            return Err(InsightError::invalid(
                "detector.threshold",
                format!("must be a positive finite number, got {}", self.threshold),
            ));
        }
        if self.max_metrics == 0 {
            return Err(InsightError::invalid(
                "detector.max_metrics",
                "must be at least 1",
            ));
        }
        Ok(())
    }
}

/// Exponential-smoothing predictor configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictorConfig {
    /// Weight on the newest observation, in (0, 1].
    #[serde(default = "default_alpha")]
    pub alpha: f64,
}

impl Default for PredictorConfig {
    fn default() -> Self {
        Self {
            alpha: DEFAULT_ALPHA,
        }
    }
}

impl PredictorConfig {
    pub fn validate(&self) -> InsightResult<()> {
        if !(self.alpha > 0.0 && self.alpha <= 1.0) {
            return Err(InsightError::invalid(
                "predictor.alpha",
                format!("must be in (0, 1], got {}", self.alpha),
            ));
        }
        Ok(())
    }
}

/// Declared relative importance of each scored metric.
///
/// These are reported alongside scores but the deductions themselves are
/// flat, independently capped penalties.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreWeights {
    #[serde(default = "default_error_rate_weight")]
    pub error_rate: f64,
    #[serde(default = "default_response_time_weight")]
    pub response_time: f64,
    #[serde(default = "default_memory_usage_weight")]
    pub memory_usage: f64,
    #[serde(default = "default_cpu_usage_weight")]
    pub cpu_usage: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            error_rate: 0.4,
            response_time: 0.3,
            memory_usage: 0.2,
            cpu_usage: 0.1,
        }
    }
}

/// Health scorer configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScorerConfig {
    #[serde(default)]
    pub weights: ScoreWeights,
}

impl ScorerConfig {
    pub fn validate(&self) -> InsightResult<()> {
        let w = &self.weights;
        for (field, value) in [
            ("scorer.weights.error_rate", w.error_rate),
            ("scorer.weights.response_time", w.response_time),
            ("scorer.weights.memory_usage", w.memory_usage),
            ("scorer.weights.cpu_usage", w.cpu_usage),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(InsightError::invalid(
                    field,
                    format!("must be a non-negative finite number, got {}", value),
                ));
            }
        }
        Ok(())
    }
}

/// Settings for the composed [`ServiceMonitor`](crate::ServiceMonitor).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// Forecast horizon returned with every observed sample.
    #[serde(default = "default_forecast_steps")]
    pub forecast_steps: usize,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            forecast_steps: DEFAULT_FORECAST_STEPS,
        }
    }
}

// Default value helpers
fn default_window_size() -> usize {
    DEFAULT_WINDOW_SIZE
}

fn default_threshold() -> f64 {
    DEFAULT_Z_SCORE_THRESHOLD
}

fn default_max_metrics() -> usize {
    DEFAULT_MAX_METRICS
}

fn default_alpha() -> f64 {
    DEFAULT_ALPHA
}

fn default_forecast_steps() -> usize {
    DEFAULT_FORECAST_STEPS
}

fn default_error_rate_weight() -> f64 {
    0.4
}

fn default_response_time_weight() -> f64 {
    0.3
}

fn default_memory_usage_weight() -> f64 {
    0.2
}

fn default_cpu_usage_weight() -> f64 {
    0.1
}

impl InsightConfig {
    /// Load configuration from defaults, an optional file and the environment.
    ///
    /// The file format is inferred from its extension (TOML, YAML, JSON).
    /// The result is validated before it is returned.
    pub fn load(path: Option<&str>) -> InsightResult<Self> {
        let mut builder = config::Config::builder();

        builder = builder.add_source(config::Config::try_from(&InsightConfig::default())?);

        if let Some(path) = path {
            builder = builder.add_source(config::File::with_name(path).required(true));
        }

        builder = builder.add_source(
            config::Environment::with_prefix("VITALSIGN")
                .separator("__")
                .try_parsing(true),
        );

        let loaded: InsightConfig = builder.build()?.try_deserialize()?;
        loaded.validate()?;
        Ok(loaded)
    }

    /// Check every section, reporting the first invalid field.
    pub fn validate(&self) -> InsightResult<()> {
        self.detector.validate()?;
        self.predictor.validate()?;
        self.scorer.validate()?;
        Ok(())
    }
}
