//! Caller-side composition of the detector, predictor and scorer.
//!
//! The three components never call each other. `ServiceMonitor` is the
//! glue a request handler would otherwise write by hand: feed each sample
//! to both stateful components, then score a snapshot on demand.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info};

use crate::config::InsightConfig;
use crate::detector::{AnomalyVerdict, MetricStatistics, SlidingWindowDetector};
use crate::error::InsightResult;
use crate::predictor::{Trend, TrendPredictor};
use crate::scorer::{HealthScorer, HealthStatus, Recommendation};
use crate::snapshot::MetricsSnapshot;

/// Everything derived from one observed sample.
#[derive(Clone, Debug, Serialize)]
pub struct SampleInsight {
    pub metric: String,
    pub value: f64,
    pub anomaly: AnomalyVerdict,
    pub smoothed: f64,
    pub trend: Trend,
    pub forecast: Vec<f64>,
}

/// Health report for external consumers (dashboards, health checks).
#[derive(Clone, Debug, Serialize)]
pub struct HealthReport {
    pub score: f64,
    pub status: HealthStatus,
    pub issues: Vec<String>,
    pub recommendations: Vec<Recommendation>,
    pub metrics: MetricsSnapshot,
    pub statistics: HashMap<String, MetricStatistics>,
    pub anomaly_count: u64,
    pub generated_at: DateTime<Utc>,
}

/// One detector, one predictor and one scorer sharing a configuration.
///
/// Safe to share behind an `Arc`; each component serializes its own state.
pub struct ServiceMonitor {
    detector: SlidingWindowDetector,
    predictor: TrendPredictor,
    scorer: HealthScorer,
    forecast_steps: usize,
}

impl ServiceMonitor {
    pub fn new(config: InsightConfig) -> InsightResult<Self> {
        config.validate()?;
        Ok(Self {
            detector: SlidingWindowDetector::try_new(config.detector)?,
            predictor: TrendPredictor::try_new(config.predictor)?,
            scorer: HealthScorer::try_new(config.scorer)?,
            forecast_steps: config.monitor.forecast_steps,
        })
    }

    pub fn with_defaults() -> Self {
        Self {
            detector: SlidingWindowDetector::with_defaults(),
            predictor: TrendPredictor::with_defaults(),
            scorer: HealthScorer::with_defaults(),
            forecast_steps: crate::predictor::DEFAULT_FORECAST_STEPS,
        }
    }

    /// Record one sample.
    ///
    /// The value is tested against the window *before* it is appended, so a
    /// spike is compared with the history that preceded it.
    pub fn observe(&self, metric: &str, value: f64) -> SampleInsight {
        let anomaly = self.detector.detect_anomaly(metric, value);
        self.detector.add_sample(metric, value);

        if anomaly.is_anomaly {
            info!(
                metric,
                value,
                z_score = anomaly.z_score,
                "anomaly detected: {}",
                anomaly.explanation
            );
        }

        let smoothed = self.predictor.update(metric, value);
        let trend = self.predictor.detect_trend(metric);
        let forecast = self.predictor.predict_n_steps(metric, self.forecast_steps);

        debug!(metric, value, smoothed, trend = %trend.direction, "sample observed");

        SampleInsight {
            metric: metric.to_string(),
            value,
            anomaly,
            smoothed,
            trend,
            forecast,
        }
    }

    /// Score a snapshot and attach recommendations and window statistics.
    pub fn health(&self, metrics: MetricsSnapshot) -> HealthReport {
        let result = self.scorer.calculate_score(&metrics);
        let recommendations = self.scorer.get_recommendations(&metrics, result.score);

        debug!(
            score = result.score,
            status = %result.status,
            issues = result.issues.len(),
            "health scored"
        );

        HealthReport {
            score: result.score,
            status: result.status,
            issues: result.issues,
            recommendations,
            metrics,
            statistics: self.detector.get_statistics(),
            anomaly_count: self.detector.anomaly_count(),
            generated_at: Utc::now(),
        }
    }

    pub fn detector(&self) -> &SlidingWindowDetector {
        &self.detector
    }

    pub fn predictor(&self) -> &TrendPredictor {
        &self.predictor
    }

    pub fn scorer(&self) -> &HealthScorer {
        &self.scorer
    }
}

impl Default for ServiceMonitor {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DetectorConfig;
    use crate::predictor::TrendDirection;

    #[test]
    fn observe_feeds_both_components() {
        let monitor = ServiceMonitor::with_defaults();
        let insight = monitor.observe("response_time", 0.12);

        assert_eq!(insight.anomaly.explanation, "insufficient data");
        assert_eq!(insight.smoothed, 0.12);
        assert_eq!(insight.trend.direction, TrendDirection::Stable);
        assert_eq!(insight.forecast.len(), 10);
        assert_eq!(monitor.detector().history("response_time"), vec![0.12]);
        assert!(monitor.predictor().state("response_time").is_some());
    }

    #[test]
    fn spike_is_tested_against_prior_history() {
        let monitor = ServiceMonitor::with_defaults();
        for i in 0..20 {
            monitor.observe("response_time", if i % 2 == 0 { 0.09 } else { 0.11 });
        }
        let insight = monitor.observe("response_time", 0.5);

        assert!(insight.anomaly.is_anomaly);
        assert!(insight.anomaly.z_score > 3.0);
        assert_eq!(monitor.detector().anomaly_count(), 1);
        assert_eq!(monitor.detector().history("response_time").len(), 21);
        assert_eq!(insight.trend.direction, TrendDirection::Decreasing);
    }

    #[test]
    fn forecast_horizon_follows_config() {
        let mut config = InsightConfig::default();
        config.monitor.forecast_steps = 3;
        let monitor = ServiceMonitor::new(config).unwrap();
        assert_eq!(monitor.observe("cpu_usage", 50.0).forecast.len(), 3);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = InsightConfig {
            detector: DetectorConfig {
                max_metrics: 0,
                ..DetectorConfig::default()
            },
            ..InsightConfig::default()
        };
        assert!(ServiceMonitor::new(config).is_err());
    }

    #[test]
    fn health_report_combines_outputs() {
        let monitor = ServiceMonitor::with_defaults();
        monitor.observe("memory_usage", 91.0);

        let report = monitor.health(MetricsSnapshot::new(0.3, 0.8, 91.0, 10.0));
        // 100 - 30 - 30 - 5.5
        assert_eq!(report.score, 34.5);
        assert_eq!(report.status, HealthStatus::Critical);
        assert_eq!(report.issues.len(), 3);
        assert_eq!(report.recommendations.len(), 3);
        assert_eq!(report.statistics["memory_usage"].count, 1);
        assert_eq!(report.anomaly_count, 0);
    }

    #[test]
    fn health_report_serializes_to_json() {
        let monitor = ServiceMonitor::with_defaults();
        let report = monitor.health(MetricsSnapshot::default());
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["score"], 100.0);
        assert_eq!(json["status"], "Excellent");
        assert!(json["recommendations"].as_array().unwrap().is_empty());
        assert!(json["generated_at"].is_string());
    }
}
