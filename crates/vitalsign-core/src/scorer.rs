//! Composite health scoring.
//!
//! The score starts at 100 and loses an independently capped deduction for
//! each metric past its threshold. Declared weights travel with the scorer
//! for reporting but do not scale the deductions.
//!
//! Recommendations use their own, more conservative thresholds for latency
//! and memory than the score deductions do.

use serde::{Deserialize, Serialize};

use crate::config::{ScoreWeights, ScorerConfig};
use crate::error::InsightResult;
use crate::snapshot::MetricsSnapshot;

// Score deduction thresholds and caps.
const ERROR_RATE_THRESHOLD: f64 = 0.05;
const ERROR_RATE_CAP: f64 = 40.0;
const RESPONSE_TIME_THRESHOLD: f64 = 0.2;
const RESPONSE_TIME_CAP: f64 = 30.0;
const MEMORY_THRESHOLD: f64 = 80.0;
const MEMORY_CAP: f64 = 20.0;
const CPU_THRESHOLD: f64 = 70.0;
const CPU_CAP: f64 = 10.0;

// Recommendation triggers.
const RECOMMEND_BELOW_SCORE: f64 = 75.0;
const RECOMMEND_RESPONSE_TIME: f64 = 0.5;
const RECOMMEND_MEMORY: f64 = 85.0;

/// Overall health label.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HealthStatus {
    /// Score ≥ 90.
    Excellent,
    /// Score ≥ 75.
    Good,
    /// Score ≥ 50.
    Warning,
    Critical,
}

impl HealthStatus {
    pub fn from_score(score: f64) -> Self {
        if score >= 90.0 {
            Self::Excellent
        } else if score >= 75.0 {
            Self::Good
        } else if score >= 50.0 {
            Self::Warning
        } else {
            Self::Critical
        }
    }
}

impl std::fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Excellent => write!(f, "Excellent"),
            Self::Good => write!(f, "Good"),
            Self::Warning => write!(f, "Warning"),
            Self::Critical => write!(f, "Critical"),
        }
    }
}

/// Output of [`HealthScorer::calculate_score`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    /// At most 100, rounded to two decimals. Not clamped below.
    pub score: f64,
    pub status: HealthStatus,
    /// One message per breached threshold, in scoring order.
    pub issues: Vec<String>,
}

/// Urgency of a recommendation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
}

/// An actionable suggestion attached to a poor score.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub priority: Priority,
    pub issue: String,
    pub action: String,
    pub impact: String,
}

impl Recommendation {
    fn new(priority: Priority, issue: &str, action: &str, impact: &str) -> Self {
        Self {
            priority,
            issue: issue.to_string(),
            action: action.to_string(),
            impact: impact.to_string(),
        }
    }
}

/// Stateless health scorer.
#[derive(Clone, Debug, Default)]
pub struct HealthScorer {
    weights: ScoreWeights,
}

impl HealthScorer {
    pub fn try_new(config: ScorerConfig) -> InsightResult<Self> {
        config.validate()?;
        Ok(Self {
            weights: config.weights,
        })
    }

    pub fn with_defaults() -> Self {
        Self::default()
    }

    /// Declared relative importance of each metric.
    pub fn weights(&self) -> &ScoreWeights {
        &self.weights
    }

    pub fn calculate_score(&self, metrics: &MetricsSnapshot) -> ScoreResult {
        let mut score = 100.0;
        let mut issues = Vec::new();

        let error_rate = metrics.error_rate;
        if error_rate > ERROR_RATE_THRESHOLD {
            score -= (error_rate * 100.0).min(ERROR_RATE_CAP);
            issues.push(format!("High error rate: {:.2}%", error_rate * 100.0));
        }

        let response_time = metrics.response_time;
        if response_time > RESPONSE_TIME_THRESHOLD {
            score -= ((response_time - RESPONSE_TIME_THRESHOLD) * 100.0).min(RESPONSE_TIME_CAP);
            issues.push(format!("Slow response time: {:.0}ms", response_time * 1000.0));
        }

        let memory = metrics.memory_usage;
        if memory > MEMORY_THRESHOLD {
            score -= ((memory - MEMORY_THRESHOLD) / 2.0).min(MEMORY_CAP);
            issues.push(format!("High memory usage: {:.1}%", memory));
        }

        let cpu = metrics.cpu_usage;
        if cpu > CPU_THRESHOLD {
            score -= ((cpu - CPU_THRESHOLD) / 3.0).min(CPU_CAP);
            issues.push(format!("High CPU usage: {:.1}%", cpu));
        }

        ScoreResult {
            score: round2(score),
            status: HealthStatus::from_score(score),
            issues,
        }
    }

    /// Recommendations for a score below 75; empty otherwise.
    pub fn get_recommendations(&self, metrics: &MetricsSnapshot, score: f64) -> Vec<Recommendation> {
        let mut recommendations = Vec::new();
        if score >= RECOMMEND_BELOW_SCORE {
            return recommendations;
        }

        if metrics.error_rate > ERROR_RATE_THRESHOLD {
            recommendations.push(Recommendation::new(
                Priority::High,
                "High error rate",
                "Check application logs for recurring errors",
                "User experience",
            ));
        }
        if metrics.response_time > RECOMMEND_RESPONSE_TIME {
            recommendations.push(Recommendation::new(
                Priority::High,
                "Slow response time",
                "Consider adding caching or optimizing queries",
                "Performance",
            ));
        }
        if metrics.memory_usage > RECOMMEND_MEMORY {
            recommendations.push(Recommendation::new(
                Priority::Medium,
                "High memory usage",
                "Scale up pods or investigate memory leaks",
                "Stability",
            ));
        }

        recommendations
    }
}

/// Round to two decimals, ties away from zero.
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
