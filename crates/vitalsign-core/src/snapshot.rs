//! Point-in-time view of the four scored service metrics.

use serde::{Deserialize, Serialize};

/// The well-known metric names understood by the health scorer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKey {
    /// Failed requests as a fraction, 0..1.
    ErrorRate,
    /// Request latency in seconds.
    ResponseTime,
    /// Percent of the configured memory limit.
    MemoryUsage,
    /// Percent CPU.
    CpuUsage,
}

impl MetricKey {
    pub const ALL: [MetricKey; 4] = [
        MetricKey::ErrorRate,
        MetricKey::ResponseTime,
        MetricKey::MemoryUsage,
        MetricKey::CpuUsage,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ErrorRate => "error_rate",
            Self::ResponseTime => "response_time",
            Self::MemoryUsage => "memory_usage",
            Self::CpuUsage => "cpu_usage",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == name)
    }
}

impl std::fmt::Display for MetricKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Current values of the scored metrics, built fresh for each scoring call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    #[serde(default)]
    pub error_rate: f64,
    #[serde(default)]
    pub response_time: f64,
    #[serde(default)]
    pub memory_usage: f64,
    #[serde(default)]
    pub cpu_usage: f64,
}

impl MetricsSnapshot {
    pub fn new(error_rate: f64, response_time: f64, memory_usage: f64, cpu_usage: f64) -> Self {
        Self {
            error_rate,
            response_time,
            memory_usage,
            cpu_usage,
        }
    }

    /// Build from name/value pairs. Missing keys stay at 0.0 and names that
    /// are not well-known are ignored; a repeated key keeps its last value.
    pub fn from_pairs<I, K>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, f64)>,
        K: AsRef<str>,
    {
        let mut snapshot = Self::default();
        for (name, value) in pairs {
            if let Some(key) = MetricKey::parse(name.as_ref()) {
                snapshot.set(key, value);
            }
        }
        snapshot
    }

    pub fn get(&self, key: MetricKey) -> f64 {
        match key {
            MetricKey::ErrorRate => self.error_rate,
            MetricKey::ResponseTime => self.response_time,
            MetricKey::MemoryUsage => self.memory_usage,
            MetricKey::CpuUsage => self.cpu_usage,
        }
    }

    pub fn set(&mut self, key: MetricKey, value: f64) {
        match key {
            MetricKey::ErrorRate => self.error_rate = value,
            MetricKey::ResponseTime => self.response_time = value,
            MetricKey::MemoryUsage => self.memory_usage = value,
            MetricKey::CpuUsage => self.cpu_usage = value,
        }
    }
}
