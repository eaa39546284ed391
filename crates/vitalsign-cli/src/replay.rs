//! JSON-lines sample replay.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use vitalsign_core::{AnomalyVerdict, MetricKey, MetricsSnapshot, ServiceMonitor};

/// One line of a replay file.
#[derive(Debug, Deserialize)]
pub struct ReplaySample {
    pub metric: String,
    pub value: f64,
}

/// An anomaly raised while replaying, tagged with its source line.
#[derive(Debug, Clone, Serialize)]
pub struct ReplayAnomaly {
    pub line: usize,
    pub metric: String,
    pub value: f64,
    pub verdict: AnomalyVerdict,
}

/// What a replay produced besides the monitor's own state.
#[derive(Debug, Clone, Serialize)]
pub struct ReplaySummary {
    pub samples: usize,
    /// Latest value of each well-known metric; others are left at 0.
    pub snapshot: MetricsSnapshot,
    pub anomalies: Vec<ReplayAnomaly>,
}

pub fn replay_file(monitor: &ServiceMonitor, path: impl AsRef<Path>) -> anyhow::Result<ReplaySummary> {
    let path = path.as_ref();
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    replay_lines(monitor, BufReader::new(file))
}

pub fn replay_lines<R: BufRead>(monitor: &ServiceMonitor, reader: R) -> anyhow::Result<ReplaySummary> {
    let mut summary = ReplaySummary {
        samples: 0,
        snapshot: MetricsSnapshot::default(),
        anomalies: Vec::new(),
    };

    for (idx, line) in reader.lines().enumerate() {
        let line_no = idx + 1;
        let line = line.with_context(|| format!("reading line {}", line_no))?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let sample: ReplaySample = serde_json::from_str(trimmed)
            .with_context(|| format!("line {}: malformed sample", line_no))?;
        if !sample.value.is_finite() {
            bail!("line {}: value for {} is not finite", line_no, sample.metric);
        }

        let insight = monitor.observe(&sample.metric, sample.value);
        if let Some(key) = MetricKey::parse(&sample.metric) {
            summary.snapshot.set(key, sample.value);
        }
        if insight.anomaly.is_anomaly {
            summary.anomalies.push(ReplayAnomaly {
                line: line_no,
                metric: sample.metric,
                value: sample.value,
                verdict: insight.anomaly,
            });
        }
        summary.samples += 1;
    }

    debug!(samples = summary.samples, "replay finished");
    info!(
        samples = summary.samples,
        anomalies = summary.anomalies.len(),
        "replay complete"
    );
    Ok(summary)
}
