//! Report rendering.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use serde::Serialize;
use vitalsign_core::{HealthReport, MetricKey, Priority};

use crate::replay::ReplaySummary;
use crate::OutputFormat;

#[derive(Serialize)]
struct JsonOutput<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    replay: Option<&'a ReplaySummary>,
    report: &'a HealthReport,
}

pub fn print_report(
    report: &HealthReport,
    replay: Option<&ReplaySummary>,
    format: OutputFormat,
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => {
            let out = JsonOutput { replay, report };
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        OutputFormat::Text => print!("{}", render_text(report, replay)),
    }
    Ok(())
}

pub fn render_text(report: &HealthReport, replay: Option<&ReplaySummary>) -> String {
    let mut out = String::new();

    if let Some(summary) = replay {
        let _ = writeln!(out, "Samples replayed: {}", summary.samples);
        for a in &summary.anomalies {
            let _ = writeln!(out, "  line {}: {}", a.line, a.verdict.explanation);
        }
        let _ = writeln!(out);
    }

    let _ = writeln!(out, "Health score: {:.2} ({})", report.score, report.status);
    let _ = writeln!(out, "Anomalies detected: {}", report.anomaly_count);

    let _ = writeln!(out, "Metrics:");
    for key in MetricKey::ALL {
        let _ = writeln!(out, "  {:<14} {}", key.as_str(), report.metrics.get(key));
    }

    if !report.issues.is_empty() {
        let _ = writeln!(out, "Issues:");
        for issue in &report.issues {
            let _ = writeln!(out, "  - {}", issue);
        }
    }

    if !report.recommendations.is_empty() {
        let _ = writeln!(out, "Recommendations:");
        for rec in &report.recommendations {
            let priority = match rec.priority {
                Priority::High => "HIGH",
                Priority::Medium => "MEDIUM",
            };
            let _ = writeln!(out, "  [{}] {}: {}", priority, rec.issue, rec.action);
            let _ = writeln!(out, "         impact: {}", rec.impact);
        }
    }

    if !report.statistics.is_empty() {
        let _ = writeln!(out, "Statistics:");
        let sorted: BTreeMap<_, _> = report.statistics.iter().collect();
        for (metric, s) in sorted {
            let _ = writeln!(
                out,
                "  {:<14} n={:<4} mean={:.4} std={:.4} min={:.4} max={:.4} current={:.4}",
                metric, s.count, s.mean, s.std, s.min, s.max, s.current
            );
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use vitalsign_core::{MetricsSnapshot, ServiceMonitor};

    #[test]
    fn text_report_lists_score_and_issues() {
        let monitor = ServiceMonitor::with_defaults();
        let report = monitor.health(MetricsSnapshot::new(0.10, 0.3, 50.0, 20.0));
        let text = render_text(&report, None);
        // 100 - 10 (error rate) - 10 (response time)
        assert!(text.contains("Health score: 80.00 (Good)"));
        assert!(text.contains("High error rate: 10.00%"));
        assert!(text.contains("Slow response time: 300ms"));
        assert!(!text.contains("Recommendations:"));
        assert!(!text.contains("Samples replayed"));
    }

    #[test]
    fn statistics_are_sorted_by_metric() {
        let monitor = ServiceMonitor::with_defaults();
        monitor.observe("zeta", 1.0);
        monitor.observe("alpha", 2.0);
        let text = render_text(&monitor.health(MetricsSnapshot::default()), None);
        let alpha = text.find("alpha").unwrap();
        let zeta = text.find("zeta").unwrap();
        assert!(alpha < zeta);
    }
}
