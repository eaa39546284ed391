//! Shared-state behavior under concurrent request handlers.

use std::sync::Arc;

use vitalsign_core::{DetectorConfig, InsightConfig, MetricsSnapshot, ServiceMonitor};

const TASKS: usize = 16;
const SAMPLES_PER_TASK: usize = 250;

fn monitor(window_size: usize) -> Arc<ServiceMonitor> {
    let config = InsightConfig {
        detector: DetectorConfig {
            window_size,
            ..DetectorConfig::default()
        },
        ..InsightConfig::default()
    };
    Arc::new(ServiceMonitor::new(config).expect("valid config"))
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_writers_respect_window_bound() {
    let monitor = monitor(64);

    let mut handles = Vec::new();
    for t in 0..TASKS {
        let monitor = Arc::clone(&monitor);
        handles.push(tokio::spawn(async move {
            for i in 0..SAMPLES_PER_TASK {
                let value = 0.1 + ((t * SAMPLES_PER_TASK + i) % 7) as f64 * 0.01;
                monitor.observe("response_time", value);
                if i % 25 == 0 {
                    tokio::task::yield_now().await;
                }
            }
        }));
    }
    for handle in handles {
        handle.await.expect("writer task panicked");
    }

    let history = monitor.detector().history("response_time");
    assert_eq!(history.len(), 64);

    let state = monitor.predictor().state("response_time").expect("state exists");
    assert_eq!(state.observations, (TASKS * SAMPLES_PER_TASK) as u64);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn readers_never_observe_torn_windows() {
    let monitor = monitor(32);

    let writer = {
        let monitor = Arc::clone(&monitor);
        tokio::spawn(async move {
            for i in 0..5_000 {
                monitor.observe("memory_usage", (i % 100) as f64);
                if i % 100 == 0 {
                    tokio::task::yield_now().await;
                }
            }
        })
    };

    let reader = {
        let monitor = Arc::clone(&monitor);
        tokio::spawn(async move {
            for _ in 0..500 {
                let stats = monitor.detector().get_statistics();
                if let Some(s) = stats.get("memory_usage") {
                    assert!(s.count >= 1 && s.count <= 32);
                    assert!(s.min <= s.mean + 1e-9 && s.mean <= s.max + 1e-9);
                    assert!(s.min <= s.current && s.current <= s.max);
                }
                let report = monitor.health(MetricsSnapshot::new(0.0, 0.1, 50.0, 10.0));
                assert_eq!(report.score, 100.0);
                tokio::task::yield_now().await;
            }
        })
    };

    writer.await.expect("writer task panicked");
    reader.await.expect("reader task panicked");
    assert_eq!(monitor.detector().history("memory_usage").len(), 32);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn anomaly_count_matches_flagged_verdicts() {
    let monitor = monitor(100);
    for i in 0..20 {
        monitor.observe("error_rate", if i % 2 == 0 { 0.01 } else { 0.02 });
    }

    let mut handles = Vec::new();
    for _ in 0..8 {
        let monitor = Arc::clone(&monitor);
        handles.push(tokio::spawn(async move {
            let verdict = monitor.detector().detect_anomaly("error_rate", 5.0);
            u64::from(verdict.is_anomaly)
        }));
    }

    let mut flagged = 0;
    for handle in handles {
        flagged += handle.await.expect("detector task panicked");
    }
    assert_eq!(flagged, 8);
    assert_eq!(monitor.detector().anomaly_count(), 8);
}
