//! Property tests for the detector, predictor and scorer.

use proptest::prelude::*;
use vitalsign_core::{
    DetectorConfig, HealthScorer, MetricsSnapshot, SlidingWindowDetector, Trend, TrendPredictor,
};

// ---------------------------------------------------------------------------
// Helpers / Strategies
// ---------------------------------------------------------------------------

fn detector(window_size: usize) -> SlidingWindowDetector {
    SlidingWindowDetector::try_new(DetectorConfig {
        window_size,
        ..DetectorConfig::default()
    })
    .expect("valid detector config")
}

/// Finite sample values in a telemetry-like range.
fn arb_value() -> impl Strategy<Value = f64> {
    -1.0e6..1.0e6f64
}

fn arb_snapshot() -> impl Strategy<Value = MetricsSnapshot> {
    (0.0..1.0f64, 0.0..5.0f64, 0.0..150.0f64, 0.0..100.0f64)
        .prop_map(|(e, r, m, c)| MetricsSnapshot::new(e, r, m, c))
}

// ---------------------------------------------------------------------------
// Property Tests
// ---------------------------------------------------------------------------

proptest! {
    /// Below ten samples the detector never flags and never reports a z-score.
    #[test]
    fn cold_start_never_flags(
        samples in prop::collection::vec(arb_value(), 0..10),
        probe in arb_value(),
    ) {
        let d = SlidingWindowDetector::with_defaults();
        for v in &samples {
            d.add_sample("m", *v);
        }
        let verdict = d.detect_anomaly("m", probe);
        prop_assert!(!verdict.is_anomaly);
        prop_assert_eq!(verdict.z_score, 0.0);
        prop_assert_eq!(d.anomaly_count(), 0);
    }

    /// A window full of one constant never varies.
    #[test]
    fn constant_window_reports_no_variation(value in arb_value(), window in 10usize..120) {
        let d = detector(window);
        for _ in 0..window {
            d.add_sample("m", value);
        }
        let verdict = d.detect_anomaly("m", value);
        prop_assert!(!verdict.is_anomaly);
        prop_assert_eq!(verdict.z_score, 0.0);
        prop_assert_eq!(verdict.explanation, "no variation in data");
    }

    /// After window + k samples the buffer holds exactly the last `window`.
    #[test]
    fn window_keeps_last_n_in_order(
        window in 1usize..50,
        samples in prop::collection::vec(arb_value(), 0..150),
    ) {
        let d = detector(window);
        for v in &samples {
            d.add_sample("m", *v);
        }
        let history = d.history("m");
        let start = samples.len().saturating_sub(window);
        prop_assert!(history.len() <= window);
        prop_assert_eq!(history, samples[start..].to_vec());
    }

    /// The anomaly counter never decreases.
    #[test]
    fn anomaly_counter_is_monotone(
        seed in prop::collection::vec(arb_value(), 10..40),
        probes in prop::collection::vec(arb_value(), 1..40),
    ) {
        let d = SlidingWindowDetector::with_defaults();
        for v in &seed {
            d.add_sample("m", *v);
        }
        let mut last = d.anomaly_count();
        for p in &probes {
            let verdict = d.detect_anomaly("m", *p);
            let now = d.anomaly_count();
            prop_assert!(now >= last);
            prop_assert_eq!(now - last, u64::from(verdict.is_anomaly));
            last = now;
            d.add_sample("m", *p);
        }
    }

    /// A fresh metric echoes its first value and reports a stable trend.
    #[test]
    fn first_update_is_identity_and_stable(value in arb_value()) {
        let p = TrendPredictor::with_defaults();
        prop_assert_eq!(p.update("m", value), value);
        prop_assert_eq!(p.detect_trend("m"), Trend::STABLE);
    }

    /// The forecast is the smoothed value grown 1% per step.
    #[test]
    fn forecast_is_linear_in_step(value in arb_value(), n in 0usize..30) {
        let p = TrendPredictor::with_defaults();
        p.update("m", value);
        let forecast = p.predict_n_steps("m", n);
        prop_assert_eq!(forecast.len(), n);
        for (i, f) in forecast.iter().enumerate() {
            let expected = value * (1.0 + 0.01 * i as f64);
            prop_assert!((f - expected).abs() <= 1e-9 * expected.abs().max(1.0));
        }
    }

    /// Scores never exceed 100 and recommendations only appear below 75.
    #[test]
    fn score_bounds_and_recommendation_gate(snapshot in arb_snapshot()) {
        let scorer = HealthScorer::with_defaults();
        let result = scorer.calculate_score(&snapshot);
        prop_assert!(result.score <= 100.0);
        if result.issues.is_empty() {
            prop_assert_eq!(result.score, 100.0);
        }

        let recs = scorer.get_recommendations(&snapshot, result.score);
        if result.score >= 75.0 {
            prop_assert!(recs.is_empty());
        }
        prop_assert!(recs.len() <= 3);
    }
}
