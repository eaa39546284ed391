//! Descriptive statistics over sample buffers.
//!
//! All helpers accept anything that iterates `&f64` and return `None` on an
//! empty input instead of producing NaN.

/// Arithmetic mean.
///
/// Sums offsets from the first value, so a constant series returns that
/// constant exactly.
pub fn mean<'a, I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = &'a f64>,
{
    let mut iter = values.into_iter();
    let first = *iter.next()?;
    let (offset_sum, n) = iter.fold((0.0, 1usize), |(sum, n), v| (sum + (v - first), n + 1));
    Some(first + offset_sum / n as f64)
}

/// Population variance (divides by `n`, not `n - 1`).
pub fn population_variance<'a, I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = &'a f64> + Clone,
{
    let m = mean(values.clone())?;
    let (sq, n) = values
        .into_iter()
        .fold((0.0, 0usize), |(sq, n), v| (sq + (v - m).powi(2), n + 1));
    Some(sq / n as f64)
}

/// Population standard deviation.
pub fn population_std<'a, I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = &'a f64> + Clone,
{
    population_variance(values).map(f64::sqrt)
}

/// Normalized exponential ramp of `n` weights, `exp(linspace(-1, 0, n))`.
///
/// The first weight is the smallest, the last the largest, and the weights
/// sum to 1.
pub fn exp_ramp_weights(n: usize) -> Vec<f64> {
    let raw: Vec<f64> = match n {
        0 => return Vec::new(),
        1 => vec![(-1.0f64).exp()],
        _ => {
            let step = 1.0 / (n - 1) as f64;
            (0..n).map(|i| (-1.0 + step * i as f64).exp()).collect()
        }
    };
    let total: f64 = raw.iter().sum();
    raw.into_iter().map(|w| w / total).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_of_empty_is_none() {
        let empty: [f64; 0] = [];
        assert!(mean(&empty).is_none());
        assert!(population_std(&empty).is_none());
    }

    #[test]
    fn population_statistics() {
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_eq!(mean(&values), Some(5.0));
        assert_eq!(population_variance(&values), Some(4.0));
        assert_eq!(population_std(&values), Some(2.0));
    }

    #[test]
    fn constant_series_has_exact_mean_and_zero_variance() {
        let values = [0.1; 7];
        assert_eq!(mean(&values), Some(0.1));
        assert_eq!(population_variance(&values), Some(0.0));
    }

    #[test]
    fn ramp_weights_are_increasing_and_normalized() {
        let w = exp_ramp_weights(5);
        assert_eq!(w.len(), 5);
        assert!(w.windows(2).all(|p| p[0] < p[1]));
        assert!((w.iter().sum::<f64>() - 1.0).abs() < 1e-12);
        // oldest / newest = e^-1
        assert!((w[0] / w[4] - (-1.0f64).exp()).abs() < 1e-12);
    }

    #[test]
    fn ramp_weights_degenerate_sizes() {
        assert!(exp_ramp_weights(0).is_empty());
        assert_eq!(exp_ramp_weights(1), vec![1.0]);
    }
}
