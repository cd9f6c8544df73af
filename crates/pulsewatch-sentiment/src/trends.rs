//! Trend and anomaly helpers over sentiment score series.

/// Default moving-average window.
pub const DEFAULT_WINDOW: usize = 5;

/// Default anomaly threshold, in standard deviations.
pub const DEFAULT_ANOMALY_THRESHOLD: f64 = 2.0;

/// Mean of each full window of `scores`.
///
/// A series shorter than `window` (or a zero window) is returned unchanged.
pub fn moving_average(scores: &[f64], window: usize) -> Vec<f64> {
    if window == 0 || scores.len() < window {
        return scores.to_vec();
    }
    scores
        .windows(window)
        .map(|w| w.iter().sum::<f64>() / window as f64)
        .collect()
}

/// Indices of scores further than `threshold` standard deviations from the mean.
///
/// Fewer than three scores never yield anomalies.
pub fn detect_anomalies(scores: &[f64], threshold: f64) -> Vec<usize> {
    if scores.len() < 3 {
        return Vec::new();
    }
    let mean = mean(scores);
    let limit = threshold * std_dev(scores, mean);
    scores
        .iter()
        .enumerate()
        .filter(|(_, x)| (*x - mean).abs() > limit)
        .map(|(i, _)| i)
        .collect()
}

/// Population standard deviation, 0 for fewer than two scores.
pub fn volatility(scores: &[f64]) -> f64 {
    if scores.len() < 2 {
        return 0.0;
    }
    std_dev(scores, mean(scores))
}

fn mean(scores: &[f64]) -> f64 {
    scores.iter().sum::<f64>() / scores.len() as f64
}

fn std_dev(scores: &[f64], mean: f64) -> f64 {
    let variance = scores.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / scores.len() as f64;
    variance.sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_moving_average() {
        let scores = [0.0, 1.0, 2.0, 3.0, 4.0, 5.0];
        assert_eq!(moving_average(&scores, 3), vec![1.0, 2.0, 3.0, 4.0]);
        assert_eq!(moving_average(&scores[..2], DEFAULT_WINDOW), vec![0.0, 1.0]);
        assert_eq!(moving_average(&scores, 0), scores.to_vec());
    }

    #[test]
    fn test_detect_anomalies() {
        let mut scores = vec![0.1; 9];
        scores.push(-0.9);
        assert_eq!(detect_anomalies(&scores, DEFAULT_ANOMALY_THRESHOLD), vec![9]);
        assert!(detect_anomalies(&[0.1, -0.9], 0.5).is_empty());
    }

    #[test]
    fn test_flat_series_has_no_anomalies() {
        assert!(detect_anomalies(&[0.3, 0.3, 0.3, 0.3], 1.0).is_empty());
    }

    #[test]
    fn test_volatility() {
        assert_eq!(volatility(&[0.5]), 0.0);
        assert!((volatility(&[-1.0, 1.0]) - 1.0).abs() < 1e-9);
    }
}
