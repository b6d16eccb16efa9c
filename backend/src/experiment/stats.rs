//! Summary statistics over replicate results

use serde::{Deserialize, Serialize};

/// Mean of a slice of values
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sample standard deviation (n-1 denominator)
pub fn sample_std_dev(values: &[f64]) -> Option<f64> {
    let n = values.len();
    if n < 2 {
        return None;
    }
    let mean_val = mean(values)?;
    let sum_sq: f64 = values.iter().map(|v| (v - mean_val).powi(2)).sum();
    Some((sum_sq / (n - 1) as f64).sqrt())
}

/// Population standard deviation (n denominator)
pub fn population_std_dev(values: &[f64]) -> Option<f64> {
    let mean_val = mean(values)?;
    let sum_sq: f64 = values.iter().map(|v| (v - mean_val).powi(2)).sum();
    Some((sum_sq / values.len() as f64).sqrt())
}

/// Mean, spread and range of a set of values
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Stats {
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub max: f64,
}

impl Stats {
    /// Summary with the sample standard deviation
    ///
    /// A single value reports a spread of 0.
    ///
    /// # Example
    /// ```
    /// use platform_sim_core::experiment::Stats;
    ///
    /// let stats = Stats::sample(&[2.0, 4.0, 6.0]).unwrap();
    /// assert_eq!(stats.mean, 4.0);
    /// assert_eq!(stats.std, 2.0);
    /// assert_eq!((stats.min, stats.max), (2.0, 6.0));
    /// ```
    pub fn sample(values: &[f64]) -> Option<Self> {
        let mean = mean(values)?;
        let std = sample_std_dev(values).unwrap_or(0.0);
        Some(Self::with_spread(values, mean, std))
    }

    /// Summary with the population standard deviation
    pub fn population(values: &[f64]) -> Option<Self> {
        let mean = mean(values)?;
        let std = population_std_dev(values)?;
        Some(Self::with_spread(values, mean, std))
    }

    fn with_spread(values: &[f64], mean: f64, std: f64) -> Self {
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        Self {
            mean,
            std,
            min,
            max,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean() {
        assert_eq!(mean(&[]), None);
        assert_eq!(mean(&[1.0, 2.0, 3.0, 4.0]), Some(2.5));
    }

    #[test]
    fn test_sample_vs_population() {
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_eq!(population_std_dev(&values), Some(2.0));
        let sample = sample_std_dev(&values).unwrap();
        assert!((sample - (32.0_f64 / 7.0).sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_single_value() {
        assert_eq!(sample_std_dev(&[3.0]), None);
        assert_eq!(population_std_dev(&[3.0]), Some(0.0));
        let stats = Stats::sample(&[3.0]).unwrap();
        assert_eq!(stats.std, 0.0);
        assert_eq!(stats.min, 3.0);
        assert_eq!(stats.max, 3.0);
    }

    #[test]
    fn test_empty_has_no_stats() {
        assert!(Stats::sample(&[]).is_none());
        assert!(Stats::population(&[]).is_none());
    }
}
