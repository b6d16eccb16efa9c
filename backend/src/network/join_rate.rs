//! Feedback-driven join probabilities
//!
//! A rising network effect raises the per-trial join probability along a
//! sub-linear curve that saturates at the configured maximum. Stagnation,
//! decline, or too little history all fall back to the base rate.

use crate::network::NetworkEffectTracker;
use crate::params::JoinRateParams;

/// Join probability for a given trend
///
/// # Example
/// ```
/// use platform_sim_core::network::join_rate;
/// use platform_sim_core::params::JoinRateParams;
///
/// let params = JoinRateParams::supply();
/// assert_eq!(join_rate(&params, 1, 500.0), 0.015);   // not enough history
/// assert_eq!(join_rate(&params, 40, -3.0), 0.015);   // no growth
/// assert!((join_rate(&params, 40, 800.0) - 0.2).abs() < 1e-12); // saturated
/// ```
pub fn join_rate(params: &JoinRateParams, history_len: usize, trend_delta: f64) -> f64 {
    if history_len < 2 || trend_delta <= 0.0 {
        return params.base;
    }
    let normalized = (trend_delta / params.normalizer)
        .powf(params.exponent)
        .min(1.0);
    params.base + (params.max - params.base) * normalized
}

/// Join probability read from the tracker's current trend
pub fn tracker_join_rate(params: &JoinRateParams, tracker: &NetworkEffectTracker) -> f64 {
    join_rate(params, tracker.len(), tracker.trend_delta())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_rate_without_history() {
        let params = JoinRateParams::demand();
        assert_eq!(join_rate(&params, 0, 1_000.0), 0.02);
        assert_eq!(join_rate(&params, 1, 1_000.0), 0.02);
    }

    #[test]
    fn test_base_rate_on_zero_delta() {
        let params = JoinRateParams::demand();
        assert_eq!(join_rate(&params, 60, 0.0), 0.02);
    }

    #[test]
    fn test_sublinear_scaling() {
        let params = JoinRateParams::supply();
        // delta = normalizer / 10 → ratio 0.1, 0.1^0.7 ≈ 0.1995
        let rate = join_rate(&params, 60, 80.0);
        let expected = 0.015 + (0.2 - 0.015) * 0.1_f64.powf(0.7);
        assert!((rate - expected).abs() < 1e-12);
        // Sub-linear: more than the linear share of the range
        assert!(rate > 0.015 + (0.2 - 0.015) * 0.1);
    }

    #[test]
    fn test_saturates_at_max() {
        let params = JoinRateParams::demand();
        assert!((join_rate(&params, 60, 600.0) - 0.3).abs() < 1e-12);
        assert!((join_rate(&params, 60, 1e12) - 0.3).abs() < 1e-12);
    }
}
