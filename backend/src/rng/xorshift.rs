//! xorshift64* random number generator
//!
//! This is a fast, high-quality PRNG that is deterministic and suitable
//! for simulation purposes.
//!
//! # Algorithm
//!
//! xorshift64* is a variant of xorshift that passes TestU01's BigCrush
//! statistical tests. It uses 64-bit state and produces 64-bit output.
//!
//! # Determinism
//!
//! Same seed → same sequence of draws. Every shuffle, Bernoulli trial and
//! categorical draw of the platform model goes through one instance of this
//! generator, so a seed fully determines a simulation run.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Deterministic random number generator using xorshift64*
///
/// # Example
/// ```
/// use platform_sim_core::RngManager;
///
/// let mut rng = RngManager::new(12345);
/// let value = rng.next();
/// let index = rng.range(0, 100); // [0, 100)
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RngManager {
    /// Internal state (64-bit)
    state: u64,
}

impl RngManager {
    /// Create a new RNG with given seed
    ///
    /// # Example
    /// ```
    /// use platform_sim_core::RngManager;
    ///
    /// let rng = RngManager::new(12345);
    /// assert_eq!(rng.get_state(), 12345);
    /// ```
    pub fn new(seed: u64) -> Self {
        // Ensure seed is never zero (xorshift requirement)
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Draw a fresh seed from process entropy.
    ///
    /// Runs seeded this way are not reproducible unless the returned seed is
    /// kept, which is why the engine records and logs it.
    pub fn entropy_seed() -> u64 {
        let bits = Uuid::new_v4().as_u128();
        (bits as u64) ^ ((bits >> 64) as u64)
    }

    /// Generate next random u64 value
    pub fn next(&mut self) -> u64 {
        // xorshift64* algorithm
        let mut x = self.state;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.state = x;
        x.wrapping_mul(0x2545F4914F6CDD1D)
    }

    /// Generate random value in range [min, max)
    ///
    /// # Panics
    /// Panics if min >= max
    pub fn range(&mut self, min: i64, max: i64) -> i64 {
        assert!(min < max, "min must be less than max");

        let value = self.next();
        let range_size = (max - min) as u64;
        min + (value % range_size) as i64
    }

    /// Get current RNG state (for checkpointing/replay)
    ///
    /// # Example
    /// ```
    /// use platform_sim_core::RngManager;
    ///
    /// let mut rng = RngManager::new(12345);
    /// rng.next();
    /// let mut replay = RngManager::new(rng.get_state());
    /// assert_eq!(rng.next(), replay.next());
    /// ```
    pub fn get_state(&self) -> u64 {
        self.state
    }

    /// Generate random f64 in range [0.0, 1.0)
    pub fn next_f64(&mut self) -> f64 {
        let value = self.next();
        // Convert to [0.0, 1.0) by dividing by 2^53
        (value >> 11) as f64 * (1.0 / ((1u64 << 53) as f64))
    }

    /// Single Bernoulli trial: true with probability `p`.
    ///
    /// Always consumes exactly one draw, even for `p <= 0` or `p >= 1`.
    pub fn bernoulli(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }

    /// Uniform index in `[0, len)`.
    ///
    /// # Panics
    /// Panics if `len == 0`
    pub fn index(&mut self, len: usize) -> usize {
        self.range(0, len as i64) as usize
    }

    /// Categorical draw over `weights`, returning the chosen index.
    ///
    /// Uses one draw scaled by the total weight and a cumulative scan, so the
    /// weights do not need to sum to one. Returns `None` for an empty or
    /// all-zero weight vector without consuming a draw.
    pub fn weighted_index(&mut self, weights: &[f64]) -> Option<usize> {
        let total: f64 = weights.iter().sum();
        if weights.is_empty() || total <= 0.0 {
            return None;
        }

        let target = self.next_f64() * total;
        let mut cumulative = 0.0;
        for (idx, weight) in weights.iter().enumerate() {
            cumulative += weight;
            if target < cumulative {
                return Some(idx);
            }
        }

        // Rounding can leave target == total; fall back to the last positive weight
        weights.iter().rposition(|w| *w > 0.0)
    }

    /// In-place Fisher-Yates shuffle (consumes `len - 1` draws).
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        for i in (1..items.len()).rev() {
            let j = self.index(i + 1);
            items.swap(i, j);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_seed_converted_to_nonzero() {
        let rng = RngManager::new(0);
        assert_ne!(rng.get_state(), 0, "Zero seed should be converted to 1");
    }

    #[test]
    #[should_panic(expected = "min must be less than max")]
    fn test_range_invalid_bounds() {
        let mut rng = RngManager::new(12345);
        rng.range(100, 50);
    }

    #[test]
    fn test_next_f64_in_range() {
        let mut rng = RngManager::new(12345);

        for _ in 0..1000 {
            let val = rng.next_f64();
            assert!(
                (0.0..1.0).contains(&val),
                "next_f64() produced value {} outside [0.0, 1.0)",
                val
            );
        }
    }

    #[test]
    fn test_bernoulli_extremes() {
        let mut rng = RngManager::new(7);
        for _ in 0..500 {
            assert!(!rng.bernoulli(0.0));
            assert!(rng.bernoulli(1.0));
        }
    }

    #[test]
    fn test_bernoulli_consumes_one_draw() {
        let mut a = RngManager::new(99);
        let mut b = RngManager::new(99);
        a.bernoulli(0.5);
        b.next();
        assert_eq!(a.get_state(), b.get_state());
    }

    #[test]
    fn test_weighted_index_skips_zero_weights() {
        let mut rng = RngManager::new(4242);
        for _ in 0..1000 {
            let idx = rng.weighted_index(&[0.0, 1.0, 0.0, 3.0]).unwrap();
            assert!(idx == 1 || idx == 3, "zero-weight index {} drawn", idx);
        }
    }

    #[test]
    fn test_weighted_index_empty() {
        let mut rng = RngManager::new(1);
        let before = rng.get_state();
        assert_eq!(rng.weighted_index(&[]), None);
        assert_eq!(rng.weighted_index(&[0.0, 0.0]), None);
        assert_eq!(rng.get_state(), before, "no draw for degenerate weights");
    }

    #[test]
    fn test_shuffle_is_permutation() {
        let mut rng = RngManager::new(2024);
        let mut items: Vec<u32> = (0..50).collect();
        rng.shuffle(&mut items);

        let mut sorted = items.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..50).collect::<Vec<_>>());
        assert_ne!(items, sorted, "50 elements should not survive a shuffle in order");
    }

    #[test]
    fn test_shuffle_deterministic() {
        let mut rng1 = RngManager::new(5);
        let mut rng2 = RngManager::new(5);
        let mut a: Vec<u32> = (0..20).collect();
        let mut b = a.clone();
        rng1.shuffle(&mut a);
        rng2.shuffle(&mut b);
        assert_eq!(a, b);
    }

    #[test]
    fn test_entropy_seeds_differ() {
        assert_ne!(RngManager::entropy_seed(), RngManager::entropy_seed());
    }
}
