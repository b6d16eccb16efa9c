//! Calendar for the simulation
//!
//! The platform model advances in whole days. Every `offer_interval` days
//! (including day 0) is an offer day on which demand actors ignore their
//! purchase cooldown.

use serde::{Deserialize, Serialize};

/// Tracks the current simulated day and the offer-day cycle
///
/// # Example
/// ```
/// use platform_sim_core::SimulationClock;
///
/// let mut clock = SimulationClock::new(60);
/// assert_eq!(clock.current_day(), 0);
/// assert!(clock.is_offer_day());
///
/// clock.advance_day();
/// assert_eq!(clock.current_day(), 1);
/// assert!(!clock.is_offer_day());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationClock {
    /// Days advanced since simulation start
    current_day: usize,
    /// Distance between offer days
    offer_interval: usize,
}

impl SimulationClock {
    /// Create a clock at day 0
    ///
    /// # Panics
    /// Panics if `offer_interval` is zero
    pub fn new(offer_interval: usize) -> Self {
        assert!(offer_interval > 0, "offer_interval must be positive");
        Self {
            current_day: 0,
            offer_interval,
        }
    }

    /// Resume a clock at a given day (checkpoint restore)
    pub fn at_day(offer_interval: usize, current_day: usize) -> Self {
        let mut clock = Self::new(offer_interval);
        clock.current_day = current_day;
        clock
    }

    /// Advance time by one day
    pub fn advance_day(&mut self) {
        self.current_day += 1;
    }

    /// Get the current day (0-indexed)
    pub fn current_day(&self) -> usize {
        self.current_day
    }

    /// Whether `day` falls on the offer cycle
    ///
    /// # Example
    /// ```
    /// use platform_sim_core::SimulationClock;
    ///
    /// let clock = SimulationClock::new(60);
    /// assert!(clock.is_offer(0));
    /// assert!(clock.is_offer(120));
    /// assert!(!clock.is_offer(59));
    /// ```
    pub fn is_offer(&self, day: usize) -> bool {
        day % self.offer_interval == 0
    }

    /// Whether the current day is an offer day
    pub fn is_offer_day(&self) -> bool {
        self.is_offer(self.current_day)
    }

    /// Days until the next offer day (0 when today is one)
    pub fn days_until_offer(&self) -> usize {
        let rem = self.current_day % self.offer_interval;
        if rem == 0 {
            0
        } else {
            self.offer_interval - rem
        }
    }

    /// Get the offer interval
    pub fn offer_interval(&self) -> usize {
        self.offer_interval
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[should_panic(expected = "offer_interval must be positive")]
    fn test_zero_offer_interval_panics() {
        SimulationClock::new(0);
    }

    #[test]
    fn test_days_until_offer() {
        let mut clock = SimulationClock::new(60);
        assert_eq!(clock.days_until_offer(), 0);
        clock.advance_day();
        assert_eq!(clock.days_until_offer(), 59);

        let clock = SimulationClock::at_day(60, 119);
        assert_eq!(clock.days_until_offer(), 1);
    }
}
