//! SMA comparison filter — current price vs simple moving average.
//!
//! The SMA is the arithmetic mean of the most recent `period` closes.
//! Fewer than `period` closes in the snapshot is a fail, not an error;
//! no partial average is ever computed.

use std::io;

use crate::data::quote::QuoteSnapshot;
use crate::prompt::{prompt_direction, prompt_u32, prompt_yes_no, Console};

use super::{Direction, ScreenFilter};

/// Upper bound on the configurable SMA period.
pub const MAX_SMA_PERIOD: u32 = 500;

/// Passes candidates whose current price (most recent close) is at least
/// (or at most) the `period`-day simple moving average.
#[derive(Debug, Clone)]
pub struct SmaFilter {
    pub enabled: bool,
    pub period: u32,
    pub direction: Direction,
}

impl SmaFilter {
    pub fn new(enabled: bool, period: u32, direction: Direction) -> Self {
        assert!(period >= 1, "SMA period must be >= 1");
        assert!(period <= MAX_SMA_PERIOD, "SMA period must be <= {MAX_SMA_PERIOD}");
        Self {
            enabled,
            period,
            direction,
        }
    }

    pub fn default_params() -> Self {
        Self::new(true, 200, Direction::AtLeast)
    }

    /// Mean of the last `period` closes, or `None` when the series is too
    /// short or contains NaN in the window.
    fn sma(&self, closes: &[f64]) -> Option<f64> {
        let period = self.period as usize;
        if closes.len() < period {
            return None;
        }
        let window = &closes[closes.len() - period..];
        if window.iter().any(|c| c.is_nan()) {
            return None;
        }
        Some(window.iter().sum::<f64>() / period as f64)
    }
}

impl ScreenFilter for SmaFilter {
    fn name(&self) -> &str {
        "sma_filter"
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn apply(&self, _symbol: &str, snapshot: &QuoteSnapshot) -> bool {
        if !self.enabled {
            return true;
        }
        let Some(sma) = self.sma(&snapshot.closes) else {
            return false;
        };
        let Some(&current) = snapshot.closes.last() else {
            return false;
        };
        if current.is_nan() {
            return false;
        }
        self.direction.compare(current, sma)
    }

    fn describe(&self) -> String {
        format!(
            "SMA Comparison Filter: enabled={}, price {} SMA({})",
            self.enabled, self.direction, self.period
        )
    }

    fn configure(&mut self, console: &mut dyn Console) -> io::Result<()> {
        self.enabled = prompt_yes_no(console, "Activate the SMA comparison filter? (y/n) ")?;
        if !self.enabled {
            return Ok(());
        }
        console.write_line(&format!(
            "CURRENT: price {} SMA({})",
            self.direction, self.period
        ))?;
        self.period = prompt_u32(
            console,
            "Enter an integer SMA period (days): ",
            1,
            MAX_SMA_PERIOD,
        )?;
        self.direction = prompt_direction(console, "Enter \">=\" or \"<=\": ")?;
        console.write_line(&self.describe())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::ScriptedConsole;

    fn snap(closes: &[f64]) -> QuoteSnapshot {
        QuoteSnapshot {
            price: None,
            market_cap: None,
            closes: closes.to_vec(),
        }
    }

    #[test]
    fn disabled_passes_anything() {
        let filter = SmaFilter::new(false, 200, Direction::AtLeast);
        assert!(filter.apply("AAA", &QuoteSnapshot::empty()));
    }

    #[test]
    fn too_few_closes_fails_regardless_of_direction() {
        for direction in [Direction::AtLeast, Direction::AtMost] {
            let filter = SmaFilter::new(true, 5, direction);
            assert!(!filter.apply("AAA", &snap(&[10.0, 11.0, 12.0])));
            assert!(!filter.apply("AAA", &snap(&[])));
        }
    }

    #[test]
    fn sma_uses_most_recent_window() {
        // Closes: 1, 2, 3, 4, 5. SMA(3) over the last 3 = 4.0; current = 5.
        let filter = SmaFilter::new(true, 3, Direction::AtLeast);
        assert!(filter.apply("AAA", &snap(&[1.0, 2.0, 3.0, 4.0, 5.0])));

        // Downtrend: 5, 4, 3, 2, 1. SMA(3) = 2.0; current = 1 < 2.
        assert!(!filter.apply("AAA", &snap(&[5.0, 4.0, 3.0, 2.0, 1.0])));
    }

    #[test]
    fn at_most_direction_inverts() {
        let filter = SmaFilter::new(true, 3, Direction::AtMost);
        assert!(filter.apply("AAA", &snap(&[5.0, 4.0, 3.0, 2.0, 1.0])));
        assert!(!filter.apply("AAA", &snap(&[1.0, 2.0, 3.0, 4.0, 5.0])));
    }

    #[test]
    fn exact_period_length_is_enough() {
        // Equal closes: current == SMA, passes under both directions.
        let filter = SmaFilter::new(true, 4, Direction::AtLeast);
        assert!(filter.apply("AAA", &snap(&[7.0, 7.0, 7.0, 7.0])));
        let filter = SmaFilter::new(true, 4, Direction::AtMost);
        assert!(filter.apply("AAA", &snap(&[7.0, 7.0, 7.0, 7.0])));
    }

    #[test]
    fn nan_in_window_fails_closed() {
        let filter = SmaFilter::new(true, 3, Direction::AtLeast);
        assert!(!filter.apply("AAA", &snap(&[1.0, f64::NAN, 3.0])));
    }

    #[test]
    fn nan_outside_window_is_ignored() {
        let filter = SmaFilter::new(true, 2, Direction::AtLeast);
        assert!(filter.apply("AAA", &snap(&[f64::NAN, 3.0, 4.0])));
    }

    #[test]
    fn describe_is_idempotent() {
        let filter = SmaFilter::default_params();
        assert_eq!(filter.describe(), filter.describe());
        assert!(filter.describe().contains("SMA(200)"));
    }

    #[test]
    fn configure_bounds_period() {
        let mut filter = SmaFilter::default_params();
        // 0 and 501 are rejected, 50 accepted.
        let mut console = ScriptedConsole::new(&["y", "0", "501", "50", ">="]);
        filter.configure(&mut console).unwrap();
        assert_eq!(filter.period, 50);
    }

    #[test]
    #[should_panic(expected = "SMA period must be >= 1")]
    fn zero_period_is_rejected_at_construction() {
        let _ = SmaFilter::new(true, 0, Direction::AtLeast);
    }
}
