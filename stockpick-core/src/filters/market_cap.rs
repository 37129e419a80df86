//! Market-cap filter — gates candidates on market capitalization.
//!
//! The snapshot carries market cap in raw USD; the threshold is expressed
//! in millions of USD.

use std::io;

use crate::data::quote::QuoteSnapshot;
use crate::prompt::{prompt_direction, prompt_u32, prompt_yes_no, Console};

use super::{Direction, ScreenFilter};

const USD_PER_MILLION: f64 = 1_000_000.0;

/// Passes candidates whose market cap (in millions USD) clears a threshold.
#[derive(Debug, Clone)]
pub struct MarketCapFilter {
    pub enabled: bool,
    /// Threshold in millions of USD.
    pub threshold: u32,
    pub direction: Direction,
}

impl MarketCapFilter {
    pub fn new(enabled: bool, threshold: u32, direction: Direction) -> Self {
        Self {
            enabled,
            threshold,
            direction,
        }
    }

    pub fn default_params() -> Self {
        Self::new(true, 300, Direction::AtLeast)
    }
}

impl ScreenFilter for MarketCapFilter {
    fn name(&self) -> &str {
        "market_cap_filter"
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn apply(&self, _symbol: &str, snapshot: &QuoteSnapshot) -> bool {
        if !self.enabled {
            return true;
        }
        match snapshot.market_cap {
            Some(cap) if !cap.is_nan() => self
                .direction
                .compare(cap / USD_PER_MILLION, f64::from(self.threshold)),
            _ => false,
        }
    }

    fn describe(&self) -> String {
        format!(
            "Market Cap Filter: enabled={}, market cap {} {}M",
            self.enabled, self.direction, self.threshold
        )
    }

    fn configure(&mut self, console: &mut dyn Console) -> io::Result<()> {
        self.enabled = prompt_yes_no(console, "Activate the market cap filter? (y/n) ")?;
        if !self.enabled {
            return Ok(());
        }
        console.write_line(&format!(
            "CURRENT: market cap {} {}M",
            self.direction, self.threshold
        ))?;
        self.threshold = prompt_u32(
            console,
            "Enter an integer market cap threshold (million USD): ",
            0,
            u32::MAX,
        )?;
        self.direction = prompt_direction(console, "Enter \">=\" or \"<=\": ")?;
        console.write_line(&self.describe())?;
        Ok(())
    }
}
