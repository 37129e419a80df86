//! Price filter — gates candidates on last traded price.

use std::io;

use crate::data::quote::QuoteSnapshot;
use crate::prompt::{prompt_direction, prompt_u32, prompt_yes_no, Console};

use super::{Direction, ScreenFilter};

/// Passes candidates whose price is at least (or at most) a dollar threshold.
#[derive(Debug, Clone)]
pub struct PriceFilter {
    pub enabled: bool,
    /// Threshold in whole dollars.
    pub threshold: u32,
    pub direction: Direction,
}

impl PriceFilter {
    pub fn new(enabled: bool, threshold: u32, direction: Direction) -> Self {
        Self {
            enabled,
            threshold,
            direction,
        }
    }

    pub fn default_params() -> Self {
        Self::new(true, 15, Direction::AtLeast)
    }
}

impl ScreenFilter for PriceFilter {
    fn name(&self) -> &str {
        "price_filter"
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn apply(&self, _symbol: &str, snapshot: &QuoteSnapshot) -> bool {
        if !self.enabled {
            return true;
        }
        match snapshot.price {
            Some(price) if !price.is_nan() => {
                self.direction.compare(price, f64::from(self.threshold))
            }
            _ => false,
        }
    }

    fn describe(&self) -> String {
        format!(
            "Price Filter: enabled={}, price {} {}",
            self.enabled, self.direction, self.threshold
        )
    }

    fn configure(&mut self, console: &mut dyn Console) -> io::Result<()> {
        self.enabled = prompt_yes_no(console, "Activate the price filter? (y/n) ")?;
        if !self.enabled {
            return Ok(());
        }
        console.write_line(&format!(
            "CURRENT: price {} {}",
            self.direction, self.threshold
        ))?;
        self.threshold = prompt_u32(
            console,
            "Enter an integer price threshold (USD): ",
            0,
            u32::MAX,
        )?;
        self.direction = prompt_direction(console, "Enter \">=\" or \"<=\": ")?;
        console.write_line(&self.describe())?;
        Ok(())
    }
}
