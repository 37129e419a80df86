//! Screening filters — gate candidate tickers on quote data.
//!
//! Each filter is an independently toggleable predicate over a
//! `QuoteSnapshot`. A disabled filter always passes. A filter whose
//! required snapshot field is absent fails closed.

pub mod market_cap;
pub mod price;
pub mod sma;

use std::fmt;
use std::io;

use serde::{Deserialize, Serialize};

use crate::data::quote::QuoteSnapshot;
use crate::prompt::Console;

/// Comparison direction for a filter threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    /// Observed value must be >= the threshold to pass.
    #[serde(rename = ">=")]
    AtLeast,
    /// Observed value must be <= the threshold to pass.
    #[serde(rename = "<=")]
    AtMost,
}

impl Direction {
    /// Parse one of the two accepted tokens; anything else is rejected.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            ">=" => Some(Direction::AtLeast),
            "<=" => Some(Direction::AtMost),
            _ => None,
        }
    }

    pub fn token(&self) -> &'static str {
        match self {
            Direction::AtLeast => ">=",
            Direction::AtMost => "<=",
        }
    }

    /// Apply the stored direction: `observed <dir> threshold`.
    pub fn compare(&self, observed: f64, threshold: f64) -> bool {
        match self {
            Direction::AtLeast => observed >= threshold,
            Direction::AtMost => observed <= threshold,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Trait for screening filters.
///
/// Filters gate candidates on market data only — they never see the
/// candidate pool or the retry state. `apply` must not panic on missing
/// data; absence of a required field is a `false`, not an error.
pub trait ScreenFilter: Send + Sync {
    /// Short identifier (e.g., "price_filter") used in logs.
    fn name(&self) -> &str;

    fn is_enabled(&self) -> bool;

    /// Evaluate the rule against a snapshot. Returns `true` immediately
    /// when the filter is disabled.
    fn apply(&self, symbol: &str, snapshot: &QuoteSnapshot) -> bool;

    /// Human-readable dump of name, enabled state, and parameters. Pure:
    /// never mutates filter state.
    fn describe(&self) -> String;

    /// Interactively update enabled state and rule parameters. Invalid
    /// input is re-prompted, never accepted silently.
    fn configure(&mut self, console: &mut dyn Console) -> io::Result<()>;
}

/// Ordered list of filters. Insertion order is evaluation order: all
/// filters must pass, so order does not change the outcome, only which
/// rejection is reported first.
#[derive(Default)]
pub struct FilterChain {
    filters: Vec<Box<dyn ScreenFilter>>,
}

impl FilterChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, filter: Box<dyn ScreenFilter>) {
        self.filters.push(filter);
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn ScreenFilter> {
        self.filters.iter().map(|f| f.as_ref())
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Box<dyn ScreenFilter>> {
        self.filters.get_mut(index)
    }

    /// Name of the first filter that rejects the candidate, or `None` if
    /// every filter passes. Short-circuits on the first failure.
    pub fn first_rejection(&self, symbol: &str, snapshot: &QuoteSnapshot) -> Option<&str> {
        self.filters
            .iter()
            .find(|f| !f.apply(symbol, snapshot))
            .map(|f| f.name())
    }

    pub fn passes(&self, symbol: &str, snapshot: &QuoteSnapshot) -> bool {
        self.first_rejection(symbol, snapshot).is_none()
    }
}

// Re-export concrete filter types.
pub use market_cap::MarketCapFilter;
pub use price::PriceFilter;
pub use sma::SmaFilter;
