//! Quote snapshot and provider trait with structured error types.
//!
//! The QuoteProvider trait abstracts over quote sources (Yahoo Finance,
//! canned test data) so the sampler can be exercised without network access.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Point-in-time market data for one symbol, as needed by the filters.
///
/// Every field is optional: a provider may return partial data, and a failed
/// fetch is represented as an all-absent snapshot. Filters that need an
/// absent field fail closed rather than erroring.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuoteSnapshot {
    /// Last traded price, if known.
    pub price: Option<f64>,

    /// Market capitalization in raw USD, if known.
    pub market_cap: Option<f64>,

    /// Daily closing prices, time-ordered oldest first. May be empty or
    /// shorter than any filter's lookback.
    pub closes: Vec<f64>,
}

impl QuoteSnapshot {
    /// Snapshot with every field absent — the shape of a failed fetch.
    pub fn empty() -> Self {
        Self::default()
    }
}

/// Structured error types for quote operations.
#[derive(Debug, Error)]
pub enum QuoteError {
    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("rate limited by provider (retry after {retry_after_secs}s)")]
    RateLimited { retry_after_secs: u64 },

    #[error("symbol not found: {symbol}")]
    SymbolNotFound { symbol: String },

    #[error("response format changed: {0}")]
    ResponseFormatChanged(String),

    #[error("quote error: {0}")]
    Other(String),
}

/// Trait for quote providers.
///
/// Implementations handle the specifics of one data source. The sampler
/// never aborts on a provider error — it treats the failed candidate as
/// all-fields-absent and spends one attempt.
pub trait QuoteProvider: Send + Sync {
    /// Human-readable name of this provider.
    fn name(&self) -> &str;

    /// Fetch a snapshot for one symbol.
    fn quote(&self, symbol: &str) -> Result<QuoteSnapshot, QuoteError>;
}
