//! NASDAQ listed-symbols ticker source.
//!
//! The exchange publishes a pipe-delimited symbol directory
//! (`nasdaqlisted.txt`) whose last row is a "File Creation Time" summary,
//! not a ticker. Test issues are flagged in their own column and excluded.

use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;

use thiserror::Error;
use tracing::info;

use crate::data::quote::QuoteError;

/// Default location of the NASDAQ symbol directory.
pub const NASDAQ_LIST_URL: &str = "https://www.nasdaqtrader.com/dynamic/symdir/nasdaqlisted.txt";

/// Column index of the symbol field.
const COL_SYMBOL: usize = 0;
/// Column index of the "Test Issue" Y/N flag.
const COL_TEST_ISSUE: usize = 3;

#[derive(Debug, Error)]
pub enum TickerError {
    #[error("download ticker list: {0}")]
    Download(#[source] QuoteError),

    #[error("read ticker file: {0}")]
    Read(#[from] std::io::Error),

    #[error("parse ticker list: {0}")]
    Parse(String),

    #[error("ticker list is empty after filtering")]
    Empty,
}

/// Deduplicated, validated, non-empty list of candidate symbols.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickerList {
    symbols: Vec<String>,
}

impl TickerList {
    /// Download and parse the symbol directory.
    pub fn download(url: &str) -> Result<Self, TickerError> {
        info!(url, "downloading ticker list");
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| TickerError::Download(QuoteError::Other(e.to_string())))?;

        let text = client
            .get(url)
            .send()
            .and_then(|resp| resp.error_for_status())
            .and_then(|resp| resp.text())
            .map_err(|e| TickerError::Download(QuoteError::NetworkUnreachable(e.to_string())))?;

        let list = Self::from_pipe_delimited(&text)?;
        info!(count = list.len(), "ticker list loaded");
        Ok(list)
    }

    /// Parse a local copy of the symbol directory.
    pub fn from_file(path: &Path) -> Result<Self, TickerError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_pipe_delimited(&text)
    }

    /// Parse the pipe-delimited directory format: drops the File Creation
    /// Time trailer, test issues, and blank symbols; trims whitespace;
    /// deduplicates preserving first-seen order.
    pub fn from_pipe_delimited(text: &str) -> Result<Self, TickerError> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(b'|')
            .has_headers(true)
            .flexible(true)
            .from_reader(text.as_bytes());

        let mut seen = HashSet::new();
        let mut symbols = Vec::new();

        for record in reader.records() {
            let record = record.map_err(|e| TickerError::Parse(e.to_string()))?;

            let symbol = record.get(COL_SYMBOL).unwrap_or("").trim();
            if symbol.is_empty() || symbol.contains("File Creation Time") {
                continue;
            }
            if record.get(COL_TEST_ISSUE).map(str::trim) == Some("Y") {
                continue;
            }
            if seen.insert(symbol.to_string()) {
                symbols.push(symbol.to_string());
            }
        }

        if symbols.is_empty() {
            return Err(TickerError::Empty);
        }
        Ok(Self { symbols })
    }

    /// Small built-in list for offline runs.
    pub fn builtin() -> Self {
        let symbols = [
            "AAPL", "MSFT", "GOOGL", "AMZN", "NVDA", "META", "AVGO", "CRM", "ADBE", "ORCL",
            "COST", "PEP", "SBUX", "INTC", "AMD", "QCOM", "TXN", "AMAT", "MU", "PYPL",
        ]
        .into_iter()
        .map(String::from)
        .collect();
        Self { symbols }
    }

    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}
