//! Ticker source and quote provider.

pub mod nasdaq;
pub mod quote;
pub mod yahoo;

pub use nasdaq::{TickerError, TickerList, NASDAQ_LIST_URL};
pub use quote::{QuoteError, QuoteProvider, QuoteSnapshot};
pub use yahoo::YahooQuoteProvider;
