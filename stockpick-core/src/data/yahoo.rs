//! Yahoo Finance quote provider.
//!
//! Price and market cap come from the v7 quote endpoint; the daily close
//! history comes from the v8 chart endpoint. Yahoo has no official API and
//! is subject to unannounced format changes, so parse failures surface as
//! `ResponseFormatChanged` rather than panics.

use std::time::Duration;

use serde::Deserialize;
use tracing::warn;

use super::quote::{QuoteError, QuoteProvider, QuoteSnapshot};

/// Default number of calendar days of close history to request. Sized so a
/// 200-day SMA has enough trading days even after weekends and holidays.
pub const DEFAULT_HISTORY_DAYS: u32 = 420;

// ── v7 quote endpoint ────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct QuoteEnvelope {
    #[serde(rename = "quoteResponse")]
    quote_response: QuoteBody,
}

#[derive(Debug, Deserialize)]
struct QuoteBody {
    result: Option<Vec<QuoteResult>>,
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct QuoteResult {
    #[serde(rename = "regularMarketPrice")]
    regular_market_price: Option<f64>,
    #[serde(rename = "marketCap")]
    market_cap: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    code: String,
    description: Option<String>,
}

// ── v8 chart endpoint ────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct ChartEnvelope {
    chart: ChartBody,
}

#[derive(Debug, Deserialize)]
struct ChartBody {
    result: Option<Vec<ChartData>>,
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<CloseSeries>,
}

#[derive(Debug, Deserialize)]
struct CloseSeries {
    close: Vec<Option<f64>>,
}

/// Yahoo Finance quote provider.
pub struct YahooQuoteProvider {
    client: reqwest::blocking::Client,
    history_days: u32,
}

impl YahooQuoteProvider {
    pub fn new(history_days: u32) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36")
            .build()
            .expect("failed to build HTTP client");

        Self {
            client,
            history_days,
        }
    }

    fn quote_url(symbol: &str) -> String {
        format!("https://query1.finance.yahoo.com/v7/finance/quote?symbols={symbol}")
    }

    fn chart_url(&self, symbol: &str) -> String {
        let end = chrono::Utc::now();
        let start = end - chrono::Duration::days(i64::from(self.history_days));
        format!(
            "https://query2.finance.yahoo.com/v8/finance/chart/{symbol}\
             ?period1={}&period2={}&interval=1d",
            start.timestamp(),
            end.timestamp()
        )
    }

    /// Map non-success HTTP statuses onto the error taxonomy.
    fn check_status(resp: reqwest::blocking::Response) -> Result<reqwest::blocking::Response, QuoteError> {
        let status = resp.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = resp
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(60);
            return Err(QuoteError::RateLimited {
                retry_after_secs: retry_after,
            });
        }
        if !status.is_success() {
            return Err(QuoteError::Other(format!("HTTP {status}")));
        }
        Ok(resp)
    }

    fn fetch_summary(&self, symbol: &str) -> Result<(Option<f64>, Option<f64>), QuoteError> {
        let resp = self
            .client
            .get(Self::quote_url(symbol))
            .send()
            .map_err(map_transport_error)?;
        let resp = Self::check_status(resp)?;

        let envelope: QuoteEnvelope = resp
            .json()
            .map_err(|e| QuoteError::ResponseFormatChanged(format!("quote response: {e}")))?;

        let results = envelope.quote_response.result.ok_or_else(|| {
            api_error_to_quote_error(symbol, envelope.quote_response.error, "quote")
        })?;

        // An unknown symbol comes back as an empty result array.
        let result = results.into_iter().next().ok_or(QuoteError::SymbolNotFound {
            symbol: symbol.to_string(),
        })?;

        Ok((result.regular_market_price, result.market_cap))
    }

    fn fetch_closes(&self, symbol: &str) -> Result<Vec<f64>, QuoteError> {
        let resp = self
            .client
            .get(self.chart_url(symbol))
            .send()
            .map_err(map_transport_error)?;
        let resp = Self::check_status(resp)?;

        let envelope: ChartEnvelope = resp
            .json()
            .map_err(|e| QuoteError::ResponseFormatChanged(format!("chart response: {e}")))?;

        let results = envelope
            .chart
            .result
            .ok_or_else(|| api_error_to_quote_error(symbol, envelope.chart.error, "chart"))?;

        let data = results.into_iter().next().ok_or_else(|| {
            QuoteError::ResponseFormatChanged("chart result array is empty".into())
        })?;

        let series = data.indicators.quote.into_iter().next().ok_or_else(|| {
            QuoteError::ResponseFormatChanged("chart has no close series".into())
        })?;

        // Nulls mark non-trading days; drop them, keep order.
        Ok(series.close.into_iter().flatten().collect())
    }
}

impl QuoteProvider for YahooQuoteProvider {
    fn name(&self) -> &str {
        "yahoo_finance"
    }

    fn quote(&self, symbol: &str) -> Result<QuoteSnapshot, QuoteError> {
        let (price, market_cap) = self.fetch_summary(symbol)?;

        // A missing history still leaves price/market-cap filters usable;
        // the SMA filter fails closed on an empty series.
        let closes = match self.fetch_closes(symbol) {
            Ok(closes) => closes,
            Err(err) => {
                warn!(symbol, error = %err, "close history unavailable");
                Vec::new()
            }
        };

        Ok(QuoteSnapshot {
            price,
            market_cap,
            closes,
        })
    }
}

impl Default for YahooQuoteProvider {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_DAYS)
    }
}

fn map_transport_error(err: reqwest::Error) -> QuoteError {
    if err.is_connect() || err.is_timeout() {
        QuoteError::NetworkUnreachable(err.to_string())
    } else {
        QuoteError::Other(err.to_string())
    }
}

fn api_error_to_quote_error(symbol: &str, error: Option<ApiError>, endpoint: &str) -> QuoteError {
    match error {
        Some(err) if err.code == "Not Found" => QuoteError::SymbolNotFound {
            symbol: symbol.to_string(),
        },
        Some(err) => QuoteError::ResponseFormatChanged(format!(
            "{endpoint}: {}: {}",
            err.code,
            err.description.unwrap_or_default()
        )),
        None => QuoteError::ResponseFormatChanged(format!("{endpoint}: empty result with no error")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quote_url_targets_v7_endpoint() {
        let url = YahooQuoteProvider::quote_url("AAPL");
        assert!(url.contains("/v7/finance/quote"));
        assert!(url.ends_with("symbols=AAPL"));
    }

    #[test]
    fn chart_url_covers_history_window() {
        let provider = YahooQuoteProvider::new(10);
        let url = provider.chart_url("MSFT");
        assert!(url.contains("/v8/finance/chart/MSFT"));
        assert!(url.contains("interval=1d"));
    }

    #[test]
    fn quote_envelope_parses_partial_fields() {
        let json = r#"{"quoteResponse":{"result":[{"regularMarketPrice":12.5}],"error":null}}"#;
        let envelope: QuoteEnvelope = serde_json::from_str(json).unwrap();
        let result = envelope.quote_response.result.unwrap();
        assert_eq!(result[0].regular_market_price, Some(12.5));
        assert_eq!(result[0].market_cap, None);
    }

    #[test]
    fn chart_envelope_drops_null_closes() {
        let json = r#"{"chart":{"result":[{"indicators":{"quote":[{"close":[10.0,null,11.0]}]}}],"error":null}}"#;
        let envelope: ChartEnvelope = serde_json::from_str(json).unwrap();
        let data = envelope.chart.result.unwrap().into_iter().next().unwrap();
        let closes: Vec<f64> = data.indicators.quote[0]
            .close
            .iter()
            .copied()
            .flatten()
            .collect();
        assert_eq!(closes, vec![10.0, 11.0]);
    }

    #[test]
    fn not_found_api_error_maps_to_symbol_not_found() {
        let err = api_error_to_quote_error(
            "ZZZZ",
            Some(ApiError {
                code: "Not Found".into(),
                description: Some("no data".into()),
            }),
            "chart",
        );
        assert!(matches!(err, QuoteError::SymbolNotFound { .. }));
    }

    #[test]
    fn empty_quote_result_means_symbol_not_found() {
        let json = r#"{"quoteResponse":{"result":[],"error":null}}"#;
        let envelope: QuoteEnvelope = serde_json::from_str(json).unwrap();
        assert!(envelope.quote_response.result.unwrap().is_empty());
    }
}
