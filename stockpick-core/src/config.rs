//! Serializable session configuration.
//!
//! Captures everything a session needs to start: retry budget, exchange
//! label, ticker-list URL, quote history window, and per-filter defaults.
//! Lives in memory for the session; the TOML file is an optional input,
//! never written back.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::data::nasdaq::NASDAQ_LIST_URL;
use crate::data::yahoo::DEFAULT_HISTORY_DAYS;
use crate::filters::sma::MAX_SMA_PERIOD;
use crate::filters::{Direction, FilterChain, MarketCapFilter, PriceFilter, SmaFilter};
use crate::sampler::DEFAULT_MAX_RETRIES;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read config file: {0}")]
    Read(#[from] std::io::Error),

    #[error("parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("sma period {0} is outside 1..={max}", max = MAX_SMA_PERIOD)]
    SmaPeriod(u32),
}

/// Top-level session configuration. Every field has a default matching the
/// interactive tool's original values, so an empty TOML file is valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Retry budget for one selection (attempts = max_retries + 1).
    pub max_retries: u32,

    /// Exchange label used when building chart URLs.
    pub exchange: String,

    /// Where to download the ticker directory from.
    pub list_url: String,

    /// Calendar days of close history to request per quote.
    pub history_days: u32,

    pub filters: FiltersConfig,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            exchange: "NASDAQ".into(),
            list_url: NASDAQ_LIST_URL.into(),
            history_days: DEFAULT_HISTORY_DAYS,
            filters: FiltersConfig::default(),
        }
    }
}

/// Startup parameters for the three built-in filters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FiltersConfig {
    pub price: ThresholdConfig,
    pub market_cap: ThresholdConfig,
    pub sma: SmaConfig,
}

impl Default for FiltersConfig {
    fn default() -> Self {
        Self {
            price: ThresholdConfig {
                enabled: true,
                threshold: 15,
                direction: Direction::AtLeast,
            },
            market_cap: ThresholdConfig {
                enabled: true,
                threshold: 300,
                direction: Direction::AtLeast,
            },
            sma: SmaConfig {
                enabled: true,
                period: 200,
                direction: Direction::AtLeast,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdConfig {
    pub enabled: bool,
    pub threshold: u32,
    pub direction: Direction,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SmaConfig {
    pub enabled: bool,
    pub period: u32,
    pub direction: Direction,
}

impl SessionConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Bounds that `SmaFilter::new` asserts must hold before a chain is
    /// built, so a bad config file is a parse error, not a panic.
    fn validate(&self) -> Result<(), ConfigError> {
        let period = self.filters.sma.period;
        if period < 1 || period > MAX_SMA_PERIOD {
            return Err(ConfigError::SmaPeriod(period));
        }
        Ok(())
    }

    /// Build the session's filter chain in the fixed order price,
    /// market cap, SMA.
    pub fn build_chain(&self) -> FilterChain {
        let mut chain = FilterChain::new();
        chain.push(Box::new(PriceFilter::new(
            self.filters.price.enabled,
            self.filters.price.threshold,
            self.filters.price.direction,
        )));
        chain.push(Box::new(MarketCapFilter::new(
            self.filters.market_cap.enabled,
            self.filters.market_cap.threshold,
            self.filters.market_cap.direction,
        )));
        chain.push(Box::new(SmaFilter::new(
            self.filters.sma.enabled,
            self.filters.sma.period,
            self.filters.sma.direction,
        )));
        chain
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_original_tool() {
        let config = SessionConfig::default();
        assert_eq!(config.max_retries, 35);
        assert_eq!(config.exchange, "NASDAQ");
        assert_eq!(config.filters.price.threshold, 15);
        assert_eq!(config.filters.market_cap.threshold, 300);
        assert_eq!(config.filters.sma.period, 200);
        assert_eq!(config.filters.sma.direction, Direction::AtLeast);
    }

    #[test]
    fn empty_toml_is_all_defaults() {
        let config = SessionConfig::from_toml("").unwrap();
        assert_eq!(config, SessionConfig::default());
    }

    #[test]
    fn partial_toml_overrides_only_named_fields() {
        let toml_str = r#"
max_retries = 10

[filters.price]
enabled = false
threshold = 5
direction = "<="
"#;
        let config = SessionConfig::from_toml(toml_str).unwrap();
        assert_eq!(config.max_retries, 10);
        assert!(!config.filters.price.enabled);
        assert_eq!(config.filters.price.direction, Direction::AtMost);
        // Unnamed sections keep their defaults.
        assert_eq!(config.filters.sma.period, 200);
        assert_eq!(config.exchange, "NASDAQ");
    }

    #[test]
    fn invalid_direction_token_is_rejected() {
        let toml_str = r#"
[filters.price]
enabled = true
threshold = 5
direction = "=="
"#;
        assert!(SessionConfig::from_toml(toml_str).is_err());
    }

    #[test]
    fn out_of_range_sma_period_is_rejected() {
        for period in [0u32, MAX_SMA_PERIOD + 1] {
            let toml_str = format!("[filters.sma]\nenabled = true\nperiod = {period}\ndirection = \">=\"\n");
            let err = SessionConfig::from_toml(&toml_str).unwrap_err();
            assert!(matches!(err, ConfigError::SmaPeriod(p) if p == period));
        }
    }

    #[test]
    fn boundary_sma_periods_are_accepted() {
        for period in [1u32, MAX_SMA_PERIOD] {
            let toml_str = format!("[filters.sma]\nenabled = true\nperiod = {period}\ndirection = \">=\"\n");
            let config = SessionConfig::from_toml(&toml_str).unwrap();
            assert_eq!(config.build_chain().len(), 3);
        }
    }

    #[test]
    fn toml_roundtrip() {
        let config = SessionConfig::default();
        let serialized = toml::to_string(&config).unwrap();
        let parsed = SessionConfig::from_toml(&serialized).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn build_chain_reflects_config() {
        let mut config = SessionConfig::default();
        config.filters.market_cap.enabled = false;

        let chain = config.build_chain();
        assert_eq!(chain.len(), 3);

        let names: Vec<&str> = chain.iter().map(|f| f.name()).collect();
        assert_eq!(names, ["price_filter", "market_cap_filter", "sma_filter"]);
        assert!(!chain.iter().nth(1).unwrap().is_enabled());
    }
}
