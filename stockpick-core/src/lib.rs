//! Stockpick core — random ticker screening.
//!
//! This crate contains the selection engine:
//! - Filter chain (price, market cap, SMA comparison) over quote snapshots
//! - Bounded-retry random sampler with progress callbacks
//! - Interactive settings menu and prompt-until-valid console primitives
//! - Ticker source (NASDAQ symbol directory) and quote provider (Yahoo)
//! - TOML session configuration

pub mod config;
pub mod data;
pub mod filters;
pub mod menu;
pub mod prompt;
pub mod sampler;
