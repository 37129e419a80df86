//! Stockpick CLI — random NASDAQ stock picker with configurable screens.
//!
//! Commands:
//! - `pick` — one-shot: draw a qualifying ticker and open its chart
//! - `session` — interactive loop: Enter to pick, `settings` to configure
//!   the filters, `q` to quit

mod chart;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::warn;
use tracing_subscriber::EnvFilter;

use stockpick_core::config::SessionConfig;
use stockpick_core::data::{QuoteProvider, TickerList, YahooQuoteProvider};
use stockpick_core::menu::run_settings_menu;
use stockpick_core::prompt::{Console, StdConsole};
use stockpick_core::sampler::{Sampler, SelectionOutcome, StdoutProgress};

#[derive(Parser)]
#[command(
    name = "stockpick",
    about = "Random NASDAQ stock picker — price, market cap, and SMA screens"
)]
struct Cli {
    /// Path to a TOML session config file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Use the built-in ticker list instead of downloading the directory.
    #[arg(long, global = true, default_value_t = false)]
    offline: bool,

    /// Read the ticker directory from a local pipe-delimited file.
    #[arg(long, global = true)]
    list_file: Option<PathBuf>,

    /// Print the chart URL instead of opening a browser.
    #[arg(long, global = true, default_value_t = false)]
    no_open: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Pick one qualifying ticker and open its chart.
    Pick {
        /// RNG seed for a reproducible draw sequence.
        #[arg(long)]
        seed: Option<u64>,

        /// Override the configured retry budget.
        #[arg(long)]
        max_retries: Option<u32>,
    },
    /// Interactive session: Enter to pick, "settings" to configure, "q" to quit.
    Session,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => SessionConfig::from_file(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => SessionConfig::default(),
    };

    let tickers = load_tickers(&config, cli.offline, cli.list_file.as_deref())?;

    match cli.command {
        Commands::Pick { seed, max_retries } => {
            run_pick(&config, &tickers, seed, max_retries, cli.no_open)
        }
        Commands::Session => run_session(&config, &tickers, cli.no_open),
    }
}

fn load_tickers(
    config: &SessionConfig,
    offline: bool,
    list_file: Option<&Path>,
) -> Result<TickerList> {
    if let Some(path) = list_file {
        return TickerList::from_file(path)
            .with_context(|| format!("reading ticker directory from {}", path.display()));
    }
    if offline {
        return Ok(TickerList::builtin());
    }
    TickerList::download(&config.list_url).context("downloading the NASDAQ ticker directory")
}

fn run_pick(
    config: &SessionConfig,
    tickers: &TickerList,
    seed: Option<u64>,
    max_retries: Option<u32>,
    no_open: bool,
) -> Result<()> {
    let budget = max_retries.unwrap_or(config.max_retries);
    let mut sampler = match seed {
        Some(seed) => Sampler::seeded(budget, seed),
        None => Sampler::new(budget),
    };

    let chain = config.build_chain();
    let provider = YahooQuoteProvider::new(config.history_days);

    let outcome = sampler.select(
        tickers.symbols(),
        &chain,
        |sym| provider.quote(sym),
        &StdoutProgress,
    )?;

    match outcome {
        SelectionOutcome::Found { symbol, .. } => present(config, &symbol, no_open),
        SelectionOutcome::NotFound { attempts } => {
            println!("No qualifying ticker in {attempts} attempts. Try loosening the filters.");
            Ok(())
        }
    }
}

fn run_session(config: &SessionConfig, tickers: &TickerList, no_open: bool) -> Result<()> {
    let mut chain = config.build_chain();
    let mut sampler = Sampler::new(config.max_retries);
    let provider = YahooQuoteProvider::new(config.history_days);
    let mut console = StdConsole;

    loop {
        let cmd = console
            .read_line("Press Enter to pick, type \"settings\" to configure, or \"q\" to quit: ")?;

        match cmd.trim().to_ascii_lowercase().as_str() {
            "" => {
                let outcome = sampler.select(
                    tickers.symbols(),
                    &chain,
                    |sym| provider.quote(sym),
                    &StdoutProgress,
                )?;
                if let SelectionOutcome::Found { symbol, .. } = outcome {
                    present(config, &symbol, no_open)?;
                }
            }
            "settings" => run_settings_menu(&mut chain, &mut console)?,
            "q" => {
                println!("Exiting.");
                return Ok(());
            }
            other => println!("Unknown command: {other:?}"),
        }
    }
}

fn present(config: &SessionConfig, symbol: &str, no_open: bool) -> Result<()> {
    let url = chart::chart_url(&config.exchange, symbol);
    println!("{symbol}  {url}");

    if !no_open {
        if let Err(err) = chart::open_in_browser(&url) {
            warn!(error = %err, "could not launch a browser; URL printed above");
        }
    }
    Ok(())
}
