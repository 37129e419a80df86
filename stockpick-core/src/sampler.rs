//! Bounded-retry random sampler.
//!
//! Draws candidates uniformly at random (with replacement), evaluates each
//! through the filter chain, and returns the first one that passes every
//! filter — or `NotFound` once the retry budget is exhausted. A quote-fetch
//! failure spends one attempt as an all-fields-absent snapshot; it never
//! aborts the selection.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;
use tracing::{debug, warn};

use crate::data::quote::{QuoteError, QuoteSnapshot};
use crate::filters::FilterChain;

/// Default attempt budget, matching the interactive tool's original value.
pub const DEFAULT_MAX_RETRIES: u32 = 35;

/// Progress reporting begins once this many retries have been spent...
const MILESTONE_START: u32 = 15;
/// ...and repeats every this many retries after that.
const MILESTONE_EVERY: u32 = 5;

/// Informational callbacks during a selection. Never affects control flow.
pub trait SearchProgress {
    /// Called at retry milestones while the search is still running.
    fn on_retry(&self, retries: u32);

    /// Called when a candidate passes every filter.
    fn on_found(&self, symbol: &str, retries: u32);

    /// Called when the budget runs out with no qualifying candidate.
    fn on_exhausted(&self, max_retries: u32);
}

/// Progress reporter that prints to stdout.
pub struct StdoutProgress;

impl SearchProgress for StdoutProgress {
    fn on_retry(&self, retries: u32) {
        println!("Still searching... ({retries} retries)");
    }

    fn on_found(&self, symbol: &str, retries: u32) {
        println!("Found qualifying ticker {symbol} after {retries} retries.");
    }

    fn on_exhausted(&self, max_retries: u32) {
        println!("No qualifying ticker found after {max_retries} retries.");
    }
}

/// No-op progress reporter.
pub struct SilentProgress;

impl SearchProgress for SilentProgress {
    fn on_retry(&self, _retries: u32) {}
    fn on_found(&self, _symbol: &str, _retries: u32) {}
    fn on_exhausted(&self, _max_retries: u32) {}
}

/// Precondition violations for `select`.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectError {
    #[error("candidate set is empty")]
    NoCandidates,
}

/// Result of one selection run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionOutcome {
    /// A candidate passed every active filter. `retries` is the number of
    /// failed draws before it (0 = first draw).
    Found { symbol: String, retries: u32 },

    /// The budget was exhausted; `attempts` candidates were evaluated.
    NotFound { attempts: u32 },
}

/// Random candidate sampler with a bounded retry budget.
pub struct Sampler<R: Rng> {
    rng: R,
    max_retries: u32,
}

impl Sampler<StdRng> {
    /// Entropy-seeded sampler for interactive use.
    pub fn new(max_retries: u32) -> Self {
        Self::with_rng(max_retries, StdRng::from_entropy())
    }

    /// Deterministically seeded sampler — same seed, same draw sequence.
    pub fn seeded(max_retries: u32, seed: u64) -> Self {
        Self::with_rng(max_retries, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> Sampler<R> {
    pub fn with_rng(max_retries: u32, rng: R) -> Self {
        Self { rng, max_retries }
    }

    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Draw-and-filter loop. Calls `quote_fn` at most `max_retries + 1`
    /// times; returns immediately on the first candidate that passes.
    pub fn select(
        &mut self,
        candidates: &[String],
        chain: &FilterChain,
        mut quote_fn: impl FnMut(&str) -> Result<QuoteSnapshot, QuoteError>,
        progress: &dyn SearchProgress,
    ) -> Result<SelectionOutcome, SelectError> {
        if candidates.is_empty() {
            return Err(SelectError::NoCandidates);
        }

        for retries in 0..=self.max_retries {
            if retries >= MILESTONE_START && retries % MILESTONE_EVERY == 0 {
                progress.on_retry(retries);
            }

            let symbol = candidates[self.rng.gen_range(0..candidates.len())].as_str();

            let snapshot = match quote_fn(symbol) {
                Ok(snapshot) => snapshot,
                Err(err) => {
                    warn!(symbol, error = %err, "quote fetch failed; treating fields as absent");
                    QuoteSnapshot::empty()
                }
            };

            match chain.first_rejection(symbol, &snapshot) {
                None => {
                    progress.on_found(symbol, retries);
                    return Ok(SelectionOutcome::Found {
                        symbol: symbol.to_string(),
                        retries,
                    });
                }
                Some(filter) => debug!(symbol, filter, "candidate rejected"),
            }
        }

        progress.on_exhausted(self.max_retries);
        Ok(SelectionOutcome::NotFound {
            attempts: self.max_retries + 1,
        })
    }
}
