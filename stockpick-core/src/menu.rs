//! Interactive settings menu over the filter chain.
//!
//! Two states: Listing (show every filter with a 1-based index) and
//! Editing (delegate to one filter's `configure`). A sentinel input
//! ("-1" or an empty line) exits; an invalid index re-prompts without
//! changing state. Mutations persist in the chain for later selections.

use std::io;

use crate::filters::FilterChain;
use crate::prompt::Console;

enum MenuState {
    Listing,
    Editing(usize),
}

/// Run the settings menu until the user exits. Returns control to the
/// caller with the chain's mutated state intact.
pub fn run_settings_menu(chain: &mut FilterChain, console: &mut dyn Console) -> io::Result<()> {
    let mut state = MenuState::Listing;

    loop {
        match state {
            MenuState::Listing => {
                for (i, filter) in chain.iter().enumerate() {
                    console.write_line(&format!("{}. {}", i + 1, filter.describe()))?;
                }
                let line =
                    console.read_line("Which filter do you want to configure? Enter -1 to exit: ")?;
                let input = line.trim();

                if input.is_empty() || input == "-1" {
                    return Ok(());
                }

                match input.parse::<usize>() {
                    Ok(i) if (1..=chain.len()).contains(&i) => state = MenuState::Editing(i - 1),
                    _ => console.write_line("Invalid selection.")?,
                }
            }
            MenuState::Editing(index) => {
                if let Some(filter) = chain.get_mut(index) {
                    filter.configure(console)?;
                }
                state = MenuState::Listing;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::{MarketCapFilter, PriceFilter, SmaFilter};
    use crate::prompt::ScriptedConsole;

    fn default_chain() -> FilterChain {
        let mut chain = FilterChain::new();
        chain.push(Box::new(PriceFilter::default_params()));
        chain.push(Box::new(MarketCapFilter::default_params()));
        chain.push(Box::new(SmaFilter::default_params()));
        chain
    }

    #[test]
    fn sentinel_exits_immediately() {
        let mut chain = default_chain();
        let mut console = ScriptedConsole::new(&["-1"]);
        run_settings_menu(&mut chain, &mut console).unwrap();
        assert!(console.exhausted());
    }

    #[test]
    fn empty_line_also_exits() {
        let mut chain = default_chain();
        let mut console = ScriptedConsole::new(&[""]);
        run_settings_menu(&mut chain, &mut console).unwrap();
    }

    #[test]
    fn listing_shows_every_filter_with_index() {
        let mut chain = default_chain();
        let mut console = ScriptedConsole::new(&["-1"]);
        run_settings_menu(&mut chain, &mut console).unwrap();

        let listing: Vec<&String> = console
            .transcript
            .iter()
            .filter(|l| l.starts_with(|c: char| c.is_ascii_digit()))
            .collect();
        assert_eq!(listing.len(), 3);
        assert!(listing[0].starts_with("1. Price Filter"));
        assert!(listing[2].starts_with("3. SMA Comparison Filter"));
    }

    #[test]
    fn invalid_index_reprompts_without_editing() {
        let mut chain = default_chain();
        // "4" is out of range, "zero" is not a number; then exit.
        let mut console = ScriptedConsole::new(&["4", "zero", "-1"]);
        run_settings_menu(&mut chain, &mut console).unwrap();

        let invalids = console
            .transcript
            .iter()
            .filter(|l| l.as_str() == "Invalid selection.")
            .count();
        assert_eq!(invalids, 2);
    }

    #[test]
    fn editing_mutates_the_chain_and_returns_to_listing() {
        let mut chain = default_chain();
        // Pick filter 1 (price), enable, threshold 50, direction <=, then exit.
        let mut console = ScriptedConsole::new(&["1", "y", "50", "<=", "-1"]);
        run_settings_menu(&mut chain, &mut console).unwrap();

        let price = chain.iter().next().unwrap();
        assert!(price.describe().contains("<= 50"));

        // The listing was printed twice: once before and once after editing.
        let listings = console
            .transcript
            .iter()
            .filter(|l| l.starts_with("1. Price Filter"))
            .count();
        assert_eq!(listings, 2);
    }

    #[test]
    fn disabling_a_filter_persists() {
        let mut chain = default_chain();
        // Disable filter 2 (market cap), then exit.
        let mut console = ScriptedConsole::new(&["2", "n", "-1"]);
        run_settings_menu(&mut chain, &mut console).unwrap();

        let market_cap = chain.iter().nth(1).unwrap();
        assert!(!market_cap.is_enabled());
    }
}
