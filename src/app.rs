// Composes the run strictly in sequence: resolve deck, confirm, import.
// Nothing touches the CSV file until exactly one deck has been resolved.

use std::io::{self, Write};

use anyhow::Result;

use crate::api::{ApiClient, DeckApi};
use crate::config::ImportConfig;
use crate::error::ResolveError;
use crate::importer::{import_rows, ImportSummary};
use crate::resolver::resolve_deck;
use crate::throttle::{FixedDelay, Throttle};
use crate::ui::{self, AssumeYes, Confirm, KeypressGate};

/// Run an import against the real service, talking to the real terminal.
pub fn run(config: &ImportConfig) -> Result<ImportSummary> {
    let api = ApiClient::new(config)?;
    let mut throttle = FixedDelay::new(config.delay);
    let mut stdout = io::stdout();

    if config.assume_yes {
        run_with(&api, config, &mut AssumeYes, &mut throttle, &mut stdout)
    } else {
        run_with(&api, config, &mut KeypressGate, &mut throttle, &mut stdout)
    }
}

/// Same as `run` with every collaborator supplied by the caller.
pub fn run_with<A, C, T, W>(
    api: &A,
    config: &ImportConfig,
    gate: &mut C,
    throttle: &mut T,
    out: &mut W,
) -> Result<ImportSummary>
where
    A: DeckApi + ?Sized,
    C: Confirm + ?Sized,
    T: Throttle + ?Sized,
    W: Write + ?Sized,
{
    let deck = match resolve_deck(api, &config.deck_search) {
        Ok(deck) => deck,
        Err(err) => {
            if let ResolveError::Ambiguous { term, decks } = &err {
                ui::print_ambiguous(out, term, decks)?;
            }
            return Err(err.into());
        }
    };
    writeln!(out, "Found deck '{}' with ID {}", deck.title, deck.id)?;

    Ok(import_rows(api, &deck, &config.csv_file, gate, throttle, out)?)
}
