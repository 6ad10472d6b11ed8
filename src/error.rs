// Error taxonomy for the importer.
//
// Each stage owns one enum. The application boundary wraps them in
// `anyhow::Error` and `exit_code` digs the typed error back out to pick a
// process status.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::api::Deck;

/// Failure talking to the remote service.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server answered, but not with a 2xx status.
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("{0} contains characters that cannot be sent in a header")]
    InvalidHeader(&'static str),

    #[error("could not encode request body: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Failure turning a search term into exactly one deck.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("no deck name contains '{term}' (no results, or an invalid search query)")]
    NoMatches { term: String },

    #[error("found {} decks containing '{term}'", decks.len())]
    Ambiguous { term: String, decks: Vec<Deck> },

    #[error("error searching for deck containing '{term}': {source}")]
    Api {
        term: String,
        #[source]
        source: ApiError,
    },
}

/// Failure inside the row import loop. Per-row request failures are not
/// represented here: they are reported and the loop moves on.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("could not open '{}': {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("could not read CSV line {line}: {source}")]
    Csv {
        line: usize,
        #[source]
        source: csv::Error,
    },

    #[error("invalid payload on line {line}: {reason}")]
    Payload { line: usize, reason: String },

    #[error("console I/O failed: {0}")]
    Console(#[from] io::Error),

    #[error("import cancelled before any card was created")]
    Cancelled,
}

pub const EXIT_FAILURE: u8 = 1;
pub const EXIT_RESOLUTION: u8 = 2;
pub const EXIT_PAYLOAD: u8 = 3;
pub const EXIT_CANCELLED: u8 = 4;

/// Map an application error onto a process exit status.
pub fn exit_code(err: &anyhow::Error) -> u8 {
    if let Some(e) = err.downcast_ref::<ResolveError>() {
        return match e {
            // A dead network during resolution is not a resolution outcome.
            ResolveError::Api {
                source: ApiError::Transport(_),
                ..
            } => EXIT_FAILURE,
            _ => EXIT_RESOLUTION,
        };
    }
    match err.downcast_ref::<ImportError>() {
        Some(ImportError::Payload { .. }) => EXIT_PAYLOAD,
        Some(ImportError::Cancelled) => EXIT_CANCELLED,
        _ => EXIT_FAILURE,
    }
}
