// Deck resolution: turn a partial deck name into exactly one deck.
//
// One query, no retries. Zero or several matches end the run, because
// nothing downstream can proceed without a single deck id.

use tracing::{info, warn};

use crate::api::{Deck, DeckApi};
use crate::error::ResolveError;

pub fn resolve_deck<A: DeckApi + ?Sized>(api: &A, term: &str) -> Result<Deck, ResolveError> {
    let mut decks = api.search_decks(term).map_err(|source| ResolveError::Api {
        term: term.to_string(),
        source,
    })?;

    match decks.len() {
        0 => {
            warn!(%term, "deck search returned no results");
            Err(ResolveError::NoMatches {
                term: term.to_string(),
            })
        }
        1 => {
            let deck = decks.remove(0);
            info!(%term, id = %deck.id, title = %deck.title, "deck resolved");
            Ok(deck)
        }
        n => {
            warn!(%term, matches = n, "deck search is ambiguous");
            Err(ResolveError::Ambiguous {
                term: term.to_string(),
                decks,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fake::{deck, FakeApi};

    #[test]
    fn single_match_is_returned_unchanged() {
        let api = FakeApi::with_decks(vec![deck("a1b2-c3", "Backlog 2024")]);
        let resolved = resolve_deck(&api, "Backlog").unwrap();
        assert_eq!(resolved.id, "a1b2-c3");
        assert_eq!(resolved.title, "Backlog 2024");
        assert_eq!(*api.searches.borrow(), vec!["Backlog".to_string()]);
    }

    #[test]
    fn zero_matches_is_an_error() {
        let api = FakeApi::with_decks(Vec::new());
        let err = resolve_deck(&api, "Nope").unwrap_err();
        assert!(matches!(err, ResolveError::NoMatches { ref term } if term == "Nope"));
    }

    #[test]
    fn several_matches_report_every_deck() {
        let api = FakeApi::with_decks(vec![deck("d1", "Sprint 1"), deck("d2", "Sprint 2")]);
        match resolve_deck(&api, "Sprint").unwrap_err() {
            ResolveError::Ambiguous { term, decks } => {
                assert_eq!(term, "Sprint");
                assert_eq!(decks, vec![deck("d1", "Sprint 1"), deck("d2", "Sprint 2")]);
            }
            other => panic!("expected ambiguous, got {other:?}"),
        }
    }

    #[test]
    fn http_failure_keeps_status_and_body() {
        let api = FakeApi::with_search_error(401, "bad token");
        let err = resolve_deck(&api, "Backlog").unwrap_err();
        assert!(err.to_string().contains("HTTP 401: bad token"));
        assert!(api.created.borrow().is_empty());
    }
}
