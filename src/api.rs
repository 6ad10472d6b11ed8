// API client module: a small blocking HTTP client for the Codecks API.
// Two endpoints are used: the generic query endpoint (the base URL itself)
// to look decks up by title, and the card dispatch endpoint to create cards.

use std::collections::BTreeMap;

use reqwest::blocking::{Client, Response};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;

use crate::config::ImportConfig;
use crate::error::ApiError;

pub const DEFAULT_API_URL: &str = "https://api.codecks.io";
const CREATE_CARD_PATH: &str = "/dispatch/cards/create";

const AUTH_TOKEN: &str = "x-auth-token";
const ACCOUNT: &str = "x-account";

/// A deck as returned by the query endpoint. Only the fields we ask for.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Deck {
    pub id: String,
    #[serde(default)]
    pub title: String,
}

/// Body of a card creation request.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CreateCard {
    pub add_as_bookmark: bool,
    pub content: String,
    pub deck_id: String,
}

impl CreateCard {
    pub fn new(content: impl Into<String>, deck_id: impl Into<String>) -> Self {
        CreateCard {
            add_as_bookmark: false,
            content: content.into(),
            deck_id: deck_id.into(),
        }
    }
}

/// The query endpoint answers with one top-level key per entity type that
/// was touched. Matched decks live under `deck`, keyed by id.
#[derive(Deserialize, Debug)]
struct DeckSearchResponse {
    #[serde(default)]
    deck: Option<BTreeMap<String, Deck>>,
}

/// The operations the resolver and importer need from the remote service.
/// `ApiClient` is the real implementation; tests substitute an in-memory one.
pub trait DeckApi {
    /// Every deck in the account whose title contains `term`.
    fn search_decks(&self, term: &str) -> Result<Vec<Deck>, ApiError>;

    /// Create one card. Any 2xx answer counts as success.
    fn create_card(&self, card: &CreateCard) -> Result<(), ApiError>;
}

/// Blocking client carrying the authentication headers for one account.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Build a client from the parsed configuration. Fails if the token or
    /// organization cannot be sent as a header value.
    pub fn new(config: &ImportConfig) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            HeaderName::from_static(AUTH_TOKEN),
            header_value(&config.access_token, "access token")?,
        );
        headers.insert(
            HeaderName::from_static(ACCOUNT),
            header_value(&config.organization, "organization")?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = Client::builder().default_headers(headers).build()?;
        Ok(ApiClient {
            client,
            base_url: config.api_url.trim_end_matches('/').to_string(),
        })
    }

    fn check(res: Response) -> Result<Response, ApiError> {
        let status = res.status();
        debug!(status = status.as_u16(), url = %res.url(), "response received");
        if !status.is_success() {
            let body = res.text().unwrap_or_default();
            return Err(ApiError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(res)
    }
}

impl DeckApi for ApiClient {
    fn search_decks(&self, term: &str) -> Result<Vec<Deck>, ApiError> {
        let body = deck_search_query(term)?;
        debug!(%term, "searching decks");
        let res = self.client.post(&self.base_url).json(&body).send()?;
        let parsed: DeckSearchResponse = Self::check(res)?.json()?;
        Ok(decks_from_response(parsed))
    }

    fn create_card(&self, card: &CreateCard) -> Result<(), ApiError> {
        let url = format!("{}{}", self.base_url, CREATE_CARD_PATH);
        let res = self.client.post(&url).json(card).send()?;
        Self::check(res)?;
        Ok(())
    }
}

fn header_value(value: &str, what: &'static str) -> Result<HeaderValue, ApiError> {
    HeaderValue::from_str(value).map_err(|_| ApiError::InvalidHeader(what))
}

/// Build the query asking for the title of every deck in the account whose
/// title contains `term`. The filter is itself JSON embedded in a key, so
/// it is encoded separately; that is where quotes in `term` get escaped.
pub fn deck_search_query(term: &str) -> Result<serde_json::Value, serde_json::Error> {
    let filter = serde_json::to_string(&json!({
        "title": { "op": "contains", "value": term }
    }))?;
    let relation = format!("decks({filter})");

    let mut account = serde_json::Map::new();
    account.insert(relation, json!(["title"]));

    Ok(json!({
        "query": {
            "_root": [
                { "account": [ account ] }
            ]
        }
    }))
}

fn decks_from_response(res: DeckSearchResponse) -> Vec<Deck> {
    res.deck.unwrap_or_default().into_values().collect()
}
