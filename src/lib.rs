// Library root
// -----------
// Imports cards into a Codecks deck from a CSV file. The binary
// (`main.rs`) only sets up logging, parses arguments and calls `app::run`.
//
// Module responsibilities:
// - `config`: command-line parsing into an immutable `ImportConfig`.
// - `api`: blocking HTTP client for the Codecks API and its wire types.
// - `resolver`: turns a partial deck name into exactly one deck.
// - `importer`: reads the CSV and creates one card per row.
// - `throttle`: fixed pause between create requests.
// - `ui`: confirmation gate and console reports.
// - `app`: wires the stages together in order.
pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod importer;
pub mod logging;
pub mod resolver;
pub mod throttle;
pub mod ui;
