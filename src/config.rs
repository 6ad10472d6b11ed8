// Command-line configuration. Everything the run needs is parsed once into
// an `ImportConfig` and passed down explicitly; nothing reads process
// arguments or environment after this point.

use std::ffi::OsString;
use std::path::PathBuf;
use std::time::Duration;

use clap::{CommandFactory, Parser};

use crate::api::DEFAULT_API_URL;
use crate::throttle::DEFAULT_DELAY;

pub const DEFAULT_LOG_FILE: &str = "codecks-import.log";

const EXAMPLE: &str =
    "Example:\n  codecks-import 1234567890abcdef mycompany cards.csv 'My Deck'";

/// Import cards from a CSV file into a Codecks deck.
#[derive(Parser, Debug)]
#[command(name = "codecks-import", version, after_help = EXAMPLE)]
struct Cli {
    /// Your Codecks API access token
    access_token: String,

    /// Your Codecks organization name
    organization: String,

    /// Path to the CSV file; the first column of each row is the card content
    csv_file: PathBuf,

    /// Part of the name of the deck to add cards to
    #[arg(allow_hyphen_values = true)]
    deck_search: String,

    /// Base URL of the Codecks API
    #[arg(long, env = "CODECKS_API_URL", default_value = DEFAULT_API_URL)]
    api_url: String,

    /// Pause after every card request, in milliseconds
    #[arg(long, default_value_t = DEFAULT_DELAY.as_millis() as u64)]
    delay_ms: u64,

    /// Skip the confirmation prompt
    #[arg(short, long)]
    yes: bool,

    /// Where to write the log
    #[arg(long, default_value = DEFAULT_LOG_FILE)]
    log_file: PathBuf,
}

/// Immutable settings for one import run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportConfig {
    pub access_token: String,
    pub organization: String,
    pub csv_file: PathBuf,
    pub deck_search: String,
    pub api_url: String,
    pub delay: Duration,
    pub assume_yes: bool,
    pub log_file: PathBuf,
}

/// What the caller should do when the arguments do not describe a run.
#[derive(Debug)]
pub enum ArgsOutcome {
    Run(ImportConfig),
    /// Print this text to stdout and exit successfully.
    Usage(String),
}

impl From<Cli> for ImportConfig {
    fn from(cli: Cli) -> Self {
        ImportConfig {
            access_token: cli.access_token,
            organization: cli.organization,
            csv_file: cli.csv_file,
            deck_search: cli.deck_search,
            api_url: cli.api_url,
            delay: Duration::from_millis(cli.delay_ms),
            assume_yes: cli.yes,
            log_file: cli.log_file,
        }
    }
}

impl ImportConfig {
    /// Parse process-style arguments (program name first).
    ///
    /// Any parse failure, including a wrong number of positionals, yields
    /// the usage text rather than an error: running without arguments is
    /// how users ask for help.
    pub fn parse_from<I, T>(args: I) -> ArgsOutcome
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        match Cli::try_parse_from(args) {
            Ok(cli) => ArgsOutcome::Run(cli.into()),
            Err(err) => {
                use clap::error::ErrorKind;
                match err.kind() {
                    ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                        ArgsOutcome::Usage(err.render().to_string())
                    }
                    _ => ArgsOutcome::Usage(usage()),
                }
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn for_test() -> Self {
        ImportConfig {
            access_token: "token".into(),
            organization: "acme".into(),
            csv_file: PathBuf::from("cards.csv"),
            deck_search: "Backlog".into(),
            api_url: DEFAULT_API_URL.into(),
            delay: Duration::ZERO,
            assume_yes: true,
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
        }
    }
}

/// Full help text, argument descriptions and example included.
pub fn usage() -> String {
    Cli::command().render_long_help().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(args: &[&str]) -> ImportConfig {
        match ImportConfig::parse_from(args.iter().copied()) {
            ArgsOutcome::Run(config) => config,
            ArgsOutcome::Usage(text) => panic!("expected a run, got usage:\n{text}"),
        }
    }

    fn is_usage(args: &[&str]) -> bool {
        matches!(
            ImportConfig::parse_from(args.iter().copied()),
            ArgsOutcome::Usage(_)
        )
    }

    #[test]
    fn parses_four_positionals() {
        let config = run(&["codecks-import", "tok", "acme", "cards.csv", "My Deck"]);
        assert_eq!(config.access_token, "tok");
        assert_eq!(config.organization, "acme");
        assert_eq!(config.csv_file, PathBuf::from("cards.csv"));
        assert_eq!(config.deck_search, "My Deck");
        assert_eq!(config.delay, DEFAULT_DELAY);
        assert!(!config.assume_yes);
        assert_eq!(config.log_file, PathBuf::from(DEFAULT_LOG_FILE));
    }

    #[test]
    fn optional_flags_override_defaults() {
        let config = run(&[
            "codecks-import",
            "tok",
            "acme",
            "cards.csv",
            "Deck",
            "--api-url",
            "http://localhost:4000",
            "--delay-ms",
            "250",
            "-y",
        ]);
        assert_eq!(config.api_url, "http://localhost:4000");
        assert_eq!(config.delay, Duration::from_millis(250));
        assert!(config.assume_yes);
    }

    #[test]
    fn search_term_may_start_with_a_hyphen() {
        let config = run(&["codecks-import", "tok", "acme", "cards.csv", "-WIP"]);
        assert_eq!(config.deck_search, "-WIP");

        let config = run(&["codecks-import", "tok", "acme", "cards.csv", "-WIP", "--yes"]);
        assert_eq!(config.deck_search, "-WIP");
        assert!(config.assume_yes);
    }

    #[test]
    fn wrong_argument_count_yields_usage() {
        assert!(is_usage(&["codecks-import"]));
        assert!(is_usage(&["codecks-import", "tok", "acme", "cards.csv"]));
        assert!(is_usage(&["codecks-import", "a", "b", "c", "d", "e"]));
    }

    #[test]
    fn usage_describes_every_argument() {
        let text = usage();
        for needle in [
            "<ACCESS_TOKEN>",
            "<ORGANIZATION>",
            "<CSV_FILE>",
            "<DECK_SEARCH>",
            "Example:",
        ] {
            assert!(text.contains(needle), "usage is missing {needle}:\n{text}");
        }
    }
}
