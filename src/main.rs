// Entrypoint for the CLI application.
// - Keeps `main` small: parse arguments, open the log, hand off to `app::run`.
// - Turns the error kind into a distinct exit status.

use std::process::ExitCode;

use codecks_import::config::{ArgsOutcome, ImportConfig};
use codecks_import::{app, error, logging};

fn main() -> ExitCode {
    let config = match ImportConfig::parse_from(std::env::args_os()) {
        ArgsOutcome::Run(config) => config,
        ArgsOutcome::Usage(text) => {
            println!("{text}");
            return ExitCode::SUCCESS;
        }
    };

    if let Err(e) = logging::init(&config.log_file) {
        eprintln!("Error: {e:#}");
        return ExitCode::from(error::EXIT_FAILURE);
    }

    match app::run(&config) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "import failed");
            eprintln!("Error: {e}");
            ExitCode::from(error::exit_code(&e))
        }
    }
}
