// Log file setup. The file is truncated on every run; console output stays
// reserved for the user-facing messages printed by the importer.

use std::fs::File;
use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "codecks_import=debug";

/// Install a global subscriber writing plain `LEVEL target: message` lines
/// to `path`. `RUST_LOG` overrides the default filter.
pub fn init(path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create log file {}", path.display()))?;
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .without_time()
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to install logger: {e}"))
}
