use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use color_eyre::eyre::{eyre, Result, WrapErr};
use tracing_subscriber::EnvFilter;

const CRATE_TARGET: &str = "datebook";

/// Level for this crate's logs.
///
/// - 0 (none) -> the configured level
/// - 1 (-v)   -> info
/// - 2 (-vv)  -> debug
/// - 3+ (-vvv)-> trace
fn level_for(verbosity: u8, configured: &str) -> &str {
    match verbosity {
        0 => configured,
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Send logs to `path`. The terminal belongs to the UI, so nothing is
/// written to stdout or stderr. `RUST_LOG` overrides the level if set.
pub fn init(verbosity: u8, configured_level: &str, path: &Path) -> Result<()> {
    let level = level_for(verbosity, configured_level);
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{}={}", CRATE_TARGET, level)));

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .wrap_err_with(|| format!("creating log directory {}", parent.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .wrap_err_with(|| format!("opening log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| eyre!("installing logger: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_overrides_configured_level() {
        assert_eq!(level_for(0, "warn"), "warn");
        assert_eq!(level_for(1, "warn"), "info");
        assert_eq!(level_for(2, "error"), "debug");
        assert_eq!(level_for(9, "warn"), "trace");
    }
}
