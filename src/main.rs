//! LAGOON — trading strategies for a simulated archipelago exchange.
//!
//! Entry point. Loads configuration, initialises structured logging,
//! builds the configured trader, and pipes the snapshot feed from stdin
//! through it, one JSON response line per tick on stdout.

use anyhow::Result;
use std::io::{self, BufReader, BufWriter};
use tracing::info;

use lagoon::config::AppConfig;
use lagoon::runner;
use lagoon::strategy;

const BANNER: &str = r#"
 _        _    ____  ___   ___  _   _
| |      / \  / ___|/ _ \ / _ \| \ | |
| |     / _ \| |  _| | | | | | |  \| |
| |___ / ___ \ |_| | |_| | |_| | |\  |
|_____/_/   \_\____|\___/ \___/|_| \_|

  Archipelago Exchange Strategy Runner
  v0.1.0
"#;

fn main() -> Result<()> {
    let path = AppConfig::path_from_env();
    let cfg = AppConfig::load_or_default(&path)?;

    init_logging();

    eprintln!("{BANNER}");
    info!(
        config = %path,
        strategy = %cfg.trader.strategy,
        "LAGOON starting up"
    );

    let mut trader = strategy::build(&cfg)?;

    let stdin = io::stdin();
    let stdout = io::stdout();
    let summary = runner::run_feed(
        trader.as_mut(),
        BufReader::new(stdin.lock()),
        BufWriter::new(stdout.lock()),
    )?;

    info!(
        ticks = summary.ticks,
        orders = summary.orders_emitted,
        conversions = summary.conversions,
        skipped = summary.skipped_lines,
        "LAGOON shut down cleanly."
    );

    Ok(())
}

/// Initialise the `tracing` subscriber. Logs go to stderr so stdout
/// stays a clean response stream for the harness.
fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("lagoon=info"));

    let json_logging = std::env::var("LAGOON_LOG_JSON").is_ok();

    if json_logging {
        fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_writer(io::stderr)
            .init();
    } else {
        fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_writer(io::stderr)
            .init();
    }
}
