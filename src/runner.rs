//! Tick feed loop.
//!
//! The binary-side adapter between the exchange harness and a [`Trader`]:
//! one JSON `TradingState` per input line, one JSON `TickResponse` per
//! output line. When a snapshot arrives without carried state (as on a
//! local replay file), the previous tick's returned blob is injected,
//! which is exactly what the live harness does. Malformed lines are
//! logged and skipped; the harness will call again next tick.

use std::io::{BufRead, Write};

use tracing::{debug, info, warn};

use crate::strategy::Trader;
use crate::types::TradingState;

/// Errors that abort the feed loop. Per-line decode failures do not —
/// they are skipped and counted in the [`FeedSummary`].
#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    #[error("feed I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to encode tick response: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Counters reported after the feed ends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeedSummary {
    pub ticks: u64,
    pub orders_emitted: u64,
    pub conversions: i64,
    pub skipped_lines: u64,
}

/// Drive every snapshot in `input` through `trader`, writing one
/// response line per tick to `output`.
pub fn run_feed<R: BufRead, W: Write>(
    trader: &mut dyn Trader,
    input: R,
    mut output: W,
) -> Result<FeedSummary, FeedError> {
    let mut summary = FeedSummary::default();
    let mut carried_state = String::new();

    for (line_no, line) in input.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let mut state: TradingState = match serde_json::from_str(&line) {
            Ok(state) => state,
            Err(e) => {
                warn!(line = line_no + 1, error = %e, "Malformed snapshot line, skipping");
                summary.skipped_lines += 1;
                continue;
            }
        };
        if state.trader_data.is_empty() {
            state.trader_data = carried_state.clone();
        }

        let resp = trader.run(&state);
        summary.ticks += 1;
        summary.orders_emitted += resp.order_count() as u64;
        summary.conversions += resp.conversions;
        carried_state = resp.trader_data.clone();

        debug!(
            timestamp = state.timestamp,
            orders = resp.order_count(),
            "Tick processed"
        );

        serde_json::to_writer(&mut output, &resp)?;
        output.write_all(b"\n")?;
    }

    info!(
        ticks = summary.ticks,
        orders = summary.orders_emitted,
        skipped = summary.skipped_lines,
        "Feed complete"
    );
    Ok(summary)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
