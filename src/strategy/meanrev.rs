//! Rolling z-score mean reversion.
//!
//! Tracks a short history of the size-weighted mid and fades moves that
//! stretch beyond an entry threshold, widened by the current spread in
//! std units so a wide touch demands a larger dislocation. The window
//! history is carried in the state blob, so a replayed snapshot with the
//! same blob reproduces the same decision.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{buy_headroom, sell_headroom, Trader};
use crate::types::{Order, Symbol, TickResponse, TradingState};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MeanReversionConfig {
    pub symbol: Symbol,
    /// Rolling window length for mean/std of the size-weighted mid.
    pub window: usize,
    /// Ticks to observe before emitting any signal.
    pub warmup: u64,
    /// Base z-score entry threshold (spread-widened at runtime).
    pub entry_z: f64,
    pub position_limit: i64,
}

impl Default for MeanReversionConfig {
    fn default() -> Self {
        Self {
            symbol: "SQUID_INK".into(),
            window: 3,
            warmup: 6,
            entry_z: 1.5,
            position_limit: 50,
        }
    }
}

// ---------------------------------------------------------------------------
// Carried state
// ---------------------------------------------------------------------------

/// Tick-to-tick memory, round-tripped through the opaque trader_data blob.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
struct MeanRevState {
    swmid_history: Vec<f64>,
    tick: u64,
}

impl MeanRevState {
    fn decode(blob: &str) -> Self {
        if blob.is_empty() {
            return Self::default();
        }
        serde_json::from_str(blob).unwrap_or_else(|e| {
            warn!(error = %e, "Malformed mean-reversion state, starting fresh");
            Self::default()
        })
    }

    fn encode(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

// ---------------------------------------------------------------------------
// Strategy
// ---------------------------------------------------------------------------

pub struct MeanReversion {
    config: MeanReversionConfig,
}

impl MeanReversion {
    pub fn new(config: MeanReversionConfig) -> Self {
        Self { config }
    }
}

/// Mean and population standard deviation of a window.
fn mean_std(window: &[f64]) -> (f64, f64) {
    let n = window.len() as f64;
    let mean = window.iter().sum::<f64>() / n;
    let var = window.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / n;
    (mean, var.sqrt())
}

impl Trader for MeanReversion {
    fn name(&self) -> &'static str {
        "mean_reversion"
    }

    fn run(&mut self, state: &TradingState) -> TickResponse {
        let cfg = &self.config;
        let mut st = MeanRevState::decode(&state.trader_data);
        st.tick += 1;
        let mut resp = TickResponse::default();

        let Some(depth) = state.depth(&cfg.symbol) else {
            debug!(symbol = %cfg.symbol, "No order depth, skipping tick");
            resp.trader_data = st.encode();
            return resp;
        };
        // The signal needs both sides: the weighted mid and the spread.
        let (Some(bid), Some(ask), Some(swmid)) =
            (depth.best_bid(), depth.best_ask(), depth.size_weighted_mid())
        else {
            debug!(symbol = %cfg.symbol, "One-sided book, skipping tick");
            resp.trader_data = st.encode();
            return resp;
        };

        // The current sample is scored against the trailing window of
        // *prior* samples, then appended below.
        if st.tick > cfg.warmup && st.swmid_history.len() >= cfg.window {
            let window = &st.swmid_history[st.swmid_history.len() - cfg.window..];
            let (mean, std) = mean_std(window);
            if std > 0.0 {
                let z = (swmid - mean) / std;
                let spread_adj = (ask.price - bid.price) as f64 / std;
                let position = state.position(&cfg.symbol);
                debug!(symbol = %cfg.symbol, swmid, z, spread_adj, position, "Signal computed");

                if z > cfg.entry_z + spread_adj && position > -cfg.position_limit {
                    let qty = sell_headroom(cfg.position_limit, position);
                    resp.push_order(Order::sell(cfg.symbol.clone(), bid.price - 1, qty));
                } else if z < -(cfg.entry_z + spread_adj) && position < cfg.position_limit {
                    let qty = buy_headroom(cfg.position_limit, position);
                    resp.push_order(Order::buy(cfg.symbol.clone(), ask.price + 1, qty));
                }
            } else {
                debug!(symbol = %cfg.symbol, "Zero dispersion in window, skipping tick");
            }
        }

        st.swmid_history.push(swmid);
        if st.swmid_history.len() > cfg.window {
            let excess = st.swmid_history.len() - cfg.window;
            st.swmid_history.drain(..excess);
        }
        resp.trader_data = st.encode();
        resp
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
