//! Fixed-band quoting around a static fair value.
//!
//! For an instrument that pins to a known reference price, rest a buy
//! one band below fair and a sell one band above, each sized to the full
//! remaining headroom under the position limit. The book is never
//! consulted; any resident order crossing the band gets filled by the
//! harness.

use serde::Deserialize;
use tracing::debug;

use super::{buy_headroom, sell_headroom, Trader};
use crate::types::{Order, Symbol, TickResponse, TradingState};

const STATE_TAG: &str = "fixed_band_v1";

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BandConfig {
    pub symbol: Symbol,
    /// Static reference price the instrument reverts to.
    pub fair_value: i64,
    /// Distance from fair at which both quotes rest.
    pub band: i64,
    pub position_limit: i64,
}

impl Default for BandConfig {
    fn default() -> Self {
        Self {
            symbol: "RAINFOREST_RESIN".into(),
            fair_value: 10_000,
            band: 1,
            position_limit: 50,
        }
    }
}

// ---------------------------------------------------------------------------
// Strategy
// ---------------------------------------------------------------------------

pub struct FixedBand {
    config: BandConfig,
}

impl FixedBand {
    pub fn new(config: BandConfig) -> Self {
        Self { config }
    }
}

impl Trader for FixedBand {
    fn name(&self) -> &'static str {
        "band"
    }

    fn run(&mut self, state: &TradingState) -> TickResponse {
        let cfg = &self.config;
        let mut resp = TickResponse::pass(STATE_TAG);

        // Unlisted this tick — nothing to quote against.
        if state.depth(&cfg.symbol).is_none() {
            debug!(symbol = %cfg.symbol, "Instrument not listed, skipping tick");
            return resp;
        }

        let position = state.position(&cfg.symbol);
        let buy_qty = buy_headroom(cfg.position_limit, position);
        let sell_qty = sell_headroom(cfg.position_limit, position);
        debug!(symbol = %cfg.symbol, position, buy_qty, sell_qty, "Quoting band");

        resp.push_order(Order::buy(cfg.symbol.clone(), cfg.fair_value - cfg.band, buy_qty));
        resp.push_order(Order::sell(cfg.symbol.clone(), cfg.fair_value + cfg.band, sell_qty));
        resp
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
