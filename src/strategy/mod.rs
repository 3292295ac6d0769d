//! Trading strategies.
//!
//! Every strategy is a [`Trader`]: one synchronous call per tick over an
//! immutable snapshot, returning order intents, a conversion count, and
//! the opaque state string the harness hands back next tick. Strategies
//! never fail a tick — missing data skips the action and malformed
//! carried state falls back to defaults.

pub mod band;
pub mod basket;
pub mod carry;
pub mod meanrev;

use std::collections::HashMap;

use anyhow::{bail, Result};
use tracing::warn;

use crate::config::AppConfig;
use crate::types::{TickResponse, TradingState};

use band::FixedBand;
use basket::BasketArbitrage;
use carry::SunlightCarry;
use meanrev::MeanReversion;

// ---------------------------------------------------------------------------
// Trader contract
// ---------------------------------------------------------------------------

/// A single-method decision component: `(snapshot) -> (orders, conversions,
/// new state)`. Implementations may keep configuration but all tick-to-tick
/// memory must round-trip through the returned `trader_data` string.
pub trait Trader {
    fn name(&self) -> &'static str;

    fn run(&mut self, state: &TradingState) -> TickResponse;
}

// ---------------------------------------------------------------------------
// Position sizing
// ---------------------------------------------------------------------------

/// How many units can still be bought without breaching `limit`.
pub fn buy_headroom(limit: i64, position: i64) -> i64 {
    (limit - position).max(0)
}

/// How many units can still be sold without breaching `-limit`.
pub fn sell_headroom(limit: i64, position: i64) -> i64 {
    (limit + position).max(0)
}

/// Currently held (non-negative) quantity available to liquidate.
pub fn held(position: i64) -> i64 {
    position.max(0)
}

// ---------------------------------------------------------------------------
// Factory
// ---------------------------------------------------------------------------

/// Build the trader named by `cfg.trader.strategy`.
pub fn build(cfg: &AppConfig) -> Result<Box<dyn Trader>> {
    let trader: Box<dyn Trader> = match cfg.trader.strategy.as_str() {
        "basket_arbitrage" => Box::new(BasketArbitrage::new(cfg.basket.clone())),
        "mean_reversion" => Box::new(MeanReversion::new(cfg.mean_reversion.clone())),
        "band" => Box::new(FixedBand::new(cfg.band.clone())),
        "carry" => Box::new(SunlightCarry::new(cfg.carry.clone())),
        "composite" => Box::new(Composite::new(vec![
            Box::new(FixedBand::new(cfg.band.clone())),
            Box::new(MeanReversion::new(cfg.mean_reversion.clone())),
            Box::new(BasketArbitrage::new(cfg.basket.clone())),
            Box::new(SunlightCarry::new(cfg.carry.clone())),
        ])),
        other => bail!("unknown strategy: {other}"),
    };
    Ok(trader)
}

// ---------------------------------------------------------------------------
// Composite trader
// ---------------------------------------------------------------------------

/// Runs several traders against the same snapshot and merges their
/// outputs. Each child's state blob is carried under its name inside one
/// JSON object, so the harness still sees a single opaque string.
pub struct Composite {
    children: Vec<Box<dyn Trader>>,
}

impl Composite {
    pub fn new(children: Vec<Box<dyn Trader>>) -> Self {
        Self { children }
    }

    fn decode_blobs(blob: &str) -> HashMap<String, String> {
        if blob.is_empty() {
            return HashMap::new();
        }
        match serde_json::from_str(blob) {
            Ok(map) => map,
            Err(e) => {
                warn!(error = %e, "Malformed composite state blob, children start fresh");
                HashMap::new()
            }
        }
    }
}

impl Trader for Composite {
    fn name(&self) -> &'static str {
        "composite"
    }

    fn run(&mut self, state: &TradingState) -> TickResponse {
        let carried = Self::decode_blobs(&state.trader_data);
        let mut merged = TickResponse::default();
        let mut blobs: HashMap<String, String> = HashMap::new();

        for child in &mut self.children {
            let mut child_state = state.clone();
            child_state.trader_data = carried.get(child.name()).cloned().unwrap_or_default();
            let resp = child.run(&child_state);

            for (symbol, orders) in resp.orders {
                merged.orders.entry(symbol).or_default().extend(orders);
            }
            merged.conversions += resp.conversions;
            blobs.insert(child.name().to_string(), resp.trader_data);
        }

        merged.trader_data = serde_json::to_string(&blobs).unwrap_or_default();
        merged
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
