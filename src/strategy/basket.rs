//! Composite-instrument arbitrage.
//!
//! A basket's fair value is a fixed linear combination of its component
//! mid-prices. When the basket's own mid drifts more than a threshold
//! away from fair, take the touch on the cheap side with a small clip,
//! bounded by the position limit (long side) or current holdings (short
//! side — this strategy never goes short).

use serde::Deserialize;
use tracing::debug;

use super::{buy_headroom, held, Trader};
use crate::types::{Order, Symbol, TickResponse, TradingState};

/// State tag round-tripped through the harness; the strategy itself is
/// stateless.
const STATE_TAG: &str = "basket_arbitrage_v2";

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// One leg of the basket recipe.
#[derive(Debug, Clone, Deserialize)]
pub struct Component {
    pub symbol: Symbol,
    pub weight: i64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BasketConfig {
    /// The composite instrument to trade.
    pub symbol: Symbol,
    /// Recipe defining fair value as Σ weight × component mid.
    pub components: Vec<Component>,
    /// Minimum mispricing (in price units) before acting.
    pub threshold: f64,
    pub position_limit: i64,
    /// Units per signal; the probe stays small and re-fires each tick the
    /// mispricing persists.
    pub clip: i64,
}

impl Default for BasketConfig {
    fn default() -> Self {
        Self {
            symbol: "PICNIC_BASKET2".into(),
            components: vec![
                Component { symbol: "CROISSANTS".into(), weight: 4 },
                Component { symbol: "JAMS".into(), weight: 2 },
            ],
            threshold: 3.0,
            position_limit: 100,
            clip: 1,
        }
    }
}

// ---------------------------------------------------------------------------
// Strategy
// ---------------------------------------------------------------------------

pub struct BasketArbitrage {
    config: BasketConfig,
}

impl BasketArbitrage {
    pub fn new(config: BasketConfig) -> Self {
        Self { config }
    }

    /// Fair value from component mids; `None` if any component's book is
    /// missing or empty this tick.
    fn fair_value(&self, state: &TradingState) -> Option<f64> {
        let mut fair = 0.0;
        for leg in &self.config.components {
            let mid = state.depth(&leg.symbol)?.mid_price()?;
            fair += leg.weight as f64 * mid;
        }
        Some(fair)
    }
}

impl Trader for BasketArbitrage {
    fn name(&self) -> &'static str {
        "basket_arbitrage"
    }

    fn run(&mut self, state: &TradingState) -> TickResponse {
        let mut resp = TickResponse::pass(STATE_TAG);
        let cfg = &self.config;

        let Some(depth) = state.depth(&cfg.symbol) else {
            debug!(symbol = %cfg.symbol, "No basket order depth, skipping tick");
            return resp;
        };
        let Some(basket_mid) = depth.mid_price() else {
            debug!(symbol = %cfg.symbol, "Empty basket book, skipping tick");
            return resp;
        };
        let Some(fair) = self.fair_value(state) else {
            debug!(symbol = %cfg.symbol, "Missing component mid, skipping tick");
            return resp;
        };

        let position = state.position(&cfg.symbol);
        debug!(
            symbol = %cfg.symbol,
            basket_mid,
            fair,
            position,
            "Basket fair value computed"
        );

        if basket_mid + cfg.threshold < fair {
            // Undervalued: lift the ask.
            let Some(ask) = depth.best_ask() else { return resp };
            if ask.size < 1 {
                return resp;
            }
            let qty = cfg.clip.min(buy_headroom(cfg.position_limit, position));
            if qty >= 1 {
                debug!(
                    symbol = %cfg.symbol,
                    price = ask.price,
                    qty,
                    "Basket undervalued, buying"
                );
                resp.push_order(Order::buy(cfg.symbol.clone(), ask.price, qty));
            } else {
                debug!(symbol = %cfg.symbol, position, "Position limit reached, no buy");
            }
        } else if basket_mid - cfg.threshold > fair {
            // Overvalued: hit the bid, but only down to flat.
            let Some(bid) = depth.best_bid() else { return resp };
            if bid.size < 1 {
                return resp;
            }
            let qty = cfg.clip.min(held(position));
            if qty >= 1 {
                debug!(
                    symbol = %cfg.symbol,
                    price = bid.price,
                    qty,
                    "Basket overvalued, selling"
                );
                resp.push_order(Order::sell(cfg.symbol.clone(), bid.price, qty));
            } else {
                debug!(symbol = %cfg.symbol, "No inventory to sell");
            }
        }

        resp
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
