//! Perishable-commodity carry timing.
//!
//! The commodity's price spikes when the sunlight index drops below a
//! critical level. Enter long on the drop, pay storage every tick held,
//! and exit only once the index has recovered AND the bid clears the
//! all-in break-even (entry cost, accrued storage, export tariff,
//! transport, plus a profit buffer).

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::Trader;
use crate::types::{Order, Symbol, TickResponse, TradingState};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CarryConfig {
    pub symbol: Symbol,
    /// Critical sunlight index: entries below, exits at or above.
    pub critical_sunlight_index: f64,
    pub position_limit: i64,
    /// Storage cost accrued per unit per tick held.
    pub storage_cost: f64,
    /// Required profit over break-even before liquidating.
    pub profit_buffer: f64,
    /// Units bought per entry.
    pub order_size: i64,
}

impl Default for CarryConfig {
    fn default() -> Self {
        Self {
            symbol: "MAGNIFICENT_MACARONS".into(),
            critical_sunlight_index: 65.0,
            position_limit: 75,
            storage_cost: 0.1,
            profit_buffer: 50.0,
            order_size: 5,
        }
    }
}

// ---------------------------------------------------------------------------
// Carried state
// ---------------------------------------------------------------------------

/// Position record round-tripped through the opaque trader_data blob.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CarryState {
    pub in_position: bool,
    /// All-in cost per unit at entry: price + transport + import tariff.
    pub avg_cost: f64,
    /// Ticks held since entry.
    pub days_held: u32,
    pub qty: i64,
}

impl CarryState {
    pub fn decode(blob: &str) -> Self {
        if blob.is_empty() {
            return Self::default();
        }
        serde_json::from_str(blob).unwrap_or_else(|e| {
            warn!(error = %e, "Malformed carry state, starting fresh");
            Self::default()
        })
    }

    pub fn encode(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    /// Minimum exit price for the configured profit: entry cost plus
    /// accrued storage, export tariff, transport, and the buffer.
    pub fn break_even(&self, cfg: &CarryConfig, export_tariff: f64, transport: f64) -> f64 {
        self.avg_cost
            + self.days_held as f64 * cfg.storage_cost
            + export_tariff
            + transport
            + cfg.profit_buffer
    }
}

// ---------------------------------------------------------------------------
// Strategy
// ---------------------------------------------------------------------------

pub struct SunlightCarry {
    config: CarryConfig,
}

impl SunlightCarry {
    pub fn new(config: CarryConfig) -> Self {
        Self { config }
    }
}

impl Trader for SunlightCarry {
    fn name(&self) -> &'static str {
        "carry"
    }

    fn run(&mut self, state: &TradingState) -> TickResponse {
        let cfg = &self.config;
        let mut st = CarryState::decode(&state.trader_data);

        let Some(conv) = state.observations.conversion(&cfg.symbol) else {
            debug!(symbol = %cfg.symbol, "No conversion observation, skipping tick");
            return TickResponse::pass(st.encode());
        };
        let Some(depth) = state.depth(&cfg.symbol) else {
            debug!(symbol = %cfg.symbol, "No order depth, skipping tick");
            return TickResponse::pass(st.encode());
        };

        let sun = conv.sunlight_index;
        let mut resp = TickResponse::default();

        if !st.in_position {
            // Entry: sunlight collapse with enough resident ask size.
            match depth.best_ask() {
                Some(ask) if sun < cfg.critical_sunlight_index && ask.size >= cfg.order_size => {
                    let qty = cfg.order_size.min(cfg.position_limit);
                    let all_in = ask.price as f64 + conv.transport_fees + conv.import_tariff;
                    st = CarryState {
                        in_position: true,
                        avg_cost: all_in,
                        days_held: 0,
                        qty,
                    };
                    info!(
                        symbol = %cfg.symbol,
                        sun,
                        price = ask.price,
                        all_in,
                        qty,
                        "Sunlight below critical index, entering long"
                    );
                    resp.push_order(Order::buy(cfg.symbol.clone(), ask.price, qty));
                }
                _ => {
                    debug!(symbol = %cfg.symbol, sun, "No entry");
                }
            }
        } else {
            st.days_held += 1;
            let break_even = st.break_even(cfg, conv.export_tariff, conv.transport_fees);

            match depth.best_bid() {
                Some(bid)
                    if sun >= cfg.critical_sunlight_index && bid.price as f64 > break_even =>
                {
                    info!(
                        symbol = %cfg.symbol,
                        sun,
                        bid = bid.price,
                        break_even,
                        qty = st.qty,
                        "Sunlight recovered and bid clears break-even, liquidating"
                    );
                    resp.push_order(Order::sell(cfg.symbol.clone(), bid.price, st.qty));
                    st = CarryState::default();
                }
                _ => {
                    debug!(
                        symbol = %cfg.symbol,
                        sun,
                        days_held = st.days_held,
                        break_even,
                        qty = st.qty,
                        "Holding"
                    );
                }
            }
        }

        resp.trader_data = st.encode();
        resp
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::samples::{depth, state_with_depth};
    use crate::types::{ConversionObservation, TradingState};

    const SYMBOL: &str = "MAGNIFICENT_MACARONS";

    fn obs(sunlight: f64) -> ConversionObservation {
        ConversionObservation {
            bid_price: 0.0,
            ask_price: 0.0,
            transport_fees: 1.5,
            export_tariff: 9.0,
            import_tariff: 2.0,
            sugar_price: 190.0,
            sunlight_index: sunlight,
        }
    }

    fn macaron_state(sunlight: f64, bid: i64, ask: i64, blob: &str) -> TradingState {
        let mut state = state_with_depth(SYMBOL, depth(bid, 20, ask, 20));
        state
            .observations
            .conversion_observations
            .insert(SYMBOL.into(), obs(sunlight));
        state.trader_data = blob.to_string();
        state
    }

    fn trader() -> SunlightCarry {
        SunlightCarry::new(CarryConfig::default())
    }

    #[test]
    fn test_break_even_formula() {
        let st = CarryState { in_position: true, avg_cost: 603.5, days_held: 4, qty: 5 };
        let cfg = CarryConfig::default();
        // 603.5 + 4×0.1 + 9.0 + 1.5 + 50.0
        assert!((st.break_even(&cfg, 9.0, 1.5) - 664.4).abs() < 1e-9);
    }

    #[test]
    fn test_low_sunlight_enters_long() {
        let resp = trader().run(&macaron_state(60.0, 598, 600, ""));
        assert_eq!(resp.order_count(), 1);
        let order = &resp.orders[SYMBOL][0];
        assert_eq!(order.price, 600);
        assert_eq!(order.quantity, 5);

        let st = CarryState::decode(&resp.trader_data);
        assert!(st.in_position);
        assert_eq!(st.qty, 5);
        assert_eq!(st.days_held, 0);
        // all-in = 600 + 1.5 transport + 2.0 import tariff
        assert!((st.avg_cost - 603.5).abs() < 1e-9);
    }

    #[test]
    fn test_high_sunlight_no_entry() {
        let resp = trader().run(&macaron_state(70.0, 598, 600, ""));
        assert_eq!(resp.order_count(), 0);
        assert!(!CarryState::decode(&resp.trader_data).in_position);
    }

    #[test]
    fn test_thin_ask_blocks_entry() {
        let mut state = state_with_depth(SYMBOL, depth(598, 20, 600, 3));
        state
            .observations
            .conversion_observations
            .insert(SYMBOL.into(), obs(60.0));
        assert_eq!(trader().run(&state).order_count(), 0);
    }

    #[test]
    fn test_holding_accrues_storage() {
        let entry = trader().run(&macaron_state(60.0, 598, 600, ""));
        // Sun still low → hold, days_held ticks up.
        let hold = trader().run(&macaron_state(60.0, 610, 612, &entry.trader_data));
        assert_eq!(hold.order_count(), 0);
        let st = CarryState::decode(&hold.trader_data);
        assert!(st.in_position);
        assert_eq!(st.days_held, 1);
    }

    #[test]
    fn test_recovered_sun_but_bid_below_break_even_holds() {
        let entry = trader().run(&macaron_state(60.0, 598, 600, ""));
        // Break-even after one tick: 603.5 + 0.1 + 9.0 + 1.5 + 50 = 664.1.
        let resp = trader().run(&macaron_state(70.0, 660, 662, &entry.trader_data));
        assert_eq!(resp.order_count(), 0);
        assert!(CarryState::decode(&resp.trader_data).in_position);
    }

    #[test]
    fn test_low_sun_but_good_bid_holds() {
        let entry = trader().run(&macaron_state(60.0, 598, 600, ""));
        let resp = trader().run(&macaron_state(60.0, 700, 702, &entry.trader_data));
        assert_eq!(resp.order_count(), 0);
    }

    #[test]
    fn test_recovery_and_break_even_liquidates() {
        let entry = trader().run(&macaron_state(60.0, 598, 600, ""));
        // 665 > 664.1 break-even, sun recovered → sell everything.
        let resp = trader().run(&macaron_state(70.0, 665, 667, &entry.trader_data));
        assert_eq!(resp.order_count(), 1);
        let order = &resp.orders[SYMBOL][0];
        assert_eq!(order.price, 665);
        assert_eq!(order.quantity, -5);
        assert_eq!(CarryState::decode(&resp.trader_data), CarryState::default());
    }

    #[test]
    fn test_missing_observation_preserves_state() {
        let entry = trader().run(&macaron_state(60.0, 598, 600, ""));
        let mut state = state_with_depth(SYMBOL, depth(700, 20, 702, 20));
        state.trader_data = entry.trader_data.clone();
        let resp = trader().run(&state);
        assert_eq!(resp.order_count(), 0);
        // State passes through untouched, including days_held.
        assert_eq!(CarryState::decode(&resp.trader_data), CarryState::decode(&entry.trader_data));
    }

    #[test]
    fn test_malformed_blob_falls_back_to_default() {
        assert_eq!(CarryState::decode("not json at all"), CarryState::default());
        assert_eq!(CarryState::decode(""), CarryState::default());
    }

    #[test]
    fn test_blob_roundtrip_reproduces_decision() {
        let entry = trader().run(&macaron_state(60.0, 598, 600, ""));
        let blob = CarryState::decode(&entry.trader_data).encode();
        let a = trader().run(&macaron_state(70.0, 665, 667, &blob));
        let b = trader().run(&macaron_state(70.0, 665, 667, &blob));
        assert_eq!(a.orders, b.orders);
        assert_eq!(a.trader_data, b.trader_data);
    }
}
