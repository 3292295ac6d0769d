//! Harness data model.
//!
//! These types mirror, field for field, the JSON the exchange harness
//! sends each tick and expects back. Field casing is mixed on the wire
//! (camelCase on the observation types, snake_case elsewhere); serde
//! renames keep the Rust side idiomatic.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// Instrument symbol as quoted on the exchange, e.g. `"PICNIC_BASKET2"`.
pub type Symbol = String;
/// Underlying product name. On this exchange symbols and products coincide.
pub type Product = String;
/// Simulation timestamp (integer tick).
pub type Timestamp = i64;

// ---------------------------------------------------------------------------
// Order
// ---------------------------------------------------------------------------

/// A one-tick order intent. Positive quantity buys, negative sells.
/// The harness offers no fill guarantee; unfilled intents simply expire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub symbol: Symbol,
    pub price: i64,
    pub quantity: i64,
}

impl Order {
    pub fn buy(symbol: impl Into<Symbol>, price: i64, quantity: i64) -> Self {
        Self { symbol: symbol.into(), price, quantity }
    }

    /// A sell intent; `quantity` is the positive size to sell.
    pub fn sell(symbol: impl Into<Symbol>, price: i64, quantity: i64) -> Self {
        Self { symbol: symbol.into(), price, quantity: -quantity }
    }

    pub fn is_buy(&self) -> bool {
        self.quantity > 0
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.symbol, self.price, self.quantity)
    }
}

// ---------------------------------------------------------------------------
// Order book snapshot
// ---------------------------------------------------------------------------

/// Resident orders on one instrument at one tick, price → quantity.
///
/// Buy quantities are positive; sell quantities arrive negative on the
/// wire but represent resident magnitude. Extraction helpers live in
/// [`crate::book`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderDepth {
    #[serde(default)]
    pub buy_orders: BTreeMap<i64, i64>,
    #[serde(default)]
    pub sell_orders: BTreeMap<i64, i64>,
}

// ---------------------------------------------------------------------------
// Trades and listings
// ---------------------------------------------------------------------------

/// An executed trade reported by the harness.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trade {
    pub symbol: Symbol,
    pub price: i64,
    pub quantity: i64,
    #[serde(default)]
    pub buyer: Option<String>,
    #[serde(default)]
    pub seller: Option<String>,
    #[serde(default)]
    pub timestamp: Timestamp,
}

/// Tradable instrument listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Listing {
    pub symbol: Symbol,
    pub product: Product,
    pub denomination: Product,
}

// ---------------------------------------------------------------------------
// Observations
// ---------------------------------------------------------------------------

/// Per-tick auxiliary values for one convertible commodity: reference
/// quotes plus the fees, tariffs and environment indices the carry
/// strategy keys off.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionObservation {
    pub bid_price: f64,
    pub ask_price: f64,
    pub transport_fees: f64,
    pub export_tariff: f64,
    pub import_tariff: f64,
    pub sugar_price: f64,
    pub sunlight_index: f64,
}

/// All auxiliary observations for one tick.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Observation {
    #[serde(default)]
    pub plain_value_observations: HashMap<Product, i64>,
    #[serde(default)]
    pub conversion_observations: HashMap<Product, ConversionObservation>,
}

impl Observation {
    /// Conversion observation for a product, if the harness supplied one.
    pub fn conversion(&self, product: &str) -> Option<&ConversionObservation> {
        self.conversion_observations.get(product)
    }
}

// ---------------------------------------------------------------------------
// Tick snapshot
// ---------------------------------------------------------------------------

/// Everything the harness hands a trader for one tick.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TradingState {
    /// Opaque state string the trader returned on the previous tick.
    #[serde(rename = "traderData", default)]
    pub trader_data: String,
    #[serde(default)]
    pub timestamp: Timestamp,
    #[serde(default)]
    pub listings: HashMap<Symbol, Listing>,
    #[serde(default)]
    pub order_depths: HashMap<Symbol, OrderDepth>,
    #[serde(default)]
    pub own_trades: HashMap<Symbol, Vec<Trade>>,
    #[serde(default)]
    pub market_trades: HashMap<Symbol, Vec<Trade>>,
    #[serde(default)]
    pub position: HashMap<Product, i64>,
    #[serde(default)]
    pub observations: Observation,
}

impl TradingState {
    /// Signed position in a product, 0 when the harness omits it.
    pub fn position(&self, product: &str) -> i64 {
        self.position.get(product).copied().unwrap_or(0)
    }

    /// Order book for a symbol, if present this tick.
    pub fn depth(&self, symbol: &str) -> Option<&OrderDepth> {
        self.order_depths.get(symbol)
    }
}

// ---------------------------------------------------------------------------
// Tick response
// ---------------------------------------------------------------------------

/// What a trader hands back each tick: order intents per symbol, a
/// conversion request count, and the opaque state string to be returned
/// on the next tick.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TickResponse {
    pub orders: HashMap<Symbol, Vec<Order>>,
    pub conversions: i64,
    #[serde(rename = "traderData")]
    pub trader_data: String,
}

impl TickResponse {
    /// A response carrying only state — no orders, no conversions.
    pub fn pass(trader_data: impl Into<String>) -> Self {
        Self {
            orders: HashMap::new(),
            conversions: 0,
            trader_data: trader_data.into(),
        }
    }

    /// Total number of order intents across all symbols.
    pub fn order_count(&self) -> usize {
        self.orders.values().map(Vec::len).sum()
    }

    /// Append an order under its own symbol, dropping zero quantities.
    pub fn push_order(&mut self, order: Order) {
        if order.quantity == 0 {
            return;
        }
        self.orders.entry(order.symbol.clone()).or_default().push(order);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
