//! Order-book quote extraction.
//!
//! Best bid is the highest price with resident buy size; best ask the
//! lowest price with resident sell size. Sell sizes arrive negative on
//! the wire, so sizes are always reported as magnitudes here. A one-sided
//! book falls back to the surviving side for the mid; an empty book
//! yields `None`.

use crate::types::OrderDepth;

/// One side's touch: price and resident size magnitude.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quote {
    pub price: i64,
    pub size: i64,
}

impl OrderDepth {
    /// Highest resident buy level, if any.
    pub fn best_bid(&self) -> Option<Quote> {
        self.buy_orders
            .iter()
            .next_back()
            .map(|(&price, &size)| Quote { price, size: size.abs() })
    }

    /// Lowest resident sell level, if any.
    pub fn best_ask(&self) -> Option<Quote> {
        self.sell_orders
            .iter()
            .next()
            .map(|(&price, &size)| Quote { price, size: size.abs() })
    }

    /// Arithmetic mid of the touch; one-sided books fall back to the
    /// side that exists.
    pub fn mid_price(&self) -> Option<f64> {
        match (self.best_bid(), self.best_ask()) {
            (Some(b), Some(a)) => Some((b.price + a.price) as f64 / 2.0),
            (Some(b), None) => Some(b.price as f64),
            (None, Some(a)) => Some(a.price as f64),
            (None, None) => None,
        }
    }

    /// Size-weighted mid: each side's price weighted by the square root
    /// of the *opposite* side's resident size, so the mid leans toward
    /// the side with less depth behind it. Requires both sides.
    pub fn size_weighted_mid(&self) -> Option<f64> {
        let bid = self.best_bid()?;
        let ask = self.best_ask()?;
        let bid_w = (bid.size as f64).sqrt();
        let ask_w = (ask.size as f64).sqrt();
        if bid_w + ask_w == 0.0 {
            return self.mid_price();
        }
        Some((ask.price as f64 * bid_w + bid.price as f64 * ask_w) / (bid_w + ask_w))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
