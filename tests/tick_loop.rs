//! End-to-end tick loop tests: JSON snapshots through the feed runner
//! into the composite trader, checking the orders and carried state the
//! harness would see.

use std::collections::HashMap;

use lagoon::config::AppConfig;
use lagoon::runner::run_feed;
use lagoon::strategy;
use lagoon::types::{
    ConversionObservation, OrderDepth, TickResponse, TradingState,
};

/// One-level book: positive bid size, negative resident ask size.
fn depth(bid: i64, bid_sz: i64, ask: i64, ask_sz: i64) -> OrderDepth {
    let mut d = OrderDepth::default();
    d.buy_orders.insert(bid, bid_sz);
    d.sell_orders.insert(ask, -ask_sz);
    d
}

fn macaron_obs(sunlight: f64) -> ConversionObservation {
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

/// A full-market snapshot covering every default instrument.
fn snapshot(timestamp: i64, macaron_sun: f64, macaron_bid: i64, macaron_ask: i64) -> TradingState {
    let mut state = TradingState::default();
    state.timestamp = timestamp;
    state
        .order_depths
        .insert("RAINFOREST_RESIN".into(), depth(9998, 10, 10002, 10));
    state
        .order_depths
        .insert("SQUID_INK".into(), depth(2024, 4, 2026, 4));
    state
        .order_depths
        .insert("CROISSANTS".into(), depth(4310, 50, 4314, 50));
    state.order_depths.insert("JAMS".into(), depth(6618, 40, 6622, 40));
    // Component fair value: 4×4312 + 2×6620 = 30488.
    state
        .order_depths
        .insert("PICNIC_BASKET2".into(), depth(30478, 20, 30482, 20));
    state
        .order_depths
        .insert("MAGNIFICENT_MACARONS".into(), depth(macaron_bid, 20, macaron_ask, 20));
    state
        .observations
        .conversion_observations
        .insert("MAGNIFICENT_MACARONS".into(), macaron_obs(macaron_sun));
    state
}

fn to_lines(snapshots: &[TradingState]) -> String {
    snapshots
        .iter()
        .map(|s| serde_json::to_string(s).unwrap())
        .collect::<Vec<_>>()
        .join("\n")
}

fn parse_responses(out: &[u8]) -> Vec<TickResponse> {
    String::from_utf8(out.to_vec())
        .unwrap()
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect()
}

#[test]
fn composite_feed_runs_all_strategies() {
    let cfg = AppConfig::default();
    let mut trader = strategy::build(&cfg).unwrap();

    // Sunlight collapses on the third tick, macarons still cheap.
    let snapshots: Vec<TradingState> = (0..3)
        .map(|i| snapshot(i * 100, if i < 2 { 70.0 } else { 60.0 }, 598, 600))
        .collect();

    let mut out = Vec::new();
    let summary = run_feed(trader.as_mut(), to_lines(&snapshots).as_bytes(), &mut out).unwrap();
    assert_eq!(summary.ticks, 3);
    assert_eq!(summary.skipped_lines, 0);
    assert_eq!(summary.conversions, 0);

    let responses = parse_responses(&out);
    assert_eq!(responses.len(), 3);

    // Band quotes rest every tick.
    for resp in &responses {
        let resin = &resp.orders["RAINFOREST_RESIN"];
        assert_eq!(resin.len(), 2);
        assert_eq!(resin[0].price, 9999);
        assert_eq!(resin[0].quantity, 50);
        assert_eq!(resin[1].price, 10001);
        assert_eq!(resin[1].quantity, -50);
    }

    // Basket is 6 below fair (30480 vs 30488) → buy 1 at the ask each tick.
    let basket = &responses[0].orders["PICNIC_BASKET2"];
    assert_eq!(basket.len(), 1);
    assert_eq!(basket[0].price, 30482);
    assert_eq!(basket[0].quantity, 1);

    // Carry enters on the sunlight collapse.
    assert!(!responses[1].orders.contains_key("MAGNIFICENT_MACARONS"));
    let macarons = &responses[2].orders["MAGNIFICENT_MACARONS"];
    assert_eq!(macarons[0].price, 600);
    assert_eq!(macarons[0].quantity, 5);

    // Composite blob holds one entry per child strategy.
    let blobs: HashMap<String, String> =
        serde_json::from_str(&responses[2].trader_data).unwrap();
    assert_eq!(blobs.len(), 4);
    assert!(blobs.contains_key("carry"));
    assert!(blobs.contains_key("mean_reversion"));
}

#[test]
fn carry_cycle_enter_hold_exit_through_feed() {
    let mut cfg = AppConfig::default();
    cfg.trader.strategy = "carry".into();
    let mut trader = strategy::build(&cfg).unwrap();

    let snapshots = vec![
        snapshot(0, 70.0, 598, 600),   // calm — no entry
        snapshot(100, 60.0, 598, 600), // collapse — enter at 600, all-in 603.5
        snapshot(200, 60.0, 640, 642), // still dark — hold (day 1)
        snapshot(300, 70.0, 660, 662), // recovered but bid ≤ 664.2 BE — hold (day 2)
        snapshot(400, 70.0, 666, 668), // bid 666 > 664.3 BE — exit
    ];

    let mut out = Vec::new();
    let summary = run_feed(trader.as_mut(), to_lines(&snapshots).as_bytes(), &mut out).unwrap();
    assert_eq!(summary.ticks, 5);

    let responses = parse_responses(&out);
    assert_eq!(responses[0].order_count(), 0);

    let entry = &responses[1].orders["MAGNIFICENT_MACARONS"][0];
    assert_eq!((entry.price, entry.quantity), (600, 5));

    assert_eq!(responses[2].order_count(), 0);
    assert_eq!(responses[3].order_count(), 0);

    let exit = &responses[4].orders["MAGNIFICENT_MACARONS"][0];
    assert_eq!((exit.price, exit.quantity), (666, -5));

    // After the exit the carried record is back to the flat default.
    let final_blob: serde_json::Value =
        serde_json::from_str(&responses[4].trader_data).unwrap();
    assert_eq!(final_blob["in_position"], false);
    assert_eq!(final_blob["qty"], 0);
}

#[test]
fn basket_sell_side_requires_inventory() {
    let mut cfg = AppConfig::default();
    cfg.trader.strategy = "basket_arbitrage".into();
    let mut trader = strategy::build(&cfg).unwrap();

    // Basket 10 above fair; no inventory, so nothing to sell.
    let mut rich = snapshot(0, 70.0, 598, 600);
    rich.order_depths
        .insert("PICNIC_BASKET2".into(), depth(30496, 20, 30500, 20));
    let resp = trader.run(&rich);
    assert_eq!(resp.order_count(), 0);

    // With inventory the same snapshot hits the bid for one unit.
    rich.position.insert("PICNIC_BASKET2".into(), 3);
    let resp = trader.run(&rich);
    let order = &resp.orders["PICNIC_BASKET2"][0];
    assert_eq!((order.price, order.quantity), (30496, -1));
}

#[test]
fn unknown_strategy_is_rejected() {
    let mut cfg = AppConfig::default();
    cfg.trader.strategy = "momentum".into();
    assert!(strategy::build(&cfg).is_err());
}
