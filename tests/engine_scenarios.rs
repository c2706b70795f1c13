//! End-to-end scenarios for the incremental cycle detector.

use spot_arb_mvp::{ArbitrageEngine, EngineError};

fn triangle_engine() -> ArbitrageEngine {
    ArbitrageEngine::new(&["A-B", "B-C", "A-C"])
}

#[test]
fn consistent_rates_admit_no_cycle() {
    let mut engine = triangle_engine();
    engine.update_price("A-B", 2.0).unwrap();
    engine.update_price("B-C", 3.0).unwrap();
    engine.update_price("A-C", 6.0).unwrap();

    assert!(engine.find_arbitrage_cycle().is_none());
}

#[test]
fn triangular_mispricing_is_detected() {
    let mut engine = triangle_engine();
    engine.update_price("A-B", 2.0).unwrap();
    engine.update_price("B-C", 3.0).unwrap();
    // 1 A buys only 5 C directly, but 6 C via B: a 20% loop.
    engine.update_price("A-C", 5.0).unwrap();

    let cycle = engine.find_arbitrage_cycle().expect("profitable loop");

    assert!(cycle.path.len() >= 2);
    assert_eq!(cycle.path.first(), cycle.path.last());
    assert!(cycle.total_weight < 0.0);
    assert!((cycle.expected_return - 1.2).abs() < 1e-9);

    let mut currencies: Vec<&str> = cycle.path[..cycle.path.len() - 1]
        .iter()
        .map(String::as_str)
        .collect();
    currencies.sort_unstable();
    assert_eq!(currencies, vec!["A", "B", "C"]);
}

#[test]
fn cycle_emerges_only_after_the_last_tick() {
    let mut engine = triangle_engine();
    engine.update_price("A-B", 2.0).unwrap();
    engine.update_price("B-C", 3.0).unwrap();
    engine.update_price("A-C", 6.0).unwrap();
    assert!(engine.find_arbitrage_cycle().is_none());

    engine.update_price("A-C", 5.0).unwrap();
    assert!(engine.find_arbitrage_cycle().is_some());
}

#[test]
fn malformed_symbol_leaves_engine_usable() {
    let mut engine = triangle_engine();

    assert!(matches!(
        engine.update_price("ABUSD", 1.0),
        Err(EngineError::MalformedSymbol(_))
    ));

    engine.update_price("A-B", 2.0).unwrap();
    engine.update_price("B-C", 3.0).unwrap();
    engine.update_price("A-C", 5.0).unwrap();
    assert!(engine.find_arbitrage_cycle().is_some());
}

#[test]
fn unknown_currency_changes_nothing() {
    let mut engine = ArbitrageEngine::new(&["A-B"]);

    assert!(engine.update_price("A-C", 1.0).is_ok());
    assert_eq!(engine.graph().edge_count(), 0);
    assert!(engine.find_arbitrage_cycle().is_none());
}

#[test]
fn direct_pair_round_trip_is_not_flagged() {
    let mut engine = ArbitrageEngine::new(&["A-B"]);

    engine.update_price("A-B", 2.0).unwrap();
    assert!(engine.find_arbitrage_cycle().is_none());

    // A stale-looking repeat of the same price must not fake a profit.
    engine.update_price("A-B", 2.0).unwrap();
    assert!(engine.find_arbitrage_cycle().is_none());
}

#[test]
fn empty_symbol_universe() {
    let mut engine = ArbitrageEngine::new::<&str>(&[]);

    assert_eq!(engine.graph().vertex_count(), 0);
    assert!(engine.find_arbitrage_cycle().is_none());
    // Ticks for never-registered currencies are dropped, not fatal.
    assert!(engine.update_price("A-B", 1.0).is_ok());
}

#[test]
fn unit_price_gives_zero_weights() {
    let mut engine = ArbitrageEngine::new(&["A-B"]);
    engine.update_price("A-B", 1.0).unwrap();

    let registry = engine.graph().registry();
    let a = registry.id_of("A").unwrap();
    let b = registry.id_of("B").unwrap();
    assert_eq!(engine.graph().edge_weight(a, b), Some(0.0));
    assert_eq!(engine.graph().edge_weight(b, a), Some(0.0));
}

#[test]
fn forward_and_reverse_weights_cancel() {
    let mut engine = ArbitrageEngine::new(&["BTC-USD"]);
    engine.update_price("BTC-USD", 64250.5).unwrap();

    let registry = engine.graph().registry();
    let btc = registry.id_of("BTC").unwrap();
    let usd = registry.id_of("USD").unwrap();
    let forward = engine.graph().edge_weight(btc, usd).unwrap();
    let reverse = engine.graph().edge_weight(usd, btc).unwrap();
    assert_eq!(forward + reverse, 0.0);
}

#[test]
fn repeated_updates_are_idempotent() {
    let mut engine = triangle_engine();
    engine.update_price("A-B", 2.0).unwrap();
    engine.update_price("A-B", 2.0).unwrap();

    assert_eq!(engine.graph().edge_count(), 2, "weights overwritten in place");
    assert!(engine.find_arbitrage_cycle().is_none());
}

#[test]
fn persisting_cycle_is_reported_again() {
    let mut engine = triangle_engine();
    engine.update_price("A-B", 2.0).unwrap();
    engine.update_price("B-C", 3.0).unwrap();
    engine.update_price("A-C", 5.0).unwrap();

    assert!(engine.find_arbitrage_cycle().is_some());
    // SPFA state survives a detection; while the loop persists, so do the
    // reports.
    assert!(engine.find_arbitrage_cycle().is_some());
}

#[test]
fn repricing_away_the_loop_silences_detection() {
    let mut engine = triangle_engine();
    engine.update_price("A-B", 2.0).unwrap();
    engine.update_price("B-C", 3.0).unwrap();
    engine.update_price("A-C", 5.0).unwrap();
    assert!(engine.find_arbitrage_cycle().is_some());

    engine.update_price("A-C", 6.0).unwrap();
    assert!(engine.find_arbitrage_cycle().is_none());
    assert!(engine.find_arbitrage_cycle().is_none());
}

#[test]
fn every_reported_cycle_has_negative_weight_sum() {
    let mut engine = ArbitrageEngine::new(&["A-B", "B-C", "C-D", "A-D", "A-C"]);
    let ticks = [
        ("A-B", 2.0),
        ("B-C", 3.0),
        ("C-D", 0.5),
        ("A-D", 2.9),
        ("A-C", 5.9),
        ("B-C", 3.1),
        ("A-D", 3.2),
        ("C-D", 0.45),
    ];

    for (symbol, price) in ticks {
        engine.update_price(symbol, price).unwrap();
        if let Some(cycle) = engine.find_arbitrage_cycle() {
            assert!(cycle.total_weight < 0.0);
            assert!(cycle.expected_return > 1.0);
            assert_eq!(cycle.path.first(), cycle.path.last());

            let registry = engine.graph().registry();
            let weight_sum: f64 = cycle.path[..cycle.path.len() - 1]
                .iter()
                .zip(&cycle.path[1..])
                .map(|(from, to)| {
                    let u = registry.id_of(from).unwrap();
                    let v = registry.id_of(to).unwrap();
                    engine.graph().edge_weight(u, v).unwrap()
                })
                .sum();
            assert!((weight_sum - cycle.total_weight).abs() < 1e-12);
        }
    }
}
