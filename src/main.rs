use std::time::Instant;

use crossbeam::channel;
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

use spot_arb_mvp::config::{Config, FeedMode};
use spot_arb_mvp::feed::{coinbase, replay, TickReceiver, TickRecord};
use spot_arb_mvp::graph::ArbitrageEngine;
use spot_arb_mvp::report::{self, CycleReport, ReportLogger};

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("spot_arb_mvp=info".parse()?),
        )
        .init();

    println!();
    println!("==================================================");
    println!("   SPOT ARBITRAGE CYCLE DETECTOR");
    println!("   MVP Version 0.2.0 - Incremental SPFA Engine");
    println!("==================================================");
    println!();

    let config = Config::from_env();
    config.log_config();

    let engine = ArbitrageEngine::new(&config.product_ids);
    info!(
        currencies = engine.graph().vertex_count(),
        products = config.product_ids.len(),
        "engine ready"
    );

    let (tx, rx) = channel::unbounded();

    match config.feed.clone() {
        FeedMode::Replay(path) => {
            let pace = config.replay_pace;
            std::thread::spawn(move || {
                if let Err(e) = replay::stream_file(&path, &tx, pace) {
                    error!("replay feed failed: {e}");
                    let _ = tx.send(TickRecord::stop());
                }
            });
        }
        FeedMode::Live => {
            let ws_url = config.ws_url.clone();
            let product_ids = config.product_ids.clone();
            let capture = config.capture_file.clone();
            tokio::spawn(async move {
                let result =
                    coinbase::stream_matches(&ws_url, &product_ids, tx.clone(), capture.as_deref())
                        .await;
                if let Err(e) = result {
                    error!("live feed failed: {e}");
                    let _ = tx.send(TickRecord::stop());
                }
            });
        }
    }

    let report_file = config.report_file.clone();
    let summary = tokio::task::spawn_blocking(move || run_engine(engine, rx, &report_file)).await?;

    report::print_session_summary(summary.ticks, summary.cycles, summary.elapsed_secs);
    Ok(())
}

struct SessionSummary {
    ticks: u64,
    cycles: u64,
    elapsed_secs: u64,
}

/// Single-owner consume loop: apply each tick, then ask for a cycle.
fn run_engine(mut engine: ArbitrageEngine, rx: TickReceiver, report_file: &str) -> SessionSummary {
    let mut logger = ReportLogger::new(report_file);
    let started = Instant::now();
    let mut ticks = 0u64;

    while let Ok(tick) = rx.recv() {
        if tick.is_stop() {
            info!("stop sentinel received, shutting down");
            break;
        }

        match engine.update_price(&tick.symbol, tick.price) {
            Ok(()) => ticks += 1,
            Err(e) => {
                warn!(symbol = %tick.symbol, price = tick.price, "rejected tick: {e}");
                continue;
            }
        }

        if let Some(cycle) = engine.find_arbitrage_cycle() {
            let cycle_report = CycleReport::from_cycle(logger.next_id(), &cycle, ticks);
            logger.log_cycle(&cycle_report);
            report::print_cycle(&cycle_report);
        } else {
            debug!(tick = ticks, "no cycle");
        }
    }

    SessionSummary {
        ticks,
        cycles: logger.cycle_count(),
        elapsed_secs: started.elapsed().as_secs(),
    }
}
