//! Incremental triangular-arbitrage detection over live spot prices.
//!
//! Currencies are vertices, every trading pair contributes a `-ln(price)`
//! edge each way, and an arbitrage opportunity is a negative cycle. The
//! engine relaxes only what recent ticks touched (SPFA) instead of
//! re-running Bellman-Ford from scratch on every update.

pub mod config;
pub mod error;
pub mod feed;
pub mod graph;
pub mod report;

pub use error::EngineError;
pub use feed::TickRecord;
pub use graph::{ArbitrageCycle, ArbitrageEngine};
