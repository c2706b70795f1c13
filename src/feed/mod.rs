//! Tick ingestion boundary.
//!
//! Producers (live feed or replay) push tick records onto a crossbeam
//! channel; the engine loop owns the receiving end. A reserved `"STOP"`
//! record tells the consumer to shut down.

pub mod coinbase;
pub mod replay;

use crossbeam::channel::{Receiver, Sender};

/// Reserved symbol that signals orderly shutdown on the tick channel.
pub const STOP_SYMBOL: &str = "STOP";

/// One price tick crossing the ingestion boundary.
#[derive(Debug, Clone, PartialEq)]
pub struct TickRecord {
    pub symbol: String,
    pub price: f64,
}

impl TickRecord {
    pub fn new(symbol: impl Into<String>, price: f64) -> Self {
        Self {
            symbol: symbol.into(),
            price,
        }
    }

    /// The shutdown sentinel.
    pub fn stop() -> Self {
        Self {
            symbol: STOP_SYMBOL.to_string(),
            price: 0.0,
        }
    }

    pub fn is_stop(&self) -> bool {
        self.symbol == STOP_SYMBOL
    }
}

pub type TickSender = Sender<TickRecord>;
pub type TickReceiver = Receiver<TickRecord>;
