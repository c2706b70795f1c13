//! Replays a captured tick file through the engine channel.
//!
//! The input is the capture format written by the live feed:
//! `timestamp, symbol, price, quantity` rows under a header line.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::time::Duration;

use eyre::{Result, WrapErr};
use tracing::{info, warn};

use super::{TickRecord, TickSender};

/// Parse one capture row. Returns `None` for the header and for rows that
/// do not carry a usable symbol and price.
fn parse_row(line: &str) -> Option<TickRecord> {
    let mut fields = line.split(',').map(str::trim);
    let first = fields.next()?;
    if first.is_empty() || first == "timestamp" {
        return None;
    }
    let symbol = fields.next()?;
    if symbol.is_empty() {
        return None;
    }
    let price: f64 = fields.next()?.parse().ok()?;
    Some(TickRecord::new(symbol, price))
}

/// Stream every row of `path` onto the channel, then send the stop sentinel.
///
/// Bad rows are logged and skipped, matching the tolerant loop that produced
/// the capture. Returns the number of ticks sent.
pub fn stream_file(path: &Path, tx: &TickSender, pace: Option<Duration>) -> Result<u64> {
    let file = File::open(path)
        .wrap_err_with(|| format!("opening tick capture {}", path.display()))?;
    let reader = BufReader::new(file);
    let mut sent = 0u64;

    for (line_no, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        match parse_row(&line) {
            Some(tick) if tick.is_stop() => break,
            Some(tick) => {
                tx.send(tick)?;
                sent += 1;
                if let Some(pause) = pace {
                    std::thread::sleep(pause);
                }
            }
            None if line_no == 0 => {} // header
            None => {
                warn!(line_no, "skipping unparseable capture row");
            }
        }
    }

    info!(sent, "replay finished, sending stop sentinel");
    tx.send(TickRecord::stop())?;
    Ok(sent)
}
