//! Live trade feed from the Coinbase WebSocket API.
//!
//! Subscribes the configured products to the `matches` channel and forwards
//! every fill as a tick record. Optionally appends each tick to a CSV
//! capture file that `replay` can stream back later.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::DateTime;
use eyre::Result;
use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::{debug, info, warn};

use super::{TickRecord, TickSender};

/// Public Coinbase market-data endpoint.
pub const COINBASE_WS_URL: &str = "wss://ws-feed.exchange.coinbase.com";

/// Fill event from the `matches` channel. Numeric fields arrive as strings.
#[derive(Debug, Deserialize)]
struct MatchEvent {
    #[serde(rename = "type")]
    kind: String,
    product_id: String,
    price: String,
    size: String,
    time: String,
}

/// Appends live ticks to the capture CSV, creating it with a header first.
struct TickCapture {
    path: PathBuf,
}

impl TickCapture {
    fn new(path: PathBuf) -> Result<Self> {
        if !path.exists() {
            let mut file = OpenOptions::new().create(true).write(true).open(&path)?;
            writeln!(file, "timestamp,symbol,price,quantity")?;
        }
        Ok(Self { path })
    }

    fn append(&self, event: &MatchEvent) {
        match OpenOptions::new().append(true).open(&self.path) {
            Ok(mut file) => {
                let _ = writeln!(
                    file,
                    "{}, {}, {}, {}",
                    capture_timestamp(&event.time),
                    event.product_id,
                    event.price,
                    event.size
                );
            }
            Err(e) => {
                eprintln!("Failed to write capture: {}", e);
            }
        }
    }
}

/// Rewrite the exchange's RFC 3339 time into the capture row form,
/// space-separated with an explicit offset. Unparseable times pass through
/// untouched.
fn capture_timestamp(raw: &str) -> String {
    match DateTime::parse_from_rfc3339(raw) {
        Ok(time) => time.format("%Y-%m-%d %H:%M:%S%.6f%:z").to_string(),
        Err(_) => raw.to_string(),
    }
}

/// Stream match events for `product_ids` onto the channel until the socket
/// closes, then send the stop sentinel. Returns the number of ticks sent.
pub async fn stream_matches(
    ws_url: &str,
    product_ids: &[String],
    tx: TickSender,
    capture_path: Option<&Path>,
) -> Result<u64> {
    let capture = match capture_path {
        Some(path) => Some(TickCapture::new(path.to_path_buf())?),
        None => None,
    };

    let (ws_stream, _) = connect_async(ws_url).await?;
    let (mut write, mut read) = ws_stream.split();

    let subscribe_msg = serde_json::json!({
        "type": "subscribe",
        "product_ids": product_ids,
        "channels": ["matches"],
    });
    write.send(Message::Text(subscribe_msg.to_string())).await?;
    info!(url = ws_url, products = product_ids.len(), "subscribed to matches feed");

    let mut sent = 0u64;
    while let Some(message) = read.next().await {
        match message {
            Ok(Message::Text(text)) => {
                // Subscription acks and heartbeats also land here and fail
                // to parse as match events.
                let Ok(event) = serde_json::from_str::<MatchEvent>(&text) else {
                    debug!("ignoring non-match frame");
                    continue;
                };
                if event.kind != "match" && event.kind != "last_match" {
                    continue;
                }
                let Ok(price) = event.price.parse::<f64>() else {
                    warn!(product = %event.product_id, raw = %event.price, "unparseable price in match event");
                    continue;
                };

                if let Some(capture) = &capture {
                    capture.append(&event);
                }
                debug!(product = %event.product_id, price, size = %event.size, "match");
                tx.send(TickRecord::new(event.product_id.as_str(), price))?;
                sent += 1;
            }
            Ok(Message::Ping(data)) => {
                write.send(Message::Pong(data)).await?;
            }
            Ok(Message::Close(_)) => {
                info!("feed closed by server");
                break;
            }
            Ok(_) => {}
            Err(e) => {
                warn!("websocket error: {e}");
                break;
            }
        }
    }

    info!(sent, "live feed finished, sending stop sentinel");
    tx.send(TickRecord::stop())?;
    Ok(sent)
}
