//! Runtime configuration loaded from environment variables.

use std::path::PathBuf;
use std::time::Duration;

use crate::feed::coinbase::COINBASE_WS_URL;

/// Default product universe, matching the capture tooling.
pub const DEFAULT_PRODUCT_IDS: [&str; 3] = ["BTC-USD", "ETH-USD", "ETH-BTC"];

/// Default JSON Lines file for cycle reports.
pub const DEFAULT_REPORT_FILE: &str = "arb_cycles.jsonl";

/// Where ticks come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedMode {
    /// Replay a capture file through the engine.
    Replay(PathBuf),
    /// Subscribe to the live Coinbase matches feed.
    Live,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub feed: FeedMode,
    /// WebSocket endpoint for the live feed.
    pub ws_url: String,
    /// Trading pairs to register and subscribe.
    pub product_ids: Vec<String>,
    /// Optional delay between replayed ticks.
    pub replay_pace: Option<Duration>,
    /// JSON Lines file for cycle reports.
    pub report_file: String,
    /// Optional CSV capture of live ticks, replayable later.
    pub capture_file: Option<PathBuf>,
}

impl Config {
    /// Read settings from the environment. `ARB_FEED_FILE` switches the
    /// process into replay mode; everything else has defaults.
    pub fn from_env() -> Self {
        let feed = match std::env::var("ARB_FEED_FILE") {
            Ok(path) if !path.is_empty() => FeedMode::Replay(PathBuf::from(path)),
            _ => FeedMode::Live,
        };

        let ws_url =
            std::env::var("ARB_WS_URL").unwrap_or_else(|_| COINBASE_WS_URL.to_string());

        let product_ids: Vec<String> = std::env::var("ARB_PRODUCTS")
            .map(|raw| {
                raw.split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_default();
        let product_ids = if product_ids.is_empty() {
            DEFAULT_PRODUCT_IDS.iter().map(|s| s.to_string()).collect()
        } else {
            product_ids
        };

        let replay_pace = std::env::var("ARB_REPLAY_PACE_MS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .filter(|&ms| ms > 0)
            .map(Duration::from_millis);

        let report_file =
            std::env::var("ARB_REPORT_FILE").unwrap_or_else(|_| DEFAULT_REPORT_FILE.to_string());

        let capture_file = std::env::var("ARB_CAPTURE_FILE")
            .ok()
            .filter(|p| !p.is_empty())
            .map(PathBuf::from);

        Self {
            feed,
            ws_url,
            product_ids,
            replay_pace,
            report_file,
            capture_file,
        }
    }

    /// Log configuration on startup for debugging
    pub fn log_config(&self) {
        println!("=== Feed Configuration ===");
        match &self.feed {
            FeedMode::Replay(path) => println!("Feed: replay {}", path.display()),
            FeedMode::Live => println!("Feed: live {}", self.ws_url),
        }
        println!("Products: {}", self.product_ids.join(", "));
        if let Some(pace) = self.replay_pace {
            println!("Replay pace: {:?}", pace);
        }
        println!("Report file: {}", self.report_file);
        if let Some(capture) = &self.capture_file {
            println!("Capture file: {}", capture.display());
        }
        println!("==========================");
    }
}
