//! Cycle report logging
//!
//! Appends every detected arbitrage cycle to a JSON Lines file and prints
//! the operator-facing console output.

use chrono::Local;
use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use crate::graph::ArbitrageCycle;

/// One detection, as it lands in the report file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CycleReport {
    pub id: u64,
    pub timestamp: String,
    pub path: Vec<String>,
    pub total_weight: f64,
    pub expected_return: f64,
    pub profit_bps: i32,
    /// How many ticks the engine had consumed when this cycle surfaced.
    pub ticks_seen: u64,
}

impl CycleReport {
    pub fn from_cycle(id: u64, cycle: &ArbitrageCycle, ticks_seen: u64) -> Self {
        Self {
            id,
            timestamp: Local::now().to_rfc3339(),
            path: cycle.path.clone(),
            total_weight: cycle.total_weight,
            expected_return: cycle.expected_return,
            profit_bps: cycle.profit_bps(),
            ticks_seen,
        }
    }
}

/// Report logger that appends one JSON line per detection
pub struct ReportLogger {
    file_path: PathBuf,
    cycle_count: u64,
}

impl ReportLogger {
    pub fn new(file_name: &str) -> Self {
        Self {
            file_path: PathBuf::from(file_name),
            cycle_count: 0,
        }
    }

    pub fn next_id(&mut self) -> u64 {
        self.cycle_count += 1;
        self.cycle_count
    }

    pub fn cycle_count(&self) -> u64 {
        self.cycle_count
    }

    /// Append a report as a JSON line
    pub fn log_cycle(&self, report: &CycleReport) {
        match OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.file_path)
        {
            Ok(file) => {
                let mut writer = BufWriter::new(file);
                if let Ok(json) = serde_json::to_string(report) {
                    let _ = writeln!(writer, "{}", json);
                }
            }
            Err(e) => {
                eprintln!("Failed to write report: {}", e);
            }
        }
    }
}

/// Print a detected cycle to the console
pub fn print_cycle(report: &CycleReport) {
    println!();
    println!("========================================");
    println!(" ARBITRAGE CYCLE #{}", report.id);
    println!("========================================");
    println!("   Path: {}", report.path.join(" -> "));
    println!("   Hops: {}", report.path.len().saturating_sub(1));
    println!("   Cycle weight: {:.6}", report.total_weight);
    println!(
        "   Return: {:.4}x ({:+} bps before fees)",
        report.expected_return, report.profit_bps
    );
    println!("   Ticks consumed: {}", report.ticks_seen);
    println!("========================================");
}

/// Print the end-of-session summary
pub fn print_session_summary(ticks: u64, cycles: u64, elapsed_secs: u64) {
    println!();
    println!("========================================");
    println!(" SESSION SUMMARY");
    println!("========================================");
    println!("   Ticks processed: {}", ticks);
    println!("   Cycles reported: {}", cycles);
    println!("   Elapsed: {}s", elapsed_secs);
    println!("========================================");
    println!();
}
