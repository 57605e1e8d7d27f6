//! Timing helper and report rendering (text table or JSON)

use std::io::Write;
use std::time::Instant;

use serde::Serialize;

use crate::error::Result;
use crate::fib::FibReport;
use crate::range_sum::RangeSumReport;

/// Run `f` once and return its result with the elapsed wall time in seconds
pub fn timed<T>(f: impl FnOnce() -> T) -> (T, f64) {
    let start = Instant::now();
    let value = f();
    (value, start.elapsed().as_secs_f64())
}

/// Serialize any report as pretty JSON followed by a newline
pub fn write_json<R: Serialize, W: Write>(report: &R, out: &mut W) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, report)?;
    writeln!(out)?;
    Ok(())
}

/// Render the Fibonacci sweep as a table
pub fn write_fib_table<W: Write>(report: &FibReport, out: &mut W) -> Result<()> {
    writeln!(out, "{:<10}{:<25}{}", "n", "LRU Cache Time (s)", "Splay Tree Time (s)")?;
    writeln!(out, "{}", "-".repeat(50))?;
    for row in &report.rows {
        writeln!(out, "{:<10}{:<25.9}{:.9}", row.n, row.lru_secs, row.splay_secs)?;
    }
    writeln!(out)?;
    writeln!(out, "lru:   {}", report.lru)?;
    writeln!(out, "splay: {} height={}", report.splay, report.splay_height)?;
    Ok(())
}

/// Render the range-sum comparison as a table
pub fn write_range_sum_table<W: Write>(report: &RangeSumReport, out: &mut W) -> Result<()> {
    writeln!(
        out,
        "array={} queries={} ranges={} updates={} capacity={} seed={}",
        report.len, report.queries, report.ranges, report.updates, report.capacity, report.seed
    )?;
    writeln!(out, "{:<10}{:<14}{:<10}{:<22}{}", "strategy", "time (s)", "speedup", "checksum", "cache")?;
    writeln!(out, "{}", "-".repeat(72))?;
    for outcome in &report.outcomes {
        let cache = match &outcome.stats {
            Some(stats) => stats.to_string(),
            None => "-".to_string(),
        };
        writeln!(
            out,
            "{:<10}{:<14.4}{:<10}{:<22}{}",
            outcome.strategy,
            outcome.secs,
            format!("{:.2}x", outcome.speedup),
            outcome.checksum,
            cache
        )?;
    }
    Ok(())
}
