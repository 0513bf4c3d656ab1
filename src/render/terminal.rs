//! Terminal renderer and notifier
//!
//! Prints the progress meters and the badge tree to stdout, with colors.

use anyhow::Result;
use console::style;

use crate::format::format_compact;
use crate::models::{AggregateMap, MeterReading};
use crate::render::{Notifier, ProgressRenderer};

const METER_WIDTH: usize = 20;

/// Colored stdout rendering of meters and badges.
#[derive(Debug, Default)]
pub struct TerminalRenderer;

impl TerminalRenderer {
    pub fn new() -> Self {
        Self
    }
}

fn meter_bar(value: u64, ceiling: u64) -> String {
    let filled = if ceiling == 0 {
        0
    } else {
        (((value as f64 / ceiling as f64) * METER_WIDTH as f64) as usize).min(METER_WIDTH)
    };
    format!(
        "{}{}",
        "█".repeat(filled),
        "░".repeat(METER_WIDTH - filled)
    )
}

/// Indentation depth of a node path (one level per `/`).
fn depth_of(path: &str) -> usize {
    if path.is_empty() || path == "." {
        0
    } else {
        path.matches('/').count()
    }
}

fn display_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

impl ProgressRenderer for TerminalRenderer {
    fn render(&mut self, map: &AggregateMap, meters: &[MeterReading]) -> Result<()> {
        println!("\n{}", style("Progress").bold());
        for meter in meters {
            println!(
                "  {:<16} {} {}/{} {}",
                meter.label,
                style(meter_bar(meter.value, meter.ceiling)).cyan(),
                style(format_compact(meter.value)).bold(),
                format_compact(meter.ceiling),
                style(meter.unit).dim()
            );
        }

        println!();
        for (path, stats) in map {
            let indent = "  ".repeat(depth_of(path));
            let name = display_name(path);
            let badge = format!("{} words", format_compact(stats.word_count));
            if stats.is_chapter {
                println!("  {indent}{name}  {}", style(badge).dim());
            } else {
                println!("  {indent}{}  {}", style(name).cyan(), style(badge).dim());
            }
        }
        println!();
        Ok(())
    }
}

/// Prints crossing notifications to stdout.
#[derive(Debug, Default)]
pub struct TerminalNotifier;

impl TerminalNotifier {
    pub fn new() -> Self {
        Self
    }
}

impl Notifier for TerminalNotifier {
    fn notify(&mut self, message: &str, duration_ms: u64) {
        println!(
            "{} {} {}",
            style("[milestone]").yellow().bold(),
            message,
            style(format!("({}s)", duration_ms / 1000)).dim()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_meter_bar_proportions() {
        assert_eq!(meter_bar(0, 100), "░".repeat(METER_WIDTH));
        assert_eq!(meter_bar(100, 100), "█".repeat(METER_WIDTH));
        assert_eq!(meter_bar(50, 100).chars().filter(|c| *c == '█').count(), 10);
    }

    #[test]
    fn test_meter_bar_zero_ceiling_is_empty() {
        assert_eq!(meter_bar(42, 0), "░".repeat(METER_WIDTH));
    }

    #[test]
    fn test_depth_and_name() {
        assert_eq!(depth_of("book"), 0);
        assert_eq!(depth_of("book/part1/a.md"), 2);
        assert_eq!(display_name("book/part1/a.md"), "a.md");
        assert_eq!(display_name("book"), "book");
    }
}
