//! Summary printing for CLI commands.
//!
//! Stdout carries the annotation stream, so every line here goes to stderr.

use std::io::{self, Write};

use super::commands::{CommandResult, CommandSummary, ConsolidateSummary};
use crate::reporter::{self, summary_to};
use crate::scans::ScanStats;

pub fn print(result: &CommandResult, verbose: bool) {
    print_to(result, verbose, &mut io::stderr().lock());
}

pub fn print_to<W: Write>(result: &CommandResult, verbose: bool, writer: &mut W) {
    if verbose {
        for note in &result.notes {
            reporter::note_to(note, writer);
        }
    }
    for line in summary_lines(&result.summary) {
        summary_to(&line, writer);
    }
}

fn summary_lines(summary: &CommandSummary) -> Vec<String> {
    match summary {
        CommandSummary::Consolidate(summary) => consolidate_lines(summary),
        CommandSummary::AddScans(stats) => vec![add_scans_line(stats)],
    }
}

fn consolidate_lines(summary: &ConsolidateSummary) -> Vec<String> {
    let stats = &summary.stats;
    let mut lines = vec![format!(
        "Consolidated {} (out of {}) annotations, passed {}, skipped {}",
        stats.merged, stats.potential, stats.passed, stats.skipped
    )];
    if let Some(count) = summary.body_ids {
        lines.push(format!("Assigned {} body {}", count, plural(count, "id", "ids")));
    }
    if let Some(count) = summary.resolved_refs {
        lines.push(format!(
            "Resolved {} entity {}",
            count,
            plural(count, "reference", "references")
        ));
    }
    lines
}

fn add_scans_line(stats: &ScanStats) -> String {
    format!("Added scans for {} of {} pages", stats.found, stats.pages)
}

fn plural<'a>(count: usize, one: &'a str, many: &'a str) -> &'a str {
    if count == 1 { one } else { many }
}
