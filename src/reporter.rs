//! Diagnostic output on stderr.
//!
//! Standard output carries the JSONL stream, so everything meant for a human
//! (warnings, per-record notes, summaries) is written here instead.

use std::io::{self, Write};

use colored::Colorize;

/// Success mark for consistent output formatting
pub const SUCCESS_MARK: &str = "\u{2713}"; // ✓

/// Print a warning to stderr.
pub fn warn(message: impl AsRef<str>) {
    warn_to(message.as_ref(), &mut io::stderr().lock());
}

/// Print a warning to a custom writer.
pub fn warn_to<W: Write>(message: &str, writer: &mut W) {
    let _ = writeln!(writer, "{} {}", "warning:".bold().yellow(), message);
}

/// Print a verbose note.
pub fn note_to<W: Write>(message: &str, writer: &mut W) {
    let _ = writeln!(writer, "{} {}", "note:".bold().cyan(), message);
}

/// Print a summary line.
pub fn summary_to<W: Write>(message: &str, writer: &mut W) {
    let _ = writeln!(writer, "{} {}", SUCCESS_MARK.green(), message);
}
