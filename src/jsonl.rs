//! Newline-delimited JSON input and output.

use std::io::{BufRead, Write};

use anyhow::{Context, Result};

use crate::annotation::Annotation;

/// Iterate over the annotations in a JSONL stream.
///
/// Blank lines are skipped. A line that is not a JSON object is an error
/// naming its 1-based line number.
pub fn read_annotations<R: BufRead>(reader: R) -> impl Iterator<Item = Result<Annotation>> {
    reader
        .lines()
        .enumerate()
        .filter_map(|(index, line)| {
            let line_number = index + 1;
            let line = match line {
                Ok(line) => line,
                Err(err) => {
                    return Some(
                        Err(err).with_context(|| format!("Failed to read input line {}", line_number)),
                    );
                }
            };
            if line.trim().is_empty() {
                return None;
            }
            Some(
                Annotation::from_json_line(&line)
                    .with_context(|| format!("Malformed annotation on input line {}", line_number)),
            )
        })
}

/// Write one annotation per line.
pub fn write_annotation<W: Write>(writer: &mut W, annotation: &Annotation) -> Result<()> {
    let line = annotation
        .to_json_line()
        .context("Failed to serialize annotation")?;
    writeln!(writer, "{}", line).context("Failed to write output")?;
    Ok(())
}
