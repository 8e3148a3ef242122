use std::io::{BufRead, Write};

use anyhow::Result;

use super::{CommandResult, CommandSummary};
use crate::{
    cli::args::AddScansArgs,
    jsonl::{read_annotations, write_annotation},
    scans::{ScanMetadata, ScanOutcome, ScanStats, augment},
};

/// Stream annotations through, adding scan targets to page annotations.
pub fn add_scans<R: BufRead, W: Write>(
    args: &AddScansArgs,
    input: R,
    output: &mut W,
) -> Result<CommandResult> {
    let metadata = ScanMetadata::load(&args.metadata)?;
    let options = args.options();

    let mut stats = ScanStats::default();
    let mut notes = Vec::new();
    for record in read_annotations(input) {
        let mut record = record?;
        let outcome = augment(&mut record, &metadata, &options);
        stats.record(outcome);
        if outcome == ScanOutcome::Unmatched {
            notes.push(format!(
                "no scan found for page {}",
                record.id().unwrap_or("(anonymous)")
            ));
        }
        write_annotation(output, &record)?;
    }

    Ok(CommandResult {
        summary: CommandSummary::AddScans(stats),
        notes,
    })
}
