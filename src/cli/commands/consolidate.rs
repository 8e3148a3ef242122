use std::io::{BufRead, Write};

use anyhow::{Context, Result};

use super::{CommandResult, CommandSummary, ConsolidateSummary};
use crate::{
    annotation::Annotation,
    cli::args::ConsolidateArgs,
    consolidate::{Consolidation, assign_body_ids},
    entities::EntityIndex,
    jsonl::{read_annotations, write_annotation},
};

pub fn consolidate<R: BufRead, W: Write>(
    args: &ConsolidateArgs,
    input: R,
    output: &mut W,
) -> Result<CommandResult> {
    // load the apparatus first so a bad directory fails before reading stdin
    let entities = args
        .apparatus_dir
        .as_deref()
        .map(EntityIndex::load)
        .transpose()?;

    let records: Vec<Annotation> = read_annotations(input).collect::<Result<_>>()?;
    let Consolidation {
        mut records,
        stats,
        decisions,
    } = crate::consolidate::consolidate(records, &args.options())
        .context("Failed to consolidate annotations")?;

    let body_ids = args
        .body_id_prefix
        .as_deref()
        .map(|prefix| assign_body_ids(&mut records, prefix));

    let resolved_refs = entities.as_ref().map(|index| {
        records
            .iter_mut()
            .map(|record| index.resolve_refs(record))
            .sum::<usize>()
    });

    for record in &records {
        write_annotation(output, record)?;
    }

    Ok(CommandResult {
        summary: CommandSummary::Consolidate(ConsolidateSummary {
            stats,
            resolved_refs,
            body_ids,
        }),
        notes: decisions.iter().map(ToString::to_string).collect(),
    })
}
