//! Merge annotations that were split over two text variants.
//!
//! An export produces one annotation per text variant: `X` for the original
//! text and `X.normal` (the id suffix) for the normalized text. Consolidation
//! folds the secondary into the primary so the output carries a single
//! annotation whose targets point at both variants, each target typed by the
//! variant it belongs to.

use std::fmt;

use indexmap::IndexMap;
use serde_json::Value;

use crate::annotation::{Annotation, RelabelMode, Target, TargetField};
use crate::error::AnnotationError;

/// Id suffixes of translation annotations, which are never merged.
pub const TRANSLATION_ID_SUFFIXES: &[&str] = &[
    ".translation-source",
    ".translation-target",
    "-translated",
    "-translationsource",
];

/// Vocabulary term marking a translation annotation body.
pub const TRANSLATION_TERM: &str = "https://w3id.org/stam/extensions/stam-translate/Translation";

pub const DEFAULT_NEW_TYPE: &str = "NormalText";
pub const DEFAULT_ORIGINAL_TYPE: &str = "OriginalText";
pub const DEFAULT_ID_SUFFIX: &str = ".normal";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsolidateOptions {
    /// Target type for the normalized variant (and for records without a split).
    pub new_type: String,
    /// Target type for the original variant of a merged pair.
    pub original_type: String,
    /// Suffix that turns a primary id into its secondary id.
    pub id_suffix: String,
    /// Emit records without an id instead of dropping them.
    pub pass_unidentified: bool,
    pub relabel_mode: RelabelMode,
}

impl Default for ConsolidateOptions {
    fn default() -> Self {
        Self {
            new_type: DEFAULT_NEW_TYPE.to_string(),
            original_type: DEFAULT_ORIGINAL_TYPE.to_string(),
            id_suffix: DEFAULT_ID_SUFFIX.to_string(),
            pass_unidentified: true,
            relabel_mode: RelabelMode::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConsolidateStats {
    /// Primaries that had a secondary merged into them.
    pub merged: usize,
    /// Records carrying the secondary suffix (never emitted on their own).
    pub potential: usize,
    /// Records emitted without merging.
    pub passed: usize,
    /// Translation annotations and dropped blank nodes.
    pub skipped: usize,
}

/// What happened to one input record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Merged { id: String, added: usize },
    Secondary { id: String },
    Passed { id: Option<String> },
    SkippedTranslation { id: String },
    DroppedAnonymous,
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Decision::Merged { id, added } => write!(f, "merged {} (+{} targets)", id, added),
            Decision::Secondary { id } => write!(f, "{} is a secondary annotation", id),
            Decision::Passed { id: Some(id) } => write!(f, "passed {}", id),
            Decision::Passed { id: None } => write!(f, "passed anonymous annotation"),
            Decision::SkippedTranslation { id } => {
                write!(f, "skipped translation annotation {}", id)
            }
            Decision::DroppedAnonymous => write!(f, "dropped anonymous annotation"),
        }
    }
}

#[derive(Debug, Default)]
pub struct Consolidation {
    /// Emitted records: identified ones first, then anonymous ones.
    pub records: Vec<Annotation>,
    pub stats: ConsolidateStats,
    pub decisions: Vec<Decision>,
}

/// Identified records by id in first-seen order, plus the blank nodes.
#[derive(Debug, Default)]
struct Partition {
    identified: IndexMap<String, Annotation>,
    anonymous: Vec<Annotation>,
}

impl Partition {
    fn new(records: impl IntoIterator<Item = Annotation>) -> Self {
        let mut partition = Partition::default();
        for record in records {
            match record.id().map(str::to_string) {
                // a duplicate id overwrites the earlier record in place
                Some(id) => {
                    partition.identified.insert(id, record);
                }
                None => partition.anonymous.push(record),
            }
        }
        partition
    }
}

/// Whether a primary id or body marks a translation annotation.
pub fn is_translation(record: &Annotation) -> bool {
    let by_id = record
        .id()
        .is_some_and(|id| TRANSLATION_ID_SUFFIXES.iter().any(|s| id.ends_with(s)));
    by_id || record.body_references(TRANSLATION_TERM)
}

/// Consolidate a batch of annotations describing the same document.
pub fn consolidate(
    records: impl IntoIterator<Item = Annotation>,
    options: &ConsolidateOptions,
) -> Result<Consolidation, AnnotationError> {
    let partition = Partition::new(records);
    let mut out = Consolidation::default();
    let suffix = options.id_suffix.as_str();

    for (id, record) in &partition.identified {
        if id.ends_with(suffix) {
            out.stats.potential += 1;
            out.decisions.push(Decision::Secondary { id: id.clone() });
            continue;
        }

        let mut record = record.clone();
        if is_translation(&record) {
            out.stats.skipped += 1;
            out.decisions
                .push(Decision::SkippedTranslation { id: id.clone() });
            continue;
        }

        match partition.identified.get(&format!("{}{}", id, suffix)) {
            Some(secondary) => {
                let added = merge(&mut record, secondary, options)?;
                out.stats.merged += 1;
                out.decisions.push(Decision::Merged {
                    id: id.clone(),
                    added,
                });
            }
            None => {
                record.relabel_targets(&options.new_type, None, options.relabel_mode)?;
                out.stats.passed += 1;
                out.decisions.push(Decision::Passed {
                    id: Some(id.clone()),
                });
            }
        }
        out.records.push(record);
    }

    let has_split = partition.identified.keys().any(|id| id.ends_with(suffix));
    let anonymous_type = if has_split {
        &options.original_type
    } else {
        &options.new_type
    };
    for mut record in partition.anonymous {
        if !options.pass_unidentified {
            out.stats.skipped += 1;
            out.decisions.push(Decision::DroppedAnonymous);
            continue;
        }
        record.relabel_targets(anonymous_type, None, options.relabel_mode)?;
        out.stats.passed += 1;
        out.decisions.push(Decision::Passed { id: None });
        out.records.push(record);
    }

    Ok(out)
}

/// Merge the secondary's targets into the primary.
///
/// Targets already present in the primary are not duplicated. The primary's
/// own targets are typed as the original variant, the added ones as the new
/// variant. Returns the number of targets added.
pub fn merge(
    primary: &mut Annotation,
    secondary: &Annotation,
    options: &ConsolidateOptions,
) -> Result<usize, AnnotationError> {
    let mut list = primary
        .targets()
        .map(TargetField::into_list)
        .unwrap_or_default();
    let original_len = list.len();

    let mut added = 0;
    if let Some(extra) = secondary.targets() {
        for target in extra.iter() {
            if list.contains(target) {
                continue;
            }
            let mut target: Target = target.clone();
            target.relabel(&options.new_type, options.relabel_mode);
            list.push(target);
            added += 1;
        }
    }

    let mut targets = TargetField::Many(list);
    targets.relabel(
        &options.original_type,
        Some(original_len),
        options.relabel_mode,
    )?;
    primary.set_targets(targets);
    Ok(added)
}

/// Give every body without an `id` a sequential one: `prefix1`, `prefix2`, ...
///
/// Returns the number of ids assigned.
pub fn assign_body_ids(records: &mut [Annotation], prefix: &str) -> usize {
    let mut assigned = 0;
    for record in records {
        let Some(Value::Object(body)) = record.body_mut() else {
            continue;
        };
        if body.contains_key("id") {
            continue;
        }
        assigned += 1;
        body.insert(
            "id".to_string(),
            Value::String(format!("{}{}", prefix, assigned)),
        );
    }
    assigned
}
