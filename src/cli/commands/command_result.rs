use crate::consolidate::ConsolidateStats;
use crate::scans::ScanStats;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandSummary {
    Consolidate(ConsolidateSummary),
    AddScans(ScanStats),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsolidateSummary {
    pub stats: ConsolidateStats,
    /// Entity references resolved; `None` when no apparatus directory was given.
    pub resolved_refs: Option<usize>,
    /// Body ids assigned; `None` when no body id prefix was given.
    pub body_ids: Option<usize>,
}

/// Result of running an annotool command
#[derive(Debug)]
pub struct CommandResult {
    pub summary: CommandSummary,
    /// Per-record notes, printed in verbose mode.
    pub notes: Vec<String>,
}
