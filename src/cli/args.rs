//! CLI argument definitions using clap.
//!
//! ## Commands
//!
//! - `consolidate`: Merge secondary (normalized) annotations into their primaries
//! - `add-scans`: Add IIIF canvas and image targets to page annotations
//!
//! Both commands read JSONL on stdin and write JSONL on stdout.

use std::path::PathBuf;

use clap::{Args, CommandFactory, Parser, Subcommand};

use crate::annotation::RelabelMode;
use crate::consolidate::{
    ConsolidateOptions, DEFAULT_ID_SUFFIX, DEFAULT_NEW_TYPE, DEFAULT_ORIGINAL_TYPE,
};
use crate::scans::ScanOptions;

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Arguments {
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Arguments {
    /// Check if a command was provided, otherwise print help and return None.
    pub fn with_command_or_help(self) -> Option<Self> {
        if self.command.is_none() {
            Self::command().print_help().ok();
            None
        } else {
            Some(self)
        }
    }

    /// Get the verbose flag from the command's common args.
    pub fn verbose(&self) -> bool {
        match &self.command {
            Some(Command::Consolidate(args)) => args.common.verbose,
            Some(Command::AddScans(args)) => args.common.verbose,
            None => false,
        }
    }
}

/// Common arguments shared by all commands.
#[derive(Debug, Clone, Args)]
pub struct CommonArgs {
    /// Report what happened to each record on stderr
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Clone, Args)]
pub struct ConsolidateArgs {
    /// Target type for the normalized text, and for annotations that had no secondary
    #[arg(long, env = "ANNOTOOL_NEW_TYPE", default_value = DEFAULT_NEW_TYPE)]
    pub new_type: String,

    /// Target type for the original text of a merged annotation
    #[arg(long, env = "ANNOTOOL_ORIGINAL_TYPE", default_value = DEFAULT_ORIGINAL_TYPE)]
    pub original_type: String,

    /// ID suffix that secondary annotations carry compared to the primary ID
    #[arg(long, env = "ANNOTOOL_ID_SUFFIX", default_value = DEFAULT_ID_SUFFIX)]
    pub id_suffix: String,

    /// Directory with *-entity-dict.json files; enables tei:ref resolution
    #[arg(long, env = "ANNOTOOL_APPARATUS_DIR")]
    pub apparatus_dir: Option<PathBuf>,

    /// Assign sequential IDs with this prefix to bodies that lack one
    #[arg(long, env = "ANNOTOOL_BODY_ID_PREFIX")]
    pub body_id_prefix: Option<String>,

    /// Drop annotations without an ID instead of passing them through
    #[arg(long)]
    pub no_pass: bool,

    /// Strip the 12-character URL prefix of old exports and fail on unexpected targets
    #[arg(long)]
    pub legacy: bool,

    #[command(flatten)]
    pub common: CommonArgs,
}

impl ConsolidateArgs {
    pub fn options(&self) -> ConsolidateOptions {
        ConsolidateOptions {
            new_type: self.new_type.clone(),
            original_type: self.original_type.clone(),
            id_suffix: self.id_suffix.clone(),
            pass_unidentified: !self.no_pass,
            relabel_mode: if self.legacy {
                RelabelMode::Legacy
            } else {
                RelabelMode::Tolerant
            },
        }
    }
}

#[derive(Debug, Clone, Args)]
pub struct AddScansArgs {
    /// JSON file with 'iiifBaseUrlPerPage' and 'manifestUrlPerPage' tables
    #[arg(long, env = "ANNOTOOL_METADATA")]
    pub metadata: PathBuf,

    /// Remove the image from the body after moving it to the targets
    #[arg(long)]
    pub delete: bool,

    #[command(flatten)]
    pub common: CommonArgs,
}

impl AddScansArgs {
    pub fn options(&self) -> ScanOptions {
        ScanOptions {
            delete_image: self.delete,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Merge annotations split over original and normalized text into one annotation
    Consolidate(ConsolidateArgs),
    /// Add IIIF canvas and image targets to page annotations
    AddScans(AddScansArgs),
}
