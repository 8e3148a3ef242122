use std::process::ExitCode;

use crate::error::MetadataError;

/// Exit status of the annotool binary.
///
/// - `Success` (0): All input was processed
/// - `Failure` (1): Processing aborted (malformed input, unreadable files, ...)
/// - `ConfigError` (2): The metadata file lacks the required lookup tables
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ExitStatus {
    /// All input was processed.
    Success,
    /// Processing aborted.
    Failure,
    /// The metadata file lacks the required lookup tables.
    ConfigError,
}

impl ExitStatus {
    /// Pick the exit status for an error that aborted a command.
    pub fn from_error(err: &anyhow::Error) -> Self {
        if err.downcast_ref::<MetadataError>().is_some() {
            ExitStatus::ConfigError
        } else {
            ExitStatus::Failure
        }
    }
}

impl From<ExitStatus> for ExitCode {
    fn from(status: ExitStatus) -> Self {
        match status {
            ExitStatus::Success => ExitCode::from(0),
            ExitStatus::Failure => ExitCode::from(1),
            ExitStatus::ConfigError => ExitCode::from(2),
        }
    }
}
