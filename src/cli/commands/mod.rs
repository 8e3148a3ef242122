pub mod add_scans;
mod command_result;
pub mod consolidate;

pub use command_result::*;
