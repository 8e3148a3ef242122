//! annotool - filters for Web Annotation JSONL exports
//!
//! A CLI tool and library that prepares Web Annotation (JSON-LD) records,
//! one per line, for upload to an annotation repository. It merges
//! annotations that were split over original and normalized text, inlines
//! entity references, and attaches IIIF scans to page annotations.
//!
//! ## Module Structure
//!
//! - `annotation`: Annotation records and their targets
//! - `cli`: Command-line interface layer
//! - `consolidate`: Merging of primary and secondary annotations
//! - `entities`: Entity dictionaries and `tei:ref` resolution
//! - `error`: Typed library errors
//! - `jsonl`: Newline-delimited JSON input and output
//! - `reporter`: Diagnostic output on stderr
//! - `scans`: IIIF scan targets for page annotations

pub mod annotation;
pub mod cli;
pub mod consolidate;
pub mod entities;
pub mod error;
pub mod jsonl;
pub mod reporter;
pub mod scans;
