//! Attach scan images to page annotations.
//!
//! Page annotations carry the scan as `body.image.url`. A metadata file maps
//! those scans to a IIIF image service and a IIIF manifest; matched pages get
//! a `Canvas` target (the manifest) and an `Image` target (a full-size image
//! request) appended.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::annotation::{Annotation, Target, TargetField};
use crate::error::MetadataError;

pub const PAGE_TYPE: &str = "Page";
pub const CANVAS_TYPE: &str = "Canvas";
pub const IMAGE_TYPE: &str = "Image";

/// IIIF image request path for the whole image at full size.
const FULL_IMAGE_REQUEST: &str = "full/max/0/default.jpg";

/// Scan lookup tables, keyed by page identifier or image URL.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanMetadata {
    pub iiif_base_url_per_page: Map<String, Value>,
    pub manifest_url_per_page: Map<String, Value>,
}

/// The shape of the metadata file before validation.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawMetadata {
    iiif_base_url_per_page: Option<Value>,
    manifest_url_per_page: Option<Value>,
}

impl ScanMetadata {
    /// Read the metadata file.
    ///
    /// Fails with [`MetadataError::MissingKeys`] when either lookup table is
    /// absent or not an object.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read metadata file: {}", path.display()))?;
        let raw: RawMetadata = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse metadata file: {}", path.display()))?;

        match (raw.iiif_base_url_per_page, raw.manifest_url_per_page) {
            (Some(Value::Object(iiif_base)), Some(Value::Object(manifest))) => Ok(Self {
                iiif_base_url_per_page: iiif_base,
                manifest_url_per_page: manifest,
            }),
            _ => Err(MetadataError::MissingKeys {
                path: path.to_path_buf(),
            }
            .into()),
        }
    }

    /// Find the IIIF base URL and manifest URL for an image URL.
    ///
    /// Tries the URL itself, the URL without its extension, then its file
    /// name. The first variant present in both tables wins.
    pub fn lookup(&self, image_url: &str) -> Option<ScanUrls<'_>> {
        key_variants(image_url).into_iter().find_map(|key| {
            let base = self.iiif_base_url_per_page.get(key)?.as_str()?;
            let manifest = self.manifest_url_per_page.get(key)?.as_str()?;
            Some(ScanUrls {
                iiif_base_url: base,
                manifest_url: manifest,
            })
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanUrls<'a> {
    pub iiif_base_url: &'a str,
    pub manifest_url: &'a str,
}

impl ScanUrls<'_> {
    pub fn image_request_url(&self) -> String {
        format!("{}/{}", self.iiif_base_url, FULL_IMAGE_REQUEST)
    }

    fn targets(&self) -> [Target; 2] {
        [
            Target::resource(CANVAS_TYPE, self.manifest_url),
            Target::resource(IMAGE_TYPE, self.image_request_url()),
        ]
    }
}

/// Lookup keys for an image URL, most specific first.
pub fn key_variants(url: &str) -> Vec<&str> {
    let mut variants = vec![url];
    if let Some((stem, _ext)) = url.rsplit_once('.') {
        if !stem.is_empty() {
            variants.push(stem);
        }
    }
    let basename = url.rsplit_once('/').map_or(url, |(_, name)| name);
    variants.push(basename);
    variants
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanOptions {
    /// Remove `body.image` once its scan has been turned into targets.
    pub delete_image: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanOutcome {
    /// Not a page annotation.
    NotPage,
    /// A page without a known scan.
    Unmatched,
    /// A page that received scan targets.
    Added,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanStats {
    pub pages: usize,
    pub found: usize,
}

impl ScanStats {
    pub fn record(&mut self, outcome: ScanOutcome) {
        match outcome {
            ScanOutcome::NotPage => {}
            ScanOutcome::Unmatched => self.pages += 1,
            ScanOutcome::Added => {
                self.pages += 1;
                self.found += 1;
            }
        }
    }
}

/// Append scan targets to a page annotation.
pub fn augment(
    record: &mut Annotation,
    metadata: &ScanMetadata,
    options: &ScanOptions,
) -> ScanOutcome {
    let Some(Value::Object(body)) = record.body() else {
        return ScanOutcome::NotPage;
    };
    if body.get("type").and_then(Value::as_str) != Some(PAGE_TYPE) {
        return ScanOutcome::NotPage;
    }
    let Some(image_url) = body
        .get("image")
        .and_then(|image| image.get("url"))
        .and_then(Value::as_str)
    else {
        return ScanOutcome::Unmatched;
    };
    let Some(urls) = metadata.lookup(image_url) else {
        return ScanOutcome::Unmatched;
    };
    let new_targets = urls.targets();

    let mut targets = record
        .targets()
        .map(TargetField::into_list)
        .unwrap_or_default();
    targets.extend(new_targets);
    record.set_targets(TargetField::Many(targets));

    if options.delete_image {
        if let Some(Value::Object(body)) = record.body_mut() {
            body.remove("image");
        }
    }
    ScanOutcome::Added
}
