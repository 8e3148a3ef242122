//! Entity dictionaries and `tei:ref` resolution.
//!
//! An apparatus directory holds `*-entity-dict.json` files, each a flat map
//! from entity key (`documentId/elementId`) to entity object. Annotation
//! bodies point at those entities with `tei:ref` strings such as
//! `doc1.xml#e5`; resolution swaps each reference for the entity itself.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, bail};
use glob::{Pattern, glob};
use serde_json::{Map, Value};

use crate::annotation::Annotation;
use crate::reporter;

pub const ENTITY_DICT_PATTERN: &str = "*-entity-dict.json";

pub const REF_KEY: &str = "tei:ref";
pub const TYPE_KEY: &str = "tei:type";

/// Marker between document and element in path-like references.
const REF_MARKER: &str = ".xml#";

/// Nesting depth at which resolution stops descending.
const MAX_DEPTH: usize = 64;

/// Entity expansions allowed per record. Shared references are expanded at
/// every occurrence, so this bounds the output of diamond-shaped graphs.
pub const MAX_EXPANSIONS: usize = 10_000;

/// Turn a path-like reference (`doc1.xml#e5`) into a dictionary key (`doc1/e5`).
pub fn ref_to_key(reference: &str) -> String {
    reference.replace(REF_MARKER, "/")
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntityIndex {
    entities: Map<String, Value>,
}

impl EntityIndex {
    /// Load every entity dictionary in `dir`.
    ///
    /// Files are read in path order; a key defined in several files keeps the
    /// entity from the last one.
    pub fn load(dir: &Path) -> Result<Self> {
        if !dir.is_dir() {
            bail!("Apparatus directory not found: {}", dir.display());
        }

        let escaped_dir = Pattern::escape(&dir.to_string_lossy());
        let pattern = Path::new(&escaped_dir).join(ENTITY_DICT_PATTERN);
        let mut paths: Vec<PathBuf> = glob(&pattern.to_string_lossy())
            .with_context(|| format!("Invalid apparatus path: {}", dir.display()))?
            .collect::<Result<_, _>>()
            .with_context(|| format!("Failed to list apparatus directory: {}", dir.display()))?;
        paths.sort();

        let mut entities = Map::new();
        for path in &paths {
            entities.extend(read_dict(path)?);
        }
        Ok(Self::from_entities(entities))
    }

    /// Build an index from an already merged dictionary.
    ///
    /// `relation.ref` references are inlined one level deep (against the
    /// dictionary as given, so inlined entities keep their own references as
    /// strings), then every `type` key is renamed to `tei:type`.
    pub fn from_entities(mut entities: Map<String, Value>) -> Self {
        let snapshot = entities.clone();
        for (key, entity) in entities.iter_mut() {
            inline_relation(key, entity, &snapshot);
        }
        for entity in entities.values_mut() {
            rename_type_keys(entity);
        }
        Self { entities }
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entities.get(key)
    }

    /// Replace every `tei:ref` string in the record with its entity.
    ///
    /// Only nested objects are searched, not array elements. Unknown
    /// references become `{"<ref>": null}`. A reference to an entity that is
    /// already being resolved higher up is left as a string, as is every
    /// reference past [`MAX_EXPANSIONS`]. Returns the number of references
    /// resolved.
    pub fn resolve_refs(&self, record: &mut Annotation) -> usize {
        let mut walk = Walk::default();
        let resolved = self.resolve_map(record.as_map_mut(), &mut walk);
        if walk.skipped > 0 {
            reporter::warn(format!(
                "more than {} entity expansions in {}, left {} reference(s) unresolved",
                MAX_EXPANSIONS,
                record.id().unwrap_or("anonymous annotation"),
                walk.skipped
            ));
        }
        resolved
    }

    fn resolve_map(&self, map: &mut Map<String, Value>, walk: &mut Walk) -> usize {
        if walk.path.len() >= MAX_DEPTH {
            reporter::warn(format!(
                "entity references nested deeper than {} levels, not resolving further",
                MAX_DEPTH
            ));
            return 0;
        }

        let mut resolved = 0;
        for (key, value) in map.iter_mut() {
            if key == REF_KEY {
                if let Some(reference) = value.as_str().map(str::to_string) {
                    resolved += self.resolve_ref(&reference, value, walk);
                    continue;
                }
            }
            if let Value::Object(inner) = value {
                resolved += self.resolve_map(inner, walk);
            }
        }
        resolved
    }

    fn resolve_ref(&self, reference: &str, slot: &mut Value, walk: &mut Walk) -> usize {
        let entity_key = ref_to_key(reference);
        if walk.path.contains(&entity_key) {
            reporter::warn(format!(
                "cyclic entity reference {} ({}), left unresolved",
                reference, entity_key
            ));
            return 0;
        }

        let Some(entity) = self.entities.get(&entity_key) else {
            reporter::warn(format!("entity not found: {} ({})", reference, entity_key));
            let mut placeholder = Map::new();
            placeholder.insert(reference.to_string(), Value::Null);
            *slot = Value::Object(placeholder);
            return 0;
        };

        if walk.expansions >= MAX_EXPANSIONS {
            walk.skipped += 1;
            return 0;
        }
        walk.expansions += 1;

        *slot = entity.clone();
        let mut resolved = 1;
        if let Value::Object(inner) = slot {
            walk.path.push(entity_key);
            resolved += self.resolve_map(inner, walk);
            walk.path.pop();
        }
        resolved
    }
}

/// Traversal state for resolving one record.
#[derive(Debug, Default)]
struct Walk {
    /// Entity keys being resolved, outermost first.
    path: Vec<String>,
    expansions: usize,
    /// References left unresolved once the expansion budget ran out.
    skipped: usize,
}

fn read_dict(path: &Path) -> Result<Map<String, Value>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read entity dictionary: {}", path.display()))?;
    let json: Value = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse entity dictionary: {}", path.display()))?;
    match json {
        Value::Object(map) => Ok(map),
        _ => bail!(
            "Entity dictionary must be a JSON object: {}",
            path.display()
        ),
    }
}

fn inline_relation(key: &str, entity: &mut Value, dict: &Map<String, Value>) {
    let Some(reference) = entity
        .get_mut("relation")
        .and_then(|relation| relation.get_mut("ref"))
    else {
        return;
    };
    let Some(target_key) = reference.as_str().map(ref_to_key) else {
        return;
    };
    match dict.get(&target_key) {
        Some(target_entity) => *reference = target_entity.clone(),
        None => reporter::warn(format!(
            "entity {} refers to unknown entity {}",
            key, target_key
        )),
    }
}

/// Rename `type` to `tei:type` everywhere, so entity fields do not clash with
/// the JSON-LD `type` keyword once embedded in an annotation.
fn rename_type_keys(value: &mut Value) {
    match value {
        Value::Object(map) => {
            if map.contains_key("type") {
                let renamed = map
                    .iter_mut()
                    .map(|(k, v)| {
                        let k = if k == "type" { TYPE_KEY.to_string() } else { k.clone() };
                        (k, v.take())
                    })
                    .collect();
                *map = renamed;
            }
            map.values_mut().for_each(rename_type_keys);
        }
        Value::Array(values) => values.iter_mut().for_each(rename_type_keys),
        _ => {}
    }
}
