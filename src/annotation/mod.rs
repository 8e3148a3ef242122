//! Web Annotation records.
//!
//! Records are kept as insertion-ordered JSON maps so fields this crate does
//! not know about (and their order) survive untouched. Typed access goes
//! through [`Annotation`] accessors and the [`TargetField`] / [`Target`]
//! unions.

mod target;

pub use target::*;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{AnnotationError, describe};

pub const ID: &str = "id";
pub const TARGET: &str = "target";
pub const BODY: &str = "body";

/// A single Web Annotation (JSON-LD) record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Annotation(Map<String, Value>);

impl Annotation {
    pub fn new(map: Map<String, Value>) -> Self {
        Self(map)
    }

    /// Parse one JSONL line into an annotation.
    pub fn from_json_line(line: &str) -> anyhow::Result<Self> {
        let value: Value = serde_json::from_str(line)?;
        Ok(Self::try_from(value)?)
    }

    /// Serialize as a single compact JSON line (non-ASCII is kept as-is).
    pub fn to_json_line(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.0)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn as_map_mut(&mut self) -> &mut Map<String, Value> {
        &mut self.0
    }

    /// The record identifier. Records without a string `id` are blank nodes.
    pub fn id(&self) -> Option<&str> {
        self.0.get(ID).and_then(Value::as_str)
    }

    pub fn body(&self) -> Option<&Value> {
        self.0.get(BODY)
    }

    pub fn body_mut(&mut self) -> Option<&mut Value> {
        self.0.get_mut(BODY)
    }

    /// A copy of the target field, if present.
    pub fn targets(&self) -> Option<TargetField> {
        self.0.get(TARGET).cloned().map(TargetField::from)
    }

    /// Replace (or add) the target field.
    pub fn set_targets(&mut self, targets: TargetField) {
        self.0.insert(TARGET.to_string(), targets.into());
    }

    /// Edit the target field in place, keeping its position in the record.
    ///
    /// Returns `None` without calling `f` when the record has no target.
    pub fn update_targets<T>(&mut self, f: impl FnOnce(&mut TargetField) -> T) -> Option<T> {
        let slot = self.0.get_mut(TARGET)?;
        let mut field = TargetField::from(slot.take());
        let out = f(&mut field);
        *slot = field.into();
        Some(out)
    }

    /// Relabel this record's targets; a record without targets is left alone.
    pub fn relabel_targets(
        &mut self,
        target_type: &str,
        limit: Option<usize>,
        mode: RelabelMode,
    ) -> Result<(), AnnotationError> {
        self.update_targets(|targets| targets.relabel(target_type, limit, mode))
            .unwrap_or(Ok(()))
    }

    /// Whether the body mentions `term` as a key or a string value anywhere.
    pub fn body_references(&self, term: &str) -> bool {
        self.body().is_some_and(|body| references(body, term))
    }
}

impl TryFrom<Value> for Annotation {
    type Error = AnnotationError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(AnnotationError::NotAnObject {
                found: describe(&other),
            }),
        }
    }
}

impl From<Annotation> for Value {
    fn from(annotation: Annotation) -> Self {
        Value::Object(annotation.0)
    }
}

fn references(value: &Value, term: &str) -> bool {
    match value {
        Value::String(s) => s == term,
        Value::Array(values) => values.iter().any(|v| references(v, term)),
        Value::Object(map) => map
            .iter()
            .any(|(key, v)| key == term || references(v, term)),
        _ => false,
    }
}
