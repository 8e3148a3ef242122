use serde_json::{Map, Value};

use crate::error::{AnnotationError, describe};

/// Number of characters the legacy export put in front of every target URL.
pub const LEGACY_PREFIX_LEN: usize = 12;

/// How strictly target relabeling treats unexpected shapes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RelabelMode {
    /// Unexpected target shapes are left alone.
    #[default]
    Tolerant,
    /// Historical behavior: bare URLs lose their fixed-length prefix and
    /// unexpected target shapes are an error.
    Legacy,
}

impl RelabelMode {
    fn source_for(self, url: &str) -> String {
        match self {
            RelabelMode::Tolerant => url.to_string(),
            RelabelMode::Legacy => url.chars().skip(LEGACY_PREFIX_LEN).collect(),
        }
    }
}

/// A single annotation target.
#[derive(Debug, Clone, PartialEq)]
pub enum Target {
    /// A bare URL string.
    Url(String),
    /// A structured target such as `{"type": ..., "source": ..., "selector": ...}`.
    Resource(Map<String, Value>),
    /// Anything else found in a target position.
    Other(Value),
}

impl Target {
    /// Build a structured `{type, source}` target.
    pub fn resource(target_type: &str, source: impl Into<String>) -> Self {
        let mut map = Map::new();
        map.insert("type".to_string(), Value::String(target_type.to_string()));
        map.insert("source".to_string(), Value::String(source.into()));
        Target::Resource(map)
    }

    pub fn source(&self) -> Option<&str> {
        match self {
            Target::Url(url) => Some(url),
            Target::Resource(map) => map.get("source").and_then(Value::as_str),
            Target::Other(_) => None,
        }
    }

    pub fn target_type(&self) -> Option<&str> {
        match self {
            Target::Resource(map) => map.get("type").and_then(Value::as_str),
            _ => None,
        }
    }

    fn has_source(&self) -> bool {
        matches!(self, Target::Resource(map) if map.contains_key("source"))
    }

    /// Set the type of this target, turning a bare URL into a structured one.
    ///
    /// Structured targets without a `source` and other values are untouched.
    pub fn relabel(&mut self, target_type: &str, mode: RelabelMode) {
        match self {
            Target::Url(url) => {
                *self = Target::resource(target_type, mode.source_for(url));
            }
            Target::Resource(map) if map.contains_key("source") => {
                map.insert("type".to_string(), Value::String(target_type.to_string()));
            }
            _ => {}
        }
    }
}

impl From<Value> for Target {
    fn from(value: Value) -> Self {
        match value {
            Value::String(url) => Target::Url(url),
            Value::Object(map) => Target::Resource(map),
            other => Target::Other(other),
        }
    }
}

impl From<Target> for Value {
    fn from(target: Target) -> Self {
        match target {
            Target::Url(url) => Value::String(url),
            Target::Resource(map) => Value::Object(map),
            Target::Other(value) => value,
        }
    }
}

/// The `target` field of an annotation: one target or a list of them.
#[derive(Debug, Clone, PartialEq)]
pub enum TargetField {
    Many(Vec<Target>),
    One(Target),
}

impl TargetField {
    pub fn len(&self) -> usize {
        match self {
            TargetField::Many(targets) => targets.len(),
            TargetField::One(_) => 1,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Target> {
        match self {
            TargetField::Many(targets) => targets.iter(),
            TargetField::One(target) => std::slice::from_ref(target).iter(),
        }
    }

    /// The targets as a list; a single target becomes a one-element list.
    pub fn into_list(self) -> Vec<Target> {
        match self {
            TargetField::Many(targets) => targets,
            TargetField::One(target) => vec![target],
        }
    }

    /// Relabel targets to `target_type`.
    ///
    /// For a list, only the first `limit` positions are touched (all of them
    /// when `limit` is `None`). A single bare URL or structured target is
    /// replaced by a fresh `{type, source}` object.
    pub fn relabel(
        &mut self,
        target_type: &str,
        limit: Option<usize>,
        mode: RelabelMode,
    ) -> Result<(), AnnotationError> {
        match self {
            TargetField::Many(targets) => {
                let limit = limit.unwrap_or(targets.len());
                for target in targets.iter_mut().take(limit) {
                    target.relabel(target_type, mode);
                }
                Ok(())
            }
            TargetField::One(target) if target.has_source() => {
                let source = target.source().map(str::to_string);
                match source {
                    Some(source) => *target = Target::resource(target_type, source),
                    // non-string source: keep it as-is and only set the type
                    None => target.relabel(target_type, mode),
                }
                Ok(())
            }
            TargetField::One(Target::Url(url)) if mode == RelabelMode::Tolerant => {
                *self = TargetField::One(Target::resource(target_type, url.as_str()));
                Ok(())
            }
            TargetField::One(target) => match mode {
                RelabelMode::Tolerant => Ok(()),
                RelabelMode::Legacy => Err(AnnotationError::UnexpectedTarget {
                    found: describe(&Value::from(target.clone())),
                }),
            },
        }
    }
}

impl From<Value> for TargetField {
    fn from(value: Value) -> Self {
        match value {
            Value::Array(values) => {
                TargetField::Many(values.into_iter().map(Target::from).collect())
            }
            other => TargetField::One(Target::from(other)),
        }
    }
}

impl From<TargetField> for Value {
    fn from(field: TargetField) -> Self {
        match field {
            TargetField::Many(targets) => {
                Value::Array(targets.into_iter().map(Value::from).collect())
            }
            TargetField::One(target) => Value::from(target),
        }
    }
}
