//! Path-addressed lookup into a configuration mapping.
//!
//! Paths handed to [`lookup`] are ordered from the innermost key to the
//! outermost one. Traversal code builds paths outer-to-inner and reverses
//! them right before the lookup.

use crate::error::{EnvironmentError, Result};
use crate::merge::ConfigMap;
use serde_json::Value;
use std::fmt;

/// One step of a path: a named mapping key or a sequence position.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

impl From<&str> for PathSegment {
    fn from(key: &str) -> Self {
        Self::Key(key.to_string())
    }
}

impl From<String> for PathSegment {
    fn from(key: String) -> Self {
        Self::Key(key)
    }
}

impl From<usize> for PathSegment {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key(key) => f.write_str(key),
            Self::Index(index) => write!(f, "{index}"),
        }
    }
}

/// Walk `mapping` along `path` (innermost key first) and return the value found.
///
/// The last element of `path` is consumed first. Every step descends one
/// level; the final remaining key indexes the value directly.
pub fn lookup<'a>(mapping: &'a ConfigMap, path: &[PathSegment]) -> Result<&'a Value> {
    let Some((outermost, rest)) = path.split_last() else {
        return Err(not_found(path));
    };

    let mut current = mapping.get(&outermost.to_string());
    for segment in rest.iter().rev() {
        current = current.and_then(|value| step(value, segment));
    }

    current.ok_or_else(|| not_found(path))
}

fn step<'a>(value: &'a Value, segment: &PathSegment) -> Option<&'a Value> {
    match (value, segment) {
        (Value::Object(map), segment) => map.get(&segment.to_string()),
        (Value::Array(seq), PathSegment::Index(index)) => seq.get(*index),
        (Value::Array(seq), PathSegment::Key(key)) => {
            key.parse::<usize>().ok().and_then(|index| seq.get(index))
        }
        _ => None,
    }
}

/// Render a reversed path in reading order, e.g. `db.host`.
pub(crate) fn display_reversed(path: &[PathSegment]) -> String {
    path.iter()
        .rev()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(".")
}

fn not_found(path: &[PathSegment]) -> EnvironmentError {
    EnvironmentError::PathNotFound {
        path: display_reversed(path),
    }
}
