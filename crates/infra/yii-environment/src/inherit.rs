//! Console-bundle inheritance.
//!
//! Any value in the console bundle that is exactly the string `"inherit"`
//! is replaced by the web bundle's value at the same path.
//!
//! ```
//! use serde_json::json;
//! use yii_environment::inherit::{resolve_inheritance, Inherit, InheritPolicy};
//! use yii_environment::merge::ConfigMap;
//!
//! let web: ConfigMap = serde_json::from_value(json!({"db": {"host": "h"}})).unwrap();
//! let console: ConfigMap = serde_json::from_value(json!({"db": {"host": Inherit}})).unwrap();
//!
//! let resolved = resolve_inheritance(&console, &web, InheritPolicy::Strict).unwrap();
//! assert_eq!(resolved["db"]["host"], "h");
//! ```

use crate::error::{EnvironmentError, Result};
use crate::merge::ConfigMap;
use crate::path::{PathSegment, display_reversed, lookup};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

/// Marker for "copy this value from the web bundle".
///
/// Serializes to the string `"inherit"`, so it can be used directly when
/// building configs in code. Detection is strict: only a JSON string equal
/// to `"inherit"` counts, never a number or boolean.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Inherit;

impl Inherit {
    pub const KEYWORD: &'static str = "inherit";

    pub fn is_inherit(value: &Value) -> bool {
        matches!(value, Value::String(s) if s == Self::KEYWORD)
    }
}

impl Serialize for Inherit {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(Self::KEYWORD)
    }
}

impl From<Inherit> for Value {
    fn from(_: Inherit) -> Self {
        Self::String(Inherit::KEYWORD.to_string())
    }
}

/// What to do when an inherited path does not exist in the web bundle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InheritPolicy {
    /// Fail the whole resolution with `PathNotFound`.
    #[default]
    Strict,

    /// Substitute `null` and log a warning.
    NullOnMissing,
}

/// Return a copy of `target` with every inherit marker replaced by the value
/// found in `companion` at the mirrored path.
pub fn resolve_inheritance(
    target: &ConfigMap,
    companion: &ConfigMap,
    policy: InheritPolicy,
) -> Result<ConfigMap> {
    let resolver = Inheritance { companion, policy };
    let mut path = Vec::new();
    resolver.map(target, &mut path)
}

struct Inheritance<'a> {
    companion: &'a ConfigMap,
    policy: InheritPolicy,
}

impl Inheritance<'_> {
    fn map(&self, map: &ConfigMap, path: &mut Vec<PathSegment>) -> Result<ConfigMap> {
        let mut resolved = ConfigMap::new();
        for (key, value) in map {
            path.push(PathSegment::Key(key.clone()));
            let value = self.entry(value, path)?;
            path.pop();
            resolved.insert(key.clone(), value);
        }
        Ok(resolved)
    }

    fn sequence(&self, seq: &[Value], path: &mut Vec<PathSegment>) -> Result<Vec<Value>> {
        let mut resolved = Vec::with_capacity(seq.len());
        for (index, value) in seq.iter().enumerate() {
            path.push(PathSegment::Index(index));
            resolved.push(self.entry(value, path)?);
            path.pop();
        }
        Ok(resolved)
    }

    // Recurse first, then test the (possibly rebuilt) value for the marker.
    fn entry(&self, value: &Value, path: &mut Vec<PathSegment>) -> Result<Value> {
        let value = match value {
            Value::Object(map) => Value::Object(self.map(map, path)?),
            Value::Array(seq) => Value::Array(self.sequence(seq, path)?),
            other => other.clone(),
        };

        if !Inherit::is_inherit(&value) {
            return Ok(value);
        }

        let reversed: Vec<PathSegment> = path.iter().rev().cloned().collect();
        match lookup(self.companion, &reversed) {
            Ok(inherited) => {
                tracing::debug!(path = %display_reversed(&reversed), "Inherited console value from web config");
                Ok(inherited.clone())
            }
            Err(EnvironmentError::PathNotFound { path })
                if self.policy == InheritPolicy::NullOnMissing =>
            {
                tracing::warn!(%path, "Inherited path missing from web config, using null");
                Ok(Value::Null)
            }
            Err(e) => Err(e),
        }
    }
}
