//! Recursive merge of configuration mappings.
//!
//! Semantics follow the classic "merge array" used by Yii config files:
//! - Mappings merge recursively: overlay keys override base keys
//! - Sequences extend: overlay entries are appended, never replaced by position
//! - Index keys ("0", "1", ...) inside a mapping are appended under the next free index
//! - A sequence meeting a mapping is read as an index-keyed mapping and merged
//! - Everything else is replaced by the overlay value, including type changes
//!
//! Key order is deterministic: base keys keep their position, overlay-only
//! keys follow in overlay order.

use serde_json::{Map, Value};

/// An ordered configuration mapping (one source or one bundle).
pub type ConfigMap = Map<String, Value>;

/// Merge `overlay` into a copy of `base`. Neither input is modified.
///
/// # Examples
/// ```
/// use serde_json::json;
/// use yii_environment::merge::{deep_merge, ConfigMap};
///
/// let base: ConfigMap = serde_json::from_value(json!({"a": {"x": 1}, "list": [1, 2]})).unwrap();
/// let overlay: ConfigMap = serde_json::from_value(json!({"a": {"y": 2}, "list": [3]})).unwrap();
/// let merged = deep_merge(&base, &overlay);
/// assert_eq!(
///     serde_json::Value::Object(merged),
///     json!({"a": {"x": 1, "y": 2}, "list": [1, 2, 3]})
/// );
/// ```
pub fn deep_merge(base: &ConfigMap, overlay: &ConfigMap) -> ConfigMap {
    let mut merged = base.clone();

    for (key, overlay_value) in overlay {
        if is_index_key(key) {
            let slot = next_index(&merged).map_or_else(
                || {
                    tracing::warn!(key = %key, "No free index left to append under, overwriting");
                    key.clone()
                },
                |next| next.to_string(),
            );
            merged.insert(slot, overlay_value.clone());
            continue;
        }

        let value = match (merged.get(key), overlay_value) {
            (Some(Value::Object(base_map)), Value::Object(overlay_map)) => {
                Value::Object(deep_merge(base_map, overlay_map))
            }
            (Some(Value::Array(base_seq)), Value::Array(overlay_seq)) => {
                Value::Array(base_seq.iter().chain(overlay_seq).cloned().collect())
            }
            (Some(Value::Object(base_map)), Value::Array(overlay_seq)) => {
                Value::Object(deep_merge(base_map, &indexed(overlay_seq)))
            }
            (Some(Value::Array(base_seq)), Value::Object(overlay_map)) => {
                Value::Object(deep_merge(&indexed(base_seq), overlay_map))
            }
            _ => overlay_value.clone(),
        };
        merged.insert(key.clone(), value);
    }

    merged
}

/// Merge layers in order (first is the base, last has highest precedence).
pub fn merge_layers<I>(layers: I) -> ConfigMap
where
    I: IntoIterator<Item = ConfigMap>,
{
    layers
        .into_iter()
        .fold(ConfigMap::new(), |acc, layer| deep_merge(&acc, &layer))
}

/// Whether a mapping key is a plain sequence index rather than a name.
///
/// Only canonical decimal integers qualify: `"0"` and `"12"` do, `"012"`,
/// `"-1"` and `"1.5"` do not.
pub fn is_index_key(key: &str) -> bool {
    index_of(key).is_some()
}

fn index_of(key: &str) -> Option<u64> {
    let canonical = !key.is_empty()
        && key.bytes().all(|b| b.is_ascii_digit())
        && (key == "0" || !key.starts_with('0'));
    if canonical { key.parse().ok() } else { None }
}

/// One past the largest index key, or `None` once `u64::MAX` is taken.
fn next_index(map: &ConfigMap) -> Option<u64> {
    map.keys()
        .filter_map(|k| index_of(k))
        .max()
        .map_or(Some(0), |highest| highest.checked_add(1))
}

fn indexed(seq: &[Value]) -> ConfigMap {
    seq.iter()
        .enumerate()
        .map(|(index, value)| (index.to_string(), value.clone()))
        .collect()
}
