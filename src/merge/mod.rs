//! Reverse-merge engine for JSON settings trees.
//!
//! The merge direction here is the opposite of the usual "incoming overwrites
//! existing" convention: the pre-existing **target** tree always wins on
//! conflict, and the incoming **source** template only fills gaps. This is
//! what makes repeated installs idempotent and safe for files that carry
//! irreplaceable user configuration.
//!
//! # Merge Rules
//!
//! Applied key-by-key over the union of both trees' keys:
//!
//! 1. Both values are arrays: target's elements followed by every source
//!    element not already present (exact equality), preserving the source's
//!    relative order among the appended elements. A set union with
//!    target-first ordering, not a concatenation.
//! 2. Both values are objects: recurse.
//! 3. Target has a defined, non-null value: keep it unchanged.
//! 4. Target is missing or null: take the source's value.
//!
//! Type mismatches (say, a target scalar against a source object) fall through
//! to rules 3/4 on the target's definedness. The function never mutates either
//! input and has no failure mode.

use serde_json::{Map, Value};

/// Merge `source` into `target` with target-priority semantics.
///
/// Returns a new tree; neither input is mutated or aliased by the result.
/// A `null` input stands for an absent tree: if both are null the result is
/// an empty object, if one is null the result is a copy of the other.
///
/// The operation is idempotent: `reverse_merge(&reverse_merge(t, s), s)`
/// equals `reverse_merge(t, s)` for any pair of trees.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use skillstack::merge::reverse_merge;
///
/// let target = json!({"env": {"X": "user"}, "extra": true});
/// let source = json!({"env": {"X": "template", "Y": "2"}});
/// assert_eq!(
///     reverse_merge(&target, &source),
///     json!({"env": {"X": "user", "Y": "2"}, "extra": true})
/// );
/// ```
#[must_use]
pub fn reverse_merge(target: &Value, source: &Value) -> Value {
    match (target, source) {
        (Value::Null, Value::Null) => Value::Object(Map::new()),
        _ => merge_value(target, source),
    }
}

/// Per-key merge of two values, applying the rules in module order.
fn merge_value(target: &Value, source: &Value) -> Value {
    match (target, source) {
        (Value::Array(t), Value::Array(s)) => Value::Array(union_arrays(t, s)),
        (Value::Object(t), Value::Object(s)) => Value::Object(merge_objects(t, s)),
        // Target missing or null: the source value (whatever its type) wins.
        (Value::Null, s) => s.clone(),
        // Defined target wins, including on type mismatch.
        (t, _) => t.clone(),
    }
}

/// Union of both objects' keys, target entries first in their own order,
/// then source-only keys in source order.
fn merge_objects(target: &Map<String, Value>, source: &Map<String, Value>) -> Map<String, Value> {
    let mut merged = Map::with_capacity(target.len() + source.len());
    for (key, target_value) in target {
        match source.get(key) {
            Some(source_value) => {
                merged.insert(key.clone(), merge_value(target_value, source_value));
            }
            None => {
                merged.insert(key.clone(), target_value.clone());
            }
        }
    }
    for (key, source_value) in source {
        if !target.contains_key(key) {
            merged.insert(key.clone(), source_value.clone());
        }
    }
    merged
}

/// Set union with target-first ordering and exact-equality dedup.
fn union_arrays(target: &[Value], source: &[Value]) -> Vec<Value> {
    let mut merged = target.to_vec();
    for item in source {
        if !merged.contains(item) {
            merged.push(item.clone());
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_both_null_yields_empty_object() {
        assert_eq!(reverse_merge(&Value::Null, &Value::Null), json!({}));
    }

    #[test]
    fn test_null_target_takes_source() {
        assert_eq!(reverse_merge(&Value::Null, &json!({"x": 1})), json!({"x": 1}));
    }

    #[test]
    fn test_null_source_keeps_target() {
        assert_eq!(reverse_merge(&json!({"x": 1}), &Value::Null), json!({"x": 1}));
    }

    #[test]
    fn test_target_scalar_wins() {
        let target = json!({"a": "user", "b": 2});
        let source = json!({"a": "template", "b": 99});
        assert_eq!(reverse_merge(&target, &source), target);
    }

    #[test]
    fn test_gap_filling() {
        let merged = reverse_merge(&json!({}), &json!({"a": 1, "b": {"c": 2}}));
        assert_eq!(merged, json!({"a": 1, "b": {"c": 2}}));
    }

    #[test]
    fn test_null_valued_key_is_treated_as_missing() {
        let merged = reverse_merge(&json!({"a": null}), &json!({"a": 1}));
        assert_eq!(merged, json!({"a": 1}));
    }

    #[test]
    fn test_array_union_target_first() {
        let merged = reverse_merge(&json!({"a": [1, 2]}), &json!({"a": [2, 3]}));
        assert_eq!(merged, json!({"a": [1, 2, 3]}));
    }

    #[test]
    fn test_array_union_preserves_source_order_of_appended() {
        let merged = reverse_merge(&json!({"a": ["x"]}), &json!({"a": ["c", "x", "a", "b"]}));
        assert_eq!(merged, json!({"a": ["x", "c", "a", "b"]}));
    }

    #[test]
    fn test_nested_object_recursion() {
        let target = json!({"env": {"X": "user"}, "extra": true});
        let source = json!({"env": {"X": "template", "Y": "2"}});
        assert_eq!(
            reverse_merge(&target, &source),
            json!({"env": {"X": "user", "Y": "2"}, "extra": true})
        );
    }

    #[test]
    fn test_type_mismatch_target_wins() {
        // Target scalar vs source object
        let merged = reverse_merge(&json!({"a": 1}), &json!({"a": {"b": 2}}));
        assert_eq!(merged, json!({"a": 1}));
        // Target array vs source scalar
        let merged = reverse_merge(&json!({"a": [1]}), &json!({"a": "s"}));
        assert_eq!(merged, json!({"a": [1]}));
    }

    #[test]
    fn test_type_mismatch_null_target_takes_source_as_is() {
        let merged = reverse_merge(&json!({"a": null}), &json!({"a": [1, 2]}));
        assert_eq!(merged, json!({"a": [1, 2]}));
    }

    #[test]
    fn test_inputs_are_not_mutated() {
        let target = json!({"a": [1], "b": {"c": 1}});
        let source = json!({"a": [2], "b": {"d": 2}, "e": 3});
        let target_snapshot = target.clone();
        let source_snapshot = source.clone();
        let _ = reverse_merge(&target, &source);
        assert_eq!(target, target_snapshot);
        assert_eq!(source, source_snapshot);
    }

    #[test]
    fn test_idempotence() {
        let cases = [
            (json!({"a": [1, 2], "b": {"c": 1}}), json!({"a": [2, 3], "b": {"d": 2}})),
            (json!({}), json!({"a": 1})),
            (Value::Null, json!({"x": [1, {"y": 2}]})),
            (json!({"s": "keep"}), json!({"s": "drop", "n": null})),
        ];
        for (target, source) in cases {
            let once = reverse_merge(&target, &source);
            let twice = reverse_merge(&once, &source);
            assert_eq!(once, twice, "merge not idempotent for {target} / {source}");
        }
    }

    #[test]
    fn test_result_does_not_alias_source() {
        let target = json!({});
        let source = json!({"a": {"b": [1]}});
        let mut merged = reverse_merge(&target, &source);
        merged["a"]["b"][0] = json!(99);
        assert_eq!(source, json!({"a": {"b": [1]}}));
    }

    #[test]
    fn test_key_order_target_then_new_source_keys() {
        let target = json!({"z": 1, "a": 2});
        let source = json!({"m": 3, "a": 4, "b": 5});
        let merged = reverse_merge(&target, &source);
        let keys: Vec<&String> = merged.as_object().unwrap().keys().collect();
        assert_eq!(keys, ["z", "a", "m", "b"]);
    }
}
