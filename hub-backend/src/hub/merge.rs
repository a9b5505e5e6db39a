//! Recursive merge for partial hub-state updates.

use serde_json::Value;

/// Merge `patch` on top of `base`, returning a new value.
///
/// Where both sides hold a JSON object at the same key, the objects are
/// merged key-by-key. Any other pairing (scalar, array, null, or a type
/// mismatch) takes the incoming value wholesale; arrays are replaced,
/// never element-merged. Keys missing from `patch` keep their `base`
/// value, and keys unknown to the schema pass straight through.
///
/// Neither input is mutated: the result is built into a new value, so a
/// failure later in the handler can never leave a half-updated record
/// behind in the store.
pub fn deep_merge(base: &Value, patch: &Value) -> Value {
    match (base, patch) {
        (Value::Object(base_map), Value::Object(patch_map)) => {
            let mut merged = base_map.clone();
            for (key, incoming) in patch_map {
                let combined = match base_map.get(key) {
                    Some(existing) => deep_merge(existing, incoming),
                    None => incoming.clone(),
                };
                merged.insert(key.clone(), combined);
            }
            Value::Object(merged)
        }
        _ => patch.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_scalars_and_arrays_take_the_incoming_value() {
        let base = json!({"a": 1, "b": [1, 2]});
        let patch = json!({"a": 2, "b": [3]});
        assert_eq!(deep_merge(&base, &patch), json!({"a": 2, "b": [3]}));
    }

    #[test]
    fn test_nested_objects_merge_key_by_key() {
        let base = json!({"privacy": {"microphoneEnabled": true, "allowVoiceHistory": true}});
        let patch = json!({"privacy": {"microphoneEnabled": false}});
        assert_eq!(
            deep_merge(&base, &patch),
            json!({"privacy": {"microphoneEnabled": false, "allowVoiceHistory": true}})
        );
    }

    #[test]
    fn test_keys_missing_from_patch_are_untouched() {
        let base = json!({"keep": "me", "nested": {"keep": 1, "swap": 1}});
        let patch = json!({"nested": {"swap": 2}});
        assert_eq!(
            deep_merge(&base, &patch),
            json!({"keep": "me", "nested": {"keep": 1, "swap": 2}})
        );
    }

    #[test]
    fn test_null_replaces_the_existing_value() {
        let base = json!({"displayName": "Sue", "pendingItem": "milk"});
        let patch = json!({"pendingItem": null});
        assert_eq!(
            deep_merge(&base, &patch),
            json!({"displayName": "Sue", "pendingItem": null})
        );
    }

    #[test]
    fn test_type_mismatch_replaces_wholesale() {
        let base = json!({"slot": {"deep": true}});
        assert_eq!(
            deep_merge(&base, &json!({"slot": "flat"})),
            json!({"slot": "flat"})
        );
        assert_eq!(
            deep_merge(&json!({"slot": "flat"}), &json!({"slot": {"deep": false}})),
            json!({"slot": {"deep": false}})
        );
    }

    #[test]
    fn test_unknown_keys_pass_through() {
        let base = json!({"known": 1});
        let patch = json!({"futureField": {"x": 1}});
        assert_eq!(
            deep_merge(&base, &patch),
            json!({"known": 1, "futureField": {"x": 1}})
        );
    }

    #[test]
    fn test_inputs_are_not_mutated() {
        let base = json!({"a": {"b": 1}, "list": [1]});
        let patch = json!({"a": {"c": 2}, "list": [2]});
        let base_before = base.clone();
        let patch_before = patch.clone();

        let merged = deep_merge(&base, &patch);

        assert_eq!(base, base_before);
        assert_eq!(patch, patch_before);
        assert_eq!(merged, json!({"a": {"b": 1, "c": 2}, "list": [2]}));
    }
}
