// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Free-form `meta` map carried by every stored object, and its merge rule.

use indexmap::IndexMap;
use serde_json::Value;

/// `meta` is insertion-ordered so that round-tripping through the object
/// store doesn't reshuffle keys a UI might render in a stable order.
pub type Meta = IndexMap<String, Value>;

/// Merge patch `patch` into `current`, following the rule in the object
/// store's meta-map merge contract:
///
/// 1. For each key `K` in `patch` ending in `:*` with value `true`: remove
///    `K` (without the `:*`) and every key starting with `K:` from `current`.
/// 2. For each remaining key in `patch`: if the value is `null`, delete it
///    from `current`; otherwise assign it.
///
/// `merge_special`, when `true`, disables step 1 entirely (the wildcard
/// clear semantics) for the caller's patch — used by call sites (e.g. a
/// `display:` key setter) that want plain last-write-wins assignment instead
/// of the prefix-clearing behavior. See the open question on `mergeSpecial`
/// in the design notes: this crate treats it as "disable wildcard merge",
/// the more conservative of the two documented interpretations, and callers
/// that want the other interpretation (bypass `display:` special-casing only)
/// can pre-filter their patch before calling this function.
pub fn merge_meta(current: &mut Meta, patch: &Meta, merge_special: bool) {
    if !merge_special {
        for key in patch.keys() {
            if let Some(prefix) = key.strip_suffix(":*") {
                if patch.get(key) != Some(&Value::Bool(true)) {
                    continue;
                }
                current.shift_remove(prefix);
                let dot_prefix = format!("{prefix}:");
                current.retain(|k, _| !k.starts_with(&dot_prefix));
            }
        }
    }

    for (key, value) in patch {
        if key.ends_with(":*") {
            continue;
        }
        if value.is_null() {
            current.shift_remove(key);
        } else {
            current.insert(key.clone(), value.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn meta(pairs: &[(&str, Value)]) -> Meta {
        pairs.iter().map(|(k, v)| (k.to_string(), v.clone())).collect()
    }

    #[test]
    fn null_value_deletes_key() {
        let mut current = meta(&[("cmd", json!("ls"))]);
        let patch = meta(&[("cmd", Value::Null)]);
        merge_meta(&mut current, &patch, false);
        assert!(current.is_empty());
    }

    #[test]
    fn wildcard_clears_prefix_group() {
        let mut current = meta(&[
            ("frame:border", json!("red")),
            ("frame:title", json!("x")),
            ("cmd", json!("ls")),
        ]);
        let patch = meta(&[("frame:*", json!(true)), ("frame:title", json!("y"))]);
        merge_meta(&mut current, &patch, false);
        let expected = meta(&[("cmd", json!("ls")), ("frame:title", json!("y"))]);
        assert_eq!(current, expected);
    }

    #[test]
    fn merge_special_disables_wildcard_clearing() {
        let mut current = meta(&[("frame:border", json!("red")), ("frame:title", json!("x"))]);
        let patch = meta(&[("frame:*", json!(true))]);
        merge_meta(&mut current, &patch, true);
        // With merge_special, "frame:*" is not a wildcard clear directive, and
        // since it's skipped as a non-wildcard key only when ending in ":*"
        // would normally trigger the clear, the literal key is also never
        // written as data (it's filtered the same way it is a clear marker).
        // Existing keys are therefore left untouched.
        assert_eq!(current, meta(&[("frame:border", json!("red")), ("frame:title", json!("x"))]));
    }

    #[test]
    fn merge_is_idempotent_for_a_stable_patch() {
        let mut current = meta(&[("frame:border", json!("red")), ("cmd", json!("ls"))]);
        let patch = meta(&[("frame:*", json!(true)), ("cmd", json!("ls2"))]);
        merge_meta(&mut current, &patch, false);
        let once = current.clone();
        merge_meta(&mut current, &patch, false);
        assert_eq!(current, once);
    }
}
