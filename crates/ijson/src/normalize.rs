// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Coerce every number in a document to its float64 representation, matching
//! the JSON value model the arithmetic combinators assume.

use serde_json::Value;

pub fn normalize_numbers(value: &mut Value) {
    match value {
        Value::Number(n) => {
            if let Some(f) = n.as_f64() {
                *value = serde_json::Number::from_f64(f).map(Value::Number).unwrap_or(Value::Null);
            }
        }
        Value::Array(arr) => arr.iter_mut().for_each(normalize_numbers),
        Value::Object(map) => map.values_mut().for_each(normalize_numbers),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn coerces_nested_integers_to_floats() {
        let mut v = json!({"a": [1, 2, {"b": 3}]});
        normalize_numbers(&mut v);
        assert_eq!(v, json!({"a": [1.0, 2.0, {"b": 3.0}]}));
    }
}
