// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Order-insensitive-for-maps equality, since object key order is not
//! guaranteed to be preserved across `to_string`/`from_str` round-trips.

use serde_json::Value;

pub fn deep_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Null, Value::Null) => true,
        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::Number(x), Value::Number(y)) => x.as_f64() == y.as_f64(),
        (Value::String(x), Value::String(y)) => x == y,
        (Value::Array(x), Value::Array(y)) => x.len() == y.len() && x.iter().zip(y).all(|(a, b)| deep_eq(a, b)),
        (Value::Object(x), Value::Object(y)) => {
            x.len() == y.len() && x.iter().all(|(k, v)| y.get(k).is_some_and(|v2| deep_eq(v, v2)))
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn equal_regardless_of_key_order() {
        let a = json!({"a": 1, "b": 2});
        let b = json!({"b": 2, "a": 1});
        assert!(deep_eq(&a, &b));
    }

    #[test]
    fn equal_regardless_of_int_vs_float_number_representation() {
        assert!(deep_eq(&json!(3), &json!(3.0)));
    }

    #[test]
    fn arrays_are_order_sensitive() {
        assert!(!deep_eq(&json!([1, 2]), &json!([2, 1])));
    }
}
