// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Pure document-mutation functions. All operations return a new root value
//! rather than mutating the caller's tree in place.

use crate::budget::Budget;
use crate::error::IJsonError;
use crate::path::{format_path, PathSegment};
use serde_json::Value;

/// A combinator applied at the leaf when the existing value is being merged
/// with the incoming one, rather than simply replaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combine {
    ArrayAppend,
    SetUnless,
    Max,
    Min,
    Inc,
}

enum Mode {
    Set(Value),
    Combine(Value, Combine),
    Remove,
}

pub struct SetOptions {
    mode: Mode,
    force: bool,
}

impl SetOptions {
    pub fn set(value: Value) -> Self {
        Self { mode: Mode::Set(value), force: false }
    }

    pub fn remove() -> Self {
        Self { mode: Mode::Remove, force: false }
    }

    pub fn combine(value: Value, combine: Combine) -> Self {
        Self { mode: Mode::Combine(value, combine), force: false }
    }

    pub fn with_force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }
}

/// Descend `path` into `data`, returning `None` for any missing entry along
/// the way.
pub fn get_path(data: &Value, path: &[PathSegment]) -> Option<Value> {
    let mut cur = data;
    for seg in path {
        match (seg, cur) {
            (PathSegment::Key(k), Value::Object(map)) => match map.get(k) {
                Some(v) => cur = v,
                None => return None,
            },
            (PathSegment::Index(i), Value::Array(arr)) => match arr.get(*i) {
                Some(v) => cur = v,
                None => return None,
            },
            _ => return None,
        }
    }
    Some(cur.clone())
}

/// Apply `opts` at `path` within `data`, allocating intermediate containers
/// as needed and charging `budget` for each new map entry or array-growth
/// slot. Returns the new root and the budget remaining after the operation.
pub fn set_path(
    data: Option<Value>,
    path: &[PathSegment],
    opts: SetOptions,
    budget: Budget,
) -> Result<(Value, Budget), IJsonError> {
    let (result, budget) = set_rec(data, path, &opts, budget, path)?;
    Ok((result.unwrap_or(Value::Null), budget))
}

fn combine_value(existing: Option<&Value>, incoming: Value, combine: Combine, force: bool, path: &str) -> Result<Value, IJsonError> {
    match combine {
        Combine::ArrayAppend => {
            let mut arr = match existing {
                None | Some(Value::Null) => Vec::new(),
                Some(Value::Array(a)) => a.clone(),
                Some(_) if force => Vec::new(),
                Some(_) => return Err(IJsonError::SetType(path.to_string())),
            };
            arr.push(incoming);
            Ok(Value::Array(arr))
        }
        Combine::SetUnless => match existing {
            None | Some(Value::Null) => Ok(incoming),
            Some(v) => Ok(v.clone()),
        },
        Combine::Max | Combine::Min | Combine::Inc => {
            let cur = match existing {
                None | Some(Value::Null) => 0.0,
                Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
                Some(_) if force => 0.0,
                Some(_) => return Err(IJsonError::SetType(path.to_string())),
            };
            let new_f = incoming.as_f64().ok_or_else(|| IJsonError::SetType(path.to_string()))?;
            let result = match combine {
                Combine::Max => cur.max(new_f),
                Combine::Min => cur.min(new_f),
                Combine::Inc => cur + new_f,
                _ => unreachable!(),
            };
            Ok(serde_json::Number::from_f64(result).map(Value::Number).unwrap_or(Value::Null))
        }
    }
}

fn set_rec(
    current: Option<Value>,
    path: &[PathSegment],
    opts: &SetOptions,
    budget: Budget,
    full_path: &[PathSegment],
) -> Result<(Option<Value>, Budget), IJsonError> {
    let Some((seg, rest)) = path.split_first() else {
        return match &opts.mode {
            Mode::Remove => Ok((None, budget)),
            Mode::Set(v) => Ok((Some(v.clone()), budget)),
            Mode::Combine(v, c) => {
                let rendered = format_path(full_path);
                Ok((Some(combine_value(current.as_ref(), v.clone(), *c, opts.force, &rendered)?), budget))
            }
        };
    };

    match seg {
        PathSegment::Key(k) => {
            let mut map = match current {
                None | Some(Value::Null) => serde_json::Map::new(),
                Some(Value::Object(m)) => m,
                Some(_) if opts.force => serde_json::Map::new(),
                Some(_) => return Err(IJsonError::SetType(format_path(full_path))),
            };
            let existing = map.remove(k);
            let is_new = existing.is_none();
            let budget = if is_new { budget.charge(&format_path(full_path))? } else { budget };
            let (child, budget) = set_rec(existing, rest, opts, budget, full_path)?;
            match child {
                Some(v) => {
                    map.insert(k.clone(), v);
                }
                None => {}
            }
            if map.is_empty() {
                Ok((None, budget))
            } else {
                Ok((Some(Value::Object(map)), budget))
            }
        }
        PathSegment::Index(i) => {
            let mut arr = match current {
                None | Some(Value::Null) => Vec::new(),
                Some(Value::Array(a)) => a,
                Some(_) if opts.force => Vec::new(),
                Some(_) => return Err(IJsonError::SetType(format_path(full_path))),
            };
            let mut budget = budget;
            while arr.len() <= *i {
                budget = budget.charge(&format_path(full_path))?;
                arr.push(Value::Null);
            }
            let existing = std::mem::replace(&mut arr[*i], Value::Null);
            let (child, budget) = set_rec(Some(existing), rest, opts, budget, full_path)?;
            match child {
                Some(v) => arr[*i] = v,
                None => {
                    arr.remove(*i);
                }
            }
            if arr.is_empty() {
                Ok((None, budget))
            } else {
                Ok((Some(Value::Array(arr)), budget))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn set_then_get_builds_intermediate_containers() {
        let path = vec![
            PathSegment::Key("a".into()),
            PathSegment::Key("b".into()),
            PathSegment::Index(0),
            PathSegment::Key("c".into()),
        ];
        let (root, _) = set_path(None, &path, SetOptions::set(json!(42.0)), Budget::unlimited()).unwrap();
        assert_eq!(root, json!({"a": {"b": [{"c": 42.0}]}}));
        assert_eq!(get_path(&root, &path), Some(json!(42.0)));
    }

    #[test]
    fn budget_failure_on_large_array_growth() {
        let path = vec![PathSegment::Index(5000)];
        let err = set_path(None, &path, SetOptions::set(json!("x")), Budget::new(1000).unwrap()).unwrap_err();
        assert!(matches!(err, IJsonError::Budget(_)));
    }

    #[test]
    fn remove_prunes_empty_parent_containers() {
        let data = json!(["a", 2.8, true, {"c": 1.1}]);
        let path = vec![PathSegment::Index(3), PathSegment::Key("c".into())];
        let (root, _) = set_path(Some(data), &path, SetOptions::remove(), Budget::unlimited()).unwrap();
        assert_eq!(root, json!(["a", 2.8, true]));
    }

    #[test]
    fn append_combine_coerces_missing_to_empty_array() {
        let path = vec![PathSegment::Key("tags".into())];
        let (root, _) =
            set_path(None, &path, SetOptions::combine(json!("x"), Combine::ArrayAppend), Budget::unlimited()).unwrap();
        assert_eq!(root, json!({"tags": ["x"]}));
    }

    #[test]
    fn inc_combinator_accumulates() {
        let data = json!({"count": 3.0});
        let path = vec![PathSegment::Key("count".into())];
        let (root, _) =
            set_path(Some(data), &path, SetOptions::combine(json!(2.0), Combine::Inc), Budget::unlimited()).unwrap();
        assert_eq!(root, json!({"count": 5.0}));
    }

    #[test]
    fn set_type_error_without_force() {
        let data = json!({"a": "not an object"});
        let path = vec![PathSegment::Key("a".into()), PathSegment::Key("b".into())];
        let err = set_path(Some(data), &path, SetOptions::set(json!(1.0)), Budget::unlimited()).unwrap_err();
        assert!(matches!(err, IJsonError::SetType(_)));
    }
}
