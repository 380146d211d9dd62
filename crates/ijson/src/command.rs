// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Command dispatch: `set` / `del` / `append` applied to a document.

use crate::budget::Budget;
use crate::engine::{set_path, Combine, SetOptions};
use crate::error::IJsonError;
use crate::path::parse_command_path;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// `path` is the wire shape consumers of the command stream actually send:
/// absent, `null`, or a JSON array of string/int elements (see
/// `path::parse_command_path`). Kept as a raw `Value` here rather than
/// `Path` so a malformed path surfaces as this command's own
/// `IJsonError::Path`, not a deserialization error that loses the command's
/// type/data.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Command {
    Set {
        #[serde(default)]
        path: Option<Value>,
        data: Value,
    },
    Del {
        #[serde(default)]
        path: Option<Value>,
    },
    Append {
        #[serde(default)]
        path: Option<Value>,
        data: Value,
    },
}

/// Apply a single command to `data`, returning the new root and the
/// remaining budget.
pub fn apply_command(data: Value, cmd: &Command, budget: Budget) -> Result<(Value, Budget), IJsonError> {
    match cmd {
        Command::Set { path, data: val } => {
            let p = parse_command_path(path.as_ref())?;
            set_path(Some(data), &p, SetOptions::set(val.clone()), budget)
        }
        Command::Del { path } => {
            let p = parse_command_path(path.as_ref())?;
            set_path(Some(data), &p, SetOptions::remove(), budget)
        }
        Command::Append { path, data: val } => {
            let p = parse_command_path(path.as_ref())?;
            set_path(Some(data), &p, SetOptions::combine(val.clone(), Combine::ArrayAppend), budget)
        }
    }
}

/// Fold a sequence of commands over `data`. Partial application on error is
/// NOT rolled back; callers needing atomicity should apply to a clone.
pub fn apply_commands(mut data: Value, cmds: &[Command], mut budget: Budget) -> Result<(Value, Budget), IJsonError> {
    for cmd in cmds {
        let (new_data, new_budget) = apply_command(data, cmd, budget)?;
        data = new_data;
        budget = new_budget;
    }
    Ok((data, budget))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn set_command_deserializes_and_applies() {
        let cmd: Command = serde_json::from_value(json!({"type": "set", "path": ["a"], "data": 1.0})).unwrap();
        let (root, _) = apply_command(Value::Null, &cmd, Budget::unlimited()).unwrap();
        assert_eq!(root, json!({"a": 1.0}));
    }

    #[test]
    fn set_with_absent_path_replaces_the_root() {
        let cmd: Command = serde_json::from_value(json!({"type": "set", "data": {"a": 1.0}})).unwrap();
        let (root, _) = apply_command(Value::Null, &cmd, Budget::unlimited()).unwrap();
        assert_eq!(root, json!({"a": 1.0}));
    }

    #[test]
    fn del_command_removes_leaf() {
        let cmd = Command::Del { path: Some(json!(["a"])) };
        let (root, _) = apply_command(json!({"a": 1.0, "b": 2.0}), &cmd, Budget::unlimited()).unwrap();
        assert_eq!(root, json!({"b": 2.0}));
    }

    #[test]
    fn del_command_accepts_bracket_index_strings_and_prunes_empty_parents() {
        let cmd: Command = serde_json::from_value(json!({"type": "del", "path": ["[3]", "c"]})).unwrap();
        let (root, _) =
            apply_command(json!(["a", 2.8, true, {"c": 1.1}]), &cmd, Budget::unlimited()).unwrap();
        assert_eq!(root, json!(["a", 2.8, true]));
    }

    #[test]
    fn append_command_grows_array() {
        let cmd = Command::Append { path: Some(json!(["tags"])), data: json!("x") };
        let (root, _) = apply_command(json!({"tags": ["a"]}), &cmd, Budget::unlimited()).unwrap();
        assert_eq!(root, json!({"tags": ["a", "x"]}));
    }

    #[test]
    fn apply_commands_folds_in_order() {
        let cmds = vec![
            Command::Set { path: Some(json!(["a"])), data: json!(1.0) },
            Command::Set { path: Some(json!(["b"])), data: json!(2.0) },
            Command::Del { path: Some(json!(["a"])) },
        ];
        let (root, _) = apply_commands(Value::Null, &cmds, Budget::unlimited()).unwrap();
        assert_eq!(root, json!({"b": 2.0}));
    }

    #[test]
    fn mixed_string_and_int_path_elements_address_nested_arrays() {
        let cmd: Command =
            serde_json::from_value(json!({"type": "set", "path": ["a", "b", 0, "c"], "data": 42.0})).unwrap();
        let (root, _) = apply_command(Value::Null, &cmd, Budget::unlimited()).unwrap();
        assert_eq!(root, json!({"a": {"b": [{"c": 42.0}]}}));
    }

    #[test]
    fn non_array_non_null_path_is_rejected() {
        let cmd: Command = serde_json::from_value(json!({"type": "del", "path": "$.a"})).unwrap();
        assert!(apply_command(json!({"a": 1.0}), &cmd, Budget::unlimited()).is_err());
    }
}
