// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Compact a newline-delimited command stream into a single root `set`
//! command — a log-compaction equivalent for IJSON documents.

use crate::budget::Budget;
use crate::command::{apply_commands, Command};
use crate::error::IJsonError;
use serde_json::Value;
use tracing::debug;

/// Read `stream` as newline-delimited JSON commands, apply them in order
/// starting from `null`, and return the single `set` command that reproduces
/// the resulting document.
pub fn compact_ijson(stream: &str, budget: Budget) -> Result<Command, IJsonError> {
    let mut commands = Vec::new();
    for line in stream.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let cmd: Command = serde_json::from_str(line)
            .map_err(|_| IJsonError::UnknownCommand(line.to_string()))?;
        commands.push(cmd);
    }
    debug!(count = commands.len(), "compacting ijson command stream");
    let (data, _) = apply_commands(Value::Null, &commands, budget)?;
    Ok(Command::Set { path: None, data })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn compacts_a_stream_into_a_single_set() {
        let stream = r#"
            {"type":"set","path":"$.a","data":1}
            {"type":"set","path":"$.b","data":2}
            {"type":"del","path":"$.a"}
        "#;
        let compacted = compact_ijson(stream, Budget::unlimited()).unwrap();
        match compacted {
            Command::Set { path, data } => {
                assert_eq!(path, None);
                assert_eq!(data, json!({"b": 2}));
            }
            _ => panic!("expected a set command"),
        }
    }
}
