// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Simple-path grammar: `$` is the root, `.key` selects a map entry, `[n]`
//! selects an array index.

use crate::error::IJsonError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

pub type Path = Vec<PathSegment>;

fn is_key_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, ':' | '_' | '#' | '-')
}

/// Parse a path string. `""`, `"$"`, and `None` (via [`parse_opt`]) all mean
/// the root.
pub fn parse(s: &str) -> Result<Path, IJsonError> {
    let mut chars = s.chars().peekable();
    if chars.peek() == Some(&'$') {
        chars.next();
    }
    let mut path = Vec::new();
    while let Some(&c) = chars.peek() {
        match c {
            '.' => {
                chars.next();
                let mut key = String::new();
                while let Some(&c2) = chars.peek() {
                    if c2 == '.' || c2 == '[' {
                        break;
                    }
                    if !is_key_char(c2) {
                        return Err(IJsonError::Path(s.to_string()));
                    }
                    key.push(c2);
                    chars.next();
                }
                if key.is_empty() {
                    return Err(IJsonError::Path(s.to_string()));
                }
                path.push(PathSegment::Key(key));
            }
            '[' => {
                chars.next();
                let mut num = String::new();
                while let Some(&c2) = chars.peek() {
                    if c2 == ']' {
                        break;
                    }
                    num.push(c2);
                    chars.next();
                }
                if chars.peek() != Some(&']') {
                    return Err(IJsonError::Path(s.to_string()));
                }
                chars.next();
                let idx: usize = num.parse().map_err(|_| IJsonError::Path(s.to_string()))?;
                path.push(PathSegment::Index(idx));
            }
            _ => return Err(IJsonError::Path(s.to_string())),
        }
    }
    Ok(path)
}

pub fn parse_opt(s: Option<&str>) -> Result<Path, IJsonError> {
    match s {
        None => Ok(Vec::new()),
        Some(s) => parse(s),
    }
}

/// A single element of the command-stream path array: a bare string key, a
/// bare non-negative int index, or a string written in bracket-index form
/// (`"[3]"`) standing in for that same index -- command producers that only
/// have a string-typed array slot to put indices in use this form.
fn element_from_json(v: &serde_json::Value) -> Result<PathSegment, IJsonError> {
    match v {
        serde_json::Value::String(s) => {
            if let Some(inner) = s.strip_prefix('[').and_then(|r| r.strip_suffix(']')) {
                if let Ok(idx) = inner.parse::<usize>() {
                    return Ok(PathSegment::Index(idx));
                }
            }
            Ok(PathSegment::Key(s.clone()))
        }
        serde_json::Value::Number(n) => {
            let idx = n.as_u64().ok_or_else(|| IJsonError::Path(v.to_string()))?;
            Ok(PathSegment::Index(idx as usize))
        }
        other => Err(IJsonError::Path(other.to_string())),
    }
}

/// Parse the external command-stream path shape: absent, `null`, or a JSON
/// array of strings/ints (see `parse_command_path`'s callers in
/// `command.rs`). Distinct from [`parse`]'s `$.a[0]` string grammar, which
/// remains available for callers that build paths from a literal.
pub fn parse_command_path(v: Option<&serde_json::Value>) -> Result<Path, IJsonError> {
    match v {
        None | Some(serde_json::Value::Null) => Ok(Vec::new()),
        Some(serde_json::Value::Array(elems)) => elems.iter().map(element_from_json).collect(),
        Some(other) => Err(IJsonError::Path(other.to_string())),
    }
}

/// Render a path back to its string form: `.key` for identifier-like string
/// keys, a quoted bracket form otherwise.
pub fn format_path(path: &[PathSegment]) -> String {
    let mut s = String::from("$");
    for seg in path {
        match seg {
            PathSegment::Key(k) => {
                let is_ident = k.chars().next().is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
                    && k.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
                if is_ident {
                    s.push('.');
                    s.push_str(k);
                } else {
                    s.push('[');
                    s.push('"');
                    s.push_str(k);
                    s.push('"');
                    s.push(']');
                }
            }
            PathSegment::Index(i) => {
                s.push('[');
                s.push_str(&i.to_string());
                s.push(']');
            }
        }
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_mixed_key_and_index_segments() {
        let path = parse("$.a.b[0].c").unwrap();
        assert_eq!(
            path,
            vec![
                PathSegment::Key("a".into()),
                PathSegment::Key("b".into()),
                PathSegment::Index(0),
                PathSegment::Key("c".into()),
            ]
        );
    }

    #[test]
    fn empty_and_root_only_paths_are_the_root() {
        assert_eq!(parse("").unwrap(), Vec::new());
        assert_eq!(parse("$").unwrap(), Vec::new());
    }

    #[test]
    fn rejects_negative_index() {
        assert!(parse("[-1]").is_err());
    }

    #[test]
    fn format_round_trips_identifier_keys() {
        let path = vec![PathSegment::Key("frame_title".into()), PathSegment::Index(3)];
        assert_eq!(format_path(&path), "$.frame_title[3]");
    }

    #[test]
    fn format_quotes_non_identifier_keys() {
        let path = vec![PathSegment::Key("frame:title".into())];
        assert_eq!(format_path(&path), "$[\"frame:title\"]");
    }

    #[test]
    fn command_path_absent_or_null_is_the_root() {
        assert_eq!(parse_command_path(None).unwrap(), Vec::new());
        assert_eq!(parse_command_path(Some(&serde_json::Value::Null)).unwrap(), Vec::new());
    }

    #[test]
    fn command_path_array_mixes_strings_and_ints() {
        let v = serde_json::json!(["a", "b", 0, "c"]);
        let path = parse_command_path(Some(&v)).unwrap();
        assert_eq!(
            path,
            vec![
                PathSegment::Key("a".into()),
                PathSegment::Key("b".into()),
                PathSegment::Index(0),
                PathSegment::Key("c".into()),
            ]
        );
    }

    #[test]
    fn command_path_accepts_bracket_index_strings() {
        let v = serde_json::json!(["[3]", "c"]);
        let path = parse_command_path(Some(&v)).unwrap();
        assert_eq!(path, vec![PathSegment::Index(3), PathSegment::Key("c".into())]);
    }

    #[test]
    fn command_path_rejects_non_array_non_null() {
        let v = serde_json::json!("$.a.b");
        assert!(parse_command_path(Some(&v)).is_err());
    }
}
