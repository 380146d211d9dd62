// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Connection-name discovery: SSH config files, plus whatever the
//! registry and persisted connection config already know about.

use std::collections::HashSet;
use std::path::Path;

use tracing::warn;

/// Characters that make a `Host` pattern a wildcard, per the design note:
/// include the pattern only if it has none of these AND hasn't already
/// been seen.
const WILDCARD_CHARS: [char; 3] = ['*', '?', '!'];

fn is_literal_host_pattern(pattern: &str) -> bool {
    !pattern.chars().any(|c| WILDCARD_CHARS.contains(&c))
}

/// Parse an SSH client config file's `Host` stanzas, returning the first
/// non-wildcard alias of each stanza that hasn't been seen in an earlier
/// stanza (in this file or one already merged in by the caller).
pub fn parse_ssh_config(contents: &str, seen: &mut HashSet<String>) -> Vec<String> {
    let mut discovered = Vec::new();
    for line in contents.lines() {
        let trimmed = line.trim();
        let Some(rest) = trimmed.strip_prefix("Host ").or_else(|| trimmed.strip_prefix("host ")) else {
            continue;
        };
        for alias in rest.split_whitespace() {
            if is_literal_host_pattern(alias) && !seen.contains(alias) {
                seen.insert(alias.to_string());
                discovered.push(alias.to_string());
                break;
            }
        }
    }
    discovered
}

/// Read and parse `~/.ssh/config` then `/etc/ssh/config`. A missing file
/// produces a warning, not a fatal error, unless both are missing.
pub fn discover_from_ssh_config_files(paths: &[&Path]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut discovered = Vec::new();
    let mut any_found = false;
    for path in paths {
        match std::fs::read_to_string(path) {
            Ok(contents) => {
                any_found = true;
                discovered.extend(parse_ssh_config(&contents, &mut seen));
            }
            Err(e) => warn!(path = %path.display(), error = %e, "ssh config file not readable"),
        }
    }
    if !any_found {
        warn!("no ssh config files were found; connection discovery from config is empty");
    }
    discovered
}

/// De-duplicated ordered union of every source `GetConnectionsList` draws
/// from: currently connected, ever connected, known from persisted config,
/// and discovered from ssh config files. Ordering favors the earlier
/// sources (connected takes priority over merely discovered).
pub fn merge_connection_sources(sources: &[&[String]]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut merged = Vec::new();
    for source in sources {
        for name in *source {
            if seen.insert(name.clone()) {
                merged.push(name.clone());
            }
        }
    }
    merged
}
