// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Colon-delimited scope matching. A pattern segment of `*` matches exactly
//! one scope segment; `**` matches any (possibly empty) tail.

/// Does `pattern` contain a star segment (`*` or `**`)?
pub fn is_star_pattern(pattern: &str) -> bool {
    pattern.split(':').any(|seg| seg == "*" || seg == "**")
}

pub fn scope_matches(pattern: &str, scope: &str) -> bool {
    let pat: Vec<&str> = pattern.split(':').collect();
    let sc: Vec<&str> = scope.split(':').collect();
    matches_rec(&pat, &sc)
}

fn matches_rec(pat: &[&str], sc: &[&str]) -> bool {
    match pat.first() {
        None => sc.is_empty(),
        Some(&"**") => {
            // ** matches any tail, including zero segments.
            (0..=sc.len()).any(|skip| matches_rec(&pat[1..], &sc[skip..]))
        }
        Some(&"*") => match sc.split_first() {
            Some((_, rest)) => matches_rec(&pat[1..], rest),
            None => false,
        },
        Some(seg) => match sc.split_first() {
            Some((head, rest)) if head == seg => matches_rec(&pat[1..], rest),
            _ => false,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_match() {
        assert!(scope_matches("connection:alice", "connection:alice"));
        assert!(!scope_matches("connection:alice", "connection:bob"));
    }

    #[test]
    fn single_star_matches_one_segment() {
        assert!(scope_matches("connection:*", "connection:alice"));
        assert!(scope_matches("connection:*", "connection:bob"));
        assert!(!scope_matches("connection:*", "workspace:x"));
        assert!(!scope_matches("connection:*", "connection:alice:extra"));
    }

    #[test]
    fn double_star_matches_any_tail() {
        assert!(scope_matches("workspace:**", "workspace:x"));
        assert!(scope_matches("workspace:**", "workspace:x:tab:y"));
        assert!(scope_matches("workspace:**", "workspace"));
    }

    #[test]
    fn detects_star_patterns() {
        assert!(is_star_pattern("connection:*"));
        assert!(is_star_pattern("workspace:**"));
        assert!(!is_star_pattern("connection:alice"));
    }
}
