// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Decides which request paths are exempt from authentication.
//!
//! Excluded paths are shell-style glob patterns (`*`, `?`, `[...]`,
//! `[!...]`). Both the request path and every pattern are compared without
//! their trailing slashes, so `/api/v1/status` and `/api/v1/status/` are
//! treated the same.

/// Returns `true` when `path` must be authenticated.
///
/// Fails closed: a missing path or an empty exclusion list always requires
/// authentication.
pub fn requires_auth<S: AsRef<str>>(path: Option<&str>, excluded_paths: &[S]) -> bool {
    let Some(path) = path else {
        return true;
    };
    if excluded_paths.is_empty() {
        return true;
    }

    let path = normalize(path);
    !excluded_paths
        .iter()
        .any(|pattern| glob_match(normalize(pattern.as_ref()), path))
}

fn normalize(path: &str) -> &str {
    path.trim_end_matches('/')
}

/// Shell-style wildcard match. `*` may span `/`.
pub fn glob_match(pattern: &str, text: &str) -> bool {
    let pattern: Vec<char> = pattern.chars().collect();
    let text: Vec<char> = text.chars().collect();

    let (mut p, mut t) = (0usize, 0usize);
    // Position of the last `*` seen and the text index it was tried against.
    let mut backtrack: Option<(usize, usize)> = None;

    while t < text.len() {
        if p < pattern.len() {
            match pattern[p] {
                '*' => {
                    backtrack = Some((p, t));
                    p += 1;
                    continue;
                }
                '?' => {
                    p += 1;
                    t += 1;
                    continue;
                }
                '[' => {
                    if let Some((matched, next)) = match_class(&pattern, p, text[t]) {
                        if matched {
                            p = next;
                            t += 1;
                            continue;
                        }
                    } else if text[t] == '[' {
                        // Unterminated class is a literal bracket.
                        p += 1;
                        t += 1;
                        continue;
                    }
                }
                c if c == text[t] => {
                    p += 1;
                    t += 1;
                    continue;
                }
                _ => {}
            }
        }

        match backtrack {
            Some((star, star_t)) => {
                p = star + 1;
                t = star_t + 1;
                backtrack = Some((star, star_t + 1));
            }
            None => return false,
        }
    }

    pattern[p..].iter().all(|&c| c == '*')
}

/// Matches `c` against the bracket expression starting at `pattern[start]`.
///
/// Returns `(matched, index after the closing bracket)`, or `None` when the
/// bracket is never closed.
fn match_class(pattern: &[char], start: usize, c: char) -> Option<(bool, usize)> {
    let mut i = start + 1;
    let negated = matches!(pattern.get(i), Some('!'));
    if negated {
        i += 1;
    }

    let mut matched = false;
    let mut first = true;
    loop {
        let current = *pattern.get(i)?;
        if current == ']' && !first {
            return Some((matched != negated, i + 1));
        }
        first = false;

        if pattern.get(i + 1) == Some(&'-') && pattern.get(i + 2).is_some_and(|&end| end != ']') {
            let end = pattern[i + 2];
            if current <= c && c <= end {
                matched = true;
            }
            i += 3;
        } else {
            if current == c {
                matched = true;
            }
            i += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STATUS: &[&str] = &["/api/v1/status*"];

    #[test]
    fn missing_path_requires_auth() {
        assert!(requires_auth(None, STATUS));
    }

    #[test]
    fn empty_exclusions_always_require_auth() {
        let none: &[&str] = &[];
        for path in ["/", "/api/v1/status", "", "/anything/else/"] {
            assert!(requires_auth(Some(path), none));
        }
    }

    #[test]
    fn unrelated_path_requires_auth() {
        assert!(requires_auth(Some("/api/v1/users"), STATUS));
    }

    #[test]
    fn wildcard_exclusion_matches_with_trailing_slash() {
        assert!(!requires_auth(Some("/api/v1/status/"), STATUS));
        assert!(!requires_auth(Some("/api/v1/status"), STATUS));
        assert!(!requires_auth(Some("/api/v1/stats"), &["/api/v1/stat*"]));
    }

    #[test]
    fn slash_terminated_exclusions_match_both_forms() {
        let excluded = ["/api/v1/status/", "/api/v1/unauthorized/"];
        assert!(!requires_auth(Some("/api/v1/status"), &excluded));
        assert!(!requires_auth(Some("/api/v1/status/"), &excluded));
        assert!(requires_auth(Some("/api/v1/statuses"), &excluded));
        assert!(requires_auth(Some("/api/v1/users"), &excluded));
    }

    #[test]
    fn trailing_slash_does_not_change_decision() {
        let excluded = ["/api/v1/status/", "/api/v1/users/*/avatar", "/docs*"];
        for path in [
            "/api/v1/status",
            "/api/v1/status/",
            "/api/v1/users/42/avatar",
            "/api/v1/users",
            "/docs/index.html",
            "/",
            "",
        ] {
            let with_slash = format!("{path}/");
            assert_eq!(
                requires_auth(Some(path), &excluded),
                requires_auth(Some(&with_slash), &excluded),
                "decision changed for {path:?}"
            );
        }
    }

    #[test]
    fn first_match_wins_over_later_patterns() {
        let excluded = ["/public*", "/never-matched"];
        assert!(!requires_auth(Some("/public/file"), &excluded));
    }

    #[test]
    fn glob_question_mark_and_classes() {
        assert!(glob_match("/v?/status", "/v1/status"));
        assert!(!glob_match("/v?/status", "/v10/status"));
        assert!(glob_match("/v[12]/x", "/v2/x"));
        assert!(!glob_match("/v[12]/x", "/v3/x"));
        assert!(glob_match("/v[0-9]/x", "/v7/x"));
        assert!(glob_match("/v[!0-9]/x", "/va/x"));
        assert!(!glob_match("/v[!0-9]/x", "/v5/x"));
    }

    #[test]
    fn glob_star_spans_segments_and_backtracks() {
        assert!(glob_match("/api/*/me", "/api/v1/users/me"));
        assert!(glob_match("*", ""));
        assert!(glob_match("a*b*c", "aXXbYYbZZc"));
        assert!(!glob_match("a*b*c", "aXXbYY"));
    }

    #[test]
    fn unterminated_class_is_literal() {
        assert!(glob_match("/a[b", "/a[b"));
        assert!(!glob_match("/a[b", "/ab"));
    }

    #[test]
    fn matching_is_case_sensitive() {
        assert!(requires_auth(Some("/API/v1/status"), STATUS));
    }
}
