/********************************************************************************
 * Copyright (c) 2024 Contributors to the Eclipse Foundation
 *
 * See the NOTICE file(s) distributed with this work for additional
 * information regarding copyright ownership.
 *
 * This program and the accompanying materials are made available under the
 * terms of the Apache License Version 2.0 which is available at
 * https://www.apache.org/licenses/LICENSE-2.0
 *
 * SPDX-License-Identifier: Apache-2.0
 ********************************************************************************/

//! Scope resolver: pure functions over dotted scope paths.
//!
//! A scope is either `""` (the root) or a dot-joined sequence of names. Every other
//! component relies on these helpers for path syntax.

use lazy_static::lazy_static;
use regex::Regex;

use crate::error::{Result, TopologyError};

pub const SCOPE_SEPARATOR: char = '.';
pub const MAX_NAME_LEN: usize = 63;

lazy_static! {
    static ref NAME_PATTERN: Regex =
        Regex::new(r"^[A-Za-z0-9][A-Za-z0-9_-]*$").expect("name pattern is a valid regex");
}

/// Returns `true` when `name` is a valid leaf identifier.
pub fn is_valid_name(name: &str) -> bool {
    !name.is_empty() && name.len() <= MAX_NAME_LEN && NAME_PATTERN.is_match(name)
}

/// Validates a leaf identifier, reporting the offending name.
pub fn validate_name(name: &str) -> Result<()> {
    if is_valid_name(name) {
        Ok(())
    } else {
        Err(TopologyError::InvalidName(format!(
            "'{name}' must match [A-Za-z0-9][A-Za-z0-9_-]* and be at most {MAX_NAME_LEN} characters"
        )))
    }
}

/// Returns `true` for the root scope or a dot-joined sequence of valid names.
pub fn is_valid_scope(scope: &str) -> bool {
    scope.is_empty() || scope.split(SCOPE_SEPARATOR).all(is_valid_name)
}

fn ensure_scope(scope: &str) -> Result<()> {
    if is_valid_scope(scope) {
        Ok(())
    } else {
        Err(TopologyError::InvalidName(format!("invalid scope: '{scope}'")))
    }
}

/// Joins two scopes, omitting the separator when either side is the root.
pub fn join_scopes(a: &str, b: &str) -> Result<String> {
    ensure_scope(a)?;
    ensure_scope(b)?;
    Ok(match (a.is_empty(), b.is_empty()) {
        (true, _) => b.to_string(),
        (_, true) => a.to_string(),
        _ => format!("{a}{SCOPE_SEPARATOR}{b}"),
    })
}

/// Splits `scope` into its parent scope and final name.
///
/// The root scope splits into two empty strings.
pub fn remove_last_part_in_scope(scope: &str) -> Result<(String, String)> {
    ensure_scope(scope)?;
    match scope.rsplit_once(SCOPE_SEPARATOR) {
        Some((parent, leaf)) => Ok((parent.to_string(), leaf.to_string())),
        None => Ok((String::new(), scope.to_string())),
    }
}

/// Returns `true` if `inner` is `outer` itself or one of its descendants.
///
/// Comparison is per segment, so `app1` is not an inner scope of `app12`.
pub fn is_inner_scope(outer: &str, inner: &str) -> bool {
    if !is_valid_scope(outer) || !is_valid_scope(inner) {
        return false;
    }
    if outer.is_empty() {
        return true;
    }
    let mut inner_parts = inner.split(SCOPE_SEPARATOR);
    outer
        .split(SCOPE_SEPARATOR)
        .all(|segment| !inner.is_empty() && inner_parts.next() == Some(segment))
}

/// Joins a scope and a child name without validating either.
pub(crate) fn child_path(scope: &str, name: &str) -> String {
    if scope.is_empty() {
        name.to_string()
    } else {
        format!("{scope}{SCOPE_SEPARATOR}{name}")
    }
}

/// Iterates over the segments of a valid scope; the root yields nothing.
pub(crate) fn segments(scope: &str) -> impl Iterator<Item = &str> {
    scope
        .split(SCOPE_SEPARATOR)
        .filter(|segment| !segment.is_empty())
}

/// Scopes from `scope` up to and including the root, innermost first.
pub(crate) fn ancestors_inclusive(scope: &str) -> Vec<String> {
    let mut chain = Vec::new();
    let mut current = scope.to_string();
    loop {
        chain.push(current.clone());
        match current.rsplit_once(SCOPE_SEPARATOR) {
            Some((parent, _)) => current = parent.to_string(),
            None if current.is_empty() => break,
            None => current = String::new(),
        }
    }
    chain
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn names_follow_the_identifier_grammar() {
        assert!(is_valid_name("billing"));
        assert!(is_valid_name("0day"));
        assert!(is_valid_name("a_b-c"));
        assert!(!is_valid_name(""));
        assert!(!is_valid_name("-lead"));
        assert!(!is_valid_name("_lead"));
        assert!(!is_valid_name("has.dot"));
        assert!(!is_valid_name("has space"));
        assert!(is_valid_name(&"a".repeat(63)));
        assert!(!is_valid_name(&"a".repeat(64)));
    }

    #[test]
    fn scopes_reject_empty_segments() {
        assert!(is_valid_scope(""));
        assert!(is_valid_scope("app1"));
        assert!(is_valid_scope("app1.app2.app3"));
        assert!(!is_valid_scope(".app1"));
        assert!(!is_valid_scope("app1."));
        assert!(!is_valid_scope("app1..app2"));
        assert!(!is_valid_scope("app1.-x"));
    }

    #[test]
    fn join_scopes_handles_root_on_either_side() {
        assert_eq!(join_scopes("", "").unwrap(), "");
        assert_eq!(join_scopes("", "a").unwrap(), "a");
        assert_eq!(join_scopes("a", "").unwrap(), "a");
        assert_eq!(join_scopes("a.b", "c.d").unwrap(), "a.b.c.d");
        let err = join_scopes("a..b", "c").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidName);
        assert!(join_scopes("a", "c.").is_err());
    }

    #[test]
    fn remove_last_part_splits_parent_and_leaf() {
        assert_eq!(
            remove_last_part_in_scope("a.b.c").unwrap(),
            ("a.b".to_string(), "c".to_string())
        );
        assert_eq!(
            remove_last_part_in_scope("a").unwrap(),
            (String::new(), "a".to_string())
        );
        assert_eq!(
            remove_last_part_in_scope("").unwrap(),
            (String::new(), String::new())
        );
        assert!(remove_last_part_in_scope("a..b").is_err());
    }

    #[test]
    fn inner_scope_compares_segments_not_prefixes() {
        assert!(is_inner_scope("", ""));
        assert!(is_inner_scope("", "app1.app2"));
        assert!(is_inner_scope("app1", "app1"));
        assert!(is_inner_scope("app1", "app1.app2"));
        assert!(!is_inner_scope("app1", "app12"));
        assert!(!is_inner_scope("app1.app2", "app1"));
        assert!(!is_inner_scope("app1", ""));
        assert!(!is_inner_scope("app1", "app1..x"));
    }

    #[test]
    fn ancestors_walk_up_to_the_root() {
        assert_eq!(ancestors_inclusive("a.b"), vec!["a.b", "a", ""]);
        assert_eq!(ancestors_inclusive(""), vec![""]);
        assert_eq!(segments("").count(), 0);
        assert_eq!(segments("a.b").collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(child_path("", "a"), "a");
        assert_eq!(child_path("a", "b"), "a.b");
    }
}
