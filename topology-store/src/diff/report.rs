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

//! Changelog reporter.
//!
//! Writes one line per record in emitted order. Records are never re-ordered or
//! merged, so the output can be compared line by line.

use std::io::{self, Write};

use super::changelog::{Change, ChangeDetails, Changelog};
use crate::observability::fields;

const ABSENT: &str = "<none>";

/// Renders `changelog` to `writer`.
pub fn print_changelog<W: Write>(changelog: &Changelog, writer: &mut W) -> io::Result<()> {
    if changelog.is_empty() {
        return writeln!(writer, "no changes");
    }
    for change in changelog {
        writeln!(writer, "{}", format_change(change))?;
    }
    Ok(())
}

/// Renders `changelog` into a `String`.
pub fn render_changelog(changelog: &Changelog) -> String {
    let mut buffer = Vec::new();
    // Writing into a Vec cannot fail.
    let _ = print_changelog(changelog, &mut buffer);
    String::from_utf8_lossy(&buffer).into_owned()
}

fn format_change(change: &Change) -> String {
    let path = fields::format_scope(&change.path);
    match &change.details {
        ChangeDetails::None => format!("{:<16} {path}", change.kind.as_str()),
        ChangeDetails::Field(field) => format!(
            "{:<16} {path} {}: {} -> {}",
            change.kind.as_str(),
            field.field,
            field.before.as_deref().unwrap_or(ABSENT),
            field.after.as_deref().unwrap_or(ABSENT),
        ),
        ChangeDetails::Boundary(boundary) => format!(
            "{:<16} {path} {}: +[{}] -[{}]",
            change.kind.as_str(),
            boundary.direction,
            boundary.added.join(", "),
            boundary.removed.join(", "),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::{print_changelog, render_changelog};
    use crate::diff::{BoundaryChange, Change, ChangeDetails, ChangeKind, Changelog};
    use crate::meta::BoundaryDirection;

    #[test]
    fn prints_one_line_per_record_in_emitted_order() {
        let changelog = Changelog::from(vec![
            Change::new(ChangeKind::ChannelDeleted, "billing.invoices"),
            Change::new(ChangeKind::AppCreated, "billing"),
            Change::field(
                ChangeKind::NodeUpdated,
                "billing.printer",
                "Spec.Node.Replicas",
                Some("1".to_string()),
                None,
            ),
            Change {
                kind: ChangeKind::BoundaryChanged,
                path: "billing.printer".to_string(),
                details: ChangeDetails::Boundary(BoundaryChange {
                    direction: BoundaryDirection::Output,
                    added: vec!["a".to_string(), "b".to_string()],
                    removed: vec![],
                }),
            },
        ]);

        let mut out = Vec::new();
        print_changelog(&changelog, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "ChannelDeleted   billing.invoices",
                "AppCreated       billing",
                "NodeUpdated      billing.printer Spec.Node.Replicas: 1 -> <none>",
                "BoundaryChanged  billing.printer Spec.Boundary.Output: +[a, b] -[]",
            ]
        );
    }

    #[test]
    fn empty_changelog_prints_a_marker_line() {
        assert_eq!(render_changelog(&Changelog::new()), "no changes\n");
    }

    #[test]
    fn root_path_is_named_explicitly() {
        let changelog = Changelog::from(vec![Change::new(ChangeKind::AppUpdated, "")]);
        assert_eq!(render_changelog(&changelog), "AppUpdated       <root>\n");
    }
}
