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

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

use crate::meta::BoundaryDirection;

/// Kind of a single change record.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub enum ChangeKind {
    AppCreated,
    AppDeleted,
    AppUpdated,
    NodeUpdated,
    BoundaryChanged,
    ChannelCreated,
    ChannelDeleted,
    ChannelUpdated,
    TypeCreated,
    TypeDeleted,
    TypeUpdated,
    AliasCreated,
    AliasDeleted,
    AliasUpdated,
}

impl ChangeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeKind::AppCreated => "AppCreated",
            ChangeKind::AppDeleted => "AppDeleted",
            ChangeKind::AppUpdated => "AppUpdated",
            ChangeKind::NodeUpdated => "NodeUpdated",
            ChangeKind::BoundaryChanged => "BoundaryChanged",
            ChangeKind::ChannelCreated => "ChannelCreated",
            ChangeKind::ChannelDeleted => "ChannelDeleted",
            ChangeKind::ChannelUpdated => "ChannelUpdated",
            ChangeKind::TypeCreated => "TypeCreated",
            ChangeKind::TypeDeleted => "TypeDeleted",
            ChangeKind::TypeUpdated => "TypeUpdated",
            ChangeKind::AliasCreated => "AliasCreated",
            ChangeKind::AliasDeleted => "AliasDeleted",
            ChangeKind::AliasUpdated => "AliasUpdated",
        }
    }

    pub fn is_creation(&self) -> bool {
        matches!(
            self,
            ChangeKind::AppCreated
                | ChangeKind::ChannelCreated
                | ChangeKind::TypeCreated
                | ChangeKind::AliasCreated
        )
    }

    pub fn is_deletion(&self) -> bool {
        matches!(
            self,
            ChangeKind::AppDeleted
                | ChangeKind::ChannelDeleted
                | ChangeKind::TypeDeleted
                | ChangeKind::AliasDeleted
        )
    }

    pub fn is_update(&self) -> bool {
        !self.is_creation() && !self.is_deletion()
    }

    /// The kind describing the same change seen from the other side.
    pub fn inverse(&self) -> ChangeKind {
        match self {
            ChangeKind::AppCreated => ChangeKind::AppDeleted,
            ChangeKind::AppDeleted => ChangeKind::AppCreated,
            ChangeKind::ChannelCreated => ChangeKind::ChannelDeleted,
            ChangeKind::ChannelDeleted => ChangeKind::ChannelCreated,
            ChangeKind::TypeCreated => ChangeKind::TypeDeleted,
            ChangeKind::TypeDeleted => ChangeKind::TypeCreated,
            ChangeKind::AliasCreated => ChangeKind::AliasDeleted,
            ChangeKind::AliasDeleted => ChangeKind::AliasCreated,
            other => *other,
        }
    }
}

impl Display for ChangeKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One changed value. `None` means the value was absent on that side.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct FieldChange {
    pub field: String,
    pub before: Option<String>,
    pub after: Option<String>,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct BoundaryChange {
    pub direction: BoundaryDirection,
    pub added: Vec<String>,
    pub removed: Vec<String>,
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChangeDetails {
    #[default]
    None,
    Field(FieldChange),
    Boundary(BoundaryChange),
}

/// A single structural change record.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Change {
    pub kind: ChangeKind,
    /// Fully joined scope path at which the change occurred.
    pub path: String,
    #[serde(default)]
    pub details: ChangeDetails,
}

impl Change {
    pub fn new(kind: ChangeKind, path: impl Into<String>) -> Self {
        Self {
            kind,
            path: path.into(),
            details: ChangeDetails::None,
        }
    }

    pub fn field(
        kind: ChangeKind,
        path: impl Into<String>,
        field: impl Into<String>,
        before: Option<String>,
        after: Option<String>,
    ) -> Self {
        Self {
            kind,
            path: path.into(),
            details: ChangeDetails::Field(FieldChange {
                field: field.into(),
                before,
                after,
            }),
        }
    }

    /// The same change seen from the other side of the diff.
    pub fn inverse(&self) -> Change {
        let details = match &self.details {
            ChangeDetails::None => ChangeDetails::None,
            ChangeDetails::Field(change) => ChangeDetails::Field(FieldChange {
                field: change.field.clone(),
                before: change.after.clone(),
                after: change.before.clone(),
            }),
            ChangeDetails::Boundary(change) => ChangeDetails::Boundary(BoundaryChange {
                direction: change.direction,
                added: change.removed.clone(),
                removed: change.added.clone(),
            }),
        };
        Change {
            kind: self.kind.inverse(),
            path: self.path.clone(),
            details,
        }
    }
}

/// Ordered sequence of change records. Empty means no structural difference.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Changelog {
    changes: Vec<Change>,
}

impl Changelog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, change: Change) {
        self.changes.push(change);
    }

    pub fn extend(&mut self, other: Changelog) {
        self.changes.extend(other.changes);
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Change> {
        self.changes.iter()
    }

    pub fn changes(&self) -> &[Change] {
        &self.changes
    }

    /// Records of one kind, in emitted order.
    pub fn filter_by_kind(&self, kind: ChangeKind) -> Changelog {
        Changelog {
            changes: self
                .changes
                .iter()
                .filter(|change| change.kind == kind)
                .cloned()
                .collect(),
        }
    }

    /// Paths of every record, in emitted order and with repeats.
    pub fn paths(&self) -> Vec<&str> {
        self.changes.iter().map(|change| change.path.as_str()).collect()
    }

    /// `(kind, path)` pairs, in emitted order.
    pub fn summary(&self) -> Vec<(ChangeKind, String)> {
        self.changes
            .iter()
            .map(|change| (change.kind, change.path.clone()))
            .collect()
    }
}

impl From<Vec<Change>> for Changelog {
    fn from(changes: Vec<Change>) -> Self {
        Self { changes }
    }
}

impl IntoIterator for Changelog {
    type Item = Change;
    type IntoIter = std::vec::IntoIter<Change>;

    fn into_iter(self) -> Self::IntoIter {
        self.changes.into_iter()
    }
}

impl<'a> IntoIterator for &'a Changelog {
    type Item = &'a Change;
    type IntoIter = std::slice::Iter<'a, Change>;

    fn into_iter(self) -> Self::IntoIter {
        self.changes.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::{Change, ChangeDetails, ChangeKind, Changelog};

    #[test]
    fn filter_by_kind_keeps_emitted_order() {
        let changelog = Changelog::from(vec![
            Change::new(ChangeKind::ChannelCreated, "a.z"),
            Change::new(ChangeKind::AppCreated, "a"),
            Change::new(ChangeKind::ChannelCreated, "a.b"),
        ]);
        let channels = changelog.filter_by_kind(ChangeKind::ChannelCreated);
        assert_eq!(channels.paths(), vec!["a.z", "a.b"]);
        assert!(changelog.filter_by_kind(ChangeKind::TypeDeleted).is_empty());
    }

    #[test]
    fn inverse_swaps_field_values_and_kinds() {
        let change = Change::field(
            ChangeKind::ChannelUpdated,
            "a.c",
            "Spec.Type",
            Some("Old".into()),
            Some("New".into()),
        );
        let inverse = change.inverse();
        assert_eq!(inverse.kind, ChangeKind::ChannelUpdated);
        match inverse.details {
            ChangeDetails::Field(field) => {
                assert_eq!(field.before.as_deref(), Some("New"));
                assert_eq!(field.after.as_deref(), Some("Old"));
            }
            other => panic!("unexpected details {other:?}"),
        }
        assert_eq!(
            Change::new(ChangeKind::AliasCreated, "x").inverse().kind,
            ChangeKind::AliasDeleted
        );
    }

    #[test]
    fn changelog_serializes_as_a_plain_sequence() {
        let changelog = Changelog::from(vec![Change::new(ChangeKind::AppCreated, "billing")]);
        let json = serde_json::to_value(&changelog).unwrap();
        assert_eq!(json[0]["kind"], "AppCreated");
        assert_eq!(json[0]["path"], "billing");
        assert_eq!(json[0]["details"]["type"], "none");

        let back: Changelog = serde_json::from_value(json).unwrap();
        assert_eq!(back, changelog);
    }
}
