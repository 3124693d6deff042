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

use std::collections::{BTreeMap, BTreeSet};

use super::changelog::{BoundaryChange, Change, ChangeDetails, ChangeKind, Changelog};
use crate::error::Result;
use crate::meta::{Alias, App, BoundaryDirection, Channel, ChannelType, Metadata, Node};
use crate::scope;

/// Computes the changelog turning `old` into `new`.
///
/// Either side may be `None`, meaning the subtree did not exist (or no longer
/// exists). The root path is taken from the metadata of `new`, or of `old` when
/// `new` is absent.
///
/// The UUID of the compared node itself is ignored; a nested entity present on
/// both sides with a different UUID reports a `Meta.UUID` change.
pub fn diff(old: Option<&App>, new: Option<&App>) -> Result<Changelog> {
    let mut changelog = Changelog::new();
    let path = match (old, new) {
        (_, Some(app)) | (Some(app), None) => app.meta.path()?,
        (None, None) => return Ok(changelog),
    };
    diff_app(&path, old, new, Identity::Ignore, &mut changelog)?;
    Ok(changelog)
}

/// Changelog for a single Channel at `path`.
pub fn diff_channel(path: &str, old: Option<&Channel>, new: Option<&Channel>) -> Changelog {
    let mut changelog = Changelog::new();
    channel_changes(path, old, new, Identity::Ignore, &mut changelog);
    changelog
}

/// Changelog for a single Type at `path`.
pub fn diff_type(path: &str, old: Option<&ChannelType>, new: Option<&ChannelType>) -> Changelog {
    let mut changelog = Changelog::new();
    type_changes(path, old, new, Identity::Ignore, &mut changelog);
    changelog
}

/// Changelog for a single Alias at `path`.
pub fn diff_alias(path: &str, old: Option<&Alias>, new: Option<&Alias>) -> Changelog {
    let mut changelog = Changelog::new();
    alias_changes(path, old, new, Identity::Ignore, &mut changelog);
    changelog
}

/// Whether the UUID of the entity being compared takes part in the diff.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Identity {
    Ignore,
    Compare,
}

fn diff_app(
    path: &str,
    old: Option<&App>,
    new: Option<&App>,
    identity: Identity,
    out: &mut Changelog,
) -> Result<()> {
    match (old, new) {
        (None, None) => return Ok(()),
        (None, Some(_)) => out.push(Change::new(ChangeKind::AppCreated, path)),
        (Some(_), None) => out.push(Change::new(ChangeKind::AppDeleted, path)),
        (Some(old), Some(new)) => {
            identity_change(ChangeKind::AppUpdated, path, &old.meta, &new.meta, identity, out);
            annotation_changes(ChangeKind::AppUpdated, path, &old.meta, &new.meta, out);
            node_changes(path, old.spec.node.as_ref(), new.spec.node.as_ref(), out);
            boundary_changes(path, old, new, out);
        }
    }

    for name in union_keys(
        old.map(|app| &app.spec.apps),
        new.map(|app| &app.spec.apps),
    ) {
        let child_path = scope::join_scopes(path, name)?;
        diff_app(
            &child_path,
            old.and_then(|app| app.spec.apps.get(name)),
            new.and_then(|app| app.spec.apps.get(name)),
            Identity::Compare,
            out,
        )?;
    }

    for name in union_keys(
        old.map(|app| &app.spec.channels),
        new.map(|app| &app.spec.channels),
    ) {
        channel_changes(
            &scope::join_scopes(path, name)?,
            old.and_then(|app| app.spec.channels.get(name)),
            new.and_then(|app| app.spec.channels.get(name)),
            Identity::Compare,
            out,
        );
    }

    for name in union_keys(
        old.map(|app| &app.spec.types),
        new.map(|app| &app.spec.types),
    ) {
        type_changes(
            &scope::join_scopes(path, name)?,
            old.and_then(|app| app.spec.types.get(name)),
            new.and_then(|app| app.spec.types.get(name)),
            Identity::Compare,
            out,
        );
    }

    for name in union_keys(
        old.map(|app| &app.spec.aliases),
        new.map(|app| &app.spec.aliases),
    ) {
        alias_changes(
            &scope::join_scopes(path, name)?,
            old.and_then(|app| app.spec.aliases.get(name)),
            new.and_then(|app| app.spec.aliases.get(name)),
            Identity::Compare,
            out,
        );
    }

    Ok(())
}

fn union_keys<'a, V>(
    old: Option<&'a BTreeMap<String, V>>,
    new: Option<&'a BTreeMap<String, V>>,
) -> BTreeSet<&'a str> {
    old.into_iter()
        .chain(new)
        .flat_map(|map| map.keys().map(String::as_str))
        .collect()
}

fn push_if_changed(
    out: &mut Changelog,
    kind: ChangeKind,
    path: &str,
    field: &str,
    before: Option<String>,
    after: Option<String>,
) {
    if before != after {
        out.push(Change::field(kind, path, field, before, after));
    }
}

fn identity_change(
    kind: ChangeKind,
    path: &str,
    old: &Metadata,
    new: &Metadata,
    identity: Identity,
    out: &mut Changelog,
) {
    if identity == Identity::Compare {
        push_if_changed(
            out,
            kind,
            path,
            "Meta.UUID",
            Some(old.uuid.clone()),
            Some(new.uuid.clone()),
        );
    }
}

fn annotation_changes(
    kind: ChangeKind,
    path: &str,
    old: &Metadata,
    new: &Metadata,
    out: &mut Changelog,
) {
    for key in union_keys(Some(&old.annotations), Some(&new.annotations)) {
        push_if_changed(
            out,
            kind,
            path,
            &format!("Meta.Annotations[{key}]"),
            old.annotations.get(key).cloned(),
            new.annotations.get(key).cloned(),
        );
    }
}

fn node_changes(path: &str, old: Option<&Node>, new: Option<&Node>, out: &mut Changelog) {
    let kind = ChangeKind::NodeUpdated;
    push_if_changed(
        out,
        kind,
        path,
        "Spec.Node.Image",
        old.map(|node| node.image.clone()),
        new.map(|node| node.image.clone()),
    );
    push_if_changed(
        out,
        kind,
        path,
        "Spec.Node.Replicas",
        old.map(|node| node.replicas.to_string()),
        new.map(|node| node.replicas.to_string()),
    );
    for key in union_keys(
        old.map(|node| &node.environment),
        new.map(|node| &node.environment),
    ) {
        push_if_changed(
            out,
            kind,
            path,
            &format!("Spec.Node.Environment[{key}]"),
            old.and_then(|node| node.environment.get(key).cloned()),
            new.and_then(|node| node.environment.get(key).cloned()),
        );
    }
}

fn boundary_changes(path: &str, old: &App, new: &App, out: &mut Changelog) {
    for direction in [BoundaryDirection::Input, BoundaryDirection::Output] {
        let before = old.spec.boundary.names(direction);
        let after = new.spec.boundary.names(direction);
        let added: Vec<String> = after.difference(before).cloned().collect();
        let removed: Vec<String> = before.difference(after).cloned().collect();
        if !added.is_empty() || !removed.is_empty() {
            out.push(Change {
                kind: ChangeKind::BoundaryChanged,
                path: path.to_string(),
                details: ChangeDetails::Boundary(BoundaryChange {
                    direction,
                    added,
                    removed,
                }),
            });
        }
    }
}

fn channel_changes(
    path: &str,
    old: Option<&Channel>,
    new: Option<&Channel>,
    identity: Identity,
    out: &mut Changelog,
) {
    match (old, new) {
        (None, None) => {}
        (None, Some(_)) => out.push(Change::new(ChangeKind::ChannelCreated, path)),
        (Some(_), None) => out.push(Change::new(ChangeKind::ChannelDeleted, path)),
        (Some(old), Some(new)) => {
            let kind = ChangeKind::ChannelUpdated;
            identity_change(kind, path, &old.meta, &new.meta, identity, out);
            annotation_changes(kind, path, &old.meta, &new.meta, out);
            push_if_changed(
                out,
                kind,
                path,
                "Spec.Type",
                Some(old.spec.type_name.clone()),
                Some(new.spec.type_name.clone()),
            );
            push_if_changed(
                out,
                kind,
                path,
                "Spec.SelectedBroker",
                Some(old.spec.selected_broker.clone()),
                Some(new.spec.selected_broker.clone()),
            );
            push_if_changed(
                out,
                kind,
                path,
                "Spec.BrokerPriorityList",
                Some(old.spec.broker_priority_list.join(",")),
                Some(new.spec.broker_priority_list.join(",")),
            );
        }
    }
}

fn type_changes(
    path: &str,
    old: Option<&ChannelType>,
    new: Option<&ChannelType>,
    identity: Identity,
    out: &mut Changelog,
) {
    match (old, new) {
        (None, None) => {}
        (None, Some(_)) => out.push(Change::new(ChangeKind::TypeCreated, path)),
        (Some(_), None) => out.push(Change::new(ChangeKind::TypeDeleted, path)),
        (Some(old), Some(new)) => {
            let kind = ChangeKind::TypeUpdated;
            identity_change(kind, path, &old.meta, &new.meta, identity, out);
            annotation_changes(kind, path, &old.meta, &new.meta, out);
            push_if_changed(
                out,
                kind,
                path,
                "Schema",
                Some(old.schema.clone()),
                Some(new.schema.clone()),
            );
        }
    }
}

fn alias_changes(
    path: &str,
    old: Option<&Alias>,
    new: Option<&Alias>,
    identity: Identity,
    out: &mut Changelog,
) {
    match (old, new) {
        (None, None) => {}
        (None, Some(_)) => out.push(Change::new(ChangeKind::AliasCreated, path)),
        (Some(_), None) => out.push(Change::new(ChangeKind::AliasDeleted, path)),
        (Some(old), Some(new)) => {
            let kind = ChangeKind::AliasUpdated;
            identity_change(kind, path, &old.meta, &new.meta, identity, out);
            annotation_changes(kind, path, &old.meta, &new.meta, out);
            push_if_changed(
                out,
                kind,
                path,
                "Target",
                Some(old.target.clone()),
                Some(new.target.clone()),
            );
        }
    }
}
