//! Staging helpers applied to a candidate tree before and at commit.

use tracing::debug;
use uuid::Uuid;

use crate::error::{Result, TopologyError};
use crate::meta::{App, Metadata};
use crate::observability::events;
use crate::routing::resolution;
use crate::scope;

const COMPONENT: &str = "staging";

/// Fills names from map keys and recomputes `parent`/`reference` for the tree.
///
/// A declared name that disagrees with its map key is rejected.
pub(crate) fn normalize(root: &mut App) -> Result<()> {
    if !root.meta.name.is_empty() {
        return Err(TopologyError::InvalidName(format!(
            "the root app cannot be named ('{}')",
            root.meta.name
        )));
    }
    root.meta.parent.clear();
    root.meta.reference.clear();
    normalize_children(root, "")
}

fn normalize_children(app: &mut App, path: &str) -> Result<()> {
    for (key, child) in app.spec.apps.iter_mut() {
        adopt(&mut child.meta, key, path)?;
        normalize_children(child, &scope::child_path(path, key))?;
    }
    for (key, channel) in app.spec.channels.iter_mut() {
        adopt(&mut channel.meta, key, path)?;
    }
    for (key, channel_type) in app.spec.types.iter_mut() {
        adopt(&mut channel_type.meta, key, path)?;
    }
    for (key, alias) in app.spec.aliases.iter_mut() {
        adopt(&mut alias.meta, key, path)?;
    }
    Ok(())
}

fn adopt(meta: &mut Metadata, key: &str, parent: &str) -> Result<()> {
    if meta.name.is_empty() {
        meta.name = key.to_string();
    } else if meta.name != key {
        return Err(TopologyError::InvalidName(format!(
            "name '{}' does not match its key '{key}' in scope '{parent}'",
            meta.name
        )));
    }
    meta.parent = parent.to_string();
    meta.reference = scope::child_path(parent, key);
    Ok(())
}

/// Copies the identity of `before` onto `meta`, or clears it for new entities.
pub(crate) fn carry_identity(before: Option<&Metadata>, meta: &mut Metadata) {
    meta.uuid = before.map(|meta| meta.uuid.clone()).unwrap_or_default();
}

/// Carries identities from `before` onto `candidate`, matching children by name.
pub(crate) fn carry_app_identity(before: Option<&App>, candidate: &mut App) {
    carry_identity(before.map(|app| &app.meta), &mut candidate.meta);
    for (name, child) in candidate.spec.apps.iter_mut() {
        carry_app_identity(before.and_then(|app| app.spec.apps.get(name)), child);
    }
    for (name, channel) in candidate.spec.channels.iter_mut() {
        carry_identity(
            before
                .and_then(|app| app.spec.channels.get(name))
                .map(|channel| &channel.meta),
            &mut channel.meta,
        );
    }
    for (name, channel_type) in candidate.spec.types.iter_mut() {
        carry_identity(
            before
                .and_then(|app| app.spec.types.get(name))
                .map(|channel_type| &channel_type.meta),
            &mut channel_type.meta,
        );
    }
    for (name, alias) in candidate.spec.aliases.iter_mut() {
        carry_identity(
            before
                .and_then(|app| app.spec.aliases.get(name))
                .map(|alias| &alias.meta),
            &mut alias.meta,
        );
    }
}

/// Assigns a fresh UUID to every entity that has none. Returns how many were assigned.
pub(crate) fn assign_identities(app: &mut App) -> usize {
    let mut assigned = assign(&mut app.meta);
    for child in app.spec.apps.values_mut() {
        assigned += assign_identities(child);
    }
    for channel in app.spec.channels.values_mut() {
        assigned += assign(&mut channel.meta);
    }
    for channel_type in app.spec.types.values_mut() {
        assigned += assign(&mut channel_type.meta);
    }
    for alias in app.spec.aliases.values_mut() {
        assigned += assign(&mut alias.meta);
    }
    assigned
}

fn assign(meta: &mut Metadata) -> usize {
    if meta.has_identity() {
        return 0;
    }
    meta.uuid = Uuid::new_v4().to_string();
    debug!(
        event = events::UUID_ASSIGNED,
        component = COMPONENT,
        reference = meta.reference.as_str(),
        uuid = meta.uuid.as_str(),
        "identity assigned"
    );
    1
}

#[derive(Default)]
struct Links {
    /// (channel path, app path)
    apps: Vec<(String, String)>,
    /// (channel path, alias path)
    aliases: Vec<(String, String)>,
    /// (type path, channel path)
    channels: Vec<(String, String)>,
}

/// Rebuilds every store-maintained `connected_*` list from scratch.
pub(crate) fn recompute_connections(root: &mut App) {
    let mut links = Links::default();
    collect_links(&*root, &*root, "", &mut links);
    clear_connections(root);

    for (channel_path, app_path) in links.apps {
        if let Some(channel) = resolution::find_channel_mut(root, &channel_path) {
            channel.connected_apps.push(app_path);
        }
    }
    for (channel_path, alias_path) in links.aliases {
        if let Some(channel) = resolution::find_channel_mut(root, &channel_path) {
            channel.connected_aliases.push(alias_path);
        }
    }
    for (type_path, channel_path) in links.channels {
        if let Some(channel_type) = resolution::find_type_mut(root, &type_path) {
            channel_type.connected_channels.push(channel_path);
        }
    }
    sort_connections(root);
}

fn collect_links(root: &App, app: &App, path: &str, links: &mut Links) {
    for (_, name) in app.spec.boundary.entries() {
        if let Some(channel_path) = resolution::resolve_boundary_name(root, path, name) {
            links.apps.push((channel_path, path.to_string()));
        }
    }
    for (name, alias) in &app.spec.aliases {
        if let Some(channel_path) = resolution::resolve_alias_target(root, path, &alias.target) {
            links
                .aliases
                .push((channel_path, scope::child_path(path, name)));
        }
    }
    for (name, channel) in &app.spec.channels {
        if let Some(type_path) = resolution::resolve_type(root, path, &channel.spec.type_name) {
            links
                .channels
                .push((type_path, scope::child_path(path, name)));
        }
    }
    for (name, child) in &app.spec.apps {
        collect_links(root, child, &scope::child_path(path, name), links);
    }
}

fn clear_connections(app: &mut App) {
    for channel in app.spec.channels.values_mut() {
        channel.clear_derived();
    }
    for channel_type in app.spec.types.values_mut() {
        channel_type.connected_channels.clear();
    }
    for child in app.spec.apps.values_mut() {
        clear_connections(child);
    }
}

fn sort_connections(app: &mut App) {
    for channel in app.spec.channels.values_mut() {
        channel.connected_apps.sort();
        channel.connected_apps.dedup();
        channel.connected_aliases.sort();
    }
    for channel_type in app.spec.types.values_mut() {
        channel_type.connected_channels.sort();
    }
    for child in app.spec.apps.values_mut() {
        sort_connections(child);
    }
}
