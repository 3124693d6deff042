//! Channel CRUD one level below an App scope.

use tokio_util::sync::CancellationToken;

use crate::control_plane::staging;
use crate::control_plane::topology_store::{
    ensure_scope, require_app, staged_app, Operation, Target, TopologyStore,
};
use crate::diff::Changelog;
use crate::error::{Result, TopologyError};
use crate::meta::{App, Channel};
use crate::observability::fields;
use crate::scope;

pub struct ChannelMemory<'a> {
    store: &'a TopologyStore,
}

fn require_channel<'t>(app: &'t App, scope: &str, name: &str) -> Result<&'t Channel> {
    app.spec.channels.get(name).ok_or_else(|| {
        TopologyError::NotFound(format!(
            "channel '{}' does not exist",
            scope::child_path(scope, name)
        ))
    })
}

impl<'a> ChannelMemory<'a> {
    pub(crate) fn new(store: &'a TopologyStore) -> Self {
        Self { store }
    }

    /// Declares `channel` in the App at `scope`.
    pub async fn create(
        &self,
        cancel: &CancellationToken,
        scope: &str,
        channel: Channel,
        dry_run: bool,
    ) -> Result<Changelog> {
        let name = channel.meta.name.clone();
        self.store
            .mutate(
                cancel,
                Operation::CreateChannel,
                scope,
                &name,
                dry_run,
                move |current, staged, brokers| {
                    let name = channel.meta.name.clone();
                    ensure_scope(scope)?;
                    let app = require_app(current, scope)?;
                    if app.spec.channels.contains_key(&name) {
                        return Err(TopologyError::AlreadyExists(format!(
                            "channel '{}' already exists",
                            scope::child_path(scope, &name)
                        )));
                    }
                    scope::validate_name(&name)?;

                    let mut candidate = channel;
                    staging::carry_identity(None, &mut candidate.meta);
                    candidate.clear_derived();
                    brokers.select_for_channel(&mut candidate);
                    staged_app(staged, scope)?
                        .spec
                        .channels
                        .insert(name.clone(), candidate);
                    Ok(Target::Channel {
                        scope: scope.to_string(),
                        name,
                    })
                },
            )
            .await
    }

    /// Replaces the channel named like `channel` in the App at `scope`.
    pub async fn update(
        &self,
        cancel: &CancellationToken,
        scope: &str,
        channel: Channel,
        dry_run: bool,
    ) -> Result<Changelog> {
        let name = channel.meta.name.clone();
        self.store
            .mutate(
                cancel,
                Operation::UpdateChannel,
                scope,
                &name,
                dry_run,
                move |current, staged, brokers| {
                    let name = channel.meta.name.clone();
                    ensure_scope(scope)?;
                    scope::validate_name(&name)?;
                    let existing = require_channel(require_app(current, scope)?, scope, &name)?;

                    let mut candidate = channel;
                    staging::carry_identity(Some(&existing.meta), &mut candidate.meta);
                    brokers.select_for_channel(&mut candidate);
                    staged_app(staged, scope)?
                        .spec
                        .channels
                        .insert(name.clone(), candidate);
                    Ok(Target::Channel {
                        scope: scope.to_string(),
                        name,
                    })
                },
            )
            .await
    }

    /// Removes the channel `name` from the App at `scope`.
    ///
    /// A channel still bound by some App boundary cannot be removed.
    pub async fn delete(
        &self,
        cancel: &CancellationToken,
        scope: &str,
        name: &str,
        dry_run: bool,
    ) -> Result<Changelog> {
        self.store
            .mutate(
                cancel,
                Operation::DeleteChannel,
                scope,
                name,
                dry_run,
                |current, staged, _| {
                    ensure_scope(scope)?;
                    let existing = require_channel(require_app(current, scope)?, scope, name)?;
                    if !existing.connected_apps.is_empty() {
                        let users: Vec<&str> = existing
                            .connected_apps
                            .iter()
                            .map(|app| fields::format_scope(app))
                            .collect();
                        return Err(TopologyError::BadRequest(format!(
                            "channel '{}' is still used by {}",
                            scope::child_path(scope, name),
                            users.join(", ")
                        )));
                    }
                    staged_app(staged, scope)?.spec.channels.remove(name);
                    Ok(Target::Channel {
                        scope: scope.to_string(),
                        name: name.to_string(),
                    })
                },
            )
            .await
    }

    /// Returns a copy of the channel `name` declared in the App at `scope`.
    pub async fn get(&self, cancel: &CancellationToken, scope: &str, name: &str) -> Result<Channel> {
        ensure_scope(scope)?;
        let tree = self.store.read_tree(cancel).await?;
        require_channel(require_app(&tree, scope)?, scope, name).cloned()
    }
}
