//! App-scoped CRUD over whole subtrees.

use std::collections::BTreeMap;
use tokio_util::sync::CancellationToken;

use crate::control_plane::staging;
use crate::control_plane::topology_store::{
    ensure_scope, require_app, staged_app, Operation, Target, TopologyStore,
};
use crate::diff::Changelog;
use crate::error::{Result, TopologyError};
use crate::meta::App;
use crate::routing::resolution;
use crate::scope;

/// App operations. `scope` names the parent for `create` and the App itself otherwise.
pub struct AppMemory<'a> {
    store: &'a TopologyStore,
}

impl<'a> AppMemory<'a> {
    pub(crate) fn new(store: &'a TopologyStore) -> Self {
        Self { store }
    }

    /// Adds `app` and its whole subtree as a child of the App at `scope`.
    pub async fn create(
        &self,
        cancel: &CancellationToken,
        scope: &str,
        app: App,
        dry_run: bool,
    ) -> Result<Changelog> {
        let name = app.meta.name.clone();
        self.store
            .mutate(
                cancel,
                Operation::CreateApp,
                scope,
                &name,
                dry_run,
                move |current, staged, brokers| {
                    ensure_scope(scope)?;
                    let mut candidate = app;
                    let parent = require_app(current, scope)?;
                    let name = candidate.meta.name.clone();
                    if parent.spec.apps.contains_key(&name) {
                        return Err(TopologyError::AlreadyExists(format!(
                            "app '{}' already exists",
                            scope::child_path(scope, &name)
                        )));
                    }
                    scope::validate_name(&name)?;
                    let path = scope::join_scopes(scope, &name)?;

                    staging::carry_app_identity(None, &mut candidate);
                    brokers.select_for_subtree(&mut candidate);
                    staged_app(staged, scope)?.spec.apps.insert(name, candidate);
                    Ok(Target::App(path))
                },
            )
            .await
    }

    /// Replaces the App at `scope`, keeping identities of children whose names match.
    ///
    /// The candidate may leave its name empty; a different name is rejected since
    /// renames are modelled as delete plus create.
    pub async fn update(
        &self,
        cancel: &CancellationToken,
        scope: &str,
        app: App,
        dry_run: bool,
    ) -> Result<Changelog> {
        let name = app.meta.name.clone();
        self.store
            .mutate(
                cancel,
                Operation::UpdateApp,
                scope,
                &name,
                dry_run,
                move |current, staged, brokers| {
                    ensure_scope(scope)?;
                    let existing = require_app(current, scope)?;
                    let mut candidate = app;
                    let expected = if scope.is_empty() {
                        String::new()
                    } else {
                        scope::remove_last_part_in_scope(scope)?.1
                    };
                    if candidate.meta.name.is_empty() {
                        candidate.meta.name = expected;
                    } else if candidate.meta.name != expected {
                        return Err(TopologyError::InvalidName(format!(
                            "app '{}' cannot be renamed to '{}'",
                            scope,
                            candidate.meta.name
                        )));
                    }

                    staging::carry_app_identity(Some(existing), &mut candidate);
                    brokers.select_for_subtree(&mut candidate);
                    *staged_app(staged, scope)? = candidate;
                    Ok(Target::App(scope.to_string()))
                },
            )
            .await
    }

    /// Removes the App at `scope` together with everything it owns.
    pub async fn delete(
        &self,
        cancel: &CancellationToken,
        scope: &str,
        dry_run: bool,
    ) -> Result<Changelog> {
        let name = scope
            .rsplit(scope::SCOPE_SEPARATOR)
            .next()
            .unwrap_or_default()
            .to_string();
        self.store
            .mutate(
                cancel,
                Operation::DeleteApp,
                scope,
                &name,
                dry_run,
                move |current, staged, _| {
                    ensure_scope(scope)?;
                    if scope.is_empty() {
                        return Err(TopologyError::InvalidArgs(
                            "the root app cannot be deleted".to_string(),
                        ));
                    }
                    require_app(current, scope)?;
                    let (parent, leaf) = scope::remove_last_part_in_scope(scope)?;
                    staged_app(staged, &parent)?.spec.apps.remove(&leaf);
                    Ok(Target::App(scope.to_string()))
                },
            )
            .await
    }

    /// Returns an independent deep copy of the subtree at `scope`.
    pub async fn get(&self, cancel: &CancellationToken, scope: &str) -> Result<App> {
        ensure_scope(scope)?;
        let tree = self.store.read_tree(cancel).await?;
        require_app(&tree, scope).cloned()
    }

    /// Resolves every boundary name of the App at `scope` to the channel path it binds.
    pub async fn resolve_boundary(
        &self,
        cancel: &CancellationToken,
        scope: &str,
    ) -> Result<BTreeMap<String, String>> {
        ensure_scope(scope)?;
        let tree = self.store.read_tree(cancel).await?;
        let app = require_app(&tree, scope)?;
        app.spec
            .boundary
            .entries()
            .map(|(_, name)| {
                resolution::resolve_boundary_name(&tree, scope, name)
                    .map(|channel| (name.to_string(), channel))
                    .ok_or_else(|| {
                        TopologyError::Internal(format!(
                            "committed boundary '{name}' of app '{scope}' does not resolve"
                        ))
                    })
            })
            .collect()
    }
}
