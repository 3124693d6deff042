//! Alias CRUD one level below an App scope.

use tokio_util::sync::CancellationToken;

use crate::control_plane::staging;
use crate::control_plane::topology_store::{
    ensure_scope, require_app, staged_app, Operation, Target, TopologyStore,
};
use crate::diff::Changelog;
use crate::error::{Result, TopologyError};
use crate::meta::{Alias, App};
use crate::scope;

pub struct AliasMemory<'a> {
    store: &'a TopologyStore,
}

fn require_alias<'t>(app: &'t App, scope: &str, name: &str) -> Result<&'t Alias> {
    app.spec.aliases.get(name).ok_or_else(|| {
        TopologyError::NotFound(format!(
            "alias '{}' does not exist",
            scope::child_path(scope, name)
        ))
    })
}

impl<'a> AliasMemory<'a> {
    pub(crate) fn new(store: &'a TopologyStore) -> Self {
        Self { store }
    }

    pub async fn create(
        &self,
        cancel: &CancellationToken,
        scope: &str,
        alias: Alias,
        dry_run: bool,
    ) -> Result<Changelog> {
        let name = alias.meta.name.clone();
        self.store
            .mutate(
                cancel,
                Operation::CreateAlias,
                scope,
                &name,
                dry_run,
                move |current, staged, _| {
                    let name = alias.meta.name.clone();
                    ensure_scope(scope)?;
                    if require_app(current, scope)?.spec.aliases.contains_key(&name) {
                        return Err(TopologyError::AlreadyExists(format!(
                            "alias '{}' already exists",
                            scope::child_path(scope, &name)
                        )));
                    }
                    scope::validate_name(&name)?;

                    let mut candidate = alias;
                    staging::carry_identity(None, &mut candidate.meta);
                    staged_app(staged, scope)?
                        .spec
                        .aliases
                        .insert(name.clone(), candidate);
                    Ok(Target::Alias {
                        scope: scope.to_string(),
                        name,
                    })
                },
            )
            .await
    }

    pub async fn update(
        &self,
        cancel: &CancellationToken,
        scope: &str,
        alias: Alias,
        dry_run: bool,
    ) -> Result<Changelog> {
        let name = alias.meta.name.clone();
        self.store
            .mutate(
                cancel,
                Operation::UpdateAlias,
                scope,
                &name,
                dry_run,
                move |current, staged, _| {
                    let name = alias.meta.name.clone();
                    ensure_scope(scope)?;
                    scope::validate_name(&name)?;
                    let existing = require_alias(require_app(current, scope)?, scope, &name)?;

                    let mut candidate = alias;
                    staging::carry_identity(Some(&existing.meta), &mut candidate.meta);
                    staged_app(staged, scope)?
                        .spec
                        .aliases
                        .insert(name.clone(), candidate);
                    Ok(Target::Alias {
                        scope: scope.to_string(),
                        name,
                    })
                },
            )
            .await
    }

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
                Operation::DeleteAlias,
                scope,
                name,
                dry_run,
                |current, staged, _| {
                    ensure_scope(scope)?;
                    require_alias(require_app(current, scope)?, scope, name)?;
                    staged_app(staged, scope)?.spec.aliases.remove(name);
                    Ok(Target::Alias {
                        scope: scope.to_string(),
                        name: name.to_string(),
                    })
                },
            )
            .await
    }

    pub async fn get(&self, cancel: &CancellationToken, scope: &str, name: &str) -> Result<Alias> {
        ensure_scope(scope)?;
        let tree = self.store.read_tree(cancel).await?;
        require_alias(require_app(&tree, scope)?, scope, name).cloned()
    }
}
