//! Type CRUD one level below an App scope.

use tokio_util::sync::CancellationToken;

use crate::control_plane::staging;
use crate::control_plane::topology_store::{
    ensure_scope, require_app, staged_app, Operation, Target, TopologyStore,
};
use crate::diff::Changelog;
use crate::error::{Result, TopologyError};
use crate::meta::{App, ChannelType};
use crate::scope;

pub struct TypeMemory<'a> {
    store: &'a TopologyStore,
}

fn require_type<'t>(app: &'t App, scope: &str, name: &str) -> Result<&'t ChannelType> {
    app.spec.types.get(name).ok_or_else(|| {
        TopologyError::NotFound(format!(
            "type '{}' does not exist",
            scope::child_path(scope, name)
        ))
    })
}

impl<'a> TypeMemory<'a> {
    pub(crate) fn new(store: &'a TopologyStore) -> Self {
        Self { store }
    }

    pub async fn create(
        &self,
        cancel: &CancellationToken,
        scope: &str,
        channel_type: ChannelType,
        dry_run: bool,
    ) -> Result<Changelog> {
        let name = channel_type.meta.name.clone();
        self.store
            .mutate(
                cancel,
                Operation::CreateType,
                scope,
                &name,
                dry_run,
                move |current, staged, _| {
                    let name = channel_type.meta.name.clone();
                    ensure_scope(scope)?;
                    if require_app(current, scope)?.spec.types.contains_key(&name) {
                        return Err(TopologyError::AlreadyExists(format!(
                            "type '{}' already exists",
                            scope::child_path(scope, &name)
                        )));
                    }
                    scope::validate_name(&name)?;

                    let mut candidate = channel_type;
                    staging::carry_identity(None, &mut candidate.meta);
                    candidate.connected_channels.clear();
                    staged_app(staged, scope)?
                        .spec
                        .types
                        .insert(name.clone(), candidate);
                    Ok(Target::Type {
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
        channel_type: ChannelType,
        dry_run: bool,
    ) -> Result<Changelog> {
        let name = channel_type.meta.name.clone();
        self.store
            .mutate(
                cancel,
                Operation::UpdateType,
                scope,
                &name,
                dry_run,
                move |current, staged, _| {
                    let name = channel_type.meta.name.clone();
                    ensure_scope(scope)?;
                    scope::validate_name(&name)?;
                    let existing = require_type(require_app(current, scope)?, scope, &name)?;

                    let mut candidate = channel_type;
                    staging::carry_identity(Some(&existing.meta), &mut candidate.meta);
                    staged_app(staged, scope)?
                        .spec
                        .types
                        .insert(name.clone(), candidate);
                    Ok(Target::Type {
                        scope: scope.to_string(),
                        name,
                    })
                },
            )
            .await
    }

    /// Removes the type `name`; a type still used by channels cannot be removed.
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
                Operation::DeleteType,
                scope,
                name,
                dry_run,
                |current, staged, _| {
                    ensure_scope(scope)?;
                    let existing = require_type(require_app(current, scope)?, scope, name)?;
                    if !existing.connected_channels.is_empty() {
                        return Err(TopologyError::BadRequest(format!(
                            "type '{}' is still used by {}",
                            scope::child_path(scope, name),
                            existing.connected_channels.join(", ")
                        )));
                    }
                    staged_app(staged, scope)?.spec.types.remove(name);
                    Ok(Target::Type {
                        scope: scope.to_string(),
                        name: name.to_string(),
                    })
                },
            )
            .await
    }

    pub async fn get(
        &self,
        cancel: &CancellationToken,
        scope: &str,
        name: &str,
    ) -> Result<ChannelType> {
        ensure_scope(scope)?;
        let tree = self.store.read_tree(cancel).await?;
        require_type(require_app(&tree, scope)?, scope, name).cloned()
    }
}

#[cfg(test)]
mod tests {
    use crate::control_plane::TopologyStore;
    use crate::diff::ChangeKind;
    use crate::error::ErrorKind;
    use crate::meta::{Channel, ChannelType};
    use tokio_util::sync::CancellationToken;

    #[tokio::test]
    async fn type_lifecycle_tracks_connected_channels() {
        let store = TopologyStore::new();
        let cancel = CancellationToken::new();

        let changelog = store
            .types()
            .create(&cancel, "", ChannelType::new("Event", "{}"), false)
            .await
            .unwrap();
        assert_eq!(
            changelog.summary(),
            vec![(ChangeKind::TypeCreated, "Event".to_string())]
        );

        store
            .channels()
            .create(&cancel, "", Channel::new("audit", "Event"), false)
            .await
            .unwrap();
        let event = store.types().get(&cancel, "", "Event").await.unwrap();
        assert_eq!(event.connected_channels, vec!["audit".to_string()]);

        let err = store
            .types()
            .delete(&cancel, "", "Event", false)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BadRequest);

        store
            .channels()
            .delete(&cancel, "", "audit", false)
            .await
            .unwrap();
        let changelog = store
            .types()
            .delete(&cancel, "", "Event", false)
            .await
            .unwrap();
        assert_eq!(changelog.changes()[0].kind, ChangeKind::TypeDeleted);
    }

    #[tokio::test]
    async fn update_reports_schema_changes() {
        let store = TopologyStore::new();
        let cancel = CancellationToken::new();
        store
            .types()
            .create(&cancel, "", ChannelType::new("Event", "{}"), false)
            .await
            .unwrap();

        let changelog = store
            .types()
            .update(
                &cancel,
                "",
                ChannelType::new("Event", "{\"type\":\"string\"}"),
                true,
            )
            .await
            .unwrap();
        assert_eq!(changelog.changes()[0].kind, ChangeKind::TypeUpdated);
        assert_eq!(
            store.types().get(&cancel, "", "Event").await.unwrap().schema,
            "{}"
        );
    }
}
