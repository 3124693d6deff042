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

//! Store handle, lock discipline and the shared mutation pipeline.

use std::sync::Arc;
use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::control_plane::alias_memory::AliasMemory;
use crate::control_plane::app_memory::AppMemory;
use crate::control_plane::channel_memory::ChannelMemory;
use crate::control_plane::type_memory::TypeMemory;
use crate::control_plane::{staging, validation};
use crate::diff::{self, Changelog};
use crate::error::{Result, TopologyError};
use crate::meta::App;
use crate::observability::{events, fields};
use crate::routing::{resolution, BrokerRegistry};
use crate::scope;

const COMPONENT: &str = "topology_store";

/// Mutating operations, used to pick lifecycle event names.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Operation {
    CreateApp,
    UpdateApp,
    DeleteApp,
    CreateChannel,
    UpdateChannel,
    DeleteChannel,
    CreateType,
    UpdateType,
    DeleteType,
    CreateAlias,
    UpdateAlias,
    DeleteAlias,
}

impl Operation {
    /// `(start, ok, failed)` event names.
    fn events(self) -> (&'static str, &'static str, &'static str) {
        match self {
            Operation::CreateApp => (
                events::APP_CREATE_START,
                events::APP_CREATE_OK,
                events::APP_CREATE_FAILED,
            ),
            Operation::UpdateApp => (
                events::APP_UPDATE_START,
                events::APP_UPDATE_OK,
                events::APP_UPDATE_FAILED,
            ),
            Operation::DeleteApp => (
                events::APP_DELETE_START,
                events::APP_DELETE_OK,
                events::APP_DELETE_FAILED,
            ),
            Operation::CreateChannel => (
                events::CHANNEL_CREATE_START,
                events::CHANNEL_CREATE_OK,
                events::CHANNEL_CREATE_FAILED,
            ),
            Operation::UpdateChannel => (
                events::CHANNEL_UPDATE_START,
                events::CHANNEL_UPDATE_OK,
                events::CHANNEL_UPDATE_FAILED,
            ),
            Operation::DeleteChannel => (
                events::CHANNEL_DELETE_START,
                events::CHANNEL_DELETE_OK,
                events::CHANNEL_DELETE_FAILED,
            ),
            Operation::CreateType => (
                events::TYPE_CREATE_START,
                events::TYPE_CREATE_OK,
                events::TYPE_CREATE_FAILED,
            ),
            Operation::UpdateType => (
                events::TYPE_UPDATE_START,
                events::TYPE_UPDATE_OK,
                events::TYPE_UPDATE_FAILED,
            ),
            Operation::DeleteType => (
                events::TYPE_DELETE_START,
                events::TYPE_DELETE_OK,
                events::TYPE_DELETE_FAILED,
            ),
            Operation::CreateAlias => (
                events::ALIAS_CREATE_START,
                events::ALIAS_CREATE_OK,
                events::ALIAS_CREATE_FAILED,
            ),
            Operation::UpdateAlias => (
                events::ALIAS_UPDATE_START,
                events::ALIAS_UPDATE_OK,
                events::ALIAS_UPDATE_FAILED,
            ),
            Operation::DeleteAlias => (
                events::ALIAS_DELETE_START,
                events::ALIAS_DELETE_OK,
                events::ALIAS_DELETE_FAILED,
            ),
        }
    }
}

/// The part of the tree a mutation touched, looked up on both sides for diffing.
pub(crate) enum Target {
    App(String),
    Channel { scope: String, name: String },
    Type { scope: String, name: String },
    Alias { scope: String, name: String },
}

impl Target {
    fn changelog(&self, current: &App, staged: &App) -> Result<Changelog> {
        match self {
            Target::App(scope) => diff::diff(
                resolution::find_app(current, scope),
                resolution::find_app(staged, scope),
            ),
            Target::Channel { scope, name } => Ok(diff::diff_channel(
                &scope::join_scopes(scope, name)?,
                resolution::find_app(current, scope).and_then(|app| app.spec.channels.get(name)),
                resolution::find_app(staged, scope).and_then(|app| app.spec.channels.get(name)),
            )),
            Target::Type { scope, name } => Ok(diff::diff_type(
                &scope::join_scopes(scope, name)?,
                resolution::find_app(current, scope).and_then(|app| app.spec.types.get(name)),
                resolution::find_app(staged, scope).and_then(|app| app.spec.types.get(name)),
            )),
            Target::Alias { scope, name } => Ok(diff::diff_alias(
                &scope::join_scopes(scope, name)?,
                resolution::find_app(current, scope).and_then(|app| app.spec.aliases.get(name)),
                resolution::find_app(staged, scope).and_then(|app| app.spec.aliases.get(name)),
            )),
        }
    }
}

/// Rejects syntactically malformed scope arguments.
pub(crate) fn ensure_scope(scope: &str) -> Result<()> {
    if scope::is_valid_scope(scope) {
        Ok(())
    } else {
        Err(TopologyError::BadRequest(format!("malformed scope '{scope}'")))
    }
}

/// Looks up the App at `scope`, failing `NotFound`.
pub(crate) fn require_app<'a>(root: &'a App, scope: &str) -> Result<&'a App> {
    resolution::find_app(root, scope).ok_or_else(|| {
        TopologyError::NotFound(format!(
            "app '{}' does not exist",
            fields::format_scope(scope)
        ))
    })
}

/// Mutable lookup inside a staged copy, where absence is a store bug.
pub(crate) fn staged_app<'a>(staged: &'a mut App, scope: &str) -> Result<&'a mut App> {
    resolution::find_app_mut(staged, scope).ok_or_else(|| {
        TopologyError::Internal(format!(
            "staged tree lost app '{}'",
            fields::format_scope(scope)
        ))
    })
}

#[derive(Clone)]
/// Authoritative in-memory topology tree.
///
/// Cloning the handle shares the same tree. Reads run concurrently; every mutation,
/// dry-runs included, holds the exclusive lock from staging through commit.
pub struct TopologyStore {
    tree: Arc<RwLock<App>>,
    brokers: BrokerRegistry,
}

impl Default for TopologyStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TopologyStore {
    /// Creates a store holding only the root App.
    pub fn new() -> Self {
        Self::with_brokers(BrokerRegistry::new())
    }

    /// Creates an empty store that selects channel brokers from `brokers`.
    pub fn with_brokers(brokers: BrokerRegistry) -> Self {
        let mut root = App::default();
        staging::assign_identities(&mut root);
        Self {
            tree: Arc::new(RwLock::new(root)),
            brokers,
        }
    }

    /// Creates a store from a previously built tree, validating it first.
    pub fn with_root(mut root: App, brokers: BrokerRegistry) -> Result<Self> {
        staging::normalize(&mut root)?;
        validation::validate_tree(&root)?;
        staging::assign_identities(&mut root);
        staging::recompute_connections(&mut root);
        Ok(Self {
            tree: Arc::new(RwLock::new(root)),
            brokers,
        })
    }

    pub fn apps(&self) -> AppMemory<'_> {
        AppMemory::new(self)
    }

    pub fn channels(&self) -> ChannelMemory<'_> {
        ChannelMemory::new(self)
    }

    pub fn types(&self) -> TypeMemory<'_> {
        TypeMemory::new(self)
    }

    pub fn aliases(&self) -> AliasMemory<'_> {
        AliasMemory::new(self)
    }

    pub fn brokers(&self) -> &BrokerRegistry {
        &self.brokers
    }

    async fn write_tree(&self, cancel: &CancellationToken) -> Result<RwLockWriteGuard<'_, App>> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                warn!(
                    event = events::LOCK_WAIT_CANCELLED,
                    component = COMPONENT,
                    mode = "write",
                    "gave up waiting for the topology lock"
                );
                Err(TopologyError::Cancelled)
            }
            guard = self.tree.write() => Ok(guard),
        }
    }

    pub(crate) async fn read_tree(
        &self,
        cancel: &CancellationToken,
    ) -> Result<RwLockReadGuard<'_, App>> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                warn!(
                    event = events::LOCK_WAIT_CANCELLED,
                    component = COMPONENT,
                    mode = "read",
                    "gave up waiting for the topology lock"
                );
                Err(TopologyError::Cancelled)
            }
            guard = self.tree.read() => Ok(guard),
        }
    }

    /// Runs one mutation through stage, validate, diff and (unless `dry_run`) commit.
    ///
    /// `plan` receives the committed tree and a staged copy of it, applies the
    /// candidate to the copy and names the part of the tree it touched.
    pub(crate) async fn mutate<F>(
        &self,
        cancel: &CancellationToken,
        operation: Operation,
        scope: &str,
        name: &str,
        dry_run: bool,
        plan: F,
    ) -> Result<Changelog>
    where
        F: FnOnce(&App, &mut App, &BrokerRegistry) -> Result<Target>,
    {
        let (start, ok, failed) = operation.events();
        let scope_label = fields::format_scope(scope);
        debug!(
            event = start,
            component = COMPONENT,
            scope = scope_label,
            name,
            dry_run,
            "mutation requested"
        );

        let result = self.mutate_locked(cancel, dry_run, plan).await;
        match &result {
            Ok(changelog) => info!(
                event = ok,
                component = COMPONENT,
                scope = scope_label,
                name,
                dry_run,
                changes = changelog.len(),
                "mutation succeeded"
            ),
            Err(err) => warn!(
                event = failed,
                component = COMPONENT,
                scope = scope_label,
                name,
                dry_run,
                err = %err,
                "mutation rejected"
            ),
        }
        result
    }

    async fn mutate_locked<F>(
        &self,
        cancel: &CancellationToken,
        dry_run: bool,
        plan: F,
    ) -> Result<Changelog>
    where
        F: FnOnce(&App, &mut App, &BrokerRegistry) -> Result<Target>,
    {
        let mut tree = self.write_tree(cancel).await?;
        let mut staged: App = (*tree).clone();

        let target = plan(&*tree, &mut staged, &self.brokers)?;
        staging::normalize(&mut staged)?;
        validation::validate_tree(&staged)?;
        let changelog = target.changelog(&*tree, &staged)?;

        if dry_run {
            debug!(
                event = events::DRY_RUN_DISCARDED,
                component = COMPONENT,
                reason = fields::REASON_DRY_RUN,
                changes = changelog.len(),
                "staged tree discarded"
            );
            return Ok(changelog);
        }

        let assigned = staging::assign_identities(&mut staged);
        staging::recompute_connections(&mut staged);
        *tree = staged;
        debug!(
            event = events::TREE_COMMITTED,
            component = COMPONENT,
            changes = changelog.len(),
            assigned,
            "staged tree committed"
        );
        Ok(changelog)
    }
}

#[cfg(test)]
mod tests {
    use super::{ensure_scope, TopologyStore};
    use crate::error::ErrorKind;
    use crate::meta::{App, Channel, ChannelType};
    use crate::routing::BrokerRegistry;
    use std::time::Duration;
    use tokio_util::sync::CancellationToken;

    #[test]
    fn malformed_scopes_are_bad_requests() {
        assert!(ensure_scope("").is_ok());
        assert!(ensure_scope("a.b").is_ok());
        assert_eq!(ensure_scope("a..b").unwrap_err().kind(), ErrorKind::BadRequest);
    }

    #[tokio::test]
    async fn new_store_has_an_identified_root() {
        let store = TopologyStore::new();
        let root = store
            .apps()
            .get(&CancellationToken::new(), "")
            .await
            .unwrap();
        assert!(root.meta.name.is_empty());
        assert!(!root.meta.uuid.is_empty());
    }

    #[tokio::test]
    async fn with_root_validates_and_derives_connections() {
        let root = App::default().with_app(
            App::named("billing")
                .with_type(ChannelType::new("Invoice", "{}"))
                .with_channel(Channel::new("invoices", "Invoice"))
                .with_app(App::named("printer").with_input("invoices")),
        );
        let store = TopologyStore::with_root(root, BrokerRegistry::new()).unwrap();
        let channel = store
            .channels()
            .get(&CancellationToken::new(), "billing", "invoices")
            .await
            .unwrap();
        assert_eq!(channel.connected_apps, vec!["billing.printer".to_string()]);
        assert!(!channel.meta.uuid.is_empty());

        let broken = App::default().with_app(App::named("a").with_input("missing"));
        assert!(TopologyStore::with_root(broken, BrokerRegistry::new()).is_err());
    }

    #[tokio::test]
    async fn cancelled_token_wins_even_when_the_lock_is_free() {
        let store = TopologyStore::new();
        let cancel = CancellationToken::new();
        cancel.cancel();
        let err = store
            .apps()
            .create(&cancel, "", App::named("billing"), false)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Cancelled);
        assert!(store
            .apps()
            .get(&CancellationToken::new(), "billing")
            .await
            .is_err());
    }

    #[tokio::test]
    async fn waiting_writer_returns_when_cancelled() {
        let store = TopologyStore::new();
        let held = store.tree.clone();
        let guard = held.read().await;

        let cancel = CancellationToken::new();
        let waiter = {
            let store = store.clone();
            let cancel = cancel.clone();
            tokio::spawn(async move {
                store
                    .apps()
                    .create(&cancel, "", App::named("billing"), false)
                    .await
            })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        cancel.cancel();
        let result = tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .expect("waiter should return promptly")
            .expect("task should not panic");
        assert_eq!(result.unwrap_err().kind(), ErrorKind::Cancelled);
        drop(guard);

        assert!(store
            .apps()
            .get(&CancellationToken::new(), "billing")
            .await
            .is_err());
    }
}
