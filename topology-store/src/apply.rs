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

//! Batch apply of declared components in dependency order.
//!
//! Components are applied scope by scope, shallowest first, so an App exists
//! before anything declared inside it. Within one scope Types precede Channels,
//! which precede Apps. Aliases go last. Each component is created when absent and updated otherwise; the
//! batch stops at the first failure. With `dry_run` every component is previewed
//! against the committed tree on its own.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::control_plane::TopologyStore;
use crate::diff::Changelog;
use crate::error::{Result, TopologyError};
use crate::meta::{Alias, App, Channel, ChannelType, Metadata};
use crate::observability::{events, fields};
use crate::scope;

const COMPONENT: &str = "apply";

/// One declared entity. Its scope is `meta.parent`.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Component {
    App(App),
    Channel(Channel),
    Type(ChannelType),
    Alias(Alias),
}

#[derive(Clone, Copy, Debug, Eq, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentKind {
    Type,
    Channel,
    App,
    Alias,
}

impl Display for ComponentKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ComponentKind::Type => write!(f, "type"),
            ComponentKind::Channel => write!(f, "channel"),
            ComponentKind::App => write!(f, "app"),
            ComponentKind::Alias => write!(f, "alias"),
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplyAction {
    Created,
    Updated,
}

impl Component {
    pub fn kind(&self) -> ComponentKind {
        match self {
            Component::App(_) => ComponentKind::App,
            Component::Channel(_) => ComponentKind::Channel,
            Component::Type(_) => ComponentKind::Type,
            Component::Alias(_) => ComponentKind::Alias,
        }
    }

    pub fn meta(&self) -> &Metadata {
        match self {
            Component::App(app) => &app.meta,
            Component::Channel(channel) => &channel.meta,
            Component::Type(channel_type) => &channel_type.meta,
            Component::Alias(alias) => &alias.meta,
        }
    }

    fn order_key(&self) -> (bool, usize, ComponentKind) {
        let kind = self.kind();
        let depth = scope::segments(&self.meta().parent).count();
        (kind == ComponentKind::Alias, depth, kind)
    }
}

/// Outcome of applying one component.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Applied {
    pub kind: ComponentKind,
    pub scope: String,
    pub name: String,
    pub action: ApplyAction,
    pub changelog: Changelog,
}

/// A batch of declared components, kept in declaration order.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Declarations {
    components: Vec<Component>,
}

impl Declarations {
    pub fn new(components: Vec<Component>) -> Self {
        Self { components }
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Components in apply order; ties keep declaration order.
    pub fn ordered(&self) -> Vec<&Component> {
        let mut ordered: Vec<&Component> = self.components.iter().collect();
        ordered.sort_by_key(|component| component.order_key());
        ordered
    }
}

fn exists<T>(lookup: Result<T>) -> Result<bool> {
    match lookup {
        Ok(_) => Ok(true),
        Err(TopologyError::NotFound(_)) => Ok(false),
        Err(err) => Err(err),
    }
}

/// Applies every component of `declarations` in dependency order.
pub async fn apply_declarations(
    store: &TopologyStore,
    cancel: &CancellationToken,
    declarations: &Declarations,
    dry_run: bool,
) -> Result<Vec<Applied>> {
    let mut applied = Vec::with_capacity(declarations.len());
    for component in declarations.ordered() {
        let meta = component.meta();
        let kind = component.kind();
        debug!(
            event = events::APPLY_COMPONENT_START,
            component = COMPONENT,
            kind = %kind,
            scope = fields::format_scope(&meta.parent),
            name = meta.name.as_str(),
            dry_run,
            "applying component"
        );
        match apply_component(store, cancel, component.clone(), dry_run).await {
            Ok(outcome) => {
                info!(
                    event = events::APPLY_COMPONENT_OK,
                    component = COMPONENT,
                    kind = %kind,
                    scope = fields::format_scope(&outcome.scope),
                    name = outcome.name.as_str(),
                    changes = outcome.changelog.len(),
                    "component applied"
                );
                applied.push(outcome);
            }
            Err(err) => {
                warn!(
                    event = events::APPLY_COMPONENT_FAILED,
                    component = COMPONENT,
                    kind = %kind,
                    scope = fields::format_scope(&meta.parent),
                    name = meta.name.as_str(),
                    err = %err,
                    "component rejected, stopping batch"
                );
                return Err(err);
            }
        }
    }
    Ok(applied)
}

async fn apply_component(
    store: &TopologyStore,
    cancel: &CancellationToken,
    component: Component,
    dry_run: bool,
) -> Result<Applied> {
    let kind = component.kind();
    let scope = component.meta().parent.clone();
    let name = component.meta().name.clone();

    let (action, changelog) = match component {
        Component::Type(channel_type) => {
            if exists(store.types().get(cancel, &scope, &name).await)? {
                let changelog = store
                    .types()
                    .update(cancel, &scope, channel_type, dry_run)
                    .await?;
                (ApplyAction::Updated, changelog)
            } else {
                let changelog = store
                    .types()
                    .create(cancel, &scope, channel_type, dry_run)
                    .await?;
                (ApplyAction::Created, changelog)
            }
        }
        Component::Channel(channel) => {
            if exists(store.channels().get(cancel, &scope, &name).await)? {
                let changelog = store
                    .channels()
                    .update(cancel, &scope, channel, dry_run)
                    .await?;
                (ApplyAction::Updated, changelog)
            } else {
                let changelog = store
                    .channels()
                    .create(cancel, &scope, channel, dry_run)
                    .await?;
                (ApplyAction::Created, changelog)
            }
        }
        Component::App(app) => {
            let path = scope::join_scopes(&scope, &name)?;
            if exists(store.apps().get(cancel, &path).await)? {
                let changelog = store
                    .apps()
                    .update(cancel, &path, app, dry_run)
                    .await?;
                (ApplyAction::Updated, changelog)
            } else {
                let changelog = store
                    .apps()
                    .create(cancel, &scope, app, dry_run)
                    .await?;
                (ApplyAction::Created, changelog)
            }
        }
        Component::Alias(alias) => {
            if exists(store.aliases().get(cancel, &scope, &name).await)? {
                let changelog = store
                    .aliases()
                    .update(cancel, &scope, alias, dry_run)
                    .await?;
                (ApplyAction::Updated, changelog)
            } else {
                let changelog = store
                    .aliases()
                    .create(cancel, &scope, alias, dry_run)
                    .await?;
                (ApplyAction::Created, changelog)
            }
        }
    };

    Ok(Applied {
        kind,
        scope,
        name,
        action,
        changelog,
    })
}

#[cfg(test)]
mod tests {
    use super::{apply_declarations, ApplyAction, Component, ComponentKind, Declarations};
    use crate::control_plane::TopologyStore;
    use crate::error::ErrorKind;
    use crate::meta::{Alias, App, Channel, ChannelType};
    use tokio_util::sync::CancellationToken;

    fn app_in(parent: &str, mut app: App) -> Component {
        app.meta.parent = parent.to_string();
        Component::App(app)
    }

    fn channel_in(parent: &str, mut channel: Channel) -> Component {
        channel.meta.parent = parent.to_string();
        Component::Channel(channel)
    }

    fn type_in(parent: &str, mut channel_type: ChannelType) -> Component {
        channel_type.meta.parent = parent.to_string();
        Component::Type(channel_type)
    }

    fn alias_in(parent: &str, mut alias: Alias) -> Component {
        alias.meta.parent = parent.to_string();
        Component::Alias(alias)
    }

    #[test]
    fn ordering_follows_scope_depth_then_kind() {
        let declarations = Declarations::new(vec![
            alias_in("billing", Alias::new("bills", "invoices")),
            app_in("billing", App::named("printer").with_input("invoices")),
            type_in("billing", ChannelType::new("Receipt", "{}")),
            channel_in("", Channel::new("invoices", "Invoice")),
            app_in("", App::named("billing")),
            type_in("", ChannelType::new("Invoice", "{}")),
        ]);
        let ordered: Vec<(ComponentKind, &str)> = declarations
            .ordered()
            .iter()
            .map(|component| (component.kind(), component.meta().name.as_str()))
            .collect();
        assert_eq!(
            ordered,
            vec![
                (ComponentKind::Type, "Invoice"),
                (ComponentKind::Channel, "invoices"),
                (ComponentKind::App, "billing"),
                (ComponentKind::Type, "Receipt"),
                (ComponentKind::App, "printer"),
                (ComponentKind::Alias, "bills"),
            ]
        );
    }

    #[tokio::test]
    async fn components_need_their_scope_to_exist() {
        let store = TopologyStore::new();
        let declarations = Declarations::new(vec![type_in(
            "billing",
            ChannelType::new("Invoice", "{}"),
        )]);
        let err = apply_declarations(&store, &CancellationToken::new(), &declarations, false)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn second_apply_updates_without_changes() {
        let store = TopologyStore::new();
        let cancel = CancellationToken::new();
        let declarations = Declarations::new(vec![
            alias_in("", Alias::new("bills", "invoices")),
            app_in("", App::named("billing").with_input("invoices")),
            channel_in("", Channel::new("invoices", "Invoice")),
            type_in("", ChannelType::new("Invoice", "{}")),
        ]);

        let first = apply_declarations(&store, &cancel, &declarations, false)
            .await
            .unwrap();
        assert_eq!(first.len(), 4);
        assert!(first
            .iter()
            .all(|applied| applied.action == ApplyAction::Created));

        let second = apply_declarations(&store, &cancel, &declarations, false)
            .await
            .unwrap();
        assert!(second
            .iter()
            .all(|applied| applied.action == ApplyAction::Updated && applied.changelog.is_empty()));
    }

    #[tokio::test]
    async fn dry_run_previews_each_component_without_committing() {
        let store = TopologyStore::new();
        let cancel = CancellationToken::new();
        let declarations = Declarations::new(vec![type_in("", ChannelType::new("Invoice", "{}"))]);

        let applied = apply_declarations(&store, &cancel, &declarations, true)
            .await
            .unwrap();
        assert_eq!(applied[0].changelog.len(), 1);
        assert!(store.types().get(&cancel, "", "Invoice").await.is_err());
    }

    #[test]
    fn components_deserialize_from_tagged_documents() {
        let declarations: Declarations = serde_json::from_str(
            r#"[
                {"kind": "channel", "meta": {"name": "invoices", "parent": "billing"}, "spec": {"type": "Invoice"}},
                {"kind": "type", "meta": {"name": "Invoice", "parent": "billing"}, "schema": "{}"}
            ]"#,
        )
        .unwrap();
        assert_eq!(declarations.len(), 2);
        match declarations.ordered()[1] {
            Component::Channel(channel) => assert_eq!(channel.spec.type_name, "Invoice"),
            other => panic!("unexpected component {other:?}"),
        }
    }
}
