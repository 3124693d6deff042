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
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::{Display, Formatter};

use super::{Alias, Channel, ChannelType, Metadata};

/// A node of the topology tree ("dApp").
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct App {
    pub meta: Metadata,
    pub spec: AppSpec,
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSpec {
    pub apps: BTreeMap<String, App>,
    pub channels: BTreeMap<String, Channel>,
    pub types: BTreeMap<String, ChannelType>,
    pub aliases: BTreeMap<String, Alias>,
    pub boundary: Boundary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node: Option<Node>,
}

/// Channel names an App consumes and produces.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Boundary {
    pub input: BTreeSet<String>,
    pub output: BTreeSet<String>,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundaryDirection {
    Input,
    Output,
}

impl Display for BoundaryDirection {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            BoundaryDirection::Input => write!(f, "Spec.Boundary.Input"),
            BoundaryDirection::Output => write!(f, "Spec.Boundary.Output"),
        }
    }
}

/// Leaf execution descriptor.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Node {
    pub image: String,
    pub replicas: u32,
    pub environment: BTreeMap<String, String>,
}

impl Boundary {
    pub fn names(&self, direction: BoundaryDirection) -> &BTreeSet<String> {
        match direction {
            BoundaryDirection::Input => &self.input,
            BoundaryDirection::Output => &self.output,
        }
    }

    /// Every boundary name, inputs first, each tagged with its direction.
    pub fn entries(&self) -> impl Iterator<Item = (BoundaryDirection, &str)> {
        self.input
            .iter()
            .map(|name| (BoundaryDirection::Input, name.as_str()))
            .chain(
                self.output
                    .iter()
                    .map(|name| (BoundaryDirection::Output, name.as_str())),
            )
    }

    pub fn is_empty(&self) -> bool {
        self.input.is_empty() && self.output.is_empty()
    }
}

impl App {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            meta: Metadata::named(name),
            spec: AppSpec::default(),
        }
    }

    pub fn with_app(mut self, app: App) -> Self {
        self.spec.apps.insert(app.meta.name.clone(), app);
        self
    }

    pub fn with_channel(mut self, channel: Channel) -> Self {
        self.spec
            .channels
            .insert(channel.meta.name.clone(), channel);
        self
    }

    pub fn with_type(mut self, channel_type: ChannelType) -> Self {
        self.spec
            .types
            .insert(channel_type.meta.name.clone(), channel_type);
        self
    }

    pub fn with_alias(mut self, alias: Alias) -> Self {
        self.spec.aliases.insert(alias.meta.name.clone(), alias);
        self
    }

    pub fn with_input(mut self, name: impl Into<String>) -> Self {
        self.spec.boundary.input.insert(name.into());
        self
    }

    pub fn with_output(mut self, name: impl Into<String>) -> Self {
        self.spec.boundary.output.insert(name.into());
        self
    }

    pub fn with_node(mut self, node: Node) -> Self {
        self.spec.node = Some(node);
        self
    }
}

impl Node {
    pub fn new(image: impl Into<String>, replicas: u32) -> Self {
        Self {
            image: image.into(),
            replicas,
            environment: BTreeMap::new(),
        }
    }

    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.environment.insert(key.into(), value.into());
        self
    }
}
