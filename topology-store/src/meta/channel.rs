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

//! Leaf entities owned by an App scope.

use serde::{Deserialize, Serialize};

use super::Metadata;

/// A named, typed pub/sub endpoint.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Channel {
    pub meta: Metadata,
    pub spec: ChannelSpec,
    /// Paths of Apps whose boundary resolves to this channel. Store-maintained.
    pub connected_apps: Vec<String>,
    /// Paths of Aliases targeting this channel. Store-maintained.
    pub connected_aliases: Vec<String>,
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelSpec {
    #[serde(rename = "type")]
    pub type_name: String,
    pub selected_broker: String,
    pub broker_priority_list: Vec<String>,
}

/// Channel schema.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelType {
    pub meta: Metadata,
    pub schema: String,
    /// Paths of Channels using this type. Store-maintained.
    pub connected_channels: Vec<String>,
}

/// Redirect exposing a channel under another name or scope.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Alias {
    pub meta: Metadata,
    /// Bare channel name, resolved upward from the alias scope, or a dotted
    /// absolute channel path.
    pub target: String,
}

impl Channel {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            meta: Metadata::named(name),
            spec: ChannelSpec {
                type_name: type_name.into(),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    pub fn with_priority(mut self, brokers: &[&str]) -> Self {
        self.spec.broker_priority_list = brokers.iter().map(|b| b.to_string()).collect();
        self
    }

    pub fn with_broker(mut self, broker: impl Into<String>) -> Self {
        self.spec.selected_broker = broker.into();
        self
    }

    pub(crate) fn clear_derived(&mut self) {
        self.connected_apps.clear();
        self.connected_aliases.clear();
    }
}

impl ChannelType {
    pub fn new(name: impl Into<String>, schema: impl Into<String>) -> Self {
        Self {
            meta: Metadata::named(name),
            schema: schema.into(),
            connected_channels: Vec::new(),
        }
    }
}

impl Alias {
    pub fn new(name: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            meta: Metadata::named(name),
            target: target.into(),
        }
    }
}
