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

//! Entity model for the dApp topology tree.
//!
//! Every collection is an ordered map or set keyed by name, so sibling uniqueness is
//! structural and iteration is always lexicographic. `Clone` on any entity is a full,
//! independent deep copy of the subtree it owns.

mod app;
mod channel;

pub use app::{App, AppSpec, Boundary, BoundaryDirection, Node};
pub use channel::{Alias, Channel, ChannelSpec, ChannelType};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::Result;
use crate::scope;

/// Identity and placement shared by every entity.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Metadata {
    /// Leaf identifier, unique among siblings.
    pub name: String,
    /// Scope of the owning App; empty for the root and its direct contents.
    pub parent: String,
    /// Fully joined path, maintained by the store.
    pub reference: String,
    pub annotations: BTreeMap<String, String>,
    /// Assigned once at first commit, empty until then.
    pub uuid: String,
}

impl Metadata {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_annotation(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.annotations.insert(key.into(), value.into());
        self
    }

    /// Full scope path of the entity, joined from `parent` and `name`.
    pub fn path(&self) -> Result<String> {
        scope::join_scopes(&self.parent, &self.name)
    }

    pub fn has_identity(&self) -> bool {
        !self.uuid.is_empty()
    }
}
