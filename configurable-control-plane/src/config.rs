/********************************************************************************
 * Copyright (c) 2025 Contributors to the Eclipse Foundation
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
use std::path::{Path, PathBuf};
use topology_store::apply::Declarations;
use topology_store::BrokerRegistry;

#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub(crate) control_plane: ControlPlaneConfig,
    pub(crate) brokers: BrokersConfig,
    pub(crate) declarations: DeclarationsConfig,
    #[serde(default)]
    pub(crate) describe: Option<DescribeConfig>,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct ControlPlaneConfig {
    pub(crate) name: String,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct BrokersConfig {
    pub(crate) available: Vec<String>,
    #[serde(default)]
    pub(crate) default: Option<String>,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct DeclarationsConfig {
    pub(crate) file_path: String,
    #[serde(default)]
    pub(crate) dry_run: bool,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct DescribeConfig {
    pub(crate) scopes: Vec<String>,
}

impl Config {
    pub fn parse(contents: &str) -> Result<Self, Box<dyn std::error::Error>> {
        Ok(json5::from_str(contents)?)
    }

    pub fn from_file(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| format!("Unable to read config file {}: {e}", path.display()))?;
        Self::parse(&contents)
    }
}

impl BrokersConfig {
    /// Registers `available` in order, then installs `default` when given.
    pub fn build_registry(&self) -> Result<BrokerRegistry, Box<dyn std::error::Error>> {
        let registry = BrokerRegistry::new();
        for broker in &self.available {
            registry.register(broker)?;
        }
        if let Some(default) = &self.default {
            registry.set_default(default)?;
        }
        Ok(registry)
    }
}

impl DeclarationsConfig {
    /// Relative paths are taken from the directory holding the config file.
    pub fn resolve_path(&self, config_path: &Path) -> PathBuf {
        let declared = Path::new(&self.file_path);
        match config_path.parent() {
            Some(dir) if declared.is_relative() => dir.join(declared),
            _ => declared.to_path_buf(),
        }
    }

    pub fn load(&self, config_path: &Path) -> Result<Declarations, Box<dyn std::error::Error>> {
        let path = self.resolve_path(config_path);
        let contents = std::fs::read_to_string(&path)
            .map_err(|e| format!("Unable to read declarations {}: {e}", path.display()))?;
        Ok(json5::from_str(&contents)?)
    }
}
