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

//! Error taxonomy shared by every store, diff and resolution operation.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Kind discriminant for [`TopologyError`], stable across message changes.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    NotFound,
    AlreadyExists,
    InvalidName,
    InvalidApp,
    InvalidChannel,
    InvalidType,
    InvalidAlias,
    BadRequest,
    InvalidArgs,
    Internal,
    Cancelled,
}

/// Failures surfaced by the topology store and its collaborators.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum TopologyError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("already exists: {0}")]
    AlreadyExists(String),
    #[error("invalid name: {0}")]
    InvalidName(String),
    #[error("invalid app: {0}")]
    InvalidApp(String),
    #[error("invalid channel: {0}")]
    InvalidChannel(String),
    #[error("invalid type: {0}")]
    InvalidType(String),
    #[error("invalid alias: {0}")]
    InvalidAlias(String),
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("invalid arguments: {0}")]
    InvalidArgs(String),
    #[error("internal error: {0}")]
    Internal(String),
    #[error("operation cancelled while waiting for the topology lock")]
    Cancelled,
}

impl TopologyError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            TopologyError::NotFound(_) => ErrorKind::NotFound,
            TopologyError::AlreadyExists(_) => ErrorKind::AlreadyExists,
            TopologyError::InvalidName(_) => ErrorKind::InvalidName,
            TopologyError::InvalidApp(_) => ErrorKind::InvalidApp,
            TopologyError::InvalidChannel(_) => ErrorKind::InvalidChannel,
            TopologyError::InvalidType(_) => ErrorKind::InvalidType,
            TopologyError::InvalidAlias(_) => ErrorKind::InvalidAlias,
            TopologyError::BadRequest(_) => ErrorKind::BadRequest,
            TopologyError::InvalidArgs(_) => ErrorKind::InvalidArgs,
            TopologyError::Internal(_) => ErrorKind::Internal,
            TopologyError::Cancelled => ErrorKind::Cancelled,
        }
    }

    /// Human-readable detail without the kind prefix.
    pub fn message(&self) -> &str {
        match self {
            TopologyError::NotFound(msg)
            | TopologyError::AlreadyExists(msg)
            | TopologyError::InvalidName(msg)
            | TopologyError::InvalidApp(msg)
            | TopologyError::InvalidChannel(msg)
            | TopologyError::InvalidType(msg)
            | TopologyError::InvalidAlias(msg)
            | TopologyError::BadRequest(msg)
            | TopologyError::InvalidArgs(msg)
            | TopologyError::Internal(msg) => msg,
            TopologyError::Cancelled => "cancelled",
        }
    }

    /// True for the invariant-violation kinds reported by validation.
    pub fn is_validation(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::InvalidName
                | ErrorKind::InvalidApp
                | ErrorKind::InvalidChannel
                | ErrorKind::InvalidType
                | ErrorKind::InvalidAlias
        )
    }
}

pub type Result<T> = std::result::Result<T, TopologyError>;
