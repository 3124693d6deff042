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

//! # topology-store
//!
//! `topology-store` keeps the authoritative in-memory tree of a dApp topology (Apps
//! connected by typed Channels, routed over pluggable brokers) and reports the
//! structural changelog every mutation produces.
//!
//! Typical usage goes through [`TopologyStore`] and its scoped views
//! ([`TopologyStore::apps`], [`TopologyStore::channels`], [`TopologyStore::types`],
//! [`TopologyStore::aliases`]). Every operation takes a
//! [`CancellationToken`](tokio_util::sync::CancellationToken) that aborts a pending
//! lock wait.
//!
//! ```
//! use tokio_util::sync::CancellationToken;
//! use topology_store::meta::{App, Channel, ChannelType};
//! use topology_store::{print_changelog, ChangeKind, ErrorKind, TopologyStore};
//!
//! # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
//! let store = TopologyStore::new();
//! let cancel = CancellationToken::new();
//!
//! let changelog = store
//!     .apps()
//!     .create(&cancel, "", App::named("billing"), false)
//!     .await
//!     .unwrap();
//! assert_eq!(changelog.summary(), vec![(ChangeKind::AppCreated, "billing".to_string())]);
//!
//! store
//!     .types()
//!     .create(&cancel, "billing", ChannelType::new("Invoice", "{}"), false)
//!     .await
//!     .unwrap();
//! let rejected = store
//!     .channels()
//!     .create(&cancel, "billing", Channel::new("invoices", "Unknown"), false)
//!     .await
//!     .unwrap_err();
//! assert_eq!(rejected.kind(), ErrorKind::InvalidChannel);
//!
//! let changelog = store
//!     .channels()
//!     .create(&cancel, "billing", Channel::new("invoices", "Invoice"), false)
//!     .await
//!     .unwrap();
//! let mut out = Vec::new();
//! print_changelog(&changelog, &mut out).unwrap();
//! assert_eq!(String::from_utf8(out).unwrap(), "ChannelCreated   billing.invoices\n");
//! # });
//! ```
//!
//! ## Internal architecture map
//!
//! - Scope resolver: pure dotted-path syntax helpers
//! - Entity model: Apps, Channels, Types, Aliases and their metadata
//! - Control plane: store handle, lock discipline and the staged mutation pipeline
//! - Routing: type/boundary/alias resolution and broker selection
//! - Diff: structural changelog computation and rendering
//! - Apply: dependency-ordered batch create-or-update
//!
//! ## Observability model
//!
//! The workspace uses `tracing` for logs/events.
//! Library code emits events/spans and does not unconditionally initialize a global
//! subscriber. Binaries/tests are responsible for one-time `tracing_subscriber`
//! initialization at process boundaries.

pub mod apply;
mod control_plane;
pub use control_plane::{AliasMemory, AppMemory, ChannelMemory, TopologyStore, TypeMemory};

pub mod diff;
pub use diff::{
    diff, print_changelog, render_changelog, Change, ChangeDetails, ChangeKind, Changelog,
};

mod error;
pub use error::{ErrorKind, Result, TopologyError};

pub mod meta;

#[doc(hidden)]
pub mod observability;

mod routing;
pub use routing::{BrokerRegistry, BrokerResolution};

pub mod scope;
