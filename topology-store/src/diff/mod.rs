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

//! Structural diff between two versions of a subtree, and changelog rendering.
//!
//! [`diff`] is pure: it never touches the store and yields the same [`Changelog`]
//! for the same inputs. Records are emitted depth-first with every map walked in
//! lexicographic name order:
//!
//! 1. the App's own `AppCreated`/`AppDeleted`, or when present on both sides its
//!    annotation, node and boundary changes;
//! 2. child Apps, recursively;
//! 3. Channels, then Types, then Aliases.
//!
//! Store-maintained fields (`uuid`, `parent`, `reference` and the `connected_*`
//! lists) are not part of the structural comparison.

mod changelog;
mod engine;
mod report;

pub use changelog::{BoundaryChange, Change, ChangeDetails, ChangeKind, Changelog, FieldChange};
pub use engine::{diff, diff_alias, diff_channel, diff_type};
pub use report::{print_changelog, render_changelog};
