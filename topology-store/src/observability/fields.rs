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

//! Canonical structured field keys and value-format helpers.

pub const EVENT: &str = "event";
pub const COMPONENT: &str = "component";
pub const SCOPE: &str = "scope";
pub const NAME: &str = "name";
pub const DRY_RUN: &str = "dry_run";
pub const CHANGES: &str = "changes";
pub const BROKER: &str = "broker";
pub const REASON: &str = "reason";
pub const ERR: &str = "err";

pub const ROOT: &str = "<root>";
pub const NONE: &str = "none";
pub const REASON_DRY_RUN: &str = "dry_run";
pub const REASON_NO_PRIORITY_MATCH: &str = "no_priority_match";

/// Formats a scope for log output, naming the root explicitly.
pub fn format_scope(scope: &str) -> &str {
    if scope.is_empty() {
        ROOT
    } else {
        scope
    }
}

/// Formats an optional value, falling back to [`NONE`].
pub fn format_optional(value: Option<&str>) -> &str {
    value.unwrap_or(NONE)
}

#[cfg(test)]
mod tests {
    use super::{format_optional, format_scope, NONE, ROOT};

    #[test]
    fn format_scope_names_the_root() {
        assert_eq!(format_scope(""), ROOT);
        assert_eq!(format_scope("billing"), "billing");
    }

    #[test]
    fn format_optional_falls_back_to_none() {
        assert_eq!(format_optional(None), NONE);
        assert_eq!(format_optional(Some("kafka")), "kafka");
    }
}
