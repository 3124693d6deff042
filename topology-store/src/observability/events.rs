//! Canonical structured event names used across `topology-store`.

// App lifecycle events.
pub const APP_CREATE_START: &str = "app_create_start";
pub const APP_CREATE_OK: &str = "app_create_ok";
pub const APP_CREATE_FAILED: &str = "app_create_failed";
pub const APP_UPDATE_START: &str = "app_update_start";
pub const APP_UPDATE_OK: &str = "app_update_ok";
pub const APP_UPDATE_FAILED: &str = "app_update_failed";
pub const APP_DELETE_START: &str = "app_delete_start";
pub const APP_DELETE_OK: &str = "app_delete_ok";
pub const APP_DELETE_FAILED: &str = "app_delete_failed";

// Leaf entity lifecycle events.
pub const CHANNEL_CREATE_START: &str = "channel_create_start";
pub const CHANNEL_CREATE_OK: &str = "channel_create_ok";
pub const CHANNEL_CREATE_FAILED: &str = "channel_create_failed";
pub const CHANNEL_UPDATE_START: &str = "channel_update_start";
pub const CHANNEL_UPDATE_OK: &str = "channel_update_ok";
pub const CHANNEL_UPDATE_FAILED: &str = "channel_update_failed";
pub const CHANNEL_DELETE_START: &str = "channel_delete_start";
pub const CHANNEL_DELETE_OK: &str = "channel_delete_ok";
pub const CHANNEL_DELETE_FAILED: &str = "channel_delete_failed";
pub const TYPE_CREATE_START: &str = "type_create_start";
pub const TYPE_CREATE_OK: &str = "type_create_ok";
pub const TYPE_CREATE_FAILED: &str = "type_create_failed";
pub const TYPE_UPDATE_START: &str = "type_update_start";
pub const TYPE_UPDATE_OK: &str = "type_update_ok";
pub const TYPE_UPDATE_FAILED: &str = "type_update_failed";
pub const TYPE_DELETE_START: &str = "type_delete_start";
pub const TYPE_DELETE_OK: &str = "type_delete_ok";
pub const TYPE_DELETE_FAILED: &str = "type_delete_failed";
pub const ALIAS_CREATE_START: &str = "alias_create_start";
pub const ALIAS_CREATE_OK: &str = "alias_create_ok";
pub const ALIAS_CREATE_FAILED: &str = "alias_create_failed";
pub const ALIAS_UPDATE_START: &str = "alias_update_start";
pub const ALIAS_UPDATE_OK: &str = "alias_update_ok";
pub const ALIAS_UPDATE_FAILED: &str = "alias_update_failed";
pub const ALIAS_DELETE_START: &str = "alias_delete_start";
pub const ALIAS_DELETE_OK: &str = "alias_delete_ok";
pub const ALIAS_DELETE_FAILED: &str = "alias_delete_failed";

// Lock and commit events.
pub const LOCK_WAIT_CANCELLED: &str = "lock_wait_cancelled";
pub const DRY_RUN_DISCARDED: &str = "dry_run_discarded";
pub const TREE_COMMITTED: &str = "tree_committed";
pub const UUID_ASSIGNED: &str = "uuid_assigned";

// Broker registry and resolution events.
pub const BROKER_REGISTERED: &str = "broker_registered";
pub const BROKER_DEFAULT_SET: &str = "broker_default_set";
pub const BROKER_SELECTED: &str = "broker_selected";
pub const BROKER_FALLBACK_DEFAULT: &str = "broker_fallback_default";
pub const BROKER_RESOLVE_FAILED: &str = "broker_resolve_failed";

// Apply ordering events.
pub const APPLY_COMPONENT_START: &str = "apply_component_start";
pub const APPLY_COMPONENT_OK: &str = "apply_component_ok";
pub const APPLY_COMPONENT_FAILED: &str = "apply_component_failed";
