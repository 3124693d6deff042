//! Routing layer.
//!
//! Owns name resolution over the tree (types, boundary channels, alias targets)
//! and broker selection for channels. Sidecars reach this layer through
//! [`BrokerResolution`].

pub(crate) mod broker_registry;
pub(crate) mod broker_resolution;
pub(crate) mod resolution;

pub use broker_registry::BrokerRegistry;
pub use broker_resolution::BrokerResolution;
