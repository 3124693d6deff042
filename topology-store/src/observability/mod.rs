//! Structured observability vocabulary shared across `topology-store`.

pub mod events;
pub mod fields;
