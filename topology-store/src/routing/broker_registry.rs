//! Installed-broker registry and per-channel broker selection.

use arc_swap::ArcSwap;
use std::sync::Arc;
use tracing::{debug, info};

use crate::error::{Result, TopologyError};
use crate::meta::{App, Channel};
use crate::observability::{events, fields};

const COMPONENT: &str = "broker_registry";

#[derive(Default)]
struct BrokerRegistrySnapshot {
    version: u64,
    /// Registration order.
    brokers: Vec<String>,
    default: Option<String>,
}

impl BrokerRegistrySnapshot {
    fn contains(&self, broker: &str) -> bool {
        self.brokers.iter().any(|installed| installed == broker)
    }
}

#[derive(Clone, Default)]
/// Set of installed brokers plus the default used when no priority entry matches.
///
/// Readers see a consistent snapshot; writers publish a new one atomically.
pub struct BrokerRegistry {
    snapshot: Arc<ArcSwap<BrokerRegistrySnapshot>>,
}

impl BrokerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `broker`. The first registered broker becomes the default.
    pub fn register(&self, broker: &str) -> Result<()> {
        let mut outcome = Ok(());
        let previous = self.snapshot.rcu(|current| {
            if current.contains(broker) {
                outcome = Err(TopologyError::AlreadyExists(format!(
                    "broker '{broker}' is already installed"
                )));
                return Arc::clone(current);
            }
            outcome = Ok(());
            let mut brokers = current.brokers.clone();
            brokers.push(broker.to_string());
            Arc::new(BrokerRegistrySnapshot {
                version: current.version + 1,
                brokers,
                default: current.default.clone().or_else(|| Some(broker.to_string())),
            })
        });
        outcome?;
        info!(
            event = events::BROKER_REGISTERED,
            component = COMPONENT,
            broker,
            snapshot_version = previous.version + 1,
            "broker installed"
        );
        Ok(())
    }

    /// Makes an installed broker the default.
    pub fn set_default(&self, broker: &str) -> Result<()> {
        let mut outcome = Ok(());
        self.snapshot.rcu(|current| {
            if !current.contains(broker) {
                outcome = Err(TopologyError::NotFound(format!(
                    "broker '{broker}' is not installed"
                )));
                return Arc::clone(current);
            }
            outcome = Ok(());
            Arc::new(BrokerRegistrySnapshot {
                version: current.version + 1,
                brokers: current.brokers.clone(),
                default: Some(broker.to_string()),
            })
        });
        outcome?;
        info!(
            event = events::BROKER_DEFAULT_SET,
            component = COMPONENT,
            broker,
            "default broker changed"
        );
        Ok(())
    }

    /// Installed brokers in registration order.
    pub fn available(&self) -> Vec<String> {
        self.snapshot.load().brokers.clone()
    }

    pub fn default_broker(&self) -> Option<String> {
        self.snapshot.load().default.clone()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshot.load().brokers.is_empty()
    }

    /// Picks the first installed entry of `priority`, else the default.
    pub fn select(&self, priority: &[String]) -> Option<String> {
        let snapshot = self.snapshot.load();
        if let Some(broker) = priority.iter().find(|broker| snapshot.contains(broker)) {
            return Some(broker.clone());
        }
        if !priority.is_empty() {
            debug!(
                event = events::BROKER_FALLBACK_DEFAULT,
                component = COMPONENT,
                reason = fields::REASON_NO_PRIORITY_MATCH,
                broker = fields::format_optional(snapshot.default.as_deref()),
                "no prioritized broker installed, using default"
            );
        }
        snapshot.default.clone()
    }

    /// Sets `Spec.SelectedBroker` of `channel` when any broker is installed.
    pub(crate) fn select_for_channel(&self, channel: &mut Channel) {
        if let Some(broker) = self.select(&channel.spec.broker_priority_list) {
            debug!(
                event = events::BROKER_SELECTED,
                component = COMPONENT,
                name = channel.meta.name.as_str(),
                broker = broker.as_str(),
                "broker selected for channel"
            );
            channel.spec.selected_broker = broker;
        }
    }

    /// Selects brokers for every channel in `app` and its descendants.
    pub(crate) fn select_for_subtree(&self, app: &mut App) {
        if self.is_empty() {
            return;
        }
        for channel in app.spec.channels.values_mut() {
            self.select_for_channel(channel);
        }
        for child in app.spec.apps.values_mut() {
            self.select_for_subtree(child);
        }
    }

    #[cfg(test)]
    pub(crate) fn current_version(&self) -> u64 {
        self.snapshot.load().version
    }
}

#[cfg(test)]
mod tests {
    use super::BrokerRegistry;
    use crate::error::ErrorKind;
    use crate::meta::{App, Channel};

    fn brokers(names: &[&str]) -> Vec<String> {
        names.iter().map(|name| name.to_string()).collect()
    }

    #[test]
    fn first_registered_broker_becomes_default() {
        let registry = BrokerRegistry::new();
        assert_eq!(registry.default_broker(), None);

        registry.register("memory").unwrap();
        registry.register("kafka").unwrap();
        assert_eq!(registry.default_broker().as_deref(), Some("memory"));
        assert_eq!(registry.available(), brokers(&["memory", "kafka"]));
        assert_eq!(registry.current_version(), 2);
    }

    #[test]
    fn duplicate_registration_keeps_previous_snapshot() {
        let registry = BrokerRegistry::new();
        registry.register("kafka").unwrap();
        let err = registry.register("kafka").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AlreadyExists);
        assert_eq!(registry.current_version(), 1);
        assert_eq!(registry.available().len(), 1);
    }

    #[test]
    fn set_default_requires_an_installed_broker() {
        let registry = BrokerRegistry::new();
        registry.register("memory").unwrap();
        assert_eq!(
            registry.set_default("kafka").unwrap_err().kind(),
            ErrorKind::NotFound
        );
        registry.register("kafka").unwrap();
        registry.set_default("kafka").unwrap();
        assert_eq!(registry.default_broker().as_deref(), Some("kafka"));
    }

    #[test]
    fn select_prefers_priority_order_then_default() {
        let registry = BrokerRegistry::new();
        assert_eq!(registry.select(&brokers(&["kafka"])), None);

        registry.register("memory").unwrap();
        registry.register("kafka").unwrap();
        assert_eq!(
            registry.select(&brokers(&["nats", "kafka", "memory"])).as_deref(),
            Some("kafka")
        );
        assert_eq!(registry.select(&brokers(&["nats"])).as_deref(), Some("memory"));
        assert_eq!(registry.select(&[]).as_deref(), Some("memory"));
    }

    #[test]
    fn subtree_selection_reaches_nested_channels() {
        let registry = BrokerRegistry::new();
        let mut app = App::named("a")
            .with_channel(Channel::new("c", "T").with_broker("declared"))
            .with_app(App::named("b").with_channel(Channel::new("d", "T").with_priority(&["kafka"])));

        registry.select_for_subtree(&mut app);
        assert_eq!(app.spec.channels["c"].spec.selected_broker, "declared");

        registry.register("memory").unwrap();
        registry.register("kafka").unwrap();
        registry.select_for_subtree(&mut app);
        assert_eq!(app.spec.channels["c"].spec.selected_broker, "memory");
        assert_eq!(
            app.spec.apps["b"].spec.channels["d"].spec.selected_broker,
            "kafka"
        );
    }
}
