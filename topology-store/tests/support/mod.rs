#![allow(dead_code)]

use tokio_util::sync::CancellationToken;
use topology_store::meta::{App, Channel, ChannelType};
use topology_store::TopologyStore;

pub(crate) fn token() -> CancellationToken {
    CancellationToken::new()
}

/// Deep copy of the whole committed tree.
pub(crate) async fn snapshot(store: &TopologyStore) -> App {
    store
        .apps()
        .get(&token(), "")
        .await
        .expect("root is always readable")
}

/// Store holding `billing` with the `Invoice` type and the `invoices` channel only.
pub(crate) async fn ledger_store() -> TopologyStore {
    let store = topology_test_utils::seeded_store();
    let billing = App::named("billing")
        .with_type(ChannelType::new("Invoice", r#"{"type":"object"}"#))
        .with_channel(Channel::new("invoices", "Invoice"));
    store
        .apps()
        .create(&token(), "", billing, false)
        .await
        .expect("ledger fixture is valid");
    store
}

pub(crate) fn assert_same_tree(before: &App, after: &App) {
    assert_eq!(
        serde_json::to_string(before).expect("tree serializes"),
        serde_json::to_string(after).expect("tree serializes"),
    );
}
