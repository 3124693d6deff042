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

use tokio_util::sync::CancellationToken;
use topology_store::meta::{App, Channel, ChannelType, Node};
use topology_store::{BrokerRegistry, TopologyStore};

pub const BILLING: &str = "billing";
pub const PRINTER: &str = "printer";
pub const INVOICES: &str = "invoices";
pub const INVOICE_TYPE: &str = "Invoice";

pub fn invoice_type() -> ChannelType {
    ChannelType::new(
        INVOICE_TYPE,
        r#"{"type":"object","properties":{"amount":{"type":"number"}}}"#,
    )
}

pub fn invoices_channel() -> Channel {
    Channel::new(INVOICES, INVOICE_TYPE)
}

pub fn printer_app() -> App {
    App::named(PRINTER)
        .with_input(INVOICES)
        .with_node(Node::new("registry.local/printer:1.0", 1).with_env("FORMAT", "pdf"))
}

/// `billing` App owning the `Invoice` type, the `invoices` channel and a `printer` child.
pub fn billing_app() -> App {
    App::named(BILLING)
        .with_type(invoice_type())
        .with_channel(invoices_channel())
        .with_app(printer_app())
}

/// Empty store with `memory` (default) and `kafka` brokers installed.
pub fn seeded_store() -> TopologyStore {
    let brokers = BrokerRegistry::new();
    for broker in ["memory", "kafka"] {
        brokers
            .register(broker)
            .expect("fresh registry accepts every broker once");
    }
    TopologyStore::with_brokers(brokers)
}

/// Seeded store with [`billing_app`] committed under the root.
pub async fn billing_store() -> TopologyStore {
    let store = seeded_store();
    store
        .apps()
        .create(&CancellationToken::new(), "", billing_app(), false)
        .await
        .expect("billing fixture is valid");
    store
}
