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

mod test_logging;
pub use test_logging::init_logging;

mod topology_fixtures;
pub use topology_fixtures::{
    billing_app, billing_store, invoices_channel, invoice_type, printer_app, seeded_store,
    BILLING, INVOICES, INVOICE_TYPE, PRINTER,
};
