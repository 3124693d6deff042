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

mod config;

use crate::config::Config;
use clap::Parser;
use std::io::Write;
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;
use topology_store::apply::{apply_declarations, ApplyAction, Applied};
use topology_store::{print_changelog, scope, TopologyStore};
use tracing::info;

#[derive(Parser)]
#[command()]
struct ControlPlaneArgs {
    #[arg(short, long, value_name = "FILE")]
    config: PathBuf,
    /// Preview every declaration without committing it.
    #[arg(long)]
    dry_run: bool,
}

fn write_applied<W: Write>(applied: &Applied, out: &mut W) -> std::io::Result<()> {
    let action = match applied.action {
        ApplyAction::Created => "created",
        ApplyAction::Updated => "updated",
    };
    let path = scope::join_scopes(&applied.scope, &applied.name)
        .unwrap_or_else(|_| applied.name.clone());
    writeln!(out, "{} {} {}", applied.kind, path, action)?;
    print_changelog(&applied.changelog, out)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = tracing_subscriber::fmt::try_init();

    let args = ControlPlaneArgs::parse();
    let config = Config::from_file(&args.config)?;

    info!("Started configurable-control-plane {}", config.control_plane.name);

    let brokers = config.brokers.build_registry()?;
    info!(
        "Installed brokers {:?}, default {:?}",
        brokers.available(),
        brokers.default_broker()
    );
    let store = TopologyStore::with_brokers(brokers);

    let declarations = config.declarations.load(&args.config)?;
    let dry_run = args.dry_run || config.declarations.dry_run;
    info!(
        "Applying {} declarations (dry run: {dry_run})",
        declarations.len()
    );

    let cancel = CancellationToken::new();
    let applied = apply_declarations(&store, &cancel, &declarations, dry_run).await?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    for item in &applied {
        write_applied(item, &mut out)?;
    }

    if let Some(describe) = &config.describe {
        for scope in &describe.scopes {
            let app = store.apps().get(&cancel, scope).await?;
            writeln!(out, "{}", serde_json::to_string_pretty(&app)?)?;
        }
    }

    Ok(())
}
