// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use tripclip::auth::AuthGate;
use tripclip::config::Config;
use tripclip::local_store::LocalStore;
use tripclip::remote::{HttpRemoteStore, OfflineRemoteStore, RemoteStore};
use tripclip::repository::TripRepository;
use tripclip::{cli, commands};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("tripclip=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = cli::build_cli();
    let matches = cli.get_matches();

    let config = Config::load().context("Failed to load configuration")?;
    let db_path = config.database_path()?;
    let local = Arc::new(
        LocalStore::open(&db_path)
            .with_context(|| format!("Open DB at {}", db_path.display()))?,
    );
    let remote: Arc<dyn RemoteStore> = match &config.remote {
        Some(remote) => Arc::new(HttpRemoteStore::new(remote).context("Build remote client")?),
        None => Arc::new(OfflineRemoteStore),
    };
    let auth = AuthGate::with_state(config.initial_auth_state());
    let repo = TripRepository::new(local, remote, auth);

    match matches.subcommand() {
        Some(("init", _)) => {
            println!("Database initialized at {}", db_path.display());
        }
        Some(("trip", sub)) => commands::trips::handle(&repo, sub).await?,
        Some(("tx", sub)) => commands::transactions::handle(&repo, sub).await?,
        Some(("summary", sub)) => commands::summary::handle(&repo, sub).await?,
        Some(("export", sub)) => commands::exporter::handle(&repo, sub)?,
        Some(("doctor", _)) => commands::doctor::handle(&repo)?,
        Some(("profile", sub)) => commands::profile::handle(&repo, sub)?,
        Some(("categories", _)) => commands::categories::handle()?,
        Some(("sync", sub)) => commands::sync::handle(&repo, sub).await?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }

    // mirrors run in the background; let them finish before the runtime stops
    repo.wait_for_mirrors().await;
    Ok(())
}
