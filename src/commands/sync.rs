// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::repository::TripRepository;
use anyhow::{Context, Result};

pub async fn handle(repo: &TripRepository, m: &clap::ArgMatches) -> Result<()> {
    if let Some(("pull", _)) = m.subcommand() {
        let report = repo
            .pull_remote()
            .await
            .context("Remote pull failed; local data is unchanged for anything not yet applied")?;
        println!(
            "Pulled {} trips, {} transactions; {} deleted, {} skipped",
            report.trips_applied, report.transactions_applied, report.deleted, report.skipped
        );
    }
    Ok(())
}
