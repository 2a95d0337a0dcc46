// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::TripCurrency;
use crate::repository::TripRepository;
use crate::settings::{DEFAULT_CURRENCY, DISPLAY_NAME, EMAIL};
use crate::utils::pretty_table;
use anyhow::{Result, bail};

pub fn handle(repo: &TripRepository, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("set", sub)) => {
            let key = sub.get_one::<String>("key").unwrap().trim();
            let raw = sub.get_one::<String>("value").unwrap().trim();
            let value = normalize(key, raw)?;
            repo.local().set_setting(key, &value)?;
            println!("{} set to {}", key, value);
        }
        Some(("show", _)) => {
            let rows = repo
                .local()
                .settings()?
                .into_iter()
                .map(|(k, v)| vec![k, v])
                .collect();
            println!("{}", pretty_table(&["Key", "Value"], rows));
        }
        _ => {}
    }
    Ok(())
}

pub fn normalize(key: &str, value: &str) -> Result<String> {
    match key {
        DEFAULT_CURRENCY => Ok(TripCurrency::parse(value).code().to_string()),
        DISPLAY_NAME => Ok(value.to_string()),
        EMAIL => {
            if !value.contains('@') {
                bail!("Invalid email '{}'", value);
            }
            Ok(value.to_string())
        }
        _ => bail!(
            "Unknown profile key '{}' (use {}, {} or {})",
            key,
            DEFAULT_CURRENCY,
            DISPLAY_NAME,
            EMAIL
        ),
    }
}
