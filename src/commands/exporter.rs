// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::repository::TripRepository;
use anyhow::{Result, anyhow, bail};
use serde_json::json;

pub fn handle(repo: &TripRepository, sub: &clap::ArgMatches) -> Result<()> {
    let trip_id = sub.get_one::<String>("trip").unwrap().trim();
    let fmt = sub.get_one::<String>("format").unwrap().to_lowercase();
    let out = sub.get_one::<String>("out").unwrap();
    export_transactions(repo, trip_id, &fmt, out)?;
    println!("Exported transactions to {}", out);
    Ok(())
}

pub fn export_transactions(repo: &TripRepository, trip_id: &str, fmt: &str, out: &str) -> Result<()> {
    let trip = repo
        .trip(trip_id)?
        .ok_or_else(|| anyhow!("Trip '{}' not found", trip_id))?;
    let ccy = trip.currency.code().to_string();
    let mut txs = repo.local().transactions_for(trip_id)?;
    // oldest first reads naturally in a spreadsheet
    txs.reverse();

    match fmt {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)?;
            wtr.write_record([
                "date", "type", "amount", "currency", "category", "payment_method",
                "exclude_from_budget", "latitude", "longitude", "notes",
            ])?;
            for tx in &txs {
                wtr.write_record([
                    tx.date.to_string(),
                    tx.r#type.as_str().to_string(),
                    tx.amount.to_string(),
                    ccy.clone(),
                    tx.category.name().to_string(),
                    tx.payment_method.name().to_string(),
                    tx.exclude_from_budget.to_string(),
                    tx.location.map(|p| p.latitude.to_string()).unwrap_or_default(),
                    tx.location.map(|p| p.longitude.to_string()).unwrap_or_default(),
                    tx.notes.clone(),
                ])?;
            }
            wtr.flush()?;
        }
        "json" => {
            let items: Vec<_> = txs
                .iter()
                .map(|tx| {
                    json!({
                        "date": tx.date.to_string(),
                        "type": tx.r#type.as_str(),
                        "amount": tx.amount.to_string(),
                        "currency": ccy,
                        "category": tx.category.name(),
                        "payment_method": tx.payment_method.name(),
                        "exclude_from_budget": tx.exclude_from_budget,
                        "location": tx.location,
                        "notes": tx.notes,
                    })
                })
                .collect();
            std::fs::write(out, serde_json::to_string_pretty(&items)?)?;
        }
        _ => bail!("Unknown format: {} (use csv|json)", fmt),
    }
    Ok(())
}
