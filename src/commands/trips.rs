// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{Trip, TripCurrency};
use crate::repository::{TripRepository, resolve_active};
use crate::utils::{maybe_print_json, opt_date, opt_money, parse_date, parse_decimal, pretty_table};
use anyhow::{Result, anyhow};

pub async fn handle(repo: &TripRepository, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(repo, sub).await?,
        Some(("list", sub)) => list(repo, sub)?,
        Some(("edit", sub)) => edit(repo, sub).await?,
        Some(("rm", sub)) => {
            let id = sub.get_one::<String>("id").unwrap().trim();
            repo.delete_trip(id).await?;
            println!("Removed trip {}", id);
        }
        Some(("activate", sub)) => {
            let id = sub.get_one::<String>("id").unwrap().trim();
            repo.set_active_trip(id).await?;
            println!("Trip {} is now active", id);
        }
        _ => {}
    }
    Ok(())
}

/// Copies every flag present on the command line onto `trip`.
pub fn apply_trip_args(trip: &mut Trip, sub: &clap::ArgMatches) -> Result<()> {
    if let Some(name) = sub.get_one::<String>("name") {
        trip.name = name.trim().to_string();
    }
    if let Some(ccy) = sub.get_one::<String>("currency") {
        trip.currency = TripCurrency::parse(ccy);
    }
    if let Some(start) = sub.get_one::<String>("start") {
        trip.start_date = Some(parse_date(start)?);
    }
    if let Some(end) = sub.get_one::<String>("end") {
        trip.end_date = Some(parse_date(end)?);
    }
    if let Some(daily) = sub.get_one::<String>("daily_budget") {
        trip.daily_budget = Some(parse_decimal(daily)?);
    }
    if let Some(total) = sub.get_one::<String>("total_budget") {
        trip.total_budget = Some(parse_decimal(total)?);
    }
    if let Some(image) = sub.get_one::<String>("image") {
        trip.image_uri = Some(image.trim().to_string()).filter(|s| !s.is_empty());
    }
    Ok(())
}

async fn add(repo: &TripRepository, sub: &clap::ArgMatches) -> Result<()> {
    let default_ccy = repo.local().default_currency()?;
    let mut trip = Trip::new("", TripCurrency::parse(&default_ccy));
    apply_trip_args(&mut trip, sub)?;
    repo.add_trip(&trip).await?;
    if sub.get_flag("active") {
        repo.set_active_trip(&trip.id).await?;
    }
    println!(
        "Added trip '{}' ({}) in {}",
        trip.name,
        trip.id,
        trip.currency.code()
    );
    Ok(())
}

async fn edit(repo: &TripRepository, sub: &clap::ArgMatches) -> Result<()> {
    let id = sub.get_one::<String>("id").unwrap().trim();
    let mut trip = repo
        .trip(id)?
        .ok_or_else(|| anyhow!("Trip '{}' not found", id))?;
    apply_trip_args(&mut trip, sub)?;
    repo.update_trip(&trip).await?;
    println!("Updated trip '{}'", trip.name);
    Ok(())
}

fn list(repo: &TripRepository, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let trips = repo.trips().borrow().clone();
    if !maybe_print_json(json_flag, jsonl_flag, &trips)? {
        let active_id = resolve_active(&trips).map(|t| t.id.clone());
        let rows: Vec<Vec<String>> = trips
            .iter()
            .map(|t| {
                vec![
                    t.id.clone(),
                    t.name.clone(),
                    t.currency.code().to_string(),
                    opt_date(t.start_date),
                    opt_date(t.end_date),
                    opt_money(t.daily_budget),
                    opt_money(t.total_budget),
                    if active_id.as_deref() == Some(t.id.as_str()) {
                        "*".to_string()
                    } else {
                        String::new()
                    },
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["ID", "Name", "CCY", "Start", "End", "Daily", "Total", "Active"],
                rows,
            )
        );
    }
    Ok(())
}
