// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::catalog::{Category, PaymentMethod};
use crate::models::{GeoPoint, Transaction, TransactionType};
use crate::repository::TripRepository;
use crate::summary::total_spend;
use crate::utils::{maybe_print_json, parse_date, parse_decimal, pretty_table};
use anyhow::{Result, anyhow};
use serde::Serialize;

pub async fn handle(repo: &TripRepository, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(repo, sub).await?,
        Some(("list", sub)) => list(repo, sub)?,
        Some(("edit", sub)) => edit(repo, sub).await?,
        Some(("rm", sub)) => {
            let id = sub.get_one::<String>("id").unwrap().trim();
            repo.delete_transaction(id).await?;
            println!("Removed transaction {}", id);
        }
        _ => {}
    }
    Ok(())
}

fn parse_category(raw: &str) -> Result<Category> {
    Category::from_route(raw).ok_or_else(|| {
        let keys: Vec<&str> = Category::ALL.iter().map(|c| c.route()).collect();
        anyhow!("Unknown category '{}' (use one of: {})", raw, keys.join(", "))
    })
}

fn parse_payment(raw: &str) -> Result<PaymentMethod> {
    PaymentMethod::from_route(raw).ok_or_else(|| {
        let keys: Vec<&str> = PaymentMethod::ALL.iter().map(|p| p.route()).collect();
        anyhow!(
            "Unknown payment method '{}' (use one of: {})",
            raw,
            keys.join(", ")
        )
    })
}

/// Copies every flag present on the command line onto `tx`.
pub fn apply_tx_args(tx: &mut Transaction, sub: &clap::ArgMatches) -> Result<()> {
    if let Some(amount) = sub.get_one::<String>("amount") {
        tx.amount = parse_decimal(amount)?;
    }
    if let Some(date) = sub.get_one::<String>("date") {
        tx.date = parse_date(date)?;
    }
    if let Some(cat) = sub.get_one::<String>("category") {
        tx.category = parse_category(cat)?;
    }
    if let Some(pm) = sub.get_one::<String>("payment") {
        tx.payment_method = parse_payment(pm)?;
    }
    if let Some(t) = sub.get_one::<String>("type") {
        tx.r#type =
            TransactionType::parse(t).ok_or_else(|| anyhow!("Unknown transaction type '{}'", t))?;
    }
    if let Some(notes) = sub.get_one::<String>("notes") {
        tx.notes = notes.trim().to_string();
    }
    if sub.get_flag("exclude") {
        tx.exclude_from_budget = true;
    }
    if sub.try_get_one::<bool>("include").ok().flatten() == Some(&true) {
        tx.exclude_from_budget = false;
    }
    if let (Some(lat), Some(lon)) = (sub.get_one::<f64>("lat"), sub.get_one::<f64>("lon")) {
        tx.location = Some(GeoPoint {
            latitude: *lat,
            longitude: *lon,
        });
    }
    if let Some(image) = sub.get_one::<String>("image") {
        tx.image_uri = Some(image.trim().to_string()).filter(|s| !s.is_empty());
    }
    Ok(())
}

async fn add(repo: &TripRepository, sub: &clap::ArgMatches) -> Result<()> {
    let trip_id = sub.get_one::<String>("trip").unwrap().trim();
    let today = chrono::Local::now().date_naive();
    let mut tx = Transaction::new(
        trip_id,
        rust_decimal::Decimal::ZERO,
        today,
        Category::Other,
        TransactionType::Expense,
    );
    apply_tx_args(&mut tx, sub)?;
    repo.add_transaction(&tx).await?;
    println!(
        "Recorded {} {} on {} ({})",
        tx.r#type.as_str().to_lowercase(),
        tx.amount,
        tx.date,
        tx.category.name()
    );
    Ok(())
}

async fn edit(repo: &TripRepository, sub: &clap::ArgMatches) -> Result<()> {
    let id = sub.get_one::<String>("id").unwrap().trim();
    let mut tx = repo
        .transaction(id)?
        .ok_or_else(|| anyhow!("Transaction '{}' not found", id))?;
    apply_tx_args(&mut tx, sub)?;
    repo.update_transaction(&tx).await?;
    println!("Updated transaction {}", tx.id);
    Ok(())
}

fn list(repo: &TripRepository, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let trip_id = sub.get_one::<String>("trip").unwrap().trim();
    let data = query_rows(repo, trip_id)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                vec![
                    r.id.clone(),
                    r.date.clone(),
                    r.r#type.clone(),
                    r.amount.clone(),
                    r.category.clone(),
                    r.payment_method.clone(),
                    if r.excluded { "yes".into() } else { String::new() },
                    r.notes.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["ID", "Date", "Type", "Amount", "Category", "Payment", "Excluded", "Notes"],
                rows,
            )
        );
        let spend = total_spend(&repo.local().transactions_for(trip_id)?);
        println!("Budgeted spend: {:.2}", spend);
    }
    Ok(())
}

#[derive(Serialize)]
pub struct TransactionRow {
    pub id: String,
    pub date: String,
    pub r#type: String,
    pub amount: String,
    pub category: String,
    pub payment_method: String,
    pub excluded: bool,
    pub notes: String,
}

pub fn query_rows(repo: &TripRepository, trip_id: &str) -> Result<Vec<TransactionRow>> {
    let data = repo
        .local()
        .transactions_for(trip_id)?
        .into_iter()
        .map(|tx| TransactionRow {
            id: tx.id,
            date: tx.date.to_string(),
            r#type: tx.r#type.as_str().to_string(),
            amount: format!("{:.2}", tx.amount),
            category: tx.category.name().to_string(),
            payment_method: tx.payment_method.name().to_string(),
            excluded: tx.exclude_from_budget,
            notes: tx.notes,
        })
        .collect();
    Ok(data)
}
