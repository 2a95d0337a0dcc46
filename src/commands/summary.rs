// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::repository::TripRepository;
use crate::resolver::{ActiveTripResolver, SelectedTripState};
use crate::utils::{fmt_money, maybe_print_json, opt_money, pretty_table};
use anyhow::{Result, bail};

pub async fn handle(repo: &TripRepository, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let trip_id = sub.get_one::<String>("trip").unwrap().trim();

    let state = selected_state(repo, trip_id).await?;
    let Some(trip) = state.trip.as_ref() else {
        bail!("Trip '{}' not found", trip_id);
    };
    if maybe_print_json(json_flag, jsonl_flag, &state)? {
        return Ok(());
    }

    let ccy = trip.currency.code();
    let totals = &state.totals;
    let used = totals
        .budget_used_ratio()
        .and_then(|r| r.checked_mul(rust_decimal::Decimal::ONE_HUNDRED))
        .map(|pct| format!("{:.1}%", pct))
        .unwrap_or_default();
    println!(
        "{}",
        pretty_table(
            &["Trip", "Transactions", "Spent", "Income", "Budget", "Remaining", "Used", "Daily"],
            vec![vec![
                trip.name.clone(),
                totals.transaction_count.to_string(),
                fmt_money(&totals.total_spend, ccy),
                fmt_money(&totals.total_income, ccy),
                opt_money(trip.total_budget),
                opt_money(totals.budget_remaining),
                used,
                opt_money(totals.daily_budget),
            ]],
        )
    );
    if !totals.spend_by_category.is_empty() {
        let rows = totals
            .spend_by_category
            .iter()
            .map(|(cat, amount)| vec![cat.name().to_string(), fmt_money(amount, ccy)])
            .collect();
        println!("{}", pretty_table(&["Category", "Spent"], rows));
    }
    Ok(())
}

/// Selects the trip and waits for the resolver to publish its state.
pub async fn selected_state(repo: &TripRepository, trip_id: &str) -> Result<SelectedTripState> {
    let resolver = ActiveTripResolver::new(repo);
    resolver.select_trip(trip_id);
    let mut rx = resolver.selected_trip_state();
    let state = rx
        .wait_for(|s| s.selected_trip_id.as_deref() == Some(trip_id))
        .await?
        .clone();
    Ok(state)
}
