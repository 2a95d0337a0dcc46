// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{Transaction, Trip};
use crate::repository::TripRepository;
use crate::utils::{opt_date, pretty_table};
use anyhow::Result;
use std::collections::HashSet;

pub fn handle(repo: &TripRepository) -> Result<()> {
    let trips = repo.trips().borrow().clone();
    let transactions = repo.transactions().borrow().clone();
    let rows: Vec<Vec<String>> = find_issues(&trips, &transactions)
        .into_iter()
        .map(|(issue, detail)| vec![issue.to_string(), detail])
        .collect();

    if rows.is_empty() {
        println!("✅ doctor: no issues found");
    } else {
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}

pub fn find_issues(trips: &[Trip], transactions: &[Transaction]) -> Vec<(&'static str, String)> {
    let mut issues = Vec::new();

    // 1) Start after end
    for t in trips.iter().filter(|t| t.has_inverted_dates()) {
        issues.push((
            "trip_dates_inverted",
            format!(
                "{} ({}): {} > {}",
                t.name,
                t.id,
                opt_date(t.start_date),
                opt_date(t.end_date)
            ),
        ));
    }

    // 2) More than one trip flagged active
    let active: Vec<&Trip> = trips.iter().filter(|t| t.is_active).collect();
    if active.len() > 1 {
        let names: Vec<&str> = active.iter().map(|t| t.name.as_str()).collect();
        issues.push(("multiple_active_trips", names.join(", ")));
    }

    // 3) Transactions pointing at a missing trip
    let known: HashSet<&str> = trips.iter().map(|t| t.id.as_str()).collect();
    for tx in transactions.iter().filter(|tx| !known.contains(tx.trip_id.as_str())) {
        issues.push(("orphan_transaction", format!("{} -> {}", tx.id, tx.trip_id)));
    }

    issues
}
