// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

mod common;

use common::{date, dec, expense, income, trip};
use rust_decimal::Decimal;
use serde_json::Value;
use std::sync::Arc;
use tempfile::tempdir;
use tripclip::auth::AuthGate;
use tripclip::catalog::{Category, PaymentMethod};
use tripclip::cli;
use tripclip::commands::{doctor, exporter, profile, transactions, trips};
use tripclip::local_store::LocalStore;
use tripclip::models::{Transaction, TransactionType, Trip, TripCurrency};
use tripclip::remote::OfflineRemoteStore;
use tripclip::repository::TripRepository;

fn repo() -> TripRepository {
    TripRepository::new(
        Arc::new(LocalStore::open_in_memory().unwrap()),
        Arc::new(OfflineRemoteStore),
        AuthGate::new(),
    )
}

#[test]
fn tx_add_flags_fill_the_transaction() {
    let matches = cli::build_cli().get_matches_from([
        "tripclip",
        "tx",
        "add",
        "--trip",
        "t1",
        "--amount",
        "12.50",
        "--category",
        "Food",
        "--payment",
        "credit_card",
        "--type",
        "income",
        "--date",
        "2025-04-03",
        "--notes",
        "  ramen  ",
        "--lat",
        "35.68",
        "--lon",
        "139.76",
    ]);
    let (_, tx_m) = matches.subcommand().unwrap();
    let (_, add_m) = tx_m.subcommand().unwrap();

    let mut tx = Transaction::new(
        "t1",
        Decimal::ZERO,
        date("2025-01-01"),
        Category::Other,
        TransactionType::Expense,
    );
    transactions::apply_tx_args(&mut tx, add_m).unwrap();

    assert_eq!(tx.amount, dec("12.50"));
    assert_eq!(tx.category, Category::Food);
    assert_eq!(tx.payment_method, PaymentMethod::CreditCard);
    assert_eq!(tx.r#type, TransactionType::Income);
    assert_eq!(tx.date, date("2025-04-03"));
    assert_eq!(tx.notes, "ramen");
    assert_eq!(tx.location.unwrap().longitude, 139.76);
}

#[test]
fn tx_edit_include_clears_exclusion() {
    let matches =
        cli::build_cli().get_matches_from(["tripclip", "tx", "edit", "abc", "--include"]);
    let (_, tx_m) = matches.subcommand().unwrap();
    let (name, edit_m) = tx_m.subcommand().unwrap();
    assert_eq!(name, "edit");

    let mut tx = expense("t1", "9");
    tx.exclude_from_budget = true;
    transactions::apply_tx_args(&mut tx, edit_m).unwrap();
    assert!(!tx.exclude_from_budget);
}

#[test]
fn unknown_category_is_an_error() {
    let matches = cli::build_cli().get_matches_from([
        "tripclip", "tx", "add", "--trip", "t1", "--amount", "1", "--category", "snacks",
    ]);
    let (_, tx_m) = matches.subcommand().unwrap();
    let (_, add_m) = tx_m.subcommand().unwrap();
    let mut tx = expense("t1", "1");
    let err = transactions::apply_tx_args(&mut tx, add_m).unwrap_err();
    assert!(err.to_string().contains("snacks"));
}

#[test]
fn trip_flags_keep_custom_currency() {
    let matches = cli::build_cli().get_matches_from([
        "tripclip",
        "trip",
        "add",
        "--name",
        " Burning Man ",
        "--currency",
        "Tokens",
        "--start",
        "2025-08-24",
        "--total-budget",
        "300",
    ]);
    let (_, trip_m) = matches.subcommand().unwrap();
    let (_, add_m) = trip_m.subcommand().unwrap();

    let mut t = Trip::new("", TripCurrency::parse("USD"));
    trips::apply_trip_args(&mut t, add_m).unwrap();

    assert_eq!(t.name, "Burning Man");
    assert_eq!(t.currency, TripCurrency::Custom("Tokens".into()));
    assert_eq!(t.start_date, Some(date("2025-08-24")));
    assert_eq!(t.total_budget, Some(dec("300")));
}

#[test]
fn query_rows_lists_trip_transactions_newest_first() {
    let repo = repo();
    let t = trip("Rows", "USD");
    repo.local().put_trip(&t).unwrap();
    let mut first = expense(&t.id, "4");
    first.date = date("2025-01-01");
    let mut second = income(&t.id, "6");
    second.date = date("2025-01-02");
    repo.local().put_transaction(&first).unwrap();
    repo.local().put_transaction(&second).unwrap();

    let rows = transactions::query_rows(&repo, &t.id).unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].r#type, "INCOME");
    assert_eq!(rows[0].amount, "6.00");
    assert_eq!(rows[1].category, "Food & Drinks");
}

#[test]
fn export_csv_writes_oldest_first() {
    let repo = repo();
    let t = trip("Export", "EUR");
    repo.local().put_trip(&t).unwrap();
    let mut late = expense(&t.id, "20");
    late.date = date("2025-05-02");
    late.notes = "dinner, late".into();
    let mut early = expense(&t.id, "5");
    early.date = date("2025-05-01");
    repo.local().put_transaction(&late).unwrap();
    repo.local().put_transaction(&early).unwrap();

    let dir = tempdir().unwrap();
    let out = dir.path().join("tx.csv");
    let out_str = out.to_string_lossy().to_string();
    exporter::export_transactions(&repo, &t.id, "csv", &out_str).unwrap();

    let body = std::fs::read_to_string(&out).unwrap();
    let lines: Vec<&str> = body.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("date,type,amount,currency"));
    assert!(lines[1].starts_with("2025-05-01,EXPENSE,5,EUR"));
    assert!(lines[2].ends_with("\"dinner, late\""));
}

#[test]
fn export_json_contains_every_transaction() {
    let repo = repo();
    let t = trip("Json", "USD");
    repo.local().put_trip(&t).unwrap();
    repo.local().put_transaction(&expense(&t.id, "1.25")).unwrap();

    let dir = tempdir().unwrap();
    let out = dir.path().join("tx.json");
    exporter::export_transactions(&repo, &t.id, "json", out.to_str().unwrap()).unwrap();

    let items: Value = serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(items[0]["amount"], "1.25");
    assert_eq!(items[0]["currency"], "USD");
}

#[test]
fn export_rejects_unknown_format_and_trip() {
    let repo = repo();
    let t = trip("Fmt", "USD");
    repo.local().put_trip(&t).unwrap();
    let dir = tempdir().unwrap();
    let out = dir.path().join("x");
    let out = out.to_str().unwrap();

    assert!(exporter::export_transactions(&repo, &t.id, "xlsx", out).is_err());
    assert!(exporter::export_transactions(&repo, "missing", "csv", out).is_err());
}

#[test]
fn doctor_reports_inverted_dates_and_multiple_active_trips() {
    let mut inverted = trip("Backwards", "USD");
    inverted.start_date = Some(date("2025-05-10"));
    inverted.end_date = Some(date("2025-05-01"));
    inverted.is_active = true;
    let mut other = trip("Also active", "USD");
    other.is_active = true;
    let orphan = expense("vanished", "3");

    let issues = doctor::find_issues(&[inverted, other], &[orphan.clone()]);
    let kinds: Vec<&str> = issues.iter().map(|(k, _)| *k).collect();

    assert_eq!(
        kinds,
        ["trip_dates_inverted", "multiple_active_trips", "orphan_transaction"]
    );
    assert!(issues[2].1.contains(&orphan.id));
}

#[test]
fn doctor_is_quiet_on_clean_data() {
    let mut t = trip("Clean", "USD");
    t.start_date = Some(date("2025-01-01"));
    t.end_date = Some(date("2025-01-05"));
    let tx = expense(&t.id, "1");
    assert!(doctor::find_issues(&[t], &[tx]).is_empty());
}

#[test]
fn profile_values_are_normalized() {
    assert_eq!(profile::normalize("default_currency", "eur").unwrap(), "EUR");
    assert_eq!(profile::normalize("default_currency", "Gold").unwrap(), "Gold");
    assert_eq!(
        profile::normalize("email", "ana@example.com").unwrap(),
        "ana@example.com"
    );
    assert!(profile::normalize("email", "not-an-email").is_err());
    assert!(profile::normalize("theme", "dark").is_err());
}
