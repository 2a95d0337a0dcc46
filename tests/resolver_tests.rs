// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

mod common;

use common::{dec, expense, income, repo_with, signed_in, trip};
use rust_decimal::Decimal;
use std::sync::Arc;
use tripclip::catalog::Category;
use tripclip::remote::OfflineRemoteStore;
use tripclip::repository::TripRepository;
use tripclip::resolver::{ActiveTripResolver, SelectedTripState, TripView, compute_state};
use tripclip::summary::TripTotals;

fn offline_repo() -> TripRepository {
    repo_with(Arc::new(OfflineRemoteStore), signed_in())
}

async fn settled(
    rx: &mut tokio::sync::watch::Receiver<SelectedTripState>,
    id: &str,
) -> SelectedTripState {
    rx.wait_for(|s| s.selected_trip_id.as_deref() == Some(id))
        .await
        .unwrap()
        .clone()
}

#[tokio::test]
async fn tokyo_detail_state_totals() {
    let repo = offline_repo();
    let mut tokyo = trip("Tokyo", "JPY");
    tokyo.total_budget = Some(dec("200000"));
    repo.add_trip(&tokyo).await.unwrap();
    repo.add_transaction(&expense(&tokyo.id, "1000")).await.unwrap();
    repo.add_transaction(&expense(&tokyo.id, "500")).await.unwrap();

    let resolver = ActiveTripResolver::new(&repo);
    assert_eq!(resolver.view(), TripView::List);
    resolver.select_trip(&tokyo.id);
    assert_eq!(resolver.view(), TripView::Detail);

    let mut rx = resolver.selected_trip_state();
    let state = settled(&mut rx, &tokyo.id).await;

    assert_eq!(state.view(), TripView::Detail);
    assert_eq!(state.trip.as_ref().map(|t| t.name.as_str()), Some("Tokyo"));
    assert_eq!(state.transactions.len(), 2);
    assert_eq!(state.totals.total_spend, dec("1500"));
    assert_eq!(state.totals.budget_remaining, Some(dec("198500")));
    assert_eq!(state.totals.transaction_count, 2);
    assert_eq!(
        state.totals.spend_by_category,
        vec![(Category::Food, dec("1500"))]
    );
}

#[tokio::test]
async fn state_follows_new_transactions_for_selected_trip() {
    let repo = offline_repo();
    let t = trip("Live", "USD");
    repo.add_trip(&t).await.unwrap();
    let resolver = ActiveTripResolver::new(&repo);
    resolver.select_trip(&t.id);
    let mut rx = resolver.selected_trip_state();
    settled(&mut rx, &t.id).await;

    repo.add_transaction(&expense(&t.id, "12.5")).await.unwrap();

    let state = rx
        .wait_for(|s| s.transactions.len() == 1)
        .await
        .unwrap()
        .clone();
    assert_eq!(state.totals.total_spend, dec("12.5"));
}

#[tokio::test]
async fn reselecting_the_same_trip_publishes_nothing() {
    let repo = offline_repo();
    let t = trip("Once", "USD");
    repo.add_trip(&t).await.unwrap();
    let resolver = ActiveTripResolver::new(&repo);
    resolver.select_trip(&t.id);
    let mut rx = resolver.selected_trip_state();
    settled(&mut rx, &t.id).await;
    rx.borrow_and_update();

    resolver.select_trip(&t.id);
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }

    assert!(!rx.has_changed().unwrap());
    assert_eq!(resolver.selected_trip_id().as_deref(), Some(t.id.as_str()));
}

#[tokio::test]
async fn latest_selection_wins() {
    let repo = offline_repo();
    let a = trip("A", "USD");
    let b = trip("B", "USD");
    repo.add_trip(&a).await.unwrap();
    repo.add_trip(&b).await.unwrap();
    repo.add_transaction(&expense(&a.id, "99")).await.unwrap();

    let resolver = ActiveTripResolver::new(&repo);
    resolver.select_trip(&a.id);
    resolver.select_trip(&b.id);

    let mut rx = resolver.selected_trip_state();
    let state = settled(&mut rx, &b.id).await;
    assert_eq!(state.trip.unwrap().id, b.id);
    assert!(state.transactions.is_empty());
    assert_eq!(state.totals.total_spend, Decimal::ZERO);
}

#[tokio::test]
async fn unselect_returns_to_list_view() {
    let repo = offline_repo();
    let t = trip("Back", "USD");
    repo.add_trip(&t).await.unwrap();
    let resolver = ActiveTripResolver::new(&repo);
    resolver.select_trip(&t.id);
    let mut rx = resolver.selected_trip_state();
    settled(&mut rx, &t.id).await;

    resolver.unselect_trip();

    assert_eq!(resolver.view(), TripView::List);
    let state = rx
        .wait_for(|s| s.selected_trip_id.is_none())
        .await
        .unwrap()
        .clone();
    assert_eq!(state, SelectedTripState::default());
    assert_eq!(state.view(), TripView::List);
}

#[tokio::test]
async fn deleting_the_selected_trip_empties_the_state() {
    let repo = offline_repo();
    let t = trip("Doomed", "USD");
    repo.add_trip(&t).await.unwrap();
    repo.add_transaction(&expense(&t.id, "3")).await.unwrap();
    let resolver = ActiveTripResolver::new(&repo);
    resolver.select_trip(&t.id);
    let mut rx = resolver.selected_trip_state();
    settled(&mut rx, &t.id).await;

    repo.delete_trip(&t.id).await.unwrap();

    let state = rx
        .wait_for(|s| s.trip.is_none() && s.transactions.is_empty())
        .await
        .unwrap()
        .clone();
    assert_eq!(state.selected_trip_id.as_deref(), Some(t.id.as_str()));
    assert_eq!(state.totals.total_spend, Decimal::ZERO);
}

#[test]
fn totals_ignore_income_and_excluded_expenses() {
    let mut t = trip("Mixed", "EUR");
    t.total_budget = Some(dec("100"));
    t.daily_budget = Some(dec("20"));
    let mut excluded = expense(&t.id, "40");
    excluded.exclude_from_budget = true;
    let txs = vec![expense(&t.id, "30"), income(&t.id, "50"), excluded];

    let totals = TripTotals::compute(Some(&t), &txs);

    assert_eq!(totals.total_spend, dec("30"));
    assert_eq!(totals.total_income, dec("50"));
    assert_eq!(totals.budget_remaining, Some(dec("70")));
    assert_eq!(totals.daily_budget, Some(dec("20")));
    assert_eq!(totals.transaction_count, 3);
    assert_eq!(totals.budget_used_ratio(), Some(dec("0.3")));
}

#[test]
fn budget_remaining_absent_without_total_budget() {
    let t = trip("Open ended", "USD");
    let totals = TripTotals::compute(Some(&t), &[expense(&t.id, "10")]);
    assert_eq!(totals.budget_remaining, None);
    assert_eq!(totals.budget_used_ratio(), None);
}

#[test]
fn overspend_goes_negative() {
    let mut t = trip("Splurge", "USD");
    t.total_budget = Some(dec("10"));
    let totals = TripTotals::compute(Some(&t), &[expense(&t.id, "15")]);
    assert_eq!(totals.budget_remaining, Some(dec("-5")));
}

#[test]
fn compute_state_is_independent_of_input_order() {
    let mut t = trip("Order", "USD");
    t.total_budget = Some(dec("1000"));
    let other = trip("Other", "USD");
    let txs = vec![
        expense(&t.id, "1"),
        expense(&other.id, "2"),
        expense(&t.id, "3"),
    ];
    let trips = vec![t.clone(), other.clone()];

    let forward = compute_state(Some(&t.id), &trips, &txs);
    let mut rev_txs = txs.clone();
    rev_txs.reverse();
    let mut rev_trips = trips.clone();
    rev_trips.reverse();
    let backward = compute_state(Some(&t.id), &rev_trips, &rev_txs);

    assert_eq!(forward.totals, backward.totals);
    assert_eq!(forward.trip, backward.trip);
    assert_eq!(forward.totals.total_spend, dec("4"));
    assert_eq!(forward.totals.budget_remaining, Some(dec("996")));
}

#[test]
fn compute_state_for_unknown_trip_has_no_trip() {
    let state = compute_state(Some("missing"), &[], &[]);
    assert_eq!(state.view(), TripView::Detail);
    assert!(state.trip.is_none());
    assert_eq!(state.totals, TripTotals::default());
}

#[test]
fn totals_saturate_instead_of_overflowing() {
    let mut t = trip("Hyperinflation", "ZWL");
    t.total_budget = Some(dec("100"));
    let big = "50000000000000000000000000000";
    let txs = vec![expense(&t.id, big), expense(&t.id, big), income(&t.id, big), income(&t.id, big)];

    let totals = TripTotals::compute(Some(&t), &txs);

    assert_eq!(totals.total_spend, Decimal::MAX);
    assert_eq!(totals.total_income, Decimal::MAX);
    assert_eq!(totals.spend_by_category, vec![(Category::Food, Decimal::MAX)]);
    assert!(totals.budget_remaining.unwrap() < Decimal::ZERO);
    assert_eq!(tripclip::summary::total_spend(&txs), Decimal::MAX);
}

#[tokio::test]
async fn state_keeps_updating_after_huge_amounts() {
    let repo = offline_repo();
    let t = trip("Huge", "USD");
    repo.add_trip(&t).await.unwrap();
    let resolver = ActiveTripResolver::new(&repo);
    resolver.select_trip(&t.id);
    let mut rx = resolver.selected_trip_state();
    settled(&mut rx, &t.id).await;

    let big = "50000000000000000000000000000";
    repo.add_transaction(&expense(&t.id, big)).await.unwrap();
    repo.add_transaction(&expense(&t.id, big)).await.unwrap();
    repo.add_transaction(&expense(&t.id, "1")).await.unwrap();

    let state = rx
        .wait_for(|s| s.transactions.len() == 3)
        .await
        .unwrap()
        .clone();
    assert_eq!(state.totals.total_spend, Decimal::MAX);
}

#[test]
fn missing_trip_shows_no_transactions() {
    let orphaned = vec![expense("gone", "5"), expense("gone", "6")];
    let state = compute_state(Some("gone"), &[], &orphaned);
    assert!(state.transactions.is_empty());
    assert_eq!(state.totals.total_spend, Decimal::ZERO);
    assert_eq!(state.totals.transaction_count, 0);
}
