// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Session-scoped trip selection and the detail-view state built from it.
//!
//! Selection lives only in memory. A fresh resolver always starts in the
//! list view.

use serde::Serialize;
use tokio::sync::watch;
use tracing::debug;

use crate::models::{Transaction, Trip};
use crate::repository::{TripRepository, transactions_of};
use crate::summary::TripTotals;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TripView {
    List,
    Detail,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SelectedTripState {
    /// Selection this state was computed for
    pub selected_trip_id: Option<String>,
    pub trip: Option<Trip>,
    pub transactions: Vec<Transaction>,
    pub totals: TripTotals,
}

impl SelectedTripState {
    pub fn view(&self) -> TripView {
        if self.selected_trip_id.is_some() {
            TripView::Detail
        } else {
            TripView::List
        }
    }
}

pub struct ActiveTripResolver {
    selection: watch::Sender<Option<String>>,
    state: watch::Receiver<SelectedTripState>,
}

impl ActiveTripResolver {
    /// Starts the background task combining selection, trips and transactions.
    /// Needs a Tokio runtime.
    pub fn new(repo: &TripRepository) -> Self {
        let (selection, selection_rx) = watch::channel(None);
        let state = spawn_state_task(selection_rx, repo.trips(), repo.transactions());
        Self { selection, state }
    }

    /// Selecting the already selected trip is a no-op.
    pub fn select_trip(&self, trip_id: &str) {
        self.selection.send_if_modified(|current| {
            if current.as_deref() == Some(trip_id) {
                return false;
            }
            *current = Some(trip_id.to_string());
            true
        });
    }

    pub fn unselect_trip(&self) {
        self.selection.send_if_modified(|current| current.take().is_some());
    }

    pub fn selected_trip_id(&self) -> Option<String> {
        self.selection.borrow().clone()
    }

    pub fn view(&self) -> TripView {
        if self.selection.borrow().is_some() {
            TripView::Detail
        } else {
            TripView::List
        }
    }

    pub fn selected_trip_state(&self) -> watch::Receiver<SelectedTripState> {
        self.state.clone()
    }
}

pub fn compute_state(
    selected: Option<&str>,
    trips: &[Trip],
    transactions: &[Transaction],
) -> SelectedTripState {
    let Some(id) = selected else {
        return SelectedTripState::default();
    };
    let trip = trips.iter().find(|t| t.id == id).cloned();
    // a missing trip has nothing to show, whatever the transaction stream still holds
    let transactions = match trip {
        Some(_) => transactions_of(transactions, id),
        None => Vec::new(),
    };
    let totals = TripTotals::compute(trip.as_ref(), &transactions);
    SelectedTripState {
        selected_trip_id: Some(id.to_string()),
        trip,
        transactions,
        totals,
    }
}

fn spawn_state_task(
    mut selection: watch::Receiver<Option<String>>,
    mut trips: watch::Receiver<Vec<Trip>>,
    mut transactions: watch::Receiver<Vec<Transaction>>,
) -> watch::Receiver<SelectedTripState> {
    let initial = compute_state(
        selection.borrow_and_update().as_deref(),
        &trips.borrow_and_update(),
        &transactions.borrow_and_update(),
    );
    let (tx, rx) = watch::channel(initial);

    tokio::spawn(async move {
        loop {
            tokio::select! {
                changed = selection.changed() => if changed.is_err() { break },
                changed = trips.changed() => if changed.is_err() { break },
                changed = transactions.changed() => if changed.is_err() { break },
                _ = tx.closed() => break,
            }

            let selected = selection.borrow_and_update().clone();
            let next = compute_state(
                selected.as_deref(),
                &trips.borrow_and_update(),
                &transactions.borrow_and_update(),
            );
            // a newer selection arrived mid-compute; drop this result
            if selection.has_changed().unwrap_or(false) {
                debug!(?selected, "discarding stale selection state");
                continue;
            }
            tx.send_replace(next);
        }
    });
    rx
}
