// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! The single entry point the presentation layer talks to.
//!
//! Reads come from the local store's live snapshots. Mutations go through the
//! sync coordinator, so a returned `Ok` means the record is durable locally.

use std::sync::Arc;
use tokio::sync::watch;
use tracing::info;

use crate::auth::AuthGate;
use crate::errors::{Error, Result};
use crate::local_store::LocalStore;
use crate::models::{Transaction, Trip};
use crate::observe::derive;
use crate::remote::RemoteStore;
use crate::sync::{PullReport, SyncCoordinator};

pub struct TripRepository {
    sync: SyncCoordinator,
}

impl TripRepository {
    pub fn new(local: Arc<LocalStore>, remote: Arc<dyn RemoteStore>, auth: AuthGate) -> Self {
        Self {
            sync: SyncCoordinator::new(local, remote, auth),
        }
    }

    pub fn local(&self) -> &Arc<LocalStore> {
        self.sync.local()
    }

    /// Live list of trips, start date descending.
    pub fn trips(&self) -> watch::Receiver<Vec<Trip>> {
        self.local().observe_trips()
    }

    /// Live list of every transaction across trips.
    pub fn transactions(&self) -> watch::Receiver<Vec<Transaction>> {
        self.local().observe_transactions()
    }

    /// Live list of one trip's transactions. Needs a Tokio runtime.
    pub fn transactions_for_trip(&self, trip_id: &str) -> watch::Receiver<Vec<Transaction>> {
        let trip_id = trip_id.to_string();
        derive(self.transactions(), move |all| {
            transactions_of(all, &trip_id)
        })
    }

    /// Live "currently active" trip. Needs a Tokio runtime.
    pub fn active_trip(&self) -> watch::Receiver<Option<Trip>> {
        derive(self.trips(), |trips| resolve_active(trips).cloned())
    }

    pub fn trip(&self, id: &str) -> Result<Option<Trip>> {
        self.local().get_trip(id)
    }

    pub fn transaction(&self, id: &str) -> Result<Option<Transaction>> {
        self.local().get_transaction(id)
    }

    /// Returns the record as stored, with its modification time stamped.
    pub async fn add_trip(&self, trip: &Trip) -> Result<Trip> {
        self.sync.write_trip(trip).await
    }

    /// Full replace by id.
    pub async fn update_trip(&self, trip: &Trip) -> Result<Trip> {
        self.sync.write_trip(trip).await
    }

    pub async fn delete_trip(&self, id: &str) -> Result<()> {
        self.sync.delete_trip(id).await
    }

    pub async fn add_transaction(&self, tx: &Transaction) -> Result<Transaction> {
        self.sync.write_transaction(tx).await
    }

    /// Full replace by id.
    pub async fn update_transaction(&self, tx: &Transaction) -> Result<Transaction> {
        self.sync.write_transaction(tx).await
    }

    pub async fn delete_transaction(&self, id: &str) -> Result<()> {
        self.sync.delete_transaction(id).await
    }

    /// Marks `id` active and clears the flag on every other active trip.
    pub async fn set_active_trip(&self, id: &str) -> Result<()> {
        let mut target = self
            .trip(id)?
            .filter(|t| !t.is_deleted)
            .ok_or_else(|| Error::UnknownTrip(id.to_string()))?;

        let others: Vec<Trip> = self
            .trips()
            .borrow()
            .iter()
            .filter(|t| t.is_active && t.id != id)
            .cloned()
            .collect();
        for mut other in others {
            other.is_active = false;
            self.sync.write_trip(&other).await?;
        }
        if !target.is_active {
            target.is_active = true;
            self.sync.write_trip(&target).await?;
        }
        info!(trip_id = %id, "active trip set");
        Ok(())
    }

    pub async fn pull_remote(&self) -> Result<PullReport> {
        self.sync.pull().await
    }

    pub async fn wait_for_mirrors(&self) {
        self.sync.wait_for_mirrors().await
    }
}

pub fn transactions_of(all: &[Transaction], trip_id: &str) -> Vec<Transaction> {
    all.iter()
        .filter(|tx| tx.trip_id == trip_id && !tx.is_deleted)
        .cloned()
        .collect()
}

/// Among non-deleted active trips, the latest `date_created`; ties go to the
/// one later in the list.
pub fn resolve_active(trips: &[Trip]) -> Option<&Trip> {
    trips
        .iter()
        .filter(|t| t.is_active && !t.is_deleted)
        .max_by_key(|t| t.date_created)
}
