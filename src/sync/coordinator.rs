// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Write sequencing: local store first, remote mirror after.
//!
//! A write returns once the local store has committed it. The mirror runs on
//! its own task; if it fails the error is logged and dropped, with no rollback
//! and no retry queue. The next write of the same record re-attempts the mirror.
//!
//! Every local write stamps `date_modified`. A pull only replaces or removes a
//! local record when the remote document is strictly newer, so an edit whose
//! mirror never landed survives until it is mirrored.

use chrono::Utc;
use serde::Serialize;
use serde_json::Value;
use std::sync::{Arc, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::auth::AuthGate;
use crate::errors::{Error, Result};
use crate::local_store::LocalStore;
use crate::models::{Transaction, Trip};
use crate::remote::{RemoteStore, TRANSACTIONS_COLLECTION, TRIPS_COLLECTION};

use super::payload::{RemoteTransaction, RemoteTrip};

enum MirrorOp {
    Upsert {
        collection: &'static str,
        id: String,
        payload: Value,
    },
    Delete {
        collection: &'static str,
        id: String,
    },
}

/// Outcome of applying remote documents locally.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PullReport {
    pub trips_applied: usize,
    pub transactions_applied: usize,
    /// Tombstones applied as local hard deletes
    pub deleted: usize,
    /// Documents no newer than the local copy, left unapplied
    pub kept_local: usize,
    /// Documents that could not be decoded or whose trip is unknown locally
    pub skipped: usize,
}

pub struct SyncCoordinator {
    local: Arc<LocalStore>,
    remote: Arc<dyn RemoteStore>,
    auth: AuthGate,
    in_flight: Mutex<Vec<JoinHandle<()>>>,
}

impl SyncCoordinator {
    pub fn new(local: Arc<LocalStore>, remote: Arc<dyn RemoteStore>, auth: AuthGate) -> Self {
        Self {
            local,
            remote,
            auth,
            in_flight: Mutex::new(Vec::new()),
        }
    }

    pub fn local(&self) -> &Arc<LocalStore> {
        &self.local
    }

    /// Returns the stored record, `date_modified` stamped.
    pub async fn write_trip(&self, trip: &Trip) -> Result<Trip> {
        trip.validate()?;
        let mut record = trip.clone();
        record.date_modified = Utc::now();
        let stored = record.clone();
        self.run_local(move |local| local.put_trip(&stored)).await?;

        if let Some(uid) = self.mirror_owner(TRIPS_COLLECTION, &record.id) {
            self.mirror_upsert(
                TRIPS_COLLECTION,
                &record.id,
                RemoteTrip::from_trip(&record, &uid),
            );
        }
        Ok(record)
    }

    /// Fails with `UnknownTrip` when the owning trip is not stored locally.
    pub async fn write_transaction(&self, tx: &Transaction) -> Result<Transaction> {
        tx.validate()?;
        let mut record = tx.clone();
        record.date_modified = Utc::now();
        let stored = record.clone();
        self.run_local(move |local| {
            if !local.trip_exists(&stored.trip_id)? {
                return Err(Error::UnknownTrip(stored.trip_id.clone()));
            }
            local.put_transaction(&stored)
        })
        .await?;

        if let Some(uid) = self.mirror_owner(TRANSACTIONS_COLLECTION, &record.id) {
            self.mirror_upsert(
                TRANSACTIONS_COLLECTION,
                &record.id,
                RemoteTransaction::from_transaction(&record, &uid),
            );
        }
        Ok(record)
    }

    /// Removes the trip and, through the cascade, its transactions. Every
    /// removed record gets its own remote delete.
    pub async fn delete_trip(&self, id: &str) -> Result<()> {
        let trip_id = id.to_string();
        let cascaded = self
            .run_local(move |local| local.delete_trip(&trip_id))
            .await?;

        if self.mirror_owner(TRIPS_COLLECTION, id).is_some() {
            self.spawn_mirror(MirrorOp::Delete {
                collection: TRIPS_COLLECTION,
                id: id.to_string(),
            });
            for tx_id in cascaded {
                self.spawn_mirror(MirrorOp::Delete {
                    collection: TRANSACTIONS_COLLECTION,
                    id: tx_id,
                });
            }
        }
        Ok(())
    }

    pub async fn delete_transaction(&self, id: &str) -> Result<()> {
        let tx_id = id.to_string();
        self.run_local(move |local| local.delete_transaction(&tx_id))
            .await?;

        if self.mirror_owner(TRANSACTIONS_COLLECTION, id).is_some() {
            self.spawn_mirror(MirrorOp::Delete {
                collection: TRANSACTIONS_COLLECTION,
                id: id.to_string(),
            });
        }
        Ok(())
    }

    /// Applies the signed-in user's remote documents to the local store.
    /// Nothing is mirrored back. No-op while signed out.
    pub async fn pull(&self) -> Result<PullReport> {
        let Some(uid) = self.auth.user_id() else {
            debug!("pull skipped: not signed in");
            return Ok(PullReport::default());
        };

        let trip_docs = self.remote.fetch_all(TRIPS_COLLECTION, &uid).await?;
        let tx_docs = self.remote.fetch_all(TRANSACTIONS_COLLECTION, &uid).await?;

        let mut report = PullReport::default();
        let trips = decode_all::<RemoteTrip>(TRIPS_COLLECTION, trip_docs, &mut report);
        let transactions =
            decode_all::<RemoteTransaction>(TRANSACTIONS_COLLECTION, tx_docs, &mut report);

        let report = self
            .run_local(move |local| apply_pulled(local, trips, transactions, report))
            .await?;
        info!(
            trips = report.trips_applied,
            transactions = report.transactions_applied,
            deleted = report.deleted,
            kept_local = report.kept_local,
            skipped = report.skipped,
            "pulled remote changes"
        );
        Ok(report)
    }

    /// Awaits every mirror issued so far. Remote errors stay swallowed.
    pub async fn wait_for_mirrors(&self) {
        loop {
            let handles = self.take_in_flight();
            if handles.is_empty() {
                return;
            }
            for handle in handles {
                if let Err(err) = handle.await {
                    warn!(error = %err, "remote mirror task aborted");
                }
            }
        }
    }

    async fn run_local<T, F>(&self, op: F) -> Result<T>
    where
        F: FnOnce(&LocalStore) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let local = Arc::clone(&self.local);
        tokio::task::spawn_blocking(move || op(&local)).await?
    }

    fn mirror_owner(&self, collection: &str, id: &str) -> Option<String> {
        let uid = self.auth.user_id();
        if uid.is_none() {
            debug!(collection, id, "mirror skipped: not signed in");
        }
        uid
    }

    fn mirror_upsert<T: Serialize>(&self, collection: &'static str, id: &str, doc: Result<T>) {
        let payload = doc.and_then(|doc| Ok(serde_json::to_value(doc)?));
        match payload {
            Ok(payload) => self.spawn_mirror(MirrorOp::Upsert {
                collection,
                id: id.to_string(),
                payload,
            }),
            Err(err) => warn!(collection, id, error = %err, "could not encode remote document"),
        }
    }

    fn spawn_mirror(&self, op: MirrorOp) {
        let remote = Arc::clone(&self.remote);
        let handle = tokio::spawn(async move {
            let (action, collection, id, result) = match op {
                MirrorOp::Upsert {
                    collection,
                    id,
                    payload,
                } => {
                    let result = remote.upsert(collection, &id, payload).await;
                    ("upsert", collection, id, result)
                }
                MirrorOp::Delete { collection, id } => {
                    let result = remote.delete(collection, &id).await;
                    ("delete", collection, id, result)
                }
            };
            match result {
                Ok(()) => debug!(action, collection, id = %id, "mirrored"),
                Err(err) => warn!(
                    action,
                    collection,
                    id = %id,
                    status = ?err.status_code(),
                    error = %err,
                    "remote mirror failed, local copy kept"
                ),
            }
        });

        match self.in_flight.lock() {
            Ok(mut in_flight) => {
                in_flight.retain(|h| !h.is_finished());
                in_flight.push(handle);
            }
            Err(_) => warn!("mirror tracking lock poisoned, task detached"),
        }
    }

    fn take_in_flight(&self) -> Vec<JoinHandle<()>> {
        match self.in_flight.lock() {
            Ok(mut in_flight) => std::mem::take(&mut *in_flight),
            Err(_) => Vec::new(),
        }
    }
}

fn decode_all<T: serde::de::DeserializeOwned>(
    collection: &str,
    docs: Vec<Value>,
    report: &mut PullReport,
) -> Vec<T> {
    let mut out = Vec::with_capacity(docs.len());
    for doc in docs {
        match serde_json::from_value::<T>(doc) {
            Ok(decoded) => out.push(decoded),
            Err(err) => {
                warn!(collection, error = %err, "skipping undecodable remote document");
                report.skipped += 1;
            }
        }
    }
    out
}

/// Trips first so pulled transactions find their owner.
fn apply_pulled(
    local: &LocalStore,
    trips: Vec<RemoteTrip>,
    transactions: Vec<RemoteTransaction>,
    mut report: PullReport,
) -> Result<PullReport> {
    for doc in trips {
        let current = local.get_trip(&doc.id)?.map(|t| t.date_modified);
        if current.is_some_and(|local_at| doc.modified_at() <= local_at) {
            debug!(trip_id = %doc.id, "local trip is as new as remote, kept");
            report.kept_local += 1;
            continue;
        }
        if doc.is_deleted {
            if current.is_some() {
                local.delete_trip(&doc.id)?;
                report.deleted += 1;
            }
            continue;
        }
        let trip = match doc.into_trip().and_then(|t| t.validate().map(|_| t)) {
            Ok(trip) => trip,
            Err(err) => {
                warn!(error = %err, "skipping remote trip");
                report.skipped += 1;
                continue;
            }
        };
        local.put_trip(&trip)?;
        report.trips_applied += 1;
    }

    for doc in transactions {
        let current = local.get_transaction(&doc.id)?.map(|tx| tx.date_modified);
        if current.is_some_and(|local_at| doc.modified_at() <= local_at) {
            debug!(transaction_id = %doc.id, "local transaction is as new as remote, kept");
            report.kept_local += 1;
            continue;
        }
        if doc.is_deleted {
            if current.is_some() {
                local.delete_transaction(&doc.id)?;
                report.deleted += 1;
            }
            continue;
        }
        let tx = match doc.into_transaction().and_then(|tx| tx.validate().map(|_| tx)) {
            Ok(tx) => tx,
            Err(err) => {
                warn!(error = %err, "skipping remote transaction");
                report.skipped += 1;
                continue;
            }
        };
        if !local.trip_exists(&tx.trip_id)? {
            warn!(transaction_id = %tx.id, trip_id = %tx.trip_id, "skipping remote transaction for unknown trip");
            report.skipped += 1;
            continue;
        }
        local.put_transaction(&tx)?;
        report.transactions_applied += 1;
    }
    Ok(report)
}
