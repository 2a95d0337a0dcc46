// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde_json::Value;
use std::sync::{Arc, Mutex};

use tripclip::auth::{AuthGate, UserProfile};
use tripclip::catalog::Category;
use tripclip::local_store::LocalStore;
use tripclip::models::{Transaction, TransactionType, Trip, TripCurrency};
use tripclip::remote::{RemoteError, RemoteStore};
use tripclip::repository::TripRepository;

#[derive(Debug, Clone, PartialEq)]
pub enum RemoteCall {
    Upsert {
        collection: String,
        id: String,
        payload: Value,
    },
    Delete {
        collection: String,
        id: String,
    },
}

/// Records every call; serves `fetch_all` from preloaded documents.
#[derive(Default)]
pub struct RecordingRemote {
    pub calls: Mutex<Vec<RemoteCall>>,
    pub documents: Mutex<Vec<(String, Value)>>,
}

impl RecordingRemote {
    pub fn calls(&self) -> Vec<RemoteCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn seed(&self, collection: &str, doc: Value) {
        self.documents
            .lock()
            .unwrap()
            .push((collection.to_string(), doc));
    }
}

#[async_trait]
impl RemoteStore for RecordingRemote {
    async fn upsert(&self, collection: &str, id: &str, payload: Value) -> Result<(), RemoteError> {
        self.calls.lock().unwrap().push(RemoteCall::Upsert {
            collection: collection.to_string(),
            id: id.to_string(),
            payload,
        });
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), RemoteError> {
        self.calls.lock().unwrap().push(RemoteCall::Delete {
            collection: collection.to_string(),
            id: id.to_string(),
        });
        Ok(())
    }

    async fn fetch_all(&self, collection: &str, _user_id: &str) -> Result<Vec<Value>, RemoteError> {
        Ok(self
            .documents
            .lock()
            .unwrap()
            .iter()
            .filter(|(c, _)| c == collection)
            .map(|(_, d)| d.clone())
            .collect())
    }
}

/// Every call fails, as if the network were down.
pub struct FailingRemote;

#[async_trait]
impl RemoteStore for FailingRemote {
    async fn upsert(&self, _: &str, _: &str, _: Value) -> Result<(), RemoteError> {
        Err(RemoteError::Unavailable("network unreachable".into()))
    }

    async fn delete(&self, _: &str, _: &str) -> Result<(), RemoteError> {
        Err(RemoteError::api(503, "service unavailable"))
    }

    async fn fetch_all(&self, _: &str, _: &str) -> Result<Vec<Value>, RemoteError> {
        Err(RemoteError::Unavailable("network unreachable".into()))
    }
}

pub fn signed_in() -> AuthGate {
    AuthGate::signed_in(UserProfile {
        uid: "user-1".into(),
        display_name: Some("Traveller".into()),
        email: Some("traveller@example.com".into()),
    })
}

pub fn repo_with(remote: Arc<dyn RemoteStore>, auth: AuthGate) -> TripRepository {
    let local = Arc::new(LocalStore::open_in_memory().unwrap());
    TripRepository::new(local, remote, auth)
}

pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

pub fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

pub fn trip(name: &str, ccy: &str) -> Trip {
    Trip::new(name, TripCurrency::parse(ccy))
}

pub fn expense(trip_id: &str, amount: &str) -> Transaction {
    Transaction::new(
        trip_id,
        dec(amount),
        date("2025-04-02"),
        Category::Food,
        TransactionType::Expense,
    )
}

pub fn income(trip_id: &str, amount: &str) -> Transaction {
    Transaction::new(
        trip_id,
        dec(amount),
        date("2025-04-02"),
        Category::Other,
        TransactionType::Income,
    )
}
