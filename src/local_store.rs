// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Durable local storage for trips and transactions.
//!
//! Every write re-queries the affected table and publishes the new snapshot
//! on a `watch` channel before returning, so observers see a local write
//! without any network involvement.

use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension, Row, params};
use rust_decimal::Decimal;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::catalog::{Category, PaymentMethod};
use crate::db;
use crate::errors::{Error, Result};
use crate::models::{GeoPoint, ImageCrop, Transaction, TransactionType, Trip, TripCurrency};
use crate::utils::{epoch_day, from_epoch_day};

const TRIP_COLUMNS: &str = "id, name, currency, is_currency_custom, image_uri, image_offset_x, \
     image_offset_y, image_scale, start_date, end_date, daily_budget, total_budget, is_active, \
     is_deleted, date_created, date_modified";

const TRANSACTION_COLUMNS: &str = "id, trip_id, notes, amount, date, category_name, \
     payment_method_name, latitude, longitude, image_uri, exclude_from_budget, type, is_deleted, \
     date_created, date_modified";

/// Hides transactions of soft-deleted trips.
const LIVE_TRIP_FILTER: &str = "AND trip_id IN (SELECT id FROM trips WHERE is_deleted=0)";

pub struct LocalStore {
    conn: Mutex<Connection>,
    trips_tx: watch::Sender<Vec<Trip>>,
    transactions_tx: watch::Sender<Vec<Transaction>>,
}

impl LocalStore {
    pub fn open(path: &Path) -> Result<Self> {
        Self::from_connection(db::open_or_init(path)?)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(db::open_in_memory()?)
    }

    /// Wraps an existing connection, creating the schema if needed.
    pub fn from_connection(mut conn: Connection) -> Result<Self> {
        db::init_schema(&mut conn)?;
        let trips = query_trips(&conn)?;
        let transactions = query_transactions(&conn)?;
        let (trips_tx, _) = watch::channel(trips);
        let (transactions_tx, _) = watch::channel(transactions);
        Ok(Self {
            conn: Mutex::new(conn),
            trips_tx,
            transactions_tx,
        })
    }

    pub(crate) fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| Error::LockPoisoned)
    }

    /// Insert-or-replace by id. Row position (insertion order) survives updates.
    pub fn put_trip(&self, trip: &Trip) -> Result<()> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO trips(id, name, currency, is_currency_custom, image_uri, image_offset_x,
                image_offset_y, image_scale, start_date, end_date, daily_budget, total_budget,
                is_active, is_deleted, date_created, date_modified)
             VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9,?10,?11,?12,?13,?14,?15,?16)
             ON CONFLICT(id) DO UPDATE SET
                name=excluded.name,
                currency=excluded.currency,
                is_currency_custom=excluded.is_currency_custom,
                image_uri=excluded.image_uri,
                image_offset_x=excluded.image_offset_x,
                image_offset_y=excluded.image_offset_y,
                image_scale=excluded.image_scale,
                start_date=excluded.start_date,
                end_date=excluded.end_date,
                daily_budget=excluded.daily_budget,
                total_budget=excluded.total_budget,
                is_active=excluded.is_active,
                is_deleted=excluded.is_deleted,
                date_created=excluded.date_created,
                date_modified=excluded.date_modified",
            params![
                trip.id,
                trip.name,
                trip.currency.code(),
                trip.currency.is_custom(),
                trip.image_uri,
                f64::from(trip.image_crop.offset_x),
                f64::from(trip.image_crop.offset_y),
                f64::from(trip.image_crop.scale),
                trip.start_date.map(epoch_day),
                trip.end_date.map(epoch_day),
                trip.daily_budget.map(|d| d.to_string()),
                trip.total_budget.map(|d| d.to_string()),
                trip.is_active,
                trip.is_deleted,
                trip.date_created,
                trip.date_modified,
            ],
        )?;
        debug!(trip_id = %trip.id, "stored trip");
        // a trip's soft-delete flag decides whether its transactions are visible
        self.publish_transactions(&conn)?;
        self.publish_trips(&conn)
    }

    pub fn put_transaction(&self, tx: &Transaction) -> Result<()> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO transactions(id, trip_id, notes, amount, date, category_name,
                category_icon, payment_method_name, payment_method_icon, latitude, longitude,
                image_uri, exclude_from_budget, type, is_deleted, date_created, date_modified)
             VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9,?10,?11,?12,?13,?14,?15,?16,?17)
             ON CONFLICT(id) DO UPDATE SET
                trip_id=excluded.trip_id,
                notes=excluded.notes,
                amount=excluded.amount,
                date=excluded.date,
                category_name=excluded.category_name,
                category_icon=excluded.category_icon,
                payment_method_name=excluded.payment_method_name,
                payment_method_icon=excluded.payment_method_icon,
                latitude=excluded.latitude,
                longitude=excluded.longitude,
                image_uri=excluded.image_uri,
                exclude_from_budget=excluded.exclude_from_budget,
                type=excluded.type,
                is_deleted=excluded.is_deleted,
                date_created=excluded.date_created,
                date_modified=excluded.date_modified",
            params![
                tx.id,
                tx.trip_id,
                tx.notes,
                tx.amount.to_string(),
                epoch_day(tx.date),
                tx.category.name(),
                tx.category.icon(),
                tx.payment_method.name(),
                tx.payment_method.icon(),
                tx.location.map(|p| p.latitude),
                tx.location.map(|p| p.longitude),
                tx.image_uri,
                tx.exclude_from_budget,
                tx.r#type.as_str(),
                tx.is_deleted,
                tx.date_created,
                tx.date_modified,
            ],
        )?;
        debug!(transaction_id = %tx.id, trip_id = %tx.trip_id, "stored transaction");
        self.publish_transactions(&conn)
    }

    /// Hard delete. Returns the ids of transactions removed by the cascade;
    /// empty (and no error) when the trip was already gone.
    pub fn delete_trip(&self, id: &str) -> Result<Vec<String>> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        let cascaded = {
            let mut stmt = tx.prepare("SELECT id FROM transactions WHERE trip_id=?1 ORDER BY rowid")?;
            let rows = stmt.query_map(params![id], |r| r.get::<_, String>(0))?;
            rows.collect::<rusqlite::Result<Vec<_>>>()?
        };
        let removed = tx.execute("DELETE FROM trips WHERE id=?1", params![id])?;
        tx.commit()?;
        debug!(trip_id = %id, removed, cascaded = cascaded.len(), "deleted trip");
        // transactions first: observers never see the trip gone with its rows still listed
        self.publish_transactions(&conn)?;
        self.publish_trips(&conn)?;
        Ok(cascaded)
    }

    pub fn delete_transaction(&self, id: &str) -> Result<()> {
        let conn = self.conn()?;
        let removed = conn.execute("DELETE FROM transactions WHERE id=?1", params![id])?;
        debug!(transaction_id = %id, removed, "deleted transaction");
        self.publish_transactions(&conn)
    }

    /// Looks up a trip regardless of its soft-delete flag.
    pub fn get_trip(&self, id: &str) -> Result<Option<Trip>> {
        let conn = self.conn()?;
        let sql = format!("SELECT {TRIP_COLUMNS} FROM trips WHERE id=?1");
        let trip = conn.query_row(&sql, params![id], trip_from_row).optional()?;
        Ok(trip)
    }

    pub fn get_transaction(&self, id: &str) -> Result<Option<Transaction>> {
        let conn = self.conn()?;
        let sql = format!("SELECT {TRANSACTION_COLUMNS} FROM transactions WHERE id=?1");
        let tx = conn
            .query_row(&sql, params![id], transaction_from_row)
            .optional()?;
        Ok(tx)
    }

    pub fn trip_exists(&self, id: &str) -> Result<bool> {
        let conn = self.conn()?;
        let found: Option<i64> = conn
            .query_row("SELECT 1 FROM trips WHERE id=?1", params![id], |r| r.get(0))
            .optional()?;
        Ok(found.is_some())
    }

    /// Live list of non-deleted trips, start date descending, undated last.
    pub fn observe_trips(&self) -> watch::Receiver<Vec<Trip>> {
        self.trips_tx.subscribe()
    }

    /// Live list of every non-deleted transaction whose trip is not deleted.
    pub fn observe_transactions(&self) -> watch::Receiver<Vec<Transaction>> {
        self.transactions_tx.subscribe()
    }

    /// Non-deleted transactions of one trip, newest date first. Empty when
    /// the trip itself is soft-deleted.
    pub fn transactions_for(&self, trip_id: &str) -> Result<Vec<Transaction>> {
        let conn = self.conn()?;
        let sql = format!(
            "SELECT {TRANSACTION_COLUMNS} FROM transactions
             WHERE trip_id=?1 AND is_deleted=0 {LIVE_TRIP_FILTER}
             ORDER BY date DESC, rowid"
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params![trip_id], transaction_from_row)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    fn publish_trips(&self, conn: &Connection) -> Result<()> {
        let trips = query_trips(conn)?;
        self.trips_tx.send_replace(trips);
        Ok(())
    }

    fn publish_transactions(&self, conn: &Connection) -> Result<()> {
        let transactions = query_transactions(conn)?;
        self.transactions_tx.send_replace(transactions);
        Ok(())
    }
}

fn query_trips(conn: &Connection) -> Result<Vec<Trip>> {
    let sql = format!(
        "SELECT {TRIP_COLUMNS} FROM trips WHERE is_deleted=0
         ORDER BY start_date IS NULL, start_date DESC, rowid"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([], trip_from_row)?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}

fn query_transactions(conn: &Connection) -> Result<Vec<Transaction>> {
    let sql = format!(
        "SELECT {TRANSACTION_COLUMNS} FROM transactions WHERE is_deleted=0 {LIVE_TRIP_FILTER}
         ORDER BY date DESC, rowid"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([], transaction_from_row)?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}

fn conversion_error(
    idx: usize,
    err: impl std::error::Error + Send + Sync + 'static,
) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(err))
}

fn decimal_col(r: &Row, idx: usize) -> rusqlite::Result<Decimal> {
    let s: String = r.get(idx)?;
    s.parse::<Decimal>().map_err(|e| conversion_error(idx, e))
}

fn opt_decimal_col(r: &Row, idx: usize) -> rusqlite::Result<Option<Decimal>> {
    let s: Option<String> = r.get(idx)?;
    s.map(|s| s.parse::<Decimal>().map_err(|e| conversion_error(idx, e)))
        .transpose()
}

fn opt_date_col(r: &Row, idx: usize) -> rusqlite::Result<Option<chrono::NaiveDate>> {
    let days: Option<i64> = r.get(idx)?;
    Ok(days.and_then(from_epoch_day))
}

fn trip_from_row(r: &Row) -> rusqlite::Result<Trip> {
    let currency: String = r.get(2)?;
    let is_custom: bool = r.get(3)?;
    let offset_x: f64 = r.get(5)?;
    let offset_y: f64 = r.get(6)?;
    let scale: f64 = r.get(7)?;
    let date_created: DateTime<Utc> = r.get(14)?;
    Ok(Trip {
        id: r.get(0)?,
        name: r.get(1)?,
        currency: TripCurrency::from_parts(currency, is_custom),
        image_uri: r.get(4)?,
        image_crop: ImageCrop {
            offset_x: offset_x as f32,
            offset_y: offset_y as f32,
            scale: scale as f32,
        },
        start_date: opt_date_col(r, 8)?,
        end_date: opt_date_col(r, 9)?,
        daily_budget: opt_decimal_col(r, 10)?,
        total_budget: opt_decimal_col(r, 11)?,
        is_active: r.get(12)?,
        is_deleted: r.get(13)?,
        date_created,
        date_modified: r.get(15)?,
    })
}

fn transaction_from_row(r: &Row) -> rusqlite::Result<Transaction> {
    let id: String = r.get(0)?;
    let days: i64 = r.get(4)?;
    let date = from_epoch_day(days).ok_or(rusqlite::Error::IntegralValueOutOfRange(4, days))?;
    let category_name: String = r.get(5)?;
    let category = Category::from_name(&category_name).unwrap_or_else(|| {
        warn!(transaction_id = %id, category = %category_name, "unknown category, using Other");
        Category::Other
    });
    let payment_name: String = r.get(6)?;
    let payment_method = PaymentMethod::from_name(&payment_name).unwrap_or_else(|| {
        warn!(transaction_id = %id, payment_method = %payment_name, "unknown payment method, using Other");
        PaymentMethod::Other
    });
    let latitude: Option<f64> = r.get(7)?;
    let longitude: Option<f64> = r.get(8)?;
    let location = match (latitude, longitude) {
        (Some(latitude), Some(longitude)) => Some(GeoPoint {
            latitude,
            longitude,
        }),
        _ => None,
    };
    let type_s: String = r.get(11)?;
    let r#type = TransactionType::parse(&type_s).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            11,
            Type::Text,
            format!("unknown transaction type '{}'", type_s).into(),
        )
    })?;
    Ok(Transaction {
        id,
        trip_id: r.get(1)?,
        notes: r.get(2)?,
        amount: decimal_col(r, 3)?,
        date,
        category,
        payment_method,
        location,
        image_uri: r.get(9)?,
        exclude_from_budget: r.get(10)?,
        r#type,
        is_deleted: r.get(12)?,
        date_created: r.get(13)?,
        date_modified: r.get(14)?,
    })
}
