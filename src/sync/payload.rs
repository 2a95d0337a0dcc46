// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Remote document shapes.
//!
//! Flattened camelCase projections of the domain records. Date-only values
//! travel as midnight-UTC timestamps and money as plain numbers. Money that
//! cannot be represented on either side rejects the whole document.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use serde::{Deserialize, Serialize};

use crate::catalog::{Category, PaymentMethod};
use crate::errors::{Error, Result};
use crate::models::{GeoPoint, ImageCrop, Transaction, TransactionType, Trip, TripCurrency};
use crate::utils::{date_to_timestamp, timestamp_to_date};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteTrip {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub currency: String,
    pub is_currency_custom: bool,
    pub image_uri: Option<String>,
    pub image_offset_x: f32,
    pub image_offset_y: f32,
    pub image_scale: f32,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub daily_budget: Option<f64>,
    pub total_budget: Option<f64>,
    pub is_active: bool,
    #[serde(default)]
    pub is_deleted: bool,
    pub date_created: DateTime<Utc>,
    /// Absent on documents written before modification times were tracked
    #[serde(default)]
    pub date_modified: Option<DateTime<Utc>>,
}

impl RemoteTrip {
    pub fn from_trip(trip: &Trip, user_id: &str) -> Result<Self> {
        let label = format!("trip '{}'", trip.id);
        Ok(Self {
            id: trip.id.clone(),
            user_id: user_id.to_string(),
            name: trip.name.clone(),
            currency: trip.currency.code().to_string(),
            is_currency_custom: trip.currency.is_custom(),
            image_uri: trip.image_uri.clone(),
            image_offset_x: trip.image_crop.offset_x,
            image_offset_y: trip.image_crop.offset_y,
            image_scale: trip.image_crop.scale,
            start_date: trip.start_date.map(date_to_timestamp),
            end_date: trip.end_date.map(date_to_timestamp),
            daily_budget: trip
                .daily_budget
                .map(|d| money_to_f64(d, &label))
                .transpose()?,
            total_budget: trip
                .total_budget
                .map(|d| money_to_f64(d, &label))
                .transpose()?,
            is_active: trip.is_active,
            is_deleted: trip.is_deleted,
            date_created: trip.date_created,
            date_modified: Some(trip.date_modified),
        })
    }

    /// When this document last changed.
    pub fn modified_at(&self) -> DateTime<Utc> {
        self.date_modified.unwrap_or(self.date_created)
    }

    pub fn into_trip(self) -> Result<Trip> {
        let label = format!("remote trip '{}'", self.id);
        let date_modified = self.modified_at();
        Ok(Trip {
            id: self.id,
            name: self.name,
            currency: TripCurrency::from_parts(self.currency, self.is_currency_custom),
            image_uri: self.image_uri,
            image_crop: ImageCrop {
                offset_x: self.image_offset_x,
                offset_y: self.image_offset_y,
                scale: self.image_scale,
            },
            start_date: self.start_date.as_ref().map(timestamp_to_date),
            end_date: self.end_date.as_ref().map(timestamp_to_date),
            daily_budget: self
                .daily_budget
                .map(|v| money_from_f64(v, &label))
                .transpose()?,
            total_budget: self
                .total_budget
                .map(|v| money_from_f64(v, &label))
                .transpose()?,
            is_active: self.is_active,
            is_deleted: false,
            date_created: self.date_created,
            date_modified,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteTransaction {
    pub id: String,
    pub user_id: String,
    pub trip_id: String,
    pub notes: String,
    pub amount: f64,
    pub date: DateTime<Utc>,
    pub category_name: String,
    pub category_icon: String,
    pub payment_method_name: String,
    pub payment_method_icon: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub image_uri: Option<String>,
    pub exclude_from_budget: bool,
    pub r#type: TransactionType,
    #[serde(default)]
    pub is_deleted: bool,
    pub date_created: DateTime<Utc>,
    #[serde(default)]
    pub date_modified: Option<DateTime<Utc>>,
}

impl RemoteTransaction {
    pub fn from_transaction(tx: &Transaction, user_id: &str) -> Result<Self> {
        Ok(Self {
            id: tx.id.clone(),
            user_id: user_id.to_string(),
            trip_id: tx.trip_id.clone(),
            notes: tx.notes.clone(),
            amount: money_to_f64(tx.amount, &format!("transaction '{}'", tx.id))?,
            date: date_to_timestamp(tx.date),
            category_name: tx.category.name().to_string(),
            category_icon: tx.category.icon().to_string(),
            payment_method_name: tx.payment_method.name().to_string(),
            payment_method_icon: tx.payment_method.icon().to_string(),
            latitude: tx.location.map(|p| p.latitude),
            longitude: tx.location.map(|p| p.longitude),
            image_uri: tx.image_uri.clone(),
            exclude_from_budget: tx.exclude_from_budget,
            r#type: tx.r#type,
            is_deleted: tx.is_deleted,
            date_created: tx.date_created,
            date_modified: Some(tx.date_modified),
        })
    }

    pub fn modified_at(&self) -> DateTime<Utc> {
        self.date_modified.unwrap_or(self.date_created)
    }

    pub fn into_transaction(self) -> Result<Transaction> {
        let amount = money_from_f64(self.amount, &format!("remote transaction '{}'", self.id))?;
        let date_modified = self.modified_at();
        let location = match (self.latitude, self.longitude) {
            (Some(latitude), Some(longitude)) => Some(GeoPoint {
                latitude,
                longitude,
            }),
            _ => None,
        };
        Ok(Transaction {
            id: self.id,
            trip_id: self.trip_id,
            notes: self.notes,
            amount,
            date: timestamp_to_date(&self.date),
            category: Category::from_name(&self.category_name).unwrap_or(Category::Other),
            payment_method: PaymentMethod::from_name(&self.payment_method_name)
                .unwrap_or(PaymentMethod::Other),
            location,
            image_uri: self.image_uri,
            exclude_from_budget: self.exclude_from_budget,
            r#type: self.r#type,
            is_deleted: false,
            date_created: self.date_created,
            date_modified,
        })
    }
}

fn money_to_f64(d: Decimal, label: &str) -> Result<f64> {
    d.to_f64()
        .filter(|v| v.is_finite())
        .ok_or_else(|| Error::invalid_record(format!("{label}: amount {d} has no numeric form")))
}

/// Floats come back with binary noise; money keeps cent precision plus a margin.
fn money_from_f64(v: f64, label: &str) -> Result<Decimal> {
    Decimal::from_f64(v)
        .map(|d| d.round_dp(4).normalize())
        .ok_or_else(|| Error::invalid_record(format!("{label}: amount {v} is out of range")))
}
