// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{DateTime, NaiveDate, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::catalog::{Category, PaymentMethod};
use crate::errors::{Error, Result};

static STANDARD_CODE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z]{3}$").expect("valid regex"));

/// Trip currency. A code is either a standard ISO-style code or a freeform
/// custom label, never both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "code", rename_all = "snake_case")]
pub enum TripCurrency {
    Standard(String),
    Custom(String),
}

impl TripCurrency {
    /// Three uppercase letters are treated as a standard code, anything else is custom.
    pub fn parse(raw: &str) -> Self {
        let code = raw.trim();
        let upper = code.to_uppercase();
        if STANDARD_CODE.is_match(&upper) {
            TripCurrency::Standard(upper)
        } else {
            TripCurrency::Custom(code.to_string())
        }
    }

    pub fn from_parts(code: String, is_custom: bool) -> Self {
        if is_custom {
            TripCurrency::Custom(code)
        } else {
            TripCurrency::Standard(code)
        }
    }

    pub fn code(&self) -> &str {
        match self {
            TripCurrency::Standard(c) | TripCurrency::Custom(c) => c,
        }
    }

    pub fn is_custom(&self) -> bool {
        matches!(self, TripCurrency::Custom(_))
    }
}

/// Cover image crop. Presentational only, persisted as-is.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImageCrop {
    pub offset_x: f32,
    pub offset_y: f32,
    pub scale: f32,
}

impl Default for ImageCrop {
    fn default() -> Self {
        Self {
            offset_x: 0.0,
            offset_y: 0.0,
            scale: 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trip {
    pub id: String,
    pub name: String,
    pub currency: TripCurrency,
    pub image_uri: Option<String>,
    pub image_crop: ImageCrop,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub daily_budget: Option<Decimal>,
    pub total_budget: Option<Decimal>,
    pub is_active: bool,
    pub is_deleted: bool,
    pub date_created: DateTime<Utc>,
    /// Last local or applied remote change; newer wins on pull
    pub date_modified: DateTime<Utc>,
}

impl Trip {
    /// New trip with a client-generated id.
    pub fn new(name: impl Into<String>, currency: TripCurrency) -> Self {
        let now = Utc::now();
        Self {
            id: new_id(),
            name: name.into(),
            currency,
            image_uri: None,
            image_crop: ImageCrop::default(),
            start_date: None,
            end_date: None,
            daily_budget: None,
            total_budget: None,
            is_active: false,
            is_deleted: false,
            date_created: now,
            date_modified: now,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(Error::invalid_record("trip id is empty"));
        }
        if self.name.trim().is_empty() {
            return Err(Error::invalid_record(format!("trip '{}' has no name", self.id)));
        }
        for (label, value) in [("daily", self.daily_budget), ("total", self.total_budget)] {
            if value.is_some_and(|v| v.is_sign_negative() && !v.is_zero()) {
                return Err(Error::invalid_record(format!(
                    "trip '{}' has a negative {} budget",
                    self.id, label
                )));
            }
        }
        Ok(())
    }

    /// Start after end. Allowed by storage, flagged by `doctor`.
    pub fn has_inverted_dates(&self) -> bool {
        matches!((self.start_date, self.end_date), (Some(s), Some(e)) if s > e)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionType {
    Expense,
    Income,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Expense => "EXPENSE",
            TransactionType::Income => "INCOME",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "EXPENSE" => Some(TransactionType::Expense),
            "INCOME" => Some(TransactionType::Income),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub trip_id: String,
    pub notes: String,
    /// Always non-negative; direction comes from `r#type`.
    pub amount: Decimal,
    pub date: NaiveDate,
    pub category: Category,
    pub payment_method: PaymentMethod,
    pub location: Option<GeoPoint>,
    pub image_uri: Option<String>,
    pub exclude_from_budget: bool,
    pub r#type: TransactionType,
    pub is_deleted: bool,
    pub date_created: DateTime<Utc>,
    pub date_modified: DateTime<Utc>,
}

impl Transaction {
    pub fn new(
        trip_id: impl Into<String>,
        amount: Decimal,
        date: NaiveDate,
        category: Category,
        r#type: TransactionType,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: new_id(),
            trip_id: trip_id.into(),
            notes: String::new(),
            amount,
            date,
            category,
            payment_method: PaymentMethod::Cash,
            location: None,
            image_uri: None,
            exclude_from_budget: false,
            r#type,
            is_deleted: false,
            date_created: now,
            date_modified: now,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(Error::invalid_record("transaction id is empty"));
        }
        if self.trip_id.trim().is_empty() {
            return Err(Error::invalid_record(format!(
                "transaction '{}' has no trip",
                self.id
            )));
        }
        if self.amount.is_sign_negative() && !self.amount.is_zero() {
            return Err(Error::invalid_record(format!(
                "transaction '{}' has negative amount {}",
                self.id, self.amount
            )));
        }
        Ok(())
    }

    /// Counts toward trip spend.
    pub fn is_budgeted_expense(&self) -> bool {
        self.r#type == TransactionType::Expense && !self.exclude_from_budget
    }
}

pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}
