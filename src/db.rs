// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use directories::ProjectDirs;
use once_cell::sync::Lazy;
use rusqlite::Connection;
use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::{Error, Result};

static APP: Lazy<(&str, &str, &str)> = Lazy::new(|| ("com.alphavelocity", "Tripclip", "tripclip"));

pub fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from(APP.0, APP.1, APP.2)
        .ok_or_else(|| Error::config("Could not determine platform-specific data dir"))
}

pub fn db_path() -> Result<PathBuf> {
    let proj = project_dirs()?;
    let data_dir = proj.data_dir();
    fs::create_dir_all(data_dir)?;
    Ok(data_dir.join("tripclip.sqlite"))
}

pub fn open_or_init(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let mut conn = Connection::open(path)?;
    init_schema(&mut conn)?;
    Ok(conn)
}

pub fn open_in_memory() -> Result<Connection> {
    let mut conn = Connection::open_in_memory()?;
    init_schema(&mut conn)?;
    Ok(conn)
}

pub fn init_schema(conn: &mut Connection) -> Result<()> {
    conn.execute_batch(
        r#"
    PRAGMA foreign_keys = ON;

    CREATE TABLE IF NOT EXISTS settings(
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    );

    -- dates are day-epoch integers, amounts are decimal TEXT
    CREATE TABLE IF NOT EXISTS trips(
        id TEXT PRIMARY KEY,
        name TEXT NOT NULL,
        currency TEXT NOT NULL,
        is_currency_custom INTEGER NOT NULL DEFAULT 0,
        image_uri TEXT,
        image_offset_x REAL NOT NULL DEFAULT 0,
        image_offset_y REAL NOT NULL DEFAULT 0,
        image_scale REAL NOT NULL DEFAULT 1,
        start_date INTEGER,
        end_date INTEGER,
        daily_budget TEXT,
        total_budget TEXT,
        is_active INTEGER NOT NULL DEFAULT 0,
        is_deleted INTEGER NOT NULL DEFAULT 0,
        date_created TEXT NOT NULL,
        date_modified TEXT NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_trips_start_date ON trips(start_date);

    CREATE TABLE IF NOT EXISTS transactions(
        id TEXT PRIMARY KEY,
        trip_id TEXT NOT NULL,
        notes TEXT NOT NULL DEFAULT '',
        amount TEXT NOT NULL,
        date INTEGER NOT NULL,
        category_name TEXT NOT NULL,
        category_icon TEXT NOT NULL,
        payment_method_name TEXT NOT NULL,
        payment_method_icon TEXT NOT NULL,
        latitude REAL,
        longitude REAL,
        image_uri TEXT,
        exclude_from_budget INTEGER NOT NULL DEFAULT 0,
        type TEXT NOT NULL CHECK(type IN ('EXPENSE','INCOME')),
        is_deleted INTEGER NOT NULL DEFAULT 0,
        date_created TEXT NOT NULL,
        date_modified TEXT NOT NULL,
        FOREIGN KEY(trip_id) REFERENCES trips(id) ON DELETE CASCADE
    );
    CREATE INDEX IF NOT EXISTS idx_transactions_trip ON transactions(trip_id);
    "#,
    )?;
    Ok(())
}
