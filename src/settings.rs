// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Plain key/value profile preferences kept next to the trip tables.

use rusqlite::{OptionalExtension, params};

use crate::errors::Result;
use crate::local_store::LocalStore;

pub const DEFAULT_CURRENCY: &str = "default_currency";
pub const DISPLAY_NAME: &str = "display_name";
pub const EMAIL: &str = "email";

impl LocalStore {
    pub fn get_setting(&self, key: &str) -> Result<Option<String>> {
        let conn = self.conn()?;
        let v: Option<String> = conn
            .query_row(
                "SELECT value FROM settings WHERE key=?1",
                params![key],
                |r| r.get(0),
            )
            .optional()?;
        Ok(v)
    }

    pub fn set_setting(&self, key: &str, value: &str) -> Result<()> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO settings(key, value) VALUES(?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value=excluded.value",
            params![key, value],
        )?;
        Ok(())
    }

    pub fn settings(&self) -> Result<Vec<(String, String)>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare("SELECT key, value FROM settings ORDER BY key")?;
        let rows = stmt.query_map([], |r| Ok((r.get::<_, String>(0)?, r.get::<_, String>(1)?)))?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// Currency for new trips when none is given; USD until configured.
    pub fn default_currency(&self) -> Result<String> {
        Ok(self
            .get_setting(DEFAULT_CURRENCY)?
            .unwrap_or_else(|| "USD".to_string()))
    }
}
