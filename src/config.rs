// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::auth::{AuthState, UserProfile};
use crate::db;
use crate::errors::{Error, Result};

const DEFAULT_REMOTE_TIMEOUT_SECS: u64 = 15;

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Overrides the platform data dir location of the SQLite file
    pub database: Option<PathBuf>,
    pub remote: Option<RemoteConfig>,
    pub user: Option<UserConfig>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RemoteConfig {
    pub base_url: String,
    pub api_token: Option<String>,
    pub timeout_secs: Option<u64>,
}

impl RemoteConfig {
    pub fn timeout_secs(&self) -> u64 {
        self.timeout_secs.unwrap_or(DEFAULT_REMOTE_TIMEOUT_SECS)
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct UserConfig {
    pub id: String,
    pub display_name: Option<String>,
    pub email: Option<String>,
}

impl Config {
    /// Reads `config.toml` from the platform config dir and applies
    /// `TRIPCLIP_*` environment overrides.
    pub fn load() -> Result<Self> {
        let path = db::project_dirs()?.config_dir().join("config.toml");
        let mut config = Self::from_file(&path)?;
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Missing file yields the defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = fs::read_to_string(path)?;
        Self::from_toml_str(&raw)
            .map_err(|e| Error::config(format!("{}: {}", path.display(), e)))
    }

    pub fn from_toml_str(raw: &str) -> Result<Self> {
        toml::from_str(raw).map_err(|e| Error::config(e.to_string()))
    }

    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(db) = lookup("TRIPCLIP_DB") {
            self.database = Some(PathBuf::from(db));
        }
        if let Some(url) = lookup("TRIPCLIP_REMOTE_URL") {
            match self.remote.as_mut() {
                Some(remote) => remote.base_url = url,
                None => {
                    self.remote = Some(RemoteConfig {
                        base_url: url,
                        api_token: None,
                        timeout_secs: None,
                    })
                }
            }
        }
        if let Some(token) = lookup("TRIPCLIP_REMOTE_TOKEN") {
            if let Some(remote) = self.remote.as_mut() {
                remote.api_token = Some(token);
            }
        }
        if let Some(id) = lookup("TRIPCLIP_USER_ID") {
            match self.user.as_mut() {
                Some(user) => user.id = id,
                None => {
                    self.user = Some(UserConfig {
                        id,
                        display_name: None,
                        email: None,
                    })
                }
            }
        }
    }

    pub fn database_path(&self) -> Result<PathBuf> {
        match &self.database {
            Some(path) => Ok(path.clone()),
            None => db::db_path(),
        }
    }

    /// Starting auth state for a process that has no interactive sign-in.
    pub fn initial_auth_state(&self) -> AuthState {
        match &self.user {
            Some(user) if !user.id.trim().is_empty() => AuthState::SignedIn(UserProfile {
                uid: user.id.clone(),
                display_name: user.display_name.clone(),
                email: user.email.clone(),
            }),
            _ => AuthState::SignedOut,
        }
    }
}
