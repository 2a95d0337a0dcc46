// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Remote document store client.
//!
//! Documents live at `{base_url}/{collection}/{id}`. The client is stateless:
//! no caching, no retries, last write to reach the server wins.

use async_trait::async_trait;
use chrono::Utc;
use reqwest::StatusCode;
use serde_json::{Value, json};
use thiserror::Error;
use tracing::debug;

use crate::config::RemoteConfig;
use crate::utils::http_client;

pub const TRIPS_COLLECTION: &str = "trips";
pub const TRANSACTIONS_COLLECTION: &str = "transactions";

const MAX_LOG_BODY_CHARS: usize = 512;

#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Non-success response from the document store
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Store unreachable or deliberately disabled
    #[error("Remote unavailable: {0}")]
    Unavailable(String),
}

impl RemoteError {
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Http(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// Best-effort mirror target keyed by collection and record id.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Full-document write.
    async fn upsert(&self, collection: &str, id: &str, payload: Value) -> Result<(), RemoteError>;

    /// Remove a document. Implementations may tombstone instead of erasing.
    async fn delete(&self, collection: &str, id: &str) -> Result<(), RemoteError>;

    /// Every document in a collection owned by `user_id`, tombstones included.
    async fn fetch_all(&self, collection: &str, user_id: &str) -> Result<Vec<Value>, RemoteError>;
}

/// Used when no remote is configured. Writes succeed without leaving the device.
#[derive(Debug, Default, Clone)]
pub struct OfflineRemoteStore;

#[async_trait]
impl RemoteStore for OfflineRemoteStore {
    async fn upsert(&self, collection: &str, id: &str, _payload: Value) -> Result<(), RemoteError> {
        debug!(collection, id, "offline: upsert not mirrored");
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), RemoteError> {
        debug!(collection, id, "offline: delete not mirrored");
        Ok(())
    }

    async fn fetch_all(&self, _collection: &str, _user_id: &str) -> Result<Vec<Value>, RemoteError> {
        Ok(Vec::new())
    }
}

/// REST document store client.
#[derive(Debug, Clone)]
pub struct HttpRemoteStore {
    client: reqwest::Client,
    base_url: String,
    api_token: Option<String>,
}

impl HttpRemoteStore {
    pub fn new(config: &RemoteConfig) -> Result<Self, RemoteError> {
        let client = http_client(config.timeout_secs())?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_token: config.api_token.clone(),
        })
    }

    fn document_url(&self, collection: &str, id: &str) -> String {
        format!(
            "{}/{}/{}",
            self.base_url,
            collection,
            urlencoding::encode(id)
        )
    }

    fn authorize(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    async fn check(resp: reqwest::Response) -> Result<reqwest::Response, RemoteError> {
        let status = resp.status();
        if status.is_success() {
            debug!(%status, "remote response");
            return Ok(resp);
        }
        let body = resp.text().await.unwrap_or_default();
        let preview: String = body.chars().take(MAX_LOG_BODY_CHARS).collect();
        Err(RemoteError::api(status.as_u16(), preview))
    }
}

#[async_trait]
impl RemoteStore for HttpRemoteStore {
    async fn upsert(&self, collection: &str, id: &str, payload: Value) -> Result<(), RemoteError> {
        let req = self
            .client
            .put(self.document_url(collection, id))
            .json(&payload);
        let resp = self.authorize(req).send().await?;
        Self::check(resp).await?;
        Ok(())
    }

    /// Tombstones the document so other devices can notice the removal.
    async fn delete(&self, collection: &str, id: &str) -> Result<(), RemoteError> {
        let req = self
            .client
            .patch(self.document_url(collection, id))
            .json(&json!({ "isDeleted": true, "dateModified": Utc::now() }));
        let resp = self.authorize(req).send().await?;
        match Self::check(resp).await {
            Ok(_) => Ok(()),
            // never mirrored, nothing to tombstone
            Err(RemoteError::Api { status, .. }) if status == StatusCode::NOT_FOUND.as_u16() => {
                debug!(collection, id, "remote delete: document absent");
                Ok(())
            }
            Err(err) => Err(err),
        }
    }

    async fn fetch_all(&self, collection: &str, user_id: &str) -> Result<Vec<Value>, RemoteError> {
        let req = self
            .client
            .get(format!("{}/{}", self.base_url, collection))
            .query(&[("userId", user_id)]);
        let resp = self.authorize(req).send().await?;
        let resp = Self::check(resp).await?;
        let body: Value = resp.json().await?;
        match body {
            Value::Array(items) => Ok(items),
            Value::Object(mut map) => match map.remove("documents") {
                Some(Value::Array(items)) => Ok(items),
                _ => Ok(Vec::new()),
            },
            _ => Ok(Vec::new()),
        }
    }
}
