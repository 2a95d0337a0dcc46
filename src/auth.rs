// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Authentication status as seen by the engine.
//!
//! Identity providers live outside this crate; they push their result into
//! an [`AuthGate`] and the engine only reads it.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::watch;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Stable identifier from the identity provider
    pub uid: String,
    pub display_name: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum AuthState {
    Pending,
    SignedIn(UserProfile),
    SignedOut,
}

#[derive(Debug, Clone)]
pub struct AuthGate {
    tx: Arc<watch::Sender<AuthState>>,
}

impl Default for AuthGate {
    fn default() -> Self {
        Self::new()
    }
}

impl AuthGate {
    /// Starts in `Pending` until a provider reports.
    pub fn new() -> Self {
        Self::with_state(AuthState::Pending)
    }

    pub fn with_state(state: AuthState) -> Self {
        let (tx, _) = watch::channel(state);
        Self { tx: Arc::new(tx) }
    }

    pub fn signed_in(profile: UserProfile) -> Self {
        Self::with_state(AuthState::SignedIn(profile))
    }

    pub fn set(&self, state: AuthState) {
        self.tx.send_if_modified(|current| {
            if *current == state {
                return false;
            }
            *current = state;
            true
        });
    }

    pub fn sign_out(&self) {
        self.set(AuthState::SignedOut);
    }

    pub fn current(&self) -> AuthState {
        self.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.tx.subscribe()
    }

    pub fn user(&self) -> Option<UserProfile> {
        match &*self.tx.borrow() {
            AuthState::SignedIn(profile) => Some(profile.clone()),
            _ => None,
        }
    }

    pub fn user_id(&self) -> Option<String> {
        self.user().map(|u| u.uid)
    }
}
