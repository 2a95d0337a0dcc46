// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod auth;
pub mod catalog;
pub mod cli;
pub mod commands;
pub mod config;
pub mod db;
pub mod errors;
pub mod local_store;
pub mod models;
pub mod observe;
pub mod remote;
pub mod repository;
pub mod resolver;
pub mod settings;
pub mod summary;
pub mod sync;
pub mod utils;

pub use errors::{Error, Result};
