// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod categories;
pub mod doctor;
pub mod exporter;
pub mod profile;
pub mod summary;
pub mod sync;
pub mod transactions;
pub mod trips;
