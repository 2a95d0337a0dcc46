// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Local-first write sequencing and remote mirroring.

pub mod coordinator;
pub mod payload;

pub use coordinator::{PullReport, SyncCoordinator};
pub use payload::{RemoteTransaction, RemoteTrip};
