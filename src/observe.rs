// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Derived live views over `watch` channels.

use tokio::sync::watch;

/// Maps a live value into a new live value.
///
/// The mapping runs once up front and again on every change of `source`.
/// The background task stops when every receiver of the derived view is
/// dropped or the source closes. Must be called inside a Tokio runtime.
pub fn derive<S, T, F>(mut source: watch::Receiver<S>, map: F) -> watch::Receiver<T>
where
    S: Send + Sync + 'static,
    T: Send + Sync + 'static,
    F: Fn(&S) -> T + Send + 'static,
{
    let initial = map(&source.borrow_and_update());
    let (tx, rx) = watch::channel(initial);
    tokio::spawn(async move {
        loop {
            tokio::select! {
                changed = source.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let next = map(&source.borrow_and_update());
                    tx.send_replace(next);
                }
                _ = tx.closed() => break,
            }
        }
    });
    rx
}
