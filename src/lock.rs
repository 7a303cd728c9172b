// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2025 Daniel Negri
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! Per-user lock manager.
//!
//! Serializes charge/use operations targeting the same user while leaving
//! distinct users fully concurrent. The manager owns a concurrent map from
//! [`UserId`] to a shared [`Mutex`] handle; the map entry is created lazily
//! and every caller for the same user receives the same handle.
//!
//! # Thread Safety
//!
//! Handle creation is atomic: the [`DashMap`] entry API holds a shard lock
//! only for the create-or-fetch step, so two racing callers can never
//! publish two different handles for one user, and unrelated users are
//! never serialized through another user's critical section.

use crate::base::UserId;
use dashmap::DashMap;
use parking_lot::Mutex;
use std::sync::Arc;

/// Registry of per-user mutual-exclusion handles.
///
/// Handles are never evicted; one entry exists per ever-seen user for the
/// lifetime of the process.
///
/// # Fairness
///
/// [`parking_lot::Mutex`] is eventually fair but makes no FIFO guarantee
/// among waiters. Callers must not depend on waiter ordering.
#[derive(Debug, Default)]
pub struct UserLockManager {
    locks: DashMap<UserId, Arc<Mutex<()>>>,
}

impl UserLockManager {
    /// Creates a manager with no registered users.
    pub fn new() -> Self {
        Self {
            locks: DashMap::new(),
        }
    }

    /// Returns the mutual-exclusion handle for `user_id`, creating it on
    /// first use.
    ///
    /// Locking is the caller's responsibility:
    ///
    /// ```
    /// use point_wallet_rs::{UserId, UserLockManager};
    ///
    /// let manager = UserLockManager::new();
    /// let handle = manager.handle(UserId(1));
    /// let _guard = handle.lock();
    /// // exclusive for user 1 until the guard drops
    /// ```
    pub fn handle(&self, user_id: UserId) -> Arc<Mutex<()>> {
        self.locks
            .entry(user_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Number of users that have ever requested a handle.
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}
