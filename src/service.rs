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

//! Point service orchestration.
//!
//! The [`PointService`] wraps every balance mutation in the owning user's
//! lock so that charge/use operations on one user observe a strict total
//! order, while operations on different users run fully in parallel.
//!
//! # Mutation Sequence
//!
//! Strictly inside the per-user lock scope:
//!
//! 1. Read the current balance, materializing a zero snapshot when absent.
//! 2. Apply the pure transition; a rejection aborts before any write.
//! 3. Persist the new balance.
//! 4. Append a history record stamped with the persisted snapshot's
//!    timestamp. A failed persist skips the append.
//!
//! The lock guard releases on every exit path, so a failed operation never
//! wedges subsequent attempts. Reads bypass the lock entirely.

use crate::PointError;
use crate::balance::Balance;
use crate::base::UserId;
use crate::history::{HistoryRecord, TransactionKind};
use crate::lock::UserLockManager;
use crate::store::{BalanceStore, HistoryStore};
use crate::table::{PointHistoryTable, UserPointTable};
use std::sync::Arc;

/// Point wallet service with per-user serialized mutations.
///
/// # Invariants
///
/// - A user's balance stays within `[0, MAX_POINT_LIMIT]`.
/// - Each successful mutation appends exactly one history record; rejected
///   operations append none.
/// - The balance write and the history append for one mutation are never
///   observed partially by another caller of the same user.
pub struct PointService {
    balances: Arc<dyn BalanceStore>,
    histories: Arc<dyn HistoryStore>,
    locks: UserLockManager,
}

impl PointService {
    /// Creates a service backed by fresh in-memory tables.
    pub fn new() -> Self {
        Self::with_stores(
            Arc::new(UserPointTable::new()),
            Arc::new(PointHistoryTable::new()),
        )
    }

    /// Creates a service over caller-provided stores.
    ///
    /// Tests use this to seed state or inject failing collaborators.
    pub fn with_stores(balances: Arc<dyn BalanceStore>, histories: Arc<dyn HistoryStore>) -> Self {
        Self {
            balances,
            histories,
            locks: UserLockManager::new(),
        }
    }

    /// Returns the user's current balance without locking.
    ///
    /// An absent user yields a zero-amount snapshot; no write occurs.
    ///
    /// # Errors
    ///
    /// - [`PointError::InvalidUserId`] - `user_id` is negative.
    pub fn get_point(&self, user_id: UserId) -> Result<Balance, PointError> {
        match self.balances.get(user_id)? {
            Some(balance) => Ok(balance),
            None => Balance::empty(user_id),
        }
    }

    /// Returns the user's history records, oldest first, without locking.
    pub fn get_histories(&self, user_id: UserId) -> Result<Vec<HistoryRecord>, PointError> {
        self.histories.all_for_user(user_id)
    }

    /// Credits `amount` points to the user's balance.
    ///
    /// # Errors
    ///
    /// - [`PointError::InvalidUserId`] - `user_id` is negative.
    /// - [`PointError::InvalidAmount`] - `amount` is zero or negative.
    /// - [`PointError::LimitExceeded`] - balance would pass the maximum.
    /// - [`PointError::Store`] - a collaborator failed; propagated unchanged.
    pub fn charge(&self, user_id: UserId, amount: i64) -> Result<Balance, PointError> {
        self.mutate(user_id, amount, TransactionKind::Charge)
    }

    /// Debits `amount` points from the user's balance.
    ///
    /// # Errors
    ///
    /// - [`PointError::InvalidUserId`] - `user_id` is negative.
    /// - [`PointError::InvalidAmount`] - `amount` is zero or negative.
    /// - [`PointError::InsufficientFunds`] - balance would go negative.
    /// - [`PointError::Store`] - a collaborator failed; propagated unchanged.
    pub fn use_points(&self, user_id: UserId, amount: i64) -> Result<Balance, PointError> {
        self.mutate(user_id, amount, TransactionKind::Use)
    }

    /// Read-transition-persist-append under the user's lock.
    ///
    /// The guard is held for the whole sequence and dropped on every exit
    /// path, including rejections and store failures.
    fn mutate(
        &self,
        user_id: UserId,
        amount: i64,
        kind: TransactionKind,
    ) -> Result<Balance, PointError> {
        let handle = self.locks.handle(user_id);
        let _guard = handle.lock();

        let current = match self.balances.get(user_id)? {
            Some(balance) => balance,
            None => Balance::empty(user_id)?,
        };

        let next = match kind {
            TransactionKind::Charge => current.charge(amount)?,
            TransactionKind::Use => current.use_points(amount)?,
        };

        let persisted = self.balances.put(user_id, next.amount())?;
        self.histories
            .append(user_id, amount, kind, persisted.updated_at())?;

        Ok(persisted)
    }
}

impl Default for PointService {
    fn default() -> Self {
        Self::new()
    }
}
