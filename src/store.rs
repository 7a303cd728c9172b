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

//! Store collaborator contracts.
//!
//! The service consumes the balance and history stores through these traits.
//! Neither store promises atomicity across calls; every coordinated
//! read-modify-write for a user must run under that user's lock. Concrete
//! adapter failures surface as [`PointError::Store`] and are propagated
//! unchanged, never retried or masked.

use crate::PointError;
use crate::balance::Balance;
use crate::base::UserId;
use crate::history::{HistoryRecord, TransactionKind};
use chrono::{DateTime, Utc};
use mockall::automock;

/// Keyed table of balance snapshots, one row per user.
#[automock]
pub trait BalanceStore: Send + Sync {
    /// Returns the stored snapshot for `user_id`, or `None` when the user
    /// has never been written. Absence is not an error.
    fn get(&self, user_id: UserId) -> Result<Option<Balance>, PointError>;

    /// Overwrites the row for `user_id` unconditionally and returns the
    /// persisted snapshot carrying the store-assigned timestamp.
    fn put(&self, user_id: UserId, amount: i64) -> Result<Balance, PointError>;
}

/// Append-only log of completed mutations.
#[automock]
pub trait HistoryStore: Send + Sync {
    /// Appends a record with a fresh, monotonically increasing id and
    /// returns it.
    fn append(
        &self,
        user_id: UserId,
        amount: i64,
        kind: TransactionKind,
        updated_at: DateTime<Utc>,
    ) -> Result<HistoryRecord, PointError>;

    /// All records for `user_id` in insertion order; empty when none exist.
    fn all_for_user(&self, user_id: UserId) -> Result<Vec<HistoryRecord>, PointError>;
}
