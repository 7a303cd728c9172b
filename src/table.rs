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

//! In-memory store adapters.
//!
//! [`DashMap`]-backed tables implementing the [`BalanceStore`] and
//! [`HistoryStore`] contracts. Individual calls are safe under concurrency,
//! but the tables offer no atomicity across calls; the service's per-user
//! lock provides the only read-modify-write coordination.

use crate::PointError;
use crate::balance::Balance;
use crate::base::{HistoryId, UserId};
use crate::history::{HistoryRecord, TransactionKind};
use crate::store::{BalanceStore, HistoryStore};
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};

/// Balance table keyed by user id.
#[derive(Debug, Default)]
pub struct UserPointTable {
    rows: DashMap<UserId, Balance>,
}

impl UserPointTable {
    pub fn new() -> Self {
        Self {
            rows: DashMap::new(),
        }
    }

    /// Snapshot of every stored balance, in no particular order.
    pub fn all(&self) -> Vec<Balance> {
        self.rows.iter().map(|row| *row.value()).collect()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl BalanceStore for UserPointTable {
    fn get(&self, user_id: UserId) -> Result<Option<Balance>, PointError> {
        Ok(self.rows.get(&user_id).map(|row| *row.value()))
    }

    fn put(&self, user_id: UserId, amount: i64) -> Result<Balance, PointError> {
        let snapshot = Balance::new(user_id, amount, Utc::now())?;
        self.rows.insert(user_id, snapshot);
        Ok(snapshot)
    }
}

/// Append-only history table.
///
/// Record ids come from a global cursor starting at 1, so they are unique
/// and monotonically increasing across all users. Per-user insertion order
/// is preserved by the row vector.
#[derive(Debug)]
pub struct PointHistoryTable {
    rows: DashMap<UserId, Vec<HistoryRecord>>,
    cursor: AtomicU64,
}

impl PointHistoryTable {
    pub fn new() -> Self {
        Self {
            rows: DashMap::new(),
            cursor: AtomicU64::new(1),
        }
    }
}

impl Default for PointHistoryTable {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryStore for PointHistoryTable {
    fn append(
        &self,
        user_id: UserId,
        amount: i64,
        kind: TransactionKind,
        updated_at: DateTime<Utc>,
    ) -> Result<HistoryRecord, PointError> {
        let id = HistoryId(self.cursor.fetch_add(1, Ordering::Relaxed));
        let record = HistoryRecord::new(id, user_id, amount, kind, updated_at)?;
        self.rows.entry(user_id).or_default().push(record);
        Ok(record)
    }

    fn all_for_user(&self, user_id: UserId) -> Result<Vec<HistoryRecord>, PointError> {
        Ok(self
            .rows
            .get(&user_id)
            .map(|row| row.value().clone())
            .unwrap_or_default())
    }
}
