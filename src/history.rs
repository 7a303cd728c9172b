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

//! History records for completed point mutations.
//!
//! Each successful charge or use appends exactly one record; records are
//! immutable and never updated or deleted afterwards.

use crate::PointError;
use crate::base::{HistoryId, UserId};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Kind of a completed point mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionKind {
    Charge,
    Use,
}

/// Immutable record of one completed charge or use.
///
/// # Invariants
///
/// - `user_id` is non-negative.
/// - `amount` is positive; it is the magnitude of the change, never signed.
///
/// The `updated_at` timestamp is copied from the persisted [`Balance`]
/// produced by the mutation, so the pair stays causally ordered.
///
/// [`Balance`]: crate::Balance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HistoryRecord {
    id: HistoryId,
    user_id: UserId,
    amount: i64,
    kind: TransactionKind,
    updated_at: DateTime<Utc>,
}

impl HistoryRecord {
    /// Creates a validated history record.
    ///
    /// # Errors
    ///
    /// - [`PointError::InvalidUserId`] - `user_id` is negative.
    /// - [`PointError::InvalidAmount`] - `amount` is zero or negative.
    pub fn new(
        id: HistoryId,
        user_id: UserId,
        amount: i64,
        kind: TransactionKind,
        updated_at: DateTime<Utc>,
    ) -> Result<Self, PointError> {
        if user_id.0 < 0 {
            return Err(PointError::InvalidUserId);
        }
        if amount <= 0 {
            return Err(PointError::InvalidAmount);
        }
        Ok(Self {
            id,
            user_id,
            amount,
            kind,
            updated_at,
        })
    }

    pub fn id(&self) -> HistoryId {
        self.id
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    pub fn amount(&self) -> i64 {
        self.amount
    }

    pub fn kind(&self) -> TransactionKind {
        self.kind
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}
