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

//! Point balance value object.
//!
//! A [`Balance`] is an immutable snapshot of a user's point total. Charging
//! or using points never mutates the snapshot; both return a new one.
//!
//! # Example
//!
//! ```
//! use point_wallet_rs::{Balance, UserId};
//!
//! let balance = Balance::empty(UserId(1)).unwrap();
//! let balance = balance.charge(1_000).unwrap();
//! assert_eq!(balance.amount(), 1_000);
//! ```

use crate::PointError;
use crate::base::UserId;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Maximum number of points a single wallet may hold.
pub const MAX_POINT_LIMIT: i64 = 200_000;

/// Immutable snapshot of a user's point balance.
///
/// # Invariants
///
/// - `user_id` is non-negative.
/// - `0 <= amount <= MAX_POINT_LIMIT`.
///
/// Both are enforced by [`Balance::new`]; a snapshot violating them cannot
/// be constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Balance {
    user_id: UserId,
    amount: i64,
    updated_at: DateTime<Utc>,
}

impl Balance {
    /// Creates a validated balance snapshot.
    ///
    /// # Errors
    ///
    /// - [`PointError::InvalidUserId`] - `user_id` is negative.
    /// - [`PointError::InvalidBalance`] - `amount` is negative or above
    ///   [`MAX_POINT_LIMIT`].
    pub fn new(
        user_id: UserId,
        amount: i64,
        updated_at: DateTime<Utc>,
    ) -> Result<Self, PointError> {
        if user_id.0 < 0 {
            return Err(PointError::InvalidUserId);
        }
        if !(0..=MAX_POINT_LIMIT).contains(&amount) {
            return Err(PointError::InvalidBalance);
        }
        Ok(Self {
            user_id,
            amount,
            updated_at,
        })
    }

    /// Zero-amount snapshot for a user with no stored balance.
    ///
    /// Materialized on the read path only; no write occurs.
    pub fn empty(user_id: UserId) -> Result<Self, PointError> {
        Self::new(user_id, 0, Utc::now())
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    pub fn amount(&self) -> i64 {
        self.amount
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Credits `delta` points, returning a new snapshot with a fresh
    /// timestamp. Pure; the receiver is untouched.
    ///
    /// # Errors
    ///
    /// - [`PointError::InvalidAmount`] - `delta` is zero or negative.
    /// - [`PointError::LimitExceeded`] - result would pass [`MAX_POINT_LIMIT`].
    pub fn charge(&self, delta: i64) -> Result<Self, PointError> {
        if delta <= 0 {
            return Err(PointError::InvalidAmount);
        }
        let next = self
            .amount
            .checked_add(delta)
            .ok_or(PointError::LimitExceeded)?;
        if next > MAX_POINT_LIMIT {
            return Err(PointError::LimitExceeded);
        }
        Self::new(self.user_id, next, Utc::now())
    }

    /// Debits `delta` points, returning a new snapshot with a fresh
    /// timestamp. Pure; the receiver is untouched.
    ///
    /// # Errors
    ///
    /// - [`PointError::InvalidAmount`] - `delta` is zero or negative.
    /// - [`PointError::InsufficientFunds`] - result would go negative.
    pub fn use_points(&self, delta: i64) -> Result<Self, PointError> {
        if delta <= 0 {
            return Err(PointError::InvalidAmount);
        }
        let next = self.amount - delta;
        if next < 0 {
            return Err(PointError::InsufficientFunds);
        }
        Self::new(self.user_id, next, Utc::now())
    }
}
