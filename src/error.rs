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

//! Error types for point operations.

use thiserror::Error;

/// Point operation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PointError {
    /// User identifier is negative
    #[error("user id must be non-negative")]
    InvalidUserId,

    /// Charge or use amount is zero or negative
    #[error("invalid amount (must be positive)")]
    InvalidAmount,

    /// Balance snapshot amount is negative or above the maximum limit
    #[error("balance amount out of range")]
    InvalidBalance,

    /// Charge would push the balance past the maximum point limit
    #[error("charge exceeds the maximum point limit")]
    LimitExceeded,

    /// Use would drive the balance negative
    #[error("insufficient point balance")]
    InsufficientFunds,

    /// Failure reported by a backing store
    #[error("store failure: {0}")]
    Store(String),
}

impl PointError {
    /// Whether the error is a caller defect or business-rule rejection,
    /// as opposed to a store failure.
    ///
    /// Presentation layers map rejections to client errors and everything
    /// else to server errors.
    pub fn is_rejection(&self) -> bool {
        !matches!(self, PointError::Store(_))
    }
}
