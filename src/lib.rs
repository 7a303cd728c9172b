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

//! # Point Wallet
//!
//! This library provides a per-user point wallet supporting charge (credit)
//! and use (debit) operations with an append-only transaction history.
//!
//! ## Core Components
//!
//! - [`PointService`]: Orchestrates balance mutations under per-user locks
//! - [`Balance`]: Immutable, validated snapshot of a user's point total
//! - [`HistoryRecord`]: Immutable log entry for one completed mutation
//! - [`UserLockManager`]: Per-user mutual-exclusion handles
//! - [`PointError`]: Error types for rejected operations and store failures
//!
//! ## Example
//!
//! ```
//! use point_wallet_rs::{PointService, UserId};
//!
//! let service = PointService::new();
//!
//! // Charge points
//! let balance = service.charge(UserId(1), 1_000).unwrap();
//! assert_eq!(balance.amount(), 1_000);
//!
//! // Use points
//! let balance = service.use_points(UserId(1), 400).unwrap();
//! assert_eq!(balance.amount(), 600);
//!
//! // Two history records were appended
//! let histories = service.get_histories(UserId(1)).unwrap();
//! assert_eq!(histories.len(), 2);
//! ```
//!
//! ## Thread Safety
//!
//! Mutations targeting the same user are serialized by a per-user lock;
//! mutations targeting different users run fully in parallel. Reads bypass
//! the lock.

pub mod balance;
mod base;
pub mod error;
mod history;
mod lock;
mod service;
pub mod store;
mod table;

pub use balance::{Balance, MAX_POINT_LIMIT};
pub use base::{HistoryId, UserId};
pub use error::PointError;
pub use history::{HistoryRecord, TransactionKind};
pub use lock::UserLockManager;
pub use service::PointService;
pub use store::{BalanceStore, HistoryStore};
pub use table::{PointHistoryTable, UserPointTable};
