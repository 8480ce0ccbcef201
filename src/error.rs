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

//! Error types for conversation handling.
//!
//! None of these are process-fatal: the state machine handles each one
//! locally by emitting a user-facing reply and choosing the next state.

use thiserror::Error;

/// Conversation processing errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BotError {
    /// Submitted item ID does not exist in the catalog
    #[error("unknown session file")]
    NotFound,

    /// Non-admin user requested the admin menu
    #[error("not authorized")]
    Unauthorized,

    /// Payment gateway declined the charge
    #[error("payment declined")]
    PaymentDeclined,

    /// Purchase confirmed without a selected item
    #[error("no session selected")]
    NoSelection,

    /// Source file could not be read or encrypted
    #[error("encryption failed: {0}")]
    Cipher(String),

    /// Encrypted artifact could not be delivered
    #[error("delivery failed: {0}")]
    Delivery(String),
}
