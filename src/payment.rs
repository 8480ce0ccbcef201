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

//! Payment gateway interface and stub implementations.
//!
//! Real payment processing is out of scope. The stubs let the CLI run
//! end to end and let tests script both outcomes.

use crate::base::{ItemId, UserId};
use crate::error::BotError;

/// Charge authorization consumed by the purchase protocol.
pub trait PaymentGateway: Send + Sync {
    /// Authorizes a charge for the given user and item.
    ///
    /// # Errors
    ///
    /// Returns [`BotError::PaymentDeclined`] when the charge is refused.
    fn charge(&self, user: UserId, item: &ItemId) -> Result<(), BotError>;
}

/// Gateway stub that approves every charge.
#[derive(Debug, Default)]
pub struct ApproveAll;

impl PaymentGateway for ApproveAll {
    fn charge(&self, user: UserId, item: &ItemId) -> Result<(), BotError> {
        tracing::info!(%user, %item, "payment approved");
        Ok(())
    }
}

/// Gateway stub that declines every charge.
#[derive(Debug, Default)]
pub struct DeclineAll;

impl PaymentGateway for DeclineAll {
    fn charge(&self, _user: UserId, _item: &ItemId) -> Result<(), BotError> {
        Err(BotError::PaymentDeclined)
    }
}
