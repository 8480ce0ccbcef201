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

//! User directory interface and its in-memory stub.
//!
//! Real user persistence is out of scope; the state machine only needs
//! registration and admin membership checks.

use crate::base::UserId;
use std::collections::HashSet;

/// Registration and privilege checks consumed by the state machine.
pub trait UserDirectory: Send + Sync {
    /// Records a user as registered.
    fn register(&self, user: UserId);

    /// Returns whether the user holds admin privileges.
    fn is_admin(&self, user: UserId) -> bool;
}

/// In-memory directory backed by an immutable admin set.
///
/// Registration is a logged no-op, standing in for a database write.
#[derive(Debug, Default)]
pub struct StaticDirectory {
    admins: HashSet<UserId>,
}

impl StaticDirectory {
    /// Builds a directory from the admin IDs loaded at startup.
    pub fn new(admins: impl IntoIterator<Item = UserId>) -> Self {
        StaticDirectory {
            admins: admins.into_iter().collect(),
        }
    }
}

impl UserDirectory for StaticDirectory {
    fn register(&self, user: UserId) {
        tracing::info!(%user, "user registered");
    }

    fn is_admin(&self, user: UserId) -> bool {
        self.admins.contains(&user)
    }
}
