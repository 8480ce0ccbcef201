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

//! Conversation engine.
//!
//! The [`Bot`] is the central component that dispatches inbound events
//! to per-user sessions and delivers the resulting replies through the
//! transport.
//!
//! # Thread Safety
//!
//! Sessions live in a [`DashMap`] keyed by user, so events for
//! distinct users may be handled concurrently. Each session guards its
//! own data, serializing events for the same user. The catalog, admin
//! set, and cipher key are read-only after construction.

use crate::base::{ItemId, UserId};
use crate::catalog::Catalog;
use crate::cipher::FileCipher;
use crate::directory::UserDirectory;
use crate::payment::PaymentGateway;
use crate::session::{ConversationState, Input, Reply, Services, UserSession};
use crate::transport::Transport;
use dashmap::DashMap;

/// Conversation engine managing one session per user.
///
/// # Invariants
///
/// - A session exists only between a user's first contact and the
///   terminal state; reaching `Ended` removes it.
/// - A session's `selected_item`, when set, names a valid catalog item.
/// - Encrypted artifacts exist only inside a [`Reply::Document`] in
///   flight; they are dropped after the send attempt, delivered or not.
pub struct Bot {
    catalog: Catalog,
    cipher: FileCipher,
    directory: Box<dyn UserDirectory>,
    payments: Box<dyn PaymentGateway>,
    transport: Box<dyn Transport>,
    /// Active conversations indexed by user ID.
    sessions: DashMap<UserId, UserSession>,
}

impl Bot {
    /// Creates a bot over the given collaborators.
    ///
    /// The catalog and admin set are fixed for the bot's lifetime, and
    /// the cipher key lives exactly as long as the bot.
    pub fn new(
        catalog: Catalog,
        cipher: FileCipher,
        directory: Box<dyn UserDirectory>,
        payments: Box<dyn PaymentGateway>,
        transport: Box<dyn Transport>,
    ) -> Self {
        Bot {
            catalog,
            cipher,
            directory,
            payments,
            transport,
            sessions: DashMap::new(),
        }
    }

    /// Handles one inbound event for a user.
    ///
    /// Looks up (or creates) the user's session, applies the state
    /// machine, and delivers every reply through the transport. A
    /// failed artifact delivery after a successful charge is logged as
    /// a reconciliation gap; it does not propagate.
    pub fn handle(&self, user: UserId, input: Input) {
        let outcome = {
            let session = self
                .sessions
                .entry(user)
                .or_insert_with(|| UserSession::new(user));
            session.handle(&input, &self.services())
        };

        for reply in &outcome.replies {
            self.deliver(user, reply);
        }

        // Terminal state: the conversation record is discarded, along
        // with any pending selection.
        if outcome.ended {
            self.sessions.remove(&user);
        }
    }

    fn deliver(&self, user: UserId, reply: &Reply) {
        match reply {
            Reply::Prompt { text, choices } => self.transport.prompt(user, text, choices),
            Reply::Document { filename, bytes } => {
                if let Err(e) = self.transport.send_file(user, filename, bytes) {
                    // The charge already succeeded; nothing compensates
                    // it. Reconciliation gap, logged and accepted.
                    tracing::error!(
                        %user,
                        filename,
                        error = %e,
                        "charge succeeded but delivery failed; manual reconciliation required"
                    );
                }
            }
            Reply::NotImplemented { action } => {
                self.transport
                    .prompt(user, &format!("{action}: not implemented."), &[]);
            }
        }
    }

    fn services(&self) -> Services<'_> {
        Services {
            catalog: &self.catalog,
            directory: self.directory.as_ref(),
            payments: self.payments.as_ref(),
            cipher: &self.cipher,
        }
    }

    /// The state of a user's active conversation, if one exists.
    pub fn session_state(&self, user: &UserId) -> Option<ConversationState> {
        self.sessions.get(user).map(|s| s.state())
    }

    /// The item a user has selected for purchase, if any.
    pub fn selected_item(&self, user: &UserId) -> Option<ItemId> {
        self.sessions.get(user).and_then(|s| s.selected_item())
    }

    /// Number of active conversations.
    pub fn active_sessions(&self) -> usize {
        self.sessions.len()
    }

    /// Read access to the catalog shared by all conversations.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }
}
