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

//! # Session Bot
//!
//! This library provides a conversational shop bot that walks a user
//! through registration, browsing purchasable session files, confirming
//! a purchase, and receiving an encrypted copy of the purchased file.
//!
//! ## Core Components
//!
//! - [`Bot`]: Central engine dispatching inbound events to per-user sessions
//! - [`UserSession`]: Conversation state machine for a single user
//! - [`Catalog`]: Immutable listing of purchasable session files
//! - [`FileCipher`]: AES-256-GCM encryption with a process-lifetime key
//! - [`BotError`]: Error types for conversation handling
//!
//! The chat transport, user directory, and payment gateway are external
//! collaborators, consumed through the [`Transport`], [`UserDirectory`],
//! and [`PaymentGateway`] traits; in-memory stubs are included.
//!
//! ## Example
//!
//! ```
//! use session_bot_rs::{
//!     ApproveAll, Bot, Catalog, CatalogItem, ConsoleTransport, FileCipher, Input,
//!     StaticDirectory, UserId,
//! };
//!
//! let dir = tempfile::tempdir().unwrap();
//! let path = dir.path().join("session1.txt");
//! std::fs::write(&path, b"session content").unwrap();
//!
//! let catalog = Catalog::new(vec![CatalogItem {
//!     id: "session1.txt".into(),
//!     price: 10,
//!     file: path,
//! }]);
//!
//! let bot = Bot::new(
//!     catalog,
//!     FileCipher::new(),
//!     Box::new(StaticDirectory::default()),
//!     Box::new(ApproveAll),
//!     Box::new(ConsoleTransport),
//! );
//!
//! // Walk one user through a full purchase.
//! let user = UserId(1);
//! bot.handle(user, Input::parse("hi"));
//! bot.handle(user, Input::parse("Buy Session"));
//! bot.handle(user, Input::parse("session1.txt"));
//! bot.handle(user, Input::parse("Confirm"));
//!
//! // The conversation ended, so the session record is gone.
//! assert_eq!(bot.active_sessions(), 0);
//! ```
//!
//! ## Thread Safety
//!
//! The engine handles concurrent events for distinct users; events for
//! the same user are serialized by that user's session lock.

mod base;
mod catalog;
mod cipher;
mod directory;
mod engine;
pub mod error;
mod payment;
pub mod session;
mod transport;

pub use base::{ItemId, UserId};
pub use catalog::{Catalog, CatalogItem};
pub use cipher::FileCipher;
pub use directory::{StaticDirectory, UserDirectory};
pub use engine::Bot;
pub use error::BotError;
pub use payment::{ApproveAll, DeclineAll, PaymentGateway};
pub use session::{ConversationState, Input, Outcome, Reply, Services, UserSession};
pub use transport::{ConsoleTransport, Transport};
