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

//! Outbound messaging channel abstraction.
//!
//! The real chat transport is out of scope; the bot only requires the
//! two delivery operations below. Inbound messages reach the bot as
//! events passed to [`Bot::handle`](crate::Bot::handle) by whatever
//! drives it.

use crate::base::UserId;
use crate::error::BotError;

/// Delivery operations consumed by the bot.
pub trait Transport: Send + Sync {
    /// Delivers a text prompt, optionally with an ordered reply keyboard.
    fn prompt(&self, user: UserId, text: &str, choices: &[String]);

    /// Delivers a binary attachment.
    ///
    /// # Errors
    ///
    /// Returns [`BotError::Delivery`] when the attachment could not be
    /// sent. The caller discards the bytes either way.
    fn send_file(&self, user: UserId, filename: &str, bytes: &[u8]) -> Result<(), BotError>;
}

/// Transport that renders conversations to stdout, used by the CLI driver.
#[derive(Debug, Default)]
pub struct ConsoleTransport;

impl Transport for ConsoleTransport {
    fn prompt(&self, user: UserId, text: &str, choices: &[String]) {
        if choices.is_empty() {
            println!("[{user}] {text}");
        } else {
            println!("[{user}] {text} {choices:?}");
        }
    }

    fn send_file(&self, user: UserId, filename: &str, bytes: &[u8]) -> Result<(), BotError> {
        println!("[{user}] <file {filename}, {} bytes>", bytes.len());
        Ok(())
    }
}
