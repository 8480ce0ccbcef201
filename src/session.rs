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

//! Per-user conversation state machine.
//!
//! Implemented state machine:
//!
//  Start ──any text──► Registered ──(auto)──► Menu ──"Buy Session"──► BuySession
//                                              │                          │
//                                              └─"Admin Menu"─► AdminMenu │ valid item
//                                                 (admins only)           ▼
//            Ended ◄──"Confirm" + paid ◄── ConfirmPurchase ◄──────────────┘
//!
//! A `/cancel` command from any state clears the session and ends the
//! conversation. Transitions are computed without touching the
//! transport: handlers return [`Reply`] values and the engine delivers
//! them, so the whole machine is testable offline.

use crate::base::{ItemId, UserId};
use crate::catalog::Catalog;
use crate::cipher::FileCipher;
use crate::directory::UserDirectory;
use crate::error::BotError;
use crate::payment::PaymentGateway;
use parking_lot::Mutex;

/// Keyboard label for entering the purchase flow.
pub const BUY_SESSION: &str = "Buy Session";
/// Keyboard label for entering the admin menu.
pub const ADMIN_MENU: &str = "Admin Menu";
/// Keyboard label for returning to the main menu.
pub const BACK_TO_MENU: &str = "Back to Menu";
/// Keyboard label for confirming a purchase.
pub const CONFIRM: &str = "Confirm";
/// Keyboard label for declining a purchase.
pub const CANCEL: &str = "Cancel";
/// Keyboard label for the unimplemented add-session flow.
pub const ADD_SESSION: &str = "Add Session";
/// Keyboard label for the unimplemented remove-session flow.
pub const REMOVE_SESSION: &str = "Remove Session";

/// The command that cancels a conversation from any state.
pub const CANCEL_COMMAND: &str = "/cancel";

/// Named step in the guided dialog a user currently occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConversationState {
    /// First contact; next text registers the user.
    Start,
    /// Registration done. Pass-through: the menu is presented
    /// immediately, so this state is never awaited on.
    Registered,
    /// Main menu awaiting an action choice.
    Menu,
    /// Catalog listed, awaiting an item selection.
    BuySession,
    /// Item selected, awaiting purchase confirmation.
    ConfirmPurchase,
    /// Admin menu awaiting an action choice.
    AdminMenu,
    /// Reserved for the unimplemented add-session flow.
    AddSession,
    /// Reserved for the unimplemented remove-session flow.
    RemoveSession,
    /// Terminal. The session record is discarded on reaching it.
    Ended,
}

/// Inbound event from a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// Free text or a keyboard choice.
    Text(String),
    /// The cancel command, valid in any state.
    Cancel,
}

impl Input {
    /// Parses raw message text, recognizing the cancel command.
    pub fn parse(raw: &str) -> Self {
        if raw.trim() == CANCEL_COMMAND {
            Input::Cancel
        } else {
            Input::Text(raw.to_string())
        }
    }
}

/// Outbound effect computed by a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Text prompt with an ordered reply keyboard (may be empty).
    Prompt { text: String, choices: Vec<String> },
    /// Encrypted artifact to deliver. Transient: dropped after the
    /// send attempt, never written to durable storage.
    Document { filename: String, bytes: Vec<u8> },
    /// Explicit marker for a flow that exists in the menu but is not
    /// implemented, so the gap is assertable rather than a silent
    /// success.
    NotImplemented { action: String },
}

impl Reply {
    fn text(text: impl Into<String>) -> Self {
        Reply::Prompt {
            text: text.into(),
            choices: Vec::new(),
        }
    }

    fn prompt(text: impl Into<String>, choices: Vec<String>) -> Self {
        Reply::Prompt {
            text: text.into(),
            choices,
        }
    }
}

/// Read-only collaborators a transition may call.
///
/// The transport is deliberately absent: transitions return replies as
/// data and never deliver anything themselves.
pub struct Services<'a> {
    pub catalog: &'a Catalog,
    pub directory: &'a dyn UserDirectory,
    pub payments: &'a dyn PaymentGateway,
    pub cipher: &'a FileCipher,
}

/// Result of handling one inbound event.
#[derive(Debug)]
pub struct Outcome {
    /// Replies to deliver, in order.
    pub replies: Vec<Reply>,
    /// Whether the conversation reached the terminal state.
    pub ended: bool,
}

#[derive(Debug)]
struct SessionData {
    user_id: UserId,
    state: ConversationState,
    /// When set, always names a valid catalog item. Cleared once a
    /// purchase attempt resolves, whatever the outcome.
    selected_item: Option<ItemId>,
}

impl SessionData {
    fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            state: ConversationState::Start,
            selected_item: None,
        }
    }

    fn menu_prompt(&self, services: &Services) -> Reply {
        let mut choices = vec![BUY_SESSION.to_string()];
        if services.directory.is_admin(self.user_id) {
            choices.push(ADMIN_MENU.to_string());
        }
        Reply::prompt("What would you like to do?", choices)
    }

    fn listing_prompt(&self, services: &Services) -> Reply {
        let mut choices: Vec<String> = services
            .catalog
            .ids()
            .map(|id| id.as_str().to_string())
            .collect();
        choices.push(BACK_TO_MENU.to_string());
        Reply::prompt("Choose a session to purchase:", choices)
    }

    fn admin_prompt(&self) -> Reply {
        Reply::prompt(
            "Admin Menu: What would you like to do?",
            vec![
                ADD_SESSION.to_string(),
                REMOVE_SESSION.to_string(),
                BACK_TO_MENU.to_string(),
            ],
        )
    }

    fn handle(&mut self, input: &Input, services: &Services) -> Outcome {
        let text = match input {
            Input::Cancel => return self.cancel(),
            Input::Text(text) => text.as_str(),
        };

        let replies = match self.state {
            ConversationState::Start => self.register(services),
            // Registration already happened; just re-present the menu.
            ConversationState::Registered | ConversationState::Menu => {
                self.state = ConversationState::Menu;
                self.main_menu(text, services)
            }
            ConversationState::BuySession => self.select_item(text, services),
            ConversationState::ConfirmPurchase => self.confirm_purchase(text, services),
            ConversationState::AdminMenu
            | ConversationState::AddSession
            | ConversationState::RemoveSession => self.admin_menu(text, services),
            // Terminal sessions are removed by the engine; nothing to do.
            ConversationState::Ended => Vec::new(),
        };

        Outcome {
            replies,
            ended: self.state == ConversationState::Ended,
        }
    }

    fn cancel(&mut self) -> Outcome {
        tracing::info!(user = %self.user_id, "conversation cancelled");
        self.selected_item = None;
        self.state = ConversationState::Ended;
        Outcome {
            replies: vec![Reply::text("Bye! Hope to see you again.")],
            ended: true,
        }
    }

    /// Start: any text registers the user, then the menu is presented
    /// immediately (Registered is a pass-through state).
    fn register(&mut self, services: &Services) -> Vec<Reply> {
        services.directory.register(self.user_id);
        self.state = ConversationState::Registered;

        let mut replies = vec![Reply::text("You are now registered!")];
        self.state = ConversationState::Menu;
        replies.push(self.menu_prompt(services));
        replies
    }

    fn main_menu(&mut self, text: &str, services: &Services) -> Vec<Reply> {
        match text {
            BUY_SESSION => {
                self.state = ConversationState::BuySession;
                vec![self.listing_prompt(services)]
            }
            ADMIN_MENU => {
                if services.directory.is_admin(self.user_id) {
                    self.state = ConversationState::AdminMenu;
                    vec![self.admin_prompt()]
                } else {
                    // Unauthorized access ends the conversation rather
                    // than looping.
                    tracing::warn!(
                        user = %self.user_id,
                        error = %BotError::Unauthorized,
                        "admin menu access denied"
                    );
                    self.state = ConversationState::Ended;
                    vec![Reply::text("You are not authorized to access this menu.")]
                }
            }
            _ => vec![self.menu_prompt(services)],
        }
    }

    fn select_item(&mut self, text: &str, services: &Services) -> Vec<Reply> {
        if text == BACK_TO_MENU {
            self.state = ConversationState::Menu;
            return vec![self.menu_prompt(services)];
        }

        let item_id = ItemId::from(text);
        match services.catalog.lookup(&item_id) {
            Some(item) => {
                self.selected_item = Some(item_id);
                self.state = ConversationState::ConfirmPurchase;
                vec![Reply::prompt(
                    format!(
                        "You have selected {}. Price: {} credits. Confirm purchase?",
                        item.id, item.price
                    ),
                    vec![CONFIRM.to_string(), CANCEL.to_string()],
                )]
            }
            None => {
                // Invalid selection never advances past BuySession.
                vec![
                    Reply::text("Invalid session file."),
                    self.listing_prompt(services),
                ]
            }
        }
    }

    fn confirm_purchase(&mut self, text: &str, services: &Services) -> Vec<Reply> {
        if text != CONFIRM {
            self.selected_item = None;
            self.state = ConversationState::BuySession;
            return vec![
                Reply::text("Purchase cancelled."),
                self.listing_prompt(services),
            ];
        }
        self.complete_purchase(services)
    }

    /// Purchase protocol: require a selection, charge, read and
    /// encrypt the backing file, hand off the artifact for delivery.
    ///
    /// Every path clears `selected_item`. Failure paths return to
    /// `BuySession` with the listing re-presented; success ends the
    /// conversation.
    fn complete_purchase(&mut self, services: &Services) -> Vec<Reply> {
        match self.try_purchase(services) {
            Ok(replies) => replies,
            Err(e) => {
                let message = match &e {
                    BotError::NoSelection => "No session selected. Please try again.",
                    BotError::NotFound => "Invalid session file.",
                    BotError::PaymentDeclined => {
                        tracing::warn!(user = %self.user_id, "payment declined");
                        "Payment failed. Please try again."
                    }
                    BotError::Cipher(_) => {
                        // The charge already went through and nothing
                        // will be delivered. Reconciliation gap, not
                        // compensated here.
                        tracing::error!(
                            user = %self.user_id,
                            error = %e,
                            "charge succeeded but artifact could not be produced; manual reconciliation required"
                        );
                        "Could not prepare the session file. Please try again."
                    }
                    _ => "Something went wrong. Please try again.",
                };
                self.state = ConversationState::BuySession;
                vec![Reply::text(message), self.listing_prompt(services)]
            }
        }
    }

    fn try_purchase(&mut self, services: &Services) -> Result<Vec<Reply>, BotError> {
        // The selection is cleared up front so every resolution path,
        // success or failure, discards it.
        let item_id = self.selected_item.take().ok_or(BotError::NoSelection)?;
        let item = services.catalog.lookup(&item_id).ok_or(BotError::NotFound)?;

        services.payments.charge(self.user_id, &item.id)?;
        let bytes = services.cipher.encrypt_file(&item.file)?;

        self.state = ConversationState::Ended;
        Ok(vec![
            Reply::text("Payment successful! Sending session file..."),
            Reply::Document {
                filename: format!("{}.enc", item.id),
                bytes,
            },
        ])
    }

    fn admin_menu(&mut self, text: &str, services: &Services) -> Vec<Reply> {
        match text {
            ADD_SESSION | REMOVE_SESSION => {
                self.state = ConversationState::AdminMenu;
                vec![Reply::NotImplemented {
                    action: text.to_string(),
                }]
            }
            BACK_TO_MENU => {
                self.state = ConversationState::Menu;
                vec![self.menu_prompt(services)]
            }
            _ => {
                self.state = ConversationState::AdminMenu;
                vec![self.admin_prompt()]
            }
        }
    }
}

/// Conversation session for a single user.
///
/// The inner data is guarded by a mutex so events for the same user
/// are handled strictly sequentially even if the caller dispatches
/// them from multiple threads.
#[derive(Debug)]
pub struct UserSession {
    inner: Mutex<SessionData>,
}

impl UserSession {
    pub fn new(user_id: UserId) -> Self {
        Self {
            inner: Mutex::new(SessionData::new(user_id)),
        }
    }

    /// The state the conversation currently occupies.
    pub fn state(&self) -> ConversationState {
        self.inner.lock().state
    }

    /// The item selected for purchase, if any.
    pub fn selected_item(&self) -> Option<ItemId> {
        self.inner.lock().selected_item.clone()
    }

    /// Applies one inbound event: validates it against the current
    /// state, runs the state's action, stores the next state, and
    /// returns the replies to deliver.
    pub fn handle(&self, input: &Input, services: &Services) -> Outcome {
        self.inner.lock().handle(input, services)
    }
}
