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

//! Property-based tests for the conversation state machine.
//!
//! These tests verify invariants that should hold for any sequence of
//! inbound inputs, well-formed or not.

use proptest::prelude::*;
use session_bot_rs::session::{Reply, Services};
use session_bot_rs::{
    ApproveAll, Catalog, CatalogItem, ConversationState, FileCipher, Input, ItemId,
    StaticDirectory, UserId, UserSession,
};
use std::path::PathBuf;

// =============================================================================
// Arbitrary Strategies
// =============================================================================

/// Generate one inbound input: keyboard labels, item IDs (valid and
/// not), free text, and the cancel command.
fn arb_input() -> impl Strategy<Value = Input> {
    prop_oneof![
        Just(Input::Text("Buy Session".into())),
        Just(Input::Text("Admin Menu".into())),
        Just(Input::Text("Back to Menu".into())),
        Just(Input::Text("Confirm".into())),
        Just(Input::Text("Cancel".into())),
        Just(Input::Text("Add Session".into())),
        Just(Input::Text("Remove Session".into())),
        Just(Input::Text("session1.txt".into())),
        Just(Input::Text("session2.txt".into())),
        Just(Input::Text("bogus.txt".into())),
        Just(Input::Cancel),
        "[a-z]{1,8}".prop_map(Input::Text),
    ]
}

/// Two-item catalog whose backing files do not exist; purchases charge
/// and then fail at the cipher, which exercises the post-charge
/// failure path without touching the filesystem.
fn catalog() -> Catalog {
    Catalog::new(vec![
        CatalogItem {
            id: "session1.txt".into(),
            price: 10,
            file: PathBuf::from("proptest-missing/session1.txt"),
        },
        CatalogItem {
            id: "session2.txt".into(),
            price: 15,
            file: PathBuf::from("proptest-missing/session2.txt"),
        },
    ])
}

fn run_sequence(inputs: &[Input], admin: bool) -> (UserSession, Vec<Reply>) {
    let catalog = catalog();
    let directory = if admin {
        StaticDirectory::new([UserId(1)])
    } else {
        StaticDirectory::default()
    };
    let cipher = FileCipher::new();
    let gateway = ApproveAll;
    let services = Services {
        catalog: &catalog,
        directory: &directory,
        payments: &gateway,
        cipher: &cipher,
    };

    let session = UserSession::new(UserId(1));
    let mut replies = Vec::new();
    for input in inputs {
        let outcome = session.handle(input, &services);
        replies.extend(outcome.replies);

        // Invariants checked after every single step.
        if let Some(item) = session.selected_item() {
            assert!(catalog.lookup(&item).is_some());
            assert_eq!(session.state(), ConversationState::ConfirmPurchase);
        }
        assert_ne!(session.state(), ConversationState::Registered);
        assert_ne!(session.state(), ConversationState::AddSession);
        assert_ne!(session.state(), ConversationState::RemoveSession);

        if session.state() == ConversationState::Ended {
            break;
        }
    }
    (session, replies)
}

// =============================================================================
// State Machine Invariant Tests
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// No input sequence panics, and a set selection always names a
    /// valid catalog item.
    #[test]
    fn any_sequence_preserves_invariants(
        inputs in prop::collection::vec(arb_input(), 1..40),
        admin in any::<bool>(),
    ) {
        run_sequence(&inputs, admin);
    }

    /// The first input always lands the user on the menu, whatever the
    /// text (unless it is the cancel command).
    #[test]
    fn first_text_always_reaches_menu(text in "[a-zA-Z ./]{1,20}") {
        prop_assume!(text.trim() != "/cancel");
        let (session, _) = run_sequence(&[Input::parse(&text)], false);
        prop_assert_eq!(session.state(), ConversationState::Menu);
    }

    /// Cancel ends the conversation and clears any selection, from any
    /// reachable state.
    #[test]
    fn cancel_always_ends(
        prefix in prop::collection::vec(arb_input(), 0..20),
    ) {
        let mut inputs: Vec<Input> = prefix
            .into_iter()
            .filter(|i| *i != Input::Cancel)
            .collect();
        inputs.push(Input::Cancel);

        let (session, _) = run_sequence(&inputs, false);
        prop_assert_eq!(session.state(), ConversationState::Ended);
        prop_assert_eq!(session.selected_item(), None);
    }

    /// Submitting unknown item IDs in the purchase flow never advances
    /// the state or sets a selection.
    #[test]
    fn invalid_selections_never_advance(garbage in prop::collection::vec("[a-z]{1,10}\\.bin", 1..10)) {
        let mut inputs = vec![
            Input::Text("hello".into()),
            Input::Text("Buy Session".into()),
        ];
        inputs.extend(garbage.into_iter().map(Input::Text));

        let (session, replies) = run_sequence(&inputs, false);
        prop_assert_eq!(session.state(), ConversationState::BuySession);
        prop_assert_eq!(session.selected_item(), None);
        prop_assert!(!replies.iter().any(|r| matches!(r, Reply::Document { .. })), "unexpected Reply::Document");
    }

    /// A non-admin can never reach the admin menu; an admin always can.
    #[test]
    fn admin_menu_gated_by_membership(admin in any::<bool>()) {
        let inputs = vec![
            Input::Text("hello".into()),
            Input::Text("Admin Menu".into()),
        ];
        let (session, _) = run_sequence(&inputs, admin);
        let expected = if admin {
            ConversationState::AdminMenu
        } else {
            ConversationState::Ended
        };
        prop_assert_eq!(session.state(), expected);
    }

    /// With unreadable backing files the purchase flow can charge but
    /// never produce an artifact, and always lands back on the listing.
    #[test]
    fn failed_artifact_production_returns_to_listing(
        item in prop_oneof![Just("session1.txt"), Just("session2.txt")],
    ) {
        let inputs = vec![
            Input::Text("hello".into()),
            Input::Text("Buy Session".into()),
            Input::Text(item.to_string()),
            Input::Text("Confirm".into()),
        ];
        let (session, replies) = run_sequence(&inputs, false);
        prop_assert_eq!(session.state(), ConversationState::BuySession);
        prop_assert_eq!(session.selected_item(), None);
        prop_assert!(!replies.iter().any(|r| matches!(r, Reply::Document { .. })), "unexpected Reply::Document");
    }

    /// ItemId text roundtrips through parsing: selections store exactly
    /// the submitted identifier.
    #[test]
    fn selection_stores_exact_id(
        item in prop_oneof![Just("session1.txt"), Just("session2.txt")],
    ) {
        let inputs = vec![
            Input::Text("hello".into()),
            Input::Text("Buy Session".into()),
            Input::Text(item.to_string()),
        ];
        let (session, _) = run_sequence(&inputs, false);
        prop_assert_eq!(session.selected_item(), Some(ItemId(item.to_string())));
    }
}
