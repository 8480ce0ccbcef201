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

//! Catalog of purchasable session files.
//!
//! The catalog is loaded once at startup and shared read-only by all
//! conversations. There are no mutation operations: the admin add/remove
//! flows are explicitly unimplemented.

use crate::base::ItemId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// A purchasable unit of content.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CatalogItem {
    /// Identifier shown to the user and sent back as the selection text.
    pub id: ItemId,
    /// Price in abstract currency units. Always positive.
    pub price: u32,
    /// Backing file holding the plaintext content.
    pub file: PathBuf,
}

/// Immutable catalog indexed by item ID.
///
/// Iteration order is load order, so keyboard listings are stable
/// across a process run.
#[derive(Debug)]
pub struct Catalog {
    items: Vec<CatalogItem>,
    /// Positions into `items` for O(1) lookup by ID.
    index: HashMap<ItemId, usize>,
}

impl Catalog {
    /// Builds a catalog from items in load order.
    ///
    /// A duplicate ID keeps the first occurrence; later rows are ignored.
    pub fn new(items: Vec<CatalogItem>) -> Self {
        let mut index = HashMap::with_capacity(items.len());
        let mut kept = Vec::with_capacity(items.len());
        for item in items {
            if index.contains_key(&item.id) {
                continue;
            }
            index.insert(item.id.clone(), kept.len());
            kept.push(item);
        }
        Catalog { items: kept, index }
    }

    /// Looks up an item by ID.
    ///
    /// Returns `None` for identifiers not in the catalog.
    pub fn lookup(&self, id: &ItemId) -> Option<&CatalogItem> {
        self.index.get(id).map(|&i| &self.items[i])
    }

    /// Returns all items in load order.
    pub fn items(&self) -> impl Iterator<Item = &CatalogItem> {
        self.items.iter()
    }

    /// Returns item IDs in load order.
    pub fn ids(&self) -> impl Iterator<Item = &ItemId> {
        self.items.iter().map(|item| &item.id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, price: u32) -> CatalogItem {
        CatalogItem {
            id: id.into(),
            price,
            file: PathBuf::from(id),
        }
    }

    #[test]
    fn lookup_finds_item() {
        let catalog = Catalog::new(vec![item("session1.txt", 10), item("session2.txt", 15)]);

        let found = catalog.lookup(&"session2.txt".into()).unwrap();
        assert_eq!(found.price, 15);
        assert_eq!(found.file, PathBuf::from("session2.txt"));
    }

    #[test]
    fn lookup_unknown_returns_none() {
        let catalog = Catalog::new(vec![item("session1.txt", 10)]);
        assert!(catalog.lookup(&"missing.txt".into()).is_none());
    }

    #[test]
    fn ids_preserve_load_order() {
        let catalog = Catalog::new(vec![
            item("c.txt", 1),
            item("a.txt", 2),
            item("b.txt", 3),
        ]);

        let ids: Vec<_> = catalog.ids().map(ItemId::as_str).collect();
        assert_eq!(ids, vec!["c.txt", "a.txt", "b.txt"]);
    }

    #[test]
    fn duplicate_id_keeps_first() {
        let catalog = Catalog::new(vec![item("a.txt", 10), item("a.txt", 99)]);

        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.lookup(&"a.txt".into()).unwrap().price, 10);
    }

    #[test]
    fn empty_catalog() {
        let catalog = Catalog::new(vec![]);
        assert!(catalog.is_empty());
        assert_eq!(catalog.ids().count(), 0);
    }

    // === Serialization Tests ===

    #[test]
    fn item_id_serializes_transparently() {
        let json = serde_json::to_string(&item("session1.txt", 10)).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed["id"], "session1.txt");
        assert_eq!(parsed["price"], 10);
    }

    #[test]
    fn item_roundtrips_through_json() {
        let original = item("session2.txt", 15);
        let json = serde_json::to_string(&original).unwrap();
        let parsed: CatalogItem = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, original);
    }
}
