//! Inventory index, built once per reconciliation run.
//!
//! Two structures over one snapshot: an exact map for identifier lookups
//! and an ordered list of normalized-name records for the fuzzy scan. The
//! index is immutable once built; a changed snapshot means a new index.

use std::collections::HashMap;

use crate::normalize::{extract_numeric_tokens, normalize};
use crate::types::InventoryUnit;

/// Fuzzy-matchable projection of one inventory unit.
#[derive(Clone, Debug)]
pub struct NormalizedIndexEntry {
    /// Canonical form of `brand + " " + model`.
    pub normalized_name: String,
    /// Distinct digit runs of the same label, first-occurrence order.
    pub numeric_tokens: Vec<String>,
    pub unit_id: String,
}

/// Snapshot-ordered index over the inventory.
///
/// The entry list keeps the snapshot's order; the matcher's first-match
/// rule depends on that order staying stable for the whole run.
pub struct InventoryIndex {
    entries: Vec<NormalizedIndexEntry>,
    by_id: HashMap<String, InventoryUnit>,
}

impl InventoryIndex {
    /// Build the index from an inventory snapshot.
    ///
    /// Units with a blank brand or model are excluded from both
    /// structures: they cannot meaningfully match and must not silently
    /// match everything. Duplicate ids are a data-quality condition
    /// surfaced upstream; here the last write wins.
    pub fn build(snapshot: &[InventoryUnit]) -> Self {
        let mut entries = Vec::new();
        let mut by_id = HashMap::new();

        for unit in snapshot {
            if unit.brand.trim().is_empty() || unit.model.trim().is_empty() {
                continue;
            }
            let label = format!("{} {}", unit.brand, unit.model);
            entries.push(NormalizedIndexEntry {
                normalized_name: normalize(&label),
                numeric_tokens: extract_numeric_tokens(&label),
                unit_id: unit.id.clone(),
            });
            by_id.insert(unit.id.clone(), unit.clone());
        }

        Self { entries, by_id }
    }

    /// Fuzzy-matchable entries, in snapshot order.
    pub fn entries(&self) -> &[NormalizedIndexEntry] {
        &self.entries
    }

    /// Exact-identifier lookup.
    pub fn unit(&self, id: &str) -> Option<&InventoryUnit> {
        self.by_id.get(id)
    }

    pub fn contains_id(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit(id: &str, brand: &str, model: &str) -> InventoryUnit {
        InventoryUnit {
            id: id.to_string(),
            brand: brand.to_string(),
            model: model.to_string(),
            year: None,
            price: None,
            image_url: None,
            status: None,
        }
    }

    #[test]
    fn entries_keep_snapshot_order() {
        let snapshot = vec![
            unit("u1", "Kia", "Sportage"),
            unit("u2", "Ford", "Ranger"),
            unit("u3", "Mazda", "3"),
        ];
        let index = InventoryIndex::build(&snapshot);
        let ids: Vec<&str> = index.entries().iter().map(|e| e.unit_id.as_str()).collect();
        assert_eq!(ids, vec!["u1", "u2", "u3"]);
        assert_eq!(index.entries()[0].normalized_name, "kiasportage");
    }

    #[test]
    fn blank_brand_or_model_excluded_from_both_structures() {
        let snapshot = vec![
            unit("u1", "", "Sportage"),
            unit("u2", "Ford", "   "),
            unit("u3", "Mazda", "3"),
        ];
        let index = InventoryIndex::build(&snapshot);
        assert_eq!(index.len(), 1);
        assert!(index.unit("u1").is_none());
        assert!(index.unit("u2").is_none());
        assert!(index.contains_id("u3"));
    }

    #[test]
    fn label_numeric_tokens_extracted() {
        let snapshot = vec![unit("u1", "Chevrolet", "D-Max 2020 4x4")];
        let index = InventoryIndex::build(&snapshot);
        assert_eq!(index.entries()[0].numeric_tokens, vec!["2020", "4"]);
    }

    #[test]
    fn duplicate_id_last_write_wins() {
        let snapshot = vec![unit("u1", "Kia", "Rio"), unit("u1", "Kia", "Sportage")];
        let index = InventoryIndex::build(&snapshot);
        assert_eq!(index.unit("u1").unwrap().model, "Sportage");
        // Both entries survive in the fuzzy list; only the exact map collapses.
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn empty_snapshot_is_legal() {
        let index = InventoryIndex::build(&[]);
        assert!(index.is_empty());
        assert!(!index.contains_id("u1"));
    }
}
