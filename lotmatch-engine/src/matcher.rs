//! Demand-to-inventory matching.
//!
//! Two attempts per record, strict order, first success wins: an
//! authoritative identifier lookup, then a fuzzy scan over the index in
//! snapshot order. There is no scoring or ranking among candidates; the
//! same inputs always produce the same match.

use crate::index::InventoryIndex;
use crate::normalize::{extract_numeric_tokens, normalize};
use crate::types::{DemandRecord, MatchOutcome};

/// Signatures of this length or shorter skip the fuzzy scan entirely;
/// one or two characters match far too much to be trusted.
const SHORT_SIGNATURE_LEN: usize = 2;

/// An entry name must be longer than this before the signature is allowed
/// to contain it. Keeps very short stock labels from matching inside
/// every longer demand text.
const REVERSE_CONTAINMENT_MIN_LEN: usize = 4;

/// Reconcile one demand record against the index.
///
/// 1. A `candidate_id` that resolves in the exact map is authoritative
///    and skips the fuzzy scan, whatever the record's text says.
/// 2. Otherwise the normalized brand+model signature is scanned against
///    the entry list in stored order; the first entry passing both the
///    containment test and the numeric guard wins.
pub fn match_demand(index: &InventoryIndex, record: &DemandRecord) -> MatchOutcome {
    if let Some(candidate_id) = &record.candidate_id {
        if index.contains_id(candidate_id) {
            return MatchOutcome::Matched(candidate_id.clone());
        }
    }

    let text = format!("{} {}", record.brand_text, record.model_text);
    let signature = normalize(&text);
    if signature.len() <= SHORT_SIGNATURE_LEN {
        return MatchOutcome::Unmatched;
    }
    let demand_tokens = extract_numeric_tokens(&text);

    for entry in index.entries() {
        if !names_overlap(&entry.normalized_name, &signature)
            || !numeric_guard_passes(&demand_tokens, &entry.numeric_tokens)
        {
            continue;
        }
        return MatchOutcome::Matched(entry.unit_id.clone());
    }

    MatchOutcome::Unmatched
}

/// Bidirectional substring test between a normalized entry name and a
/// normalized demand signature.
///
/// Containment tolerates the word-order noise and partial abbreviation
/// common in hand-typed lead text. Known trade-off: short names can
/// collide ("kiario" contains "rio"). See DESIGN.md before tuning the
/// sensitivity here.
pub fn names_overlap(entry_name: &str, signature: &str) -> bool {
    entry_name.contains(signature)
        || (entry_name.len() > REVERSE_CONTAINMENT_MIN_LEN && signature.contains(entry_name))
}

/// Numeric guard: when both sides carry numeric tokens, every demand
/// token must appear among the entry's tokens. Token values compare as
/// sets, not by position. Either side being empty waives the guard.
fn numeric_guard_passes(demand_tokens: &[String], entry_tokens: &[String]) -> bool {
    if demand_tokens.is_empty() || entry_tokens.is_empty() {
        return true;
    }
    demand_tokens.iter().all(|t| entry_tokens.contains(t))
}
