use chrono::{DateTime, Utc};
use serde::Serialize;

// ---------------------------------------------------------------------------
// Input records
// ---------------------------------------------------------------------------

/// A stocked vehicle from the inventory snapshot.
///
/// Only `id`, `brand`, and `model` participate in matching; the remaining
/// fields are display passthrough carried to report rows.
#[derive(Clone, Debug)]
pub struct InventoryUnit {
    pub id: String,
    pub brand: String,
    pub model: String,
    pub year: Option<i32>,
    pub price: Option<f64>,
    pub image_url: Option<String>,
    pub status: Option<String>,
}

/// One lead's expressed interest in one vehicle. A lead interested in
/// several vehicles produces several records; each is reconciled
/// independently.
#[derive(Clone, Debug)]
pub struct DemandRecord {
    pub lead_id: String,
    /// Identifier the source system attached to the mention. May be stale
    /// or absent; authoritative only when it resolves in the index.
    pub candidate_id: Option<String>,
    pub brand_text: String,
    pub model_text: String,
    pub year: Option<i32>,
    pub created_at: DateTime<Utc>,
    /// True when the lead carries a non-empty summary/resume field.
    pub is_responded: bool,
}

/// A showroom walk-in, referenced back to inventory when the source system
/// recorded which unit was viewed.
#[derive(Clone, Debug)]
pub struct ShowroomVisitRecord {
    pub inventory_id: Option<String>,
}

// ---------------------------------------------------------------------------
// Match outcome
// ---------------------------------------------------------------------------

/// Result of reconciling a single demand record against the index.
/// Every record resolves to exactly one of these; matching never fails.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MatchOutcome {
    /// The record describes this inventory unit.
    Matched(String),
    /// No unit plausibly matches.
    Unmatched,
}

// ---------------------------------------------------------------------------
// Outputs
// ---------------------------------------------------------------------------

/// Per-unit interest metrics.
///
/// `pending_leads + responded_leads == total_leads` holds for every row,
/// and `response_rate` is the rounded percentage of responded leads
/// (0 when no leads were counted).
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct UnitStat {
    pub unit_id: String,
    pub total_leads: u64,
    pub responded_leads: u64,
    pub pending_leads: u64,
    pub showroom_count: u64,
    pub response_rate: u32,
}

/// A deduplicated bucket of unmatched demand for a vehicle description
/// not currently in stock.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct OpportunityCluster {
    /// Dedup key: normalized brand and model plus the year, or "any".
    pub key: String,
    /// First-seen raw display text, not re-normalized.
    pub brand: String,
    pub model: String,
    pub year: Option<i32>,
    pub request_count: u64,
    pub last_requested_at: DateTime<Utc>,
}
