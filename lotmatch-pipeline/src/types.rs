use chrono::{DateTime, Utc};
use serde::Serialize;

use lotmatch_engine::OpportunityCluster;

// ---------------------------------------------------------------------------
// Query types
// ---------------------------------------------------------------------------

/// Inclusive reporting window. Demand records are filtered on
/// `created_at`, showroom visits on `visited_at`, both before any data
/// reaches the engine.
#[derive(Clone, Copy, Debug)]
pub struct TimeRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeRange {
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.start <= at && at <= self.end
    }
}

/// Parameters for one reconciliation report.
#[derive(Clone, Debug)]
pub struct ReportQuery {
    pub window: TimeRange,
    /// Keep only units whose status equals this value, compared
    /// case-insensitively. `None` keeps the whole snapshot.
    pub status_filter: Option<String>,
}

/// A showroom visit as loaded from the source system. The engine only
/// consumes the inventory reference; the timestamp exists for window
/// filtering at this layer.
#[derive(Clone, Debug)]
pub struct VisitRecord {
    pub inventory_id: Option<String>,
    pub visited_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// One unit's interest metrics joined with its display attributes, ready
/// for tabular rendering.
#[derive(Clone, Debug, Serialize)]
pub struct UnitReportRow {
    pub unit_id: String,
    pub brand: String,
    pub model: String,
    pub year: Option<i32>,
    pub price: Option<f64>,
    pub image_url: Option<String>,
    pub status: Option<String>,
    pub total_leads: u64,
    pub responded_leads: u64,
    pub pending_leads: u64,
    pub showroom_count: u64,
    pub response_rate: u32,
}

/// Run counters for the digest summary.
#[derive(Clone, Debug, Serialize)]
pub struct ReportSummary {
    pub units_in_snapshot: usize,
    pub units_after_status_filter: usize,
    pub demand_in_window: usize,
    pub visits_in_window: usize,
    pub matched_records: usize,
    pub unmatched_records: usize,
    pub units_with_demand: usize,
    pub opportunity_clusters: usize,
    pub clusters_excluded_in_stock: usize,
}

/// Output of one report run.
#[derive(Clone, Debug, Serialize)]
pub struct DemandReport {
    pub unit_rows: Vec<UnitReportRow>,
    pub opportunities: Vec<OpportunityCluster>,
    pub summary: ReportSummary,
}
