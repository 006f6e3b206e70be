//! One reconciliation run: three input collections in, two result
//! collections out.

use crate::index::InventoryIndex;
use crate::matcher::match_demand;
use crate::opportunity::OpportunityAggregator;
use crate::stats::UnitStatAggregator;
use crate::types::{
    DemandRecord, InventoryUnit, MatchOutcome, OpportunityCluster, ShowroomVisitRecord, UnitStat,
};

/// Everything a single run produces. The counters feed digest summaries;
/// the two collections are ready for tabular display.
#[derive(Clone, Debug)]
pub struct ReconciliationOutcome {
    pub unit_stats: Vec<UnitStat>,
    pub opportunities: Vec<OpportunityCluster>,
    /// Demand records that resolved to an inventory unit.
    pub matched_records: usize,
    /// Demand records with no plausible unit.
    pub unmatched_records: usize,
    /// Opportunity clusters removed by the stock-exclusion pass.
    pub excluded_clusters: usize,
}

/// Run the engine over one inventory snapshot and one batch of demand and
/// visit records.
///
/// The index is built once and scanned in snapshot order; every demand
/// record fans out to exactly one of the two aggregators. No wall clock,
/// no randomness: re-running with the same inputs produces the same
/// outcome.
pub fn reconcile(
    inventory: &[InventoryUnit],
    demand: &[DemandRecord],
    visits: &[ShowroomVisitRecord],
) -> ReconciliationOutcome {
    let index = InventoryIndex::build(inventory);
    let mut stats = UnitStatAggregator::new();
    let mut opportunities = OpportunityAggregator::new();
    let mut matched_records = 0usize;
    let mut unmatched_records = 0usize;

    for record in demand {
        match match_demand(&index, record) {
            MatchOutcome::Matched(unit_id) => {
                matched_records += 1;
                stats.observe_match(&unit_id, record);
            }
            MatchOutcome::Unmatched => {
                unmatched_records += 1;
                opportunities.observe_unmatched(record);
            }
        }
    }

    for visit in visits {
        stats.observe_visit(visit);
    }

    let unit_stats = stats.finish();
    let (opportunities, excluded_clusters) = opportunities.finish(&index);

    ReconciliationOutcome {
        unit_stats,
        opportunities,
        matched_records,
        unmatched_records,
        excluded_clusters,
    }
}
