//! Demand-inventory reconciliation core.
//!
//! Given an inventory snapshot and a batch of free-text "vehicle of
//! interest" mentions collected from sales leads, this crate associates
//! each mention with a stocked unit where one plausibly matches,
//! aggregates per-unit interest metrics (lead volume, response rate,
//! showroom visits), and surfaces deduplicated unmet-demand clusters for
//! vehicles the dealer does not stock.
//!
//! The engine is synchronous and deterministic: one snapshot, one batch,
//! no internal parallelism, no wall-clock reads. Timestamps are inputs.
//! It persists nothing and holds no state across runs; each run builds
//! its own index and aggregators.

pub mod index;
pub mod matcher;
pub mod normalize;
pub mod opportunity;
pub mod reconcile;
pub mod stats;
pub mod types;

pub use index::{InventoryIndex, NormalizedIndexEntry};
pub use matcher::match_demand;
pub use normalize::{extract_numeric_tokens, normalize};
pub use opportunity::OpportunityAggregator;
pub use reconcile::{reconcile, ReconciliationOutcome};
pub use stats::UnitStatAggregator;
pub use types::{
    DemandRecord, InventoryUnit, MatchOutcome, OpportunityCluster, ShowroomVisitRecord, UnitStat,
};
