//! The collaborator layer around the LotMatch reconciliation engine:
//! CSV loaders for the three input collections, the date-window and
//! inventory-status filters, and report assembly for tabular display.
//!
//! The engine itself (`lotmatch-engine`) stays pure; everything with a
//! file handle, a clock value, or a log line lives here.

pub mod loaders;
pub mod report;
pub mod types;

pub use loaders::{
    load_demand, load_demand_file, load_inventory, load_inventory_file, load_visits,
    load_visits_file, LoadError,
};
pub use report::build_report;
pub use types::{
    DemandReport, ReportQuery, ReportSummary, TimeRange, UnitReportRow, VisitRecord,
};
