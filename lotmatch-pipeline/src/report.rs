//! Report assembly: window and status filtering, engine invocation, and
//! the display-field join.

use std::collections::HashMap;

use log::{debug, info};

use lotmatch_engine::{reconcile, DemandRecord, InventoryUnit, ShowroomVisitRecord};

use crate::types::{DemandReport, ReportQuery, ReportSummary, UnitReportRow, VisitRecord};

/// Build one demand report.
///
/// Applies the inventory status filter and the inclusive date window,
/// runs the reconciliation engine over what remains, and joins the
/// per-unit stats back to the snapshot's display fields so the result
/// renders directly as two tables.
pub fn build_report(
    inventory: &[InventoryUnit],
    demand: &[DemandRecord],
    visits: &[VisitRecord],
    query: &ReportQuery,
) -> DemandReport {
    let snapshot: Vec<InventoryUnit> = match &query.status_filter {
        Some(status) => inventory
            .iter()
            .filter(|u| {
                u.status
                    .as_deref()
                    .is_some_and(|s| s.eq_ignore_ascii_case(status))
            })
            .cloned()
            .collect(),
        None => inventory.to_vec(),
    };
    debug!(
        "status filter kept {} of {} inventory units",
        snapshot.len(),
        inventory.len()
    );

    let demand_in_window: Vec<DemandRecord> = demand
        .iter()
        .filter(|r| query.window.contains(r.created_at))
        .cloned()
        .collect();
    let visits_in_window: Vec<ShowroomVisitRecord> = visits
        .iter()
        .filter(|v| query.window.contains(v.visited_at))
        .map(|v| ShowroomVisitRecord {
            inventory_id: v.inventory_id.clone(),
        })
        .collect();
    debug!(
        "window kept {} of {} demand records and {} of {} visits",
        demand_in_window.len(),
        demand.len(),
        visits_in_window.len(),
        visits.len()
    );

    let outcome = reconcile(&snapshot, &demand_in_window, &visits_in_window);
    info!(
        "reconciled {} demand records: {} matched, {} unmatched, {} opportunity clusters ({} excluded as in stock)",
        demand_in_window.len(),
        outcome.matched_records,
        outcome.unmatched_records,
        outcome.opportunities.len(),
        outcome.excluded_clusters
    );

    // Join stats back to display fields. Duplicate ids collapse the same
    // way as the engine's exact map: last write wins.
    let unit_index: HashMap<&str, &InventoryUnit> =
        snapshot.iter().map(|u| (u.id.as_str(), u)).collect();

    let unit_rows: Vec<UnitReportRow> = outcome
        .unit_stats
        .iter()
        .filter_map(|stat| {
            unit_index.get(stat.unit_id.as_str()).map(|unit| UnitReportRow {
                unit_id: stat.unit_id.clone(),
                brand: unit.brand.clone(),
                model: unit.model.clone(),
                year: unit.year,
                price: unit.price,
                image_url: unit.image_url.clone(),
                status: unit.status.clone(),
                total_leads: stat.total_leads,
                responded_leads: stat.responded_leads,
                pending_leads: stat.pending_leads,
                showroom_count: stat.showroom_count,
                response_rate: stat.response_rate,
            })
        })
        .collect();

    let summary = ReportSummary {
        units_in_snapshot: inventory.len(),
        units_after_status_filter: snapshot.len(),
        demand_in_window: demand_in_window.len(),
        visits_in_window: visits_in_window.len(),
        matched_records: outcome.matched_records,
        unmatched_records: outcome.unmatched_records,
        units_with_demand: outcome.unit_stats.len(),
        opportunity_clusters: outcome.opportunities.len(),
        clusters_excluded_in_stock: outcome.excluded_clusters,
    };

    DemandReport {
        unit_rows,
        opportunities: outcome.opportunities,
        summary,
    }
}
