use chrono::{DateTime, TimeZone, Utc};

use lotmatch_engine::{DemandRecord, InventoryUnit};
use lotmatch_pipeline::{
    build_report, load_demand, load_inventory, load_visits, ReportQuery, TimeRange, VisitRecord,
};

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

const INVENTORY_CSV: &str = "\
id,brand,model,year,price,image_url,status
u1,Kia,Sportage,2022,25900,https://img.example/u1.jpg,available
u2,Ford,Ranger,2023,31500,,sold
u3,Chevrolet,D-Max 2020,2020,28750,,available
";

const LEADS_CSV: &str = "\
lead_id,vehicle_id,brand,model,year,created_at,resume
lead-1,,Kia,Sportage,2022,2025-06-01T09:00:00Z,Scheduled a test drive
lead-2,,kia,SPORTAGE,,2025-06-03T14:00:00Z,
lead-3,,Toyota,Hilux,2021,2025-06-04T10:00:00Z,
lead-4,,Toyota,Hilux,2021,2025-06-05T10:00:00Z,Asked for financing
lead-5,,Ford,Ranger,,2025-06-20T10:00:00Z,
";

const VISITS_CSV: &str = "\
inventory_id,visited_at
u1,2025-06-02T16:00:00Z
u1,2025-06-30T16:00:00Z
u3,2025-06-02T12:00:00Z
";

fn at(day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, day, hour, 0, 0).unwrap()
}

fn june_window() -> TimeRange {
    TimeRange {
        start: at(1, 0),
        end: at(10, 0),
    }
}

fn fixture() -> (Vec<InventoryUnit>, Vec<DemandRecord>, Vec<VisitRecord>) {
    let inventory = load_inventory(INVENTORY_CSV.as_bytes()).unwrap();
    let demand = load_demand(LEADS_CSV.as_bytes()).unwrap();
    let visits = load_visits(VISITS_CSV.as_bytes()).unwrap();
    (inventory, demand, visits)
}

// ---------------------------------------------------------------------------
// Report tests
// ---------------------------------------------------------------------------

#[test]
fn report_joins_stats_with_display_fields() {
    let (inventory, demand, visits) = fixture();
    let query = ReportQuery {
        window: june_window(),
        status_filter: None,
    };

    let report = build_report(&inventory, &demand, &visits, &query);

    // lead-1 and lead-2 both describe the Sportage; lead-5 is outside the
    // window.
    assert_eq!(report.unit_rows.len(), 1);
    let row = &report.unit_rows[0];
    assert_eq!(row.unit_id, "u1");
    assert_eq!(row.brand, "Kia");
    assert_eq!(row.model, "Sportage");
    assert_eq!(row.year, Some(2022));
    assert_eq!(row.price, Some(25900.0));
    assert_eq!(row.status.as_deref(), Some("available"));
    assert_eq!(row.total_leads, 2);
    assert_eq!(row.responded_leads, 1);
    assert_eq!(row.pending_leads, 1);
    assert_eq!(row.response_rate, 50);
    // Only the June 2nd visit is in the window.
    assert_eq!(row.showroom_count, 1);
}

#[test]
fn unmet_demand_collapses_and_survives_exclusion() {
    let (inventory, demand, visits) = fixture();
    let query = ReportQuery {
        window: june_window(),
        status_filter: None,
    };

    let report = build_report(&inventory, &demand, &visits, &query);

    // Both Hilux mentions collapse into one cluster; no Toyota in stock.
    assert_eq!(report.opportunities.len(), 1);
    let cluster = &report.opportunities[0];
    assert_eq!(cluster.brand, "Toyota");
    assert_eq!(cluster.model, "Hilux");
    assert_eq!(cluster.year, Some(2021));
    assert_eq!(cluster.request_count, 2);
    assert_eq!(cluster.last_requested_at, at(5, 10));
}

#[test]
fn status_filter_shrinks_the_snapshot_case_insensitively() {
    let (inventory, demand, visits) = fixture();
    let query = ReportQuery {
        window: TimeRange {
            start: at(1, 0),
            end: at(30, 23),
        },
        status_filter: Some("AVAILABLE".to_string()),
    };

    let report = build_report(&inventory, &demand, &visits, &query);

    assert_eq!(report.summary.units_in_snapshot, 3);
    assert_eq!(report.summary.units_after_status_filter, 2);
    // With u2 filtered out, lead-5's Ranger becomes unmet demand.
    assert!(report
        .opportunities
        .iter()
        .any(|c| c.brand == "Ford" && c.model == "Ranger"));
}

#[test]
fn window_is_inclusive_at_both_boundaries() {
    let (inventory, demand, _) = fixture();
    // lead-1 sits exactly on the start instant, lead-4 exactly on the end.
    let query = ReportQuery {
        window: TimeRange {
            start: at(1, 9),
            end: at(5, 10),
        },
        status_filter: None,
    };

    let report = build_report(&inventory, &demand, &[], &query);
    assert_eq!(report.summary.demand_in_window, 4);

    // Shrink either end by a second and the boundary records drop out.
    let query = ReportQuery {
        window: TimeRange {
            start: at(1, 10),
            end: at(5, 9),
        },
        status_filter: None,
    };
    let report = build_report(&inventory, &demand, &[], &query);
    assert_eq!(report.summary.demand_in_window, 2);
}

#[test]
fn summary_counters_add_up() {
    let (inventory, demand, visits) = fixture();
    let query = ReportQuery {
        window: june_window(),
        status_filter: None,
    };

    let report = build_report(&inventory, &demand, &visits, &query);
    let s = &report.summary;

    assert_eq!(s.demand_in_window, 4);
    assert_eq!(s.matched_records + s.unmatched_records, s.demand_in_window);
    assert_eq!(s.matched_records, 2);
    assert_eq!(s.unmatched_records, 2);
    assert_eq!(s.units_with_demand, report.unit_rows.len());
    assert_eq!(s.opportunity_clusters, report.opportunities.len());
    assert_eq!(s.visits_in_window, 2);
    assert_eq!(s.clusters_excluded_in_stock, 0);
}

#[test]
fn identical_inputs_build_identical_reports() {
    let (inventory, demand, visits) = fixture();
    let query = ReportQuery {
        window: june_window(),
        status_filter: None,
    };

    let first = build_report(&inventory, &demand, &visits, &query);
    let second = build_report(&inventory, &demand, &visits, &query);

    let first_ids: Vec<&str> = first.unit_rows.iter().map(|r| r.unit_id.as_str()).collect();
    let second_ids: Vec<&str> = second.unit_rows.iter().map(|r| r.unit_id.as_str()).collect();
    assert_eq!(first_ids, second_ids);

    let first_keys: Vec<&str> = first.opportunities.iter().map(|c| c.key.as_str()).collect();
    let second_keys: Vec<&str> = second.opportunities.iter().map(|c| c.key.as_str()).collect();
    assert_eq!(first_keys, second_keys);
}
