use std::env;
use std::process;
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::Serialize;

use lotmatch_engine::OpportunityCluster;
use lotmatch_pipeline::{
    build_report, load_demand_file, load_inventory_file, load_visits_file, DemandReport,
    ReportQuery, ReportSummary, TimeRange, UnitReportRow,
};

// ---------------------------------------------------------------------------
// JSON output contract
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct DigestJson {
    generated_at: String,
    window_start: String,
    window_end: String,
    status_filter: Option<String>,
    load_ms: u128,
    reconcile_ms: u128,
    units: Vec<UnitReportRow>,
    opportunities: Vec<OpportunityCluster>,
    summary: ReportSummary,
}

fn build_json(
    report: DemandReport,
    query: &ReportQuery,
    load_ms: u128,
    reconcile_ms: u128,
) -> DigestJson {
    DigestJson {
        generated_at: Utc::now().to_rfc3339(),
        window_start: query.window.start.to_rfc3339(),
        window_end: query.window.end.to_rfc3339(),
        status_filter: query.status_filter.clone(),
        load_ms,
        reconcile_ms,
        units: report.unit_rows,
        opportunities: report.opportunities,
        summary: report.summary,
    }
}

// ---------------------------------------------------------------------------
// Human-readable output
// ---------------------------------------------------------------------------

/// Format a price with comma thousands separators.
fn format_price(amount: f64) -> String {
    let whole = amount.abs() as u64;
    let sign = if amount < 0.0 { "-" } else { "" };

    if whole < 1_000 {
        return format!("{}{}", sign, whole);
    }

    let s = whole.to_string();
    let mut result = String::new();
    for (i, ch) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(ch);
    }
    format!("{}{}", sign, result.chars().rev().collect::<String>())
}

fn year_str(year: Option<i32>) -> String {
    year.map(|y| y.to_string()).unwrap_or_else(|| "-".to_string())
}

fn print_human(report: &DemandReport, top: Option<usize>, load_ms: u128, reconcile_ms: u128) {
    let s = &report.summary;

    println!();
    println!("  \u{2554}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2557}");
    println!("  \u{2551}         LOTMATCH \u{2014} Demand & Inventory Digest            \u{2551}");
    println!("  \u{255a}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{255d}");
    println!();

    println!(
        "  {} units in snapshot ({} after status filter)  \u{00b7}  {} leads in window  \u{00b7}  {} showroom visits",
        s.units_in_snapshot, s.units_after_status_filter, s.demand_in_window, s.visits_in_window
    );
    println!(
        "  {} matched  \u{00b7}  {} unmatched  \u{00b7}  {} unmet-demand clusters ({} excluded as in stock)",
        s.matched_records, s.unmatched_records, s.opportunity_clusters, s.clusters_excluded_in_stock
    );
    println!();

    println!("  IN-STOCK DEMAND {:\u{2500}<48}", "");
    if report.unit_rows.is_empty() {
        println!("  No stocked unit received lead demand in this window.");
    } else {
        let shown = top.unwrap_or(report.unit_rows.len());
        for (i, row) in report.unit_rows.iter().take(shown).enumerate() {
            let price = row
                .price
                .map(|p| format!("${}", format_price(p)))
                .unwrap_or_else(|| "-".to_string());
            println!(
                "  {:>2}. {:<10} {:<20} {:>4}  {:>10}  {:>3} leads  {:>3}% resp  {:>2} visits",
                i + 1,
                row.brand,
                row.model,
                year_str(row.year),
                price,
                row.total_leads,
                row.response_rate,
                row.showroom_count,
            );
        }
        if report.unit_rows.len() > shown {
            println!("      \u{2026} {} more", report.unit_rows.len() - shown);
        }
    }
    println!();

    println!("  UNMET DEMAND {:\u{2500}<51}", "");
    if report.opportunities.is_empty() {
        println!("  Every request in this window is covered by current stock.");
    } else {
        let shown = top.unwrap_or(report.opportunities.len());
        for (i, cluster) in report.opportunities.iter().take(shown).enumerate() {
            println!(
                "  {:>2}. {:<10} {:<20} {:>4}  {:>3} requests  last {}",
                i + 1,
                cluster.brand,
                cluster.model,
                year_str(cluster.year),
                cluster.request_count,
                cluster.last_requested_at.format("%Y-%m-%d"),
            );
        }
        if report.opportunities.len() > shown {
            println!("      \u{2026} {} more", report.opportunities.len() - shown);
        }
    }

    println!();
    println!(
        "  \u{23f1}  CSV loaded in {}ms \u{00b7} Reconciled in {}ms \u{00b7} Total {}ms",
        load_ms,
        reconcile_ms,
        load_ms + reconcile_ms
    );
    println!();
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn usage() -> ! {
    eprintln!("Usage: lotmatch-server <inventory.csv> <leads.csv> [visits.csv] [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --from TS    Window start, RFC 3339 (default: open)");
    eprintln!("  --to TS      Window end, RFC 3339, inclusive (default: open)");
    eprintln!("  --status S   Keep only inventory units with this status");
    eprintln!("  --top N      Show at most N rows per table (text output only)");
    eprintln!("  --json       Output as JSON instead of formatted text");
    eprintln!();
    eprintln!("Example:");
    eprintln!("  lotmatch-server fixtures/sample_inventory.csv fixtures/sample_leads.csv \\");
    eprintln!("      fixtures/sample_visits.csv --from 2025-06-01T00:00:00Z \\");
    eprintln!("      --to 2025-06-30T23:59:59Z --status available --json");
    process::exit(1);
}

fn parse_ts(value: &str, flag: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|e| {
            eprintln!("Error: {flag} expects an RFC 3339 timestamp, got '{value}': {e}");
            process::exit(1);
        })
}

fn main() {
    let args: Vec<String> = env::args().collect();
    if args.len() < 3 {
        usage();
    }

    let mut paths: Vec<&str> = Vec::new();
    let mut from: Option<DateTime<Utc>> = None;
    let mut to: Option<DateTime<Utc>> = None;
    let mut status_filter: Option<String> = None;
    let mut top: Option<usize> = None;
    let mut json_output = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--from" => {
                if i + 1 >= args.len() {
                    eprintln!("Error: --from requires a timestamp");
                    process::exit(1);
                }
                from = Some(parse_ts(&args[i + 1], "--from"));
                i += 2;
            }
            "--to" => {
                if i + 1 >= args.len() {
                    eprintln!("Error: --to requires a timestamp");
                    process::exit(1);
                }
                to = Some(parse_ts(&args[i + 1], "--to"));
                i += 2;
            }
            "--status" => {
                if i + 1 >= args.len() {
                    eprintln!("Error: --status requires a value");
                    process::exit(1);
                }
                status_filter = Some(args[i + 1].clone());
                i += 2;
            }
            "--top" => {
                if i + 1 >= args.len() {
                    eprintln!("Error: --top requires a number");
                    process::exit(1);
                }
                top = Some(args[i + 1].parse().unwrap_or_else(|_| {
                    eprintln!("Error: --top requires a positive integer");
                    process::exit(1);
                }));
                i += 2;
            }
            "--json" => {
                json_output = true;
                i += 1;
            }
            other if other.starts_with("--") => {
                eprintln!("Unknown argument: {}", other);
                process::exit(1);
            }
            path => {
                paths.push(path);
                i += 1;
            }
        }
    }

    if paths.len() < 2 || paths.len() > 3 {
        usage();
    }
    let inventory_path = paths[0];
    let leads_path = paths[1];
    let visits_path = paths.get(2).copied();

    // Load the three input collections.
    let load_start = Instant::now();
    let inventory = load_inventory_file(inventory_path).unwrap_or_else(|e| {
        eprintln!("Error loading inventory: {}", e);
        process::exit(1);
    });
    let demand = load_demand_file(leads_path).unwrap_or_else(|e| {
        eprintln!("Error loading leads: {}", e);
        process::exit(1);
    });
    let visits = match visits_path {
        Some(path) => load_visits_file(path).unwrap_or_else(|e| {
            eprintln!("Error loading visits: {}", e);
            process::exit(1);
        }),
        None => Vec::new(),
    };
    let load_ms = load_start.elapsed().as_millis();

    let query = ReportQuery {
        window: TimeRange {
            start: from.unwrap_or(DateTime::<Utc>::MIN_UTC),
            end: to.unwrap_or(DateTime::<Utc>::MAX_UTC),
        },
        status_filter,
    };

    // Build the report.
    let reconcile_start = Instant::now();
    let report = build_report(&inventory, &demand, &visits, &query);
    let reconcile_ms = reconcile_start.elapsed().as_millis();

    if json_output {
        let digest = build_json(report, &query, load_ms, reconcile_ms);
        println!("{}", serde_json::to_string_pretty(&digest).unwrap());
    } else {
        print_human(&report, top, load_ms, reconcile_ms);
    }
}
