//! Per-unit interest aggregation.

use std::collections::BTreeMap;

use crate::types::{DemandRecord, ShowroomVisitRecord, UnitStat};

/// Accumulates lead and showroom-visit counts per matched inventory unit.
///
/// A `UnitStat` is created lazily on a unit's first matched lead and only
/// ever mutated additively. Visits are buffered separately and merged at
/// finish, so a visit counts toward a unit that has lead demand by the end
/// of the run whichever order the two streams arrive in; visits to units
/// that never receive lead demand are dropped.
#[derive(Default)]
pub struct UnitStatAggregator {
    stats: BTreeMap<String, UnitStat>,
    visit_counts: BTreeMap<String, u64>,
}

impl UnitStatAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a demand record matched to `unit_id`.
    pub fn observe_match(&mut self, unit_id: &str, record: &DemandRecord) {
        let stat = self
            .stats
            .entry(unit_id.to_string())
            .or_insert_with(|| UnitStat {
                unit_id: unit_id.to_string(),
                total_leads: 0,
                responded_leads: 0,
                pending_leads: 0,
                showroom_count: 0,
                response_rate: 0,
            });
        stat.total_leads += 1;
        if record.is_responded {
            stat.responded_leads += 1;
        } else {
            stat.pending_leads += 1;
        }
    }

    /// Record a showroom visit. Visits without an inventory reference are
    /// ignored.
    pub fn observe_visit(&mut self, visit: &ShowroomVisitRecord) {
        if let Some(id) = &visit.inventory_id {
            *self.visit_counts.entry(id.clone()).or_insert(0) += 1;
        }
    }

    /// Merge buffered visits, derive response rates, and return every row
    /// with lead or showroom activity, ordered by lead volume descending
    /// (ties by unit id ascending).
    pub fn finish(self) -> Vec<UnitStat> {
        let Self {
            mut stats,
            visit_counts,
        } = self;

        for (unit_id, count) in visit_counts {
            if let Some(stat) = stats.get_mut(&unit_id) {
                stat.showroom_count += count;
            }
        }

        let mut rows: Vec<UnitStat> = stats
            .into_values()
            .map(|mut stat| {
                stat.response_rate = if stat.total_leads > 0 {
                    (100.0 * stat.responded_leads as f64 / stat.total_leads as f64).round()
                        as u32
                } else {
                    0
                };
                stat
            })
            .filter(|s| s.total_leads > 0 || s.showroom_count > 0)
            .collect();

        // BTreeMap yields rows in unit-id order; the stable sort keeps that
        // order within equal lead counts.
        rows.sort_by(|a, b| b.total_leads.cmp(&a.total_leads));
        rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn lead(responded: bool) -> DemandRecord {
        DemandRecord {
            lead_id: "lead-1".to_string(),
            candidate_id: None,
            brand_text: "Kia".to_string(),
            model_text: "Sportage".to_string(),
            year: None,
            created_at: Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap(),
            is_responded: responded,
        }
    }

    fn visit(id: &str) -> ShowroomVisitRecord {
        ShowroomVisitRecord {
            inventory_id: Some(id.to_string()),
        }
    }

    #[test]
    fn responded_and_pending_split_covers_total() {
        let mut agg = UnitStatAggregator::new();
        agg.observe_match("u1", &lead(true));
        agg.observe_match("u1", &lead(false));
        agg.observe_match("u1", &lead(false));

        let rows = agg.finish();
        assert_eq!(rows.len(), 1);
        let stat = &rows[0];
        assert_eq!(stat.total_leads, 3);
        assert_eq!(stat.responded_leads, 1);
        assert_eq!(stat.pending_leads, 2);
        assert_eq!(stat.responded_leads + stat.pending_leads, stat.total_leads);
        // round(100 * 1/3) = 33
        assert_eq!(stat.response_rate, 33);
    }

    #[test]
    fn response_rate_rounds_half_up() {
        let mut agg = UnitStatAggregator::new();
        agg.observe_match("u1", &lead(true));
        agg.observe_match("u1", &lead(true));
        agg.observe_match("u1", &lead(false));
        // round(100 * 2/3) = 67
        assert_eq!(agg.finish()[0].response_rate, 67);
    }

    #[test]
    fn visit_before_first_lead_still_counts() {
        let mut agg = UnitStatAggregator::new();
        agg.observe_visit(&visit("u1"));
        agg.observe_match("u1", &lead(true));

        let rows = agg.finish();
        assert_eq!(rows[0].showroom_count, 1);
        assert_eq!(rows[0].total_leads, 1);
    }

    #[test]
    fn visits_without_lead_demand_are_dropped() {
        let mut agg = UnitStatAggregator::new();
        agg.observe_visit(&visit("u9"));
        agg.observe_visit(&visit("u9"));
        agg.observe_match("u1", &lead(false));

        let rows = agg.finish();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].unit_id, "u1");
    }

    #[test]
    fn visits_without_inventory_reference_are_ignored() {
        let mut agg = UnitStatAggregator::new();
        agg.observe_match("u1", &lead(false));
        agg.observe_visit(&ShowroomVisitRecord { inventory_id: None });
        assert_eq!(agg.finish()[0].showroom_count, 0);
    }

    #[test]
    fn rows_sorted_by_lead_volume_then_unit_id() {
        let mut agg = UnitStatAggregator::new();
        agg.observe_match("u3", &lead(false));
        agg.observe_match("u1", &lead(false));
        agg.observe_match("u2", &lead(false));
        agg.observe_match("u2", &lead(false));

        let ids: Vec<String> = agg.finish().into_iter().map(|s| s.unit_id).collect();
        assert_eq!(ids, vec!["u2", "u1", "u3"]);
    }

    #[test]
    fn empty_run_produces_no_rows() {
        assert!(UnitStatAggregator::new().finish().is_empty());
    }
}
