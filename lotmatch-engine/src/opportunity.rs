//! Unmet-demand clustering and the stock-exclusion pass.

use std::collections::BTreeMap;

use crate::index::InventoryIndex;
use crate::matcher::names_overlap;
use crate::normalize::normalize;
use crate::types::{DemandRecord, OpportunityCluster};

/// Accumulates unmatched demand records into deduplicated clusters.
///
/// The dedup key is the normalized brand and model plus the year (or
/// "any"). The first record to open a cluster supplies its display text;
/// later records with the same key only move the counters.
#[derive(Default)]
pub struct OpportunityAggregator {
    clusters: BTreeMap<String, OpportunityCluster>,
}

impl OpportunityAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one unmatched demand record into its cluster.
    pub fn observe_unmatched(&mut self, record: &DemandRecord) {
        let key = cluster_key(record);
        let cluster = self
            .clusters
            .entry(key.clone())
            .or_insert_with(|| OpportunityCluster {
                key,
                brand: record.brand_text.clone(),
                model: record.model_text.clone(),
                year: record.year,
                request_count: 0,
                last_requested_at: record.created_at,
            });
        cluster.request_count += 1;
        if record.created_at > cluster.last_requested_at {
            cluster.last_requested_at = record.created_at;
        }
    }

    /// Run the stock-exclusion pass and return the surviving clusters
    /// ordered by request volume descending (ties by key ascending),
    /// together with the number of clusters excluded.
    ///
    /// A cluster can accumulate from text that never matched per record
    /// (the short-signature guard alone guarantees that) yet still name a
    /// vehicle actually in stock. Each cluster's signature is therefore
    /// compared against EVERY index entry with the matcher's containment
    /// test (the numeric guard does not apply here); one hit removes the
    /// cluster from the output.
    pub fn finish(self, index: &InventoryIndex) -> (Vec<OpportunityCluster>, usize) {
        let mut excluded = 0usize;
        let mut survivors: Vec<OpportunityCluster> = self
            .clusters
            .into_values()
            .filter(|cluster| {
                let signature = normalize(&format!("{} {}", cluster.brand, cluster.model));
                let in_stock = index
                    .entries()
                    .iter()
                    .any(|entry| names_overlap(&entry.normalized_name, &signature));
                if in_stock {
                    excluded += 1;
                }
                !in_stock
            })
            .collect();

        // BTreeMap yields clusters in key order; the stable sort keeps
        // that order within equal request counts.
        survivors.sort_by(|a, b| b.request_count.cmp(&a.request_count));
        (survivors, excluded)
    }
}

/// Dedup key for an unmatched record.
fn cluster_key(record: &DemandRecord) -> String {
    let year = record
        .year
        .map(|y| y.to_string())
        .unwrap_or_else(|| "any".to_string());
    format!(
        "{}-{}-{}",
        normalize(&record.brand_text),
        normalize(&record.model_text),
        year
    )
}
