//! CSV loaders for the three reconciliation inputs.
//!
//! Expected columns:
//!   inventory.csv: id, brand, model, year, price, image_url, status
//!   leads.csv:     lead_id, vehicle_id, brand, model, year, created_at, resume
//!   visits.csv:    inventory_id, visited_at
//!
//! One leads.csv row is one (lead, vehicle-of-interest) mention; a lead
//! interested in three vehicles appears on three rows. Timestamps are
//! RFC 3339 and validated here; records never reach the engine with an
//! unparsed date.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use thiserror::Error;

use lotmatch_engine::{DemandRecord, InventoryUnit};

use crate::types::VisitRecord;

/// Loader failure modes. Row-level variants carry the 1-based file line
/// (the header is line 1).
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to open '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV parse error at line {line}: {source}")]
    Csv {
        line: usize,
        #[source]
        source: csv::Error,
    },

    #[error("invalid timestamp '{value}' at line {line}: {source}")]
    Timestamp {
        line: usize,
        value: String,
        #[source]
        source: chrono::ParseError,
    },
}

// ---------------------------------------------------------------------------
// Row shapes
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct InventoryRow {
    id: String,
    brand: String,
    model: String,
    year: Option<i32>,
    price: Option<f64>,
    image_url: Option<String>,
    status: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LeadMentionRow {
    lead_id: String,
    vehicle_id: Option<String>,
    brand: String,
    model: String,
    year: Option<i32>,
    created_at: String,
    resume: Option<String>,
}

#[derive(Debug, Deserialize)]
struct VisitRow {
    inventory_id: Option<String>,
    visited_at: String,
}

// ---------------------------------------------------------------------------
// Loaders
// ---------------------------------------------------------------------------

fn reader_for<R: Read>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader)
}

fn parse_timestamp(value: &str, line: usize) -> Result<DateTime<Utc>, LoadError> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|source| LoadError::Timestamp {
            line,
            value: value.to_string(),
            source,
        })
}

/// Load an inventory snapshot from a CSV reader.
pub fn load_inventory<R: Read>(reader: R) -> Result<Vec<InventoryUnit>, LoadError> {
    let mut units = Vec::new();
    for (i, result) in reader_for(reader).deserialize().enumerate() {
        let line = i + 2;
        let row: InventoryRow = result.map_err(|source| LoadError::Csv { line, source })?;
        units.push(InventoryUnit {
            id: row.id,
            brand: row.brand,
            model: row.model,
            year: row.year,
            price: row.price,
            image_url: row.image_url,
            status: row.status,
        });
    }
    Ok(units)
}

/// Load demand mentions from a CSV reader, one `DemandRecord` per row.
///
/// `is_responded` is derived from the resume field: any non-blank text
/// counts as a response.
pub fn load_demand<R: Read>(reader: R) -> Result<Vec<DemandRecord>, LoadError> {
    let mut records = Vec::new();
    for (i, result) in reader_for(reader).deserialize().enumerate() {
        let line = i + 2;
        let row: LeadMentionRow = result.map_err(|source| LoadError::Csv { line, source })?;
        let created_at = parse_timestamp(&row.created_at, line)?;
        let is_responded = row
            .resume
            .as_deref()
            .is_some_and(|r| !r.trim().is_empty());
        records.push(DemandRecord {
            lead_id: row.lead_id,
            candidate_id: row.vehicle_id,
            brand_text: row.brand,
            model_text: row.model,
            year: row.year,
            created_at,
            is_responded,
        });
    }
    Ok(records)
}

/// Load showroom visits from a CSV reader.
pub fn load_visits<R: Read>(reader: R) -> Result<Vec<VisitRecord>, LoadError> {
    let mut visits = Vec::new();
    for (i, result) in reader_for(reader).deserialize().enumerate() {
        let line = i + 2;
        let row: VisitRow = result.map_err(|source| LoadError::Csv { line, source })?;
        let visited_at = parse_timestamp(&row.visited_at, line)?;
        visits.push(VisitRecord {
            inventory_id: row.inventory_id,
            visited_at,
        });
    }
    Ok(visits)
}

fn open(path: &str) -> Result<File, LoadError> {
    File::open(Path::new(path)).map_err(|source| LoadError::Io {
        path: path.to_string(),
        source,
    })
}

/// Load an inventory snapshot from a CSV file path.
pub fn load_inventory_file(path: &str) -> Result<Vec<InventoryUnit>, LoadError> {
    load_inventory(open(path)?)
}

/// Load demand mentions from a CSV file path.
pub fn load_demand_file(path: &str) -> Result<Vec<DemandRecord>, LoadError> {
    load_demand(open(path)?)
}

/// Load showroom visits from a CSV file path.
pub fn load_visits_file(path: &str) -> Result<Vec<VisitRecord>, LoadError> {
    load_visits(open(path)?)
}
