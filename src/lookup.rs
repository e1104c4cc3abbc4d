//! Approximate reverse geocoding
//!
//! Stands in for a live reverse-geocoding service: a precomputed table maps a
//! photo coordinate to its first/second address component and country.

use csv::{ReaderBuilder, WriterBuilder};
use std::collections::HashMap;
use std::fs::File;
use std::path::Path;
use tracing::{debug, warn};

use crate::cluster::GeoPoint;
use crate::error::Result;
use crate::lines::decode_record;

/// What a lookup knows about a coordinate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApproxLocation {
    pub first: String,
    pub second: String,
    pub country: String,
}

/// Something that can reverse-geocode a coordinate
pub trait LocationLookup {
    fn lookup(&self, point: &GeoPoint) -> Option<ApproxLocation>;
}

/// In-memory lookup keyed by exact coordinates
#[derive(Debug, Default)]
pub struct LookupTable {
    entries: HashMap<(u64, u64), ApproxLocation>,
}

impl LookupTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, point: GeoPoint, location: ApproxLocation) {
        self.entries.insert(point.key(), location);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Reads `longitude, latitude, first, second, country` tab separated lines
    ///
    /// Lines with unparsable coordinates or missing columns are skipped.
    pub fn read(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        let mut reader = ReaderBuilder::new()
            .delimiter(b'\t')
            .has_headers(false)
            .flexible(true)
            .quoting(false)
            .from_reader(file);

        let mut table = LookupTable::new();
        for result in reader.byte_records() {
            let record = match result {
                Ok(record) => decode_record(&record, record.position().map_or(0, |p| p.line())),
                Err(e) if e.is_io_error() => return Err(e.into()),
                Err(e) => {
                    warn!(error = %e, "skipping unreadable lookup line");
                    continue;
                }
            };
            if record.len() < 5 {
                warn!(?record, "lookup line has fewer than 5 fields");
                continue;
            }

            let lon = record[0].parse::<f64>();
            let lat = record[1].parse::<f64>();
            let (Ok(lon), Ok(lat)) = (lon, lat) else {
                warn!(?record, "lookup line has invalid coordinates");
                continue;
            };

            table.insert(
                GeoPoint::new(lon, lat),
                ApproxLocation {
                    first: record[2].to_string(),
                    second: record[3].to_string(),
                    country: record[4].to_string(),
                },
            );
        }

        debug!(entries = table.len(), ?path, "lookup table loaded");
        Ok(table)
    }
}

impl LocationLookup for LookupTable {
    fn lookup(&self, point: &GeoPoint) -> Option<ApproxLocation> {
        self.entries.get(&point.key()).cloned()
    }
}

/// Writes lookup lines in the format [`LookupTable::read`] accepts
pub fn write_lookup_table(path: &Path, rows: &[(GeoPoint, ApproxLocation)]) -> Result<()> {
    let out_file = File::create(path)?;
    let mut writer = WriterBuilder::new()
        .delimiter(b'\t')
        .quote_style(csv::QuoteStyle::Never)
        .from_writer(out_file);

    for (point, location) in rows {
        writer.write_record([
            point.x().to_string(),
            point.y().to_string(),
            location.first.clone(),
            location.second.clone(),
            location.country.clone(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}
