// Record Store - the immutable dataset behind the dashboard

use crate::error::{DashboardError, Result};
use crate::record::Record;
use std::collections::BTreeSet;
use std::io::Read;
use std::path::Path;

/// Compiled-in dataset: (name, category, regency, address, latitude, longitude)
const EMBEDDED_RECORDS: &[(&str, &str, &str, &str, f64, f64)] = &[
    ("UMKM Kopi Lembang", "Kuliner", "Mamasa", "Lembang, Mamasa", -2.9435, 119.3670),
    ("UMKM Sarabba Polewali", "Minuman", "Polewali Mandar", "Polewali", -3.4325, 119.3439),
    ("UMKM Kerajinan Anyaman", "Kerajinan", "Majene", "Banggae, Majene", -3.5400, 118.9700),
    ("UMKM Ikan Asap Tande", "Kuliner", "Mamuju", "Tande, Mamuju", -2.6800, 118.8900),
    ("UMKM Kue Kering Sande", "Kuliner", "Mamuju", "Simboro, Mamuju", -2.6500, 118.9000),
    ("UMKM Tenun Tradisional", "Kerajinan", "Polewali Mandar", "Binuang, Polman", -3.4820, 119.2920),
    ("UMKM Oleh-oleh Majene", "Oleh-oleh", "Majene", "Pusat Kota Majene", -3.5420, 118.9730),
    ("UMKM Rumput Laut Pasangkayu", "Pertanian & Perikanan", "Pasangkayu", "Pasangkayu", -1.1960, 119.3630),
    ("UMKM Keripik Pisang Topoyo", "Snack", "Mamuju Tengah", "Topoyo, Mateng", -2.1190, 119.3610),
    ("UMKM Kopi Tapalang", "Minuman", "Mamuju", "Tapalang, Mamuju", -2.7590, 118.7990),
];

/// Ordered, read-only sequence of records.
///
/// There are no mutating operations: a store is built once (from the
/// embedded table or an external source) and only ever read afterwards.
#[derive(Debug, Clone)]
pub struct RecordStore {
    records: Vec<Record>,
}

impl RecordStore {
    /// Store backed by the compiled-in West Sulawesi dataset.
    pub fn embedded() -> Self {
        let records = EMBEDDED_RECORDS
            .iter()
            .map(|&(name, category, regency, address, lat, lon)| {
                Record::new(name, category, regency, address, lat, lon)
            })
            .collect();

        RecordStore { records }
    }

    /// Build a store from externally supplied records.
    ///
    /// Fails on the first record that does not pass validation; a partially
    /// valid input never yields a store.
    pub fn from_records(records: Vec<Record>) -> Result<Self> {
        for (i, record) in records.iter().enumerate() {
            record
                .validate()
                .map_err(|reason| DashboardError::MalformedRecord { line: i + 1, reason })?;
        }

        Ok(RecordStore { records })
    }

    /// Load records from CSV data with a header row.
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = csv::Reader::from_reader(reader);
        let mut records = Vec::new();

        for (i, result) in rdr.deserialize::<Record>().enumerate() {
            let record = result.map_err(|e| DashboardError::MalformedRecord {
                line: i + 1,
                reason: e.to_string(),
            })?;
            records.push(record);
        }

        Self::from_records(records)
    }

    /// Load records from a CSV file on disk.
    pub fn load_csv(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let store = Self::from_csv_reader(file)?;
        tracing::info!(path = %path.display(), records = store.len(), "loaded records from CSV");
        Ok(store)
    }

    pub fn all(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct regency values, sorted ascending.
    pub fn distinct_regencies(&self) -> Vec<String> {
        distinct_sorted(self.records.iter().map(|r| r.regency.as_str()))
    }

    /// Distinct category values, sorted ascending.
    pub fn distinct_categories(&self) -> Vec<String> {
        distinct_sorted(self.records.iter().map(|r| r.category.as_str()))
    }
}

impl Default for RecordStore {
    fn default() -> Self {
        Self::embedded()
    }
}

fn distinct_sorted<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    values
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}
