// Aggregator - summary counters for the dashboard header

use crate::filter::FilteredView;
use crate::record::Record;
use serde::Serialize;
use std::collections::HashSet;

/// Header metrics.
///
/// `distinct_regency_count` is taken over the full dataset, not the filtered
/// view, so it stays constant while filters change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub total_count: usize,
    pub filtered_count: usize,
    pub distinct_regency_count: usize,
}

impl Summary {
    /// (label, value) pairs in display order.
    pub fn labelled(&self) -> [(&'static str, usize); 3] {
        [
            ("Total UMKM", self.total_count),
            ("UMKM Terfilter", self.filtered_count),
            ("Jumlah Kabupaten", self.distinct_regency_count),
        ]
    }
}

pub struct Aggregator;

impl Aggregator {
    pub fn summarize(all: &[Record], filtered: &FilteredView) -> Summary {
        let regencies: HashSet<&str> = all.iter().map(|r| r.regency.as_str()).collect();

        Summary {
            total_count: all.len(),
            filtered_count: filtered.len(),
            distinct_regency_count: regencies.len(),
        }
    }
}
