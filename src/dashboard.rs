// Dashboard - wires store, filters, counters and map into one render model

use crate::aggregate::{Aggregator, Summary};
use crate::filter::{FilterCriteria, FilterEngine, ALL_OPTION};
use crate::map::{MapProjection, MapProjector};
use crate::record::Record;
use crate::store::RecordStore;
use serde::Serialize;

/// Everything a front end needs to draw one frame of the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderModel {
    pub criteria: FilterCriteria,
    pub metrics: Summary,
    pub map: MapProjection,
    /// Filtered records in source order; adapters index them from 0.
    pub table_rows: Vec<Record>,
}

/// Selection widget contents, each list starting with [`ALL_OPTION`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterOptions {
    pub regencies: Vec<String>,
    pub categories: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct Dashboard {
    store: RecordStore,
    projector: MapProjector,
}

impl Dashboard {
    pub fn new(store: RecordStore) -> Self {
        Dashboard {
            store,
            projector: MapProjector::default(),
        }
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    /// Recompute the full render model for the given criteria.
    pub fn on_filter_changed(&self, criteria: &FilterCriteria) -> RenderModel {
        let filtered = FilterEngine::apply(self.store.all(), criteria);
        let metrics = Aggregator::summarize(self.store.all(), &filtered);
        let map = self.projector.project(&filtered);

        tracing::debug!(
            regency = ?criteria.regency,
            category = ?criteria.category,
            keyword = ?criteria.name_keyword,
            matched = metrics.filtered_count,
            "filter applied"
        );

        RenderModel {
            criteria: criteria.clone(),
            metrics,
            map,
            table_rows: filtered.into_records(),
        }
    }

    pub fn regency_options(&self) -> Vec<String> {
        with_all_option(self.store.distinct_regencies())
    }

    pub fn category_options(&self) -> Vec<String> {
        with_all_option(self.store.distinct_categories())
    }

    pub fn options(&self) -> FilterOptions {
        FilterOptions {
            regencies: self.regency_options(),
            categories: self.category_options(),
        }
    }
}

fn with_all_option(values: Vec<String>) -> Vec<String> {
    std::iter::once(ALL_OPTION.to_string()).chain(values).collect()
}
