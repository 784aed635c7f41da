// Filter Engine - region / category / name-keyword filtering

use crate::record::Record;
use serde::Serialize;

/// Selection-widget sentinel meaning "no filter on this dimension".
pub const ALL_OPTION: &str = "Semua";

/// User-selected filter criteria for one interaction.
///
/// `None` (or an empty keyword) means the dimension is not filtered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterCriteria {
    pub regency: Option<String>,
    pub category: Option<String>,
    pub name_keyword: Option<String>,
}

impl FilterCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build criteria from raw widget values, where [`ALL_OPTION`] or an
    /// empty string stands for "all".
    pub fn from_selection(regency: Option<&str>, category: Option<&str>, keyword: Option<&str>) -> Self {
        FilterCriteria {
            regency: selection(regency),
            category: selection(category),
            name_keyword: keyword.filter(|k| !k.is_empty()).map(str::to_string),
        }
    }

    pub fn with_regency(mut self, regency: impl Into<String>) -> Self {
        self.regency = Some(regency.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_name_keyword(mut self, keyword: impl Into<String>) -> Self {
        self.name_keyword = Some(keyword.into());
        self
    }

    /// True when no predicate is active.
    pub fn is_unfiltered(&self) -> bool {
        self.regency.is_none() && self.category.is_none() && self.active_keyword().is_none()
    }

    fn active_keyword(&self) -> Option<&str> {
        self.name_keyword.as_deref().filter(|k| !k.is_empty())
    }

    /// Whether a single record passes every active predicate.
    pub fn matches(&self, record: &Record) -> bool {
        if let Some(regency) = &self.regency {
            if &record.regency != regency {
                return false;
            }
        }

        if let Some(category) = &self.category {
            if &record.category != category {
                return false;
            }
        }

        if let Some(keyword) = self.active_keyword() {
            // Literal substring, not a pattern
            if !record.name.to_lowercase().contains(&keyword.to_lowercase()) {
                return false;
            }
        }

        true
    }
}

fn selection(value: Option<&str>) -> Option<String> {
    value
        .filter(|v| !v.is_empty() && *v != ALL_OPTION)
        .map(str::to_string)
}

/// Records that matched the active criteria, in source order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FilteredView {
    records: Vec<Record>,
}

impl FilteredView {
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    pub fn into_records(self) -> Vec<Record> {
        self.records
    }
}

pub struct FilterEngine;

impl FilterEngine {
    /// Apply `criteria` to `records`, returning a new view. The input is
    /// never modified and surviving records keep their relative order.
    pub fn apply(records: &[Record], criteria: &FilterCriteria) -> FilteredView {
        let records: Vec<Record> = records
            .iter()
            .filter(|record| criteria.matches(record))
            .cloned()
            .collect();

        FilteredView { records }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::RecordStore;

    fn names(view: &FilteredView) -> Vec<&str> {
        view.iter().map(|r| r.name.as_str()).collect()
    }

    #[test]
    fn test_identity_filter() {
        let store = RecordStore::embedded();
        let view = FilterEngine::apply(store.all(), &FilterCriteria::new());

        assert_eq!(view.records(), store.all());
    }

    #[test]
    fn test_empty_keyword_is_no_filter() {
        let store = RecordStore::embedded();
        let criteria = FilterCriteria::new().with_name_keyword("");

        assert!(criteria.is_unfiltered());
        assert_eq!(FilterEngine::apply(store.all(), &criteria).len(), store.len());
    }

    #[test]
    fn test_regency_exact_match() {
        let store = RecordStore::embedded();
        let view = FilterEngine::apply(store.all(), &FilterCriteria::new().with_regency("Mamuju"));

        assert_eq!(
            names(&view),
            vec!["UMKM Ikan Asap Tande", "UMKM Kue Kering Sande", "UMKM Kopi Tapalang"]
        );
    }

    #[test]
    fn test_regency_is_case_sensitive() {
        let store = RecordStore::embedded();
        let view = FilterEngine::apply(store.all(), &FilterCriteria::new().with_regency("mamuju"));

        assert!(view.is_empty());
    }

    #[test]
    fn test_keyword_case_insensitive() {
        let store = RecordStore::embedded();
        let lower = FilterEngine::apply(store.all(), &FilterCriteria::new().with_name_keyword("kopi"));
        let upper = FilterEngine::apply(store.all(), &FilterCriteria::new().with_name_keyword("KOPI"));

        assert_eq!(lower, upper);
        assert_eq!(names(&lower), vec!["UMKM Kopi Lembang", "UMKM Kopi Tapalang"]);
    }

    #[test]
    fn test_keyword_kue() {
        let store = RecordStore::embedded();
        for keyword in ["kue", "KUE", "Kue"] {
            let view = FilterEngine::apply(store.all(), &FilterCriteria::new().with_name_keyword(keyword));
            assert_eq!(names(&view), vec!["UMKM Kue Kering Sande"]);
        }
    }

    #[test]
    fn test_keyword_is_literal() {
        let store = RecordStore::embedded();
        let view = FilterEngine::apply(store.all(), &FilterCriteria::new().with_name_keyword("K.pi"));

        assert!(view.is_empty());
    }

    #[test]
    fn test_category_filter() {
        let store = RecordStore::embedded();
        let view = FilterEngine::apply(store.all(), &FilterCriteria::new().with_category("Kerajinan"));

        assert_eq!(names(&view), vec!["UMKM Kerajinan Anyaman", "UMKM Tenun Tradisional"]);
    }

    #[test]
    fn test_combined_regency_and_category() {
        let store = RecordStore::embedded();
        let criteria = FilterCriteria::new()
            .with_regency("Polewali Mandar")
            .with_category("Kerajinan");
        let view = FilterEngine::apply(store.all(), &criteria);

        assert_eq!(names(&view), vec!["UMKM Tenun Tradisional"]);
    }

    #[test]
    fn test_no_match_yields_empty_view() {
        let store = RecordStore::embedded();
        let view = FilterEngine::apply(store.all(), &FilterCriteria::new().with_name_keyword("zzz"));

        assert!(view.is_empty());
        assert_eq!(view.len(), 0);
    }

    #[test]
    fn test_idempotent_and_never_grows() {
        let store = RecordStore::embedded();
        let all_criteria = vec![
            FilterCriteria::new(),
            FilterCriteria::new().with_regency("Majene"),
            FilterCriteria::new().with_category("Kuliner").with_name_keyword("umkm"),
            FilterCriteria::new().with_regency("Mamuju").with_name_keyword("kopi"),
            FilterCriteria::new().with_name_keyword("zzz"),
        ];

        for criteria in &all_criteria {
            let once = FilterEngine::apply(store.all(), criteria);
            let twice = FilterEngine::apply(once.records(), criteria);

            assert!(once.len() <= store.len());
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn test_order_preserved() {
        let store = RecordStore::embedded();
        let view = FilterEngine::apply(store.all(), &FilterCriteria::new().with_category("Kuliner"));

        let positions: Vec<usize> = view
            .iter()
            .map(|r| store.all().iter().position(|s| s == r).unwrap())
            .collect();
        let mut sorted = positions.clone();
        sorted.sort();

        assert_eq!(positions, sorted);
        assert_eq!(positions, vec![0, 3, 4]);
    }

    #[test]
    fn test_source_untouched() {
        let store = RecordStore::embedded();
        let before = store.all().to_vec();
        let _ = FilterEngine::apply(store.all(), &FilterCriteria::new().with_regency("Majene"));

        assert_eq!(store.all(), before.as_slice());
    }

    #[test]
    fn test_from_selection_sentinel() {
        let criteria = FilterCriteria::from_selection(Some(ALL_OPTION), Some("Kuliner"), Some(""));

        assert_eq!(criteria.regency, None);
        assert_eq!(criteria.category.as_deref(), Some("Kuliner"));
        assert_eq!(criteria.name_keyword, None);

        let none = FilterCriteria::from_selection(None, Some(""), None);
        assert!(none.is_unfiltered());
    }
}
