use serde::{Deserialize, Serialize};

/// One small-business (UMKM) entry.
///
/// Core fields are immutable once the store is built. Deserialization accepts
/// both the English column names and the Indonesian ones used by the
/// spreadsheet export (`nama`, `kategori`, `kabupaten`, `alamat`).
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Record {
    #[serde(alias = "nama")]
    pub name: String,

    #[serde(alias = "kategori")]
    pub category: String,

    /// Kabupaten (second-level administrative region)
    #[serde(alias = "kabupaten")]
    pub regency: String,

    #[serde(alias = "alamat", default)]
    pub address: String,

    pub latitude: f64,

    pub longitude: f64,
}

impl Record {
    pub fn new(
        name: impl Into<String>,
        category: impl Into<String>,
        regency: impl Into<String>,
        address: impl Into<String>,
        latitude: f64,
        longitude: f64,
    ) -> Self {
        Record {
            name: name.into(),
            category: category.into(),
            regency: regency.into(),
            address: address.into(),
            latitude,
            longitude,
        }
    }

    /// Check the record shape. Returns every problem found, joined, so a
    /// rejected load reports the whole row at once.
    pub fn validate(&self) -> Result<(), String> {
        let mut problems = Vec::new();

        if self.name.trim().is_empty() {
            problems.push("name is empty".to_string());
        }
        if self.category.trim().is_empty() {
            problems.push("category is empty".to_string());
        }
        if self.regency.trim().is_empty() {
            problems.push("regency is empty".to_string());
        }
        if !self.latitude.is_finite() {
            problems.push(format!("latitude is not a finite number ({})", self.latitude));
        }
        if !self.longitude.is_finite() {
            problems.push(format!("longitude is not a finite number ({})", self.longitude));
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(problems.join(", "))
        }
    }

    /// Map position in `[longitude, latitude]` order, as map layers expect.
    pub fn position(&self) -> [f64; 2] {
        [self.longitude, self.latitude]
    }
}
