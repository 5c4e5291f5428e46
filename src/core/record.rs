use serde::{Deserialize, Serialize};

/// A single power plant row after normalization
///
/// Records are produced by [`crate::normalize::PlantCleaner`] and referred to
/// by their position within a collection during matching.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Name as it appeared in the source table
    pub name: String,

    /// Canonical name: lowercase, no diacritics, rules applied
    pub name_clean: String,

    /// Capacity in MW, `None` when the raw value could not be parsed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capacity_clean: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub province_clean: Option<String>,

    /// Fuel, with multi-fuel values sorted (`coal/gas`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fuel_clean: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_clean: Option<String>,
}

impl Record {
    /// Create a record with only the fields the matchers look at.
    ///
    /// Mostly useful for tests and for callers that already hold
    /// normalized data.
    pub fn new(
        name: impl Into<String>,
        name_clean: impl Into<String>,
        capacity_clean: Option<f64>,
    ) -> Self {
        Self {
            name: name.into(),
            name_clean: name_clean.into(),
            capacity_clean,
            province_clean: None,
            fuel_clean: None,
            status_clean: None,
        }
    }

    #[must_use]
    pub fn with_province(mut self, province: impl Into<String>) -> Self {
        self.province_clean = Some(province.into());
        self
    }

    #[must_use]
    pub fn with_fuel(mut self, fuel: impl Into<String>) -> Self {
        self.fuel_clean = Some(fuel.into());
        self
    }

    #[must_use]
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status_clean = Some(status.into());
        self
    }

    /// Signed capacity difference `self - other`, when both are known
    #[must_use]
    pub fn capacity_difference(&self, other: &Record) -> Option<f64> {
        match (self.capacity_clean, other.capacity_clean) {
            (Some(a), Some(b)) => Some(a - b),
            _ => None,
        }
    }

    /// Grouping key used by province x fuel reconciliation.
    ///
    /// Missing values group under the empty string.
    #[must_use]
    pub fn group_key(&self) -> (String, String) {
        (
            self.province_clean.clone().unwrap_or_default(),
            self.fuel_clean.clone().unwrap_or_default(),
        )
    }
}
