use serde::{Deserialize, Serialize};

use crate::core::record::Record;
use crate::core::types::{MatchStatus, MatchType};

/// Result of one assignment slot: a matched pair or a single unmatched record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outcome {
    /// Position of the record in collection A, if any
    pub index_a: Option<usize>,

    /// Position of the record in collection B, if any
    pub index_b: Option<usize>,

    pub name_file_a: Option<String>,
    pub name_clean_file_a: Option<String>,
    pub capacity_file_a: Option<f64>,

    pub name_file_b: Option<String>,
    pub name_clean_file_b: Option<String>,
    pub capacity_file_b: Option<f64>,

    /// Capacity of A minus capacity of B; `None` unless both are known
    pub capacity_difference: Option<f64>,

    pub status: MatchStatus,
}

impl Outcome {
    /// Outcome for record `i` of A paired with record `j` of B
    #[must_use]
    pub fn pair(i: usize, a: &Record, j: usize, b: &Record, status: MatchStatus) -> Self {
        Self {
            index_a: Some(i),
            index_b: Some(j),
            name_file_a: Some(a.name.clone()),
            name_clean_file_a: Some(a.name_clean.clone()),
            capacity_file_a: a.capacity_clean,
            name_file_b: Some(b.name.clone()),
            name_clean_file_b: Some(b.name_clean.clone()),
            capacity_file_b: b.capacity_clean,
            capacity_difference: a.capacity_difference(b),
            status,
        }
    }

    /// Outcome for record `i` of A left without a partner
    #[must_use]
    pub fn only_in_a(i: usize, a: &Record) -> Self {
        Self {
            index_a: Some(i),
            index_b: None,
            name_file_a: Some(a.name.clone()),
            name_clean_file_a: Some(a.name_clean.clone()),
            capacity_file_a: a.capacity_clean,
            name_file_b: None,
            name_clean_file_b: None,
            capacity_file_b: None,
            capacity_difference: None,
            status: MatchStatus::OnlyInA,
        }
    }

    /// Outcome for record `j` of B left without a partner
    #[must_use]
    pub fn only_in_b(j: usize, b: &Record) -> Self {
        Self {
            index_a: None,
            index_b: Some(j),
            name_file_a: None,
            name_clean_file_a: None,
            capacity_file_a: None,
            name_file_b: Some(b.name.clone()),
            name_clean_file_b: Some(b.name_clean.clone()),
            capacity_file_b: b.capacity_clean,
            capacity_difference: None,
            status: MatchStatus::OnlyInB,
        }
    }
}

/// One row of the reconciliation table consumed by the metrics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconciliationEntry {
    pub reference_name: Option<String>,
    pub system_name: Option<String>,
    pub reference_province: Option<String>,
    pub system_province: Option<String>,
    pub reference_fuel: Option<String>,
    pub system_fuel: Option<String>,
    pub reference_status: Option<String>,
    pub system_status: Option<String>,
    pub reference_capacity_mwe: Option<f64>,
    pub system_capacity_mwe: Option<f64>,

    /// Reference capacity minus system capacity
    pub capacity_diff: Option<f64>,

    /// `|system - reference| / reference * 100`, rounded to one decimal
    pub capacity_diff_pct: Option<f64>,

    pub match_type: MatchType,

    // Attribute agreement, only defined for matched entries where both
    // sides carry a value
    pub fuel_match: Option<bool>,
    pub status_match: Option<bool>,
    pub province_match: Option<bool>,
}
