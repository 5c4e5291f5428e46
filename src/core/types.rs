use serde::{Deserialize, Serialize};

/// Classification of one assignment slot produced by a matcher
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchStatus {
    /// Cleaned names are identical
    #[serde(rename = "Matched")]
    Matched,
    /// Names agree above the similarity threshold, capacity within tolerance
    #[serde(rename = "Matched (Fuzzy)")]
    MatchedFuzzy,
    /// Names agree above the similarity threshold, capacity outside tolerance
    #[serde(rename = "Matched (Fuzzy) (Diff)")]
    MatchedFuzzyDiff,
    /// Paired by the solver even though names are below the threshold
    #[serde(rename = "Mismatched")]
    Mismatched,
    #[serde(rename = "Only in A")]
    OnlyInA,
    #[serde(rename = "Only in B")]
    OnlyInB,
}

impl MatchStatus {
    /// Human-readable label used in reports and CSV exports
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Matched => "Matched",
            Self::MatchedFuzzy => "Matched (Fuzzy)",
            Self::MatchedFuzzyDiff => "Matched (Fuzzy) (Diff)",
            Self::Mismatched => "Mismatched",
            Self::OnlyInA => "Only in A",
            Self::OnlyInB => "Only in B",
        }
    }

    /// True for every status that pairs a record of A with a record of B
    #[must_use]
    pub fn is_pair(self) -> bool {
        !matches!(self, Self::OnlyInA | Self::OnlyInB)
    }
}

impl std::fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Match type recorded on a reconciliation entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchType {
    Exact,
    ExactCapacityDiff,
    Fuzzy,
    FuzzyCapacityDiff,
    /// Paired by the solver but the names do not agree
    Mismatched,
    /// Present only in the system output (hallucinated)
    SystemOnly,
    /// Present only in the reference (missed)
    ReferenceOnly,
}

impl MatchType {
    /// True when the entry counts as a found reference plant
    #[must_use]
    pub fn is_matched(self) -> bool {
        matches!(
            self,
            Self::Exact | Self::ExactCapacityDiff | Self::Fuzzy | Self::FuzzyCapacityDiff
        )
    }

    #[must_use]
    pub fn is_exact(self) -> bool {
        matches!(self, Self::Exact | Self::ExactCapacityDiff)
    }

    #[must_use]
    pub fn is_fuzzy(self) -> bool {
        matches!(self, Self::Fuzzy | Self::FuzzyCapacityDiff)
    }

    #[must_use]
    pub fn has_capacity_diff(self) -> bool {
        matches!(self, Self::ExactCapacityDiff | Self::FuzzyCapacityDiff)
    }

    /// Wire name, as used in exported tables
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Exact => "exact",
            Self::ExactCapacityDiff => "exact_capacity_diff",
            Self::Fuzzy => "fuzzy",
            Self::FuzzyCapacityDiff => "fuzzy_capacity_diff",
            Self::Mismatched => "mismatched",
            Self::SystemOnly => "system_only",
            Self::ReferenceOnly => "reference_only",
        }
    }
}

impl std::fmt::Display for MatchType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
