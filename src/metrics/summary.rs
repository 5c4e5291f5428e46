use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::outcome::ReconciliationEntry;
use crate::core::types::MatchType;

/// Named error counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorTaxonomy {
    pub hallucinated_plant: usize,
    pub missed_plant: usize,
    pub wrong_fuel: usize,
    pub wrong_status: usize,
    pub wrong_province: usize,
    pub capacity_mismatch: usize,
}

impl ErrorTaxonomy {
    /// `(name, count)` pairs in report order
    #[must_use]
    pub fn counters(&self) -> [(&'static str, usize); 6] {
        [
            ("hallucinated_plant", self.hallucinated_plant),
            ("missed_plant", self.missed_plant),
            ("wrong_fuel", self.wrong_fuel),
            ("wrong_status", self.wrong_status),
            ("wrong_province", self.wrong_province),
            ("capacity_mismatch", self.capacity_mismatch),
        ]
    }
}

/// Aggregate metrics for one evaluation run
///
/// Ratios are in `[0, 1]` and rounded to four decimals.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkMetrics {
    /// Recall: matched / (matched + missed)
    pub coverage: f64,
    /// matched / (matched + hallucinated)
    pub precision: f64,
    pub f1: f64,

    pub n_reference: usize,
    pub n_system: usize,
    pub n_matched: usize,
    pub n_exact: usize,
    pub n_fuzzy: usize,
    pub n_missed: usize,
    pub n_hallucinated: usize,

    // Attribute accuracy among matched entries with a defined flag
    pub fuel_accuracy: Option<f64>,
    pub status_accuracy: Option<f64>,
    pub province_accuracy: Option<f64>,
    /// Share of matched entries whose capacity is within tolerance
    pub capacity_match_rate: Option<f64>,

    pub errors: ErrorTaxonomy,
}

#[allow(clippy::cast_precision_loss)]
fn count_to_f64(count: usize) -> f64 {
    count as f64
}

fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        count_to_f64(numerator) / count_to_f64(denominator)
    }
}

/// Share of `true` among the defined flags
fn accuracy<'a>(flags: impl Iterator<Item = &'a Option<bool>>) -> Option<f64> {
    let (hits, total) = flags
        .filter_map(|f| *f)
        .fold((0, 0), |(hits, total), ok| (hits + usize::from(ok), total + 1));
    (total > 0).then(|| round4(ratio(hits, total)))
}

/// Compute all metrics from a reconciliation table.
///
/// A `mismatched` entry pairs two records that do not actually agree, so it
/// counts as a missed reference plant and as a hallucinated system plant.
#[must_use]
pub fn compute_metrics(entries: &[ReconciliationEntry]) -> BenchmarkMetrics {
    let matched: Vec<&ReconciliationEntry> =
        entries.iter().filter(|e| e.match_type.is_matched()).collect();
    let count = |t: MatchType| entries.iter().filter(|e| e.match_type == t).count();
    let mismatched = count(MatchType::Mismatched);

    let n_matched = matched.len();
    let n_missed = count(MatchType::ReferenceOnly) + mismatched;
    let n_hallucinated = count(MatchType::SystemOnly) + mismatched;
    let n_reference = n_matched + n_missed;
    let n_system = n_matched + n_hallucinated;

    let coverage = ratio(n_matched, n_reference);
    let precision = ratio(n_matched, n_system);
    let f1 = if coverage + precision > 0.0 {
        2.0 * coverage * precision / (coverage + precision)
    } else {
        0.0
    };

    let capacity_ok = matched
        .iter()
        .filter(|e| !e.match_type.has_capacity_diff())
        .count();

    let errors = ErrorTaxonomy {
        hallucinated_plant: n_hallucinated,
        missed_plant: n_missed,
        wrong_fuel: matched.iter().filter(|e| e.fuel_match == Some(false)).count(),
        wrong_status: matched.iter().filter(|e| e.status_match == Some(false)).count(),
        wrong_province: matched
            .iter()
            .filter(|e| e.province_match == Some(false))
            .count(),
        capacity_mismatch: n_matched - capacity_ok,
    };

    BenchmarkMetrics {
        coverage: round4(coverage),
        precision: round4(precision),
        f1: round4(f1),
        n_reference,
        n_system,
        n_matched,
        n_exact: matched.iter().filter(|e| e.match_type.is_exact()).count(),
        n_fuzzy: matched.iter().filter(|e| e.match_type.is_fuzzy()).count(),
        n_missed,
        n_hallucinated,
        fuel_accuracy: accuracy(matched.iter().map(|e| &e.fuel_match)),
        status_accuracy: accuracy(matched.iter().map(|e| &e.status_match)),
        province_accuracy: accuracy(matched.iter().map(|e| &e.province_match)),
        capacity_match_rate: (n_matched > 0).then(|| round4(ratio(capacity_ok, n_matched))),
        errors,
    }
}

fn percent(value: f64) -> String {
    format!("{:.1}%", value * 100.0)
}

impl fmt::Display for BenchmarkMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Benchmark Metrics ===")?;
        writeln!(f, "Reference plants:    {}", self.n_reference)?;
        writeln!(f, "System plants:       {}", self.n_system)?;
        writeln!(
            f,
            "Matched:             {} (exact: {}, fuzzy: {})",
            self.n_matched, self.n_exact, self.n_fuzzy
        )?;
        writeln!(f, "Missed:              {}", self.n_missed)?;
        writeln!(f, "Hallucinated:        {}", self.n_hallucinated)?;
        writeln!(f)?;
        writeln!(f, "Coverage (recall):   {}", percent(self.coverage))?;
        writeln!(f, "Precision:           {}", percent(self.precision))?;
        writeln!(f, "F1:                  {}", percent(self.f1))?;

        for (label, value) in [
            ("Fuel accuracy:", self.fuel_accuracy),
            ("Status accuracy:", self.status_accuracy),
            ("Province accuracy:", self.province_accuracy),
            ("Capacity match rate:", self.capacity_match_rate),
        ] {
            if let Some(value) = value {
                writeln!(f, "{label:<21}{}", percent(value))?;
            }
        }

        writeln!(f)?;
        writeln!(f, "Error taxonomy:")?;
        for (name, count) in self.errors.counters() {
            writeln!(f, "  {name}: {count}")?;
        }
        Ok(())
    }
}

/// Human-readable summary of a metrics record
#[must_use]
pub fn format_metrics(m: &BenchmarkMetrics) -> String {
    m.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(match_type: MatchType) -> ReconciliationEntry {
        ReconciliationEntry {
            reference_name: Some("ref".to_string()),
            system_name: Some("sys".to_string()),
            reference_province: None,
            system_province: None,
            reference_fuel: None,
            system_fuel: None,
            reference_status: None,
            system_status: None,
            reference_capacity_mwe: None,
            system_capacity_mwe: None,
            capacity_diff: None,
            capacity_diff_pct: None,
            match_type,
            fuel_match: None,
            status_match: None,
            province_match: None,
        }
    }

    fn with_flags(
        mut e: ReconciliationEntry,
        fuel: Option<bool>,
        status: Option<bool>,
    ) -> ReconciliationEntry {
        e.fuel_match = fuel;
        e.status_match = status;
        e
    }

    #[test]
    fn test_compute_metrics_counts_and_ratios() {
        let entries = vec![
            with_flags(entry(MatchType::Exact), Some(true), Some(true)),
            with_flags(entry(MatchType::FuzzyCapacityDiff), Some(false), None),
            entry(MatchType::ReferenceOnly),
            entry(MatchType::ReferenceOnly),
            entry(MatchType::SystemOnly),
        ];
        let m = compute_metrics(&entries);

        assert_eq!(m.n_matched, 2);
        assert_eq!(m.n_exact, 1);
        assert_eq!(m.n_fuzzy, 1);
        assert_eq!(m.n_missed, 2);
        assert_eq!(m.n_hallucinated, 1);
        assert_eq!(m.n_reference, 4);
        assert_eq!(m.n_system, 3);

        assert!((m.coverage - 0.5).abs() < 1e-12);
        assert!((m.precision - 0.6667).abs() < 1e-12);
        assert!((m.f1 - 0.5714).abs() < 1e-12);

        assert_eq!(m.fuel_accuracy, Some(0.5));
        assert_eq!(m.status_accuracy, Some(1.0));
        assert_eq!(m.province_accuracy, None);
        assert_eq!(m.capacity_match_rate, Some(0.5));

        assert_eq!(m.errors.missed_plant, 2);
        assert_eq!(m.errors.hallucinated_plant, 1);
        assert_eq!(m.errors.wrong_fuel, 1);
        assert_eq!(m.errors.wrong_status, 0);
        assert_eq!(m.errors.capacity_mismatch, 1);
    }

    #[test]
    fn test_mismatched_counts_as_missed_and_hallucinated() {
        let entries = vec![entry(MatchType::Exact), entry(MatchType::Mismatched)];
        let m = compute_metrics(&entries);
        assert_eq!(m.n_matched, 1);
        assert_eq!(m.n_missed, 1);
        assert_eq!(m.n_hallucinated, 1);
        assert_eq!(m.n_reference, 2);
        assert_eq!(m.n_system, 2);
        assert!((m.coverage - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_empty_entries() {
        let m = compute_metrics(&[]);
        assert_eq!(m.n_reference, 0);
        assert!(m.coverage.abs() < f64::EPSILON);
        assert!(m.precision.abs() < f64::EPSILON);
        assert!(m.f1.abs() < f64::EPSILON);
        assert_eq!(m.capacity_match_rate, None);
        assert_eq!(m.fuel_accuracy, None);
    }

    #[test]
    fn test_nothing_matched_gives_zero_f1() {
        let entries = vec![entry(MatchType::ReferenceOnly), entry(MatchType::SystemOnly)];
        let m = compute_metrics(&entries);
        assert!(m.f1.abs() < f64::EPSILON);
        assert_eq!(m.n_reference, 1);
        assert_eq!(m.n_system, 1);
    }

    #[test]
    fn test_format_metrics() {
        let entries = vec![
            with_flags(entry(MatchType::Exact), Some(true), None),
            entry(MatchType::ReferenceOnly),
        ];
        let metrics = compute_metrics(&entries);
        let text = format_metrics(&metrics);
        assert_eq!(text, metrics.to_string());

        assert!(text.starts_with("=== Benchmark Metrics ==="));
        assert!(text.contains("Matched:             1 (exact: 1, fuzzy: 0)"));
        assert!(text.contains("Coverage (recall):   50.0%"));
        assert!(text.contains("Precision:           100.0%"));
        assert!(text.contains("Fuel accuracy:       100.0%"));
        assert!(!text.contains("Status accuracy"));
        assert!(text.contains("  missed_plant: 1"));
    }

    #[test]
    fn test_metrics_json_shape() {
        let m = compute_metrics(&[entry(MatchType::Exact)]);
        let json = serde_json::to_value(&m).unwrap();
        assert_eq!(json["n_matched"], 1);
        assert_eq!(json["errors"]["capacity_mismatch"], 0);
        assert!(json["fuel_accuracy"].is_null());
    }
}
