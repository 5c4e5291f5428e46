use std::io::Write;
use std::path::Path;

use serde::Serialize;

use crate::core::outcome::{Outcome, ReconciliationEntry};
use crate::core::record::Record;
use crate::matching::outcome_label;
use crate::metrics::BenchmarkMetrics;

const NOT_AVAILABLE: &str = "N/A";

/// Column headers of the reconciliation results table
pub const OUTCOME_HEADERS: [&str; 8] = [
    "Province",
    "Fuel",
    "Name (File A)",
    "Name (File B)",
    "Capacity (File A)",
    "Capacity (File B)",
    "Difference (MW)",
    "Status",
];

fn or_na(value: Option<&str>) -> String {
    value.map_or_else(|| NOT_AVAILABLE.to_string(), ToString::to_string)
}

fn number_or_na(value: Option<f64>) -> String {
    value.map_or_else(|| NOT_AVAILABLE.to_string(), |v| v.to_string())
}

/// One human-readable row per outcome.
///
/// Province and fuel come from the A record when there is one, otherwise
/// from the B record. The status column uses [`outcome_label`].
#[must_use]
pub fn outcome_row(
    outcome: &Outcome,
    a: &[Record],
    b: &[Record],
    capacity_tolerance: f64,
) -> [String; 8] {
    let record = outcome
        .index_a
        .and_then(|i| a.get(i))
        .or_else(|| outcome.index_b.and_then(|j| b.get(j)));

    [
        or_na(record.and_then(|r| r.province_clean.as_deref())),
        or_na(record.and_then(|r| r.fuel_clean.as_deref())),
        or_na(outcome.name_file_a.as_deref()),
        or_na(outcome.name_file_b.as_deref()),
        number_or_na(outcome.capacity_file_a),
        number_or_na(outcome.capacity_file_b),
        number_or_na(outcome.capacity_difference),
        outcome_label(outcome, capacity_tolerance).to_string(),
    ]
}

/// Write the reconciliation results table as CSV
///
/// # Errors
///
/// Returns a `csv::Error` if writing fails.
pub fn write_outcomes<W: Write>(
    writer: W,
    outcomes: &[Outcome],
    a: &[Record],
    b: &[Record],
    capacity_tolerance: f64,
) -> Result<(), csv::Error> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(OUTCOME_HEADERS)?;
    for outcome in outcomes {
        wtr.write_record(outcome_row(outcome, a, b, capacity_tolerance))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write reconciliation entries as CSV, one column per entry field
///
/// # Errors
///
/// Returns a `csv::Error` if serialization or writing fails.
pub fn write_entries<W: Write>(
    writer: W,
    entries: &[ReconciliationEntry],
) -> Result<(), csv::Error> {
    let mut wtr = csv::Writer::from_writer(writer);
    for entry in entries {
        wtr.serialize(entry)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Metrics of one evaluated file, as written to JSON
#[derive(Debug, Clone, Serialize)]
pub struct LabeledMetrics<'a> {
    pub label: String,
    pub matcher: &'a str,
    pub generated_at: String,
    #[serde(flatten)]
    pub metrics: &'a BenchmarkMetrics,
}

impl<'a> LabeledMetrics<'a> {
    #[must_use]
    pub fn new(label: impl Into<String>, matcher: &'a str, metrics: &'a BenchmarkMetrics) -> Self {
        Self {
            label: label.into(),
            matcher,
            generated_at: chrono::Utc::now().to_rfc3339(),
            metrics,
        }
    }
}

/// Create `path`'s parent directory if needed and write pretty JSON
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> anyhow::Result<()> {
    create_parent(path)?;
    let json = serde_json::to_string_pretty(value)?;
    std::fs::write(path, json)?;
    tracing::info!(path = %path.display(), "Wrote JSON");
    Ok(())
}

/// Create `path`'s parent directory if needed and open it for writing
pub fn create_file(path: &Path) -> anyhow::Result<std::fs::File> {
    create_parent(path)?;
    Ok(std::fs::File::create(path)?)
}

fn create_parent(path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{MatchStatus, MatchType};
    use crate::metrics::{build_entries, compute_metrics};

    fn records() -> (Vec<Record>, Vec<Record>) {
        let a = vec![
            Record::new("Plant A", "plant a", Some(100.0))
                .with_province("ha tinh")
                .with_fuel("coal"),
            Record::new("Plant C", "plant c", None).with_province("dong nai"),
        ];
        let b = vec![Record::new("Plant A Inc", "plant a inc", Some(104.5)).with_fuel("coal")];
        (a, b)
    }

    #[test]
    fn test_outcome_row() {
        let (a, b) = records();
        let pair = Outcome::pair(0, &a[0], 0, &b[0], MatchStatus::MatchedFuzzy);
        assert_eq!(
            outcome_row(&pair, &a, &b, 0.0),
            [
                "ha tinh",
                "coal",
                "Plant A",
                "Plant A Inc",
                "100",
                "104.5",
                "-4.5",
                "Matched (Fuzzy)"
            ]
        );

        let only_b = Outcome::only_in_b(0, &b[0]);
        let row = outcome_row(&only_b, &a, &b, 0.0);
        assert_eq!(row[0], "N/A");
        assert_eq!(row[1], "coal");
        assert_eq!(row[2], "N/A");
        assert_eq!(row[7], "Only in B");
    }

    #[test]
    fn test_outcome_row_labels_exact_pair_with_capacity_difference() {
        let a = vec![Record::new("Song Hau 1", "song hau 1", Some(1200.0))];
        let b = vec![Record::new("Song Hau I", "song hau 1", Some(1180.0))];
        let pair = Outcome::pair(0, &a[0], 0, &b[0], MatchStatus::Matched);

        let row = outcome_row(&pair, &a, &b, 0.0);
        assert_eq!(row[6], "20");
        assert_eq!(row[7], "Matched (Diff)");
        assert_eq!(outcome_row(&pair, &a, &b, 25.0)[7], "Matched");
    }

    #[test]
    fn test_write_outcomes() {
        let (a, b) = records();
        let outcomes = vec![
            Outcome::pair(0, &a[0], 0, &b[0], MatchStatus::MatchedFuzzy),
            Outcome::only_in_a(1, &a[1]),
        ];
        let mut buf = Vec::new();
        write_outcomes(&mut buf, &outcomes, &a, &b, 0.0).unwrap();
        let text = String::from_utf8(buf).unwrap();

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[0],
            "Province,Fuel,Name (File A),Name (File B),Capacity (File A),Capacity (File B),Difference (MW),Status"
        );
        assert_eq!(lines[2], "dong nai,N/A,Plant C,N/A,N/A,N/A,N/A,Only in A");
    }

    #[test]
    fn test_write_entries() {
        let (a, b) = records();
        let outcomes = vec![
            Outcome::pair(0, &a[0], 0, &b[0], MatchStatus::MatchedFuzzy),
            Outcome::only_in_a(1, &a[1]),
        ];
        let entries = build_entries(&outcomes, &a, &b, 10.0);
        let mut buf = Vec::new();
        write_entries(&mut buf, &entries).unwrap();
        let text = String::from_utf8(buf).unwrap();

        assert!(text.lines().next().unwrap().starts_with("reference_name,system_name,"));
        assert!(text.contains(MatchType::Fuzzy.as_str()));
        assert!(text.contains(MatchType::ReferenceOnly.as_str()));
    }

    #[test]
    fn test_write_json_creates_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("metrics.json");
        let metrics = compute_metrics(&[]);

        write_json(&path, &LabeledMetrics::new("run/system", "optimal", &metrics)).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["label"], "run/system");
        assert_eq!(value["matcher"], "optimal");
        assert_eq!(value["n_reference"], 0);
        assert!(value["generated_at"].is_string());
    }
}
