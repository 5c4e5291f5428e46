//! End-to-end reconciliation tests
//!
//! These exercise both matchers through the public API: cleaning raw
//! tables, reconciling, and turning the outcomes into benchmark metrics.

use plant_recon::core::types::{MatchStatus, MatchType};
use plant_recon::matching::{
    is_partition, reconcile, reconcile_grouped, MatcherKind, ReconcileOptions,
};
use plant_recon::metrics::{compute_metrics, reconcile_entries};
use plant_recon::normalize::PlantCleaner;
use plant_recon::parsing::table::parse_table_text;
use plant_recon::{Outcome, Record};

const MATCHERS: [MatcherKind; 2] = [MatcherKind::Optimal, MatcherKind::Phased];

fn record(name: &str, capacity: Option<f64>) -> Record {
    Record::new(name, name.to_lowercase(), capacity)
}

fn find<'a>(outcomes: &'a [Outcome], name_a: &str) -> &'a Outcome {
    outcomes
        .iter()
        .find(|o| o.name_file_a.as_deref() == Some(name_a))
        .unwrap_or_else(|| panic!("no outcome for {name_a}"))
}

#[test]
fn test_identical_single_record() {
    for kind in MATCHERS {
        let a = vec![record("Plant A", Some(100.0))];
        let b = vec![record("Plant A", Some(100.0))];
        let outcomes = reconcile(kind, &a, &b, &ReconcileOptions::default()).unwrap();

        assert_eq!(outcomes.len(), 1, "{kind}");
        assert_eq!(outcomes[0].status, MatchStatus::Matched, "{kind}");
        assert_eq!(outcomes[0].capacity_difference, Some(0.0), "{kind}");
    }
}

#[test]
fn test_empty_side() {
    for kind in MATCHERS {
        let records = vec![record("Plant A", Some(100.0)), record("Plant B", None)];
        let options = ReconcileOptions::default();

        let outcomes = reconcile(kind, &records, &[], &options).unwrap();
        assert_eq!(outcomes.len(), 2);
        for outcome in &outcomes {
            assert_eq!(outcome.status, MatchStatus::OnlyInA);
            assert_eq!(outcome.name_file_b, None);
            assert_eq!(outcome.capacity_file_b, None);
        }

        let outcomes = reconcile(kind, &[], &records, &options).unwrap();
        assert_eq!(outcomes.len(), 2);
        for outcome in &outcomes {
            assert_eq!(outcome.status, MatchStatus::OnlyInB);
            assert_eq!(outcome.name_file_a, None);
            assert_eq!(outcome.capacity_file_a, None);
        }
    }
}

#[test]
fn test_fuzzy_pair() {
    for kind in MATCHERS {
        let a = vec![record("plant a", Some(100.0))];
        let b = vec![record("plant a incorporated", Some(100.0))];
        let outcomes = reconcile(kind, &a, &b, &ReconcileOptions::default()).unwrap();

        assert_eq!(outcomes.len(), 1, "{kind}");
        assert_eq!(outcomes[0].status, MatchStatus::MatchedFuzzy, "{kind}");
    }
}

#[test]
fn test_capacity_tolerance_boundary() {
    for kind in MATCHERS {
        let a = vec![record("plant a", Some(100.0))];
        let b = vec![record("plant a incorporated", Some(145.0))];

        let loose = ReconcileOptions {
            capacity_tolerance: 50.0,
            ..ReconcileOptions::default()
        };
        let outcomes = reconcile(kind, &a, &b, &loose).unwrap();
        assert_eq!(outcomes.len(), 1);
        assert_eq!(outcomes[0].status, MatchStatus::MatchedFuzzy, "{kind}");

        let strict = ReconcileOptions {
            capacity_tolerance: 0.0,
            ..ReconcileOptions::default()
        };
        let outcomes = reconcile(kind, &a, &b, &strict).unwrap();
        assert_eq!(outcomes.len(), 1);
        assert_eq!(outcomes[0].status, MatchStatus::MatchedFuzzyDiff, "{kind}");
        assert_eq!(outcomes[0].capacity_difference, Some(-45.0));
    }
}

#[test]
fn test_multi_record_scenario() {
    let options = ReconcileOptions {
        similarity_threshold: 90,
        capacity_tolerance: 10.0,
        mismatch_penalty: 1000.0,
        ..ReconcileOptions::default()
    };
    for kind in MATCHERS {
        let a = vec![record("Plant A", Some(100.0)), record("Plant B", Some(200.0))];
        let b = vec![
            record("Plant A Incorporated", Some(105.0)),
            record("Plant B", Some(200.0)),
        ];
        let outcomes = reconcile(kind, &a, &b, &options).unwrap();
        assert_eq!(outcomes.len(), 2, "{kind}");

        let plant_a = find(&outcomes, "Plant A");
        assert_eq!(plant_a.name_file_b.as_deref(), Some("Plant A Incorporated"));
        assert_eq!(plant_a.status, MatchStatus::MatchedFuzzy, "{kind}");
        assert_eq!(plant_a.capacity_difference, Some(-5.0));

        let plant_b = find(&outcomes, "Plant B");
        assert_eq!(plant_b.name_file_b.as_deref(), Some("Plant B"));
        assert_eq!(plant_b.status, MatchStatus::Matched, "{kind}");
        assert_eq!(plant_b.capacity_difference, Some(0.0));
    }
}

#[test]
fn test_partition_and_determinism() {
    let a: Vec<Record> = [
        ("Vinh Tan 4", Some(1200.0)),
        ("Vinh Tan 4 Extension", Some(600.0)),
        ("Song Hau 1", Some(1200.0)),
        ("Nhon Trach 3", None),
        ("Quang Trach 1", Some(1200.0)),
    ]
    .iter()
    .map(|(n, c)| record(n, *c))
    .collect();
    let b: Vec<Record> = [
        ("Vinh Tan 4", Some(1200.0)),
        ("Song Hau 1", Some(1210.0)),
        ("Nhon Trach 3 LNG", Some(750.0)),
        ("Long An 1", Some(1500.0)),
    ]
    .iter()
    .map(|(n, c)| record(n, *c))
    .collect();

    for kind in MATCHERS {
        let options = ReconcileOptions::default();
        let first = reconcile(kind, &a, &b, &options).unwrap();
        let second = reconcile(kind, &a, &b, &options).unwrap();

        assert!(is_partition(&first, a.len(), b.len()), "{kind}");
        assert_eq!(first, second, "{kind}");
    }
}

#[test]
fn test_optimal_and_phased_can_disagree() {
    // The greedy pass lets "vinh tan" claim the first similar record even
    // though "vinh tan 4" is its exact namesake
    let a = vec![record("vinh tan", Some(600.0)), record("vinh tan 4", Some(600.0))];
    let b = vec![record("vinh tan 4", Some(1200.0)), record("vinh tan 2", Some(600.0))];
    let options = ReconcileOptions::default();

    let phased = reconcile(MatcherKind::Phased, &a, &b, &options).unwrap();
    assert_eq!(find(&phased, "vinh tan").name_file_b.as_deref(), Some("vinh tan 4"));

    let optimal = reconcile(MatcherKind::Optimal, &a, &b, &options).unwrap();
    assert_eq!(find(&optimal, "vinh tan").name_file_b.as_deref(), Some("vinh tan 2"));
    assert_eq!(find(&optimal, "vinh tan 4").name_file_b.as_deref(), Some("vinh tan 4"));
}

#[test]
fn test_grouped_reconciliation_covers_every_record() {
    let cleaner = PlantCleaner::with_defaults().unwrap();
    let a = cleaner
        .clean_table(
            parse_table_text(
                "name,province,fuel,capacity,status\n\
                 Vung Ang I,Ha Tinh,Coal,1200,Operating\n\
                 Nhon Trach 3,Dong Nai,LNG,750,Under construction\n\
                 O Mon IV,Can Tho,Natural Gas,1050,Proposed\n",
            )
            .unwrap(),
        )
        .unwrap();
    let b = cleaner
        .clean_table(
            parse_table_text(
                "name,province,fuel,capacity,status\n\
                 Vung Ang 1 Thermal Power Plant,Ha Tinh Province,coal,1200 MW,operational\n\
                 Nhon Trach 3,Dong Nai,Imported LNG,760,constructing\n\
                 O Mon 4,Can Tho,Gas,1050,announced\n",
            )
            .unwrap(),
        )
        .unwrap();

    for kind in MATCHERS {
        let groups = reconcile_grouped(kind, &a, &b, &ReconcileOptions::default()).unwrap();
        assert_eq!(groups.len(), 3, "{kind}");
        assert!(groups.iter().all(|g| g.counts.only_in_a == 0 && g.counts.only_in_b == 0));

        let outcomes: Vec<Outcome> = groups.into_iter().flat_map(|g| g.outcomes).collect();
        assert!(is_partition(&outcomes, a.len(), b.len()));
        assert!(outcomes.iter().all(|o| o.status.is_pair()));
    }
}

#[test]
fn test_metrics_for_a_full_reference() {
    let reference: Vec<Record> = (1..=163)
        .map(|i| record(&format!("Reference Plant {i:03}"), Some(f64::from(i) * 10.0)))
        .collect();
    let mut system: Vec<Record> = reference.iter().step_by(2).cloned().collect();
    system.push(record("Invented Station", Some(50.0)));

    for kind in MATCHERS {
        let entries =
            reconcile_entries(kind, &reference, &system, &ReconcileOptions::default()).unwrap();
        let m = compute_metrics(&entries);

        assert_eq!(m.n_reference, 163, "{kind}");
        assert_eq!(m.n_matched + m.n_missed, 163, "{kind}");
        assert_eq!(m.n_matched + m.n_hallucinated, system.len(), "{kind}");
        for ratio in [m.coverage, m.precision, m.f1] {
            assert!((0.0..=1.0).contains(&ratio), "{kind}: {ratio}");
        }
    }
}

#[test]
fn test_metrics_with_nothing_matched() {
    let reference = vec![record("Alpha", Some(100.0))];
    let system = vec![record("Zulu", Some(100.0))];
    let options = ReconcileOptions {
        mismatch_penalty: 30_000.0,
        ..ReconcileOptions::default()
    };

    for kind in MATCHERS {
        let entries = reconcile_entries(kind, &reference, &system, &options).unwrap();
        let m = compute_metrics(&entries);
        assert_eq!(m.n_matched, 0);
        assert!(m.coverage.abs() < f64::EPSILON);
        assert!(m.precision.abs() < f64::EPSILON);
        assert!(m.f1.abs() < f64::EPSILON);
    }
}

#[test]
fn test_attribute_errors_are_counted() {
    let cleaner = PlantCleaner::with_defaults().unwrap();
    let reference = cleaner
        .clean_table(
            parse_table_text(
                "name,province,fuel,capacity,status\n\
                 Duyen Hai 3,Tra Vinh,Coal,1245,Operating\n",
            )
            .unwrap(),
        )
        .unwrap();
    let system = cleaner
        .clean_table(
            parse_table_text(
                "name,province,fuel,capacity,status\n\
                 Duyen Hai 3,Tra Vinh,Gas,1000,Cancelled\n",
            )
            .unwrap(),
        )
        .unwrap();

    let entries = reconcile_entries(
        MatcherKind::Optimal,
        &reference,
        &system,
        &ReconcileOptions::default(),
    )
    .unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].match_type, MatchType::ExactCapacityDiff);
    assert_eq!(entries[0].capacity_diff_pct, Some(19.7));

    let m = compute_metrics(&entries);
    assert_eq!(m.errors.wrong_fuel, 1);
    assert_eq!(m.errors.wrong_status, 1);
    assert_eq!(m.errors.wrong_province, 0);
    assert_eq!(m.errors.capacity_mismatch, 1);
    assert_eq!(m.province_accuracy, Some(1.0));
    assert_eq!(m.capacity_match_rate, Some(0.0));
}
