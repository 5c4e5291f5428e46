use crate::core::outcome::{Outcome, ReconciliationEntry};
use crate::core::record::Record;
use crate::core::types::{MatchStatus, MatchType};
use crate::matching::engine::{reconcile, MatchError, MatcherKind, ReconcileOptions};
use crate::matching::scoring::within_tolerance;

/// Map a matcher status to the match type recorded on an entry.
///
/// `capacity_difference` only matters for `Matched`, which becomes
/// `ExactCapacityDiff` when the known difference exceeds the tolerance.
#[must_use]
pub fn match_type_for(
    status: MatchStatus,
    capacity_difference: Option<f64>,
    capacity_tolerance: f64,
) -> MatchType {
    match status {
        MatchStatus::Matched if within_tolerance(capacity_difference, capacity_tolerance) => {
            MatchType::Exact
        }
        MatchStatus::Matched => MatchType::ExactCapacityDiff,
        MatchStatus::MatchedFuzzy => MatchType::Fuzzy,
        MatchStatus::MatchedFuzzyDiff => MatchType::FuzzyCapacityDiff,
        MatchStatus::Mismatched => MatchType::Mismatched,
        MatchStatus::OnlyInA => MatchType::ReferenceOnly,
        MatchStatus::OnlyInB => MatchType::SystemOnly,
    }
}

/// Agreement of one attribute, defined only when both sides carry a value
fn attribute_match(reference: Option<&str>, system: Option<&str>) -> Option<bool> {
    match (reference, system) {
        (Some(r), Some(s)) if !r.is_empty() && !s.is_empty() => Some(r == s),
        _ => None,
    }
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10_f64.powi(decimals);
    (value * factor).round() / factor
}

/// Relative capacity difference in percent, when the reference is positive
fn capacity_diff_pct(reference: Option<f64>, system: Option<f64>) -> Option<f64> {
    match (reference, system) {
        (Some(r), Some(s)) if r > 0.0 => Some(round_to((s - r).abs() / r * 100.0, 1)),
        _ => None,
    }
}

/// Build one reconciliation entry per outcome.
///
/// Collection A of the outcomes is the reference and collection B the
/// system under evaluation. Province, fuel and status are looked up from
/// the records through the outcome indices.
#[must_use]
pub fn build_entries(
    outcomes: &[Outcome],
    reference: &[Record],
    system: &[Record],
    capacity_tolerance: f64,
) -> Vec<ReconciliationEntry> {
    outcomes
        .iter()
        .map(|outcome| {
            let ref_record = outcome.index_a.and_then(|i| reference.get(i));
            let sys_record = outcome.index_b.and_then(|j| system.get(j));

            let match_type = match_type_for(
                outcome.status,
                outcome.capacity_difference,
                capacity_tolerance,
            );

            let province = |r: Option<&Record>| r.and_then(|r| r.province_clean.clone());
            let fuel = |r: Option<&Record>| r.and_then(|r| r.fuel_clean.clone());
            let status = |r: Option<&Record>| r.and_then(|r| r.status_clean.clone());

            let mut entry = ReconciliationEntry {
                reference_name: outcome.name_file_a.clone(),
                system_name: outcome.name_file_b.clone(),
                reference_province: province(ref_record),
                system_province: province(sys_record),
                reference_fuel: fuel(ref_record),
                system_fuel: fuel(sys_record),
                reference_status: status(ref_record),
                system_status: status(sys_record),
                reference_capacity_mwe: outcome.capacity_file_a,
                system_capacity_mwe: outcome.capacity_file_b,
                capacity_diff: outcome.capacity_difference,
                capacity_diff_pct: capacity_diff_pct(
                    outcome.capacity_file_a,
                    outcome.capacity_file_b,
                ),
                match_type,
                fuel_match: None,
                status_match: None,
                province_match: None,
            };

            if match_type.is_matched() {
                entry.fuel_match =
                    attribute_match(entry.reference_fuel.as_deref(), entry.system_fuel.as_deref());
                entry.status_match = attribute_match(
                    entry.reference_status.as_deref(),
                    entry.system_status.as_deref(),
                );
                entry.province_match = attribute_match(
                    entry.reference_province.as_deref(),
                    entry.system_province.as_deref(),
                );
            }
            entry
        })
        .collect()
}

/// Reconcile a system inventory against a reference and build its entries.
///
/// # Errors
///
/// Propagates the matcher's `MatchError`.
pub fn reconcile_entries(
    kind: MatcherKind,
    reference: &[Record],
    system: &[Record],
    options: &ReconcileOptions,
) -> Result<Vec<ReconciliationEntry>, MatchError> {
    let outcomes = reconcile(kind, reference, system, options)?;
    Ok(build_entries(
        &outcomes,
        reference,
        system,
        options.capacity_tolerance,
    ))
}
