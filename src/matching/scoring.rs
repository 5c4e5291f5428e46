use rapidfuzz::fuzz;

use crate::core::record::Record;
use crate::core::types::MatchStatus;
use crate::matching::engine::ReconcileOptions;

/// Base cost of a pair whose cleaned names are byte-identical
pub const EXACT_NAME_COST: f64 = 0.0;

/// Base cost of a pair whose names agree above the similarity threshold
pub const FUZZY_NAME_COST: f64 = 1.0;

/// Substring-tolerant name similarity in `[0, 100]`.
///
/// The shorter string is aligned against every window of the longer string
/// with the same length, including windows clipped at either edge, and the
/// best Indel-normalized similarity is returned. Extra tokens on the longer
/// side therefore cost nothing: `"plant a"` scores 100 against
/// `"plant a incorporated"`.
///
/// Two empty strings score 100; one empty string scores 0.
///
/// # Examples
///
/// ```
/// use plant_recon::matching::scoring::partial_ratio;
///
/// assert_eq!(partial_ratio("plant a", "plant a incorporated"), 100.0);
/// assert!(partial_ratio("vung ang", "song hau") < 90.0);
/// ```
#[must_use]
pub fn partial_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    if a.is_empty() || b.is_empty() {
        return if a.is_empty() && b.is_empty() { 100.0 } else { 0.0 };
    }

    // With equal lengths either string can serve as the needle
    if a.len() == b.len() {
        return best_window_ratio(&a, &b).max(best_window_ratio(&b, &a));
    }

    if a.len() < b.len() {
        best_window_ratio(&a, &b)
    } else {
        best_window_ratio(&b, &a)
    }
}

/// Best ratio of `needle` against the windows of `haystack` (`needle.len() <= haystack.len()`).
fn best_window_ratio(needle: &[char], haystack: &[char]) -> f64 {
    let n = needle.len();
    let m = haystack.len();

    let leading = (1..n).map(|end| &haystack[..end]);
    let full = (0..=m - n).map(|start| &haystack[start..start + n]);
    let trailing = (m - n + 1..m).map(|start| &haystack[start..]);

    let mut best = 0.0_f64;
    for window in leading.chain(full).chain(trailing) {
        best = best.max(ratio(needle, window));
        if best >= 100.0 {
            break;
        }
    }
    best
}

/// Indel-normalized similarity of two char slices, scaled to `[0, 100]`
fn ratio(a: &[char], b: &[char]) -> f64 {
    fuzz::ratio(a.iter().copied(), b.iter().copied()) * 100.0
}

/// Name similarity of two records
#[must_use]
pub fn name_similarity(a: &Record, b: &Record) -> f64 {
    partial_ratio(&a.name_clean, &b.name_clean)
}

/// Base cost of pairing two records, from their names alone.
///
/// `0` for identical cleaned names, `1` when the similarity reaches the
/// threshold, `mismatch_penalty` otherwise.
#[must_use]
pub fn base_cost(a: &Record, b: &Record, options: &ReconcileOptions) -> f64 {
    if a.name_clean == b.name_clean {
        EXACT_NAME_COST
    } else if name_similarity(a, b) >= options.threshold() {
        FUZZY_NAME_COST
    } else {
        options.mismatch_penalty
    }
}

/// Combined cost of pairing two records.
///
/// `base_cost + capacity_weight * |capacity_a - capacity_b|`. When either
/// capacity is unknown the capacity term is left out.
#[must_use]
pub fn pair_cost(a: &Record, b: &Record, options: &ReconcileOptions) -> f64 {
    let capacity_term = a
        .capacity_difference(b)
        .map_or(0.0, |diff| options.capacity_weight * diff.abs());
    base_cost(a, b, options) + capacity_term
}

/// Whether a capacity difference is within tolerance.
///
/// An unknown difference is never flagged as exceeding the tolerance.
#[must_use]
pub fn within_tolerance(diff: Option<f64>, tolerance: f64) -> bool {
    diff.map_or(true, |d| d.abs() <= tolerance)
}

/// Status of a fuzzy-accepted pair, from its capacity difference
#[must_use]
pub fn fuzzy_status(diff: Option<f64>, tolerance: f64) -> MatchStatus {
    if within_tolerance(diff, tolerance) {
        MatchStatus::MatchedFuzzy
    } else {
        MatchStatus::MatchedFuzzyDiff
    }
}

/// Classify a pair chosen by a matcher.
///
/// Identical names give `Matched`; otherwise the similarity decides between
/// the fuzzy statuses and `Mismatched`.
#[must_use]
pub fn classify_pair(a: &Record, b: &Record, options: &ReconcileOptions) -> MatchStatus {
    if a.name_clean == b.name_clean {
        return MatchStatus::Matched;
    }
    if name_similarity(a, b) >= options.threshold() {
        fuzzy_status(a.capacity_difference(b), options.capacity_tolerance)
    } else {
        MatchStatus::Mismatched
    }
}
