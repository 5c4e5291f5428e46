//! Globally optimal one-to-one reconciliation.
//!
//! The problem is solved as a square assignment of size `n + m`. Rows are
//! the `n` records of A followed by one "unmatched" row per record of B;
//! columns are the `m` records of B followed by one "unmatched" column per
//! record of A:
//!
//! ```text
//!              B_0 .. B_m-1      skip A_0 .. skip A_n-1
//! A_i          pair cost         dummy on the diagonal, else forbidden
//! skip B_j     dummy if j matches, else forbidden     0
//! ```
//!
//! A minimum-cost perfect assignment of this matrix is exactly a set of
//! pairs plus unmatched records minimising
//! `sum(pair costs) + dummy_cost * (unmatched A + unmatched B)`.
//! Costs are converted to fixed-point integers (micro-units) before solving.

use pathfinding::prelude::{kuhn_munkres_min, Matrix};
use thiserror::Error;

use crate::core::outcome::Outcome;
use crate::core::record::Record;
use crate::matching::engine::{MatchError, Matcher, ReconcileOptions};
use crate::matching::scoring::{classify_pair, pair_cost};

/// Fixed-point units per unit of cost
const COST_SCALE: f64 = 1_000_000.0;

/// Largest fixed-point cell value accepted before solving
const MAX_FIXED_COST: f64 = 1.0e15;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolverError {
    #[error("Cost of pairing A[{index_a}] with B[{index_b}] is not finite")]
    NonFiniteCost { index_a: usize, index_b: usize },

    #[error("Cost {cost} is too large for the assignment solver")]
    CostOutOfRange { cost: f64 },

    #[error("Assignment solver returned an invalid solution: {0}")]
    InvalidAssignment(String),
}

/// Matcher that minimises the total cost of pairs plus unmatched records
#[derive(Debug, Clone, Copy, Default)]
pub struct OptimalMatcher;

impl Matcher for OptimalMatcher {
    fn name(&self) -> &'static str {
        "optimal"
    }

    fn reconcile(
        &self,
        a: &[Record],
        b: &[Record],
        options: &ReconcileOptions,
    ) -> Result<Vec<Outcome>, MatchError> {
        options.validate()?;

        if a.is_empty() || b.is_empty() {
            tracing::debug!("One side is empty, skipping the solver");
            return Ok(all_unmatched(a, b));
        }

        let costs = pair_costs(a, b, options)?;
        let assignment = solve(&costs, a.len(), b.len(), options.dummy_cost)?;

        let mut outcomes = Vec::with_capacity(a.len() + b.len());
        for &(i, j) in &assignment.pairs {
            let status = classify_pair(&a[i], &b[j], options);
            outcomes.push(Outcome::pair(i, &a[i], j, &b[j], status));
        }
        outcomes.extend(assignment.unmatched_a.iter().map(|&i| Outcome::only_in_a(i, &a[i])));
        outcomes.extend(assignment.unmatched_b.iter().map(|&j| Outcome::only_in_b(j, &b[j])));

        tracing::debug!(
            pairs = assignment.pairs.len(),
            unmatched_a = assignment.unmatched_a.len(),
            unmatched_b = assignment.unmatched_b.len(),
            total_cost = assignment.total_cost,
            "Optimal assignment found"
        );
        Ok(outcomes)
    }
}

fn all_unmatched(a: &[Record], b: &[Record]) -> Vec<Outcome> {
    a.iter()
        .enumerate()
        .map(|(i, r)| Outcome::only_in_a(i, r))
        .chain(b.iter().enumerate().map(|(j, r)| Outcome::only_in_b(j, r)))
        .collect()
}

/// Row-major `n x m` pair costs
fn pair_costs(
    a: &[Record],
    b: &[Record],
    options: &ReconcileOptions,
) -> Result<Vec<Vec<f64>>, SolverError> {
    a.iter()
        .enumerate()
        .map(|(index_a, ra)| {
            b.iter()
                .enumerate()
                .map(|(index_b, rb)| {
                    let cost = pair_cost(ra, rb, options);
                    if cost.is_finite() {
                        Ok(cost)
                    } else {
                        Err(SolverError::NonFiniteCost { index_a, index_b })
                    }
                })
                .collect()
        })
        .collect()
}

/// Decoded solution of the augmented assignment problem
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Assignment {
    /// `(index_a, index_b)`, ascending by `index_a`
    pub pairs: Vec<(usize, usize)>,
    pub unmatched_a: Vec<usize>,
    pub unmatched_b: Vec<usize>,
    /// Total cost, in cost units
    pub total_cost: f64,
}

fn to_fixed(cost: f64) -> Result<i64, SolverError> {
    let scaled = (cost * COST_SCALE).round();
    if !scaled.is_finite() || !(0.0..=MAX_FIXED_COST).contains(&scaled) {
        return Err(SolverError::CostOutOfRange { cost });
    }
    #[allow(clippy::cast_possible_truncation)]
    Ok(scaled as i64)
}

#[allow(clippy::cast_precision_loss)]
fn from_fixed(value: i64) -> f64 {
    value as f64 / COST_SCALE
}

/// Solve the augmented `(n + m)` assignment for an `n x m` cost matrix.
pub(crate) fn solve(
    costs: &[Vec<f64>],
    n: usize,
    m: usize,
    dummy_cost: f64,
) -> Result<Assignment, SolverError> {
    let size = n + m;
    let dummy = to_fixed(dummy_cost)?;

    let mut fixed = vec![vec![0_i64; m]; n];
    let mut max_cell = dummy;
    for (i, row) in costs.iter().enumerate().take(n) {
        for (j, &cost) in row.iter().enumerate().take(m) {
            if !cost.is_finite() {
                return Err(SolverError::NonFiniteCost { index_a: i, index_b: j });
            }
            let value = to_fixed(cost)?;
            fixed[i][j] = value;
            max_cell = max_cell.max(value);
        }
    }

    // Any assignment that uses a forbidden cell costs more than every
    // assignment that does not
    let forbidden = i64::try_from(size)
        .ok()
        .and_then(|s| max_cell.checked_mul(s))
        .and_then(|v| v.checked_add(1))
        .filter(|v| v.checked_mul(2).is_some())
        .ok_or(SolverError::CostOutOfRange { cost: from_fixed(max_cell) })?;

    let mut matrix = Matrix::new(size, size, forbidden);
    for i in 0..n {
        for j in 0..m {
            matrix[(i, j)] = fixed[i][j];
        }
        matrix[(i, m + i)] = dummy;
    }
    for j in 0..m {
        matrix[(n + j, j)] = dummy;
        for k in 0..n {
            matrix[(n + j, m + k)] = 0;
        }
    }

    let (total, columns) = kuhn_munkres_min(&matrix);
    decode(&columns, n, m, &matrix, forbidden).map(|(pairs, unmatched_a, unmatched_b)| {
        Assignment {
            pairs,
            unmatched_a,
            unmatched_b,
            total_cost: from_fixed(total),
        }
    })
}

type Decoded = (Vec<(usize, usize)>, Vec<usize>, Vec<usize>);

fn decode(
    columns: &[usize],
    n: usize,
    m: usize,
    matrix: &Matrix<i64>,
    forbidden: i64,
) -> Result<Decoded, SolverError> {
    let size = n + m;
    if columns.len() != size {
        return Err(SolverError::InvalidAssignment(format!(
            "expected {size} rows, got {}",
            columns.len()
        )));
    }

    let mut used = vec![false; size];
    for (row, &col) in columns.iter().enumerate() {
        if col >= size || used[col] {
            return Err(SolverError::InvalidAssignment(format!(
                "row {row} assigned to column {col} twice or out of range"
            )));
        }
        used[col] = true;
        if matrix[(row, col)] == forbidden {
            return Err(SolverError::InvalidAssignment(format!(
                "row {row} assigned to forbidden column {col}"
            )));
        }
    }

    let mut pairs = Vec::new();
    let mut unmatched_a = Vec::new();
    for (i, &col) in columns.iter().enumerate().take(n) {
        if col < m {
            pairs.push((i, col));
        } else {
            unmatched_a.push(i);
        }
    }

    let unmatched_b: Vec<usize> = (0..m)
        .filter(|&j| columns[n + j] == j)
        .collect();

    if pairs.len() + unmatched_b.len() != m || pairs.len() + unmatched_a.len() != n {
        return Err(SolverError::InvalidAssignment(
            "solution does not cover every record exactly once".to_string(),
        ));
    }

    Ok((pairs, unmatched_a, unmatched_b))
}
