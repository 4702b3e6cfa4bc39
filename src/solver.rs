//! Optimal assignment over a cost matrix (Kuhn-Munkres).
//!
//! `pathfinding`'s Hungarian implementation maximizes integer weights and
//! needs rows <= columns, so costs are scaled to micro-units, negated, and the
//! matrix is transposed when there are more resources than tasks. Every row of
//! that view is matched; rows that land on a sentinel cell are dropped, so the
//! result may cover fewer than `min(rows, cols)` pairs.

use pathfinding::kuhn_munkres::{Weights, kuhn_munkres};
use tracing::{debug, debug_span, warn};

use crate::error::AssignmentError;
use crate::matrix::CostMatrix;

/// Scale factor from f64 cost to i64 weight.
const SCALE: f64 = 1_000_000.0;

/// Keeps the algorithm's potentials and the matching total clear of i64 overflow.
const MAX_SAFE_WEIGHT_SUM: f64 = (i64::MAX / 4) as f64;

/// Negated integer view of a [`CostMatrix`], oriented so rows <= columns.
struct ScaledWeights {
    rows: usize,
    cols: usize,
    /// Rows are tasks and columns are resources.
    transposed: bool,
    weights: Vec<i64>,
}

impl ScaledWeights {
    fn from_matrix(matrix: &CostMatrix) -> Result<Self, AssignmentError> {
        let transposed = matrix.rows() > matrix.cols();
        let (rows, cols) = if transposed {
            (matrix.cols(), matrix.rows())
        } else {
            (matrix.rows(), matrix.cols())
        };

        let sentinel = matrix.sentinel();
        let sentinel_weight = (sentinel * SCALE).round();
        if sentinel_weight * ((rows + cols) as f64 + 2.0) >= MAX_SAFE_WEIGHT_SUM {
            return Err(AssignmentError::CostOverflow {
                sentinel,
                dimension: cols,
            });
        }

        let mut weights = Vec::with_capacity(rows * cols);
        for row in 0..rows {
            for col in 0..cols {
                let (i, j) = if transposed { (col, row) } else { (row, col) };
                let cost = matrix.at(i, j);
                if !(0.0..=sentinel).contains(&cost) {
                    return Err(AssignmentError::MalformedMatrix(format!(
                        "cell ({}, {}) holds {}, outside [0, {}]",
                        i, j, cost, sentinel
                    )));
                }
                weights.push(-((cost * SCALE).round() as i64));
            }
        }

        Ok(Self {
            rows,
            cols,
            transposed,
            weights,
        })
    }

    /// Map a (row, col) of this view back to (resource, task).
    fn original(&self, row: usize, col: usize) -> (usize, usize) {
        if self.transposed { (col, row) } else { (row, col) }
    }
}

impl Weights<i64> for ScaledWeights {
    fn rows(&self) -> usize {
        self.rows
    }

    fn columns(&self) -> usize {
        self.cols
    }

    fn at(&self, row: usize, col: usize) -> i64 {
        self.weights[row * self.cols + col]
    }

    fn neg(&self) -> Self {
        ScaledWeights {
            rows: self.rows,
            cols: self.cols,
            transposed: self.transposed,
            weights: self.weights.iter().map(|w| w.saturating_neg()).collect(),
        }
    }
}

/// Minimum-total-cost matching of rows (resources) to columns (tasks).
///
/// Returns `(row, col)` pairs sorted by row. Every pair is feasible; rows
/// and columns appear at most once. Identical matrices give identical output.
pub fn solve(matrix: &CostMatrix) -> Result<Vec<(usize, usize)>, AssignmentError> {
    let _span = debug_span!("solve_assignment", rows = matrix.rows(), cols = matrix.cols()).entered();

    if matrix.is_empty() || matrix.feasible_count() == 0 {
        debug!("no feasible pairs; nothing to assign");
        return Ok(Vec::new());
    }

    if !matrix.sentinel_dominates() {
        warn!(
            sentinel = matrix.sentinel(),
            "feasible totals can reach the sentinel; fewer pairs may be traded for lower cost"
        );
    }

    let weights = ScaledWeights::from_matrix(matrix)?;
    debug!(
        rows = weights.rows,
        cols = weights.cols,
        transposed = weights.transposed,
        "weights scaled"
    );

    let (_total, assignment) = kuhn_munkres(&weights);
    check_assignment(&assignment, weights.rows, weights.cols)?;

    let mut pairs: Vec<(usize, usize)> = assignment
        .into_iter()
        .enumerate()
        .map(|(row, col)| weights.original(row, col))
        .filter(|&(row, col)| matrix.is_feasible(row, col))
        .collect();
    pairs.sort_unstable();

    debug!(assigned = pairs.len(), "assignment solved");
    Ok(pairs)
}

/// Sum of the cells selected by `pairs`.
pub fn total_cost(matrix: &CostMatrix, pairs: &[(usize, usize)]) -> f64 {
    pairs.iter().map(|&(row, col)| matrix.at(row, col)).sum()
}

fn check_assignment(assignment: &[usize], rows: usize, cols: usize) -> Result<(), AssignmentError> {
    if assignment.len() != rows {
        return Err(AssignmentError::SolverFailure(format!(
            "expected {} assignments, got {}",
            rows,
            assignment.len()
        )));
    }
    let mut seen = vec![false; cols];
    for (row, &col) in assignment.iter().enumerate() {
        if col >= cols || seen[col] {
            return Err(AssignmentError::SolverFailure(format!(
                "row {} mapped to invalid or repeated column {}",
                row, col
            )));
        }
        seen[col] = true;
    }
    Ok(())
}
