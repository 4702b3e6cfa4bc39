//! Error types for ingestion, pricing and solving.

use std::fmt;

/// A malformed or missing value on a single record or pair.
///
/// Never fatal for a whole request: the affected record or pair is marked
/// infeasible and the rest of the matrix is still built.
#[derive(Debug, Clone, PartialEq)]
pub enum InvalidInput {
    MissingField { field: &'static str },
    NotNumeric { field: &'static str, value: String },
    OutOfRange { field: &'static str, value: f64 },
    Timestamp { field: &'static str, value: String },
    NegativeDistance(f64),
    TimeOverflow,
    NonFiniteCost,
}

impl fmt::Display for InvalidInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvalidInput::MissingField { field } => write!(f, "missing required field `{}`", field),
            InvalidInput::NotNumeric { field, value } => {
                write!(f, "field `{}` is not a number: {:?}", field, value)
            }
            InvalidInput::OutOfRange { field, value } => {
                write!(f, "field `{}` is out of range: {}", field, value)
            }
            InvalidInput::Timestamp { field, value } => write!(
                f,
                "field `{}` is not a `YYYY-MM-DD HH:MM:SS` timestamp: {:?}",
                field, value
            ),
            InvalidInput::NegativeDistance(d) => write!(f, "negative distance: {}", d),
            InvalidInput::TimeOverflow => write!(f, "projected time is out of range"),
            InvalidInput::NonFiniteCost => write!(f, "cost is not a finite number"),
        }
    }
}

impl std::error::Error for InvalidInput {}

/// Request-level failures. Any of these aborts the whole computation.
#[derive(Debug, Clone, PartialEq)]
pub enum AssignmentError {
    InvalidConfig(String),
    MatrixTooLarge { rows: usize, cols: usize, max_cells: usize },
    MalformedMatrix(String),
    CostOverflow { sentinel: f64, dimension: usize },
    SolverFailure(String),
}

impl fmt::Display for AssignmentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssignmentError::InvalidConfig(msg) => write!(f, "invalid configuration: {}", msg),
            AssignmentError::MatrixTooLarge { rows, cols, max_cells } => write!(
                f,
                "cost matrix {}x{} exceeds the limit of {} cells",
                rows, cols, max_cells
            ),
            AssignmentError::MalformedMatrix(msg) => write!(f, "malformed cost matrix: {}", msg),
            AssignmentError::CostOverflow { sentinel, dimension } => write!(
                f,
                "sentinel {} is too large for a {}x{} assignment",
                sentinel, dimension, dimension
            ),
            AssignmentError::SolverFailure(msg) => write!(f, "assignment solver failed: {}", msg),
        }
    }
}

impl std::error::Error for AssignmentError {}
