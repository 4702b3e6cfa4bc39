//! Engine configuration.

use serde::{Deserialize, Serialize};

use crate::error::AssignmentError;

/// How a (resource, task) pair is priced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CostMode {
    /// Distance and waiting cost, gated by the task's availability window.
    #[default]
    TimeWindowed,
    /// Plain kilometres; windows and prices are ignored.
    DistanceOnly,
}

/// Tuning for one assignment request. Missing fields take their defaults
/// when deserialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssignmentConfig {
    /// Nominal travel speed in km/h.
    pub standard_speed: f64,
    /// Cost placed on infeasible cells. Must exceed the total of any feasible
    /// matching for the pair count to take priority over cost.
    pub infeasibility_sentinel: f64,
    pub mode: CostMode,
    /// Upper bound on rows * cols; larger requests are rejected. The solver
    /// never pads, so this bounds its memory too.
    pub max_cells: usize,
    /// Matrices with at least this many cells are populated in parallel.
    pub parallel_threshold: usize,
}

impl Default for AssignmentConfig {
    fn default() -> Self {
        Self {
            standard_speed: 73.0,
            infeasibility_sentinel: 1e6,
            mode: CostMode::TimeWindowed,
            max_cells: 250_000, // 500 x 500
            parallel_threshold: 4_096,
        }
    }
}

impl AssignmentConfig {
    pub fn validate(&self) -> Result<(), AssignmentError> {
        if !self.standard_speed.is_finite() || self.standard_speed <= 0.0 {
            return Err(AssignmentError::InvalidConfig(format!(
                "standard_speed must be a positive number, got {}",
                self.standard_speed
            )));
        }
        if !self.infeasibility_sentinel.is_finite() || self.infeasibility_sentinel <= 0.0 {
            return Err(AssignmentError::InvalidConfig(format!(
                "infeasibility_sentinel must be a positive number, got {}",
                self.infeasibility_sentinel
            )));
        }
        if self.max_cells == 0 {
            return Err(AssignmentError::InvalidConfig(
                "max_cells must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Reject requests whose matrix would exceed `max_cells`.
    pub fn check_dimensions(&self, rows: usize, cols: usize) -> Result<(), AssignmentError> {
        let too_large = rows
            .checked_mul(cols)
            .is_none_or(|cells| cells > self.max_cells);
        if too_large {
            return Err(AssignmentError::MatrixTooLarge {
                rows,
                cols,
                max_cells: self.max_cells,
            });
        }
        Ok(())
    }
}
