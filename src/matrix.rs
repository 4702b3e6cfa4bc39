//! Feasibility-aware cost matrix.
//!
//! Rows are resources, columns are tasks. Every cell holds either the pair's
//! total cost or the infeasibility sentinel; the sentinel is a large finite
//! number so the solver can run plain arithmetic over a dense grid. Feasible
//! cells keep their [`CostEntry`], infeasible cells keep the reason.

use std::collections::HashMap;
use std::fmt;

use rayon::prelude::*;
use tracing::{debug, debug_span, warn};

use crate::config::{AssignmentConfig, CostMode};
use crate::cost::{CostEntry, TemporalCostModel};
use crate::error::{AssignmentError, InvalidInput};
use crate::haversine::Haversine;
use crate::model::{Checked, Resource, Task, Timestamp};
use crate::traits::DistanceProvider;

/// Why a (resource, task) cell holds the sentinel.
#[derive(Debug, Clone, PartialEq)]
pub enum Infeasibility {
    /// The vehicle would arrive after the cargo window closes.
    WindowClosed {
        pickup_time: Timestamp,
        available_to: Timestamp,
    },
    /// The task's window closes before it opens.
    InvertedWindow,
    InvalidResource(InvalidInput),
    InvalidTask(InvalidInput),
    InvalidPair(InvalidInput),
    /// Priced at or above the sentinel; the sentinel is configured too low.
    CostAboveSentinel(f64),
}

impl fmt::Display for Infeasibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Infeasibility::WindowClosed {
                pickup_time,
                available_to,
            } => write!(
                f,
                "pickup at {} is after the window closes at {}",
                pickup_time, available_to
            ),
            Infeasibility::InvertedWindow => write!(f, "availability window ends before it starts"),
            Infeasibility::InvalidResource(err) => write!(f, "invalid resource: {}", err),
            Infeasibility::InvalidTask(err) => write!(f, "invalid task: {}", err),
            Infeasibility::InvalidPair(err) => write!(f, "invalid pair: {}", err),
            Infeasibility::CostAboveSentinel(cost) => {
                write!(f, "cost {} is not below the infeasibility sentinel", cost)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CostMatrix {
    rows: usize,
    cols: usize,
    sentinel: f64,
    /// Row-major.
    cells: Vec<f64>,
    entries: HashMap<(usize, usize), CostEntry>,
    rejections: HashMap<(usize, usize), Infeasibility>,
}

impl CostMatrix {
    /// Build a bare matrix from raw costs, without diagnostics.
    ///
    /// NaN, infinite values and values at or above `sentinel` are stored as
    /// the sentinel. Rows must all have the same length and costs must not be
    /// negative.
    pub fn from_rows(rows: Vec<Vec<f64>>, sentinel: f64) -> Result<Self, AssignmentError> {
        if !sentinel.is_finite() || sentinel <= 0.0 {
            return Err(AssignmentError::InvalidConfig(format!(
                "infeasibility_sentinel must be a positive number, got {}",
                sentinel
            )));
        }
        let cols = rows.first().map_or(0, |r| r.len());
        if let Some(bad) = rows.iter().position(|r| r.len() != cols) {
            return Err(AssignmentError::MalformedMatrix(format!(
                "row {} has {} columns, expected {}",
                bad,
                rows[bad].len(),
                cols
            )));
        }
        for (i, row) in rows.iter().enumerate() {
            if let Some(j) = row.iter().position(|&v| v < 0.0) {
                return Err(AssignmentError::MalformedMatrix(format!(
                    "cell ({}, {}) holds negative cost {}",
                    i, j, row[j]
                )));
            }
        }
        let n_rows = rows.len();
        let cells = rows
            .into_iter()
            .flatten()
            .map(|v| if v.is_finite() && v < sentinel { v } else { sentinel })
            .collect();

        Ok(Self {
            rows: n_rows,
            cols,
            sentinel,
            cells,
            entries: HashMap::new(),
            rejections: HashMap::new(),
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn sentinel(&self) -> f64 {
        self.sentinel
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0 || self.cols == 0
    }

    /// Cell value; the sentinel for infeasible pairs.
    pub fn at(&self, row: usize, col: usize) -> f64 {
        self.cells[row * self.cols + col]
    }

    pub fn is_feasible(&self, row: usize, col: usize) -> bool {
        self.at(row, col) < self.sentinel
    }

    pub fn entry(&self, row: usize, col: usize) -> Option<&CostEntry> {
        self.entries.get(&(row, col))
    }

    pub fn infeasibility(&self, row: usize, col: usize) -> Option<&Infeasibility> {
        self.rejections.get(&(row, col))
    }

    pub fn entries(&self) -> &HashMap<(usize, usize), CostEntry> {
        &self.entries
    }

    pub fn feasible_count(&self) -> usize {
        self.cells.iter().filter(|&&v| v < self.sentinel).count()
    }

    /// True when the sentinel exceeds the total of any matching of feasible
    /// cells. Only then does the solver maximize the number of pairs before
    /// minimizing cost.
    pub fn sentinel_dominates(&self) -> bool {
        let largest = self
            .cells
            .iter()
            .copied()
            .filter(|&v| v < self.sentinel)
            .fold(0.0, f64::max);
        largest * (self.rows.min(self.cols) as f64) < self.sentinel
    }
}

/// Populates a [`CostMatrix`] from ingested resources and tasks.
#[derive(Debug, Clone)]
pub struct CostMatrixBuilder<D = Haversine> {
    model: TemporalCostModel,
    distance: D,
    sentinel: f64,
    parallel_threshold: usize,
}

impl CostMatrixBuilder<Haversine> {
    pub fn new(config: &AssignmentConfig) -> Self {
        Self {
            model: TemporalCostModel::from_config(config),
            distance: Haversine,
            sentinel: config.infeasibility_sentinel,
            parallel_threshold: config.parallel_threshold,
        }
    }
}

impl<D: DistanceProvider> CostMatrixBuilder<D> {
    pub fn with_distance_provider<P: DistanceProvider>(self, distance: P) -> CostMatrixBuilder<P> {
        CostMatrixBuilder {
            model: self.model,
            distance,
            sentinel: self.sentinel,
            parallel_threshold: self.parallel_threshold,
        }
    }

    pub fn model(&self) -> &TemporalCostModel {
        &self.model
    }

    /// Price every (resource, task) pair.
    ///
    /// Always returns a complete `resources.len() x tasks.len()` matrix.
    /// Failed records make their whole row or column infeasible.
    pub fn build(&self, resources: &[Checked<Resource>], tasks: &[Checked<Task>]) -> CostMatrix {
        let rows = resources.len();
        let cols = tasks.len();
        let _span = debug_span!("build_cost_matrix", rows, cols).entered();

        let evaluated: Vec<Vec<Result<CostEntry, Infeasibility>>> =
            if rows.saturating_mul(cols) >= self.parallel_threshold {
                resources
                    .par_iter()
                    .map(|resource| self.evaluate_row(resource, tasks))
                    .collect()
            } else {
                resources
                    .iter()
                    .map(|resource| self.evaluate_row(resource, tasks))
                    .collect()
            };

        let mut cells = Vec::with_capacity(rows * cols);
        let mut entries = HashMap::new();
        let mut rejections = HashMap::new();

        for (i, row) in evaluated.into_iter().enumerate() {
            for (j, cell) in row.into_iter().enumerate() {
                match cell {
                    Ok(entry) => {
                        cells.push(entry.total_cost);
                        entries.insert((i, j), entry);
                    }
                    Err(reason) => {
                        if let Infeasibility::CostAboveSentinel(cost) = reason {
                            warn!(
                                resource = i,
                                task = j,
                                cost,
                                sentinel = self.sentinel,
                                "pair cost reaches the infeasibility sentinel; treating as infeasible"
                            );
                        }
                        cells.push(self.sentinel);
                        rejections.insert((i, j), reason);
                    }
                }
            }
        }

        debug!(
            feasible = entries.len(),
            infeasible = rejections.len(),
            "cost matrix built"
        );

        CostMatrix {
            rows,
            cols,
            sentinel: self.sentinel,
            cells,
            entries,
            rejections,
        }
    }

    fn evaluate_row(
        &self,
        resource: &Checked<Resource>,
        tasks: &[Checked<Task>],
    ) -> Vec<Result<CostEntry, Infeasibility>> {
        tasks.iter().map(|task| self.evaluate(resource, task)).collect()
    }

    fn evaluate(
        &self,
        resource: &Checked<Resource>,
        task: &Checked<Task>,
    ) -> Result<CostEntry, Infeasibility> {
        let resource = resource
            .as_ref()
            .map_err(|err| Infeasibility::InvalidResource(err.clone()))?;
        let task = task
            .as_ref()
            .map_err(|err| Infeasibility::InvalidTask(err.clone()))?;

        let windowed = self.model.mode() == CostMode::TimeWindowed;
        if windowed && !task.has_valid_window() {
            return Err(Infeasibility::InvertedWindow);
        }

        let distance_km = self.distance.distance_km(resource.location, task.location);
        let entry = self
            .model
            .price(resource, task, distance_km)
            .map_err(Infeasibility::InvalidPair)?;

        if let (true, Some(pickup_time)) = (windowed, entry.pickup_time) {
            let available_to = task.available_to.ok_or(Infeasibility::InvalidTask(
                InvalidInput::MissingField {
                    field: "available_to",
                },
            ))?;
            if pickup_time > available_to {
                return Err(Infeasibility::WindowClosed {
                    pickup_time,
                    available_to,
                });
            }
        }
        if entry.total_cost >= self.sentinel {
            return Err(Infeasibility::CostAboveSentinel(entry.total_cost));
        }
        Ok(entry)
    }
}
