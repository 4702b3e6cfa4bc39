//! Assignment entry points: records in, matched pairs and diagnostics out.

use serde::Serialize;
use tracing::info;

use crate::config::AssignmentConfig;
use crate::cost::CostEntry;
use crate::error::AssignmentError;
use crate::matrix::{CostMatrix, CostMatrixBuilder};
use crate::model::{Checked, Resource, ResourceRecord, Task, TaskRecord, ingest_resources, ingest_tasks};
use crate::solver::solve;
use crate::traits::DistanceProvider;

/// One selected (resource, task) pair and its cost breakdown.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssignedPair {
    pub resource_index: usize,
    pub task_index: usize,
    pub resource_id: String,
    pub task_id: String,
    pub cost: CostEntry,
}

/// Aggregates over the selected pairs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssignmentSummary {
    pub resource_count: usize,
    pub task_count: usize,
    pub assignments_made: usize,
    pub total_distance_km: f64,
    pub average_distance_km: f64,
    pub total_distance_cost: f64,
    pub total_waiting_cost: f64,
    pub total_cost: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssignmentResult {
    pub pairs: Vec<AssignedPair>,
    pub unassigned_resources: Vec<usize>,
    pub unassigned_tasks: Vec<usize>,
    /// Full matrix, including infeasibility reasons for rejected cells.
    #[serde(skip)]
    pub matrix: CostMatrix,
}

impl AssignmentResult {
    /// `(resource_index, task_index)` pairs, sorted by resource index.
    pub fn index_pairs(&self) -> Vec<(usize, usize)> {
        self.pairs
            .iter()
            .map(|pair| (pair.resource_index, pair.task_index))
            .collect()
    }

    pub fn total_cost(&self) -> f64 {
        self.pairs.iter().map(|pair| pair.cost.total_cost).sum()
    }

    pub fn summary(&self) -> AssignmentSummary {
        let assignments_made = self.pairs.len();
        let total_distance_km: f64 = self.pairs.iter().map(|p| p.cost.distance_km).sum();
        AssignmentSummary {
            resource_count: self.matrix.rows(),
            task_count: self.matrix.cols(),
            assignments_made,
            total_distance_km,
            average_distance_km: if assignments_made == 0 {
                0.0
            } else {
                total_distance_km / assignments_made as f64
            },
            total_distance_cost: self.pairs.iter().map(|p| p.cost.distance_cost).sum(),
            total_waiting_cost: self.pairs.iter().map(|p| p.cost.waiting_cost).sum(),
            total_cost: self.total_cost(),
        }
    }
}

/// Ingest raw records and compute the minimum-cost assignment.
///
/// Records that fail validation are never assigned; they do not abort the
/// request. Empty inputs give an empty result.
pub fn compute_assignment(
    resources: &[ResourceRecord],
    tasks: &[TaskRecord],
    config: &AssignmentConfig,
) -> Result<AssignmentResult, AssignmentError> {
    // Checked before ingestion so oversized uploads are not parsed.
    config.validate()?;
    config.check_dimensions(resources.len(), tasks.len())?;

    let resources = ingest_resources(resources, config.mode);
    let tasks = ingest_tasks(tasks, config.mode);
    let result = assign(&resources, &tasks, config)?;

    let summary = result.summary();
    info!(
        resources = summary.resource_count,
        tasks = summary.task_count,
        assigned = summary.assignments_made,
        total_cost = summary.total_cost,
        total_distance_km = summary.total_distance_km,
        "assignment computed"
    );
    Ok(result)
}

/// Compute the assignment for already-ingested records, using great-circle
/// distances.
pub fn assign(
    resources: &[Checked<Resource>],
    tasks: &[Checked<Task>],
    config: &AssignmentConfig,
) -> Result<AssignmentResult, AssignmentError> {
    assign_with(resources, tasks, config, CostMatrixBuilder::new(config))
}

/// Like [`assign`], with a caller-supplied distance provider.
pub fn assign_with_distance<D: DistanceProvider>(
    resources: &[Checked<Resource>],
    tasks: &[Checked<Task>],
    config: &AssignmentConfig,
    distance: D,
) -> Result<AssignmentResult, AssignmentError> {
    let builder = CostMatrixBuilder::new(config).with_distance_provider(distance);
    assign_with(resources, tasks, config, builder)
}

fn assign_with<D: DistanceProvider>(
    resources: &[Checked<Resource>],
    tasks: &[Checked<Task>],
    config: &AssignmentConfig,
    builder: CostMatrixBuilder<D>,
) -> Result<AssignmentResult, AssignmentError> {
    config.validate()?;
    config.check_dimensions(resources.len(), tasks.len())?;

    let matrix = builder.build(resources, tasks);
    let index_pairs = solve(&matrix)?;

    let mut pairs = Vec::with_capacity(index_pairs.len());
    for (i, j) in index_pairs {
        let (Some(cost), Ok(resource), Ok(task)) = (matrix.entry(i, j), &resources[i], &tasks[j])
        else {
            return Err(AssignmentError::SolverFailure(format!(
                "solver selected pair ({}, {}) without a cost entry",
                i, j
            )));
        };
        pairs.push(AssignedPair {
            resource_index: i,
            task_index: j,
            resource_id: resource.id.clone(),
            task_id: task.id.clone(),
            cost: cost.clone(),
        });
    }

    let mut resource_used = vec![false; matrix.rows()];
    let mut task_used = vec![false; matrix.cols()];
    for pair in &pairs {
        resource_used[pair.resource_index] = true;
        task_used[pair.task_index] = true;
    }
    let unassigned_resources = unused(&resource_used);
    let unassigned_tasks = unused(&task_used);

    Ok(AssignmentResult {
        pairs,
        unassigned_resources,
        unassigned_tasks,
        matrix,
    })
}

fn unused(used: &[bool]) -> Vec<usize> {
    used.iter()
        .enumerate()
        .filter(|(_, used)| !**used)
        .map(|(index, _)| index)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::InvalidInput;

    #[test]
    fn empty_inputs_are_not_an_error() {
        let config = AssignmentConfig::default();
        let result = compute_assignment(&[], &[], &config).expect("empty result");
        assert!(result.pairs.is_empty());
        assert!(result.unassigned_resources.is_empty());
        assert!(result.unassigned_tasks.is_empty());

        let summary = result.summary();
        assert_eq!(summary.assignments_made, 0);
        assert_eq!(summary.average_distance_km, 0.0);
    }

    #[test]
    fn zero_tasks_leaves_every_resource_unassigned() {
        let config = AssignmentConfig::default();
        let trucks = vec![
            ResourceRecord::new("a", (54.0, 25.0), "2024-03-01 08:00:00", 1.0, 10.0),
            ResourceRecord::new("b", (55.0, 25.0), "2024-03-01 08:00:00", 1.0, 10.0),
        ];
        let result = compute_assignment(&trucks, &[], &config).expect("result");
        assert!(result.pairs.is_empty());
        assert_eq!(result.unassigned_resources, vec![0, 1]);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = AssignmentConfig {
            standard_speed: -5.0,
            ..Default::default()
        };
        assert!(matches!(
            compute_assignment(&[], &[], &config),
            Err(AssignmentError::InvalidConfig(_))
        ));
    }

    #[test]
    fn oversized_request_is_rejected_before_work() {
        let config = AssignmentConfig {
            max_cells: 1,
            ..Default::default()
        };
        let trucks = vec![ResourceRecord::default(); 2];
        let cargo = vec![TaskRecord::default(); 1];
        assert_eq!(
            compute_assignment(&trucks, &cargo, &config),
            Err(AssignmentError::MatrixTooLarge { rows: 2, cols: 1, max_cells: 1 })
        );
    }

    #[test]
    fn malformed_records_are_left_out() {
        let config = AssignmentConfig::default();
        let trucks = vec![
            ResourceRecord::new("broken", (54.0, 25.0), "not a time", 1.0, 10.0),
            ResourceRecord::new("ok", (54.0, 25.0), "2024-03-01 08:00:00", 1.0, 10.0),
        ];
        let cargo = vec![
            TaskRecord::new("c1", (54.1, 25.0), "2024-03-01 08:00:00", "2024-03-01 20:00:00"),
            TaskRecord::new("c2", (54.2, 25.0), "2024-03-01 08:00:00", "2024-03-01 20:00:00"),
        ];
        let result = compute_assignment(&trucks, &cargo, &config).expect("result");
        assert_eq!(result.index_pairs(), vec![(1, 0)]);
        assert_eq!(result.pairs[0].resource_id, "ok");
        assert_eq!(result.pairs[0].task_id, "c1");
        assert_eq!(result.unassigned_resources, vec![0]);
        assert_eq!(result.unassigned_tasks, vec![1]);
        assert!(matches!(
            result.matrix.infeasibility(0, 1),
            Some(crate::matrix::Infeasibility::InvalidResource(InvalidInput::Timestamp { .. }))
        ));
    }

    #[test]
    fn summary_adds_up() {
        let config = AssignmentConfig::default();
        let trucks = vec![
            ResourceRecord::new("a", (0.0, 0.0), "2024-03-01 08:00:00", 2.0, 10.0),
            ResourceRecord::new("b", (1.0, 0.0), "2024-03-01 08:00:00", 2.0, 10.0),
        ];
        let cargo = vec![
            TaskRecord::new("x", (0.0, 0.1), "2024-03-01 09:00:00", "2024-03-01 20:00:00"),
            TaskRecord::new("y", (1.0, 0.1), "2024-03-01 09:00:00", "2024-03-01 20:00:00"),
        ];
        let result = compute_assignment(&trucks, &cargo, &config).expect("result");
        let summary = result.summary();
        assert_eq!(summary.resource_count, 2);
        assert_eq!(summary.task_count, 2);
        assert_eq!(summary.assignments_made, 2);
        assert!(
            (summary.total_distance_cost + summary.total_waiting_cost - summary.total_cost).abs()
                < 1e-9
        );
        assert!((summary.average_distance_km * 2.0 - summary.total_distance_km).abs() < 1e-9);
        assert!(summary.total_waiting_cost > 0.0, "both trucks arrive before 09:00");
    }
}
