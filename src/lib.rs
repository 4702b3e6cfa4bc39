//! haul-match core
//!
//! Matches vehicles finishing a delivery to cargo awaiting pickup, minimizing
//! total distance and waiting cost subject to cargo availability windows.

pub mod config;
pub mod cost;
pub mod error;
pub mod haversine;
pub mod loader;
pub mod matrix;
pub mod model;
pub mod planner;
pub mod solver;
pub mod traits;

pub use config::{AssignmentConfig, CostMode};
pub use cost::{CostEntry, TemporalCostModel};
pub use error::{AssignmentError, InvalidInput};
pub use matrix::{CostMatrix, CostMatrixBuilder, Infeasibility};
pub use model::{Resource, ResourceRecord, Task, TaskRecord};
pub use planner::{AssignedPair, AssignmentResult, AssignmentSummary, compute_assignment};
