//! Optimizers for [`crate::scheduling::model::ProblemInstance`]s.

mod branch_and_bound;
mod difference_graph;
mod optimizer;

pub use branch_and_bound::BranchAndBound;
pub use optimizer::{Optimizer, SearchBudget, SearchStats, SolveStatus, SolverResult};
