//! Solver-agnostic description of the capture scheduling problem.

mod constraint;
mod model_builder;
mod problem_instance;
mod variable;

pub use constraint::{Comparison, LinearConstraint};
pub use model_builder::{RequestVars, ScheduleModel, ScheduleModelBuilder};
pub use problem_instance::{Assignment, ConstraintViolation, ModelError, ProblemInstance};
pub use variable::{BoolVar, IntDomain, IntVar, Literal, Term};
