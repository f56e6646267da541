//! The preemptable query engine of RDF Sage.
//!
//! Queries are evaluated under a wall-clock quota. If the quota expires before a query completes,
//! the state of its plan is saved and handed to the caller as a
//! [ContinuationToken](rdf_sage_physical::ContinuationToken). Resuming the query from the token
//! continues exactly where the previous invocation stopped.
//!
//! - [SageQuery] is the supported query fragment, parsed from SPARQL or built programmatically.
//! - [PlanBuilder] turns queries into trees of preemptable operators.
//! - [SageEngine] and [QueryExecution] drive a plan under the quota.
//! - [SageDataset] bundles everything for serving paginated queries.

mod config;
mod dataset;
mod engine;
mod planner;
pub mod sparql;

pub use config::{SageConfig, DEFAULT_QUOTA, DEFAULT_YIELD_EVERY};
pub use dataset::{ExecutionStats, QueryPage, SageDataset};
pub use engine::{
    execute, ExecutionOutcome, ExecutionState, QueryExecution, SageEngine, StepOutcome,
};
pub use planner::PlanBuilder;
pub use rdf_sage_physical::operator::UnionMode;
pub use sparql::{QueryEvaluationError, SageQuery};
