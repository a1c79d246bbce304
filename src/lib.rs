pub mod calculations;
pub mod config;
pub mod error;
pub mod generator;
pub mod graph;
#[cfg(feature = "http_api")]
pub mod http_api;
#[cfg(any(feature = "cli", feature = "http_api"))]
pub mod logging;
pub mod persistence;
pub mod schedule;
pub mod task;
pub mod task_validation;

pub use calculations::{CostModel, EPSILON};
pub use config::{AnalysisConfig, AnalysisMode};
pub use error::{WorkflowError, WorkflowResult};
pub use generator::{GeneratorParams, WorkflowGenerator};
pub use graph::{EdgeId, WorkflowGraph};
pub use schedule::{CpmAnalyzer, PlacementHints, Schedule, ScheduleSummary};
pub use task::{Dependency, Task};
