pub mod workflow_graph;

pub use workflow_graph::{EdgeId, WorkflowGraph};
