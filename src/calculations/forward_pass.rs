use crate::calculations::CostModel;
use crate::graph::WorkflowGraph;
use petgraph::Direction;
use petgraph::graph::NodeIndex;
use petgraph::visit::EdgeRef;

/// Earliest start/finish per task, indexed by node index.
pub type EarlyTimes = Vec<(f64, f64)>;

pub struct ForwardPass<'a> {
    graph: &'a WorkflowGraph,
    cost_model: CostModel,
}

impl<'a> ForwardPass<'a> {
    pub fn new(graph: &'a WorkflowGraph, cost_model: CostModel) -> Self {
        Self { graph, cost_model }
    }

    /// Visits `order` front to back. `order` must be topological.
    pub fn execute(&self, order: &[NodeIndex]) -> EarlyTimes {
        let dag = self.graph.inner();
        let mut early: EarlyTimes = vec![(0.0, 0.0); dag.node_count()];

        for &node_ix in order {
            // Early start is the latest arrival over all predecessors
            let early_start = dag
                .edges_directed(node_ix, Direction::Incoming)
                .map(|edge| {
                    let (_, pred_finish) = early[edge.source().index()];
                    pred_finish + self.cost_model.edge_weight(edge.weight())
                })
                .fold(0.0_f64, f64::max);

            let early_finish = early_start + dag[node_ix].execution_time;
            early[node_ix.index()] = (early_start, early_finish);
        }

        early
    }
}

/// Largest early finish, or 0 for an empty graph.
pub fn completion_time(early: &EarlyTimes) -> f64 {
    early.iter().map(|&(_, ef)| ef).fold(0.0_f64, f64::max)
}
