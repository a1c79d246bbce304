pub mod backward_pass;
pub mod critical;
pub mod forward_pass;
pub mod ordering;

use crate::task::Dependency;
use serde::{Deserialize, Serialize};

/// Tolerance used for every slack and timing-tightness comparison.
pub const EPSILON: f64 = 0.001;

/// How a dependency contributes to the schedule.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum CostModel {
    /// Only task durations count.
    Plain,
    /// Each dependency also costs `data_amount / transfer_rate`.
    TransferWeighted { transfer_rate: f64 },
}

impl CostModel {
    pub fn edge_weight(&self, dependency: &Dependency) -> f64 {
        match self {
            CostModel::Plain => 0.0,
            CostModel::TransferWeighted { transfer_rate } => {
                dependency.transfer_time(*transfer_rate)
            }
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CostModel::Plain => "plain",
            CostModel::TransferWeighted { .. } => "transfer",
        }
    }
}

impl Default for CostModel {
    fn default() -> Self {
        CostModel::Plain
    }
}

pub(crate) fn approx_zero(value: f64) -> bool {
    value.abs() < EPSILON
}
