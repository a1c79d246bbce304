use serde::{Deserialize, Serialize};

/// A unit of work in a workflow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    /// Execution duration in abstract time units. Must be finite and non-negative.
    pub execution_time: f64,
}

impl Task {
    pub fn new(id: impl Into<String>, execution_time: f64) -> Self {
        Self {
            id: id.into(),
            execution_time,
        }
    }
}

/// A data dependency: `target` may start only after `source` finishes and
/// (in transfer-weighted analysis) after `data_amount` has been moved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dependency {
    pub source: String,
    pub target: String,
    pub data_amount: f64,
}

impl Dependency {
    pub fn new(source: impl Into<String>, target: impl Into<String>, data_amount: f64) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            data_amount,
        }
    }

    /// Time needed to move this dependency's data at `transfer_rate` units per
    /// time unit. A non-positive rate yields zero.
    pub fn transfer_time(&self, transfer_rate: f64) -> f64 {
        if transfer_rate <= 0.0 {
            return 0.0;
        }
        self.data_amount / transfer_rate
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transfer_time_divides_by_rate() {
        let dep = Dependency::new("A", "B", 20.0);
        assert_eq!(dep.transfer_time(10.0), 2.0);
    }

    #[test]
    fn transfer_time_is_zero_for_non_positive_rate() {
        let dep = Dependency::new("A", "B", 20.0);
        assert_eq!(dep.transfer_time(0.0), 0.0);
        assert_eq!(dep.transfer_time(-4.0), 0.0);
    }
}
