use crate::error::WorkflowError;
use crate::task::{Dependency, Task};
use std::collections::HashSet;

fn check_amount(value: f64, what: &str, owner: &str) -> Result<(), WorkflowError> {
    if !value.is_finite() || value < 0.0 {
        return Err(WorkflowError::invalid(format!(
            "{owner} has invalid {what} {value} (must be finite and non-negative)"
        )));
    }
    Ok(())
}

pub fn validate_task(task: &Task) -> Result<(), WorkflowError> {
    if task.id.trim().is_empty() {
        return Err(WorkflowError::invalid("task id must not be empty"));
    }
    check_amount(
        task.execution_time,
        "execution_time",
        &format!("task {}", task.id),
    )
}

pub fn validate_dependency(dependency: &Dependency) -> Result<(), WorkflowError> {
    check_amount(
        dependency.data_amount,
        "data_amount",
        &format!("dependency {} -> {}", dependency.source, dependency.target),
    )
}

pub fn validate_task_collection(tasks: &[Task]) -> Result<(), WorkflowError> {
    let mut seen_ids = HashSet::with_capacity(tasks.len());
    for task in tasks {
        if !seen_ids.insert(task.id.as_str()) {
            return Err(WorkflowError::DuplicateTask(task.id.clone()));
        }
        validate_task(task)?;
    }
    Ok(())
}

pub fn validate_transfer_rate(transfer_rate: f64) -> Result<(), WorkflowError> {
    if !transfer_rate.is_finite() || transfer_rate <= 0.0 {
        return Err(WorkflowError::invalid(format!(
            "transfer rate {transfer_rate} must be finite and positive"
        )));
    }
    Ok(())
}
