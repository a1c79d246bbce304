use thiserror::Error;

/// Errors raised while building, generating, or analyzing a workflow.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WorkflowError {
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("duplicate task id '{0}'")]
    DuplicateTask(String),

    #[error("dependency {from} -> {to} references unknown task '{missing}'")]
    UnknownEndpoint {
        from: String,
        to: String,
        missing: String,
    },

    #[error("workflow graph contains a cycle through task '{task}'")]
    CyclicGraph { task: String },
}

impl WorkflowError {
    pub fn invalid(message: impl Into<String>) -> Self {
        WorkflowError::InvalidParameter(message.into())
    }
}

pub type WorkflowResult<T> = Result<T, WorkflowError>;
