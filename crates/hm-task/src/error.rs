use thiserror::Error;

use hm_core::AgentId;

#[derive(Debug, Error)]
pub enum TaskError {
    #[error("task configuration error: {0}")]
    Config(String),

    #[error("agent {0} has no worker")]
    NoWorker(AgentId),

    #[error("agent {0} already has a worker")]
    DuplicateWorker(AgentId),
}

pub type TaskResult<T> = Result<T, TaskError>;
