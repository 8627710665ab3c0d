use hm_building::BuildingError;
use hm_core::CoreError;
use hm_grid::GridError;
use hm_task::TaskError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(String),

    #[error("{what} length {got} does not match agent count {expected}")]
    AgentCountMismatch {
        expected: usize,
        got:      usize,
        what:     &'static str,
    },

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("grid error: {0}")]
    Grid(#[from] GridError),

    #[error("building error: {0}")]
    Building(#[from] BuildingError),

    #[error("task error: {0}")]
    Task(#[from] TaskError),
}

pub type SimResult<T> = Result<T, SimError>;
