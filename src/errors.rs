use crate::agents::errors::AgentError;

use config::ConfigError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Agent(#[from] AgentError),

    #[error("I/O error while writing report: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize summary to JSON: {0}")]
    Serialization(#[from] serde_json::Error),
}
