use af_agent::AgentError;
use af_spawn::SpawnError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config names species {0:?}, which is not registered")]
    UnknownSpecies(String),

    #[error("invalid config value: {0}")]
    Invalid(String),

    #[error(transparent)]
    Agent(#[from] AgentError),

    #[error(transparent)]
    Spawn(#[from] SpawnError),
}

pub type ConfigResult<T> = Result<T, ConfigError>;
