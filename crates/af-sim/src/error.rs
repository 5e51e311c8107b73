use af_agent::AgentError;
use af_config::ConfigError;
use af_core::SpeciesId;
use af_spawn::SpawnError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(String),

    #[error("behavior registered for {0}, which is not in the species catalog")]
    UnknownSpecies(SpeciesId),

    #[error(transparent)]
    Agent(#[from] AgentError),

    #[error(transparent)]
    Spawn(#[from] SpawnError),

    #[error(transparent)]
    ConfigFile(#[from] ConfigError),
}

pub type SimResult<T> = Result<T, SimError>;
