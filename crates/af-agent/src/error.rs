use thiserror::Error;

#[derive(Debug, Error)]
pub enum AgentError {
    #[error("species name {0:?} is already registered")]
    DuplicateSpecies(String),

    #[error("invalid parameters for species {species:?}: {reason}")]
    InvalidParams { species: String, reason: String },
}

pub type AgentResult<T> = Result<T, AgentError>;
