use af_core::SpeciesId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SpawnError {
    #[error("spawn spec for {species} is invalid: {reason}")]
    InvalidSpec { species: SpeciesId, reason: String },

    #[error("{0} already has a spawn spec")]
    DuplicateSpecies(SpeciesId),

    #[error("spawn spec refers to {0}, which is not in the species catalog")]
    UnknownSpecies(SpeciesId),

    #[error("invalid spawner settings: {0}")]
    InvalidSettings(String),
}

pub type SpawnResult<T> = Result<T, SpawnError>;
