//! `af-config` — the JSON configuration file.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                        |
//! |-------------|-----------------------------------------------------------------|
//! | [`config`]  | `FaunaConfig` and its sections; mapping onto catalog and spawner |
//! | [`partial`] | `PartialFaunaConfig` (all fields optional), `merge`, `Merged`   |
//! | [`loader`]  | `load_config_*`, `save_config_*`                                |
//! | [`error`]   | `ConfigError`, `ConfigResult`                                   |
//!
//! # Missing fields
//!
//! Files written by older versions may lack newer options.  Loading fills
//! every missing field from the defaults, flags the result dirty, and
//! [`load_config_file`] then rewrites the file so it lists every option.

pub mod config;
pub mod error;
pub mod loader;
pub mod partial;

#[cfg(test)]
mod tests;

pub use config::{DebugConfig, FaunaConfig, PopulationConfig, SpawningConfig, SpeciesConfig};
pub use error::{ConfigError, ConfigResult};
pub use loader::{load_config_file, load_config_reader, save_config_file, save_config_writer};
pub use partial::{Merged, PartialFaunaConfig, merge};
