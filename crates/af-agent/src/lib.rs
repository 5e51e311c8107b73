//! `af-agent` — agent state, species data and the shared agent registry.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                   |
//! |--------------|------------------------------------------------------------|
//! | [`agent`]    | `Agent`, `LandingTarget`                                   |
//! | [`species`]  | `SpeciesParams` (tuning data), `SpeciesCatalog`            |
//! | [`pose`]     | `Pose` (facing, flap frame), `flap_period`                 |
//! | [`registry`] | `AgentRegistry` (capped, lock-protected arena), `NeighborView` |
//! | [`index`]    | `FlockIndex` (per-tick R-tree over a neighbor snapshot)    |
//! | [`builder`]  | `AgentFactory` (spawn serials, initial agent state)        |
//! | [`error`]    | `AgentError`, `AgentResult`                                |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on plain-data types.     |

pub mod agent;
pub mod builder;
pub mod error;
pub mod index;
pub mod pose;
pub mod registry;
pub mod species;


pub use agent::{Agent, LandingTarget};
pub use builder::AgentFactory;
pub use error::{AgentError, AgentResult};
pub use index::FlockIndex;
pub use pose::{Pose, flap_period};
pub use registry::{AgentRegistry, NeighborView, RegistryWrite};
pub use species::{SpeciesCatalog, SpeciesParams};
