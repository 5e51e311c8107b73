//! `af-core` — foundational types for the atmospheric fauna simulation.
//!
//! This crate is a dependency of every other `af-*` crate.  It has no `af-*`
//! dependencies and few external ones (`glam`, `rand`, `slotmap`, plus
//! optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`ids`]         | `AgentId` (generational), `SpeciesId`, `WorldId`      |
//! | [`space`]       | cell lookup, horizontal clamps, guarded normalization |
//! | [`time`]        | `Tick`, `DayPhase`                                    |
//! | [`rng`]         | `AgentRng` (per-agent), `SimRng` (spawner / global)   |
//! | [`lifecycle`]   | `LifecycleState` enum                                 |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to the plain-data types.    |

pub mod ids;
pub mod lifecycle;
pub mod rng;
pub mod space;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use glam::{DVec3, IVec3};
pub use ids::{AgentId, SpeciesId, WorldId};
pub use lifecycle::LifecycleState;
pub use rng::{AgentRng, SimRng};
pub use time::{DayPhase, Tick};
