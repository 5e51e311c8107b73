//! `af-spawn` — weighted ambient pack spawning.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                      |
//! |-------------|---------------------------------------------------------------|
//! | [`spec`]    | `SpawnSpec` (per-species rules), `SpawnTable` (weighted draw) |
//! | [`site`]    | `SiteCheck`: ground validation, column search, snapping      |
//! | [`spawner`] | `AmbientSpawner`, `SpawnerSettings`, `SpawnOutcome`           |
//! | [`error`]   | `SpawnError`, `SpawnResult`                                   |
//!
//! # A spawn round
//!
//! 1. Draw a species by weight.  All weights zero → nothing happens.
//! 2. Give up early if the registry's headroom is below the minimum pack,
//!    the weather or time of day is wrong, or no player is in the world.
//! 3. For each attempt pick a player and a search center on the annulus
//!    around them, then look for a valid ground column near the center.
//! 4. The first anchor found gets a pack: members are scattered up to two
//!    blocks around it and snapped onto nearby ground.  Partial packs are
//!    accepted and the round ends.
//!
//! Search failures are never errors; the next round simply tries again.

pub mod error;
pub mod site;
pub mod spawner;
pub mod spec;

#[cfg(test)]
mod tests;

pub use error::{SpawnError, SpawnResult};
pub use site::{SiteCheck, SiteRejection};
pub use spawner::{AmbientSpawner, Rejection, SpawnContext, SpawnOutcome, SpawnerSettings, pack_size};
pub use spec::{SpawnSpec, SpawnTable};
