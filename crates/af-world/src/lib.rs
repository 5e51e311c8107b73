//! `af-world` — the read-only world query surface the simulation consumes.
//!
//! # Crate layout
//!
//! | Module     | Contents                                                     |
//! |------------|--------------------------------------------------------------|
//! | [`oracle`] | `WorldOracle` trait, `PlayerRef`, `Tag`                      |
//! | [`voxel`]  | `VoxelWorld` (hash-map backed), `VoxelWorldBuilder`, `Block` |
//!
//! The host game implements [`WorldOracle`] over its real block storage.
//! [`VoxelWorld`] is a small in-memory implementation used by tests and the
//! demo binary.

pub mod oracle;
pub mod voxel;

#[cfg(test)]
mod tests;

pub use oracle::{PlayerRef, Tag, WorldOracle};
pub use voxel::{Block, VoxelWorld, VoxelWorldBuilder};
