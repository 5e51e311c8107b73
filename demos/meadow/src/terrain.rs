//! A small hand-built meadow: open grass, a copse of oaks and a fence line.

use af_core::{DVec3, IVec3};
use af_world::{Block, Tag, VoxelWorld, VoxelWorldBuilder};

/// Half the side length of the grass square.
pub const EXTENT: i32 = 64;

/// Ground surface Y; the grass top face sits at `GROUND_Y + 1`.
pub const GROUND_Y: i32 = 63;

const TREES: [(i32, i32); 6] = [(-12, 8), (-9, 14), (-16, 15), (20, -18), (24, -11), (30, 25)];

pub fn build_meadow() -> VoxelWorld {
    let mut builder = VoxelWorldBuilder::new()
        .fill(
            IVec3::new(-EXTENT, GROUND_Y, -EXTENT),
            IVec3::new(EXTENT, GROUND_Y, EXTENT),
            Block::full(Tag::new("grass_block")),
        )
        .fill(
            IVec3::new(-EXTENT, GROUND_Y - 3, -EXTENT),
            IVec3::new(EXTENT, GROUND_Y - 1, EXTENT),
            Block::full(Tag::new("dirt")),
        )
        // Fence along the lane.
        .fill(
            IVec3::new(-30, GROUND_Y + 1, -4),
            IVec3::new(10, GROUND_Y + 1, -4),
            Block::thin(Tag::new("oak_fence")),
        )
        // A rocky outcrop crows will not spawn on.
        .fill(
            IVec3::new(36, GROUND_Y + 1, 36),
            IVec3::new(42, GROUND_Y + 2, 42),
            Block::full(Tag::new("stone")),
        )
        .player_at(DVec3::new(0.5, GROUND_Y as f64 + 1.0, 0.5));

    for (x, z) in TREES {
        builder = oak(builder, x, z);
    }
    builder.build()
}

/// A five-block trunk under a 3×3×2 canopy.
fn oak(builder: VoxelWorldBuilder, x: i32, z: i32) -> VoxelWorldBuilder {
    let top = GROUND_Y + 5;
    builder
        .fill(
            IVec3::new(x, GROUND_Y + 1, z),
            IVec3::new(x, top, z),
            Block::full(Tag::new("oak_log")),
        )
        .fill(
            IVec3::new(x - 1, top + 1, z - 1),
            IVec3::new(x + 1, top + 2, z + 1),
            Block::full(Tag::new("oak_leaves")),
        )
}
