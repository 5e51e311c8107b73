//! Unit tests for af-world.

use af_core::{DVec3, DayPhase, IVec3};

use crate::{Block, PlayerRef, Tag, VoxelWorld, VoxelWorldBuilder, WorldOracle};

const GRASS: Tag = Tag::new("grass_block");

fn patch() -> VoxelWorld {
    VoxelWorldBuilder::new()
        .fill(IVec3::new(-2, 63, -2), IVec3::new(2, 63, 2), Block::full(GRASS))
        .build()
}

#[cfg(test)]
mod blocks {
    use super::*;

    #[test]
    fn absent_cells_are_air() {
        let world = patch();
        assert!(world.is_air(IVec3::new(0, 64, 0)));
        assert!(!world.is_air(IVec3::new(0, 63, 0)));
        assert_eq!(world.ground_tag(IVec3::new(0, 64, 0)), None);
        assert_eq!(world.ground_tag(IVec3::new(0, 63, 0)), Some(GRASS));
    }

    #[test]
    fn solidity_and_sturdiness_follow_block_kind() {
        let world = VoxelWorldBuilder::new()
            .block(IVec3::ZERO, Block::thin(Tag::new("oak_fence")))
            .block(IVec3::X, Block::passable(Tag::new("short_grass")))
            .build();
        assert!(world.is_solid(IVec3::ZERO));
        assert!(!world.top_face_sturdy(IVec3::ZERO));
        assert!(!world.is_solid(IVec3::X));
        assert!(!world.is_air(IVec3::X));
    }
}

#[cfg(test)]
mod heightmap {
    use super::*;

    #[test]
    fn tracks_column_top() {
        let mut world = patch();
        assert_eq!(world.heightmap_top(0, 0), 63);
        world.set_block(IVec3::new(0, 70, 0), Block::full(Tag::new("oak_leaves")));
        assert_eq!(world.heightmap_top(0, 0), 70);
        world.clear_block(IVec3::new(0, 70, 0));
        assert_eq!(world.heightmap_top(0, 0), 63);
    }

    #[test]
    fn empty_column_is_below_min_y() {
        let world = patch();
        assert_eq!(world.heightmap_top(50, 50), world.min_y() - 1);
    }
}

#[cfg(test)]
mod environment {
    use super::*;

    #[test]
    fn defaults() {
        let world = patch();
        assert_eq!(world.light_level(IVec3::new(0, 64, 0)), 15);
        assert_eq!(world.sea_level(), 62);
        assert!(!world.is_raining());
        assert_eq!(world.day_phase(), DayPhase::Day);
        assert!(world.biome_matches(IVec3::ZERO, &Tag::new("overworld")));
        assert!(!world.biome_matches(IVec3::ZERO, &Tag::new("nether")));
    }

    #[test]
    fn light_override() {
        let cell = IVec3::new(0, 64, 0);
        let world = VoxelWorldBuilder::new().light(12).light_at(cell, 3).build();
        assert_eq!(world.light_level(cell), 3);
        assert_eq!(world.light_level(IVec3::ONE), 12);
    }

    #[test]
    fn camera_follows_first_participating_player() {
        let mut spectator = PlayerRef::spectator(DVec3::ZERO);
        spectator.yaw_degrees = 10.0;
        let mut player = PlayerRef::new(DVec3::ZERO);
        player.yaw_degrees = 90.0;
        let world = VoxelWorldBuilder::new().player(spectator).player(player).build();
        assert_eq!(world.camera_yaw(), Some(90.0));
        assert_eq!(world.players().len(), 2);
    }

    #[test]
    fn night_after_half_day() {
        let mut world = patch();
        world.set_day_time(13_000);
        assert_eq!(world.day_phase(), DayPhase::Night);
    }
}
