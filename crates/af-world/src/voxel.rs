//! In-memory voxel world and its builder.
//!
//! # Data layout
//!
//! Blocks live in a sparse `HashMap<IVec3, Block>`; every absent cell is air.
//! A second map caches the topmost occupied Y per `(x, z)` column so
//! `heightmap_top` is O(1).  Biome tags apply world-wide; light is uniform
//! with optional per-cell overrides.
//!
//! `VoxelWorld` is mutable between ticks (weather, time, players, blocks) so
//! tests can stage scenarios such as a perch block being broken.

use std::collections::HashMap;

use af_core::{DVec3, DayPhase, IVec3};

use crate::{PlayerRef, Tag, WorldOracle};

// ── Block ─────────────────────────────────────────────────────────────────────

/// One occupied cell.
#[derive(Clone, Debug, PartialEq)]
pub struct Block {
    pub tag: Tag,
    /// Non-empty collision shape.
    pub solid: bool,
    /// Full, load-bearing top face.
    pub sturdy: bool,
}

impl Block {
    /// A full cube (stone, dirt, logs, leaves…).
    pub fn full(tag: Tag) -> Self {
        Self { tag, solid: true, sturdy: true }
    }

    /// A block with collision but no sturdy top (fences, walls, thin panes).
    pub fn thin(tag: Tag) -> Self {
        Self { tag, solid: true, sturdy: false }
    }

    /// A block without collision (tall grass, flowers).
    pub fn passable(tag: Tag) -> Self {
        Self { tag, solid: false, sturdy: false }
    }
}

// ── VoxelWorld ────────────────────────────────────────────────────────────────

/// Hash-map backed [`WorldOracle`].  Build with [`VoxelWorldBuilder`].
pub struct VoxelWorld {
    blocks:       HashMap<IVec3, Block>,
    column_top:   HashMap<(i32, i32), i32>,
    biomes:       Vec<Tag>,
    light:        u8,
    light_at:     HashMap<IVec3, u8>,
    sea_level:    i32,
    min_y:        i32,
    raining:      bool,
    thundering:   bool,
    day_time:     u64,
    players:      Vec<PlayerRef>,
}

impl VoxelWorld {
    /// Place or replace a block.
    pub fn set_block(&mut self, cell: IVec3, block: Block) {
        self.blocks.insert(cell, block);
        let top = self.column_top.entry((cell.x, cell.z)).or_insert(cell.y);
        if cell.y > *top {
            *top = cell.y;
        }
    }

    /// Remove a block, leaving air.  Returns the removed block.
    pub fn clear_block(&mut self, cell: IVec3) -> Option<Block> {
        let removed = self.blocks.remove(&cell)?;
        if self.column_top.get(&(cell.x, cell.z)) == Some(&cell.y) {
            self.recompute_column(cell.x, cell.z);
        }
        Some(removed)
    }

    pub fn block(&self, cell: IVec3) -> Option<&Block> {
        self.blocks.get(&cell)
    }

    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    pub fn set_raining(&mut self, raining: bool) {
        self.raining = raining;
    }

    pub fn set_thundering(&mut self, thundering: bool) {
        self.thundering = thundering;
    }

    pub fn set_day_time(&mut self, day_time: u64) {
        self.day_time = day_time;
    }

    /// Advance the day counter by one tick.
    pub fn advance_time(&mut self) {
        self.day_time += 1;
    }

    pub fn players_mut(&mut self) -> &mut Vec<PlayerRef> {
        &mut self.players
    }

    fn recompute_column(&mut self, x: i32, z: i32) {
        let top = self
            .blocks
            .keys()
            .filter(|c| c.x == x && c.z == z)
            .map(|c| c.y)
            .max();
        match top {
            Some(y) => {
                self.column_top.insert((x, z), y);
            }
            None => {
                self.column_top.remove(&(x, z));
            }
        }
    }
}

impl WorldOracle for VoxelWorld {
    fn is_air(&self, cell: IVec3) -> bool {
        !self.blocks.contains_key(&cell)
    }

    fn is_solid(&self, cell: IVec3) -> bool {
        self.blocks.get(&cell).is_some_and(|b| b.solid)
    }

    fn top_face_sturdy(&self, cell: IVec3) -> bool {
        self.blocks.get(&cell).is_some_and(|b| b.sturdy)
    }

    fn light_level(&self, cell: IVec3) -> u8 {
        self.light_at.get(&cell).copied().unwrap_or(self.light)
    }

    fn biome_matches(&self, _cell: IVec3, biome: &Tag) -> bool {
        self.biomes.contains(biome)
    }

    fn ground_tag(&self, cell: IVec3) -> Option<Tag> {
        self.blocks.get(&cell).map(|b| b.tag.clone())
    }

    fn heightmap_top(&self, x: i32, z: i32) -> i32 {
        self.column_top.get(&(x, z)).copied().unwrap_or(self.min_y - 1)
    }

    fn sea_level(&self) -> i32 {
        self.sea_level
    }

    fn min_y(&self) -> i32 {
        self.min_y
    }

    fn is_raining(&self) -> bool {
        self.raining
    }

    fn is_thundering(&self) -> bool {
        self.thundering
    }

    fn day_phase(&self) -> DayPhase {
        DayPhase::from_day_time(self.day_time)
    }

    fn players(&self) -> Vec<PlayerRef> {
        self.players.clone()
    }

    fn camera_yaw(&self) -> Option<f64> {
        self.players.iter().find(|p| !p.spectator).map(|p| p.yaw_degrees)
    }
}

// ── VoxelWorldBuilder ─────────────────────────────────────────────────────────

/// Fluent builder for [`VoxelWorld`].
///
/// Defaults: biome `"overworld"`, full light (15), sea level 62, minimum Y
/// −64, clear weather, day time 1000 (morning), no players.
///
/// ```rust
/// use af_world::{Block, Tag, VoxelWorldBuilder, WorldOracle};
/// use glam::IVec3;
///
/// let world = VoxelWorldBuilder::new()
///     .fill(IVec3::new(-4, 63, -4), IVec3::new(4, 63, 4), Block::full(Tag::new("grass_block")))
///     .build();
/// assert_eq!(world.heightmap_top(0, 0), 63);
/// ```
pub struct VoxelWorldBuilder {
    world: VoxelWorld,
}

impl VoxelWorldBuilder {
    pub fn new() -> Self {
        Self {
            world: VoxelWorld {
                blocks:     HashMap::new(),
                column_top: HashMap::new(),
                biomes:     vec![Tag::new("overworld")],
                light:      15,
                light_at:   HashMap::new(),
                sea_level:  62,
                min_y:      -64,
                raining:    false,
                thundering: false,
                day_time:   1_000,
                players:    Vec::new(),
            },
        }
    }

    /// Place a single block.
    pub fn block(mut self, cell: IVec3, block: Block) -> Self {
        self.world.set_block(cell, block);
        self
    }

    /// Fill the inclusive box `min..=max` with copies of `block`.
    pub fn fill(mut self, min: IVec3, max: IVec3, block: Block) -> Self {
        for x in min.x..=max.x {
            for y in min.y..=max.y {
                for z in min.z..=max.z {
                    self.world.set_block(IVec3::new(x, y, z), block.clone());
                }
            }
        }
        self
    }

    /// Replace the world-wide biome tags.
    pub fn biomes(mut self, biomes: Vec<Tag>) -> Self {
        self.world.biomes = biomes;
        self
    }

    /// Uniform light level for every cell without an override.
    pub fn light(mut self, level: u8) -> Self {
        self.world.light = level.min(15);
        self
    }

    /// Light override for one cell.
    pub fn light_at(mut self, cell: IVec3, level: u8) -> Self {
        self.world.light_at.insert(cell, level.min(15));
        self
    }

    pub fn sea_level(mut self, y: i32) -> Self {
        self.world.sea_level = y;
        self
    }

    pub fn min_y(mut self, y: i32) -> Self {
        self.world.min_y = y;
        self
    }

    pub fn raining(mut self, raining: bool) -> Self {
        self.world.raining = raining;
        self
    }

    pub fn day_time(mut self, day_time: u64) -> Self {
        self.world.day_time = day_time;
        self
    }

    pub fn player(mut self, player: PlayerRef) -> Self {
        self.world.players.push(player);
        self
    }

    /// Convenience: a non-spectator player standing at `position`.
    pub fn player_at(self, position: DVec3) -> Self {
        self.player(PlayerRef::new(position))
    }

    pub fn build(self) -> VoxelWorld {
        self.world
    }
}

impl Default for VoxelWorldBuilder {
    fn default() -> Self {
        Self::new()
    }
}
