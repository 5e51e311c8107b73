//! Spawn-site validation and the column search around a search center.

use std::fmt;

use af_core::{IVec3, SimRng};
use af_world::WorldOracle;

use crate::SpawnSpec;

/// Vertical probe order when snapping a pack member to nearby ground.
const SNAP_OFFSETS: [i32; 5] = [0, 1, -1, 2, -2];

/// Why a ground cell cannot anchor a spawn.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum SiteRejection {
    NoGround,
    GroundTag,
    Covered,
    Biome,
    TooHigh,
    BelowSeaLevel,
    Light,
}

impl SiteRejection {
    pub fn as_str(self) -> &'static str {
        match self {
            SiteRejection::NoGround => "no ground",
            SiteRejection::GroundTag => "ground tag",
            SiteRejection::Covered => "covered",
            SiteRejection::Biome => "biome",
            SiteRejection::TooHigh => "too high",
            SiteRejection::BelowSeaLevel => "below sea level",
            SiteRejection::Light => "light",
        }
    }
}

impl fmt::Display for SiteRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validates ground cells for one species in one world.
///
/// A ground cell is valid when it holds a block with an allowed surface tag,
/// the cell above it is air, the biome matches, it lies at or below the
/// species' spawn ceiling, it satisfies the sea-level rule, and the air cell
/// above is lit within the species' band.
pub struct SiteCheck<'a> {
    world: &'a dyn WorldOracle,
    spec: &'a SpawnSpec,
    allow_below_sea_level: bool,
}

impl<'a> SiteCheck<'a> {
    /// Sub-sea-level sites pass only when both the spawner and the species
    /// allow them.
    pub fn new(world: &'a dyn WorldOracle, spec: &'a SpawnSpec, allow_below_sea_level: bool) -> Self {
        Self {
            world,
            spec,
            allow_below_sea_level: allow_below_sea_level && spec.allow_below_sea_level,
        }
    }

    pub fn check(&self, ground: IVec3) -> Result<(), SiteRejection> {
        let Some(tag) = self.world.ground_tag(ground) else {
            return Err(SiteRejection::NoGround);
        };
        if !self.spec.allows_ground(&tag) {
            return Err(SiteRejection::GroundTag);
        }
        let above = ground + IVec3::Y;
        if !self.world.is_air(above) {
            return Err(SiteRejection::Covered);
        }
        if !self.world.biome_matches(ground, &self.spec.biome) {
            return Err(SiteRejection::Biome);
        }
        if ground.y > self.spec.max_spawn_height {
            return Err(SiteRejection::TooHigh);
        }
        if !self.allow_below_sea_level && ground.y < self.world.sea_level() {
            return Err(SiteRejection::BelowSeaLevel);
        }
        if !self.spec.allows_light(self.world.light_level(above)) {
            return Err(SiteRejection::Light);
        }
        Ok(())
    }

    pub fn is_valid(&self, ground: IVec3) -> bool {
        self.check(ground).is_ok()
    }

    /// The top of column `(x, z)` if it is a valid site.
    pub fn column(&self, x: i32, z: i32) -> Option<IVec3> {
        let ground = IVec3::new(x, self.world.heightmap_top(x, z), z);
        self.is_valid(ground).then_some(ground)
    }

    /// The valid ground cell in column `(x, z)` closest to `near_y`, looking
    /// at most two cells up or down.
    pub fn snap(&self, x: i32, z: i32, near_y: i32) -> Option<IVec3> {
        SNAP_OFFSETS
            .iter()
            .map(|&dy| IVec3::new(x, near_y + dy, z))
            .find(|&ground| self.is_valid(ground))
    }

    /// Test the column under `center`, then up to `samples` random columns
    /// within `radius` of it.  Returns the first valid ground cell.
    pub fn search(&self, center: IVec3, radius: i32, samples: u32, rng: &mut SimRng) -> Option<IVec3> {
        if let Some(ground) = self.column(center.x, center.z) {
            return Some(ground);
        }
        let radius = radius.max(0);
        (0..samples).find_map(|_| {
            let x = center.x + rng.gen_range(-radius..=radius);
            let z = center.z + rng.gen_range(-radius..=radius);
            self.column(x, z)
        })
    }
}
