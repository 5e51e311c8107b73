//! The `WorldOracle` trait: point queries against the host voxel world.

use std::borrow::Cow;
use std::fmt;

use af_core::{DVec3, DayPhase, IVec3};

// ── Tag ───────────────────────────────────────────────────────────────────────

/// A biome or block-surface tag, e.g. `"overworld"` or `"grass_block"`.
///
/// Static tags cost nothing to construct; tags read from the host world or a
/// config file may own their string.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct Tag(Cow<'static, str>);

impl Tag {
    /// A tag backed by a static string.
    pub const fn new(name: &'static str) -> Self {
        Tag(Cow::Borrowed(name))
    }

    /// A tag owning its string.
    pub fn owned(name: impl Into<String>) -> Self {
        Tag(Cow::Owned(name.into()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ── PlayerRef ─────────────────────────────────────────────────────────────────

/// A player as seen by the simulation: where they stand and whether they
/// take part in the world.
#[derive(Clone, Debug, PartialEq)]
pub struct PlayerRef {
    pub position: DVec3,
    /// Spectators neither scare perched agents nor anchor spawns.
    pub spectator: bool,
    /// Horizontal look angle in degrees (0 = +Z, 90 = −X).
    pub yaw_degrees: f64,
}

impl PlayerRef {
    pub fn new(position: DVec3) -> Self {
        Self { position, spectator: false, yaw_degrees: 0.0 }
    }

    pub fn spectator(position: DVec3) -> Self {
        Self { position, spectator: true, yaw_degrees: 0.0 }
    }
}

// ── WorldOracle ───────────────────────────────────────────────────────────────

/// Read-only query surface over the host world.
///
/// Every method is a pure lookup; the simulation never mutates the world.
/// Implementations must be `Send + Sync` so agents can be ticked on a thread
/// pool while sharing one `&dyn WorldOracle`.
pub trait WorldOracle: Send + Sync {
    /// `true` if the cell holds no block at all.
    fn is_air(&self, cell: IVec3) -> bool;

    /// `true` if the cell's block has a non-empty collision shape.
    fn is_solid(&self, cell: IVec3) -> bool;

    /// `true` if the cell's top face can support something standing on it.
    fn top_face_sturdy(&self, cell: IVec3) -> bool;

    /// Brighter of sky and block light at the cell, `0..=15`.
    fn light_level(&self, cell: IVec3) -> u8;

    /// `true` if the biome at the cell carries `biome`.
    fn biome_matches(&self, cell: IVec3, biome: &Tag) -> bool;

    /// Surface tag of the block in the cell, `None` for air.
    fn ground_tag(&self, cell: IVec3) -> Option<Tag>;

    /// Y of the topmost non-air block in the `(x, z)` column, or
    /// `min_y() - 1` for an empty column.
    fn heightmap_top(&self, x: i32, z: i32) -> i32;

    fn sea_level(&self) -> i32;

    /// Lowest buildable Y.  Downward scans never go below it.
    fn min_y(&self) -> i32 {
        -64
    }

    fn is_raining(&self) -> bool;

    fn is_thundering(&self) -> bool;

    fn day_phase(&self) -> DayPhase;

    /// Every player currently in the world, spectators included.
    fn players(&self) -> Vec<PlayerRef>;

    /// Yaw (degrees) of the camera the renderer draws from, if any.
    fn camera_yaw(&self) -> Option<f64> {
        None
    }
}
