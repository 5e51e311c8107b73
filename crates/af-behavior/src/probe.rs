//! World probes used by the flight state machine: ground sampling, collision
//! look-ahead and perch-site tests.

use af_core::space::{HORIZONTAL_NEIGHBORS, cell_of};
use af_core::{AgentRng, DVec3, IVec3};
use af_world::WorldOracle;

/// How far below the agent the ground sample scans before falling back to
/// the column heightmap.
pub const GROUND_SCAN_DEPTH: i32 = 20;

/// Height of the ground under `(x, z)`: one above the first non-air cell
/// found scanning down from `from_y`.  Columns with nothing within
/// [`GROUND_SCAN_DEPTH`] fall back to the heightmap.
pub fn ground_height(world: &dyn WorldOracle, x: f64, z: f64, from_y: f64) -> f64 {
    let (cx, cz) = (x.floor() as i32, z.floor() as i32);
    let start = from_y.ceil() as i32;
    let stop = (start - GROUND_SCAN_DEPTH).max(world.min_y());
    for y in (stop..=start).rev() {
        if !world.is_air(IVec3::new(cx, y, cz)) {
            return y as f64 + 1.0;
        }
    }
    world.heightmap_top(cx, cz) as f64 + 1.0
}

/// `true` when the cell containing `point` has a collision shape.
#[inline]
pub fn is_blocked(world: &dyn WorldOracle, point: DVec3) -> bool {
    world.is_solid(cell_of(point))
}

/// A cell something can stand on: occupied, air above, sturdy top face.
pub fn is_standable(world: &dyn WorldOracle, cell: IVec3) -> bool {
    !world.is_air(cell) && world.is_air(cell + IVec3::Y) && world.top_face_sturdy(cell)
}

/// A perch cell: standable, with collision, and with at least one occupied
/// horizontal neighbor so agents prefer branches and ledges over open ground.
pub fn is_perch_site(world: &dyn WorldOracle, cell: IVec3) -> bool {
    is_standable(world, cell)
        && world.is_solid(cell)
        && HORIZONTAL_NEIGHBORS.iter().any(|&d| !world.is_air(cell + d))
}

/// First perch site among the `depth` cells below `position`, nearest first.
pub fn find_perch_below(world: &dyn WorldOracle, position: DVec3, depth: u32) -> Option<IVec3> {
    (1..=depth as i32)
        .map(|i| cell_of(position - DVec3::new(0.0, i as f64, 0.0)))
        .find(|&cell| is_perch_site(world, cell))
}

/// A perch previously used by a neighbor is still usable when occupied with
/// air above.
pub fn perch_still_open(world: &dyn WorldOracle, cell: IVec3) -> bool {
    !world.is_air(cell) && world.is_air(cell + IVec3::Y)
}

/// Probability that a group-perch invitation uses a nearby variant cell
/// instead of the inviter's own target.
pub const VARIANT_SITE_CHANCE: f64 = 0.9;

/// Horizontal and vertical reach of a variant-site search.
pub const VARIANT_SITE_REACH: i32 = 3;

/// Landing cell for a flockmate invited to `target`.  Usually a random
/// standable cell within reach of `target`, scanning from the top of the
/// reach down; `target` itself when the roll fails or nothing is found.
pub fn variant_site(world: &dyn WorldOracle, target: IVec3, rng: &mut AgentRng) -> IVec3 {
    if rng.unit() >= VARIANT_SITE_CHANCE {
        return target;
    }
    let r = VARIANT_SITE_REACH;
    let dx = rng.gen_range(-r..=r);
    let dz = rng.gen_range(-r..=r);
    (-r..=r)
        .rev()
        .map(|dy| target + IVec3::new(dx, dy, dz))
        .find(|&cell| is_standable(world, cell))
        .unwrap_or(target)
}
