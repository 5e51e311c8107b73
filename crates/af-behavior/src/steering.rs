//! Boids steering terms and speed clamps as pure functions.
//!
//! Every function takes plain vectors and a neighbor slice and returns a
//! velocity delta; none touches an agent or the world.  Neighbors passed in
//! are expected to be pre-filtered to flight-active states (see
//! [`active`]).

use af_agent::{NeighborView, SpeciesParams};
use af_core::DVec3;
use af_core::space::{clamp_horizontal, clamp_length, unit_or_none};

/// Squared distance below which two agents count as coincident and exert no
/// separation on each other.
pub const SEPARATION_EPS2: f64 = 0.0001;

/// Minimum distance to the goal for goal seeking to apply.
pub const SEEK_EPS: f64 = 0.0001;

/// Extra downward steer applied near the ceiling, before the vertical factor.
pub const CEILING_PUSH: f64 = 0.02;

/// Neighbors that take part in flocking: everything but perched and dying.
pub fn active<'a>(neighbors: &[&'a NeighborView]) -> Vec<&'a NeighborView> {
    neighbors.iter().copied().filter(|n| n.state.is_active()).collect()
}

/// Mean position of `neighbors`, or `None` when empty.
pub fn centroid(neighbors: &[&NeighborView]) -> Option<DVec3> {
    if neighbors.is_empty() {
        return None;
    }
    let sum: DVec3 = neighbors.iter().map(|n| n.position).sum();
    Some(sum / neighbors.len() as f64)
}

/// Pull toward the neighbors' centroid.
pub fn cohesion(position: DVec3, neighbors: &[&NeighborView], weight: f64) -> DVec3 {
    centroid(neighbors).map_or(DVec3::ZERO, |c| (c - position) * weight)
}

/// Match the neighbors' mean velocity.
pub fn alignment(velocity: DVec3, neighbors: &[&NeighborView], weight: f64) -> DVec3 {
    if neighbors.is_empty() {
        return DVec3::ZERO;
    }
    let mean = neighbors.iter().map(|n| n.velocity).sum::<DVec3>() / neighbors.len() as f64;
    (mean - velocity) * weight
}

/// Push away from neighbors closer than `distance`, linearly stronger the
/// closer they are.
pub fn separation(
    position: DVec3,
    neighbors: &[&NeighborView],
    distance: f64,
    strength: f64,
) -> DVec3 {
    let d2_max = distance * distance;
    let mut push = DVec3::ZERO;
    for n in neighbors {
        let away = position - n.position;
        let d2 = away.length_squared();
        if d2 <= d2_max && d2 > SEPARATION_EPS2 {
            let d = d2.sqrt();
            push += (away / d) * ((distance - d) / distance);
        }
    }
    push * strength
}

/// Cohesion + alignment + separation over the active subset of `neighbors`.
/// Zero when no neighbor is active.
pub fn flocking(
    position: DVec3,
    velocity: DVec3,
    neighbors: &[&NeighborView],
    params: &SpeciesParams,
) -> DVec3 {
    let active = active(neighbors);
    if active.is_empty() {
        return DVec3::ZERO;
    }
    cohesion(position, &active, params.cohesion)
        + alignment(velocity, &active, params.alignment)
        + separation(position, &active, params.separation_distance, params.separation_strength)
}

/// Steering toward `goal` at cruise speed.
///
/// The vertical component is scaled by the species' vertical steer factor
/// and biased downward when `near_ceiling`.  The result never exceeds the
/// species' steer strength in magnitude; direction is preserved.  Returns
/// zero when the goal coincides with `position`.
pub fn seek(
    position: DVec3,
    velocity: DVec3,
    goal: DVec3,
    params: &SpeciesParams,
    near_ceiling: bool,
) -> DVec3 {
    let Some(dir) = unit_or_none(goal - position, SEEK_EPS) else {
        return DVec3::ZERO;
    };
    let desired = dir * params.fly_speed;
    let mut steer = desired - velocity;
    steer.y *= params.vertical_steer_factor;
    if near_ceiling {
        steer.y -= CEILING_PUSH * params.vertical_steer_factor;
    }
    clamp_length(steer, params.steer_strength)
}

/// Cap horizontal speed (direction preserved) and vertical speed.
pub fn clamp_speed(velocity: DVec3, max_horizontal: f64, max_vertical: f64) -> DVec3 {
    let mut v = clamp_horizontal(velocity, max_horizontal);
    v.y = v.y.clamp(-max_vertical, max_vertical);
    v
}
