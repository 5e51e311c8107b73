//! Vector helpers for steering math on top of `glam`.
//!
//! Positions and velocities are `DVec3` (blocks, blocks/tick); grid cells are
//! `IVec3`.  Every normalization here is guarded: a magnitude at or below the
//! caller's epsilon yields `None` instead of a non-finite vector.

use glam::{DVec3, IVec3};

/// Offsets of the four horizontal neighbors of a cell (north, south, east, west).
pub const HORIZONTAL_NEIGHBORS: [IVec3; 4] = [
    IVec3::new(0, 0, -1),
    IVec3::new(0, 0, 1),
    IVec3::new(1, 0, 0),
    IVec3::new(-1, 0, 0),
];

/// The grid cell containing a continuous point.
#[inline]
pub fn cell_of(p: DVec3) -> IVec3 {
    p.floor().as_ivec3()
}

/// Center of a cell's top face.
#[inline]
pub fn cell_top_center(cell: IVec3) -> DVec3 {
    DVec3::new(cell.x as f64 + 0.5, cell.y as f64 + 1.0, cell.z as f64 + 0.5)
}

/// Length of the XZ projection of `v`.
#[inline]
pub fn horizontal_len(v: DVec3) -> f64 {
    (v.x * v.x + v.z * v.z).sqrt()
}

/// Scale the XZ components of `v` down so their length is at most `max`.
/// The Y component is untouched and the horizontal direction is preserved.
pub fn clamp_horizontal(v: DVec3, max: f64) -> DVec3 {
    let h = horizontal_len(v);
    if h > max && h > 0.0 {
        let s = max / h;
        DVec3::new(v.x * s, v.y, v.z * s)
    } else {
        v
    }
}

/// Scale all three axes of `v` by the same factor so `|v| <= max`.
pub fn clamp_length(v: DVec3, max: f64) -> DVec3 {
    let len = v.length();
    if len > max && len > 0.0 {
        v * (max / len)
    } else {
        v
    }
}

/// Unit vector along `v`, or `None` when `|v| <= eps`.
#[inline]
pub fn unit_or_none(v: DVec3, eps: f64) -> Option<DVec3> {
    let len = v.length();
    (len > eps).then(|| v / len)
}
