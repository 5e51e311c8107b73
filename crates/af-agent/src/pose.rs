//! Render pose: the small amount of per-agent state a sprite renderer needs
//! beyond position.

use af_core::{DVec3, LifecycleState};

/// Horizontal speed below which facing is left unchanged.
pub const FACING_SPEED_THRESHOLD: f64 = 0.01;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Pose {
    pub facing_right: bool,
    /// Wing-flap animation frame, 1 or 2.
    pub frame: u8,
    /// Phase offset into the flap cycle so a flock doesn't flap in lockstep.
    pub flap_offset: i32,
}

impl Pose {
    pub fn new(flap_offset: i32) -> Self {
        Self { facing_right: false, frame: 1, flap_offset }
    }

    pub fn toggle_frame(&mut self) {
        self.frame = if self.frame == 1 { 2 } else { 1 };
    }

    /// Face along the horizontal velocity as seen from a camera with the given
    /// yaw.  Without a camera, face along +X.
    pub fn update_facing(&mut self, velocity: DVec3, camera_yaw: Option<f64>) {
        let speed = (velocity.x * velocity.x + velocity.z * velocity.z).sqrt();
        if speed <= FACING_SPEED_THRESHOLD {
            return;
        }
        self.facing_right = match camera_yaw {
            Some(yaw) => {
                let rad = yaw.to_radians();
                let (look_x, look_z) = (-rad.sin(), rad.cos());
                let (right_x, right_z) = (-look_z, look_x);
                velocity.x * right_x + velocity.z * right_z > 0.0
            }
            None => velocity.x > 0.0,
        };
    }

    /// Sprite key in the `crow_flying_r_2` / `crow_perched_1` scheme.
    pub fn sprite_key(&self, species: &str, state: LifecycleState) -> String {
        let stance = if state == LifecycleState::Perched { "perched" } else { "flying" };
        let side = if self.facing_right { "_r" } else { "" };
        format!("{species}_{stance}{side}_{}", self.frame)
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::new(0)
    }
}

/// Flap period for a given vertical velocity: climbing shortens the cycle,
/// diving lengthens it.  A zero period is replaced by 1.
#[inline]
pub fn flap_period(wing_flap_speed: i32, vertical_velocity: f64) -> i32 {
    let period = wing_flap_speed - (vertical_velocity * 20.0) as i32;
    if period == 0 { 1 } else { period }
}
