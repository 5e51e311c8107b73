//! Per-species tuning data and the catalog that indexes it by `SpeciesId`.
//!
//! Every behavioral constant an agent reads lives in [`SpeciesParams`], so a
//! new species is a new row of data rather than a new type.  Distances are in
//! blocks, speeds in blocks per tick, durations in ticks.

use af_core::SpeciesId;

use crate::{AgentError, AgentResult};

// ── SpeciesParams ─────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpeciesParams {
    /// Registry and sprite key, e.g. `"crow"`.
    pub name: String,
    /// Per-species cap on simultaneously live agents.
    pub max_active: usize,

    // ── Lifetime & rendering ──────────────────────────────────────────────
    pub lifetime: u32,
    /// Half-height of the rendered quad; perched agents sit this far above
    /// the perch's top face.
    pub quad_size: f64,
    /// Base wing-flap period in ticks.
    pub wing_flap_speed: i32,

    // ── Flight ────────────────────────────────────────────────────────────
    pub fly_speed: f64,
    pub steer_strength: f64,
    /// Preferred clearance above the ground.
    pub min_flight_height: f64,
    /// Ceiling measured from the ground below.
    pub max_flight_height: f64,
    pub max_vertical_speed: f64,
    pub vertical_steer_factor: f64,
    /// Minimum climb applied to the goal when flying too low.
    pub takeoff_climb: f64,
    pub look_ahead: f64,

    // ── Flocking ──────────────────────────────────────────────────────────
    pub flock_radius: f64,
    pub cohesion: f64,
    pub alignment: f64,
    pub separation_distance: f64,
    pub separation_strength: f64,
    /// Weight of the flock centroid when blending a fresh goal, in `[0, 1]`.
    pub flock_goal_bias: f64,

    // ── Goals ─────────────────────────────────────────────────────────────
    pub goal_radius: f64,
    pub goal_duration_min: u32,
    pub goal_duration_max: u32,

    // ── Perching ──────────────────────────────────────────────────────────
    /// Horizontal distance at which a player startles a perched agent.
    pub scare_radius: f64,
    pub scare_takeoff_speed: f64,
    /// Per-tick probability of scanning for a perch while flying.
    pub perching_chance: f64,
    /// Base perch duration; the actual timer is in `[t, 2t)`.
    pub perching_time: u32,
    /// How many cells below the agent the perch scan reaches.
    pub perching_distance: u32,
}

impl SpeciesParams {
    /// The crow: a medium-sized, loosely flocking corvid.
    pub fn crow() -> Self {
        Self {
            name: "crow".to_owned(),
            max_active: 50,

            lifetime: 2400,
            quad_size: 0.5,
            wing_flap_speed: 4,

            fly_speed: 0.20,
            steer_strength: 0.0075,
            min_flight_height: 2.5,
            max_flight_height: 85.0,
            max_vertical_speed: 0.30,
            vertical_steer_factor: 1.25,
            takeoff_climb: 2.5,
            look_ahead: 5.0,

            flock_radius: 12.0,
            cohesion: 0.02,
            alignment: 0.015,
            separation_distance: 1.5,
            separation_strength: 0.06,
            flock_goal_bias: 0.40,

            goal_radius: 50.0,
            goal_duration_min: 80,
            goal_duration_max: 160,

            scare_radius: 10.0,
            scare_takeoff_speed: 0.35,
            perching_chance: 0.005,
            perching_time: 600,
            perching_distance: 10,
        }
    }

    /// Reject parameter sets the state machine cannot run with.
    pub fn validate(&self) -> AgentResult<()> {
        let fail = |reason: &str| {
            Err(AgentError::InvalidParams {
                species: self.name.clone(),
                reason: reason.to_owned(),
            })
        };

        if self.name.is_empty() {
            return fail("name must not be empty");
        }
        if self.lifetime == 0 {
            return fail("lifetime must be positive");
        }
        if self.wing_flap_speed < 1 {
            return fail("wing_flap_speed must be at least 1");
        }
        if !(self.fly_speed > 0.0) || !(self.max_vertical_speed > 0.0) {
            return fail("speeds must be positive");
        }
        if !(self.separation_distance > 0.0) {
            return fail("separation_distance must be positive");
        }
        if !(self.goal_radius > 2.5) {
            return fail("goal_radius must exceed 2.5");
        }
        if self.goal_duration_min > self.goal_duration_max {
            return fail("goal_duration_min exceeds goal_duration_max");
        }
        if self.min_flight_height > self.max_flight_height {
            return fail("min_flight_height exceeds max_flight_height");
        }
        if !(0.0..=1.0).contains(&self.perching_chance) {
            return fail("perching_chance must lie in [0, 1]");
        }
        if !(0.0..=1.0).contains(&self.flock_goal_bias) {
            return fail("flock_goal_bias must lie in [0, 1]");
        }
        Ok(())
    }
}

impl Default for SpeciesParams {
    fn default() -> Self {
        Self::crow()
    }
}

// ── SpeciesCatalog ────────────────────────────────────────────────────────────

/// Dense table of registered species.  `SpeciesId(n)` is the `n`-th
/// registered entry; ids are never reused.
#[derive(Clone, Debug, Default)]
pub struct SpeciesCatalog {
    species: Vec<SpeciesParams>,
}

impl SpeciesCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog holding only the built-in crow.
    pub fn with_defaults() -> Self {
        Self { species: vec![SpeciesParams::crow()] }
    }

    /// Validate and append a species.  Names must be unique.
    pub fn register(&mut self, params: SpeciesParams) -> AgentResult<SpeciesId> {
        params.validate()?;
        if self.by_name(&params.name).is_some() {
            return Err(AgentError::DuplicateSpecies(params.name));
        }
        let id = SpeciesId::try_from(self.species.len())
            .map_err(|_| AgentError::InvalidParams {
                species: params.name.clone(),
                reason: "species table is full".to_owned(),
            })?;
        self.species.push(params);
        Ok(id)
    }

    #[inline]
    pub fn get(&self, id: SpeciesId) -> Option<&SpeciesParams> {
        self.species.get(id.index())
    }

    /// Mutable access for config overrides.  The caller re-validates.
    pub fn get_mut(&mut self, id: SpeciesId) -> Option<&mut SpeciesParams> {
        self.species.get_mut(id.index())
    }

    pub fn by_name(&self, name: &str) -> Option<SpeciesId> {
        self.species
            .iter()
            .position(|p| p.name == name)
            .and_then(|i| SpeciesId::try_from(i).ok())
    }

    pub fn iter(&self) -> impl Iterator<Item = (SpeciesId, &SpeciesParams)> + '_ {
        self.species
            .iter()
            .enumerate()
            .map(|(i, p)| (SpeciesId(i as u16), p))
    }

    pub fn len(&self) -> usize {
        self.species.len()
    }

    pub fn is_empty(&self) -> bool {
        self.species.is_empty()
    }
}
