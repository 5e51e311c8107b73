//! The `Agent` record: one simulated creature.
//!
//! An agent owns every piece of its mutable state, including its RNG, so the
//! behavior phase can hand each worker an exclusive `&mut Agent` while all of
//! them share one read-only neighbor snapshot.

use af_core::{AgentId, AgentRng, DVec3, IVec3, LifecycleState, SpeciesId, WorldId};

use crate::Pose;

/// Where a landing agent is heading.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LandingTarget {
    /// Cell whose top face the agent will sit on.
    pub cell: IVec3,
    /// Y the agent's position snaps to on touchdown.
    pub target_y: f64,
    /// Horizontal offset from the cell center, each axis in `[-0.4, 0.4)`.
    pub offset: (f64, f64),
}

impl LandingTarget {
    /// Touchdown point: cell center plus offset, at `target_y`.
    #[inline]
    pub fn point(&self) -> DVec3 {
        DVec3::new(
            self.cell.x as f64 + 0.5 + self.offset.0,
            self.target_y,
            self.cell.z as f64 + 0.5 + self.offset.1,
        )
    }
}

#[derive(Debug)]
pub struct Agent {
    /// Registry handle.  Null until the registry accepts the agent.
    pub id: AgentId,
    pub species: SpeciesId,
    pub world: WorldId,

    pub position: DVec3,
    /// Position at the start of the current tick, for render interpolation.
    pub previous: DVec3,
    pub velocity: DVec3,

    pub state: LifecycleState,

    /// Wander goal.  `None` means "pick one on the next flying tick".
    pub goal: Option<DVec3>,
    pub goal_timer: i32,

    pub landing: Option<LandingTarget>,
    /// Ticks until the agent may scan for a perch again.
    pub landing_cooldown: u32,

    /// Cell the agent is sitting on while perched.
    pub perch: Option<IVec3>,
    /// Counts down while perched, and while taking off.
    pub perch_timer: i32,
    /// Ticks spent on the current perch.
    pub perched_ticks: u32,

    pub age: u32,
    pub lifetime: u32,

    pub pose: Pose,
    pub rng: AgentRng,
}

impl Agent {
    /// A flying agent at `position` with no goal, perch or landing target.
    pub fn new(
        species: SpeciesId,
        world: WorldId,
        position: DVec3,
        velocity: DVec3,
        lifetime: u32,
        rng: AgentRng,
    ) -> Self {
        Self {
            id: AgentId::default(),
            species,
            world,
            position,
            previous: position,
            velocity,
            state: LifecycleState::Flying,
            goal: None,
            goal_timer: 0,
            landing: None,
            landing_cooldown: 0,
            perch: None,
            perch_timer: 0,
            perched_ticks: 0,
            age: 0,
            lifetime,
            pose: Pose::default(),
            rng,
        }
    }

    /// Enter `Dying` unless already there.  Returns `true` on the transition.
    pub fn begin_dying(&mut self) -> bool {
        if self.state == LifecycleState::Dying {
            return false;
        }
        self.state = LifecycleState::Dying;
        self.landing = None;
        self.perch = None;
        true
    }
}
