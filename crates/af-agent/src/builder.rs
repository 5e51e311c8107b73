//! `AgentFactory`: creates freshly spawned agents with deterministic RNGs.
//!
//! # Usage
//!
//! ```rust
//! use af_agent::{AgentFactory, AgentRegistry, SpeciesCatalog};
//! use af_core::{DVec3, SpeciesId, WorldId};
//!
//! let catalog = SpeciesCatalog::with_defaults();
//! let registry = AgentRegistry::from_catalog(&catalog, 100);
//! let mut factory = AgentFactory::new(/*seed=*/ 42);
//!
//! let crow = SpeciesId(0);
//! let id = factory.spawn_into(&registry, &catalog, crow, WorldId::OVERWORLD, DVec3::new(0.5, 80.0, 0.5));
//! assert!(id.is_some());
//! assert_eq!(registry.count(), 1);
//! ```

use af_core::{AgentId, AgentRng, DVec3, SpeciesId, WorldId};

use crate::{Agent, AgentRegistry, Pose, SpeciesCatalog, SpeciesParams};

/// Upper bound (exclusive) of the randomized initial landing cooldown, so
/// agents spawned together don't all scan for perches on the same tick.
pub const INITIAL_LANDING_COOLDOWN: u32 = 600;

/// Initial climb rate of a newly spawned agent.
pub const SPAWN_CLIMB: f64 = 0.05;

/// Hands out spawn serials and seeds each new agent's RNG from them.
#[derive(Debug)]
pub struct AgentFactory {
    seed: u64,
    next_serial: u64,
}

impl AgentFactory {
    pub fn new(seed: u64) -> Self {
        Self { seed, next_serial: 0 }
    }

    /// Number of agents created so far, accepted or not.
    pub fn created(&self) -> u64 {
        self.next_serial
    }

    /// Build a flying agent at `position` with the species' spawn velocity,
    /// a random landing cooldown and a random flap phase.
    pub fn create(
        &mut self,
        params: &SpeciesParams,
        species: SpeciesId,
        world: WorldId,
        position: DVec3,
    ) -> Agent {
        let mut rng = AgentRng::new(self.seed, self.next_serial);
        self.next_serial += 1;

        let velocity = DVec3::new(
            rng.centered(params.fly_speed),
            SPAWN_CLIMB,
            rng.centered(params.fly_speed),
        );
        let landing_cooldown = rng.gen_range(0..INITIAL_LANDING_COOLDOWN);
        let flap_offset = rng.gen_range(0..params.wing_flap_speed.max(1));

        let mut agent = Agent::new(species, world, position, velocity, params.lifetime, rng);
        agent.landing_cooldown = landing_cooldown;
        agent.pose = Pose::new(flap_offset);
        agent
    }

    /// Create an agent and register it.  When a cap is met the agent is
    /// discarded and `None` returned; no count changes.
    pub fn spawn_into(
        &mut self,
        registry: &AgentRegistry,
        catalog: &SpeciesCatalog,
        species: SpeciesId,
        world: WorldId,
        position: DVec3,
    ) -> Option<AgentId> {
        let params = catalog.get(species)?;
        let agent = self.create(params, species, world, position);
        registry.register(agent)
    }
}
