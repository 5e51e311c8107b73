//! Fluent builder for constructing a [`Sim`].

use std::sync::Arc;

use af_agent::{AgentFactory, AgentRegistry, SpeciesCatalog};
use af_behavior::{BehaviorModel, FlockBehavior};
use af_config::FaunaConfig;
use af_core::{SimRng, SpeciesId, Tick, WorldId};
use af_spawn::{AmbientSpawner, SpawnTable, SpawnerSettings};

use crate::{Sim, SimError, SimResult};

/// Default global population cap.
pub const DEFAULT_GLOBAL_CAP: usize = 100;

/// Default horizontal distance beyond which agents are culled.
pub const DEFAULT_DESPAWN_RANGE: f64 = 176.0;

/// Fluent builder for [`Sim`].
///
/// # Required inputs
///
/// - [`SpeciesCatalog`]: the species the simulation knows about
///
/// # Optional inputs (have defaults)
///
/// | Method                    | Default                                    |
/// |---------------------------|--------------------------------------------|
/// | `.world_id(w)`            | `WorldId::OVERWORLD`                       |
/// | `.spawner(settings, t)`   | `SpawnerSettings::default()`, crow table   |
/// | `.behavior(species, b)`   | `FlockBehavior` for every species          |
/// | `.global_cap(n)`          | 100                                        |
/// | `.registry(r)`            | fresh registry with caps from the catalog  |
/// | `.seed(s)`                | 0                                          |
/// | `.despawn_range(d)`       | 176                                        |
/// | `.debug_agents(b)`        | off                                        |
/// | `.snapshot_interval(n)`   | 0 (never)                                  |
///
/// # Example
///
/// ```rust,ignore
/// let config = load_config_file(path, &FaunaConfig::default())?;
/// let mut sim = SimBuilder::from_config(SpeciesCatalog::with_defaults(), &config)?
///     .snapshot_interval(200)
///     .build()?;
/// sim.run_ticks(24_000, &world, &mut NoopObserver);
/// ```
pub struct SimBuilder {
    catalog:           SpeciesCatalog,
    world_id:          WorldId,
    settings:          SpawnerSettings,
    table:             SpawnTable,
    behaviors:         Vec<(SpeciesId, Box<dyn BehaviorModel>)>,
    global_cap:        usize,
    registry:          Option<Arc<AgentRegistry>>,
    seed:              u64,
    despawn_range:     f64,
    debug_agents:      bool,
    snapshot_interval: u64,
}

impl SimBuilder {
    pub fn new(catalog: SpeciesCatalog) -> Self {
        Self {
            catalog,
            world_id:          WorldId::OVERWORLD,
            settings:          SpawnerSettings::default(),
            table:             SpawnTable::with_defaults(),
            behaviors:         Vec::new(),
            global_cap:        DEFAULT_GLOBAL_CAP,
            registry:          None,
            seed:              0,
            despawn_range:     DEFAULT_DESPAWN_RANGE,
            debug_agents:      false,
            snapshot_interval: 0,
        }
    }

    /// A builder with everything `config` specifies applied: species
    /// bounds and caps, the spawn table and settings, the seed, the despawn
    /// range and debug flags.
    pub fn from_config(mut catalog: SpeciesCatalog, config: &FaunaConfig) -> SimResult<Self> {
        config.validate()?;
        config.apply_to_catalog(&mut catalog)?;
        let table = config.spawn_table(&catalog)?;
        Ok(Self::new(catalog)
            .spawner(config.spawner_settings(), table)
            .global_cap(config.population.max_active_birds)
            .seed(config.seed)
            .despawn_range(config.spawning.despawn_range)
            .debug_agents(config.debug.debug_birds))
    }

    pub fn world_id(mut self, world_id: WorldId) -> Self {
        self.world_id = world_id;
        self
    }

    pub fn spawner(mut self, settings: SpawnerSettings, table: SpawnTable) -> Self {
        self.settings = settings;
        self.table = table;
        self
    }

    /// Use `behavior` for `species` instead of [`FlockBehavior`].
    pub fn behavior(mut self, species: SpeciesId, behavior: impl BehaviorModel) -> Self {
        self.behaviors.push((species, Box::new(behavior)));
        self
    }

    pub fn global_cap(mut self, cap: usize) -> Self {
        self.global_cap = cap;
        self
    }

    /// Share an existing registry.  Its caps are overwritten from the
    /// catalog and `global_cap` at build time; its agents are kept.
    pub fn registry(mut self, registry: Arc<AgentRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn despawn_range(mut self, range: f64) -> Self {
        self.despawn_range = range;
        self
    }

    pub fn debug_agents(mut self, on: bool) -> Self {
        self.debug_agents = on;
        self
    }

    pub fn snapshot_interval(mut self, every: u64) -> Self {
        self.snapshot_interval = every;
        self
    }

    /// Validate inputs and return a ready-to-run [`Sim`].
    pub fn build(self) -> SimResult<Sim> {
        if !self.despawn_range.is_finite() || self.despawn_range <= 0.0 {
            return Err(SimError::Config(format!(
                "despawn_range must be positive, got {}",
                self.despawn_range
            )));
        }
        for (_, params) in self.catalog.iter() {
            params.validate()?;
        }
        self.table.check_catalog(&self.catalog)?;
        let spawner = AmbientSpawner::new(self.settings, self.table)?;

        // ── Behaviors, one per species ────────────────────────────────────
        let mut behaviors: Vec<Box<dyn BehaviorModel>> = (0..self.catalog.len())
            .map(|_| Box::new(FlockBehavior) as Box<dyn BehaviorModel>)
            .collect();
        for (species, behavior) in self.behaviors {
            let slot = behaviors
                .get_mut(species.index())
                .ok_or(SimError::UnknownSpecies(species))?;
            *slot = behavior;
        }

        // ── Registry and caps ─────────────────────────────────────────────
        let registry = match self.registry {
            Some(shared) => {
                shared.set_global_cap(self.global_cap);
                for (id, params) in self.catalog.iter() {
                    shared.set_species_cap(id, params.max_active);
                }
                shared
            }
            None => Arc::new(AgentRegistry::from_catalog(&self.catalog, self.global_cap)),
        };

        let mut rng = SimRng::new(self.seed);
        let factory = AgentFactory::new(rng.random());

        Ok(Sim {
            world_id:          self.world_id,
            registry,
            catalog:           self.catalog,
            spawner,
            factory,
            behaviors,
            rng,
            now:               Tick::ZERO,
            despawn_range:     self.despawn_range,
            debug_agents:      self.debug_agents,
            snapshot_interval: self.snapshot_interval,
        })
    }
}
