//! The complete, validated configuration and how it maps onto the runtime
//! types.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use af_agent::SpeciesCatalog;
use af_spawn::{SpawnSpec, SpawnTable, SpawnerSettings};

use crate::{ConfigError, ConfigResult};

// ── Sections ──────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpawningConfig {
    pub spawn_range_from_player: f64,
    pub spawn_tick_delay: u64,
    pub attempts_per_tick: u32,
    pub search_radius: i32,
    pub samples_per_search: u32,
    pub allow_below_sea_level: bool,
    /// Agents farther than this from every player are removed.
    pub despawn_range: f64,
}

impl Default for SpawningConfig {
    fn default() -> Self {
        Self {
            spawn_range_from_player: 48.0,
            spawn_tick_delay: 200,
            attempts_per_tick: 8,
            search_radius: 6,
            samples_per_search: 12,
            allow_below_sea_level: true,
            despawn_range: 176.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PopulationConfig {
    pub max_active_birds: usize,
    /// Per-species caps, keyed by species name.
    pub max_active: BTreeMap<String, usize>,
}

impl Default for PopulationConfig {
    fn default() -> Self {
        Self {
            max_active_birds: 100,
            max_active: BTreeMap::from([("crow".to_owned(), 50)]),
        }
    }
}

/// Spawn and flight bounds for one species.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpeciesConfig {
    pub weight: u32,
    pub min_pack_size: u32,
    pub max_pack_size: u32,
    pub min_light: u8,
    pub max_light: u8,
    pub max_spawn_height: i32,
    pub min_flight_height: f64,
    pub max_flight_height: f64,
}

impl SpeciesConfig {
    pub fn crow() -> Self {
        Self {
            weight: 30,
            min_pack_size: 3,
            max_pack_size: 8,
            min_light: 8,
            max_light: 15,
            max_spawn_height: 140,
            min_flight_height: 2.5,
            max_flight_height: 85.0,
        }
    }
}

impl Default for SpeciesConfig {
    fn default() -> Self {
        Self::crow()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DebugConfig {
    /// Log spawn rounds.
    pub debug_spawning: bool,
    /// Log per-agent state.
    pub debug_birds: bool,
}

// ── FaunaConfig ───────────────────────────────────────────────────────────────

/// Every tunable the simulation reads at start-up.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FaunaConfig {
    pub spawning: SpawningConfig,
    pub population: PopulationConfig,
    pub species: BTreeMap<String, SpeciesConfig>,
    pub debug: DebugConfig,
    pub seed: u64,
}

impl Default for FaunaConfig {
    fn default() -> Self {
        Self {
            spawning: SpawningConfig::default(),
            population: PopulationConfig::default(),
            species: BTreeMap::from([("crow".to_owned(), SpeciesConfig::crow())]),
            debug: DebugConfig::default(),
            seed: 0,
        }
    }
}

impl FaunaConfig {
    pub fn spawner_settings(&self) -> SpawnerSettings {
        let s = &self.spawning;
        SpawnerSettings {
            spawn_range: s.spawn_range_from_player,
            tick_delay: s.spawn_tick_delay,
            attempts_per_tick: s.attempts_per_tick,
            search_radius: s.search_radius,
            samples_per_search: s.samples_per_search,
            allow_below_sea_level: s.allow_below_sea_level,
            debug: self.debug.debug_spawning,
        }
    }

    /// Write flight bounds and population caps into the matching catalog
    /// entries.  Every species the config names must already be registered.
    pub fn apply_to_catalog(&self, catalog: &mut SpeciesCatalog) -> ConfigResult<()> {
        for (name, species) in &self.species {
            let id = catalog
                .by_name(name)
                .ok_or_else(|| ConfigError::UnknownSpecies(name.clone()))?;
            let params = catalog
                .get_mut(id)
                .ok_or_else(|| ConfigError::UnknownSpecies(name.clone()))?;
            params.min_flight_height = species.min_flight_height;
            params.max_flight_height = species.max_flight_height;
            params.validate()?;
        }
        for (name, &cap) in &self.population.max_active {
            let id = catalog
                .by_name(name)
                .ok_or_else(|| ConfigError::UnknownSpecies(name.clone()))?;
            if let Some(params) = catalog.get_mut(id) {
                params.max_active = cap;
            }
        }
        Ok(())
    }

    /// One spawn spec per configured species.  Biome, ground surfaces and
    /// weather/day eligibility come from the crow preset; the config
    /// overrides weight, pack, light and height bounds.
    pub fn spawn_table(&self, catalog: &SpeciesCatalog) -> ConfigResult<SpawnTable> {
        let mut table = SpawnTable::new();
        for (name, species) in &self.species {
            let id = catalog
                .by_name(name)
                .ok_or_else(|| ConfigError::UnknownSpecies(name.clone()))?;
            table.push(SpawnSpec {
                weight: species.weight,
                min_pack: species.min_pack_size,
                max_pack: species.max_pack_size,
                min_light: species.min_light,
                max_light: species.max_light,
                max_spawn_height: species.max_spawn_height,
                allow_below_sea_level: self.spawning.allow_below_sea_level,
                ..SpawnSpec::crow(id)
            })?;
        }
        Ok(table)
    }

    /// Reject values no runtime type would accept.
    pub fn validate(&self) -> ConfigResult<()> {
        self.spawner_settings().validate()?;
        let despawn = self.spawning.despawn_range;
        if !despawn.is_finite() || despawn <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "despawn_range must be positive, got {despawn}"
            )));
        }
        if self.population.max_active_birds == 0 {
            return Err(ConfigError::Invalid("max_active_birds must be positive".into()));
        }
        for (name, s) in &self.species {
            if s.min_pack_size == 0 || s.min_pack_size > s.max_pack_size {
                return Err(ConfigError::Invalid(format!(
                    "{name}: pack size range {}..={} is empty",
                    s.min_pack_size, s.max_pack_size
                )));
            }
            if s.min_light > s.max_light || s.max_light > 15 {
                return Err(ConfigError::Invalid(format!(
                    "{name}: light band {}..={} is not within 0..=15",
                    s.min_light, s.max_light
                )));
            }
            if s.min_flight_height > s.max_flight_height {
                return Err(ConfigError::Invalid(format!(
                    "{name}: min_flight_height exceeds max_flight_height"
                )));
            }
        }
        Ok(())
    }
}
