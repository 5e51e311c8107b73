//! The config file as read from disk, where any field may be missing, and
//! the merge that fills the gaps from defaults.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::{DebugConfig, FaunaConfig, PopulationConfig, SpawningConfig, SpeciesConfig};

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct PartialSpawning {
    pub spawn_range_from_player: Option<f64>,
    pub spawn_tick_delay: Option<u64>,
    pub attempts_per_tick: Option<u32>,
    pub search_radius: Option<i32>,
    pub samples_per_search: Option<u32>,
    pub allow_below_sea_level: Option<bool>,
    pub despawn_range: Option<f64>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct PartialPopulation {
    pub max_active_birds: Option<usize>,
    pub max_active: Option<BTreeMap<String, usize>>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct PartialSpecies {
    pub weight: Option<u32>,
    pub min_pack_size: Option<u32>,
    pub max_pack_size: Option<u32>,
    pub min_light: Option<u8>,
    pub max_light: Option<u8>,
    pub max_spawn_height: Option<i32>,
    pub min_flight_height: Option<f64>,
    pub max_flight_height: Option<f64>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct PartialDebug {
    pub debug_spawning: Option<bool>,
    pub debug_birds: Option<bool>,
}

/// [`FaunaConfig`] with every field optional.  An explicit `null` counts as
/// missing.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct PartialFaunaConfig {
    pub spawning: Option<PartialSpawning>,
    pub population: Option<PartialPopulation>,
    pub species: Option<BTreeMap<String, PartialSpecies>>,
    pub debug: Option<PartialDebug>,
    pub seed: Option<u64>,
}

/// The result of [`merge`].
#[derive(Clone, Debug, PartialEq)]
pub struct Merged {
    pub config: FaunaConfig,
    /// Some field was missing and filled from defaults; the file on disk
    /// should be rewritten.
    pub dirty: bool,
}

/// Take each value from `loaded`, falling back to `defaults` field by field.
///
/// Species present in the file keep their place even if the defaults do not
/// know them; their missing fields come from the crow preset.  Species in
/// the defaults but absent from the file are added.
pub fn merge(loaded: PartialFaunaConfig, defaults: &FaunaConfig) -> Merged {
    let mut dirty = false;
    let d = &mut dirty;

    let sp = section(d, loaded.spawning);
    let ds = &defaults.spawning;
    let spawning = SpawningConfig {
        spawn_range_from_player: fill(d, sp.spawn_range_from_player, ds.spawn_range_from_player),
        spawn_tick_delay:        fill(d, sp.spawn_tick_delay, ds.spawn_tick_delay),
        attempts_per_tick:       fill(d, sp.attempts_per_tick, ds.attempts_per_tick),
        search_radius:           fill(d, sp.search_radius, ds.search_radius),
        samples_per_search:      fill(d, sp.samples_per_search, ds.samples_per_search),
        allow_below_sea_level:   fill(d, sp.allow_below_sea_level, ds.allow_below_sea_level),
        despawn_range:           fill(d, sp.despawn_range, ds.despawn_range),
    };

    let pop = section(d, loaded.population);
    let dp = &defaults.population;
    let mut max_active = pop.max_active.unwrap_or_else(|| {
        *d = true;
        BTreeMap::new()
    });
    for (name, &cap) in &dp.max_active {
        if !max_active.contains_key(name) {
            *d = true;
            max_active.insert(name.clone(), cap);
        }
    }
    let population = PopulationConfig {
        max_active_birds: fill(d, pop.max_active_birds, dp.max_active_birds),
        max_active,
    };

    let mut species = BTreeMap::new();
    for (name, partial) in section(d, loaded.species) {
        let base = defaults.species.get(&name).cloned().unwrap_or_default();
        species.insert(name, merge_species(d, partial, &base));
    }
    for (name, default) in &defaults.species {
        if !species.contains_key(name) {
            *d = true;
            species.insert(name.clone(), default.clone());
        }
    }

    let dbg = section(d, loaded.debug);
    let debug = DebugConfig {
        debug_spawning: fill(d, dbg.debug_spawning, defaults.debug.debug_spawning),
        debug_birds:    fill(d, dbg.debug_birds, defaults.debug.debug_birds),
    };

    let seed = fill(d, loaded.seed, defaults.seed);

    Merged {
        config: FaunaConfig { spawning, population, species, debug, seed },
        dirty,
    }
}

fn merge_species(d: &mut bool, p: PartialSpecies, base: &SpeciesConfig) -> SpeciesConfig {
    SpeciesConfig {
        weight:            fill(d, p.weight, base.weight),
        min_pack_size:     fill(d, p.min_pack_size, base.min_pack_size),
        max_pack_size:     fill(d, p.max_pack_size, base.max_pack_size),
        min_light:         fill(d, p.min_light, base.min_light),
        max_light:         fill(d, p.max_light, base.max_light),
        max_spawn_height:  fill(d, p.max_spawn_height, base.max_spawn_height),
        min_flight_height: fill(d, p.min_flight_height, base.min_flight_height),
        max_flight_height: fill(d, p.max_flight_height, base.max_flight_height),
    }
}

fn fill<T>(dirty: &mut bool, value: Option<T>, default: T) -> T {
    value.unwrap_or_else(|| {
        *dirty = true;
        default
    })
}

/// A missing section marks the config dirty and reads as all-missing.
fn section<T: Default>(dirty: &mut bool, value: Option<T>) -> T {
    value.unwrap_or_else(|| {
        *dirty = true;
        T::default()
    })
}
