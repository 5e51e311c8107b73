//! Per-species spawn rules and the weighted table the spawner draws from.

use af_agent::SpeciesCatalog;
use af_core::{DayPhase, SimRng, SpeciesId};
use af_world::{Tag, WorldOracle};

use crate::{SpawnError, SpawnResult};

// ── SpawnSpec ─────────────────────────────────────────────────────────────────

/// Where, when and how many of one species may appear.
#[derive(Clone, Debug, PartialEq)]
pub struct SpawnSpec {
    pub species: SpeciesId,
    /// Relative selection weight.  Zero disables the species.
    pub weight: u32,
    pub min_pack: u32,
    pub max_pack: u32,
    /// Inclusive light band measured in the air cell above the ground.
    pub min_light: u8,
    pub max_light: u8,
    /// Highest ground Y a pack may be anchored on.
    pub max_spawn_height: i32,
    pub biome: Tag,
    /// Surfaces a pack may stand on.  Empty accepts any block.
    pub ground_tags: Vec<Tag>,
    pub spawns_in_bad_weather: bool,
    pub spawns_by_day: bool,
    pub spawns_by_night: bool,
    pub allow_below_sea_level: bool,
}

impl SpawnSpec {
    /// Crows: packs of 3–8 on open ground in daylight, rain or shine.
    pub fn crow(species: SpeciesId) -> Self {
        Self {
            species,
            weight: 30,
            min_pack: 3,
            max_pack: 8,
            min_light: 8,
            max_light: 15,
            max_spawn_height: 140,
            biome: Tag::new("overworld"),
            ground_tags: vec![
                Tag::new("grass_block"),
                Tag::new("dirt"),
                Tag::new("coarse_dirt"),
                Tag::new("podzol"),
                Tag::new("farmland"),
                Tag::new("moss_block"),
                Tag::new("snow_block"),
            ],
            spawns_in_bad_weather: true,
            spawns_by_day: true,
            spawns_by_night: false,
            allow_below_sea_level: true,
        }
    }

    pub fn validate(&self) -> SpawnResult<()> {
        let invalid = |reason: &str| SpawnError::InvalidSpec {
            species: self.species,
            reason: reason.to_owned(),
        };
        if self.min_pack == 0 {
            return Err(invalid("min_pack must be at least 1"));
        }
        if self.min_pack > self.max_pack {
            return Err(invalid("min_pack exceeds max_pack"));
        }
        if self.min_light > self.max_light {
            return Err(invalid("min_light exceeds max_light"));
        }
        if self.max_light > 15 {
            return Err(invalid("max_light is above 15"));
        }
        Ok(())
    }

    pub fn allows_ground(&self, tag: &Tag) -> bool {
        self.ground_tags.is_empty() || self.ground_tags.contains(tag)
    }

    pub fn allows_light(&self, level: u8) -> bool {
        (self.min_light..=self.max_light).contains(&level)
    }

    /// Rain and thunder both count as bad weather.
    pub fn allows_weather(&self, world: &dyn WorldOracle) -> bool {
        self.spawns_in_bad_weather || !(world.is_raining() || world.is_thundering())
    }

    pub fn allows_phase(&self, phase: DayPhase) -> bool {
        if phase.is_day() { self.spawns_by_day } else { self.spawns_by_night }
    }
}

// ── SpawnTable ────────────────────────────────────────────────────────────────

/// One [`SpawnSpec`] per species, drawn by weight.
#[derive(Clone, Debug, Default)]
pub struct SpawnTable {
    specs: Vec<SpawnSpec>,
    total_weight: u64,
}

impl SpawnTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// A table with the crow preset for species 0.
    pub fn with_defaults() -> Self {
        Self {
            total_weight: 30,
            specs: vec![SpawnSpec::crow(SpeciesId(0))],
        }
    }

    pub fn from_specs(specs: impl IntoIterator<Item = SpawnSpec>) -> SpawnResult<Self> {
        let mut table = Self::new();
        for spec in specs {
            table.push(spec)?;
        }
        Ok(table)
    }

    /// Add a validated spec.  A species may appear only once.
    pub fn push(&mut self, spec: SpawnSpec) -> SpawnResult<()> {
        spec.validate()?;
        if self.get(spec.species).is_some() {
            return Err(SpawnError::DuplicateSpecies(spec.species));
        }
        self.total_weight += u64::from(spec.weight);
        self.specs.push(spec);
        Ok(())
    }

    /// Replace the spec for `spec.species`, or add it.
    pub fn upsert(&mut self, spec: SpawnSpec) -> SpawnResult<()> {
        spec.validate()?;
        match self.specs.iter_mut().find(|s| s.species == spec.species) {
            Some(slot) => *slot = spec,
            None => self.specs.push(spec),
        }
        self.total_weight = self.specs.iter().map(|s| u64::from(s.weight)).sum();
        Ok(())
    }

    /// Fails on the first spec whose species the catalog does not know.
    pub fn check_catalog(&self, catalog: &SpeciesCatalog) -> SpawnResult<()> {
        match self.specs.iter().find(|s| catalog.get(s.species).is_none()) {
            Some(spec) => Err(SpawnError::UnknownSpecies(spec.species)),
            None => Ok(()),
        }
    }

    pub fn get(&self, species: SpeciesId) -> Option<&SpawnSpec> {
        self.specs.iter().find(|s| s.species == species)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SpawnSpec> {
        self.specs.iter()
    }

    pub fn total_weight(&self) -> u64 {
        self.total_weight
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    /// Draw a spec with probability proportional to its weight.  `None`
    /// when every weight is zero; the RNG is not advanced in that case.
    pub fn choose(&self, rng: &mut SimRng) -> Option<&SpawnSpec> {
        if self.total_weight == 0 {
            return None;
        }
        self.pick(rng.gen_range(0..self.total_weight))
    }

    /// The spec whose cumulative weight band contains `roll`.
    pub fn pick(&self, roll: u64) -> Option<&SpawnSpec> {
        let mut cumulative = 0u64;
        self.specs.iter().find(|spec| {
            cumulative += u64::from(spec.weight);
            roll < cumulative
        })
    }
}
