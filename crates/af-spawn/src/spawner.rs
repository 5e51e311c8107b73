//! The ambient spawner: periodic weighted pack spawns near players.

use std::f64::consts::TAU;

use af_agent::{AgentFactory, AgentRegistry, SpeciesCatalog};
use af_core::space::cell_top_center;
use af_core::{AgentId, IVec3, SimRng, SpeciesId, Tick, WorldId};
use af_world::{PlayerRef, WorldOracle};
use tracing::debug;

use crate::{SiteCheck, SpawnError, SpawnResult, SpawnSpec, SpawnTable};

/// Placement attempts allowed per requested pack member.
pub const PLACEMENTS_PER_MEMBER: u32 = 8;

/// Horizontal reach of a pack member's offset from the anchor.
pub const PACK_SPREAD: i32 = 2;

// ── SpawnerSettings ───────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct SpawnerSettings {
    /// Outer radius of the annulus search centers are drawn from; the inner
    /// radius is half of it.
    pub spawn_range: f64,
    /// Ticks between spawn rounds.
    pub tick_delay: u64,
    pub attempts_per_tick: u32,
    pub search_radius: i32,
    pub samples_per_search: u32,
    pub allow_below_sea_level: bool,
    /// Log rejections, empty searches and partial packs.
    pub debug: bool,
}

impl Default for SpawnerSettings {
    fn default() -> Self {
        Self {
            spawn_range: 48.0,
            tick_delay: 200,
            attempts_per_tick: 8,
            search_radius: 6,
            samples_per_search: 12,
            allow_below_sea_level: true,
            debug: false,
        }
    }
}

impl SpawnerSettings {
    pub fn validate(&self) -> SpawnResult<()> {
        if !self.spawn_range.is_finite() || self.spawn_range <= 0.0 {
            return Err(SpawnError::InvalidSettings(format!(
                "spawn_range must be positive, got {}",
                self.spawn_range
            )));
        }
        if self.tick_delay == 0 {
            return Err(SpawnError::InvalidSettings("tick_delay must be at least 1".into()));
        }
        if self.search_radius < 0 {
            return Err(SpawnError::InvalidSettings(format!(
                "search_radius must not be negative, got {}",
                self.search_radius
            )));
        }
        Ok(())
    }
}

// ── Outcome ───────────────────────────────────────────────────────────────────

/// Why a drawn species was not spawned this round.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Rejection {
    /// Headroom is below the minimum pack size.
    Headroom { available: usize },
    Weather,
    DayPhase,
    NoPlayers,
}

#[derive(Clone, PartialEq, Debug)]
pub enum SpawnOutcome {
    /// Not a spawn tick.
    Idle,
    /// Every species weight is zero.
    NothingEligible,
    Rejected { species: SpeciesId, reason: Rejection },
    /// Every attempt's search came up empty.
    NoSite { species: SpeciesId },
    /// An anchor was found.  `spawned` may hold fewer agents than
    /// `requested`, or none at all.
    Spawned {
        species: SpeciesId,
        anchor: IVec3,
        requested: u32,
        spawned: Vec<AgentId>,
    },
}

impl SpawnOutcome {
    /// Agents added to the registry this round.
    pub fn spawned(&self) -> &[AgentId] {
        match self {
            SpawnOutcome::Spawned { spawned, .. } => spawned,
            _ => &[],
        }
    }
}

// ── SpawnContext ──────────────────────────────────────────────────────────────

/// What one spawn round reads and writes.
pub struct SpawnContext<'a> {
    pub world: &'a dyn WorldOracle,
    pub world_id: WorldId,
    pub registry: &'a AgentRegistry,
    pub catalog: &'a SpeciesCatalog,
}

// ── AmbientSpawner ────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct AmbientSpawner {
    settings: SpawnerSettings,
    table: SpawnTable,
}

impl AmbientSpawner {
    pub fn new(settings: SpawnerSettings, table: SpawnTable) -> SpawnResult<Self> {
        settings.validate()?;
        Ok(Self { settings, table })
    }

    pub fn settings(&self) -> &SpawnerSettings {
        &self.settings
    }

    pub fn table(&self) -> &SpawnTable {
        &self.table
    }

    /// Run a spawn round if `now` falls on the spawn interval.
    pub fn tick(
        &self,
        now: Tick,
        ctx: &SpawnContext<'_>,
        factory: &mut AgentFactory,
        rng: &mut SimRng,
    ) -> SpawnOutcome {
        if !now.is_every(self.settings.tick_delay) {
            return SpawnOutcome::Idle;
        }
        self.spawn_round(ctx, factory, rng)
    }

    /// Draw a species and try to place one pack of it, regardless of the
    /// spawn interval.
    pub fn spawn_round(
        &self,
        ctx: &SpawnContext<'_>,
        factory: &mut AgentFactory,
        rng: &mut SimRng,
    ) -> SpawnOutcome {
        let Some(spec) = self.table.choose(rng) else {
            return SpawnOutcome::NothingEligible;
        };
        let outcome = self.try_spawn(spec, ctx, factory, rng);
        if self.settings.debug {
            log_outcome(&outcome);
        }
        outcome
    }

    fn try_spawn(
        &self,
        spec: &SpawnSpec,
        ctx: &SpawnContext<'_>,
        factory: &mut AgentFactory,
        rng: &mut SimRng,
    ) -> SpawnOutcome {
        let species = spec.species;
        let reject = |reason| SpawnOutcome::Rejected { species, reason };

        let available = ctx.registry.headroom(species);
        if available < spec.min_pack as usize {
            return reject(Rejection::Headroom { available });
        }
        if !spec.allows_weather(ctx.world) {
            return reject(Rejection::Weather);
        }
        if !spec.allows_phase(ctx.world.day_phase()) {
            return reject(Rejection::DayPhase);
        }
        let players: Vec<PlayerRef> = ctx.world.players().into_iter().filter(|p| !p.spectator).collect();
        if players.is_empty() {
            return reject(Rejection::NoPlayers);
        }

        let sites = SiteCheck::new(ctx.world, spec, self.settings.allow_below_sea_level);
        for _ in 0..self.settings.attempts_per_tick {
            let Some(player) = rng.choose(&players) else { break };
            let center = self.search_center(player, rng);
            let found = sites.search(
                center,
                self.settings.search_radius,
                self.settings.samples_per_search,
                rng,
            );
            if let Some(anchor) = found {
                let requested = pack_size(spec.min_pack, spec.max_pack, available, rng);
                let spawned = place_pack(&sites, anchor, requested, spec, ctx, factory, rng);
                return SpawnOutcome::Spawned { species, anchor, requested, spawned };
            }
        }
        SpawnOutcome::NoSite { species }
    }

    /// A random cell on the annulus `[range/2, range]` around `player`.
    fn search_center(&self, player: &PlayerRef, rng: &mut SimRng) -> IVec3 {
        let range = self.settings.spawn_range;
        let angle = rng.unit() * TAU;
        let dist = rng.gen_range(range * 0.5..=range);
        let p = player.position;
        IVec3::new(
            (p.x + angle.cos() * dist).floor() as i32,
            p.y.floor() as i32,
            (p.z + angle.sin() * dist).floor() as i32,
        )
    }
}

/// Uniform in `[min, min(max, headroom)]`, never below `min`.
pub fn pack_size(min: u32, max: u32, headroom: usize, rng: &mut SimRng) -> u32 {
    let room = u32::try_from(headroom).unwrap_or(u32::MAX);
    let upper = max.min(room).max(min);
    rng.gen_range(min..=upper)
}

fn place_pack(
    sites: &SiteCheck<'_>,
    anchor: IVec3,
    requested: u32,
    spec: &SpawnSpec,
    ctx: &SpawnContext<'_>,
    factory: &mut AgentFactory,
    rng: &mut SimRng,
) -> Vec<AgentId> {
    let mut spawned = Vec::with_capacity(requested as usize);
    for _ in 0..requested.saturating_mul(PLACEMENTS_PER_MEMBER) {
        if spawned.len() as u32 >= requested {
            break;
        }
        let x = anchor.x + rng.gen_range(-PACK_SPREAD..=PACK_SPREAD);
        let z = anchor.z + rng.gen_range(-PACK_SPREAD..=PACK_SPREAD);
        let Some(ground) = sites.snap(x, z, anchor.y) else { continue };
        let position = cell_top_center(ground);
        match factory.spawn_into(ctx.registry, ctx.catalog, spec.species, ctx.world_id, position) {
            Some(id) => spawned.push(id),
            // A cap filled up under us; later placements would be refused too.
            None => break,
        }
    }
    spawned
}

fn log_outcome(outcome: &SpawnOutcome) {
    match outcome {
        SpawnOutcome::Idle | SpawnOutcome::NothingEligible => {}
        SpawnOutcome::Rejected { species, reason } => {
            debug!(%species, ?reason, "spawn rejected");
        }
        SpawnOutcome::NoSite { species } => {
            debug!(%species, "no valid spawn site near any player");
        }
        SpawnOutcome::Spawned { species, anchor, requested, spawned } => {
            if (spawned.len() as u32) < *requested {
                debug!(%species, %anchor, requested, placed = spawned.len(), "partial pack");
            } else {
                debug!(%species, %anchor, placed = spawned.len(), "pack spawned");
            }
        }
    }
}
