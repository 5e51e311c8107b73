//! The `Sim` struct and its tick loop.

use std::sync::Arc;

use af_agent::{Agent, AgentFactory, AgentRegistry, FlockIndex, SpeciesCatalog};
use af_behavior::{BehaviorModel, DespawnReason, Intent, TickContext};
use af_core::space::horizontal_len;
use af_core::{AgentId, DVec3, SimRng, Tick, WorldId};
use af_spawn::{AmbientSpawner, SpawnContext};
use af_world::{PlayerRef, WorldOracle};
use tracing::debug;

use crate::SimObserver;

/// Counts for one completed tick.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct TickStats {
    /// Agents the spawner registered.
    pub spawned: usize,
    /// Agents removed for any reason.
    pub despawned: usize,
    /// Agents that ran their behavior.
    pub ticked: usize,
    /// Live agents in this world once the tick is over.
    pub active: usize,
}

// ── Sim ───────────────────────────────────────────────────────────────────────

/// The per-world simulation driver.
///
/// Each call to [`tick`][Self::tick] runs, in order:
///
/// 1. **Spawn**: the ambient spawner, on its interval.
/// 2. **Cull**: agents farther than `despawn_range` from every participating
///    player are removed.  Skipped while no player is present.
/// 3. **Snapshot**: a [`FlockIndex`] over every agent in this world.
/// 4. **Behavior phase** (optionally parallel with the `parallel` feature):
///    each agent's species behavior runs against the snapshot.
/// 5. **Apply phase** (sequential, arena order): cross-agent intents are
///    delivered, then self-removals happen.
///
/// Create via [`SimBuilder`][crate::SimBuilder].
pub struct Sim {
    /// The world partition this driver owns.
    pub world_id: WorldId,

    /// Shared with any other code that spawns or removes agents.
    pub registry: Arc<AgentRegistry>,

    pub catalog: SpeciesCatalog,

    pub spawner: AmbientSpawner,

    pub factory: AgentFactory,

    /// Indexed by `SpeciesId`.
    pub(crate) behaviors: Vec<Box<dyn BehaviorModel>>,

    pub(crate) rng: SimRng,

    pub(crate) now: Tick,

    pub despawn_range: f64,

    /// Per-agent diagnostics from the behavior models.
    pub debug_agents: bool,

    /// Call `on_snapshot` every this many ticks; zero disables it.
    pub snapshot_interval: u64,
}

impl Sim {
    // ── Public API ────────────────────────────────────────────────────────

    /// The tick the next call to [`tick`][Self::tick] will run.
    pub fn now(&self) -> Tick {
        self.now
    }

    /// Run one tick against `world`.
    pub fn tick<O: SimObserver>(&mut self, world: &dyn WorldOracle, observer: &mut O) -> TickStats {
        let now = self.now;
        observer.on_tick_start(now);

        let mut stats = TickStats::default();

        // ── Phase 1: ambient spawning ─────────────────────────────────────
        let spawn_ctx = SpawnContext {
            world,
            world_id: self.world_id,
            registry: &self.registry,
            catalog: &self.catalog,
        };
        let outcome = self.spawner.tick(now, &spawn_ctx, &mut self.factory, &mut self.rng);
        let spawned = outcome.spawned();
        if !spawned.is_empty() {
            stats.spawned = spawned.len();
            observer.on_spawn(now, spawned);
        }

        // ── Phase 2: range culling ────────────────────────────────────────
        let players = world.players();
        for id in self.cull_out_of_range(&players) {
            stats.despawned += 1;
            observer.on_despawn(now, id, DespawnReason::OutOfRange);
        }

        // ── Phase 3: neighbor snapshot ────────────────────────────────────
        //
        // Taken before any agent moves so flocking does not depend on the
        // order agents are processed in.
        let flock = FlockIndex::build(self.registry.snapshot(self.world_id));

        // ── Phase 4 + 5: behavior, then apply ─────────────────────────────
        let ctx = TickContext::new(now, world, &flock, &self.catalog, &players)
            .with_debug(self.debug_agents);
        let (ticked, removed) = self.behave_and_apply(&ctx);
        stats.ticked = ticked;
        for (id, reason) in removed {
            stats.despawned += 1;
            observer.on_despawn(now, id, reason);
        }

        stats.active = self.registry.snapshot(self.world_id).len();
        observer.on_tick_end(now, &stats);
        if self.snapshot_interval > 0 && now.is_every(self.snapshot_interval) {
            observer.on_snapshot(now, &self.registry);
        }

        self.now = now.next();
        stats
    }

    /// Run exactly `n` ticks against an unchanging `world`.
    pub fn run_ticks<O: SimObserver>(&mut self, n: u64, world: &dyn WorldOracle, observer: &mut O) -> TickStats {
        let mut total = TickStats::default();
        for _ in 0..n {
            let stats = self.tick(world, observer);
            total.spawned += stats.spawned;
            total.despawned += stats.despawned;
            total.ticked += stats.ticked;
            total.active = stats.active;
        }
        total
    }

    // ── Core tick processing ──────────────────────────────────────────────

    /// Remove agents with no participating player within `despawn_range`
    /// horizontally.  Nothing is culled while no player is present.
    fn cull_out_of_range(&self, players: &[PlayerRef]) -> Vec<AgentId> {
        let anchors: Vec<DVec3> = players.iter().filter(|p| !p.spectator).map(|p| p.position).collect();
        if anchors.is_empty() {
            return Vec::new();
        }
        let range = self.despawn_range;
        let mut guard = self.registry.write();
        let far: Vec<AgentId> = guard
            .iter_mut()
            .filter(|(_, a)| a.world == self.world_id)
            .filter(|(_, a)| anchors.iter().all(|&p| horizontal_len(a.position - p) > range))
            .map(|(id, _)| id)
            .collect();
        for &id in &far {
            guard.remove(id);
            if self.debug_agents {
                debug!(agent = %id, "out of range of every player, removing");
            }
        }
        far
    }

    /// Tick every agent in this world, deliver intents, and remove agents
    /// that asked to leave.  Returns the number ticked and the removals.
    fn behave_and_apply(&self, ctx: &TickContext<'_>) -> (usize, Vec<(AgentId, DespawnReason)>) {
        let behaviors = self.behaviors.as_slice();
        let mut guard = self.registry.write();

        let mut batch: Vec<(AgentId, &mut Agent)> = guard
            .iter_mut()
            .filter(|(_, a)| a.world == self.world_id)
            .collect();
        let ticked = batch.len();

        let run = |(id, agent): &mut (AgentId, &mut Agent)| -> (AgentId, Vec<Intent>) {
            let intents = match behaviors.get(agent.species.index()) {
                Some(behavior) => behavior.tick(&mut **agent, ctx),
                None => Vec::new(),
            };
            (*id, intents)
        };

        #[cfg(not(feature = "parallel"))]
        let intents: Vec<(AgentId, Vec<Intent>)> = batch.iter_mut().map(run).collect();

        #[cfg(feature = "parallel")]
        let intents: Vec<(AgentId, Vec<Intent>)> = {
            use rayon::prelude::*;
            batch.par_iter_mut().map(run).collect()
        };

        drop(batch);

        // ── Apply phase ───────────────────────────────────────────────────
        //
        // Arena order, regardless of how the behavior phase was scheduled.
        let mut removals = Vec::new();
        for (from, agent_intents) in intents {
            for intent in agent_intents {
                match intent {
                    Intent::Despawn(reason) => removals.push((from, reason)),
                    other => {
                        if let Some(recipient) = other.recipient().and_then(|to| guard.get_mut(to)) {
                            other.apply_to(recipient);
                        }
                    }
                }
            }
        }

        removals.retain(|&(id, _)| guard.remove(id).is_some());
        (ticked, removals)
    }
}
