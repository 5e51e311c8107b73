//! meadow — crows over a hand-built meadow.
//!
//! Runs the ambient spawner and the flocking state machine around a single
//! player who walks a slow circle.  Pass a path to a JSON config file to
//! tune it; a missing file is created with the defaults.
//!
//! `RUST_LOG=debug` shows per-agent and spawner diagnostics when the
//! matching debug flags are set in the config.

mod terrain;

use std::collections::BTreeMap;
use std::f64::consts::TAU;
use std::path::Path;
use std::time::Instant;

use anyhow::Result;
use tracing::info;

use af_agent::{AgentRegistry, SpeciesCatalog};
use af_behavior::DespawnReason;
use af_config::{FaunaConfig, load_config_file};
use af_core::{AgentId, DVec3, LifecycleState, Tick, WorldId};
use af_sim::{SimBuilder, SimObserver, TickStats};

use terrain::{GROUND_Y, build_meadow};

// ── Constants ─────────────────────────────────────────────────────────────────

const SIM_TICKS:        u64 = 6_000;
const SNAPSHOT_EVERY:   u64 = 200;
/// Ticks for the player to walk one full circle.
const WALK_PERIOD:      u64 = 2_400;
const WALK_RADIUS:      f64 = 20.0;

// ── Observer ──────────────────────────────────────────────────────────────────

#[derive(Default)]
struct Census {
    spawned:   usize,
    despawned: BTreeMap<&'static str, usize>,
    peak:      usize,
}

impl SimObserver for Census {
    fn on_spawn(&mut self, tick: Tick, spawned: &[AgentId]) {
        self.spawned += spawned.len();
        info!(%tick, count = spawned.len(), "pack spawned");
    }

    fn on_despawn(&mut self, _tick: Tick, _agent: AgentId, reason: DespawnReason) {
        *self.despawned.entry(reason.as_str()).or_default() += 1;
    }

    fn on_tick_end(&mut self, _tick: Tick, stats: &TickStats) {
        self.peak = self.peak.max(stats.active);
    }

    fn on_snapshot(&mut self, tick: Tick, registry: &AgentRegistry) {
        let mut by_state: BTreeMap<&'static str, usize> =
            LifecycleState::ALL.iter().map(|s| (s.as_str(), 0)).collect();
        for view in registry.snapshot(WorldId::OVERWORLD) {
            *by_state.entry(view.state.as_str()).or_default() += 1;
        }
        info!(%tick, total = registry.count(), ?by_state, "census");
    }
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    init_tracing();

    let config = match std::env::args().nth(1) {
        Some(path) => load_config_file(Path::new(&path), &FaunaConfig::default())?,
        None => FaunaConfig::default(),
    };

    println!("=== meadow — atmospheric fauna ===");
    println!(
        "Ticks: {SIM_TICKS}  |  Seed: {}  |  Bird cap: {}",
        config.seed, config.population.max_active_birds
    );

    let mut world = build_meadow();
    let mut sim = SimBuilder::from_config(SpeciesCatalog::with_defaults(), &config)?
        .snapshot_interval(SNAPSHOT_EVERY)
        .build()?;
    let mut census = Census::default();

    let started = Instant::now();
    for t in 0..SIM_TICKS {
        sim.tick(&world, &mut census);
        world.advance_time();
        walk(&mut world, t + 1);
    }
    let elapsed = started.elapsed();

    println!();
    println!("Spawned:  {} of {} created", census.spawned, sim.factory.created());
    println!("Peak:     {}", census.peak);
    println!("Alive:    {}", sim.registry.count());
    for (reason, n) in &census.despawned {
        println!("Removed ({reason}): {n}");
    }
    println!(
        "Wall time: {:.2?} ({:.1} µs/tick)",
        elapsed,
        elapsed.as_secs_f64() * 1e6 / SIM_TICKS as f64
    );
    Ok(())
}

/// Move the player along its circle and turn them to face along it.
fn walk(world: &mut af_world::VoxelWorld, t: u64) {
    let angle = (t % WALK_PERIOD) as f64 / WALK_PERIOD as f64 * TAU;
    if let Some(player) = world.players_mut().first_mut() {
        player.position = DVec3::new(
            angle.cos() * WALK_RADIUS,
            GROUND_Y as f64 + 1.0,
            angle.sin() * WALK_RADIUS,
        );
        player.yaw_degrees = (angle + TAU / 4.0).to_degrees() % 360.0;
    }
}
