//! Simulation observer trait for progress reporting and data collection.

use af_agent::AgentRegistry;
use af_behavior::DespawnReason;
use af_core::{AgentId, Tick};

use crate::TickStats;

/// Callbacks invoked by [`Sim::tick`][crate::Sim::tick] at key points in the
/// tick loop.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.
///
/// # Example: population printer
///
/// ```rust,ignore
/// struct Census;
///
/// impl SimObserver for Census {
///     fn on_tick_end(&mut self, tick: Tick, stats: &TickStats) {
///         if tick.is_every(200) {
///             println!("{tick}: {} active", stats.active);
///         }
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called at the very start of each tick, before the spawner runs.
    fn on_tick_start(&mut self, _tick: Tick) {}

    /// Called once per tick in which the spawner placed at least one agent.
    fn on_spawn(&mut self, _tick: Tick, _spawned: &[AgentId]) {}

    /// Called for every agent removed this tick, after it has left the
    /// registry.
    fn on_despawn(&mut self, _tick: Tick, _agent: AgentId, _reason: DespawnReason) {}

    /// Called at the end of each tick.
    fn on_tick_end(&mut self, _tick: Tick, _stats: &TickStats) {}

    /// Called every `snapshot_interval` ticks with read access to every live
    /// agent.
    fn on_snapshot(&mut self, _tick: Tick, _registry: &AgentRegistry) {}
}

/// A [`SimObserver`] that does nothing.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
