//! Read-only simulation state passed to every behavior callback.

use af_agent::{FlockIndex, SpeciesCatalog, SpeciesParams};
use af_core::{SpeciesId, Tick};
use af_world::{PlayerRef, WorldOracle};

/// A read-only snapshot of the world and the flock, built once per tick by
/// the driver and shared by every agent's [`BehaviorModel`][crate::BehaviorModel]
/// call.
///
/// # Lifetimes
///
/// All borrows live for one tick's behavior phase.  The neighbor index is
/// taken before any agent moves, so every agent sees the same flock state
/// regardless of processing order.
pub struct TickContext<'a> {
    pub tick: Tick,
    pub world: &'a dyn WorldOracle,
    pub flock: &'a FlockIndex,
    pub catalog: &'a SpeciesCatalog,
    /// Every player in the world, spectators included.
    pub players: &'a [PlayerRef],
    pub camera_yaw: Option<f64>,
    /// Emit per-agent diagnostics.
    pub debug: bool,
}

impl<'a> TickContext<'a> {
    #[inline]
    pub fn new(
        tick:    Tick,
        world:   &'a dyn WorldOracle,
        flock:   &'a FlockIndex,
        catalog: &'a SpeciesCatalog,
        players: &'a [PlayerRef],
    ) -> Self {
        Self {
            tick,
            world,
            flock,
            catalog,
            players,
            camera_yaw: world.camera_yaw(),
            debug: false,
        }
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    #[inline]
    pub fn species(&self, id: SpeciesId) -> Option<&'a SpeciesParams> {
        self.catalog.get(id)
    }

    /// Players that can startle agents.
    pub fn participants(&self) -> impl Iterator<Item = &'a PlayerRef> {
        self.players.iter().filter(|p| !p.spectator)
    }
}
