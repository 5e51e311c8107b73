//! `AgentRegistry`: the shared set of live agents with population caps.
//!
//! # Storage
//!
//! Agents live in a `SlotMap<AgentId, Agent>`.  Handles are generational, so
//! an id held past its agent's removal misses instead of reaching a newer
//! agent that reused the slot.
//!
//! # Concurrency
//!
//! All state sits behind one `RwLock`.  Queries take the read side; insert,
//! remove and the simulation's per-tick mutation take the write side.  Counts
//! change only together with the arena, inside the same critical section, so
//! no observer sees an agent without its count or vice versa.  A poisoned
//! lock is recovered rather than propagated; the arena and counters are
//! updated in an order that leaves them consistent at every panic point.

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use af_core::{AgentId, DVec3, IVec3, LifecycleState, SpeciesId, WorldId};
use slotmap::SlotMap;
use tracing::trace;

use crate::{Agent, SpeciesCatalog};

// ── NeighborView ──────────────────────────────────────────────────────────────

/// Point-in-time copy of the fields other agents may read.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct NeighborView {
    pub id: AgentId,
    pub species: SpeciesId,
    pub world: WorldId,
    pub position: DVec3,
    pub velocity: DVec3,
    pub state: LifecycleState,
    pub perch: Option<IVec3>,
}

impl NeighborView {
    pub fn of(agent: &Agent) -> Self {
        Self {
            id: agent.id,
            species: agent.species,
            world: agent.world,
            position: agent.position,
            velocity: agent.velocity,
            state: agent.state,
            perch: agent.perch,
        }
    }
}

// ── AgentRegistry ─────────────────────────────────────────────────────────────

struct Inner {
    agents: SlotMap<AgentId, Agent>,
    per_species: Vec<usize>,
    species_caps: Vec<Option<usize>>,
    global_cap: usize,
}

impl Inner {
    fn species_count(&self, species: SpeciesId) -> usize {
        self.per_species.get(species.index()).copied().unwrap_or(0)
    }

    fn species_cap(&self, species: SpeciesId) -> Option<usize> {
        self.species_caps.get(species.index()).copied().flatten()
    }

    fn headroom(&self, species: SpeciesId) -> usize {
        let global = self.global_cap.saturating_sub(self.agents.len());
        match self.species_cap(species) {
            Some(cap) => global.min(cap.saturating_sub(self.species_count(species))),
            None => global,
        }
    }

    fn remove(&mut self, id: AgentId) -> Option<Agent> {
        let agent = self.agents.remove(id)?;
        if let Some(n) = self.per_species.get_mut(agent.species.index()) {
            *n = n.saturating_sub(1);
        }
        Some(agent)
    }
}

/// Thread-safe registry of live agents.  Share it with `Arc<AgentRegistry>`.
///
/// Species without an explicit cap are bounded by the global cap alone.
pub struct AgentRegistry {
    inner: RwLock<Inner>,
}

impl AgentRegistry {
    pub fn new(global_cap: usize) -> Self {
        Self {
            inner: RwLock::new(Inner {
                agents: SlotMap::with_key(),
                per_species: Vec::new(),
                species_caps: Vec::new(),
                global_cap,
            }),
        }
    }

    /// Registry whose per-species caps come from each species' `max_active`.
    pub fn from_catalog(catalog: &SpeciesCatalog, global_cap: usize) -> Self {
        let registry = Self::new(global_cap);
        for (id, params) in catalog.iter() {
            registry.set_species_cap(id, params.max_active);
        }
        registry
    }

    fn read(&self) -> RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_inner(&self) -> RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    // ── Caps ──────────────────────────────────────────────────────────────

    pub fn set_global_cap(&self, cap: usize) {
        self.write_inner().global_cap = cap;
    }

    /// Lowering a cap below the live count never evicts anyone; it only
    /// blocks further registrations.
    pub fn set_species_cap(&self, species: SpeciesId, cap: usize) {
        let mut inner = self.write_inner();
        let i = species.index();
        if inner.species_caps.len() <= i {
            inner.species_caps.resize(i + 1, None);
        }
        inner.species_caps[i] = Some(cap);
    }

    pub fn global_cap(&self) -> usize {
        self.read().global_cap
    }

    pub fn species_cap(&self, species: SpeciesId) -> Option<usize> {
        self.read().species_cap(species)
    }

    // ── Membership ────────────────────────────────────────────────────────

    /// Insert `agent` unless its species or the global population is at cap.
    ///
    /// On refusal nothing is inserted, no count changes, and the agent is
    /// dropped.  On success the agent's `id` field is set to its handle.
    pub fn register(&self, agent: Agent) -> Option<AgentId> {
        let mut inner = self.write_inner();
        let species = agent.species;
        if inner.headroom(species) == 0 {
            trace!(%species, total = inner.agents.len(), "registry at cap, agent refused");
            return None;
        }
        let id = inner.agents.insert_with_key(|id| Agent { id, ..agent });
        let i = species.index();
        if inner.per_species.len() <= i {
            inner.per_species.resize(i + 1, 0);
        }
        inner.per_species[i] += 1;
        Some(id)
    }

    /// Remove an agent and decrement its counts.  A second call with the
    /// same id returns `None` and changes nothing.
    pub fn unregister(&self, id: AgentId) -> Option<Agent> {
        self.write_inner().remove(id)
    }

    pub fn contains(&self, id: AgentId) -> bool {
        self.read().agents.contains_key(id)
    }

    pub fn count(&self) -> usize {
        self.read().agents.len()
    }

    pub fn count_species(&self, species: SpeciesId) -> usize {
        self.read().species_count(species)
    }

    /// How many more agents of `species` could be registered right now.
    pub fn headroom(&self, species: SpeciesId) -> usize {
        self.read().headroom(species)
    }

    /// Drop every agent and reset all counts.  Caps are kept.
    pub fn clear(&self) {
        let mut inner = self.write_inner();
        inner.agents.clear();
        inner.per_species.iter_mut().for_each(|n| *n = 0);
    }

    // ── Queries ───────────────────────────────────────────────────────────

    /// Read-only view of one agent.
    pub fn view(&self, id: AgentId) -> Option<NeighborView> {
        self.read().agents.get(id).map(NeighborView::of)
    }

    /// Run `f` against one agent under the read lock.
    pub fn with_agent<R>(&self, id: AgentId, f: impl FnOnce(&Agent) -> R) -> Option<R> {
        self.read().agents.get(id).map(f)
    }

    /// Other live agents of the same species in `world` within `radius` of
    /// agent `id`.  Empty if `id` is not registered.
    pub fn neighbors_within(&self, world: WorldId, id: AgentId, radius: f64) -> Vec<NeighborView> {
        let inner = self.read();
        let Some(me) = inner.agents.get(id) else {
            return Vec::new();
        };
        let r2 = radius * radius;
        inner
            .agents
            .iter()
            .filter(|&(other, a)| {
                other != id
                    && a.world == world
                    && a.species == me.species
                    && a.position.distance_squared(me.position) <= r2
            })
            .map(|(_, a)| NeighborView::of(a))
            .collect()
    }

    /// Views of every agent in `world`, in arena order.
    pub fn snapshot(&self, world: WorldId) -> Vec<NeighborView> {
        self.read()
            .agents
            .values()
            .filter(|a| a.world == world)
            .map(NeighborView::of)
            .collect()
    }

    /// Exclusive access for the tick driver.
    pub fn write(&self) -> RegistryWrite<'_> {
        RegistryWrite { inner: self.write_inner() }
    }
}

impl std::fmt::Debug for AgentRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.read();
        f.debug_struct("AgentRegistry")
            .field("count", &inner.agents.len())
            .field("global_cap", &inner.global_cap)
            .finish()
    }
}

// ── RegistryWrite ─────────────────────────────────────────────────────────────

/// Write guard handed to the tick driver.  Removal through the guard keeps
/// counts in step exactly like [`AgentRegistry::unregister`].
pub struct RegistryWrite<'a> {
    inner: RwLockWriteGuard<'a, Inner>,
}

impl RegistryWrite<'_> {
    pub fn get(&self, id: AgentId) -> Option<&Agent> {
        self.inner.agents.get(id)
    }

    pub fn get_mut(&mut self, id: AgentId) -> Option<&mut Agent> {
        self.inner.agents.get_mut(id)
    }

    pub fn iter_mut(&mut self) -> slotmap::basic::IterMut<'_, AgentId, Agent> {
        self.inner.agents.iter_mut()
    }

    pub fn remove(&mut self, id: AgentId) -> Option<Agent> {
        self.inner.remove(id)
    }

    pub fn len(&self) -> usize {
        self.inner.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.agents.is_empty()
    }
}
