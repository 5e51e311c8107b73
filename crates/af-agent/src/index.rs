//! `FlockIndex`: an R-tree over one tick's neighbor snapshot.
//!
//! Built once per tick after the snapshot is taken and shared read-only by
//! every agent's behavior call, turning each neighbor query from a scan over
//! all agents into a radius lookup.

use rstar::{AABB, PointDistance, RTree, RTreeObject};

use af_core::{AgentId, DVec3, LifecycleState, SpeciesId};

use crate::NeighborView;

// ── R-tree entry ──────────────────────────────────────────────────────────────

/// A snapshot slot positioned in 3-D space.
#[derive(Clone)]
struct Entry {
    point: [f64; 3],
    slot: usize,
}

impl RTreeObject for Entry {
    type Envelope = AABB<[f64; 3]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for Entry {
    fn distance_2(&self, point: &[f64; 3]) -> f64 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        let dz = self.point[2] - point[2];
        dx * dx + dy * dy + dz * dz
    }
}

// ── FlockIndex ────────────────────────────────────────────────────────────────

pub struct FlockIndex {
    views: Vec<NeighborView>,
    tree: RTree<Entry>,
}

impl FlockIndex {
    /// Bulk-load an index over `views`.  All views are expected to share one
    /// world partition.
    pub fn build(views: Vec<NeighborView>) -> Self {
        let entries = views
            .iter()
            .enumerate()
            .map(|(slot, v)| Entry { point: v.position.to_array(), slot })
            .collect();
        Self { tree: RTree::bulk_load(entries), views }
    }

    pub fn empty() -> Self {
        Self::build(Vec::new())
    }

    pub fn len(&self) -> usize {
        self.views.len()
    }

    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }

    pub fn views(&self) -> &[NeighborView] {
        &self.views
    }

    pub fn get(&self, id: AgentId) -> Option<&NeighborView> {
        self.views.iter().find(|v| v.id == id)
    }

    /// Same-species agents within `radius` of `center`, excluding `exclude`.
    /// Order is by snapshot slot so results are deterministic.
    pub fn within(
        &self,
        center: DVec3,
        radius: f64,
        species: SpeciesId,
        exclude: AgentId,
    ) -> Vec<&NeighborView> {
        let mut slots: Vec<usize> = self
            .tree
            .locate_within_distance(center.to_array(), radius * radius)
            .map(|e| e.slot)
            .collect();
        slots.sort_unstable();
        slots
            .into_iter()
            .map(|s| &self.views[s])
            .filter(|v| v.id != exclude && v.species == species)
            .collect()
    }

    /// Like [`within`](Self::within), restricted to agents in `state`.
    pub fn within_in_state(
        &self,
        center: DVec3,
        radius: f64,
        species: SpeciesId,
        exclude: AgentId,
        state: LifecycleState,
    ) -> Vec<&NeighborView> {
        let mut out = self.within(center, radius, species, exclude);
        out.retain(|v| v.state == state);
        out
    }
}
