//! Unit tests for af-spawn.

use af_agent::{AgentFactory, AgentRegistry, SpeciesCatalog};
use af_core::{DVec3, IVec3, LifecycleState, SimRng, SpeciesId, Tick, WorldId};
use af_world::{Block, PlayerRef, Tag, VoxelWorld, VoxelWorldBuilder};

use crate::{
    AmbientSpawner, Rejection, SiteCheck, SiteRejection, SpawnContext, SpawnError, SpawnOutcome,
    SpawnSpec, SpawnTable, SpawnerSettings, pack_size,
};

// ── Helpers ───────────────────────────────────────────────────────────────────

const CROW: SpeciesId = SpeciesId(0);
const GRASS: Tag = Tag::new("grass_block");

/// A 41×41 grass plane with its top face at y = 64.
fn field() -> VoxelWorldBuilder {
    VoxelWorldBuilder::new().fill(IVec3::new(-20, 63, -20), IVec3::new(20, 63, 20), Block::full(GRASS))
}

fn field_with_player() -> VoxelWorld {
    field().player_at(DVec3::new(0.5, 64.0, 0.5)).build()
}

/// Short range so every search center lands on the field.
fn near_settings() -> SpawnerSettings {
    SpawnerSettings {
        spawn_range: 6.0,
        search_radius: 2,
        ..SpawnerSettings::default()
    }
}

fn crow_spawner(edit: impl FnOnce(&mut SpawnSpec)) -> AmbientSpawner {
    let mut spec = SpawnSpec::crow(CROW);
    edit(&mut spec);
    AmbientSpawner::new(near_settings(), SpawnTable::from_specs([spec]).unwrap()).unwrap()
}

/// Run one spawn round against `world` with a fresh registry capped at
/// `global_cap`.
fn round(
    spawner: &AmbientSpawner,
    world: &VoxelWorld,
    global_cap: usize,
    seed: u64,
) -> (SpawnOutcome, AgentRegistry, AgentFactory) {
    let catalog = SpeciesCatalog::with_defaults();
    let registry = AgentRegistry::from_catalog(&catalog, global_cap);
    let mut factory = AgentFactory::new(seed);
    let mut rng = SimRng::new(seed);
    let ctx = SpawnContext { world, world_id: WorldId::OVERWORLD, registry: &registry, catalog: &catalog };
    let outcome = spawner.spawn_round(&ctx, &mut factory, &mut rng);
    (outcome, registry, factory)
}

// ── SpawnTable ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod table {
    use super::*;

    fn two_species() -> SpawnTable {
        let mut rare = SpawnSpec::crow(SpeciesId(1));
        rare.weight = 10;
        SpawnTable::from_specs([SpawnSpec::crow(CROW), rare]).unwrap()
    }

    #[test]
    fn pick_scans_cumulative_weights() {
        let table = two_species();
        assert_eq!(table.total_weight(), 40);
        assert_eq!(table.pick(0).map(|s| s.species), Some(CROW));
        assert_eq!(table.pick(29).map(|s| s.species), Some(CROW));
        assert_eq!(table.pick(30).map(|s| s.species), Some(SpeciesId(1)));
        assert_eq!(table.pick(39).map(|s| s.species), Some(SpeciesId(1)));
        assert!(table.pick(40).is_none());
    }

    #[test]
    fn zero_weight_never_chosen() {
        let mut spec = SpawnSpec::crow(CROW);
        spec.weight = 0;
        let table = SpawnTable::from_specs([spec]).unwrap();
        let mut rng = SimRng::new(1);
        for _ in 0..50 {
            assert!(table.choose(&mut rng).is_none());
        }
    }

    #[test]
    fn duplicate_species_rejected() {
        let mut table = SpawnTable::with_defaults();
        let err = table.push(SpawnSpec::crow(CROW)).unwrap_err();
        assert!(matches!(err, SpawnError::DuplicateSpecies(s) if s == CROW));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn inverted_pack_range_rejected() {
        let mut spec = SpawnSpec::crow(CROW);
        spec.min_pack = 9;
        assert!(matches!(spec.validate(), Err(SpawnError::InvalidSpec { .. })));
        spec.min_pack = 0;
        assert!(spec.validate().is_err());
    }

    #[test]
    fn upsert_replaces_and_reweighs() {
        let mut table = SpawnTable::with_defaults();
        let mut spec = SpawnSpec::crow(CROW);
        spec.weight = 5;
        table.upsert(spec).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.total_weight(), 5);
    }

    #[test]
    fn catalog_check_finds_unknown_species() {
        let catalog = SpeciesCatalog::with_defaults();
        assert!(SpawnTable::with_defaults().check_catalog(&catalog).is_ok());
        let err = two_species().check_catalog(&catalog).unwrap_err();
        assert!(matches!(err, SpawnError::UnknownSpecies(s) if s == SpeciesId(1)));
    }
}

// ── SiteCheck ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod sites {
    use super::*;

    const GROUND: IVec3 = IVec3::new(0, 63, 0);

    fn check(world: &VoxelWorld, spec: &SpawnSpec, ground: IVec3) -> Result<(), SiteRejection> {
        SiteCheck::new(world, spec, true).check(ground)
    }

    #[test]
    fn open_grass_is_valid() {
        let world = field().build();
        let spec = SpawnSpec::crow(CROW);
        assert_eq!(check(&world, &spec, GROUND), Ok(()));
        assert_eq!(SiteCheck::new(&world, &spec, true).column(0, 0), Some(GROUND));
    }

    #[test]
    fn air_and_wrong_surface_rejected() {
        let world = field().block(IVec3::new(1, 63, 0), Block::full(Tag::new("stone"))).build();
        let spec = SpawnSpec::crow(CROW);
        assert_eq!(check(&world, &spec, GROUND + IVec3::Y), Err(SiteRejection::NoGround));
        assert_eq!(check(&world, &spec, IVec3::new(1, 63, 0)), Err(SiteRejection::GroundTag));

        let mut anything = spec.clone();
        anything.ground_tags.clear();
        assert_eq!(check(&world, &anything, IVec3::new(1, 63, 0)), Ok(()));
    }

    #[test]
    fn covered_ground_rejected() {
        let world = field().block(GROUND + IVec3::Y, Block::passable(Tag::new("short_grass"))).build();
        assert_eq!(check(&world, &SpawnSpec::crow(CROW), GROUND), Err(SiteRejection::Covered));
    }

    #[test]
    fn biome_mismatch_rejected() {
        let world = field().biomes(vec![Tag::new("nether")]).build();
        assert_eq!(check(&world, &SpawnSpec::crow(CROW), GROUND), Err(SiteRejection::Biome));
    }

    #[test]
    fn light_band_measured_above_ground() {
        let world = field().light_at(GROUND + IVec3::Y, 4).build();
        assert_eq!(check(&world, &SpawnSpec::crow(CROW), GROUND), Err(SiteRejection::Light));
    }

    #[test]
    fn spawn_ceiling_enforced() {
        let mut spec = SpawnSpec::crow(CROW);
        spec.max_spawn_height = 60;
        assert_eq!(check(&field().build(), &spec, GROUND), Err(SiteRejection::TooHigh));
    }

    #[test]
    fn sea_level_rule_needs_both_permissions() {
        let world = field().sea_level(70).build();
        let mut spec = SpawnSpec::crow(CROW);
        assert!(SiteCheck::new(&world, &spec, true).is_valid(GROUND));
        assert_eq!(
            SiteCheck::new(&world, &spec, false).check(GROUND),
            Err(SiteRejection::BelowSeaLevel)
        );
        spec.allow_below_sea_level = false;
        assert!(!SiteCheck::new(&world, &spec, true).is_valid(GROUND));
    }

    #[test]
    fn snap_prefers_nearest_ground() {
        let world = field()
            .block(IVec3::new(3, 64, 0), Block::full(GRASS))
            .fill(IVec3::new(5, 64, 0), IVec3::new(5, 66, 0), Block::full(GRASS))
            .build();
        let spec = SpawnSpec::crow(CROW);
        let sites = SiteCheck::new(&world, &spec, true);
        assert_eq!(sites.snap(0, 0, 63), Some(GROUND));
        assert_eq!(sites.snap(3, 0, 63), Some(IVec3::new(3, 64, 0)));
        assert_eq!(sites.snap(5, 0, 63), None);
    }

    #[test]
    fn search_finds_ground_off_center() {
        // Center column is a stone pillar; the grass around it is fine.
        let world = field().block(GROUND, Block::full(Tag::new("stone"))).build();
        let spec = SpawnSpec::crow(CROW);
        let sites = SiteCheck::new(&world, &spec, true);
        let found = sites.search(GROUND, 3, 12, &mut SimRng::new(4)).unwrap();
        assert_ne!(found, GROUND);
        assert_eq!(found.y, 63);
        assert!(sites.search(IVec3::new(500, 63, 500), 3, 12, &mut SimRng::new(4)).is_none());
    }
}

// ── AmbientSpawner ────────────────────────────────────────────────────────────

#[cfg(test)]
mod spawner {
    use super::*;

    #[test]
    fn pack_size_respects_headroom() {
        let mut rng = SimRng::new(9);
        for _ in 0..500 {
            let n = pack_size(3, 8, 5, &mut rng);
            assert!((3..=5).contains(&n), "pack of {n}");
        }
        assert_eq!(pack_size(3, 8, 3, &mut rng), 3);
    }

    #[test]
    fn pack_within_headroom_on_open_field() {
        let spawner = crow_spawner(|_| {});
        let world = field_with_player();
        for seed in 0..20 {
            let (outcome, registry, _) = round(&spawner, &world, 5, seed);
            let SpawnOutcome::Spawned { requested, spawned, .. } = outcome else {
                panic!("seed {seed}: expected a pack, got {outcome:?}");
            };
            assert!((3..=5).contains(&requested));
            assert_eq!(spawned.len() as u32, requested);
            assert_eq!(registry.count(), spawned.len());
        }
    }

    #[test]
    fn pack_members_stand_on_the_field() {
        let spawner = crow_spawner(|_| {});
        let (outcome, registry, _) = round(&spawner, &field_with_player(), 100, 3);
        assert!(!outcome.spawned().is_empty());
        for &id in outcome.spawned() {
            registry
                .with_agent(id, |a| {
                    assert_eq!(a.species, CROW);
                    assert_eq!(a.state, LifecycleState::Flying);
                    assert_eq!(a.position.y, 64.0);
                    assert!(a.position.x.abs() <= 20.5 && a.position.z.abs() <= 20.5);
                })
                .unwrap();
        }
    }

    #[test]
    fn zero_weight_touches_nothing() {
        let spawner = crow_spawner(|s| s.weight = 0);
        let (outcome, registry, factory) = round(&spawner, &field_with_player(), 100, 1);
        assert_eq!(outcome, SpawnOutcome::NothingEligible);
        assert_eq!(registry.count(), 0);
        assert_eq!(factory.created(), 0);
    }

    #[test]
    fn headroom_below_min_pack_rejected() {
        let spawner = crow_spawner(|_| {});
        let (outcome, registry, _) = round(&spawner, &field_with_player(), 2, 1);
        assert_eq!(
            outcome,
            SpawnOutcome::Rejected { species: CROW, reason: Rejection::Headroom { available: 2 } }
        );
        assert_eq!(registry.count(), 0);
    }

    #[test]
    fn weather_gate() {
        let world = field().raining(true).player_at(DVec3::new(0.5, 64.0, 0.5)).build();
        let fair_weather = crow_spawner(|s| s.spawns_in_bad_weather = false);
        let (outcome, _, _) = round(&fair_weather, &world, 100, 1);
        assert!(matches!(outcome, SpawnOutcome::Rejected { reason: Rejection::Weather, .. }));

        let hardy = crow_spawner(|_| {});
        let (outcome, _, _) = round(&hardy, &world, 100, 1);
        assert!(!outcome.spawned().is_empty());
    }

    #[test]
    fn thunder_counts_as_bad_weather() {
        let mut world = field_with_player();
        world.set_thundering(true);
        let spawner = crow_spawner(|s| s.spawns_in_bad_weather = false);
        let (outcome, _, _) = round(&spawner, &world, 100, 1);
        assert!(matches!(outcome, SpawnOutcome::Rejected { reason: Rejection::Weather, .. }));
    }

    #[test]
    fn crows_stay_in_at_night() {
        let world = field().day_time(14_000).player_at(DVec3::new(0.5, 64.0, 0.5)).build();
        let (outcome, registry, _) = round(&crow_spawner(|_| {}), &world, 100, 1);
        assert!(matches!(outcome, SpawnOutcome::Rejected { reason: Rejection::DayPhase, .. }));
        assert_eq!(registry.count(), 0);
    }

    #[test]
    fn spectators_do_not_anchor_spawns() {
        let world = field().player(PlayerRef::spectator(DVec3::new(0.5, 64.0, 0.5))).build();
        let (outcome, _, _) = round(&crow_spawner(|_| {}), &world, 100, 1);
        assert!(matches!(outcome, SpawnOutcome::Rejected { reason: Rejection::NoPlayers, .. }));
    }

    #[test]
    fn barren_surroundings_find_no_site() {
        let world = VoxelWorldBuilder::new().player_at(DVec3::new(0.5, 64.0, 0.5)).build();
        let (outcome, registry, _) = round(&crow_spawner(|_| {}), &world, 100, 1);
        assert_eq!(outcome, SpawnOutcome::NoSite { species: CROW });
        assert_eq!(registry.count(), 0);
    }

    #[test]
    fn only_fires_on_the_interval() {
        let spawner = crow_spawner(|_| {});
        let world = field_with_player();
        let catalog = SpeciesCatalog::with_defaults();
        let registry = AgentRegistry::from_catalog(&catalog, 100);
        let mut factory = AgentFactory::new(0);
        let mut rng = SimRng::new(0);
        let ctx = SpawnContext {
            world: &world,
            world_id: WorldId::OVERWORLD,
            registry: &registry,
            catalog: &catalog,
        };
        assert_eq!(spawner.tick(Tick(1), &ctx, &mut factory, &mut rng), SpawnOutcome::Idle);
        assert_eq!(registry.count(), 0);
        assert!(!spawner.tick(Tick(200), &ctx, &mut factory, &mut rng).spawned().is_empty());
    }

    #[test]
    fn settings_validated() {
        let bad = SpawnerSettings { tick_delay: 0, ..SpawnerSettings::default() };
        assert!(AmbientSpawner::new(bad, SpawnTable::with_defaults()).is_err());
        let bad = SpawnerSettings { spawn_range: -1.0, ..SpawnerSettings::default() };
        assert!(bad.validate().is_err());
    }

    #[test]
    fn seeded_rounds_are_reproducible() {
        let spawner = crow_spawner(|_| {});
        let world = field_with_player();
        let positions = |seed| {
            let (outcome, registry, _) = round(&spawner, &world, 100, seed);
            outcome
                .spawned()
                .iter()
                .filter_map(|&id| registry.with_agent(id, |a| a.position))
                .collect::<Vec<_>>()
        };
        assert_eq!(positions(11), positions(11));
    }
}
