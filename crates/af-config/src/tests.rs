//! Unit tests for af-config.

use std::io::Cursor;

use af_agent::SpeciesCatalog;
use af_core::SpeciesId;

use crate::{
    ConfigError, FaunaConfig, SpeciesConfig, load_config_file, load_config_reader, save_config_file,
    save_config_writer,
};

/// A config where every value differs from the defaults.
fn tuned() -> FaunaConfig {
    let mut c = FaunaConfig::default();
    c.spawning.spawn_range_from_player = 32.0;
    c.spawning.spawn_tick_delay = 120;
    c.spawning.attempts_per_tick = 4;
    c.spawning.search_radius = 9;
    c.spawning.samples_per_search = 20;
    c.spawning.allow_below_sea_level = false;
    c.spawning.despawn_range = 96.0;
    c.population.max_active_birds = 40;
    c.population.max_active.insert("crow".into(), 25);
    c.species.insert(
        "crow".into(),
        SpeciesConfig {
            weight: 12,
            min_pack_size: 2,
            max_pack_size: 4,
            min_light: 10,
            max_light: 14,
            max_spawn_height: 100,
            min_flight_height: 4.0,
            max_flight_height: 60.0,
        },
    );
    c.debug.debug_spawning = true;
    c.debug.debug_birds = true;
    c.seed = 99;
    c
}

#[cfg(test)]
mod merging {
    use super::*;

    #[test]
    fn complete_file_is_clean() {
        let mut buf = Vec::new();
        save_config_writer(&mut buf, &tuned()).unwrap();
        let merged = load_config_reader(Cursor::new(buf), &FaunaConfig::default()).unwrap();
        assert!(!merged.dirty);
        assert_eq!(merged.config, tuned());
    }

    #[test]
    fn missing_fields_filled_and_flagged() {
        let json = r#"{ "spawning": { "spawn_tick_delay": 50 }, "seed": 7 }"#;
        let merged = load_config_reader(Cursor::new(json), &FaunaConfig::default()).unwrap();
        assert!(merged.dirty);

        let mut expected = FaunaConfig::default();
        expected.spawning.spawn_tick_delay = 50;
        expected.seed = 7;
        assert_eq!(merged.config, expected);
    }

    #[test]
    fn explicit_null_counts_as_missing() {
        let json = r#"{ "debug": { "debug_spawning": null, "debug_birds": true } }"#;
        let merged = load_config_reader(Cursor::new(json), &FaunaConfig::default()).unwrap();
        assert!(merged.dirty);
        assert!(!merged.config.debug.debug_spawning);
        assert!(merged.config.debug.debug_birds);
    }

    #[test]
    fn empty_document_is_all_defaults() {
        for text in ["", "null", "{}"] {
            let merged = load_config_reader(Cursor::new(text), &FaunaConfig::default()).unwrap();
            assert!(merged.dirty, "{text:?}");
            assert_eq!(merged.config, FaunaConfig::default());
        }
    }

    #[test]
    fn partial_species_entry_keeps_its_values() {
        let json = r#"{ "species": { "crow": { "max_pack_size": 5 } } }"#;
        let merged = load_config_reader(Cursor::new(json), &FaunaConfig::default()).unwrap();
        let crow = &merged.config.species["crow"];
        assert_eq!(crow.max_pack_size, 5);
        assert_eq!(crow.min_pack_size, 3);
        assert!(merged.dirty);
    }

    #[test]
    fn malformed_json_is_an_error() {
        let err = load_config_reader(Cursor::new("{ spawning: "), &FaunaConfig::default()).unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }
}

#[cfg(test)]
mod applying {
    use super::*;

    #[test]
    fn round_trip_reproduces_runtime_values() {
        let mut buf = Vec::new();
        save_config_writer(&mut buf, &tuned()).unwrap();
        let reloaded = load_config_reader(Cursor::new(buf), &FaunaConfig::default()).unwrap().config;

        assert_eq!(reloaded.spawner_settings(), tuned().spawner_settings());

        let mut a = SpeciesCatalog::with_defaults();
        let mut b = SpeciesCatalog::with_defaults();
        tuned().apply_to_catalog(&mut a).unwrap();
        reloaded.apply_to_catalog(&mut b).unwrap();
        assert_eq!(a.get(SpeciesId(0)), b.get(SpeciesId(0)));

        let ta = tuned().spawn_table(&a).unwrap();
        let tb = reloaded.spawn_table(&b).unwrap();
        assert_eq!(ta.get(SpeciesId(0)), tb.get(SpeciesId(0)));
    }

    #[test]
    fn settings_and_species_land_where_expected() {
        let config = tuned();
        let settings = config.spawner_settings();
        assert_eq!(settings.spawn_range, 32.0);
        assert_eq!(settings.tick_delay, 120);
        assert!(settings.debug);

        let mut catalog = SpeciesCatalog::with_defaults();
        config.apply_to_catalog(&mut catalog).unwrap();
        let crow = catalog.get(SpeciesId(0)).unwrap();
        assert_eq!(crow.max_active, 25);
        assert_eq!(crow.min_flight_height, 4.0);
        assert_eq!(crow.max_flight_height, 60.0);

        let table = config.spawn_table(&catalog).unwrap();
        let spec = table.get(SpeciesId(0)).unwrap();
        assert_eq!((spec.min_pack, spec.max_pack), (2, 4));
        assert_eq!((spec.min_light, spec.max_light), (10, 14));
        assert_eq!(spec.weight, 12);
        assert!(!spec.allow_below_sea_level);
    }

    #[test]
    fn unknown_species_rejected() {
        let mut config = FaunaConfig::default();
        config.species.insert("magpie".into(), SpeciesConfig::crow());
        let mut catalog = SpeciesCatalog::with_defaults();
        let err = config.apply_to_catalog(&mut catalog).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownSpecies(name) if name == "magpie"));
    }

    #[test]
    fn validation_catches_bad_values() {
        assert!(FaunaConfig::default().validate().is_ok());

        let mut c = FaunaConfig::default();
        c.spawning.spawn_tick_delay = 0;
        assert!(c.validate().is_err());

        let mut c = FaunaConfig::default();
        if let Some(crow) = c.species.get_mut("crow") {
            crow.min_pack_size = 9;
        }
        assert!(matches!(c.validate(), Err(ConfigError::Invalid(_))));

        let mut c = FaunaConfig::default();
        c.spawning.despawn_range = 0.0;
        assert!(c.validate().is_err());
    }
}

#[cfg(test)]
mod files {
    use super::*;
    use tempfile::TempDir;

    fn tmp() -> TempDir {
        tempfile::tempdir().expect("create temp dir")
    }

    #[test]
    fn missing_file_created_with_defaults() {
        let dir = tmp();
        let path = dir.path().join("nested").join("fauna.json");
        let config = load_config_file(&path, &FaunaConfig::default()).unwrap();
        assert_eq!(config, FaunaConfig::default());
        assert!(path.exists());

        let again = load_config_file(&path, &FaunaConfig::default()).unwrap();
        assert_eq!(again, config);
    }

    #[test]
    fn incomplete_file_rewritten() {
        let dir = tmp();
        let path = dir.path().join("fauna.json");
        std::fs::write(&path, r#"{ "seed": 5 }"#).unwrap();

        let config = load_config_file(&path, &FaunaConfig::default()).unwrap();
        assert_eq!(config.seed, 5);

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("spawn_tick_delay"));
        assert!(text.contains("debug_birds"));
        let merged = load_config_reader(Cursor::new(text), &FaunaConfig::default()).unwrap();
        assert!(!merged.dirty);
        assert_eq!(merged.config, config);
    }

    #[test]
    fn saved_file_loads_back() {
        let dir = tmp();
        let path = dir.path().join("fauna.json");
        save_config_file(&path, &tuned()).unwrap();
        assert_eq!(load_config_file(&path, &FaunaConfig::default()).unwrap(), tuned());
    }

    #[test]
    fn invalid_values_refused_on_load() {
        let dir = tmp();
        let path = dir.path().join("fauna.json");
        std::fs::write(&path, r#"{ "spawning": { "spawn_tick_delay": 0 } }"#).unwrap();
        assert!(load_config_file(&path, &FaunaConfig::default()).is_err());
    }
}
