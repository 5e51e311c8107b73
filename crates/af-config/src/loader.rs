//! JSON load and save.
//!
//! # File format
//!
//! ```json
//! {
//!   "spawning": {
//!     "spawn_range_from_player": 48.0,
//!     "spawn_tick_delay": 200,
//!     "attempts_per_tick": 8,
//!     "search_radius": 6,
//!     "samples_per_search": 12,
//!     "allow_below_sea_level": true,
//!     "despawn_range": 176.0
//!   },
//!   "population": { "max_active_birds": 100, "max_active": { "crow": 50 } },
//!   "species": {
//!     "crow": {
//!       "weight": 30, "min_pack_size": 3, "max_pack_size": 8,
//!       "min_light": 8, "max_light": 15, "max_spawn_height": 140,
//!       "min_flight_height": 2.5, "max_flight_height": 85.0
//!     }
//!   },
//!   "debug": { "debug_spawning": false, "debug_birds": false },
//!   "seed": 0
//! }
//! ```
//!
//! Any field or section may be left out; see [`merge`][crate::merge].

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use tracing::{info, warn};

use crate::{ConfigResult, FaunaConfig, Merged, PartialFaunaConfig, merge};

/// Parse a config from any `Read` source and fill missing fields from
/// `defaults`.  An empty document or a bare `null` counts as all-missing.
pub fn load_config_reader<R: Read>(mut reader: R, defaults: &FaunaConfig) -> ConfigResult<Merged> {
    let mut text = String::new();
    reader.read_to_string(&mut text)?;
    let partial: PartialFaunaConfig = if text.trim().is_empty() {
        PartialFaunaConfig::default()
    } else {
        serde_json::from_str::<Option<PartialFaunaConfig>>(&text)?.unwrap_or_default()
    };
    Ok(merge(partial, defaults))
}

/// Load the config at `path`.
///
/// A missing file is created with `defaults`.  A file with missing fields is
/// rewritten with the merged result so the user sees every option.  The
/// returned config is validated.
pub fn load_config_file(path: &Path, defaults: &FaunaConfig) -> ConfigResult<FaunaConfig> {
    if !path.exists() {
        info!(path = %path.display(), "config file missing, writing defaults");
        save_config_file(path, defaults)?;
        return Ok(defaults.clone());
    }

    let file = File::open(path)?;
    let Merged { config, dirty } = load_config_reader(BufReader::new(file), defaults)?;
    config.validate()?;
    if dirty {
        warn!(path = %path.display(), "config file incomplete, filling missing fields from defaults");
        save_config_file(path, &config)?;
    }
    Ok(config)
}

/// Write `config` as pretty-printed JSON.
pub fn save_config_writer<W: Write>(writer: W, config: &FaunaConfig) -> ConfigResult<()> {
    let mut writer = BufWriter::new(writer);
    serde_json::to_writer_pretty(&mut writer, config)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

/// Write `config` to `path`, creating parent directories as needed.
pub fn save_config_file(path: &Path, config: &FaunaConfig) -> ConfigResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    save_config_writer(File::create(path)?, config)
}
