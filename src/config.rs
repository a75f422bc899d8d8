//! Generator tunables, loadable from an optional TOML file.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::GenError;

pub const TILE_LIMIT: u32 = 19;
pub const BOUNDARY_LIMIT: f64 = 4000.0;
pub const ATTEMPTS_PER_CONNECTOR: u32 = 10;

/// How the run's RNG seed is chosen.
#[derive(Debug, Clone, PartialEq)]
pub enum SeedPolicy {
    /// Always the same fixed seed (used by the test-harness default).
    Force(u64),
    /// A caller-supplied seed.
    Override(u64),
    /// A fresh 9-digit seed drawn from the OS RNG at startup.
    Random,
}

impl Default for SeedPolicy {
    fn default() -> Self {
        SeedPolicy::Force(1337)
    }
}

/// Runtime tunables for the assembly driver.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratorConfig {
    pub tile_limit: u32,
    pub boundary_limit: f64,
    pub attempts_per_connector: u32,
    pub seed: SeedPolicy,
    /// Per-connector-type fallback tile path, substituted in place of a
    /// random draw once an attempt budget for that connector type is mostly
    /// spent. Generalizes the `crates`/`crates_empty` special case.
    pub crates_fallback: Vec<(String, PathBuf)>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        GeneratorConfig {
            tile_limit: TILE_LIMIT,
            boundary_limit: BOUNDARY_LIMIT,
            attempts_per_connector: ATTEMPTS_PER_CONNECTOR,
            seed: SeedPolicy::default(),
            crates_fallback: Vec::new(),
        }
    }
}

impl GeneratorConfig {
    /// The 0-indexed attempt number at which the fallback tile for
    /// `connector_type`, if configured, is substituted for a random draw.
    /// Matches the source tooling's `attempt index > 7` (i.e. the 9th and
    /// 10th of 10 attempts).
    pub fn fallback_for(&self, connector_type: &str, attempt_index: u32) -> Option<&Path> {
        if attempt_index <= 7 {
            return None;
        }
        self.crates_fallback
            .iter()
            .find(|(name, _)| name == connector_type)
            .map(|(_, path)| path.as_path())
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, GenError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| GenError::Io {
            source,
            path: path.to_path_buf(),
        })?;
        Self::from_toml_str(&text)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, GenError> {
        let file: ConfigFile = toml::from_str(text)
            .map_err(|err| GenError::Config(err.to_string()))?;
        Ok(file.into_config())
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct ConfigFile {
    tile_limit: Option<u32>,
    boundary_limit: Option<f64>,
    attempts_per_connector: Option<u32>,
    seed: Option<u64>,
    crates_fallback: Vec<CratesFallbackEntry>,
}

impl Default for ConfigFile {
    fn default() -> Self {
        ConfigFile {
            tile_limit: None,
            boundary_limit: None,
            attempts_per_connector: None,
            seed: None,
            crates_fallback: Vec::new(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct CratesFallbackEntry {
    connector: String,
    tile: PathBuf,
}

impl ConfigFile {
    fn into_config(self) -> GeneratorConfig {
        let defaults = GeneratorConfig::default();
        GeneratorConfig {
            tile_limit: self.tile_limit.unwrap_or(defaults.tile_limit),
            boundary_limit: self.boundary_limit.unwrap_or(defaults.boundary_limit),
            attempts_per_connector: self
                .attempts_per_connector
                .unwrap_or(defaults.attempts_per_connector),
            seed: self.seed.map(SeedPolicy::Override).unwrap_or(defaults.seed),
            crates_fallback: self
                .crates_fallback
                .into_iter()
                .map(|entry| (entry.connector, entry.tile))
                .collect(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn defaults_match_the_tunables_table() {
        let config = GeneratorConfig::default();
        assert_eq!(config.tile_limit, 19);
        assert_eq!(config.boundary_limit, 4000.0);
        assert_eq!(config.attempts_per_connector, 10);
        assert_eq!(config.seed, SeedPolicy::Force(1337));
    }

    #[test]
    fn fallback_only_applies_late_in_the_attempt_budget() {
        let config = GeneratorConfig {
            crates_fallback: vec![("crates".to_string(), PathBuf::from("crates_empty.map"))],
            ..GeneratorConfig::default()
        };

        assert_eq!(config.fallback_for("crates", 0), None);
        assert_eq!(config.fallback_for("crates", 7), None);
        assert_eq!(
            config.fallback_for("crates", 8),
            Some(Path::new("crates_empty.map"))
        );
        assert_eq!(config.fallback_for("door", 9), None);
    }

    #[test]
    fn parses_toml_overrides() {
        let toml = r#"
            tile_limit = 5
            seed = 42

            [[crates_fallback]]
            connector = "crates"
            tile = "crates_empty.map"
        "#;

        let config = GeneratorConfig::from_toml_str(toml).unwrap();
        assert_eq!(config.tile_limit, 5);
        assert_eq!(config.seed, SeedPolicy::Override(42));
        assert_eq!(config.boundary_limit, BOUNDARY_LIMIT);
        assert_eq!(config.crates_fallback.len(), 1);
    }
}
