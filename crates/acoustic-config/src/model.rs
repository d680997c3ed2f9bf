use std::path::PathBuf;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub seed: SeedConfig,
    pub reports: ReportsConfig,
    /// `tracing` filter directive, e.g. `info` or `acoustic_db=debug`.
    pub log_level: Option<String>,
}

/// Where the SQLite file and the migration directory live.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub path: PathBuf,
    pub migrations_dir: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("project_management.db"),
            migrations_dir: PathBuf::from("migrations"),
        }
    }
}

/// Knobs for the sample data generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeedConfig {
    /// Fixed RNG seed. `None` draws from OS entropy.
    pub rng_seed: Option<u64>,
    pub project_count: usize,
    /// Chance of a general project email on any given day.
    pub email_probability: f64,
    /// Chance of a milestone on any given project day.
    pub milestone_probability: f64,
    pub include_datacenter: bool,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            rng_seed: None,
            project_count: 5,
            email_probability: 0.2,
            milestone_probability: 0.2,
            include_datacenter: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportsConfig {
    pub output_dir: PathBuf,
}

impl Default for ReportsConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("reports"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_original_layout() {
        let config = AppConfig::default();
        assert_eq!(config.database.path, PathBuf::from("project_management.db"));
        assert_eq!(config.database.migrations_dir, PathBuf::from("migrations"));
        assert_eq!(config.seed.project_count, 5);
        assert!(config.seed.include_datacenter);
        assert!(config.log_level.is_none());
    }

    #[test]
    fn partial_yaml_keeps_remaining_defaults() {
        let yaml = "seed:\n  rng_seed: 42\n";
        let config: AppConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.seed.rng_seed, Some(42));
        assert_eq!(config.seed.project_count, 5);
        assert_eq!(config.database, DatabaseConfig::default());
    }
}
