use std::path::{Path, PathBuf};

use acoustic_common::{Error, Result};
use tracing::{debug, info};

use crate::model::AppConfig;

const CONFIG_FILENAMES: [&str; 3] = ["config.yml", "config.yaml", "config.toml"];

/// Locates and parses the toolkit configuration file.
pub struct ConfigLoader {
    config_dir: PathBuf,
}

impl ConfigLoader {
    /// Loader rooted at `<platform config dir>/acoustic`.
    pub fn new() -> Result<Self> {
        let base = dirs::config_dir()
            .ok_or_else(|| Error::Config("could not determine a config directory".into()))?;
        Ok(Self::with_dir(base.join("acoustic")))
    }

    pub fn with_dir(config_dir: impl Into<PathBuf>) -> Self {
        Self {
            config_dir: config_dir.into(),
        }
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    /// First existing config file in the directory, in `CONFIG_FILENAMES` order.
    pub fn config_path(&self) -> Option<PathBuf> {
        CONFIG_FILENAMES
            .iter()
            .map(|name| self.config_dir.join(name))
            .find(|path| path.is_file())
    }

    /// Load the config file if there is one, otherwise fall back to defaults.
    pub fn load(&self) -> Result<AppConfig> {
        match self.config_path() {
            Some(path) => Self::load_file(&path),
            None => {
                debug!(
                    "no config file in {}, using defaults",
                    self.config_dir.display()
                );
                Ok(AppConfig::default())
            }
        }
    }

    pub fn load_file(path: &Path) -> Result<AppConfig> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("failed to read {}: {e}", path.display()))
        })?;

        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        let config = match ext {
            "yml" | "yaml" => serde_yaml::from_str(&contents)
                .map_err(|e| Error::Config(format!("YAML parse error: {e}")))?,
            "toml" => toml::from_str(&contents)
                .map_err(|e| Error::Config(format!("TOML parse error: {e}")))?,
            other => {
                return Err(Error::Config(format!(
                    "unsupported config extension: {other}"
                )));
            }
        };

        info!("loaded config from {}", path.display());
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let loader = ConfigLoader::with_dir(dir.path());
        assert!(loader.config_path().is_none());
        assert_eq!(loader.load().unwrap(), AppConfig::default());
    }

    #[test]
    fn loads_yaml_config() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("config.yml"),
            "database:\n  path: data/acoustics.db\nlog_level: debug\n",
        )
        .unwrap();

        let config = ConfigLoader::with_dir(dir.path()).load().unwrap();
        assert_eq!(config.database.path, PathBuf::from("data/acoustics.db"));
        assert_eq!(config.database.migrations_dir, PathBuf::from("migrations"));
        assert_eq!(config.log_level.as_deref(), Some("debug"));
    }

    #[test]
    fn loads_toml_config() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("config.toml"),
            "[seed]\nrng_seed = 7\nproject_count = 3\ninclude_datacenter = false\n",
        )
        .unwrap();

        let config = ConfigLoader::with_dir(dir.path()).load().unwrap();
        assert_eq!(config.seed.rng_seed, Some(7));
        assert_eq!(config.seed.project_count, 3);
        assert!(!config.seed.include_datacenter);
    }

    #[test]
    fn yaml_takes_precedence_over_toml() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("config.yml"), "log_level: warn\n").unwrap();
        std::fs::write(dir.path().join("config.toml"), "log_level = \"trace\"\n").unwrap();

        let config = ConfigLoader::with_dir(dir.path()).load().unwrap();
        assert_eq!(config.log_level.as_deref(), Some("warn"));
    }

    #[test]
    fn rejects_unknown_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.ini");
        std::fs::write(&path, "x=1").unwrap();

        let err = ConfigLoader::load_file(&path).unwrap_err();
        assert!(err.to_string().contains("unsupported config extension"));
    }

    #[test]
    fn malformed_yaml_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("config.yml"), "seed: [unterminated").unwrap();

        let err = ConfigLoader::with_dir(dir.path()).load().unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
