//! Migration records and their on-disk representation.
//!
//! Each migration is a JSON object stored as `{version}_{name}.sql` inside the
//! migrations directory. Versions are `V` followed by a local
//! `%Y%m%d%H%M%S` timestamp, so they sort chronologically as plain strings.

use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};

use acoustic_common::{Error, Result};
use chrono::{Duration, Local, NaiveDateTime};
use ring::digest::{SHA256, digest};
use serde::{Deserialize, Serialize};
use tracing::debug;

const VERSION_PREFIX: &str = "V";
const VERSION_FORMAT: &str = "%Y%m%d%H%M%S";
const FILE_EXTENSION: &str = "sql";

/// Ordered migration identifier, e.g. `V20240315093000`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Version(String);

impl Version {
    pub fn from_timestamp(ts: NaiveDateTime) -> Self {
        Self(format!("{VERSION_PREFIX}{}", ts.format(VERSION_FORMAT)))
    }

    pub fn parse(s: &str) -> Result<Self> {
        let version = Self(s.to_string());
        version.timestamp()?;
        Ok(version)
    }

    pub fn timestamp(&self) -> Result<NaiveDateTime> {
        let digits = self
            .0
            .strip_prefix(VERSION_PREFIX)
            .ok_or_else(|| Error::Other(format!("version {} lacks the V prefix", self.0)))?;
        NaiveDateTime::parse_from_str(digits, VERSION_FORMAT)
            .map_err(|e| Error::Other(format!("malformed version {}: {e}", self.0)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A named, versioned pair of forward and backward SQL scripts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Migration {
    pub version: Version,
    pub name: String,
    pub up: String,
    pub down: String,
    pub checksum: String,
}

impl Migration {
    pub fn new(version: Version, name: &str, up: &str, down: &str) -> Self {
        Self {
            version,
            name: name.to_string(),
            up: up.to_string(),
            down: down.to_string(),
            checksum: checksum(up, down),
        }
    }

    pub fn filename(&self) -> String {
        format!("{}_{}.{FILE_EXTENSION}", self.version, self.name)
    }

    /// Whether the stored checksum still matches the scripts.
    pub fn is_intact(&self) -> bool {
        self.checksum == checksum(&self.up, &self.down)
    }

    /// Parse and validate a single migration file.
    pub fn load(path: &Path) -> Result<Self> {
        let invalid = |message: String| Error::InvalidMigration {
            path: path.display().to_string(),
            message,
        };

        let contents = std::fs::read_to_string(path).map_err(|e| invalid(e.to_string()))?;
        let migration: Migration =
            serde_json::from_str(&contents).map_err(|e| invalid(e.to_string()))?;

        migration
            .version
            .timestamp()
            .map_err(|e| invalid(e.to_string()))?;

        let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("");
        let expected_prefix = format!("{}_", migration.version);
        if !stem.starts_with(&expected_prefix) {
            return Err(invalid(format!(
                "filename does not start with version {}",
                migration.version
            )));
        }

        if !migration.is_intact() {
            return Err(Error::ChecksumMismatch {
                version: migration.version.to_string(),
                expected: migration.checksum.clone(),
                actual: checksum(&migration.up, &migration.down),
            });
        }

        Ok(migration)
    }

    /// Write the record as pretty JSON into `dir`, returning the file path.
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf> {
        let path = dir.join(self.filename());
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(&path, json)?;
        debug!("wrote migration file {}", path.display());
        Ok(path)
    }
}

/// Lowercase hex SHA-256 over `up` followed by `down`.
pub fn checksum(up: &str, down: &str) -> String {
    let mut content = String::with_capacity(up.len() + down.len());
    content.push_str(up);
    content.push_str(down);
    digest(&SHA256, content.as_bytes())
        .as_ref()
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect()
}

/// Migration names end up in filenames, so keep them to a safe alphabet.
pub fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(Error::Other("migration name cannot be empty".into()));
    }
    if let Some(bad) = name
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || *c == '_' || *c == '-'))
    {
        return Err(Error::Other(format!(
            "migration name {name:?} contains invalid character {bad:?}"
        )));
    }
    Ok(())
}

/// Version for a migration created at `now`, strictly after every existing one.
pub fn next_version(existing: &[Migration], now: NaiveDateTime) -> Result<Version> {
    let candidate = Version::from_timestamp(now);
    match existing.iter().map(|m| &m.version).max() {
        Some(newest) if *newest >= candidate => {
            Ok(Version::from_timestamp(newest.timestamp()? + Duration::seconds(1)))
        }
        _ => Ok(candidate),
    }
}

/// Version for a migration created right now.
pub fn current_version(existing: &[Migration]) -> Result<Version> {
    next_version(existing, Local::now().naive_local())
}

fn is_migration_file(path: &Path) -> bool {
    let named_like_version = path
        .file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with(VERSION_PREFIX));
    path.is_file()
        && named_like_version
        && path.extension().is_some_and(|ext| ext == FILE_EXTENSION)
}

/// Parse every migration file in `dir`, sorted by version.
///
/// Any malformed file fails the whole scan; nothing is skipped silently.
pub fn discover(dir: &Path) -> Result<Vec<Migration>> {
    let mut migrations = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if is_migration_file(&path) {
            migrations.push(Migration::load(&path)?);
        }
    }
    migrations.sort_by(|a, b| a.version.cmp(&b.version));

    let mut seen = HashSet::new();
    for migration in &migrations {
        if !seen.insert(&migration.version) {
            return Err(Error::InvalidMigration {
                path: dir.display().to_string(),
                message: format!("duplicate version {}", migration.version),
            });
        }
    }

    debug!("discovered {} migrations in {}", migrations.len(), dir.display());
    Ok(migrations)
}

/// Locate the migration for `version` in `dir`.
pub fn find(dir: &Path, version: &Version) -> Result<Migration> {
    discover(dir)?
        .into_iter()
        .find(|m| &m.version == version)
        .ok_or_else(|| Error::MigrationNotFound(version.to_string()))
}
