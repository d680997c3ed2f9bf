use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use acoustic_common::{Error, Result};
use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, params};
use serde::Serialize;
use tracing::{info, warn};

use crate::migrations::{self, Migration, Version};
use crate::schema::SchemaScript;

const LEDGER_SCHEMA: &str = "CREATE TABLE IF NOT EXISTS schema_migrations (
    id INTEGER PRIMARY KEY,
    version TEXT NOT NULL UNIQUE,
    name TEXT NOT NULL,
    applied_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
    checksum TEXT NOT NULL,
    status TEXT DEFAULT 'applied'
);";

/// One row of the applied-migrations ledger.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LedgerEntry {
    pub version: Version,
    pub name: String,
    pub applied_at: DateTime<Utc>,
    pub checksum: String,
    pub status: String,
}

/// Result of [`MigrationLedger::create_migration`].
#[derive(Debug, Clone, PartialEq)]
pub struct CreatedMigration {
    pub version: Version,
    pub filename: String,
}

/// An on-disk migration and its ledger row, if applied.
#[derive(Debug, Clone)]
pub struct MigrationStatus {
    pub migration: Migration,
    pub entry: Option<LedgerEntry>,
}

impl MigrationStatus {
    pub fn is_applied(&self) -> bool {
        self.entry.is_some()
    }
}

/// Disagreement between the ledger and the migrations directory.
#[derive(Debug, Clone, PartialEq)]
pub enum Drift {
    /// Applied, but no file with this version exists anymore.
    MissingFile { version: Version, name: String },
    /// Applied with a checksum that differs from the file's current one.
    ChecksumChanged {
        version: Version,
        recorded: String,
        current: String,
    },
}

/// Tracks which migrations have been applied to one SQLite file.
///
/// Every operation opens its own connection and closes it when done.
pub struct MigrationLedger {
    db_path: PathBuf,
    migrations_dir: PathBuf,
}

impl MigrationLedger {
    /// Create the migrations directory if needed and make sure the ledger table exists.
    pub fn open(db_path: impl Into<PathBuf>, migrations_dir: impl Into<PathBuf>) -> Result<Self> {
        let ledger = Self {
            db_path: db_path.into(),
            migrations_dir: migrations_dir.into(),
        };
        info!(
            "opening migration ledger at {} (migrations in {})",
            ledger.db_path.display(),
            ledger.migrations_dir.display()
        );

        std::fs::create_dir_all(&ledger.migrations_dir)?;
        if let Some(parent) = ledger.db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        ledger.init_ledger_table()?;
        Ok(ledger)
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    pub fn migrations_dir(&self) -> &Path {
        &self.migrations_dir
    }

    fn connect(&self) -> Result<Connection> {
        let conn = Connection::open(&self.db_path)
            .map_err(|e| Error::Database(format!("failed to open database: {e}")))?;
        // Table-rebuild scripts drop and rename parent tables, so scripts run
        // without foreign-key enforcement. The bundled SQLite defaults it on.
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=OFF;")
            .map_err(|e| Error::Database(format!("failed to set pragmas: {e}")))?;
        Ok(conn)
    }

    fn init_ledger_table(&self) -> Result<()> {
        let conn = self.connect()?;
        conn.execute_batch(LEDGER_SCHEMA)
            .map_err(|e| Error::Database(format!("failed to create ledger table: {e}")))?;
        Ok(())
    }

    /// Write a new migration file. SQL content is stored as given.
    pub fn create_migration(&self, name: &str, up: &str, down: &str) -> Result<CreatedMigration> {
        migrations::validate_name(name)?;
        let existing = self.all_migrations()?;
        let version = migrations::current_version(&existing)?;

        let migration = Migration::new(version.clone(), name, up, down);
        migration.write_to(&self.migrations_dir)?;

        let filename = migration.filename();
        info!("created migration {filename}");
        Ok(CreatedMigration { version, filename })
    }

    /// Write `scripts` as migration files if the directory holds none yet.
    pub fn bootstrap(&self, scripts: &[SchemaScript]) -> Result<Vec<CreatedMigration>> {
        if !self.all_migrations()?.is_empty() {
            info!("migrations directory already populated, skipping bootstrap");
            return Ok(Vec::new());
        }
        scripts
            .iter()
            .map(|script| self.create_migration(script.name, script.up, script.down))
            .collect()
    }

    /// Every migration on disk, sorted by version.
    pub fn all_migrations(&self) -> Result<Vec<Migration>> {
        migrations::discover(&self.migrations_dir)
    }

    /// Ledger entries in the order they were applied.
    pub fn applied(&self) -> Result<Vec<LedgerEntry>> {
        let conn = self.connect()?;
        let mut stmt = conn
            .prepare(
                "SELECT version, name, applied_at, checksum, status
                 FROM schema_migrations
                 ORDER BY id",
            )
            .map_err(|e| Error::Database(format!("failed to prepare query: {e}")))?;

        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, Option<String>>(4)?,
                ))
            })
            .map_err(|e| Error::Database(format!("failed to query ledger: {e}")))?;

        let mut entries = Vec::new();
        for row in rows {
            let (version, name, applied_at, checksum, status) =
                row.map_err(|e| Error::Database(format!("failed to read ledger row: {e}")))?;
            entries.push(LedgerEntry {
                version: Version::parse(&version)?,
                name,
                applied_at: parse_datetime(&applied_at)?,
                checksum,
                status: status.unwrap_or_else(|| "applied".to_string()),
            });
        }
        Ok(entries)
    }

    /// On-disk migrations whose version is not in the ledger, oldest first.
    pub fn pending(&self) -> Result<Vec<Migration>> {
        let applied: HashSet<Version> = self.applied()?.into_iter().map(|e| e.version).collect();
        Ok(self
            .all_migrations()?
            .into_iter()
            .filter(|m| !applied.contains(&m.version))
            .collect())
    }

    /// Run the up script and record the ledger row in one transaction.
    pub fn apply(&self, migration: &Migration) -> Result<()> {
        let mut conn = self.connect().map_err(|e| within(migration, e))?;
        if is_recorded(&conn, &migration.version).map_err(|e| within(migration, e))? {
            return Err(Error::AlreadyApplied(migration.version.to_string()));
        }

        let script_failed = |e: rusqlite::Error| within(migration, Error::Database(e.to_string()));

        let tx = conn.transaction().map_err(script_failed)?;
        tx.execute_batch(&migration.up).map_err(script_failed)?;
        tx.execute(
            "INSERT INTO schema_migrations (version, name, checksum) VALUES (?1, ?2, ?3)",
            params![
                migration.version.as_str(),
                migration.name,
                migration.checksum
            ],
        )
        .map_err(script_failed)?;
        tx.commit().map_err(script_failed)?;

        info!("applied migration: {} - {}", migration.version, migration.name);
        Ok(())
    }

    /// Run the down script and delete the ledger row in one transaction.
    pub fn rollback_migration(&self, migration: &Migration) -> Result<()> {
        let mut conn = self.connect().map_err(|e| within(migration, e))?;
        if !is_recorded(&conn, &migration.version).map_err(|e| within(migration, e))? {
            return Err(Error::NotApplied(migration.version.to_string()));
        }

        let script_failed = |e: rusqlite::Error| within(migration, Error::Database(e.to_string()));

        let tx = conn.transaction().map_err(script_failed)?;
        tx.execute_batch(&migration.down).map_err(script_failed)?;
        tx.execute(
            "DELETE FROM schema_migrations WHERE version = ?1",
            params![migration.version.as_str()],
        )
        .map_err(script_failed)?;
        tx.commit().map_err(script_failed)?;

        info!(
            "rolled back migration: {} - {}",
            migration.version, migration.name
        );
        Ok(())
    }

    /// Apply every pending migration in version order, stopping at the first failure.
    pub fn migrate(&self) -> Result<Vec<Version>> {
        let pending = self.pending()?;
        if pending.is_empty() {
            info!("no pending migrations");
            return Ok(Vec::new());
        }

        info!("applying {} pending migrations", pending.len());
        let mut applied = Vec::with_capacity(pending.len());
        for migration in &pending {
            self.apply(migration)?;
            applied.push(migration.version.clone());
        }
        Ok(applied)
    }

    /// Roll back the `steps` most recently applied migrations, newest first.
    pub fn rollback(&self, steps: usize) -> Result<Vec<Version>> {
        let applied = self.applied()?;
        if applied.is_empty() || steps == 0 {
            info!("no migrations to roll back");
            return Ok(Vec::new());
        }

        let on_disk: HashMap<Version, Migration> = self
            .all_migrations()?
            .into_iter()
            .map(|m| (m.version.clone(), m))
            .collect();

        let start = applied.len().saturating_sub(steps);
        let targets = &applied[start..];
        info!("rolling back {} migrations", targets.len());

        let mut rolled_back = Vec::with_capacity(targets.len());
        for entry in targets.iter().rev() {
            let migration = on_disk
                .get(&entry.version)
                .ok_or_else(|| Error::MigrationNotFound(entry.version.to_string()))?;
            self.rollback_migration(migration)?;
            rolled_back.push(entry.version.clone());
        }
        Ok(rolled_back)
    }

    /// Delete the database file and start over with an empty ledger.
    pub fn reset(&self) -> Result<()> {
        info!("resetting database: {}", self.db_path.display());
        for path in [
            self.db_path.clone(),
            sidecar(&self.db_path, "-wal"),
            sidecar(&self.db_path, "-shm"),
        ] {
            match std::fs::remove_file(&path) {
                Ok(()) => info!("removed {}", path.display()),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
        }
        self.init_ledger_table()
    }

    /// Reset, then reapply every migration on disk from scratch.
    pub fn refresh(&self) -> Result<Vec<Version>> {
        // Load first so a malformed file aborts before anything is deleted.
        let all = self.all_migrations()?;
        self.reset()?;

        if all.is_empty() {
            info!("no migrations to apply");
            return Ok(Vec::new());
        }

        info!("reapplying {} migrations", all.len());
        let mut applied = Vec::with_capacity(all.len());
        for migration in &all {
            self.apply(migration)?;
            applied.push(migration.version.clone());
        }
        Ok(applied)
    }

    /// Every on-disk migration paired with its ledger row, by version.
    pub fn status(&self) -> Result<Vec<MigrationStatus>> {
        let mut entries: HashMap<Version, LedgerEntry> = self
            .applied()?
            .into_iter()
            .map(|e| (e.version.clone(), e))
            .collect();

        Ok(self
            .all_migrations()?
            .into_iter()
            .map(|migration| {
                let entry = entries.remove(&migration.version);
                MigrationStatus { migration, entry }
            })
            .collect())
    }

    /// Compare the ledger against the migrations directory.
    pub fn verify(&self) -> Result<Vec<Drift>> {
        let on_disk: HashMap<Version, Migration> = self
            .all_migrations()?
            .into_iter()
            .map(|m| (m.version.clone(), m))
            .collect();

        let mut drift = Vec::new();
        for entry in self.applied()? {
            match on_disk.get(&entry.version) {
                None => drift.push(Drift::MissingFile {
                    version: entry.version,
                    name: entry.name,
                }),
                Some(migration) if migration.checksum != entry.checksum => {
                    drift.push(Drift::ChecksumChanged {
                        version: entry.version,
                        recorded: entry.checksum,
                        current: migration.checksum.clone(),
                    })
                }
                Some(_) => {}
            }
        }

        if !drift.is_empty() {
            warn!("ledger drift detected: {} entries", drift.len());
        }
        Ok(drift)
    }
}

fn is_recorded(conn: &Connection, version: &Version) -> Result<bool> {
    conn.query_row(
        "SELECT 1 FROM schema_migrations WHERE version = ?1",
        params![version.as_str()],
        |_| Ok(()),
    )
    .optional()
    .map(|row| row.is_some())
    .map_err(|e| Error::Database(format!("failed to query ledger: {e}")))
}

fn sidecar(db_path: &Path, suffix: &str) -> PathBuf {
    let mut name = db_path.as_os_str().to_os_string();
    name.push(suffix);
    PathBuf::from(name)
}

/// Attribute a database failure to the migration being applied or rolled back.
fn within(migration: &Migration, err: Error) -> Error {
    match err {
        Error::Database(message) => Error::Migration {
            version: migration.version.to_string(),
            name: migration.name.clone(),
            message,
        },
        other => other,
    }
}

fn parse_datetime(s: &str) -> Result<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    // CURRENT_TIMESTAMP produces "YYYY-MM-DD HH:MM:SS"
    chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .map(|naive| naive.and_utc())
        .map_err(|e| Error::Database(format!("invalid applied_at timestamp {s:?}: {e}")))
}
