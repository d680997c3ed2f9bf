use std::fs;
use std::path::PathBuf;

use acoustic_db::Drift;
use acoustic_reports::Table;
use anyhow::{Context, Result, bail};
use clap::Subcommand;

use crate::Settings;
use crate::banner;

#[derive(Subcommand)]
pub enum MigrateCommand {
    /// Write a new migration file
    Create {
        /// Name made of letters, digits, `_` and `-`
        name: String,
        /// Up script inline
        #[arg(long, conflicts_with = "up_file", required_unless_present = "up_file")]
        up: Option<String>,
        /// Read the up script from a file
        #[arg(long)]
        up_file: Option<PathBuf>,
        /// Down script inline
        #[arg(long, conflicts_with = "down_file")]
        down: Option<String>,
        /// Read the down script from a file
        #[arg(long)]
        down_file: Option<PathBuf>,
    },
    /// Apply every pending migration in version order
    Up,
    /// Undo the most recently applied migrations
    Rollback {
        #[arg(long, default_value_t = 1)]
        steps: usize,
    },
    /// Show applied and pending migrations
    Status,
    /// Compare the ledger with the migration files on disk
    Verify,
    /// Delete the database file
    Reset {
        /// Confirm deleting all data
        #[arg(long)]
        yes: bool,
    },
    /// Reset, then re-apply every migration
    Refresh {
        /// Confirm deleting all data
        #[arg(long)]
        yes: bool,
    },
}

fn script(inline: Option<String>, file: Option<PathBuf>) -> Result<String> {
    match (inline, file) {
        (Some(sql), _) => Ok(sql),
        (None, Some(path)) => {
            fs::read_to_string(&path).with_context(|| format!("failed to read {}", path.display()))
        }
        (None, None) => Ok(String::new()),
    }
}

pub fn run(settings: &Settings, command: MigrateCommand) -> Result<()> {
    let ledger = settings.ledger()?;

    match command {
        MigrateCommand::Create {
            name,
            up,
            up_file,
            down,
            down_file,
        } => {
            let up = script(up, up_file)?;
            let down = script(down, down_file)?;
            let created = ledger.create_migration(&name, &up, &down)?;
            println!("Created migration {}", created.filename);
        }
        MigrateCommand::Up => {
            let applied = ledger.migrate()?;
            if applied.is_empty() {
                println!("Nothing to migrate");
            }
            for version in applied {
                println!("Applied {version}");
            }
        }
        MigrateCommand::Rollback { steps } => {
            let rolled_back = ledger.rollback(steps)?;
            if rolled_back.is_empty() {
                println!("Nothing to roll back");
            }
            for version in rolled_back {
                println!("Rolled back {version}");
            }
        }
        MigrateCommand::Status => {
            banner::print_ledger_banner(&ledger)?;
            let mut table = Table::new("Migrations", &["Version", "Name", "Status", "Applied At"]);
            for status in ledger.status()? {
                let applied_at = status
                    .entry
                    .as_ref()
                    .map(|e| e.applied_at.format("%Y-%m-%d %H:%M:%S").to_string())
                    .unwrap_or_default();
                table.push_row(vec![
                    status.migration.version.to_string(),
                    status.migration.name.clone(),
                    if status.is_applied() { "applied" } else { "pending" }.to_string(),
                    applied_at,
                ]);
            }
            println!("{table}");
        }
        MigrateCommand::Verify => {
            let drift = ledger.verify()?;
            if drift.is_empty() {
                println!("Ledger matches migration files");
                return Ok(());
            }
            for d in &drift {
                match d {
                    Drift::MissingFile { version, name } => {
                        println!("{version} ({name}): applied but file is missing");
                    }
                    Drift::ChecksumChanged {
                        version,
                        recorded,
                        current,
                    } => {
                        println!("{version}: checksum changed ({recorded} -> {current})");
                    }
                }
            }
            bail!("{} migration(s) drifted from the ledger", drift.len());
        }
        MigrateCommand::Reset { yes } => {
            if !yes {
                bail!("reset deletes {}; pass --yes to confirm", ledger.db_path().display());
            }
            ledger.reset()?;
            println!("Removed {}", ledger.db_path().display());
        }
        MigrateCommand::Refresh { yes } => {
            if !yes {
                bail!("refresh rebuilds {}; pass --yes to confirm", ledger.db_path().display());
            }
            let applied = ledger.refresh()?;
            println!("Re-applied {} migration(s)", applied.len());
        }
    }

    Ok(())
}
