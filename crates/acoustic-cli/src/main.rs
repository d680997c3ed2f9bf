mod banner;
mod migrate;

use std::path::{Path, PathBuf};

use acoustic_config::{AppConfig, ConfigLoader};
use acoustic_db::{BASELINE, MigrationLedger, ProjectStore};
use acoustic_reports::{MaterialReport, RoomReport, Table};
use acoustic_seed::{DEFAULT_PROJECT_FOLDER, SampleDataGenerator, scaffold_project_folders};
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::migrate::MigrateCommand;

#[derive(Parser)]
#[command(
    name = "acoustic",
    version,
    about = "Schema migrations, sample data and reports for an acoustic project database"
)]
struct Cli {
    /// SQLite database file
    #[arg(long, global = true, env = "ACOUSTIC_DATABASE")]
    database: Option<PathBuf>,

    /// Directory holding migration files
    #[arg(long, global = true, env = "ACOUSTIC_MIGRATIONS_DIR")]
    migrations_dir: Option<PathBuf>,

    /// Directory containing config.yml / config.toml
    #[arg(long, global = true, env = "ACOUSTIC_CONFIG_DIR")]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the baseline schema migrations if none exist, then apply everything pending
    Init,
    /// Manage schema migrations
    Migrate {
        #[command(subcommand)]
        command: MigrateCommand,
    },
    /// Fill the database with sample projects
    Seed {
        /// Fixed RNG seed for reproducible data
        #[arg(long)]
        seed: Option<u64>,
        /// Number of generated projects
        #[arg(long)]
        projects: Option<usize>,
        /// Skip the data-center mitigation project
        #[arg(long)]
        no_datacenter: bool,
    },
    /// Print analysis reports
    Report {
        #[command(subcommand)]
        kind: ReportKind,
    },
    /// Create the project folder tree with placeholder files
    Scaffold {
        /// Target directory
        #[arg(default_value = DEFAULT_PROJECT_FOLDER)]
        dir: PathBuf,
    },
}

#[derive(Subcommand)]
enum ReportKind {
    /// Room volumes per project
    Rooms(ReportArgs),
    /// Material performance and cost per material type
    Materials(ReportArgs),
}

#[derive(Args)]
struct ReportArgs {
    /// Also export detail and summary CSVs (default: the configured reports dir)
    #[arg(long, value_name = "DIR")]
    csv: Option<Option<PathBuf>>,

    /// Also draw the report chart as SVG (default: the configured reports dir)
    #[arg(long, value_name = "DIR")]
    plot: Option<Option<PathBuf>>,
}

impl ReportArgs {
    fn csv_dir(&self, default: &Path) -> Option<PathBuf> {
        resolve_dir(&self.csv, default)
    }

    fn plot_dir(&self, default: &Path) -> Option<PathBuf> {
        resolve_dir(&self.plot, default)
    }
}

fn resolve_dir(flag: &Option<Option<PathBuf>>, default: &Path) -> Option<PathBuf> {
    flag.as_ref().map(|dir| dir.clone().unwrap_or_else(|| default.to_path_buf()))
}

fn print_written(paths: &[PathBuf]) {
    for path in paths {
        println!("Wrote {}", path.display());
    }
}

/// Paths and settings after merging flags, environment and config file.
pub struct Settings {
    pub config: AppConfig,
    pub database: PathBuf,
    pub migrations_dir: PathBuf,
}

impl Settings {
    fn resolve(cli: &Cli) -> Result<Self> {
        let loader = match &cli.config {
            Some(dir) => ConfigLoader::with_dir(dir),
            None => ConfigLoader::new().context("failed to locate config directory")?,
        };
        let config = loader.load().context("failed to load config")?;
        let database = cli
            .database
            .clone()
            .unwrap_or_else(|| config.database.path.clone());
        let migrations_dir = cli
            .migrations_dir
            .clone()
            .unwrap_or_else(|| config.database.migrations_dir.clone());
        Ok(Self {
            config,
            database,
            migrations_dir,
        })
    }

    pub fn ledger(&self) -> Result<MigrationLedger> {
        MigrationLedger::open(&self.database, &self.migrations_dir).with_context(|| {
            format!(
                "failed to open migration ledger for {}",
                self.database.display()
            )
        })
    }

    fn store(&self) -> Result<ProjectStore> {
        ProjectStore::open(&self.database)
            .with_context(|| format!("failed to open {}", self.database.display()))
    }
}

fn init_tracing(verbose: u8, config_level: Option<&str>) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(config_level.unwrap_or("info"))),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let settings = Settings::resolve(&cli)?;
    init_tracing(cli.verbose, settings.config.log_level.as_deref());

    match cli.command {
        Commands::Init => {
            let ledger = settings.ledger()?;
            let written = ledger.bootstrap(BASELINE)?;
            for created in &written {
                println!("Created {}", created.filename);
            }
            let applied = ledger.migrate()?;
            info!(applied = applied.len(), "database initialized");
            banner::print_ledger_banner(&ledger)?;
        }
        Commands::Migrate { command } => migrate::run(&settings, command)?,
        Commands::Seed {
            seed,
            projects,
            no_datacenter,
        } => {
            let mut seed_config = settings.config.seed.clone();
            if seed.is_some() {
                seed_config.rng_seed = seed;
            }
            if let Some(count) = projects {
                seed_config.project_count = count;
            }
            if no_datacenter {
                seed_config.include_datacenter = false;
            }

            let store = settings.store()?;
            let summary = SampleDataGenerator::from_config(&seed_config)?
                .seed(&store)
                .context("failed to generate sample data")?;

            let mut table = Table::new("Sample Data", &["Table", "Rows"]);
            for (name, count) in &summary.table_counts {
                table.push_row(vec![name.to_string(), count.to_string()]);
            }
            println!("{table}");
        }
        Commands::Report { kind } => {
            let store = settings.store()?;
            let default_dir = &settings.config.reports.output_dir;
            match kind {
                ReportKind::Rooms(args) => {
                    let report = RoomReport::load(&store)?;
                    println!("{}", report.summary_table());
                    if let Some(dir) = args.csv_dir(default_dir) {
                        print_written(&report.write_csv(&dir)?);
                    }
                    if let Some(dir) = args.plot_dir(default_dir) {
                        match report.write_plot(&dir)? {
                            Some(path) => print_written(&[path]),
                            None => println!("No rooms to plot"),
                        }
                    }
                }
                ReportKind::Materials(args) => {
                    let report = MaterialReport::load(&store)?;
                    println!("{}", report.summary_table());
                    if let Some(dir) = args.csv_dir(default_dir) {
                        print_written(&report.write_csv(&dir)?);
                    }
                    if let Some(dir) = args.plot_dir(default_dir) {
                        match report.write_plot(&dir)? {
                            Some(path) => print_written(&[path]),
                            None => println!("No rated room-treatment materials to plot"),
                        }
                    }
                }
            }
        }
        Commands::Scaffold { dir } => {
            let written = scaffold_project_folders(&dir)
                .with_context(|| format!("failed to scaffold {}", dir.display()))?;
            println!("Created {} files under {}", written.len(), dir.display());
        }
    }

    Ok(())
}
