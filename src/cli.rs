use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

use crate::config::Config;
use crate::error::SeedError;

#[derive(Parser, Debug)]
#[command(name = "arcaea-seed")]
#[command(version, about = "Seed an Arcaea server database from JSON fixtures and replicate it to SQLite")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Directory containing the JSON fixtures
    #[arg(long, global = true, default_value = "json_files")]
    pub fixtures: PathBuf,

    /// Source database path
    #[arg(long, global = true, default_value = "arcaea_source.db")]
    pub source: PathBuf,

    /// Destination SQLite database path
    #[arg(long, global = true, default_value = "ArcaeaDB.db")]
    pub destination: PathBuf,

    /// DDL script to apply instead of the generated schema
    #[arg(long, global = true)]
    pub ddl: Option<PathBuf>,

    /// User id that owns the seeded player data
    #[arg(long, global = true, default_value_t = 1)]
    pub user_id: i64,

    /// Skip rows that violate constraints in these tables (comma-separated)
    #[arg(long, global = true, value_delimiter = ',')]
    pub skip_conflicts: Vec<String>,

    /// Only print warnings and errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// More log output (repeat for more)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Seed the source database, then replicate every table
    Run,

    /// Seed the source database only
    Seed,

    /// Replicate an existing source database to SQLite
    Replicate {
        /// Only include these tables and their parents (comma-separated)
        #[arg(short, long, value_delimiter = ',')]
        include: Option<Vec<String>>,

        /// Exclude these tables and their dependents (comma-separated)
        #[arg(short, long, value_delimiter = ',')]
        exclude: Option<Vec<String>>,
    },

    /// List all table names in dependency order
    ListTables,

    /// Print the DDL script applied to both databases
    Schema,
}

impl Cli {
    pub fn parse_args() -> Self {
        Cli::parse()
    }

    pub fn command(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Run)
    }

    /// Build the run configuration from the parsed flags
    pub fn config(&self) -> Result<Config, SeedError> {
        let mut config = Config::new(&self.fixtures, &self.source, &self.destination);
        config.ddl_script = self.ddl.clone();
        config.user_id = self.user_id;
        config.skip_conflicts_on(&self.skip_conflicts)?;
        Ok(config)
    }
}
