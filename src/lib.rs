pub mod cli;
pub mod config;
pub mod error;
pub mod filter;
pub mod fixtures;
pub mod schema;
pub mod seeder;
pub mod store;
pub mod ui;
pub mod writer;

pub use cli::{Cli, Commands};
pub use config::{Config, ConflictPolicy};
pub use error::SeedError;
pub use seeder::{SeedReport, Seeder};
pub use ui::{ConsoleUi, Phase, SilentUi, Ui};
pub use writer::{ReplicationReport, Replicator};
