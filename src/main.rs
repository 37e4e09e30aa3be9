use anyhow::Result;
use arcaea_seed::{
    cli::{Cli, Commands},
    config::Config,
    filter::resolve_tables,
    schema::DependencyResolver,
    store::open_store_read_only,
    ConsoleUi, Phase, Replicator, Seeder, SilentUi, Ui,
};
use std::time::Instant;
use tracing::Level;

fn main() -> Result<()> {
    let cli = Cli::parse_args();

    let level = match (cli.quiet, cli.verbose) {
        (true, _) => Level::WARN,
        (false, 0) => Level::INFO,
        (false, 1) => Level::DEBUG,
        (false, _) => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = cli.config()?;

    if cli.quiet {
        execute(cli.command(), &config, &mut SilentUi::new())
    } else {
        execute(cli.command(), &config, &mut ConsoleUi::new())
    }
}

fn execute(command: Commands, config: &Config, ui: &mut impl Ui) -> Result<()> {
    match command {
        Commands::Run => {
            let start = Instant::now();
            let script = config.schema_script()?;

            let mut seeder = Seeder::create(&config.source_db, &script, config)?;
            let seeded = seeder.run(ui)?;
            let source = seeder.into_connection();

            let report = Replicator::new(&source, &config.destination_db, script).replicate_all(ui)?;
            ui.set_phase(Phase::Complete);

            println!(
                "Seeded {:?} ({} rows, {} skipped) and created {:?} ({} rows) in {:.1}s",
                config.source_db,
                seeded.total_inserted(),
                seeded.total_skipped(),
                config.destination_db,
                report.total_rows(),
                start.elapsed().as_secs_f64()
            );
        }

        Commands::Seed => {
            let start = Instant::now();
            let script = config.schema_script()?;

            let mut seeder = Seeder::create(&config.source_db, &script, config)?;
            let seeded = seeder.run(ui)?;
            ui.set_phase(Phase::Complete);

            println!(
                "Seeded {:?} ({} rows, {} skipped) in {:.1}s",
                config.source_db,
                seeded.total_inserted(),
                seeded.total_skipped(),
                start.elapsed().as_secs_f64()
            );
        }

        Commands::Replicate { include, exclude } => {
            let start = Instant::now();
            let tables = resolve_tables(include, exclude)?;
            let names: Vec<&str> = tables.iter().map(|t| t.name).collect();

            let source = open_store_read_only(&config.source_db)?;
            let report =
                Replicator::new(&source, &config.destination_db, config.schema_script()?)
                    .replicate(&names, ui)?;
            ui.set_phase(Phase::Complete);

            println!(
                "Created {:?} ({} tables, {} rows) in {:.1}s",
                config.destination_db,
                report.tables.len(),
                report.total_rows(),
                start.elapsed().as_secs_f64()
            );
        }

        Commands::ListTables => {
            println!("Tables in dependency order:\n");
            for table in DependencyResolver::new().all_tables_ordered()? {
                let mut parents: Vec<&str> = table.dependencies().into_iter().collect();
                parents.sort_unstable();
                if parents.is_empty() {
                    println!("  {}", table.name);
                } else {
                    println!("  {} (after {})", table.name, parents.join(", "));
                }
            }
        }

        Commands::Schema => {
            print!("{}", config.schema_script()?);
        }
    }

    Ok(())
}
