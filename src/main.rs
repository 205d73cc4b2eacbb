use migrastamp::cli::{self, Commands, Parser};
use migrastamp::db::{HistoryTable, PostgresEngine};
use migrastamp::error::MigrastampErrorKind;
use migrastamp::migration::MigrationDirection;
use migrastamp::output::{CommandData, MigrastampOutput, MigrastampStatus};
use migrastamp::{commands, ux, MigrastampError};


fn connect(
    db_connection_string: Option<&str>,
    table: &HistoryTable,
    command: &Commands,
) -> Result<PostgresEngine, MigrastampError> {
    match db_connection_string {
        Some(conn_str) => Ok(PostgresEngine::new(conn_str, table.clone())),
        None => Err(MigrastampError {
            kind: MigrastampErrorKind::MissingConnectionString(command.to_string()),
        }),
    }
}


async fn run_command(args: cli::Cli) -> Result<CommandData, MigrastampError> {
    let migration_directory = &args.migration_directory;
    let db_connection_string = args.db_connection_string.as_deref();

    match &args.command {
        Commands::Add { name, up } => {
            let migration = commands::add(migration_directory, name, up.as_deref())?;
            Ok(CommandData::Created { migration: migration.file })
        }
        Commands::Peck { } => {
            let mut engine = connect(db_connection_string, &args.table, &args.command)?;
            commands::peck(&mut engine).await?;
            Ok(CommandData::Pecked { table: args.table.to_string() })
        }
        Commands::Up { count, args: flags } => {
            let mut engine = connect(db_connection_string, &args.table, &args.command)?;
            let report = commands::migrate(
                &mut engine,
                migration_directory,
                MigrationDirection::Up,
                count.unwrap_or(usize::MAX),
                flags.plan,
                flags.dry_run,
            ).await?;
            Ok(CommandData::Batch {
                direction: MigrationDirection::Up,
                executed: report.executed,
                committed: report.committed,
                migrations: report.batch.iter().cloned().collect(),
            })
        }
        Commands::Down { count, args: flags } => {
            let mut engine = connect(db_connection_string, &args.table, &args.command)?;
            let report = commands::migrate(
                &mut engine,
                migration_directory,
                MigrationDirection::Down,
                count.unwrap_or(commands::DEFAULT_DOWN_COUNT),
                flags.plan,
                flags.dry_run,
            ).await?;
            Ok(CommandData::Batch {
                direction: MigrationDirection::Down,
                executed: report.executed,
                committed: report.committed,
                migrations: report.batch.iter().cloned().collect(),
            })
        }
    }
}


/// Entry point for the migrastamp CLI tool.
///
/// Subcommands:
/// - `peck`: Verify connectivity and create the history table.
/// - `add`: Create a new timestamped migration file.
/// - `up`: Apply pending migrations, oldest first.
/// - `down`: Roll back applied migrations, newest first.
///
/// `--dir`, `--db` and `--table` may also be set through the environment.
#[tokio::main]
async fn main() {
    let args: cli::Cli = cli::Cli::parse();
    let command_name = args.command.to_string();
    let json = args.json;

    let result = match ux::setup_logging(args.verbose, args.quiet, args.json) {
        Ok(()) => run_command(args).await,
        Err(e) => Err(e.into()),
    };
    let output = MigrastampOutput::from_result(&command_name, result);

    if json {
        match serde_json::to_string_pretty(&output) {
            Ok(document) => println!("{document}"),
            Err(e) => eprintln!("Failed to serialize output: {e}"),
        }
    } else {
        ux::render_human_output(&output);
    }

    if output.status == MigrastampStatus::Error {
        std::process::exit(1);
    }
}
