pub mod commands;
pub mod error;
pub mod output;
pub mod ux;

use crate::db::{self, HistoryTable};
pub use clap::{Parser, Subcommand};
use std::path::PathBuf;


fn parse_history_table(name: &str) -> Result<HistoryTable, String> {
    HistoryTable::new(name).map_err(|e| e.kind.to_string())
}


#[derive(Parser)]
#[command(name = "migrastamp", version, about = "Timestamped, JSON-file SQL migrations for Postgres.")]
pub struct Cli {
    #[arg(
        long = "db",
        help = "Database connection string, e.g.:
    postgresql://<username>:<password>@<host>:<port>/<database>
Required by 'peck', 'up' and 'down'.\n",
        env = "DB_CONNECTION_STRING",
        hide_env_values = true
    )]
    pub db_connection_string: Option<String>,

    #[arg(
        long = "dir",
        help = "Directory containing all migrations",
        env = "MIGRATION_DIRECTORY",
    )]
    pub migration_directory: PathBuf,

    #[arg(
        long = "table",
        help = "Table recording applied migrations. May be schema-qualified, e.g. 'ops.migrations'.",
        env = "MIGRATION_TABLE",
        default_value = db::DEFAULT_HISTORY_TABLE,
        value_parser = parse_history_table,
    )]
    pub table: HistoryTable,

    #[arg(
        short,
        long,
        action = clap::ArgAction::Count,
        help = "Set level of verbosity. [default: INFO]\n\t-v: DEBUG\n\t-vv: TRACE\n--quiet takes precedence over --verbose."
    )]
    pub verbose: u8,

    #[arg(
        short,
        long,
        action = clap::ArgAction::SetTrue,
        help = "Disable all information logs (only ERROR level logs are shown).\n--quiet takes precedence over --verbose."
    )]
    pub quiet: bool,

    #[arg(
        long,
        action = clap::ArgAction::SetTrue,
        help = "Enable JSON output format. Human readable output is disabled when this flag is set."
    )]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Parser, Debug, PartialEq, Eq)]
pub struct MigrateArgs {
    #[arg(
        long,
        help = "Generate the migration plan and skip execution.",
    )]
    pub plan: bool,

    #[arg(
        long,
        help = "Execute the migration plan, then rollback the transaction.",
    )]
    pub dry_run: bool,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    #[command(about = "Test connection to the database and create the history table if missing.")]
    Peck {},

    #[command(about = "Create a new migration file named '<timestamp>_<name>'.")]
    Add {
        #[arg(help = "Migration name. Letters, digits, '_' and '-' only.")]
        name: String,
        #[arg(help = "SQL for the 'up' script. The 'down' script is left empty.")]
        up: Option<String>,
    },

    #[command(about = "Apply pending migrations, oldest first.")]
    Up {
        #[arg(help = "Maximum number of migrations to apply. [default: all]")]
        count: Option<usize>,
        #[command(flatten)]
        args: MigrateArgs,
    },

    #[command(about = "Roll back applied migrations, newest first.")]
    Down {
        #[arg(help = "Maximum number of migrations to roll back. [default: 1]")]
        count: Option<usize>,
        #[command(flatten)]
        args: MigrateArgs,
    },
}

impl std::fmt::Display for Commands {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Commands::Peck { .. } => "peck",
            Commands::Add { .. } => "add",
            Commands::Up { .. } => "up",
            Commands::Down { .. } => "down",
        };
        write!(f, "{name}")
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_up_with_count_and_flags() {
        let cli = Cli::try_parse_from([
            "migrastamp", "--dir", "migrations", "--db", "postgres://localhost/db",
            "up", "3", "--dry-run",
        ]).unwrap();

        assert_eq!(cli.table, HistoryTable::default());
        assert_eq!(cli.command.to_string(), "up");
        assert_eq!(
            cli.command,
            Commands::Up { count: Some(3), args: MigrateArgs { plan: false, dry_run: true } }
        );
    }

    #[test]
    fn test_parses_add_without_connection() {
        let cli = Cli::try_parse_from([
            "migrastamp", "--dir", "migrations", "add", "create_users", "CREATE TABLE users (id INT);",
        ]).unwrap();

        assert_eq!(
            cli.command,
            Commands::Add {
                name: "create_users".to_string(),
                up: Some("CREATE TABLE users (id INT);".to_string()),
            }
        );
    }

    #[test]
    fn test_rejects_invalid_table_name() {
        let result = Cli::try_parse_from([
            "migrastamp", "--dir", "migrations", "--table", "users; DROP TABLE users", "peck",
        ]);

        assert!(result.is_err());
    }

    #[test]
    fn test_accepts_schema_qualified_table() {
        let cli = Cli::try_parse_from([
            "migrastamp", "--dir", "migrations", "--table", "ops.migrations", "down",
        ]).unwrap();

        assert_eq!(cli.table.as_str(), "ops.migrations");
        assert_eq!(cli.command, Commands::Down { count: None, args: MigrateArgs { plan: false, dry_run: false } });
    }
}
