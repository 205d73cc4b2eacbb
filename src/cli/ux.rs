use crate::cli::output::{CommandData, MigrastampOutput, MigrastampStatus};
use crate::migration::{Migration, MigrationDirection};
use crate::parser::{self, ScriptSummary};
use std::fmt::Write;
use tracing::subscriber::SetGlobalDefaultError;


pub fn setup_logging(verbose: u8, quiet: bool, json: bool) -> Result<(), SetGlobalDefaultError> {
    if json {
        // Mute all logging so stdout only carries the JSON document
        return tracing::subscriber::set_global_default(tracing::subscriber::NoSubscriber::default());
    }

    let level = if quiet {
        tracing::Level::ERROR
    } else { match verbose {
        0 => tracing::Level::INFO,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    }};

    let subscriber = tracing_subscriber::FmtSubscriber::builder()
        .with_max_level(level)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
}


/// Log the plan for a batch of loaded migrations, in execution order.
pub fn show_migration_plan(
    direction: MigrationDirection,
    migrations: &[Migration],
) -> Result<(), std::fmt::Error> {
    let operation = direction.noun();

    if migrations.is_empty() {
        tracing::info!("Nothing to do: no {} pending", operation.to_lowercase());
        return Ok(());
    }

    let mut output = "Generating migration plan...\n--- Migration plan ---".to_string();

    for Migration { file, scripts } in migrations {
        writeln!(
            &mut output,
            "\n---\n{} {}: '{}'",
            operation,
            file.identifier,
            file.path.display(),
        )?;

        let summary = parser::summarize(scripts.script(direction));
        match &summary {
            ScriptSummary::Empty => writeln!(&mut output, "-> (empty script)")?,
            ScriptSummary::Unparsed { .. } => writeln!(&mut output, "-> (script could not be parsed, will run as-is)")?,
            ScriptSummary::Parsed { statements, .. } => {
                for stmt in statements {
                    writeln!(&mut output, "-> {}", stmt)?;
                }
            }
        }

        if summary.is_destructive() {
            tracing::warn!("{} {} contains destructive actions!", operation, file.identifier);
            writeln!(
                &mut output,
                "\n\tWARNING: {} {} contains destructive actions!",
                operation,
                file.identifier
            )?;
        }
    }

    tracing::info!("{}\n--- End of migration plan ---", output);
    Ok(())
}


fn batch_state(direction: MigrationDirection, executed: bool, committed: bool) -> &'static str {
    match (executed, committed, direction) {
        (false, _, _) => "Planned",
        (true, false, _) => "Dry-ran",
        (true, true, MigrationDirection::Up) => "Applied",
        (true, true, MigrationDirection::Down) => "Rolled back",
    }
}

pub fn render_human_output(output: &MigrastampOutput<CommandData>) {
    if output.status == MigrastampStatus::Error {
        if let Some(error) = &output.error {
            eprintln!("Error: {}", error.message());
        }
        return;
    }

    match &output.data {
        Some(CommandData::Created { migration }) => {
            println!("Created {}", migration.path.display());
        }
        Some(CommandData::Batch { direction, executed, committed, migrations }) => {
            println!("{} {} migration(s)", batch_state(*direction, *executed, *committed), migrations.len());
            for migration in migrations {
                println!("  {} {}", migration.identifier, migration.name);
            }
        }
        Some(CommandData::Pecked { table }) => {
            println!("History table '{}' is ready", table);
        }
        None => {}
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_state_distinguishes_plan_and_dry_run() {
        assert_eq!(batch_state(MigrationDirection::Up, false, false), "Planned");
        assert_eq!(batch_state(MigrationDirection::Up, true, false), "Dry-ran");
        assert_eq!(batch_state(MigrationDirection::Down, true, false), "Dry-ran");
        assert_eq!(batch_state(MigrationDirection::Up, true, true), "Applied");
        assert_eq!(batch_state(MigrationDirection::Down, true, true), "Rolled back");
    }
}
