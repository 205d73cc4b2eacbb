use crate::cli::error::MigrastampError;
use crate::db::DbEngine;
use crate::migration::{
    creator,
    directory,
    selector,
    Migration,
    MigrationBatch,
    MigrationDirection,
};
use crate::ux;

use std::path::Path;


/// Number of migrations rolled back by `down` when no count is given.
pub const DEFAULT_DOWN_COUNT: usize = 1;


/// Outcome of an `up` or `down` run.
#[derive(Debug)]
pub struct MigrationReport {
    pub batch: MigrationBatch,
    /// False for `--plan`: no script was sent to the database.
    pub executed: bool,
    /// False for `--plan` and `--dry-run`: nothing was persisted.
    pub committed: bool,
}


/// Creates a new migration file. Does not touch the database.
pub fn add(
    migration_dir: &Path,
    name: &str,
    up: Option<&str>,
) -> Result<Migration, MigrastampError> {
    tracing::info!("Adding migration '{name}' to {:?}", migration_dir);
    Ok(creator::create(migration_dir, name, up)?)
}

/// Ensures the database is reachable and the history table exists.
pub async fn peck<E: DbEngine>(engine: &mut E) -> Result<(), MigrastampError> {
    tracing::info!("Pecking database...");
    engine.ensure_table().await?;
    tracing::info!("Pecking successful");

    Ok(())
}

/// Fetches history, then lists the directory, then selects the batch.
/// Each stage completes before the next begins.
pub async fn plan<E: DbEngine>(
    engine: &mut E,
    migration_dir: &Path,
    direction: MigrationDirection,
    max_count: usize,
) -> Result<MigrationBatch, MigrastampError> {
    let batch = match direction {
        MigrationDirection::Up => {
            tracing::info!("Getting latest applied migration from history...");
            let latest = engine.fetch_latest().await?;
            match latest {
                Some(id) => tracing::info!("Latest applied migration: {id}"),
                None => tracing::info!("History is empty"),
            }

            tracing::info!("Loading migrations from {:?}", migration_dir);
            let listing = directory::list(migration_dir)?;
            selector::select_up(&listing, latest, max_count)?
        }
        MigrationDirection::Down => {
            tracing::info!("Getting the {max_count} most recent migration(s) from history...");
            let applied = engine.fetch_applied(max_count).await?;
            if applied.is_empty() {
                tracing::info!("History is empty");
                return Ok(MigrationBatch::empty(direction));
            }

            tracing::info!("Loading migrations from {:?}", migration_dir);
            let listing = directory::list(migration_dir)?;
            selector::select_down(&listing, &applied, max_count)?
        }
    };

    Ok(batch)
}

/// Runs each migration in the order given and updates history after each one.
/// Stops at the first failure.
pub async fn execute<E: DbEngine>(
    engine: &mut E,
    direction: MigrationDirection,
    migrations: &[Migration],
) -> Result<(), MigrastampError> {
    for Migration { file, scripts } in migrations {
        tracing::info!("{} {}...", direction.verb(), file.identifier);

        let script = scripts.script(direction);
        if script.trim().is_empty() {
            tracing::warn!("{} {} has an empty {direction} script", direction.noun(), file.identifier);
        } else {
            engine.execute(script).await?;
        }

        match direction {
            MigrationDirection::Up => engine.insert_record(file.identifier).await?,
            MigrationDirection::Down => engine.delete_record(file.identifier).await?,
        }
    }

    Ok(())
}

/// Plans and executes a batch inside a single transaction.
pub async fn migrate<E: DbEngine>(
    engine: &mut E,
    migration_dir: &Path,
    direction: MigrationDirection,
    max_count: usize,
    flag_plan: bool,
    flag_dry_run: bool,
) -> Result<MigrationReport, MigrastampError> {
    peck(engine).await?;

    tracing::info!("Beginning transaction...");
    engine.begin().await?;

    let result = plan_and_execute(engine, migration_dir, direction, max_count, flag_plan).await;
    let batch = match result {
        Ok(batch) => batch,
        Err(e) => {
            if let Err(rollback_error) = engine.rollback().await {
                tracing::error!("Rollback failed: {}", rollback_error);
            }
            return Err(e);
        }
    };

    if flag_plan {
        engine.rollback().await?;
        tracing::info!("Planning complete - no migrations executed");
        return Ok(MigrationReport { batch, executed: false, committed: false });
    }

    if flag_dry_run {
        engine.rollback().await?;
        tracing::info!("Dry run completed - transaction successfully rolled back");
        Ok(MigrationReport { batch, executed: true, committed: false })
    } else {
        engine.commit().await?;
        tracing::info!("{} completed - transaction successfully committed", direction.noun());
        Ok(MigrationReport { batch, executed: true, committed: true })
    }
}

async fn plan_and_execute<E: DbEngine>(
    engine: &mut E,
    migration_dir: &Path,
    direction: MigrationDirection,
    max_count: usize,
    flag_plan: bool,
) -> Result<MigrationBatch, MigrastampError> {
    let batch = plan(engine, migration_dir, direction, max_count).await?;

    let migrations = batch
        .iter()
        .map(Migration::from_file)
        .collect::<Result<Vec<Migration>, _>>()?;

    ux::show_migration_plan(direction, &migrations)?;

    if !flag_plan {
        execute(engine, direction, &migrations).await?;
    }

    Ok(batch)
}
