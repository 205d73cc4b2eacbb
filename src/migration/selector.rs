//! Reconciles a directory listing with the recorded history.
//!
//! Both selectors are pure: the caller fetches the history snapshot and the
//! directory listing, and the selector decides which files to run and in what
//! order. A single malformed file name aborts the whole selection.

use crate::migration::{
    DirectoryListing,
    MigrationBatch,
    MigrationDirection,
    MigrationError,
    MigrationFile,
    MigrationIdentifier,
};

use std::collections::HashSet;


/// Parse every file name in the listing, stopping at the first malformed one.
fn parse_listing(listing: &DirectoryListing) -> Result<Vec<MigrationFile>, MigrationError> {
    listing
        .file_names
        .iter()
        .map(|file_name| MigrationFile::from_file_name(&listing.directory, file_name))
        .collect()
}

/// Pending migrations newer than `latest_applied`, oldest first, at most `max_count`.
///
/// An empty history is treated as a floor of 0, so every file is pending.
pub fn select_up(
    listing: &DirectoryListing,
    latest_applied: Option<MigrationIdentifier>,
    max_count: usize,
) -> Result<MigrationBatch, MigrationError> {
    let floor = latest_applied.unwrap_or(MigrationIdentifier::from(0));

    let mut pending: Vec<MigrationFile> = parse_listing(listing)?
        .into_iter()
        .filter(|migration| {
            let keep = migration.identifier > floor;
            if !keep {
                tracing::trace!("Skipping {} (applied, floor {})", migration.identifier, floor);
            }
            keep
        })
        .collect();

    pending.sort_by(|a, b| {
        a.identifier
            .cmp(&b.identifier)
            .then_with(|| a.name.cmp(&b.name))
    });
    pending.truncate(max_count);

    tracing::debug!("Selected {} migration(s) above {}", pending.len(), floor);

    Ok(MigrationBatch::new(MigrationDirection::Up, pending))
}

/// Applied migrations to revert, newest first, at most `max_count`.
///
/// `applied` is the most recent `max_count` identifiers from history. Identifiers
/// are compared as integers on both sides.
pub fn select_down(
    listing: &DirectoryListing,
    applied: &[MigrationIdentifier],
    max_count: usize,
) -> Result<MigrationBatch, MigrationError> {
    if applied.is_empty() {
        return Ok(MigrationBatch::empty(MigrationDirection::Down));
    }

    let applied: HashSet<MigrationIdentifier> = applied.iter().copied().collect();

    let mut reverting: Vec<MigrationFile> = parse_listing(listing)?
        .into_iter()
        .filter(|migration| applied.contains(&migration.identifier))
        .collect();

    let found: HashSet<MigrationIdentifier> = reverting.iter().map(|m| m.identifier).collect();
    for missing in applied.difference(&found) {
        tracing::warn!("Applied migration {} has no file in {:?}", missing, listing.directory);
    }

    reverting.sort_by(|a, b| {
        b.identifier
            .cmp(&a.identifier)
            .then_with(|| b.name.cmp(&a.name))
    });
    reverting.truncate(max_count);

    tracing::debug!("Selected {} migration(s) to roll back", reverting.len());

    Ok(MigrationBatch::new(MigrationDirection::Down, reverting))
}
