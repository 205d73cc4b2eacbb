use crate::migration::{MigrationError, MigrationErrorKind, MigrationScripts};

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use std::fs;
use std::path::{Path, PathBuf};


/// Snapshot of the file names found in a migration directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryListing {
    pub directory: PathBuf,
    pub file_names: Vec<String>,
}

impl DirectoryListing {
    pub fn new(directory: impl Into<PathBuf>, file_names: Vec<String>) -> Self {
        DirectoryListing { directory: directory.into(), file_names }
    }
}


pub fn ensure_directory(directory: &Path) -> Result<(), MigrationError> {
    if !directory.is_dir() {
        return Err(MigrationError { kind: MigrationErrorKind::InvalidDirectory(directory.to_path_buf()) })
    }
    Ok(())
}

/// List every file in `directory`. Subdirectories are skipped, not recursed into.
pub fn list(directory: &Path) -> Result<DirectoryListing, MigrationError> {
    ensure_directory(directory)?;

    let file_names = fs::read_dir(directory)
        .map_err(|e| MigrationError::io(directory, e))?
        .filter_map(|entry| {
            let entry = match entry {
                Ok(e) => e,
                // Fatal: reading the directory failed.
                Err(e) => return Some(Err(MigrationError::io(directory, e))),
            };

            let path = entry.path();
            if path.is_dir() {
                tracing::debug!("Skipping subdirectory: {:?}", path);
                return None;
            }

            match entry.file_name().into_string() {
                Ok(name) => Some(Ok(name)),
                // Fatal: a name that is not UTF-8 cannot carry an identifier.
                Err(name) => Some(Err(MigrationError::malformed(&name.to_string_lossy()))),
            }
        })
        .collect::<Result<Vec<String>, MigrationError>>()?;

    tracing::debug!("Found {} file(s) in {:?}", file_names.len(), directory);

    Ok(DirectoryListing::new(directory, file_names))
}

pub fn read_scripts(path: &Path) -> Result<MigrationScripts, MigrationError> {
    let content = fs::read_to_string(path)
        .map_err(|e| MigrationError::io(path, e))?;

    serde_json::from_str(&content).map_err(|source| {
        MigrationError { kind: MigrationErrorKind::InvalidContent { path: path.to_path_buf(), source } }
    })
}

/// Write `scripts` as JSON indented with four spaces.
pub fn write_scripts(path: &Path, scripts: &MigrationScripts) -> Result<(), MigrationError> {
    let mut buffer = Vec::new();
    let mut serializer = serde_json::Serializer::with_formatter(
        &mut buffer,
        PrettyFormatter::with_indent(b"    ")
    );
    scripts
        .serialize(&mut serializer)
        .map_err(|e| MigrationError { kind: MigrationErrorKind::Serialize(e) })?;

    fs::write(path, buffer).map_err(|e| MigrationError::io(path, e))
}
