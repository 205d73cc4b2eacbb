mod batch;
mod direction;
mod error;
pub mod creator;
pub mod directory;
pub mod selector;

pub use batch::MigrationBatch;
pub use direction::MigrationDirection;
pub use directory::DirectoryListing;
pub use error::{MigrationError, MigrationErrorKind};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};


/// Separates the identifier from the human-readable name in a file name.
pub const SEPARATOR: char = '_';

/// Number of decimal digits in a well-formed identifier.
pub const IDENTIFIER_LENGTH: usize = 13;


/// Milliseconds since the Unix epoch at the time a migration was created.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct MigrationIdentifier(i64);

impl MigrationIdentifier {
    /// Current wall-clock time. Two calls within the same millisecond collide.
    pub fn now() -> Self {
        MigrationIdentifier(chrono::Utc::now().timestamp_millis())
    }

    pub fn as_i64(&self) -> i64 {
        self.0
    }

    pub fn is_well_formed(&self) -> bool {
        self.0 > 0 && self.0.to_string().len() == IDENTIFIER_LENGTH
    }
}

impl From<i64> for MigrationIdentifier {
    fn from(value: i64) -> Self {
        MigrationIdentifier(value)
    }
}

impl fmt::Display for MigrationIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}


/// Extract the identifier from a file name: "1700000000000_create_users" -> 1700000000000
pub fn parse_id_from_file_name(file_name: &str) -> Result<MigrationIdentifier, MigrationError> {
    let Some(token) = file_name.split(SEPARATOR).next() else {
        return Err(MigrationError::malformed(file_name));
    };

    match token.parse::<i64>().map(MigrationIdentifier) {
        Ok(identifier) if identifier.is_well_formed() => Ok(identifier),
        _ => Err(MigrationError::malformed(file_name)),
    }
}


/// A migration file on disk, identified by its name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MigrationFile {
    pub identifier: MigrationIdentifier,
    pub name: String,
    pub path: PathBuf,
}

impl MigrationFile {
    pub fn new(directory: &Path, identifier: MigrationIdentifier, name: &str) -> Self {
        MigrationFile {
            identifier,
            name: name.to_string(),
            path: directory.join(format!("{identifier}{SEPARATOR}{name}")),
        }
    }

    pub fn from_file_name(directory: &Path, file_name: &str) -> Result<Self, MigrationError> {
        let identifier = parse_id_from_file_name(file_name)?;
        let name = file_name
            .split_once(SEPARATOR)
            .map(|(_, name)| name)
            .unwrap_or_default();

        Ok(MigrationFile {
            identifier,
            name: name.to_string(),
            path: directory.join(file_name),
        })
    }
}


/// The two-field record stored in every migration file.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MigrationScripts {
    pub up: String,
    pub down: String,
}

impl MigrationScripts {
    pub fn script(&self, direction: MigrationDirection) -> &str {
        match direction {
            MigrationDirection::Up => &self.up,
            MigrationDirection::Down => &self.down,
        }
    }
}


#[derive(Debug)]
pub struct Migration {
    pub file: MigrationFile,
    pub scripts: MigrationScripts,
}

impl Migration {
    pub fn from_file(file: &MigrationFile) -> Result<Self, MigrationError> {
        let scripts = directory::read_scripts(&file.path)?;

        Ok(Migration { file: file.clone(), scripts })
    }
}
