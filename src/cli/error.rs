use crate::{db::EngineError, migration::MigrationError};

use std::error::Error;
use std::fmt;
use tracing::subscriber::SetGlobalDefaultError;


#[derive(Debug)]
pub struct MigrastampError {
    pub kind: MigrastampErrorKind
}

impl fmt::Display for MigrastampError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MigrastampError: {}", self.kind)
    }
}

impl Error for MigrastampError {
	fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.kind)
	}
}

#[derive(Debug)]
pub enum MigrastampErrorKind {
    Engine(EngineError),
    Fmt(std::fmt::Error),
    Migration(MigrationError),
    MissingConnectionString(String),
    SetGlobalDefault(SetGlobalDefaultError),
}

impl fmt::Display for MigrastampErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Engine(error) => write!(f, "{}", error.kind),
            Self::Fmt(e) => write!(f, "Formatting error: {e}"),
            Self::Migration(error) => write!(f, "{}", error.kind),
            Self::MissingConnectionString(command) => write!(f, "A database connection string is required for '{command}'"),
            Self::SetGlobalDefault(error) => write!(f, "Failed to set global default subscriber: {}", error),
        }
    }
}

impl Error for MigrastampErrorKind {
	fn source(&self) -> Option<&(dyn Error + 'static)> {
		match self {
			Self::Engine(source) => Some(source),
			Self::Migration(source) => Some(source),
			Self::SetGlobalDefault(source) => Some(source),
            _ => None
		}
	}
}

impl From<EngineError> for MigrastampError {
    fn from(error: EngineError) -> Self {
        MigrastampError { kind: MigrastampErrorKind::Engine(error) }
    }
}

impl From<std::fmt::Error> for MigrastampError {
    fn from(error: std::fmt::Error) -> Self {
        MigrastampError { kind: MigrastampErrorKind::Fmt(error) }
    }
}

impl From<MigrationError> for MigrastampError {
    fn from(error: MigrationError) -> Self {
        MigrastampError { kind: MigrastampErrorKind::Migration(error) }
    }
}

impl From<SetGlobalDefaultError> for MigrastampError {
    fn from(error: SetGlobalDefaultError) -> Self {
        MigrastampError { kind: MigrastampErrorKind::SetGlobalDefault(error) }
    }
}
