// {
//   "command": "up",
//   "status": "success",
//   "data": {
//     "direction": "up",
//     "executed": true,
//     "committed": true,
//     "migrations": [
//       { "identifier": 1700000000000, "name": "create_users", "path": "migrations/1700000000000_create_users" }
//     ]
//   },
//   "error": null
// }
use crate::cli::error::{MigrastampError, MigrastampErrorKind};
use crate::migration::{MigrationDirection, MigrationFile};
use serde::Serialize;


#[derive(Debug, Serialize)]
#[serde(tag = "type", content = "message", rename_all = "snake_case")]
pub enum MigrastampErrorJson {
    Engine(String),
    Fmt(String),
    Migration(String),
    MissingConnectionString(String),
    SetGlobalDefault(String),
}

impl MigrastampErrorJson {
    pub fn message(&self) -> &str {
        match self {
            Self::Engine(message)
            | Self::Fmt(message)
            | Self::Migration(message)
            | Self::MissingConnectionString(message)
            | Self::SetGlobalDefault(message) => message,
        }
    }
}

impl From<&MigrastampError> for MigrastampErrorJson {
    fn from(e: &MigrastampError) -> Self {
        let message = e.kind.to_string();

        match &e.kind {
            MigrastampErrorKind::Engine(_) => Self::Engine(message),
            MigrastampErrorKind::Fmt(_) => Self::Fmt(message),
            MigrastampErrorKind::Migration(_) => Self::Migration(message),
            MigrastampErrorKind::MissingConnectionString(_) => Self::MissingConnectionString(message),
            MigrastampErrorKind::SetGlobalDefault(_) => Self::SetGlobalDefault(message),
        }
    }
}


#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum CommandData {
    Created { migration: MigrationFile },
    Batch {
        direction: MigrationDirection,
        executed: bool,
        committed: bool,
        migrations: Vec<MigrationFile>,
    },
    Pecked { table: String },
}


#[derive(Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MigrastampStatus {
    Success,
    Error,
}

#[derive(Debug, Serialize)]
pub struct MigrastampOutput<T: Serialize> {
    pub command: String,
    pub status: MigrastampStatus,
    pub data: Option<T>,
    pub error: Option<MigrastampErrorJson>,
}

impl<T: Serialize> MigrastampOutput<T> {
    pub fn from_result(command: &str, result: Result<T, MigrastampError>) -> Self {
        match result {
            Ok(data) => MigrastampOutput {
                command: command.to_string(),
                status: MigrastampStatus::Success,
                data: Some(data),
                error: None,
            },
            Err(e) => MigrastampOutput {
                command: command.to_string(),
                status: MigrastampStatus::Error,
                data: None,
                error: Some(MigrastampErrorJson::from(&e)),
            },
        }
    }
}
