mod error;
mod postgres;
pub use error::{EngineError, EngineErrorKind};
pub use postgres::PostgresEngine;

use crate::migration::MigrationIdentifier;

use std::fmt;


pub const DEFAULT_HISTORY_TABLE: &str = "migrations";


/// Name of the table recording applied migrations, optionally schema-qualified.
/// The name is interpolated into SQL, so every segment is validated as a plain identifier.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HistoryTable(String);

impl HistoryTable {
    pub fn new(name: &str) -> Result<Self, EngineError> {
        let valid_segment = |segment: &str| {
            let mut chars = segment.chars();
            matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        };

        let segments: Vec<&str> = name.split('.').collect();
        if segments.len() > 2 || !segments.iter().all(|s| valid_segment(s)) {
            return Err(EngineError { kind: EngineErrorKind::InvalidTableName(name.to_string()) });
        }

        Ok(HistoryTable(name.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for HistoryTable {
    fn default() -> Self {
        HistoryTable(DEFAULT_HISTORY_TABLE.to_string())
    }
}

impl fmt::Display for HistoryTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}


/// A database holding the migration history and running migration scripts.
///
/// All calls between `begin` and `commit`/`rollback` share one transaction.
#[allow(async_fn_in_trait)]
pub trait DbEngine {
    /// Create the history table if it does not exist yet.
    async fn ensure_table(&mut self) -> Result<(), EngineError>;
    async fn begin(&mut self) -> Result<(), EngineError>;
    /// The `limit` most recently applied identifiers, newest first.
    async fn fetch_applied(&mut self, limit: usize) -> Result<Vec<MigrationIdentifier>, EngineError>;
    async fn execute(&mut self, sql: &str) -> Result<(), EngineError>;
    async fn insert_record(&mut self, identifier: MigrationIdentifier) -> Result<(), EngineError>;
    async fn delete_record(&mut self, identifier: MigrationIdentifier) -> Result<(), EngineError>;
    async fn rollback(&mut self) -> Result<(), EngineError>;
    async fn commit(&mut self) -> Result<(), EngineError>;

    async fn fetch_latest(&mut self) -> Result<Option<MigrationIdentifier>, EngineError> {
        Ok(self.fetch_applied(1).await?.into_iter().next())
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_table_accepts_identifiers() {
        for name in ["migrations", "_history", "schema_v2.migrations", "Audit.Log_1"] {
            let table = HistoryTable::new(name)
                .unwrap_or_else(|e| panic!("Expected {name:?} to be accepted: {e}"));
            assert_eq!(table.as_str(), name);
        }
        assert_eq!(HistoryTable::default().as_str(), DEFAULT_HISTORY_TABLE);
    }

    #[test]
    fn test_history_table_rejects_injection() {
        let cases = [
            "",
            "1migrations",
            "migrations; DROP TABLE users",
            "a.b.c",
            "schema.",
            "\"quoted\"",
            "with space",
        ];

        for name in cases {
            let err = HistoryTable::new(name).unwrap_err();
            assert!(matches!(err.kind, EngineErrorKind::InvalidTableName(_)), "Expected {name:?} to be rejected");
        }
    }
}
