#[cfg(test)]
pub mod test_utils {
    use crate::db::{DbEngine, EngineError, EngineErrorKind};
    use crate::migration::{directory, MigrationIdentifier, MigrationScripts};

    use std::collections::BTreeSet;
    use std::path::Path;


    /// In-memory history store with transaction semantics:
    /// work done after `begin` only becomes visible on `commit`.
    /// History is keyed by identifier, and inserting a recorded identifier is
    /// a no-op, as with `ON CONFLICT DO NOTHING` on the Postgres table.
    #[derive(Default)]
    pub struct MemoryEngine {
        pub applied: BTreeSet<MigrationIdentifier>,
        pub executed: Vec<String>,
        /// Every identifier passed to `insert_record`, duplicates included.
        pub inserted: Vec<MigrationIdentifier>,
        pub table_ready: bool,
        /// Any script containing this text fails to execute.
        pub fail_on: Option<String>,
        pending: Option<(BTreeSet<MigrationIdentifier>, Vec<String>)>,
    }

    impl MemoryEngine {
        pub fn with_applied(identifiers: &[i64]) -> Self {
            MemoryEngine {
                applied: identifiers.iter().copied().map(MigrationIdentifier::from).collect(),
                ..Default::default()
            }
        }

        pub fn failing_on(text: &str) -> Self {
            MemoryEngine {
                fail_on: Some(text.to_string()),
                ..Default::default()
            }
        }

        pub fn applied_ids(&self) -> Vec<i64> {
            self.applied.iter().map(|id| id.as_i64()).collect()
        }

        fn state(&mut self) -> (&mut BTreeSet<MigrationIdentifier>, &mut Vec<String>) {
            match &mut self.pending {
                Some((applied, executed)) => (applied, executed),
                None => (&mut self.applied, &mut self.executed),
            }
        }
    }

    impl DbEngine for MemoryEngine {
        async fn ensure_table(&mut self) -> Result<(), EngineError> {
            self.table_ready = true;
            Ok(())
        }

        async fn begin(&mut self) -> Result<(), EngineError> {
            if self.pending.is_none() {
                self.pending = Some((self.applied.clone(), self.executed.clone()));
            }
            Ok(())
        }

        async fn fetch_applied(&mut self, limit: usize) -> Result<Vec<MigrationIdentifier>, EngineError> {
            let (applied, _) = self.state();
            Ok(applied.iter().rev().take(limit).copied().collect())
        }

        async fn execute(&mut self, sql: &str) -> Result<(), EngineError> {
            if self.fail_on.as_deref().is_some_and(|needle| sql.contains(needle)) {
                return Err(EngineError {
                    kind: EngineErrorKind::SQLX(sqlx::Error::Protocol(format!("failed: {sql}"))),
                });
            }
            let (_, executed) = self.state();
            executed.push(sql.to_string());
            Ok(())
        }

        async fn insert_record(&mut self, identifier: MigrationIdentifier) -> Result<(), EngineError> {
            self.inserted.push(identifier);
            let (applied, _) = self.state();
            applied.insert(identifier);
            Ok(())
        }

        async fn delete_record(&mut self, identifier: MigrationIdentifier) -> Result<(), EngineError> {
            let (applied, _) = self.state();
            applied.remove(&identifier);
            Ok(())
        }

        async fn rollback(&mut self) -> Result<(), EngineError> {
            self.pending = None;
            Ok(())
        }

        async fn commit(&mut self) -> Result<(), EngineError> {
            if let Some((applied, executed)) = self.pending.take() {
                self.applied = applied;
                self.executed = executed;
            }
            Ok(())
        }
    }


    /// Write a migration file named `<identifier>_<name>` with the given scripts.
    pub fn write_migration(dir: &Path, identifier: i64, name: &str, up: &str, down: &str) {
        let scripts = MigrationScripts { up: up.to_string(), down: down.to_string() };
        directory::write_scripts(&dir.join(format!("{identifier}_{name}")), &scripts)
            .expect("Failed to write migration fixture");
    }
}
