use crate::migration::{MigrationDirection, MigrationFile, MigrationIdentifier};

use serde::Serialize;


/// Ordered migrations for one execution pass. Ascending for `Up`, descending for `Down`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MigrationBatch {
    direction: MigrationDirection,
    migrations: Vec<MigrationFile>,
}

impl MigrationBatch {
    pub(crate) fn new(direction: MigrationDirection, migrations: Vec<MigrationFile>) -> Self {
        MigrationBatch { direction, migrations }
    }

    pub fn empty(direction: MigrationDirection) -> Self {
        MigrationBatch::new(direction, Vec::new())
    }

    pub fn direction(&self) -> MigrationDirection {
        self.direction
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MigrationFile> {
        self.migrations.iter()
    }

    pub fn len(&self) -> usize {
        self.migrations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.migrations.is_empty()
    }

    pub fn identifiers(&self) -> Vec<MigrationIdentifier> {
        self.migrations.iter().map(|m| m.identifier).collect()
    }
}

impl<'a> IntoIterator for &'a MigrationBatch {
    type Item = &'a MigrationFile;
    type IntoIter = std::slice::Iter<'a, MigrationFile>;

    fn into_iter(self) -> Self::IntoIter {
        self.migrations.iter()
    }
}
