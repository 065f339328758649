use std::{collections::BTreeSet, io::Write};

use super::gomod::ModulePath;

/// Module paths that could not be fetched during a walk.
///
/// Paths are version-agnostic: once a path is recorded it stays recorded for the
/// rest of the walk and is never attempted again.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultSet {
    unresolved: BTreeSet<ModulePath>,
}

impl ResultSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` if the path was already recorded.
    pub fn insert(&mut self, path: ModulePath) -> bool {
        self.unresolved.insert(path)
    }

    pub fn contains(&self, path: &ModulePath) -> bool {
        self.unresolved.contains(path)
    }

    pub fn is_empty(&self) -> bool {
        self.unresolved.is_empty()
    }

    pub fn len(&self) -> usize {
        self.unresolved.len()
    }

    /// Sorted by module path.
    pub fn iter(&self) -> impl Iterator<Item = &ModulePath> {
        self.unresolved.iter()
    }

    /// Writes one module path per line.
    pub fn write_to<W: Write>(&self, mut writer: W) -> std::io::Result<()> {
        for path in &self.unresolved {
            writeln!(writer, "{}", path)?;
        }
        writer.flush()
    }
}
