use std::collections::HashMap;

use super::{ModuleCoordinate, ModulePath, Replacement, ReplacementTarget};

/// Replacement directives of a single manifest, keyed by the module path they rewrite.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplacementTable {
    any_version: HashMap<ModulePath, ReplacementTarget>,
    exact_version: HashMap<ModuleCoordinate, ReplacementTarget>,
}

impl ReplacementTable {
    /// Later directives override earlier ones for the same key.
    pub fn new(replacements: &[Replacement]) -> Self {
        let mut table = ReplacementTable::default();
        for replacement in replacements {
            match &replacement.old_version {
                Some(version) => {
                    table.exact_version.insert(
                        ModuleCoordinate::new(replacement.old_path.clone(), version.as_str()),
                        replacement.new.clone(),
                    );
                }
                None => {
                    table
                        .any_version
                        .insert(replacement.old_path.clone(), replacement.new.clone());
                }
            }
        }
        table
    }

    /// Returns the coordinate to use for `coordinate`. A directive for the exact
    /// version wins over one for the whole path; without a match the coordinate is
    /// returned unchanged.
    pub fn resolve(&self, coordinate: &ModuleCoordinate) -> ReplacementTarget {
        self.exact_version
            .get(coordinate)
            .or_else(|| self.any_version.get(&coordinate.path))
            .cloned()
            .unwrap_or_else(|| ReplacementTarget::Module(coordinate.clone()))
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use pretty_assertions::assert_eq;

    fn module(path: &str, version: &str) -> ReplacementTarget {
        ReplacementTarget::Module(ModuleCoordinate::new(path, version))
    }

    fn replacement(old: &str, old_version: Option<&str>, new: ReplacementTarget) -> Replacement {
        Replacement {
            old_path: ModulePath::from(old),
            old_version: old_version.map(str::to_owned),
            new,
        }
    }

    #[test]
    fn empty_table_is_identity() {
        let table = ReplacementTable::new(&[]);
        let coordinate = ModuleCoordinate::new("foo", "v1.0.0");
        assert_eq!(table.resolve(&coordinate), module("foo", "v1.0.0"));
    }

    #[test]
    fn replaces_path_and_version() {
        let table = ReplacementTable::new(&[replacement("baz", None, module("qux", "v3"))]);
        assert_eq!(
            table.resolve(&ModuleCoordinate::new("baz", "v1")),
            module("qux", "v3")
        );
        assert_eq!(
            table.resolve(&ModuleCoordinate::new("other", "v1")),
            module("other", "v1")
        );
    }

    #[test]
    fn exact_version_wins() {
        let table = ReplacementTable::new(&[
            replacement("baz", Some("v1"), module("exact", "v1")),
            replacement("baz", None, module("any", "v2")),
        ]);
        assert_eq!(
            table.resolve(&ModuleCoordinate::new("baz", "v1")),
            module("exact", "v1")
        );
        assert_eq!(
            table.resolve(&ModuleCoordinate::new("baz", "v5")),
            module("any", "v2")
        );
    }

    #[test]
    fn exact_version_only_matches_that_version() {
        let table = ReplacementTable::new(&[replacement("baz", Some("v1"), module("qux", "v3"))]);
        assert_eq!(
            table.resolve(&ModuleCoordinate::new("baz", "v2")),
            module("baz", "v2")
        );
    }

    #[test]
    fn last_directive_wins() {
        let table = ReplacementTable::new(&[
            replacement("baz", None, module("first", "v1")),
            replacement("baz", None, ReplacementTarget::Directory(PathBuf::from("../baz"))),
        ]);
        assert_eq!(
            table.resolve(&ModuleCoordinate::new("baz", "v1")),
            ReplacementTarget::Directory(PathBuf::from("../baz"))
        );
    }
}
