use std::path::{Path, PathBuf};

use log::trace;
use thiserror::Error;

use crate::model::gomod::ModuleCoordinate;

/// The Go module cache (`$GOMODCACHE`), where the fetch primitive extracts
/// downloaded modules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleCache {
    location: PathBuf,
}

#[derive(Error, Debug)]
pub enum CacheError {
    #[error("Cache location {location} is not a directory")]
    BadLocation { location: String },
}

impl ModuleCache {
    /// The location does not need to exist yet; the fetch primitive creates it.
    pub fn new(location: PathBuf) -> Result<ModuleCache, CacheError> {
        if location.exists() && !location.is_dir() {
            return Err(CacheError::BadLocation {
                location: location.to_str().unwrap_or("").to_string(),
            });
        }
        Ok(ModuleCache { location })
    }

    pub fn location(&self) -> &Path {
        &self.location
    }

    /// Directory holding the extracted sources of `coordinate`.
    pub fn module_dir(&self, coordinate: &ModuleCoordinate) -> PathBuf {
        let entry = format!(
            "{}@{}",
            escape_case(coordinate.path.as_str()),
            escape_case(&coordinate.version)
        );
        let mut path = self.location.clone();
        for component in entry.split('/') {
            path.push(component);
        }
        trace!("Cache entry for {} is {}", coordinate, path.display());
        path
    }
}

/// Go's case-insensitive-filesystem safe encoding: every upper-case letter is
/// replaced by `!` followed by its lower-case form.
fn escape_case(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        if c.is_ascii_uppercase() {
            escaped.push('!');
            escaped.push(c.to_ascii_lowercase());
        } else {
            escaped.push(c);
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn module_dir_layout() {
        let cache = ModuleCache::new(PathBuf::from("/go/pkg/mod")).unwrap();
        assert_eq!(
            cache.module_dir(&ModuleCoordinate::new("golang.org/x/text", "v0.14.0")),
            PathBuf::from("/go/pkg/mod/golang.org/x/text@v0.14.0")
        );
    }

    #[test]
    fn module_dir_escapes_upper_case() {
        let cache = ModuleCache::new(PathBuf::from("/go/pkg/mod")).unwrap();
        assert_eq!(
            cache.module_dir(&ModuleCoordinate::new(
                "github.com/Azure/go-autorest",
                "v14.2.0+incompatible"
            )),
            PathBuf::from("/go/pkg/mod/github.com/!azure/go-autorest@v14.2.0+incompatible")
        );
        assert_eq!(escape_case("v1.0.0-RC1"), "v1.0.0-!r!c1");
    }

    #[test]
    fn bad_location() {
        let file = tempfile::NamedTempFile::new().unwrap();
        assert!(matches!(
            ModuleCache::new(file.path().to_path_buf()),
            Err(CacheError::BadLocation { .. })
        ));
    }

    #[test]
    fn missing_location_is_accepted() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ModuleCache::new(dir.path().join("not-yet-created")).unwrap();
        assert_eq!(cache.location(), dir.path().join("not-yet-created"));
    }
}
