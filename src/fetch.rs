use std::{
    collections::HashSet,
    path::{Path, PathBuf},
};

use log::{debug, info, trace, warn};
use thiserror::Error;
use walkdir::{DirEntry, WalkDir};

use crate::{
    fetcher::{FetchError, ModuleFetcher},
    model::{
        filter::FilterSet,
        gomod::{Manifest, ModulePath, ReplacementTable, ReplacementTarget, MANIFEST_FILE_NAME},
        result::ResultSet,
        ParseError,
    },
};

/// How manifests are located under the root of a walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Discovery {
    /// Every `go.mod` below the root. Unreadable manifests are skipped.
    #[default]
    Sweep,
    /// Only `<root>/go.mod`. Any error reading it aborts the walk.
    Single,
}

#[derive(Error, Debug)]
pub enum WalkError {
    #[error("Module directory {0} does not exist")]
    MissingDirectory(String),
    #[error("No go.mod found in {0}")]
    MissingManifest(String),
    #[error("Error while reading manifest {path}: {source}")]
    Manifest {
        path: String,
        #[source]
        source: ParseError,
    },
    #[error(transparent)]
    Fetch(#[from] FetchError),
}

/// Walks the manifests under `root`, fetching every related requirement and
/// recursing into what was fetched. Modules that fail to fetch end up in `result`.
///
/// Only the top-level call honours `discovery`; fetched modules are always read
/// in [`Discovery::Single`] mode. In a [`Discovery::Sweep`] walk a fetched module
/// whose manifest cannot be read is skipped and its siblings are still visited.
pub fn walk<F: ModuleFetcher>(
    root: &Path,
    discovery: Discovery,
    filters: &FilterSet,
    fetcher: &F,
    result: &mut ResultSet,
) -> Result<(), WalkError> {
    let mut walker = Walker {
        fetcher,
        filters,
        result,
        best_effort: discovery == Discovery::Sweep,
        attempted: HashSet::new(),
    };
    match discovery {
        Discovery::Sweep => walker.sweep(root),
        Discovery::Single => walker.single(root, true),
    }
}

struct Walker<'a, F> {
    fetcher: &'a F,
    filters: &'a FilterSet,
    result: &'a mut ResultSet,
    best_effort: bool,
    // Paths fetched at most once per walk, whatever the outcome.
    attempted: HashSet<ModulePath>,
}

impl<F: ModuleFetcher> Walker<'_, F> {
    fn sweep(&mut self, root: &Path) -> Result<(), WalkError> {
        if !root.is_dir() {
            return Err(WalkError::MissingDirectory(root.display().to_string()));
        }

        for manifest_path in find_manifests(root) {
            match Manifest::from_file(&manifest_path) {
                Ok(manifest) => self.process(&manifest_path, &manifest)?,
                Err(err) => warn!(
                    "Skipping manifest {} that could not be read: {}",
                    manifest_path.display(),
                    err
                ),
            }
        }
        Ok(())
    }

    fn single(&mut self, dir: &Path, top_level: bool) -> Result<(), WalkError> {
        if !dir.is_dir() {
            return Err(WalkError::MissingDirectory(dir.display().to_string()));
        }

        let manifest_path = dir.join(MANIFEST_FILE_NAME);
        if !manifest_path.exists() {
            if top_level {
                return Err(WalkError::MissingManifest(dir.display().to_string()));
            }
            debug!(
                "Couldn't find {} in {}, assuming module has no dependencies",
                MANIFEST_FILE_NAME,
                dir.display()
            );
            return Ok(());
        }

        let manifest =
            Manifest::from_file(&manifest_path).map_err(|source| WalkError::Manifest {
                path: manifest_path.display().to_string(),
                source,
            })?;
        self.process(&manifest_path, &manifest)
    }

    fn process(&mut self, manifest_path: &Path, manifest: &Manifest) -> Result<(), WalkError> {
        debug!(
            "Processing {} (go {}) with {} requirements",
            manifest_path.display(),
            manifest.go_version.as_deref().unwrap_or("unspecified"),
            manifest.requires.len()
        );
        let replacements = ReplacementTable::new(&manifest.replaces);

        for requirement in &manifest.requires {
            let coordinate = match replacements.resolve(&requirement.coordinate) {
                ReplacementTarget::Module(coordinate) => coordinate,
                ReplacementTarget::Directory(dir) => {
                    info!(
                        "Skipping {}, replaced by local directory {}",
                        requirement.coordinate,
                        dir.display()
                    );
                    continue;
                }
            };
            if coordinate != requirement.coordinate {
                debug!("{} replaced by {}", requirement.coordinate, coordinate);
            }
            if requirement.indirect {
                trace!("{} is an indirect requirement", coordinate);
            }

            if !self.filters.is_related(coordinate.path.as_str()) {
                trace!("Ignoring unrelated {}", coordinate);
                continue;
            }
            if self.result.contains(&coordinate.path) {
                debug!("{} is already known to be missing", coordinate.path);
                continue;
            }
            if !self.attempted.insert(coordinate.path.clone()) {
                trace!("{} was already visited", coordinate.path);
                continue;
            }

            info!("Downloading {}", coordinate);
            match self.fetcher.fetch(&coordinate) {
                Ok(location) => {
                    info!("Downloaded {}", coordinate);
                    match self.single(&location, false) {
                        Err(
                            err @ (WalkError::Manifest { .. } | WalkError::MissingDirectory(_)),
                        ) if self.best_effort => {
                            warn!("Skipping dependencies of {}: {}", coordinate, err)
                        }
                        other => other?,
                    }
                }
                Err(err) if err.is_recoverable() => {
                    warn!("Failed to download {}: {}", coordinate, err);
                    self.result.insert(coordinate.path);
                }
                Err(err) => return Err(err.into()),
            }
        }

        Ok(())
    }
}

/// Every manifest below `root` in file name order, skipping `vendor`, `testdata`
/// and hidden directories.
fn find_manifests(root: &Path) -> Vec<PathBuf> {
    let mut manifests = Vec::new();
    let entries = WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || !is_skipped_dir(entry));

    for entry in entries {
        match entry {
            Ok(entry) if entry.file_type().is_file() && entry.file_name() == MANIFEST_FILE_NAME => {
                manifests.push(entry.into_path())
            }
            Ok(_) => {}
            Err(err) => warn!("Skipping unreadable entry while scanning: {}", err),
        }
    }
    debug!("Found {} manifests under {}", manifests.len(), root.display());
    manifests
}

fn is_skipped_dir(entry: &DirEntry) -> bool {
    entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| name == "vendor" || name == "testdata" || name.starts_with('.'))
}
