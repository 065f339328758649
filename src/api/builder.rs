use std::{env, error::Error, ffi::OsString, path::PathBuf};

use log::debug;

use crate::{
    cache::ModuleCache,
    config::ModfetchConfig,
    fetch::Discovery,
    fetcher::{GoCommandFetcher, DEFAULT_FETCH_PROGRAM},
    model::filter::FilterSet,
    Modfetch,
};

#[derive(Default)]
pub struct ModfetchBuilder {
    // All other paths are relative to `root`
    root: Option<PathBuf>,
    filters: FilterSet,
    discovery: Discovery,
    output_file: Option<PathBuf>,
    cache_directory_path: Option<PathBuf>,
    fetch_program: Option<OsString>,
}

impl ModfetchBuilder {
    /// Directory to start the walk from.
    ///
    /// Defaults to the current directory.
    pub fn root(mut self, path: impl Into<PathBuf>) -> Self {
        self.root = Some(path.into());
        self
    }

    /// Only modules whose path contains one of these patterns are fetched.
    pub fn filters(mut self, filters: FilterSet) -> Self {
        self.filters = filters;
        self
    }

    /// Defaults to [`Discovery::Sweep`].
    pub fn discovery(mut self, discovery: Discovery) -> Self {
        self.discovery = discovery;
        self
    }

    /// File receiving the missing module paths, one per line.
    pub fn output_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_file = Some(path.into());
        self
    }

    /// Location of the Go module cache.
    ///
    /// Defaults to `$GOMODCACHE`, then `$GOPATH/pkg/mod`, then `$HOME/go/pkg/mod`.
    pub fn cache_directory(mut self, path: impl Into<PathBuf>) -> Self {
        self.cache_directory_path = Some(path.into());
        self
    }

    /// Program invoked as `<program> mod download <path>@<version>`.
    ///
    /// Defaults to `go`.
    pub fn fetch_program(mut self, program: impl Into<OsString>) -> Self {
        self.fetch_program = Some(program.into());
        self
    }

    pub fn try_build(self) -> Result<Modfetch, Box<dyn Error>> {
        let Self {
            root,
            filters,
            discovery,
            output_file,
            cache_directory_path,
            fetch_program,
        } = self;
        let root = match root {
            Some(root) => root,
            None => env::current_dir()?,
        };

        let config = ModfetchConfig::load()?;

        let cache_directory = match cache_directory_path.or(config.cache_dir) {
            Some(path) => root.join(path),
            None => {
                return Err(
                    "Could not locate the Go module cache. Please define $GOMODCACHE or $HOME."
                        .into(),
                )
            }
        };
        debug!("Using module cache {}", cache_directory.display());
        let cache = ModuleCache::new(cache_directory)?;

        let fetch_program = fetch_program
            .or_else(|| config.fetch_program.map(OsString::from))
            .unwrap_or_else(|| OsString::from(DEFAULT_FETCH_PROGRAM));

        let output_file = output_file.map(|path| root.join(path));

        Ok(Modfetch {
            fetcher: GoCommandFetcher::new(fetch_program, cache),
            root,
            filters,
            discovery,
            output_file,
        })
    }
}
