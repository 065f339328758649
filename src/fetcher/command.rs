use std::{
    ffi::OsString,
    path::PathBuf,
    process::{Command, Output},
};

use log::{debug, trace};

use crate::{cache::ModuleCache, model::gomod::ModuleCoordinate};

use super::{FetchError, ModuleFetcher};

pub const DEFAULT_FETCH_PROGRAM: &str = "go";

/// Fetches modules with `go mod download <path>@<version>`.
pub struct GoCommandFetcher {
    program: OsString,
    cache: ModuleCache,
}

impl GoCommandFetcher {
    pub fn new(program: impl Into<OsString>, cache: ModuleCache) -> Self {
        GoCommandFetcher {
            program: program.into(),
            cache,
        }
    }

    fn command(&self, coordinate: &ModuleCoordinate) -> Command {
        let mut command = Command::new(&self.program);
        command
            .arg("mod")
            .arg("download")
            .arg("--")
            .arg(coordinate.to_string())
            // Run outside of any module so the caller's go.mod and go.sum stay untouched.
            .current_dir(std::env::temp_dir())
            .env("GOMODCACHE", self.cache.location());
        command
    }
}

impl ModuleFetcher for GoCommandFetcher {
    fn fetch(&self, coordinate: &ModuleCoordinate) -> Result<PathBuf, FetchError> {
        let mut command = self.command(coordinate);
        trace!("Running {:?}", command);
        let output = command.output().map_err(|source| FetchError::Unavailable {
            program: self.program.to_string_lossy().into_owned(),
            source,
        })?;

        if output.status.success() {
            let location = self.cache.module_dir(coordinate);
            debug!("{} extracted to {}", coordinate, location.display());
            Ok(location)
        } else {
            Err(FetchError::Failed {
                coordinate: coordinate.to_string(),
                status: output.status,
                output: combined_output(&output),
            })
        }
    }
}

fn combined_output(output: &Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    [stdout.trim(), stderr.trim()]
        .iter()
        .filter(|s| !s.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join("\n")
}
