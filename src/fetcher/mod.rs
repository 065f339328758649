mod command;

use std::{path::PathBuf, process::ExitStatus};

use thiserror::Error;

use crate::model::gomod::ModuleCoordinate;

pub use command::{GoCommandFetcher, DEFAULT_FETCH_PROGRAM};

/// Downloads a module and reports where its sources were extracted.
pub trait ModuleFetcher {
    fn fetch(&self, coordinate: &ModuleCoordinate) -> Result<PathBuf, FetchError>;
}

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("fetching {coordinate} exited with {status}: {output}")]
    Failed {
        coordinate: String,
        status: ExitStatus,
        output: String,
    },
    #[error("could not run fetch program `{program}`: {source}")]
    Unavailable {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

impl FetchError {
    /// A recoverable error means this one module is missing; the walk goes on.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, FetchError::Unavailable { .. })
    }
}
