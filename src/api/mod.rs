use std::{error::Error, path::PathBuf};

use crate::{
    cli::command_handlers::do_check,
    fetch::Discovery,
    fetcher::GoCommandFetcher,
    model::{filter::FilterSet, result::ResultSet},
};

mod builder;

pub use builder::ModfetchBuilder;

pub struct Modfetch {
    fetcher: GoCommandFetcher,
    root: PathBuf,
    filters: FilterSet,
    discovery: Discovery,
    output_file: Option<PathBuf>,
}

impl Modfetch {
    pub fn builder() -> ModfetchBuilder {
        ModfetchBuilder::default()
    }

    /// Downloads the dependency closure of every manifest under the root and
    /// reports the modules that could not be fetched.
    ///
    /// Missing modules are not an error: they are printed, written to the output
    /// file when one is configured, and returned.
    pub fn check(&self) -> Result<ResultSet, Box<dyn Error>> {
        do_check(
            &self.fetcher,
            &self.root,
            self.discovery,
            &self.filters,
            self.output_file.as_deref(),
        )
    }
}
