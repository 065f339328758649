use log::{info, warn};

use crate::{
    fetch::{self, Discovery},
    fetcher::ModuleFetcher,
    model::{filter::FilterSet, result::ResultSet},
};
use std::{
    error::Error,
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

/// Handler to the check command
/// 1 - Creates the output file, so a bad path fails before anything is downloaded
/// 2 - Walks the manifests under `root`, fetching related dependencies
/// 3 - Prints the report and writes the missing module paths to the output file
///
/// If the walk fails the output file is removed again.
pub fn do_check<F: ModuleFetcher>(
    fetcher: &F,
    root: &Path,
    discovery: Discovery,
    filters: &FilterSet,
    output_file: Option<&Path>,
) -> Result<ResultSet, Box<dyn Error>> {
    let output = output_file
        .map(|path| {
            File::create(path).map_err(|err| {
                format!("Could not create output file {}: {}", path.display(), err)
            })
        })
        .transpose()?;

    if !filters.is_empty() {
        info!("Only fetching modules matching {}", filters);
    }
    info!("Checking dependencies under {}", root.display());

    let mut result = ResultSet::new();
    if let Err(err) = fetch::walk(root, discovery, filters, fetcher, &mut result) {
        drop(output);
        if let Some(path) = output_file {
            if let Err(remove_err) = std::fs::remove_file(path) {
                warn!(
                    "Could not remove output file {}: {}",
                    path.display(),
                    remove_err
                );
            }
        }
        return Err(err.into());
    }

    write_report(&result, std::io::stdout().lock())?;

    if let (Some(file), Some(path)) = (output, output_file) {
        result.write_to(BufWriter::new(file))?;
        info!("Wrote missing dependencies to {}", path.display());
    }

    Ok(result)
}

pub fn write_report<W: Write>(result: &ResultSet, mut writer: W) -> std::io::Result<()> {
    if result.is_empty() {
        writeln!(writer, "No missing dependencies found.")?;
        writer.flush()
    } else {
        writeln!(writer, "Found missing dependencies:")?;
        result.write_to(&mut writer)
    }
}
