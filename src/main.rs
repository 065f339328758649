use std::error::Error;

use clap::Parser;
use modfetch::{cli::args::CliArgs, model::filter::FilterSet, Discovery, Modfetch};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run() {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let cli_args = CliArgs::parse();
    let current_dir = std::env::current_dir()?;

    let mut builder = Modfetch::builder().root(
        cli_args
            .root
            .map(|root| current_dir.join(root))
            .unwrap_or_else(|| current_dir.clone()),
    );
    if let Some(filters) = &cli_args.filters {
        builder = builder.filters(FilterSet::parse(filters));
    }
    if cli_args.single {
        builder = builder.discovery(Discovery::Single);
    }
    if let Some(output) = cli_args.output {
        builder = builder.output_file(current_dir.join(output));
    }
    if let Some(cache_directory) = cli_args.cache_directory {
        builder = builder.cache_directory(current_dir.join(cache_directory));
    }
    if let Some(program) = cli_args.fetch_program {
        builder = builder.fetch_program(program);
    }

    let modfetch = builder.try_build()?;
    modfetch.check()?;

    Ok(())
}
