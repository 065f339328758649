use std::path::PathBuf;

use clap::Parser;

/// Downloads the transitive dependencies of Go modules and reports the ones that
/// cannot be fetched.
#[derive(Debug, Parser)]
#[command(version)]
pub struct CliArgs {
    /// Directory to scan for go.mod files. Defaults to the current directory.
    pub root: Option<PathBuf>,
    /// File to write the missing module paths to, one per line.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
    /// Comma-separated substrings; only matching module paths are fetched.
    #[arg(long, env = "MODFETCH_FILTERS")]
    pub filters: Option<String>,
    /// Read only <ROOT>/go.mod instead of every go.mod below ROOT.
    #[arg(long)]
    pub single: bool,
    /// Go module cache location. Defaults to $GOMODCACHE, $GOPATH/pkg/mod or
    /// $HOME/go/pkg/mod.
    #[arg(short, long)]
    pub cache_directory: Option<PathBuf>,
    /// Program used as `<PROGRAM> mod download <module>@<version>`.
    #[arg(long)]
    pub fetch_program: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use pretty_assertions::assert_eq;

    #[test]
    fn verify_cli() {
        CliArgs::command().debug_assert();
    }

    #[test]
    fn parse_all_flags() {
        let args = CliArgs::parse_from([
            "modfetch",
            "/src/project",
            "-o",
            "missing.txt",
            "--filters",
            "corp/,github.com/org",
            "--single",
            "--cache-directory",
            "/tmp/modcache",
            "--fetch-program",
            "go1.22",
        ]);
        assert_eq!(args.root, Some(PathBuf::from("/src/project")));
        assert_eq!(args.output, Some(PathBuf::from("missing.txt")));
        assert_eq!(args.filters.as_deref(), Some("corp/,github.com/org"));
        assert!(args.single);
        assert_eq!(args.cache_directory, Some(PathBuf::from("/tmp/modcache")));
        assert_eq!(args.fetch_program.as_deref(), Some("go1.22"));
    }

    #[test]
    fn defaults() {
        let args = CliArgs::parse_from(["modfetch"]);
        assert_eq!(args.root, None);
        assert_eq!(args.output, None);
        assert!(!args.single);
    }
}
