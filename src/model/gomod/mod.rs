mod lexer;
pub mod replace;

use regex_lite::Regex;
use std::{
    fmt::Display,
    path::{Path, PathBuf},
    sync::OnceLock,
};

use crate::model::ParseError;
use lexer::{Line, Token};
use log::{debug, error, trace};

pub use replace::ReplacementTable;

pub const MANIFEST_FILE_NAME: &str = "go.mod";

#[derive(Clone, Hash, Debug, PartialEq, Eq, Ord, PartialOrd)]
pub struct ModulePath(String);

impl ModulePath {
    pub fn new(s: String) -> Self {
        ModulePath(s)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for ModulePath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for ModulePath {
    fn from(s: String) -> Self {
        ModulePath(s)
    }
}

impl From<&str> for ModulePath {
    fn from(s: &str) -> Self {
        ModulePath(s.to_string())
    }
}

/// A fetchable unit: module path plus version.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Ord, PartialOrd)]
pub struct ModuleCoordinate {
    pub path: ModulePath,
    pub version: String,
}

impl ModuleCoordinate {
    pub fn new(path: impl Into<ModulePath>, version: impl Into<String>) -> Self {
        ModuleCoordinate {
            path: path.into(),
            version: version.into(),
        }
    }
}

impl Display for ModuleCoordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}@{}", self.path, self.version)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Requirement {
    pub coordinate: ModuleCoordinate,
    pub indirect: bool,
}

/// What a `replace` directive points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplacementTarget {
    Module(ModuleCoordinate),
    /// A directory on the local filesystem, relative to the declaring manifest.
    Directory(PathBuf),
}

impl Display for ReplacementTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            ReplacementTarget::Module(coordinate) => write!(f, "{}", coordinate),
            ReplacementTarget::Directory(path) => write!(f, "{}", path.display()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replacement {
    pub old_path: ModulePath,
    /// When set, the directive only applies to this exact version.
    pub old_version: Option<String>,
    pub new: ReplacementTarget,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    pub module: Option<ModulePath>,
    pub go_version: Option<String>,
    pub requires: Vec<Requirement>,
    pub replaces: Vec<Replacement>,
}

impl Manifest {
    pub fn from_file(path: &Path) -> Result<Manifest, ParseError> {
        debug!("Attempting to read manifest {}", path.display());
        let contents = std::fs::read_to_string(path)?;

        let manifest = Manifest::from_gomod_str(&contents);
        if let Err(err) = &manifest {
            error!("Could not parse manifest {} due to err {err}", path.display())
        }
        manifest
    }

    /// Parses `go.mod` text leniently: unknown directives are ignored and only
    /// `module`, `go`, `require` and `replace` are interpreted.
    pub fn from_gomod_str(data: &str) -> Result<Manifest, ParseError> {
        let mut manifest = Manifest::default();
        let mut lines = lexer::tokenize(data)?.into_iter();

        while let Some(line) = lines.next() {
            let Line {
                number,
                mut tokens,
                comment,
            } = line;

            let verb = match tokens.remove(0) {
                Token::Word(verb) => verb,
                Token::CloseParen => return Err(ParseError::UnexpectedCloseParen(number)),
                other => {
                    trace!("Ignoring line {} starting with {:?}", number, other);
                    continue;
                }
            };

            if tokens.first() == Some(&Token::OpenParen) {
                if tokens.len() > 1 {
                    return Err(ParseError::malformed(
                        &verb,
                        number,
                        "unexpected tokens after `(`",
                    ));
                }
                let mut closed = false;
                for entry in lines.by_ref() {
                    if entry.tokens.first() == Some(&Token::CloseParen) {
                        closed = true;
                        break;
                    }
                    manifest.apply(&verb, entry.number, entry.tokens, entry.comment)?;
                }
                if !closed {
                    return Err(ParseError::UnterminatedBlock {
                        directive: verb,
                        line: number,
                    });
                }
            } else {
                manifest.apply(&verb, number, tokens, comment)?;
            }
        }

        Ok(manifest)
    }

    fn apply(
        &mut self,
        verb: &str,
        line: usize,
        args: Vec<Token>,
        comment: Option<String>,
    ) -> Result<(), ParseError> {
        match verb {
            "module" => {
                self.module = Some(ModulePath::new(single_word(verb, line, args)?));
            }
            "go" => {
                self.go_version = Some(single_word(verb, line, args)?);
            }
            "require" => self.requires.push(parse_requirement(line, args, comment)?),
            "replace" => self.replaces.push(parse_replacement(line, args)?),
            other => trace!("Ignoring `{}` directive at line {}", other, line),
        }
        Ok(())
    }
}

fn single_word(verb: &str, line: usize, args: Vec<Token>) -> Result<String, ParseError> {
    match words(verb, line, args)?.as_slice() {
        [word] => Ok(word.clone()),
        other => Err(ParseError::malformed(
            verb,
            line,
            format!("expected 1 argument, found {}", other.len()),
        )),
    }
}

fn words(verb: &str, line: usize, args: Vec<Token>) -> Result<Vec<String>, ParseError> {
    args.into_iter()
        .map(|token| {
            token
                .into_word()
                .ok_or_else(|| ParseError::malformed(verb, line, "unexpected token"))
        })
        .collect()
}

fn parse_requirement(
    line: usize,
    args: Vec<Token>,
    comment: Option<String>,
) -> Result<Requirement, ParseError> {
    let mut args = words("require", line, args)?;
    if args.len() != 2 {
        return Err(ParseError::malformed(
            "require",
            line,
            "expected module path and version",
        ));
    }
    let version = args.remove(1);
    let path = args.remove(0);

    Ok(Requirement {
        coordinate: ModuleCoordinate::new(path, version),
        indirect: is_indirect(comment.as_deref()),
    })
}

/// `// indirect` or `// indirect; other notes`
fn is_indirect(comment: Option<&str>) -> bool {
    comment.is_some_and(|c| c == "indirect" || c.starts_with("indirect;"))
}

fn parse_replacement(line: usize, args: Vec<Token>) -> Result<Replacement, ParseError> {
    let arrow = args
        .iter()
        .position(|t| t == &Token::Arrow)
        .ok_or_else(|| ParseError::malformed("replace", line, "missing `=>`"))?;
    let mut args = args;
    let new = words("replace", line, args.split_off(arrow + 1))?;
    args.pop();
    let old = words("replace", line, args)?;

    let (old_path, old_version) = match old.as_slice() {
        [path] => (path.clone(), None),
        [path, version] => (path.clone(), Some(version.clone())),
        _ => {
            return Err(ParseError::malformed(
                "replace",
                line,
                "expected module path and optional version before `=>`",
            ))
        }
    };

    let new = match new.as_slice() {
        [path] if is_directory_path(path) => ReplacementTarget::Directory(PathBuf::from(path)),
        [path] => {
            return Err(ParseError::malformed(
                "replace",
                line,
                format!("replacement module {path} without version must be a directory path"),
            ))
        }
        [path, version] => ReplacementTarget::Module(ModuleCoordinate::new(
            path.as_str(),
            version.as_str(),
        )),
        _ => {
            return Err(ParseError::malformed(
                "replace",
                line,
                "expected module path and version after `=>`",
            ))
        }
    };

    Ok(Replacement {
        old_path: ModulePath::new(old_path),
        old_version,
        new,
    })
}

fn is_directory_path(path: &str) -> bool {
    static DIRECTORY: OnceLock<Regex> = OnceLock::new();
    DIRECTORY
        .get_or_init(|| {
            Regex::new(r"^(\.\.?$|\.\.?[/\\]|[/\\]|[A-Za-z]:[/\\])").expect("valid regex")
        })
        .is_match(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn requirement(path: &str, version: &str, indirect: bool) -> Requirement {
        Requirement {
            coordinate: ModuleCoordinate::new(path, version),
            indirect,
        }
    }

    #[test]
    fn load_valid_manifest() {
        let str = r#"
            module example.com/app

            go 1.21

            toolchain go1.21.5

            require (
                github.com/corp/a v1.0.0
                golang.org/x/text v0.14.0 // indirect
            )

            require example.com/single v0.1.0

            replace github.com/corp/a => github.com/fork/a v1.0.1
            replace (
                example.com/single v0.1.0 => ../single
            )

            exclude example.com/bad v0.0.1
            retract v0.0.9
        "#;
        let expected = Manifest {
            module: Some(ModulePath::from("example.com/app")),
            go_version: Some("1.21".to_owned()),
            requires: vec![
                requirement("github.com/corp/a", "v1.0.0", false),
                requirement("golang.org/x/text", "v0.14.0", true),
                requirement("example.com/single", "v0.1.0", false),
            ],
            replaces: vec![
                Replacement {
                    old_path: ModulePath::from("github.com/corp/a"),
                    old_version: None,
                    new: ReplacementTarget::Module(ModuleCoordinate::new(
                        "github.com/fork/a",
                        "v1.0.1",
                    )),
                },
                Replacement {
                    old_path: ModulePath::from("example.com/single"),
                    old_version: Some("v0.1.0".to_owned()),
                    new: ReplacementTarget::Directory(PathBuf::from("../single")),
                },
            ],
        };
        assert_eq!(Manifest::from_gomod_str(str).unwrap(), expected);
    }

    #[test]
    fn load_manifest_no_requirements() {
        let manifest = Manifest::from_gomod_str("module example.com/leaf\n").unwrap();
        assert_eq!(manifest.module, Some(ModulePath::from("example.com/leaf")));
        assert!(manifest.requires.is_empty());
        assert!(manifest.replaces.is_empty());
    }

    #[test]
    fn ignores_unknown_directives() {
        let str = r#"
            module example.com/app
            godebug default=go1.21
            frobnicate one two three
            tool (
                golang.org/x/tools/cmd/stringer
            )
            require example.com/a v1.2.3
        "#;
        let manifest = Manifest::from_gomod_str(str).unwrap();
        assert_eq!(
            manifest.requires,
            vec![requirement("example.com/a", "v1.2.3", false)]
        );
    }

    #[test]
    fn indirect_with_notes() {
        let manifest =
            Manifest::from_gomod_str("require example.com/a v1.0.0 // indirect; pinned\n")
                .unwrap();
        assert!(manifest.requires[0].indirect);
        let manifest =
            Manifest::from_gomod_str("require example.com/a v1.0.0 // indirectly used\n")
                .unwrap();
        assert!(!manifest.requires[0].indirect);
    }

    #[test]
    fn load_invalid_require() {
        assert!(matches!(
            Manifest::from_gomod_str("require example.com/a\n"),
            Err(ParseError::MalformedDirective { line: 1, .. })
        ));
    }

    #[test]
    fn load_invalid_replace_without_arrow() {
        assert!(Manifest::from_gomod_str("replace a v1.0.0 b v1.0.0\n").is_err());
    }

    #[test]
    fn load_invalid_replace_module_without_version() {
        assert!(Manifest::from_gomod_str("replace a => example.com/b\n").is_err());
    }

    #[test]
    fn load_unterminated_block() {
        let str = "module x\nrequire (\n    example.com/a v1.0.0\n";
        assert!(matches!(
            Manifest::from_gomod_str(str),
            Err(ParseError::UnterminatedBlock { line: 2, .. })
        ));
    }

    #[test]
    fn load_stray_close_paren() {
        assert!(matches!(
            Manifest::from_gomod_str("module x\n)\n"),
            Err(ParseError::UnexpectedCloseParen(2))
        ));
    }

    #[test]
    fn directory_paths() {
        for path in ["./a", "../a", "/abs/a", ".", "..", "C:\\mods\\a", ".\\a"] {
            assert!(is_directory_path(path), "{path}");
        }
        for path in ["example.com/a", "a", ".hidden/a"] {
            assert!(!is_directory_path(path), "{path}");
        }
    }

    #[test]
    fn load_fixture_file() {
        let path = project_root::get_project_root()
            .unwrap()
            .join("resources/go.mod");
        let manifest = Manifest::from_file(&path).unwrap();
        assert_eq!(
            manifest.module,
            Some(ModulePath::from("github.com/example/service"))
        );
        assert_eq!(manifest.requires.len(), 5);
        assert_eq!(manifest.replaces.len(), 2);
        assert_eq!(
            manifest.requires[0].coordinate.to_string(),
            "github.com/corp/auth@v1.4.2"
        );
    }
}
