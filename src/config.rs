use std::{
    collections::HashMap,
    ffi::OsString,
    path::{Path, PathBuf},
};

use config::{Config, ConfigError, Environment, File, FileFormat};
use home::home_dir;
use log::debug;
use serde::Deserialize;

const CONFIG_FILE: &str = ".modfetch/config.toml";

pub struct ModfetchConfig {
    pub cache_dir: Option<PathBuf>,
    pub fetch_program: Option<String>,
}

impl ModfetchConfig {
    pub fn load() -> anyhow::Result<Self> {
        let home = home_dir();
        let config_file = home.as_ref().map(|home| home.join(CONFIG_FILE));
        let raw_config = RawConfig::load(config_file.as_deref(), None)?;
        let go_environment = GoEnvironment::from_env();

        Ok(Self {
            cache_dir: raw_config
                .cache
                .dir
                .or_else(|| go_environment.module_cache(home.as_deref())),
            fetch_program: raw_config.fetch.program,
        })
    }
}

#[derive(Default, Debug, Deserialize, PartialEq, Eq)]
struct RawConfig {
    #[serde(default)]
    cache: CacheConfig,
    #[serde(default)]
    fetch: FetchConfig,
}

#[derive(Default, Debug, Deserialize, PartialEq, Eq)]
struct CacheConfig {
    dir: Option<PathBuf>,
}

#[derive(Default, Debug, Deserialize, PartialEq, Eq)]
struct FetchConfig {
    program: Option<String>,
}

impl RawConfig {
    fn load(
        config_file: Option<&Path>,
        env: Option<HashMap<String, String>>,
    ) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();
        if let Some(config_file) = config_file {
            debug!("Looking for configuration in {}", config_file.display());
            builder = builder.add_source(
                File::from(config_file)
                    .format(FileFormat::Toml)
                    .required(false),
            );
        }
        builder
            .add_source(
                Environment::with_prefix("MODFETCH")
                    .separator("_")
                    .source(env),
            )
            .build()?
            .try_deserialize()
    }
}

/// The variables the Go toolchain itself uses to place its module cache.
#[derive(Default, Debug, PartialEq, Eq)]
struct GoEnvironment {
    gomodcache: Option<OsString>,
    gopath: Option<OsString>,
}

impl GoEnvironment {
    fn from_env() -> Self {
        Self {
            gomodcache: std::env::var_os("GOMODCACHE"),
            gopath: std::env::var_os("GOPATH"),
        }
    }

    /// `$GOMODCACHE`, else `pkg/mod` under the first `$GOPATH` entry, else `$HOME/go/pkg/mod`.
    fn module_cache(&self, home: Option<&Path>) -> Option<PathBuf> {
        let non_empty = |v: &&OsString| !v.is_empty();
        self.gomodcache
            .as_ref()
            .filter(non_empty)
            .map(PathBuf::from)
            .or_else(|| {
                self.gopath
                    .as_ref()
                    .filter(non_empty)
                    .and_then(|gopath| std::env::split_paths(gopath).next())
                    .map(|gopath| gopath.join("pkg").join("mod"))
            })
            .or_else(|| home.map(|home| home.join("go").join("pkg").join("mod")))
    }
}
