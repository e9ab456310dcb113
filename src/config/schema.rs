use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::git::{PathRule, default_path_rules};

/// Config file name, looked up in the working directory.
pub const CONFIG_FILE: &str = "penalty-history.toml";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Repository the tracked file's history is read from.
    pub repo: PathBuf,
    /// Directory the artifacts are written to.
    pub out_dir: PathBuf,
    /// Where the tracked file lived over time, oldest rule first.
    pub path_rules: Vec<PathRule>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            repo: PathBuf::from("."),
            out_dir: PathBuf::from("web/assets/data"),
            path_rules: default_path_rules(),
        }
    }
}

#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}
