use std::fs;
use std::path::{Path, PathBuf};

use super::schema::{CONFIG_FILE, Config, ConfigError};

pub fn config_path() -> PathBuf {
    PathBuf::from(CONFIG_FILE)
}

/// Load configuration: an explicit file, or `./penalty-history.toml` if it
/// exists, falling back to defaults. Environment overrides apply last.
pub fn load(explicit: Option<&Path>) -> Result<Config, ConfigError> {
    let path = match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => {
            let default = config_path();
            default.exists().then_some(default)
        }
    };

    let mut config = match path {
        Some(path) => {
            let contents = fs::read_to_string(&path).map_err(|source| ConfigError::Read {
                path: path.clone(),
                source,
            })?;
            toml::from_str(&contents).map_err(|source| ConfigError::Parse { path, source })?
        }
        None => Config::default(),
    };

    apply_env_overrides(&mut config);
    Ok(config)
}

/// `PENH_REPO` and `PENH_OUT_DIR` override the file-provided paths.
pub fn apply_env_overrides(config: &mut Config) {
    if let Ok(repo) = std::env::var("PENH_REPO") {
        config.repo = PathBuf::from(repo);
    }
    if let Ok(out_dir) = std::env::var("PENH_OUT_DIR") {
        config.out_dir = PathBuf::from(out_dir);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_tracked_project_layout() {
        let config = Config::default();
        assert_eq!(config.out_dir, PathBuf::from("web/assets/data"));
        assert_eq!(config.path_rules.len(), 3);
    }

    #[test]
    fn explicit_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(
            &path,
            r#"
repo = "/srv/checkout"
out_dir = "artifacts"

[[path_rules]]
path = "penalty.json"
"#,
        )
        .unwrap();

        let config = load(Some(&path)).unwrap();
        assert_eq!(config.repo, PathBuf::from("/srv/checkout"));
        assert_eq!(config.out_dir, PathBuf::from("artifacts"));
        assert_eq!(config.path_rules.len(), 1);
        assert!(config.path_rules[0].from.is_none());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "repo = \".\"\ntypo_key = 1\n").unwrap();
        assert!(matches!(load(Some(&path)), Err(ConfigError::Parse { .. })));
    }
}
