use crate::error::{PastezError, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILENAME: &str = "config.json";
const DEFAULT_AUTHOR_NAME: &str = "pastez";
const DEFAULT_AUTHOR_EMAIL: &str = "pastez@localhost";

/// Environment variable overriding the storage root.
pub const ROOT_ENV: &str = "PASTEZ_ROOT";

/// Configuration for pastez, stored in `config.json` under the storage root.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PastezConfig {
    /// Author name stamped on every recorded revision.
    #[serde(default = "default_author_name")]
    pub author_name: String,

    /// Author email stamped on every recorded revision.
    #[serde(default = "default_author_email")]
    pub author_email: String,
}

fn default_author_name() -> String {
    DEFAULT_AUTHOR_NAME.to_string()
}

fn default_author_email() -> String {
    DEFAULT_AUTHOR_EMAIL.to_string()
}

impl Default for PastezConfig {
    fn default() -> Self {
        Self {
            author_name: default_author_name(),
            author_email: default_author_email(),
        }
    }
}

impl PastezConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).map_err(PastezError::Io)?;
        let config: PastezConfig =
            serde_json::from_str(&content).map_err(PastezError::Serialization)?;
        Ok(config)
    }

    /// Save config to the given directory
    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();

        if !config_dir.exists() {
            fs::create_dir_all(config_dir).map_err(PastezError::Io)?;
        }

        let config_path = config_dir.join(CONFIG_FILENAME);
        let content = serde_json::to_string_pretty(self).map_err(PastezError::Serialization)?;
        fs::write(config_path, content).map_err(PastezError::Io)?;
        Ok(())
    }
}

/// Resolve the storage root: an explicit flag wins, then [`ROOT_ENV`],
/// then the platform data directory.
pub fn resolve_root(flag: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = flag {
        return Some(path.to_path_buf());
    }
    if let Some(root) = env::var_os(ROOT_ENV) {
        if !root.is_empty() {
            return Some(PathBuf::from(root));
        }
    }
    ProjectDirs::from("com", "pastez", "pastez").map(|dirs| dirs.data_dir().to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PastezConfig::default();
        assert_eq!(config.author_name, "pastez");
        assert_eq!(config.author_email, "pastez@localhost");
    }

    #[test]
    fn test_load_missing_config() {
        let temp_dir = env::temp_dir().join("pastez_test_config_missing");
        let _ = fs::remove_dir_all(&temp_dir);

        let config = PastezConfig::load(&temp_dir).unwrap();
        assert_eq!(config, PastezConfig::default());
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = env::temp_dir().join("pastez_test_config_save");
        let _ = fs::remove_dir_all(&temp_dir);
        fs::create_dir_all(&temp_dir).unwrap();

        let config = PastezConfig {
            author_name: "alice".to_string(),
            author_email: "alice@example.org".to_string(),
        };
        config.save(&temp_dir).unwrap();

        let loaded = PastezConfig::load(&temp_dir).unwrap();
        assert_eq!(loaded, config);

        // Cleanup
        let _ = fs::remove_dir_all(&temp_dir);
    }

    #[test]
    fn test_load_fills_missing_fields() {
        let temp_dir = env::temp_dir().join("pastez_test_config_partial");
        let _ = fs::remove_dir_all(&temp_dir);
        fs::create_dir_all(&temp_dir).unwrap();

        fs::write(
            temp_dir.join(CONFIG_FILENAME),
            r#"{ "author_name": "bob" }"#,
        )
        .unwrap();

        let loaded = PastezConfig::load(&temp_dir).unwrap();
        assert_eq!(loaded.author_name, "bob");
        assert_eq!(loaded.author_email, "pastez@localhost");

        let _ = fs::remove_dir_all(&temp_dir);
    }

    #[test]
    fn test_resolve_root_precedence() {
        // Flag beats everything, including the env var.
        env::set_var(ROOT_ENV, "/tmp/pastez-from-env");
        let flagged = resolve_root(Some(Path::new("/tmp/pastez-from-flag")));
        assert_eq!(flagged, Some(PathBuf::from("/tmp/pastez-from-flag")));

        let from_env = resolve_root(None);
        assert_eq!(from_env, Some(PathBuf::from("/tmp/pastez-from-env")));
        env::remove_var(ROOT_ENV);
    }
}
