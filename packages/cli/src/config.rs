use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_NAME: &str = "catalog.config.json";

/// Catalog CLI configuration file format
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Directory searched for mutation scripts given by relative path
    #[serde(default = "default_scripts_dir")]
    pub scripts_dir: String,

    /// Refuse to save documents with validation issues
    #[serde(default = "default_true")]
    pub require_valid_to_save: bool,

    /// Pretty-print saved JSON
    #[serde(default = "default_true")]
    pub pretty_output: bool,
}

fn default_scripts_dir() -> String {
    "scripts".to_string()
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load config from a directory
    pub fn load(cwd: &str) -> anyhow::Result<Self> {
        let config_path = PathBuf::from(cwd).join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            tracing::debug!(path = %config_path.display(), "loaded config");
            Ok(config)
        } else {
            // Return default config if none exists
            Ok(Config::default())
        }
    }

    /// Resolve a script path: as given if it exists, else under `scripts_dir`
    pub fn resolve_script(&self, cwd: &str, script: &Path) -> PathBuf {
        let direct = PathBuf::from(cwd).join(script);
        if direct.exists() || script.is_absolute() {
            return direct;
        }
        PathBuf::from(cwd).join(&self.scripts_dir).join(script)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            scripts_dir: default_scripts_dir(),
            require_valid_to_save: true,
            pretty_output: true,
        }
    }
}
