use folio_export::ExportOptions;
use folio_workspace::WorkspaceConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_NAME: &str = "folio.config.json";

/// Folio configuration file format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Format used when `--format` is not given
    #[serde(default = "default_format")]
    pub default_format: String,

    /// Directory exported files are written to
    #[serde(default = "default_out_dir")]
    pub out_dir: String,

    /// Undo/redo entries kept per document (0 = unlimited)
    #[serde(default = "default_history_depth")]
    pub history_depth: usize,

    /// Pretty print HTML output
    #[serde(default = "default_pretty")]
    pub pretty: bool,
}

fn default_format() -> String {
    "html".to_string()
}

fn default_out_dir() -> String {
    "dist".to_string()
}

fn default_history_depth() -> usize {
    WorkspaceConfig::default().history_depth
}

fn default_pretty() -> bool {
    true
}

impl Config {
    /// Load config from a directory
    pub fn load(cwd: &Path) -> anyhow::Result<Self> {
        let config_path = cwd.join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            // Return default config if none exists
            Ok(Config::default())
        }
    }

    /// Get absolute path to the output directory
    pub fn get_out_dir(&self, cwd: &Path) -> PathBuf {
        cwd.join(&self.out_dir)
    }

    pub fn workspace_config(&self) -> WorkspaceConfig {
        WorkspaceConfig {
            history_depth: self.history_depth,
        }
    }

    pub fn export_options(&self) -> ExportOptions {
        if self.pretty {
            ExportOptions::default()
        } else {
            ExportOptions::compact()
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_format: default_format(),
            out_dir: default_out_dir(),
            history_depth: default_history_depth(),
            pretty: default_pretty(),
        }
    }
}
