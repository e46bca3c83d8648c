//! Configuration loading and data folder resolution

use std::path::{Path, PathBuf};

/// Well-known file names inside the resolved data folder
#[derive(Debug, Clone)]
pub struct DataPaths {
    root: PathBuf,
}

impl DataPaths {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Persisted measurement store (whole-store JSON document)
    pub fn measurements_file(&self) -> PathBuf {
        self.root.join("measurements.json")
    }

    /// Brand reference size chart (CSV)
    pub fn dataset_file(&self) -> PathBuf {
        self.root.join("brandsize.csv")
    }

    /// Predictor model parameter file (JSON)
    pub fn model_file(&self) -> PathBuf {
        self.root.join("model.json")
    }
}

/// Data folder resolution priority order:
/// 1. Command-line argument (highest priority)
/// 2. Environment variable
/// 3. TOML config file (`data_folder` key)
/// 4. OS-dependent compiled default (fallback)
pub fn resolve_data_folder(cli_arg: Option<&str>, env_var_name: &str) -> PathBuf {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return PathBuf::from(path);
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(env_var_name) {
        if !path.is_empty() {
            return PathBuf::from(path);
        }
    }

    // Priority 3: TOML config file
    if let Some(config_path) = config_file_path() {
        if let Ok(content) = std::fs::read_to_string(&config_path) {
            if let Ok(config) = toml::from_str::<toml::Value>(&content) {
                if let Some(folder) = config.get("data_folder").and_then(|v| v.as_str()) {
                    return PathBuf::from(folder);
                }
            }
        }
    }

    // Priority 4: OS-dependent compiled default
    default_data_folder()
}

/// Platform config file location (~/.config/fitform/config.toml on Linux)
fn config_file_path() -> Option<PathBuf> {
    dirs::config_dir()
        .map(|d| d.join("fitform").join("config.toml"))
        .filter(|p| p.exists())
}

/// OS-dependent default data folder
fn default_data_folder() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("fitform"))
        .unwrap_or_else(|| PathBuf::from("./fitform_data"))
}
