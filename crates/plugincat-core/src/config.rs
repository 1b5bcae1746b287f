/// Scan configuration.
///
/// The built-in folder list and exclusion set cover common installs; a JSON
/// config file can add roots and excluded file names, or turn the default
/// roots off entirely:
///
/// ```json
/// {
///   "roots": ["D:\\Audio\\Plugins"],
///   "use_default_roots": true,
///   "excluded_files": ["InstallerHelper.dll"],
///   "threads": 4
/// }
/// ```
use crate::error::ConfigError;
use crate::platform;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Settings that shape a scan. Every field has a default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Extra roots, scanned after the default folders.
    pub roots: Vec<PathBuf>,
    /// Include [`platform::default_plugin_folders`] before `roots`.
    pub use_default_roots: bool,
    /// Extra DLL file names to skip, matched case-insensitively.
    pub excluded_files: Vec<String>,
    /// Directory-walker thread count. `None` uses one per logical CPU.
    pub threads: Option<usize>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            roots: Vec::new(),
            use_default_roots: true,
            excluded_files: Vec::new(),
            threads: None,
        }
    }
}

impl ScanConfig {
    /// Load a config from a JSON file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// All roots to scan, in order: defaults (if enabled), then `roots`.
    /// Duplicates keep their first position.
    pub fn resolved_roots(&self) -> Vec<PathBuf> {
        let mut roots = if self.use_default_roots {
            platform::default_plugin_folders()
        } else {
            Vec::new()
        };
        for root in &self.roots {
            if !roots.contains(root) {
                roots.push(root.clone());
            }
        }
        roots
    }

    /// Walker parallelism, at least 1.
    pub fn thread_count(&self) -> usize {
        self.threads.unwrap_or_else(num_cpus::get).max(1)
    }
}
