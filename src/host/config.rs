use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// One entry of the startup import configuration.
#[derive(Debug, Clone)]
pub enum ImportSpec {
    /// A single class, optionally under an alias (default: its short name).
    Class { class: String, alias: Option<String> },
    /// A star import of a whole package, consumed by the compiler.
    Package { package: String },
    /// Scan a package through the `ClassScanner` and import every class
    /// found, keyed by short name.
    Scan { package: String, recursive: bool },
}

/// Static host configuration handed to the service at construction.
/// Persistent storage of configuration is the host's concern.
#[derive(Debug, Clone)]
pub struct HostConfig {
    pub autorun_dir: PathBuf,
    pub scripts_dir: PathBuf,
    /// Script file extension, without the dot.
    pub extension: String,
    pub classpath: Vec<PathBuf>,
    pub imports: Vec<ImportSpec>,
    /// Per-sender default workspace names, keyed by sender display name.
    pub workspace_aliases: HashMap<String, String>,
}

impl HostConfig {
    pub fn new(autorun_dir: impl Into<PathBuf>, scripts_dir: impl Into<PathBuf>) -> Self {
        HostConfig {
            autorun_dir: autorun_dir.into(),
            scripts_dir: scripts_dir.into(),
            extension: "vs".to_string(),
            classpath: Vec::new(),
            imports: Vec::new(),
            workspace_aliases: HashMap::new(),
        }
    }

    /// Path of the named script inside the scripts directory.
    pub fn script_file(&self, name: &str) -> PathBuf {
        self.scripts_dir.join(format!("{}.{}", name, self.extension))
    }

    /// Path of the autorun script for a workspace name.
    pub fn autorun_file(&self, name: &str) -> PathBuf {
        self.autorun_dir.join(format!("{}.{}", name, self.extension))
    }
}

/// Short name of a fully-qualified class: the segment after the last dot.
pub fn class_short_name(class: &str) -> &str {
    match class.rfind('.') {
        Some(idx) => &class[idx + 1..],
        None => class,
    }
}

/// True if `path` has the configured script extension.
pub fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some(extension)
}
