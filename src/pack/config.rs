use std::path::{Path, PathBuf};

use crate::pack::spec::WHITE;

/// Environment variable overriding [`ExportConfig::scratch_root`].
pub const SCRATCH_DIR_ENV: &str = "CHANPACK_SCRATCH_DIR";

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
/// Knobs shared by every export call.
pub struct ExportConfig {
    /// Parent directory for per-call temporary files. `None` uses the system temp dir.
    pub scratch_root: Option<PathBuf>,
    /// Return a clean backing file's bytes verbatim when its container already matches.
    pub reuse_persisted_bytes: bool,
    /// Value fed to combine inputs that no source channel is routed into.
    pub default_fill: f32,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            scratch_root: None,
            reuse_persisted_bytes: true,
            default_fill: WHITE,
        }
    }
}

impl ExportConfig {
    /// Defaults plus environment overrides.
    pub fn from_env() -> Self {
        Self {
            scratch_root: std::env::var_os(SCRATCH_DIR_ENV).map(PathBuf::from),
            ..Self::default()
        }
    }

    /// Scratch root as a path reference.
    pub fn scratch_root(&self) -> Option<&Path> {
        self.scratch_root.as_deref()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/pack/config.rs"]
mod tests;
