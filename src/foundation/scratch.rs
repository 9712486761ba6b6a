use std::{
    path::{Path, PathBuf},
    sync::atomic::{AtomicU64, Ordering},
};

use anyhow::Context;

use crate::foundation::error::PackResult;

static NEXT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Process-unique token: `<pid>_<seq>_<nanos>`.
///
/// The sequence number alone keeps tokens distinct inside one process; pid and
/// timestamp keep them distinct across processes sharing a temp directory.
pub fn unique_token() -> String {
    let seq = NEXT_SEQ.fetch_add(1, Ordering::Relaxed);
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);
    format!("{}_{seq}_{nanos}", std::process::id())
}

/// Uniquely named temporary directory removed (with its contents) on drop.
#[derive(Debug)]
pub struct ScratchDir {
    path: PathBuf,
}

impl ScratchDir {
    /// Create `chanpack_<tag>_<token>` under `root` (or the system temp dir).
    pub fn new(root: Option<&Path>, tag: &str) -> PackResult<Self> {
        let parent = match root {
            Some(p) => p.to_path_buf(),
            None => std::env::temp_dir(),
        };
        let path = parent.join(format!("chanpack_{tag}_{}", unique_token()));
        std::fs::create_dir_all(&path)
            .with_context(|| format!("create scratch dir '{}'", path.display()))?;
        Ok(Self { path })
    }

    /// Directory path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Path of `name` inside this directory.
    pub fn file(&self, name: &str) -> PathBuf {
        self.path.join(name)
    }
}

impl Drop for ScratchDir {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.path);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/scratch.rs"]
mod tests;
