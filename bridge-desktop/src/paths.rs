//! Path resolution against a desktop resource root.

use bridge_traits::{
    error::{BridgeError, Result},
    paths::{has_network_scheme, PathResolver},
};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Resolves relative media paths against a resource root directory.
///
/// The default root is the process working directory, falling back to the
/// user's home directory when the working directory is unavailable.
#[derive(Debug, Clone)]
pub struct DesktopPathResolver {
    root: PathBuf,
}

impl DesktopPathResolver {
    pub fn new() -> Self {
        let root = std::env::current_dir()
            .ok()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."));
        Self::with_root(root)
    }

    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl Default for DesktopPathResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl PathResolver for DesktopPathResolver {
    fn is_url(&self, source: &str) -> bool {
        has_network_scheme(source)
    }

    fn is_absolute(&self, source: &str) -> bool {
        Path::new(source).is_absolute()
    }

    fn absolute_path(&self, source: &str) -> Result<PathBuf> {
        if source.trim().is_empty() {
            return Err(BridgeError::OperationFailed(
                "Cannot resolve an empty path".to_string(),
            ));
        }

        let relative = source.trim_start_matches("./");
        let resolved = self.root.join(relative);
        debug!(root = ?self.root, "Resolved relative media path");
        Ok(resolved)
    }
}
