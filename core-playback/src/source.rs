//! Media source normalization.
//!
//! Backends accept either a network URL or an absolute `file://` URI. Hosts
//! may set any of: a URL, an absolute path, a path relative to the app's
//! resource root, or an existing `file://` URI.

use crate::error::{PlaybackError, Result};
use bridge_traits::PathResolver;

const FILE_SCHEME: &str = "file://";

/// A source in the form a backend accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaSource {
    /// Absolute `file://` URI.
    Local(String),
    /// Network URL, passed through untouched.
    Remote(String),
}

impl MediaSource {
    /// Normalize a host path.
    ///
    /// Blank paths are [`PlaybackError::SourceMissing`]; paths the resolver
    /// cannot make absolute are [`PlaybackError::InvalidSource`].
    pub fn resolve(path: &str, resolver: &dyn PathResolver) -> Result<Self> {
        let path = path.trim();
        if path.is_empty() {
            return Err(PlaybackError::SourceMissing);
        }

        if resolver.is_url(path) {
            return Ok(MediaSource::Remote(path.to_string()));
        }

        if path.starts_with(FILE_SCHEME) {
            return Ok(MediaSource::Local(path.to_string()));
        }

        if resolver.is_absolute(path) {
            return Ok(MediaSource::Local(format!("{}{}", FILE_SCHEME, path)));
        }

        let absolute = resolver
            .absolute_path(path)
            .map_err(|e| PlaybackError::InvalidSource(e.to_string()))?;
        let absolute = absolute.to_str().ok_or_else(|| {
            PlaybackError::InvalidSource("resolved path is not valid UTF-8".to_string())
        })?;

        Ok(MediaSource::Local(format!("{}{}", FILE_SCHEME, absolute)))
    }

    pub fn uri(&self) -> &str {
        match self {
            MediaSource::Local(uri) | MediaSource::Remote(uri) => uri,
        }
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, MediaSource::Remote(_))
    }
}
