//! Path and URL classification.

use std::path::PathBuf;

use crate::error::Result;

/// Classifies and resolves media source strings.
///
/// Bindings use this to decide whether a source is handed to the backend as a
/// network URL or normalized into an absolute `file://` reference first.
pub trait PathResolver: Send + Sync {
    /// `true` if `source` names a network resource (`http://`, `https://`,
    /// streaming schemes). `file://` URIs are not network resources.
    fn is_url(&self, source: &str) -> bool;

    /// `true` if `source` is already an absolute filesystem path.
    fn is_absolute(&self, source: &str) -> bool;

    /// Resolve a relative `source` against the host's resource root.
    fn absolute_path(&self, source: &str) -> Result<PathBuf>;
}

/// Scheme check shared by resolver implementations: `scheme://rest` where the
/// scheme is alphabetic-led and not `file`.
pub fn has_network_scheme(source: &str) -> bool {
    let Some((scheme, rest)) = source.split_once("://") else {
        return false;
    };

    !rest.is_empty()
        && scheme
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic())
        && scheme
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        && !scheme.eq_ignore_ascii_case("file")
}
