//! # Desktop Bridge Implementations
//!
//! Default implementations of the host collaborator traits for desktop
//! platforms (macOS, Windows, Linux).
//!
//! ## Overview
//!
//! - `UiDispatcher` using a dedicated Tokio UI thread plus a background runtime
//! - `PathResolver` using `std::path` against a resource root
//!
//! Native media backends are not provided here; desktop hosts plug their own
//! `SurfaceDecoder`/`AssetPlayerBackend` implementations into the core.
//!
//! ## Usage
//!
//! ```ignore
//! use bridge_desktop::{DesktopPathResolver, TokioUiDispatcher};
//! use std::sync::Arc;
//!
//! let dispatcher = Arc::new(TokioUiDispatcher::new()?);
//! let resolver = Arc::new(DesktopPathResolver::new());
//! // Hand both to `PlayerConfig::builder()`.
//! ```

mod dispatch;
mod paths;

pub use dispatch::TokioUiDispatcher;
pub use paths::DesktopPathResolver;
