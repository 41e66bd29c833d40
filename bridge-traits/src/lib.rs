//! # Host Bridge Traits
//!
//! Platform abstraction traits that must be implemented by each host platform.
//!
//! ## Overview
//!
//! This crate defines the contract between the playback binding core and the
//! platform it runs on. Each trait is a capability the core needs but that
//! every platform provides differently.
//!
//! ## Traits
//!
//! ### Native media backends
//! - [`SurfaceDecoder`](surface::SurfaceDecoder) + [`RenderSurface`](surface::RenderSurface) -
//!   decoder and rendering surface with independent lifecycles (Android-style)
//! - [`AssetPlayerBackend`](asset::AssetPlayerBackend) - asset, player item and
//!   player layer stack with single and looping players (iOS-style)
//!
//! ### Host collaborators
//! - [`UiDispatcher`](dispatch::UiDispatcher) - run work on the UI-affine context or in the background
//! - [`PathResolver`](paths::PathResolver) - URL classification and absolute path resolution
//! - [`LoggerSink`](log::LoggerSink) - forward structured logs to host logging
//!
//! ## Platform Requirements
//!
//! | Platform | Media backend          | Collaborators      |
//! |----------|------------------------|--------------------|
//! | Desktop  | host supplied          | `bridge-desktop`   |
//! | Android  | `SurfaceDecoder`       | host supplied      |
//! | iOS      | `AssetPlayerBackend`   | host supplied      |
//!
//! ## Callbacks
//!
//! Native backends never call into the core directly. They emit signals through
//! a [`SignalSink`](signal::SignalSink) registered at construction, and the
//! core drains those signals on the UI-affine context.
//!
//! ## Error Handling
//!
//! All bridge traits use [`BridgeError`](error::BridgeError). Implementations
//! should map native exceptions onto the closest variant and keep the native
//! message.

pub mod asset;
pub mod dispatch;
pub mod error;
pub mod geometry;
pub mod log;
pub mod paths;
pub mod signal;
pub mod surface;

pub use error::BridgeError;

// Re-export commonly used types
pub use asset::{AssetPlayerBackend, AssetSignal, ItemStatus, PlayerMode, VideoGravity};
pub use dispatch::{DispatchTask, UiDispatcher};
pub use geometry::{Rect, Transform, VideoSize};
pub use log::{ConsoleLogger, LogEntry, LogLevel, LoggerSink};
pub use paths::PathResolver;
pub use signal::SignalSink;
pub use surface::{RenderSurface, ScalingMode, SurfaceDecoder, SurfaceHandle, SurfaceSignal};
