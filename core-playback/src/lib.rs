//! # Playback Binding Core
//!
//! Keeps a platform-neutral player model in sync with a native video backend.
//!
//! ## Overview
//!
//! - [`PlaybackIntent`]: what the host wants (path, auto-play, looping,
//!   auto-buffer) and what the backend observed (readiness, video size)
//! - [`binding`]: adapters for surface-style and asset-style native players
//! - [`driver`]: attaches an intent to a native backend and runs the binding
//!   on the UI-affine context
//!
//! ## Usage
//!
//! ```ignore
//! use core_playback::{attach, NativeBackend, PlaybackIntent};
//!
//! let intent = PlaybackIntent::from_config(&config);
//! let handle = attach(&intent, NativeBackend::Asset(backend), &config)?;
//!
//! intent.set_auto_play(true);
//! intent.set_path("https://cdn.example.com/intro.m3u8");
//! // ...
//! handle.dispose().await?;
//! ```

pub mod binding;
pub mod command;
pub mod driver;
pub mod error;
pub mod intent;
pub mod source;

pub use binding::{BackendBinding, BackendKind, BindingState};
pub use command::PlaybackCommand;
pub use driver::{attach, BindingHandle, HostPlatform, NativeBackend, NativeSignals};
pub use error::{PlaybackError, Result};
pub use intent::PlaybackIntent;
pub use source::MediaSource;
