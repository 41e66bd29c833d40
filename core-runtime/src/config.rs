//! # Player Configuration
//!
//! Builder-based configuration shared by every player a host creates.
//!
//! ## Overview
//!
//! [`PlayerConfig`] carries the host collaborators a binding needs and the
//! defaults applied to new playback intents. The builder fails fast when a
//! required collaborator is missing.
//!
//! ## Required Collaborators
//!
//! - `UiDispatcher` - runs binding work on the UI-affine context
//! - `PathResolver` - classifies and resolves media sources
//!
//! When the `desktop-shims` feature is enabled, `bridge-desktop` provides
//! both if they are not set explicitly.
//!
//! ## Usage
//!
//! ```ignore
//! use core_runtime::config::{PlaybackDefaults, PlayerConfig};
//! use std::sync::Arc;
//!
//! let config = PlayerConfig::builder()
//!     .ui_dispatcher(Arc::new(MainLooperDispatcher::new()))
//!     .path_resolver(Arc::new(AssetPathResolver::new()))
//!     .defaults(PlaybackDefaults {
//!         auto_play: true,
//!         ..PlaybackDefaults::default()
//!     })
//!     .build()?;
//! ```
//!
//! ## Error Handling
//!
//! Missing collaborators produce [`Error::CapabilityMissing`] with a message
//! naming the platform primitive to inject. Out-of-range values produce
//! [`Error::Config`].

use crate::error::{Error, Result};
use crate::events::DEFAULT_EVENT_BUFFER_SIZE;
use bridge_traits::{PathResolver, ScalingMode, UiDispatcher, VideoGravity};
use std::sync::Arc;

/// Upper bound for the per-intent broadcast buffer.
const MAX_EVENT_BUFFER_SIZE: usize = 4096;

/// Initial flag values of a new playback intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PlaybackDefaults {
    /// Start playing as soon as the backend is ready.
    pub auto_play: bool,
    /// Loop natively at end of stream.
    pub looping: bool,
    /// Prepare local sources eagerly and start once buffered.
    pub auto_buffer: bool,
}

/// Configuration shared by the playback bindings of one host.
#[derive(Clone)]
pub struct PlayerConfig {
    /// Runs binding work on the UI-affine context (required)
    pub ui_dispatcher: Arc<dyn UiDispatcher>,

    /// Resolves media sources (required)
    pub path_resolver: Arc<dyn PathResolver>,

    /// Broadcast capacity of each intent's event bus
    pub event_buffer_size: usize,

    /// Applied to surface-style decoders once prepared
    pub scaling_mode: ScalingMode,

    /// Applied to asset-style player layers
    pub video_gravity: VideoGravity,

    pub defaults: PlaybackDefaults,
}

impl std::fmt::Debug for PlayerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlayerConfig")
            .field("ui_dispatcher", &"UiDispatcher { ... }")
            .field("path_resolver", &"PathResolver { ... }")
            .field("event_buffer_size", &self.event_buffer_size)
            .field("scaling_mode", &self.scaling_mode)
            .field("video_gravity", &self.video_gravity)
            .field("defaults", &self.defaults)
            .finish()
    }
}

impl PlayerConfig {
    /// Creates a new builder for constructing a `PlayerConfig`.
    pub fn builder() -> PlayerConfigBuilder {
        PlayerConfigBuilder::default()
    }

    /// Validates value ranges.
    pub fn validate(&self) -> Result<()> {
        if self.event_buffer_size == 0 {
            return Err(Error::Config(
                "Event buffer size must be greater than 0".to_string(),
            ));
        }

        if self.event_buffer_size > MAX_EVENT_BUFFER_SIZE {
            return Err(Error::Config(format!(
                "Event buffer size exceeds maximum of {}",
                MAX_EVENT_BUFFER_SIZE
            )));
        }

        Ok(())
    }
}

#[cfg(not(feature = "desktop-shims"))]
fn ui_dispatcher_missing_error() -> Error {
    Error::CapabilityMissing {
        capability: "UiDispatcher".to_string(),
        message: "UiDispatcher implementation is required to run bindings on the UI context. \
                 Desktop: enable the 'desktop-shims' feature to use the default TokioUiDispatcher. \
                 Android: inject a main-looper dispatcher. \
                 iOS: inject a main-queue dispatcher."
            .to_string(),
    }
}

#[cfg(not(feature = "desktop-shims"))]
fn path_resolver_missing_error() -> Error {
    Error::CapabilityMissing {
        capability: "PathResolver".to_string(),
        message: "PathResolver implementation is required to normalize media sources. \
                 Desktop: enable the 'desktop-shims' feature to use the default DesktopPathResolver. \
                 Mobile: inject a resolver rooted at the app's resource directory."
            .to_string(),
    }
}

#[cfg(feature = "desktop-shims")]
fn provide_default_ui_dispatcher() -> Result<Arc<dyn UiDispatcher>> {
    use bridge_desktop::TokioUiDispatcher;

    let dispatcher = TokioUiDispatcher::new().map_err(|e| Error::CapabilityMissing {
        capability: "UiDispatcher".to_string(),
        message: format!("Failed to start the default desktop UI dispatcher: {}", e),
    })?;
    Ok(Arc::new(dispatcher))
}

#[cfg(not(feature = "desktop-shims"))]
fn provide_default_ui_dispatcher() -> Result<Arc<dyn UiDispatcher>> {
    Err(ui_dispatcher_missing_error())
}

#[cfg(feature = "desktop-shims")]
fn provide_default_path_resolver() -> Result<Arc<dyn PathResolver>> {
    use bridge_desktop::DesktopPathResolver;

    Ok(Arc::new(DesktopPathResolver::new()))
}

#[cfg(not(feature = "desktop-shims"))]
fn provide_default_path_resolver() -> Result<Arc<dyn PathResolver>> {
    Err(path_resolver_missing_error())
}

/// Builder for constructing [`PlayerConfig`] instances.
#[derive(Default)]
pub struct PlayerConfigBuilder {
    ui_dispatcher: Option<Arc<dyn UiDispatcher>>,
    path_resolver: Option<Arc<dyn PathResolver>>,
    event_buffer_size: Option<usize>,
    scaling_mode: ScalingMode,
    video_gravity: VideoGravity,
    defaults: PlaybackDefaults,
}

impl PlayerConfigBuilder {
    pub fn ui_dispatcher(mut self, dispatcher: Arc<dyn UiDispatcher>) -> Self {
        self.ui_dispatcher = Some(dispatcher);
        self
    }

    pub fn path_resolver(mut self, resolver: Arc<dyn PathResolver>) -> Self {
        self.path_resolver = Some(resolver);
        self
    }

    /// Sets the broadcast capacity of each intent's event bus.
    ///
    /// Default: 64
    pub fn event_buffer_size(mut self, size: usize) -> Self {
        self.event_buffer_size = Some(size);
        self
    }

    pub fn scaling_mode(mut self, mode: ScalingMode) -> Self {
        self.scaling_mode = mode;
        self
    }

    pub fn video_gravity(mut self, gravity: VideoGravity) -> Self {
        self.video_gravity = gravity;
        self
    }

    pub fn defaults(mut self, defaults: PlaybackDefaults) -> Self {
        self.defaults = defaults;
        self
    }

    pub fn auto_play(mut self, enabled: bool) -> Self {
        self.defaults.auto_play = enabled;
        self
    }

    pub fn looping(mut self, enabled: bool) -> Self {
        self.defaults.looping = enabled;
        self
    }

    pub fn auto_buffer(mut self, enabled: bool) -> Self {
        self.defaults.auto_buffer = enabled;
        self
    }

    /// Builds the final `PlayerConfig`.
    ///
    /// Missing collaborators are filled from `bridge-desktop` when the
    /// `desktop-shims` feature is enabled, and reported as
    /// [`Error::CapabilityMissing`] otherwise.
    pub fn build(self) -> Result<PlayerConfig> {
        let ui_dispatcher = match self.ui_dispatcher {
            Some(dispatcher) => dispatcher,
            None => provide_default_ui_dispatcher()?,
        };

        let path_resolver = match self.path_resolver {
            Some(resolver) => resolver,
            None => provide_default_path_resolver()?,
        };

        let config = PlayerConfig {
            ui_dispatcher,
            path_resolver,
            event_buffer_size: self.event_buffer_size.unwrap_or(DEFAULT_EVENT_BUFFER_SIZE),
            scaling_mode: self.scaling_mode,
            video_gravity: self.video_gravity,
            defaults: self.defaults,
        };

        config.validate()?;

        Ok(config)
    }
}
