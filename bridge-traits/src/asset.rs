//! Asset-style native backend.
//!
//! Models platforms where a media asset is opened first, a player item is
//! built from it, and a player renders into a layer hosted by the view. Two
//! player shapes exist: a single player whose item reports readiness through a
//! status observer, and a looping queue player that is usable immediately.
//! Callers pick the shape per call with [`PlayerMode`] so the looping path is
//! never confused with the single-player path.

use crate::{
    error::Result,
    geometry::{Rect, VideoSize},
    signal::SignalSink,
};

/// Which native player a call targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlayerMode {
    /// One player, one item. Readiness arrives via [`AssetSignal::ItemStatusChanged`].
    Single,
    /// Queue player driven by a looper. Ready as soon as it is created.
    Looping,
}

impl PlayerMode {
    pub fn for_looping(looping: bool) -> Self {
        if looping {
            PlayerMode::Looping
        } else {
            PlayerMode::Single
        }
    }
}

/// How the player layer fits video into its bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VideoGravity {
    ResizeAspect,
    #[default]
    ResizeAspectFill,
    Resize,
}

/// Observed status of the current player item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemStatus {
    Unknown,
    ReadyToPlay,
    Failed,
}

/// Callbacks from the asset player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetSignal {
    ItemStatusChanged(ItemStatus),
    /// The current item played to its end time.
    PlayedToEnd,
}

/// Native asset/player/layer stack behind one player view.
pub trait AssetPlayerBackend: Send {
    /// Register (`Some`) or unregister (`None`) the callback listener.
    fn set_listener(&mut self, listener: Option<SignalSink<AssetSignal>>);

    /// Open the asset at `url` and return the natural size of its first video
    /// track with the preferred transform applied, or `None` when the asset has
    /// no video track (yet).
    fn open_asset(&mut self, url: &str) -> Result<Option<VideoSize>>;

    /// Build a player of shape `mode` for the opened asset and host its layer
    /// at `frame`.
    fn create_player(&mut self, mode: PlayerMode, gravity: VideoGravity, frame: Rect)
        -> Result<()>;

    fn play(&mut self, mode: PlayerMode) -> Result<()>;

    fn pause(&mut self, mode: PlayerMode) -> Result<()>;

    fn seek_to_zero(&mut self, mode: PlayerMode) -> Result<()>;

    fn set_layer_frame(&mut self, frame: Rect);

    /// Release asset, item, players and looper.
    fn release_player(&mut self);

    /// Remove and release the player layer.
    fn release_layer(&mut self);
}
