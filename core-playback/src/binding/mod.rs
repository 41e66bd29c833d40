//! # Backend Bindings
//!
//! A binding sits between one [`PlaybackIntent`] and one native backend. It
//! turns intent notifications and playback commands into native calls once
//! the backend is ready, and reports readiness, video size and end of stream
//! back onto the intent.
//!
//! ## Variants
//!
//! - [`SurfaceBinding`]: decoder plus a separately managed rendering surface
//! - [`AssetBinding`]: asset, player and layer stack with single and looping
//!   players
//!
//! The variant is chosen when the binding is attached, from the
//! [`NativeBackend`](crate::driver::NativeBackend) the host provides.
//!
//! ## State machine
//!
//! ```text
//! Idle ──PathChanged──> Loading ──┬──> Buffering ──ready──┐
//!                                 └────────ready──────────┴──> Ready
//! Ready ──> Playing / Paused / Stopped     (SeekingToBeginning is transient)
//! any ──dispose──> Disposed
//! ```
//!
//! Commands that arrive before readiness are held in a single register. A
//! later deferral overwrites it; readiness takes it exactly once.
//!
//! ## Threading
//!
//! Every method is called from the binding's driver on the UI-affine context,
//! so implementations own their native handles without locking.

mod asset;
mod surface;
mod surface_tracker;

pub use asset::AssetBinding;
pub use surface::SurfaceBinding;
pub use surface_tracker::{LoadRequest, SurfaceState, SurfaceTracker};

use crate::command::PlaybackCommand;
use crate::intent::PlaybackIntent;
use core_runtime::events::PlayerEvent;
use serde::{Deserialize, Serialize};

/// Which native backend family a binding drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BackendKind {
    /// Decoder with a separately attached surface (Android-style).
    Surface,
    /// Asset player rendering into a layer (iOS-style).
    Asset,
}

/// Lifecycle state of a binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BindingState {
    /// No source loaded.
    Idle,
    /// Source is being handed to the backend.
    Loading,
    /// Backend is preparing asynchronously.
    Buffering,
    Ready,
    Playing,
    Paused,
    Stopped,
    SeekingToBeginning,
    /// Native resources released. Terminal.
    Disposed,
}

impl BindingState {
    /// `true` while commands must be deferred.
    pub fn awaits_readiness(&self) -> bool {
        matches!(
            self,
            BindingState::Idle | BindingState::Loading | BindingState::Buffering
        )
    }
}

/// Returned by the liveness guard once the binding or its intent is gone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dead;

/// Native backend adapter driven by a binding driver.
pub trait BackendBinding: Send {
    /// Callback type the native side emits.
    type Signal: Send + 'static;

    fn kind(&self) -> BackendKind;

    fn state(&self) -> BindingState;

    /// Called once on the UI context before any other entry point.
    fn attach(&mut self);

    /// Non-command notifications raised by the host (path, buffer, frame).
    fn on_intent(&mut self, event: &PlayerEvent);

    /// Applies `command` now if the backend is ready, otherwise defers it.
    fn on_command(&mut self, command: PlaybackCommand);

    fn on_native(&mut self, signal: Self::Signal);

    /// Releases every native resource. Idempotent.
    fn dispose(&mut self);
}

/// Liveness check shared by both bindings.
pub(crate) fn live_intent(
    state: BindingState,
    intent: Option<&PlaybackIntent>,
) -> Result<PlaybackIntent, Dead> {
    if state == BindingState::Disposed {
        return Err(Dead);
    }
    match intent {
        Some(intent) if !intent.is_disposed() => Ok(intent.clone()),
        _ => Err(Dead),
    }
}
