//! # Playback Intent
//!
//! Platform-neutral model of a video player: what the host wants (path and
//! playback flags) plus what the backend has observed (readiness and video
//! size). The host mutates it, the binding reads it and reports back.
//!
//! ## Ownership
//!
//! [`PlaybackIntent`] is a cheap, cloneable handle. The host keeps one clone,
//! the binding another. Observed state can only be written from inside this
//! crate, so hosts read `is_ready` and `video_size` but never set them.
//!
//! ## Notifications
//!
//! Every mutation the binding must react to raises a [`PlayerEvent`] on the
//! intent's [`EventBus`]. Raising with nobody subscribed is a silent no-op,
//! and once the intent is disposed every raise is dropped.
//!
//! Host subscribers share the bounded bus and may lag. Attached bindings
//! instead get an unbounded feed of host notifications, so a burst of frame
//! updates can never push a path change or a command out of their view.
//!
//! ```ignore
//! use core_playback::PlaybackIntent;
//!
//! let intent = PlaybackIntent::default();
//! intent.set_auto_play(true);
//! intent.set_path("Videos/intro.mp4");
//! intent.pause();
//! ```

use bridge_traits::geometry::{Rect, VideoSize};
use core_runtime::config::{PlaybackDefaults, PlayerConfig};
use core_runtime::events::{
    EventBus, EventOrigin, EventStream, PlayerEvent, DEFAULT_EVENT_BUFFER_SIZE,
};
use parking_lot::{Mutex, RwLock};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;

#[derive(Debug, Clone, Default)]
struct IntentState {
    path: Option<String>,
    auto_play: bool,
    looping: bool,
    auto_buffer: bool,
    is_ready: bool,
    video_size: VideoSize,
    frame: Rect,
}

struct Inner {
    state: RwLock<IntentState>,
    events: EventBus,
    binding_feeds: Mutex<Vec<mpsc::UnboundedSender<PlayerEvent>>>,
    disposed: AtomicBool,
}

/// Shared handle to one player's desired and observed state.
#[derive(Clone)]
pub struct PlaybackIntent {
    inner: Arc<Inner>,
}

impl PlaybackIntent {
    /// Creates an intent with the given initial flags. A zero `event_capacity`
    /// is raised to one.
    pub fn new(defaults: PlaybackDefaults, event_capacity: usize) -> Self {
        let state = IntentState {
            auto_play: defaults.auto_play,
            looping: defaults.looping,
            auto_buffer: defaults.auto_buffer,
            ..IntentState::default()
        };

        Self {
            inner: Arc::new(Inner {
                state: RwLock::new(state),
                events: EventBus::new(event_capacity.max(1)),
                binding_feeds: Mutex::new(Vec::new()),
                disposed: AtomicBool::new(false),
            }),
        }
    }

    pub fn from_config(config: &PlayerConfig) -> Self {
        Self::new(config.defaults, config.event_buffer_size)
    }

    // ------------------------------------------------------------------
    // Desired configuration
    // ------------------------------------------------------------------

    pub fn path(&self) -> Option<String> {
        self.inner.state.read().path.clone()
    }

    /// Sets the media source and raises [`PlayerEvent::PathChanged`].
    ///
    /// Assigning the current value again still raises, which is how hosts
    /// force a reload.
    pub fn set_path(&self, path: impl Into<String>) {
        self.inner.state.write().path = Some(path.into());
        self.raise(PlayerEvent::PathChanged);
    }

    /// Clears the media source and raises [`PlayerEvent::PathChanged`].
    pub fn clear_path(&self) {
        self.inner.state.write().path = None;
        self.raise(PlayerEvent::PathChanged);
    }

    pub fn auto_play(&self) -> bool {
        self.inner.state.read().auto_play
    }

    pub fn set_auto_play(&self, enabled: bool) {
        self.inner.state.write().auto_play = enabled;
    }

    pub fn looping(&self) -> bool {
        self.inner.state.read().looping
    }

    /// Takes effect on the next load cycle.
    pub fn set_looping(&self, enabled: bool) {
        self.inner.state.write().looping = enabled;
    }

    pub fn auto_buffer(&self) -> bool {
        self.inner.state.read().auto_buffer
    }

    pub fn set_auto_buffer(&self, enabled: bool) {
        self.inner.state.write().auto_buffer = enabled;
    }

    pub fn frame(&self) -> Rect {
        self.inner.state.read().frame
    }

    /// Records the frame computed by the layout collaborator and raises
    /// [`PlayerEvent::FrameChanged`].
    pub fn set_frame(&self, frame: Rect) {
        self.inner.state.write().frame = frame;
        self.raise(PlayerEvent::FrameChanged { frame });
    }

    // ------------------------------------------------------------------
    // Observed state
    // ------------------------------------------------------------------

    pub fn is_ready(&self) -> bool {
        self.inner.state.read().is_ready
    }

    /// [`VideoSize::ZERO`] until the backend reports geometry.
    pub fn video_size(&self) -> VideoSize {
        self.inner.state.read().video_size
    }

    // ------------------------------------------------------------------
    // Commands
    // ------------------------------------------------------------------

    /// Asks the backend to buffer the current source without playing it.
    pub fn buffer(&self) {
        self.raise(PlayerEvent::Buffered);
    }

    /// Plays from the beginning.
    pub fn play(&self) {
        self.raise(PlayerEvent::Started);
    }

    pub fn pause(&self) {
        self.raise(PlayerEvent::Paused);
    }

    /// Continues from the current position.
    pub fn resume(&self) {
        self.raise(PlayerEvent::Resumed);
    }

    pub fn stop(&self) {
        self.raise(PlayerEvent::Stopped);
    }

    pub fn seek_to_beginning(&self) {
        self.raise(PlayerEvent::SoughtBeginning);
    }

    // ------------------------------------------------------------------
    // Subscription and lifecycle
    // ------------------------------------------------------------------

    /// Subscribes to every notification raised from now on.
    pub fn subscribe(&self) -> EventStream {
        EventStream::new(self.inner.events.subscribe())
    }

    /// Drops every subscriber. Later raises are no-ops. Idempotent.
    pub fn dispose(&self) {
        if self.inner.disposed.swap(true, Ordering::AcqRel) {
            return;
        }
        self.inner.binding_feeds.lock().clear();
        self.inner.events.close();
    }

    pub fn is_disposed(&self) -> bool {
        self.inner.disposed.load(Ordering::Acquire)
    }

    /// `true` if both handles refer to the same intent.
    pub fn ptr_eq(&self, other: &PlaybackIntent) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    // ------------------------------------------------------------------
    // Binding-side writers
    // ------------------------------------------------------------------

    /// Lossless feed of host-originated notifications for one binding. The
    /// feed ends when the intent is disposed.
    pub(crate) fn subscribe_binding(&self) -> mpsc::UnboundedReceiver<PlayerEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut feeds = self.inner.binding_feeds.lock();
        if !self.is_disposed() {
            feeds.push(tx);
        }
        rx
    }

    pub(crate) fn set_ready(&self, ready: bool) {
        self.inner.state.write().is_ready = ready;
    }

    /// Starts a new load cycle: not ready, size unknown.
    pub(crate) fn begin_load_cycle(&self) {
        let mut state = self.inner.state.write();
        state.is_ready = false;
        state.video_size = VideoSize::ZERO;
    }

    /// Stores the first known size of the current load cycle. Returns `true`
    /// only for that first write; the caller then raises `LoadCompleted`.
    pub(crate) fn record_video_size(&self, size: VideoSize) -> bool {
        if !size.is_known() {
            return false;
        }

        let mut state = self.inner.state.write();
        if state.video_size.is_known() {
            return false;
        }
        state.video_size = size;
        true
    }

    pub(crate) fn raise(&self, event: PlayerEvent) {
        if event.origin() == EventOrigin::Host {
            let mut feeds = self.inner.binding_feeds.lock();
            feeds.retain(|feed| feed.send(event.clone()).is_ok());
        }
        // No subscriber and a closed bus both mean nobody is listening.
        self.inner.events.emit(event).ok();
    }
}

impl Default for PlaybackIntent {
    fn default() -> Self {
        Self::new(PlaybackDefaults::default(), DEFAULT_EVENT_BUFFER_SIZE)
    }
}

impl fmt::Debug for PlaybackIntent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.state.read();
        f.debug_struct("PlaybackIntent")
            .field("has_path", &state.path.is_some())
            .field("auto_play", &state.auto_play)
            .field("looping", &state.looping)
            .field("auto_buffer", &state.auto_buffer)
            .field("is_ready", &state.is_ready)
            .field("video_size", &state.video_size)
            .field("disposed", &self.is_disposed())
            .finish()
    }
}
