//! # Event Bus System
//!
//! Lifecycle notifications of a player, carried over `tokio::sync::broadcast`.
//!
//! ## Overview
//!
//! - **[`PlayerEvent`]**: the notifications a playback intent raises
//! - **[`EventBus`]**: broadcast channel with any number of subscribers
//! - **[`EventStream`]**: receiver wrapper with optional filtering
//!
//! Notifications are fire-and-forget. Emitting with no subscriber reports an
//! error from [`EventBus::emit`] that callers are expected to ignore, and a
//! closed bus silently drops everything.
//!
//! ```text
//! ┌──────────┐  PathChanged, Started…   ┌──────────┐   subscribe   ┌─────────┐
//! │   Host   ├─────────────────────────>│          ├──────────────>│ Binding │
//! └──────────┘                          │ EventBus │               └────┬────┘
//!                                       │          │<──────────────────┘
//!                                       └──────────┘  LoadCompleted,
//!                                                     FinishedPlaying
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use core_runtime::events::{EventBus, EventStream, EventOrigin, PlayerEvent};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let bus = EventBus::new(16);
//! let mut host_events = EventStream::new(bus.subscribe())
//!     .filter(|event| event.origin() == EventOrigin::Host);
//!
//! bus.emit(PlayerEvent::LoadCompleted).ok();
//! bus.emit(PlayerEvent::Started).ok();
//!
//! assert_eq!(host_events.recv().await.unwrap(), PlayerEvent::Started);
//! # }
//! ```
//!
//! ## Error Handling
//!
//! - **`RecvError::Lagged(n)`**: the subscriber fell `n` events behind. Non-fatal.
//! - **`RecvError::Closed`**: the bus was closed or dropped. Subscribers exit.

use bridge_traits::geometry::Rect;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tokio::sync::broadcast;

pub use tokio::sync::broadcast::error::{RecvError, SendError};
pub use tokio::sync::broadcast::Receiver;

/// Default buffer size for the event bus channel.
pub const DEFAULT_EVENT_BUFFER_SIZE: usize = 64;

// ============================================================================
// Player Events
// ============================================================================

/// Lifecycle notification raised by a playback intent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "event")]
pub enum PlayerEvent {
    /// The source path was assigned. Raised on every assignment.
    PathChanged,
    /// The host asked for the current source to be buffered.
    Buffered,
    /// The host asked for playback from the beginning.
    Started,
    Paused,
    Resumed,
    Stopped,
    SoughtBeginning,
    /// The backend reached the end of the media.
    FinishedPlaying,
    /// The video size of the current load cycle is known.
    LoadCompleted,
    /// The layout collaborator moved or resized the player.
    FrameChanged { frame: Rect },
}

/// Which side of the binding raises an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventOrigin {
    /// Raised by the host through the intent's public API.
    Host,
    /// Raised by the backend binding to report observed state.
    Binding,
}

impl PlayerEvent {
    /// Returns a human-readable description of the event.
    pub fn description(&self) -> &str {
        match self {
            PlayerEvent::PathChanged => "Source path changed",
            PlayerEvent::Buffered => "Buffering requested",
            PlayerEvent::Started => "Playback start requested",
            PlayerEvent::Paused => "Pause requested",
            PlayerEvent::Resumed => "Resume requested",
            PlayerEvent::Stopped => "Stop requested",
            PlayerEvent::SoughtBeginning => "Seek to beginning requested",
            PlayerEvent::FinishedPlaying => "Playback finished",
            PlayerEvent::LoadCompleted => "Video size discovered",
            PlayerEvent::FrameChanged { .. } => "Player frame changed",
        }
    }

    /// Returns the severity level of the event.
    pub fn severity(&self) -> EventSeverity {
        match self {
            PlayerEvent::FinishedPlaying | PlayerEvent::LoadCompleted => EventSeverity::Info,
            _ => EventSeverity::Debug,
        }
    }

    pub fn origin(&self) -> EventOrigin {
        match self {
            PlayerEvent::FinishedPlaying | PlayerEvent::LoadCompleted => EventOrigin::Binding,
            _ => EventOrigin::Host,
        }
    }
}

/// Event severity levels for filtering and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EventSeverity {
    Debug,
    Info,
    Warning,
    Error,
}

// ============================================================================
// Event Bus
// ============================================================================

/// Broadcast bus for [`PlayerEvent`]s.
///
/// Clones share the same channel. [`EventBus::close`] drops the sender for
/// every clone at once: current subscribers observe `RecvError::Closed` once
/// drained, later emits are discarded and later subscribers receive a closed
/// receiver.
#[derive(Clone)]
pub struct EventBus {
    sender: Arc<RwLock<Option<broadcast::Sender<PlayerEvent>>>>,
}

impl EventBus {
    /// Creates a new event bus buffering up to `capacity` events per
    /// subscriber.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero. `PlayerConfig` validates this before a
    /// bus is ever built from it.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender: Arc::new(RwLock::new(Some(sender))),
        }
    }

    /// Publishes an event to all subscribers.
    ///
    /// Returns the number of subscribers that received the event, or the
    /// event back if nobody is listening or the bus is closed.
    pub fn emit(&self, event: PlayerEvent) -> Result<usize, SendError<PlayerEvent>> {
        match self.sender.read().as_ref() {
            Some(sender) => sender.send(event),
            None => Err(SendError(event)),
        }
    }

    /// Creates a new subscriber. Past events are not replayed.
    pub fn subscribe(&self) -> Receiver<PlayerEvent> {
        match self.sender.read().as_ref() {
            Some(sender) => sender.subscribe(),
            None => {
                let (sender, receiver) = broadcast::channel(1);
                drop(sender);
                receiver
            }
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender
            .read()
            .as_ref()
            .map_or(0, broadcast::Sender::receiver_count)
    }

    /// Close the bus for every clone. Idempotent.
    pub fn close(&self) {
        self.sender.write().take();
    }

    pub fn is_closed(&self) -> bool {
        self.sender.read().is_none()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_BUFFER_SIZE)
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("subscriber_count", &self.subscriber_count())
            .field("closed", &self.is_closed())
            .finish()
    }
}

// ============================================================================
// Event Stream Wrapper
// ============================================================================

type EventFilter = Box<dyn Fn(&PlayerEvent) -> bool + Send + Sync>;

/// A wrapper around `broadcast::Receiver` with optional filtering.
pub struct EventStream {
    receiver: Receiver<PlayerEvent>,
    filter: Option<EventFilter>,
}

impl EventStream {
    pub fn new(receiver: Receiver<PlayerEvent>) -> Self {
        Self {
            receiver,
            filter: None,
        }
    }

    /// Only events matching `predicate` are returned by `recv()`.
    pub fn filter<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&PlayerEvent) -> bool + Send + Sync + 'static,
    {
        self.filter = Some(Box::new(predicate));
        self
    }

    /// Receives the next event that passes the filter.
    ///
    /// # Errors
    ///
    /// Returns `RecvError::Lagged(n)` if the subscriber fell behind by `n` events.
    /// Returns `RecvError::Closed` once the bus is closed and drained.
    pub async fn recv(&mut self) -> Result<PlayerEvent, RecvError> {
        loop {
            let event = self.receiver.recv().await?;
            if self.accepts(&event) {
                return Ok(event);
            }
        }
    }

    /// Attempts to receive an event without waiting.
    ///
    /// Returns `None` if no events are currently available.
    pub fn try_recv(&mut self) -> Option<Result<PlayerEvent, RecvError>> {
        loop {
            match self.receiver.try_recv() {
                Ok(event) => {
                    if self.accepts(&event) {
                        return Some(Ok(event));
                    }
                }
                Err(broadcast::error::TryRecvError::Empty) => return None,
                Err(broadcast::error::TryRecvError::Lagged(n)) => {
                    return Some(Err(RecvError::Lagged(n)))
                }
                Err(broadcast::error::TryRecvError::Closed) => return Some(Err(RecvError::Closed)),
            }
        }
    }

    fn accepts(&self, event: &PlayerEvent) -> bool {
        self.filter.as_ref().map_or(true, |filter| filter(event))
    }
}

impl fmt::Debug for EventStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventStream")
            .field("has_filter", &self.filter.is_some())
            .finish()
    }
}
