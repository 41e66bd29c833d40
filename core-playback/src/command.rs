//! Playback commands and the relay that carries them to a binding.

use core_runtime::events::PlayerEvent;
use parking_lot::Mutex;
use tokio::sync::mpsc;
use tracing::trace;

/// A transport request from the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlaybackCommand {
    /// Seek to zero, then start.
    Play,
    Pause,
    /// Start from the current position.
    Resume,
    Stop,
    SeekToBeginning,
}

impl PlaybackCommand {
    /// The command a host notification asks for, if any.
    pub fn from_event(event: &PlayerEvent) -> Option<Self> {
        match event {
            PlayerEvent::Started => Some(PlaybackCommand::Play),
            PlayerEvent::Paused => Some(PlaybackCommand::Pause),
            PlayerEvent::Resumed => Some(PlaybackCommand::Resume),
            PlayerEvent::Stopped => Some(PlaybackCommand::Stop),
            PlayerEvent::SoughtBeginning => Some(PlaybackCommand::SeekToBeginning),
            _ => None,
        }
    }

    /// `true` for commands that end with the backend playing.
    pub fn starts_playback(&self) -> bool {
        matches!(self, PlaybackCommand::Play | PlaybackCommand::Resume)
    }
}

/// Multi-producer relay with a single active consumer.
///
/// Subscribing again replaces the previous consumer; its receiver sees the
/// channel close. Nothing is buffered for a future consumer, so commands
/// raised with no consumer are dropped.
#[derive(Debug, Default)]
pub(crate) struct CommandChannel {
    consumer: Mutex<Option<mpsc::UnboundedSender<PlaybackCommand>>>,
}

impl CommandChannel {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn subscribe(&self) -> mpsc::UnboundedReceiver<PlaybackCommand> {
        let (sender, receiver) = mpsc::unbounded_channel();
        *self.consumer.lock() = Some(sender);
        receiver
    }

    /// Fire-and-forget.
    pub(crate) fn raise(&self, command: PlaybackCommand) {
        let consumer = self.consumer.lock();
        match consumer.as_ref() {
            Some(sender) => {
                sender.send(command).ok();
            }
            None => trace!(?command, "No command consumer"),
        }
    }
}
