//! Binding for asset players that render into a view-hosted layer.
//!
//! Each load opens the asset, builds a player of the shape the intent's
//! looping flag asks for, and hosts its layer inside the view. The shape is
//! fixed for the lifetime of that player; flipping `looping` later only
//! affects the next load.

use super::{live_intent, BackendBinding, BackendKind, BindingState, Dead};
use crate::command::PlaybackCommand;
use crate::intent::PlaybackIntent;
use crate::source::MediaSource;
use bridge_traits::{
    AssetPlayerBackend, AssetSignal, ItemStatus, PathResolver, PlayerMode, SignalSink,
    VideoGravity,
};
use core_runtime::config::PlayerConfig;
use core_runtime::events::PlayerEvent;
use core_runtime::logging::redact_source;
use std::sync::Arc;
use tracing::{debug, error, warn};

pub struct AssetBinding {
    intent: Option<PlaybackIntent>,
    backend: Option<Box<dyn AssetPlayerBackend>>,
    listener: SignalSink<AssetSignal>,
    resolver: Arc<dyn PathResolver>,
    video_gravity: VideoGravity,
    state: BindingState,
    pending: Option<PlaybackCommand>,
    /// Shape of the current player, `None` while no player exists.
    mode: Option<PlayerMode>,
    /// State to return to once a stalled item becomes playable again.
    stalled_from: Option<BindingState>,
}

impl AssetBinding {
    pub fn new(
        intent: PlaybackIntent,
        backend: Box<dyn AssetPlayerBackend>,
        config: &PlayerConfig,
        listener: SignalSink<AssetSignal>,
    ) -> Self {
        Self {
            intent: Some(intent),
            backend: Some(backend),
            listener,
            resolver: Arc::clone(&config.path_resolver),
            video_gravity: config.video_gravity,
            state: BindingState::Idle,
            pending: None,
            mode: None,
            stalled_from: None,
        }
    }

    pub fn pending_command(&self) -> Option<PlaybackCommand> {
        self.pending
    }

    pub fn player_mode(&self) -> Option<PlayerMode> {
        self.mode
    }

    fn alive(&self) -> Result<PlaybackIntent, Dead> {
        live_intent(self.state, self.intent.as_ref())
    }

    fn load(&mut self) {
        let Ok(intent) = self.alive() else {
            return;
        };
        let Some(path) = intent.path().filter(|path| !path.trim().is_empty()) else {
            debug!("No source to load");
            return;
        };
        let source = match MediaSource::resolve(&path, self.resolver.as_ref()) {
            Ok(source) => source,
            Err(err) => {
                warn!(source = %redact_source(&path), error = %err, "Cannot load source");
                self.fail_load();
                return;
            }
        };
        let Some(backend) = self.backend.as_mut() else {
            return;
        };

        intent.begin_load_cycle();
        self.state = BindingState::Loading;
        self.stalled_from = None;
        if self.mode.take().is_some() {
            backend.release_player();
        }
        debug!(source = %redact_source(source.uri()), remote = source.is_remote(), "Opening asset");

        let natural_size = match backend.open_asset(source.uri()) {
            Ok(size) => size,
            Err(err) => {
                error!(source = %redact_source(source.uri()), error = %err, "Asset rejected");
                self.fail_load();
                return;
            }
        };
        if let Some(size) = natural_size {
            if intent.record_video_size(size) {
                debug!(width = size.width, height = size.height, "Video size discovered");
                intent.raise(PlayerEvent::LoadCompleted);
            }
        }

        let mode = PlayerMode::for_looping(intent.looping());
        if let Err(err) = backend.create_player(mode, self.video_gravity, intent.frame().bounds()) {
            error!(error = %err, ?mode, "Player creation failed");
            self.fail_load();
            return;
        }
        self.mode = Some(mode);

        let ready_now =
            mode == PlayerMode::Looping || (!source.is_remote() && !intent.auto_buffer());
        if ready_now {
            self.on_ready(&intent, false);
        } else {
            debug!("Waiting for the item to become playable");
            self.state = BindingState::Buffering;
        }
    }

    fn fail_load(&mut self) {
        self.state = BindingState::Idle;
        self.stalled_from = None;
        if let Some(command) = self.pending.take() {
            debug!(?command, "Dropped deferred command after failed load");
        }
    }

    fn on_ready(&mut self, intent: &PlaybackIntent, observed: bool) {
        intent.set_ready(true);
        self.state = BindingState::Ready;
        debug!(observed, "Backend ready");

        let deferred = self.pending.take();
        if intent.auto_play() || (observed && intent.auto_buffer()) {
            self.apply(PlaybackCommand::Resume);
        }
        if let Some(command) = deferred {
            debug!(?command, "Applying deferred command");
            self.apply(command);
        }
    }

    fn defer(&mut self, command: PlaybackCommand) {
        match self.pending.replace(command) {
            Some(superseded) => debug!(?command, ?superseded, "Deferred command superseded"),
            None => debug!(?command, "Command deferred until ready"),
        }
    }

    fn apply(&mut self, command: PlaybackCommand) {
        if self.state.awaits_readiness() {
            self.defer(command);
            if self.state == BindingState::Idle && command.starts_playback() {
                self.load();
            }
            return;
        }
        let (Some(backend), Some(mode)) = (self.backend.as_mut(), self.mode) else {
            return;
        };

        let resume_state = self.state;
        let outcome = match command {
            PlaybackCommand::Play => {
                if let Err(err) = backend.seek_to_zero(mode) {
                    warn!(error = %err, "Seek before play failed");
                }
                backend.play(mode).map(|()| BindingState::Playing)
            }
            PlaybackCommand::Resume => backend.play(mode).map(|()| BindingState::Playing),
            PlaybackCommand::Pause => backend.pause(mode).map(|()| BindingState::Paused),
            PlaybackCommand::Stop => {
                if let Err(err) = backend.pause(mode) {
                    warn!(error = %err, "Pause before stop failed");
                }
                backend.seek_to_zero(mode).map(|()| BindingState::Stopped)
            }
            PlaybackCommand::SeekToBeginning => {
                self.state = BindingState::SeekingToBeginning;
                backend.seek_to_zero(mode).map(|()| resume_state)
            }
        };

        match outcome {
            Ok(state) => self.state = state,
            Err(err) => {
                warn!(?command, error = %err, "Command failed");
                self.state = resume_state;
            }
        }
    }

    fn on_item_status(&mut self, intent: &PlaybackIntent, status: ItemStatus) {
        match status {
            ItemStatus::ReadyToPlay => {
                if let Some(previous) = self.stalled_from.take() {
                    self.recover(intent, previous);
                } else if matches!(self.state, BindingState::Loading | BindingState::Buffering) {
                    self.on_ready(intent, true);
                } else {
                    intent.set_ready(true);
                }
            }
            ItemStatus::Unknown => {
                let was_ready = intent.is_ready();
                intent.set_ready(false);
                if was_ready {
                    self.stalled_from = Some(self.state);
                    self.state = BindingState::Buffering;
                }
            }
            ItemStatus::Failed => {
                warn!("Player item failed");
                intent.set_ready(false);
                self.fail_load();
            }
        }
    }

    /// The item became playable again after a stall. Auto-start only applies
    /// to the first readiness of a load, so the host's play/pause choice holds.
    fn recover(&mut self, intent: &PlaybackIntent, previous: BindingState) {
        intent.set_ready(true);
        self.state = previous;
        debug!(state = ?previous, "Item playable again");

        if let Some(command) = self.pending.take() {
            debug!(?command, "Applying deferred command");
            self.apply(command);
        }
    }

    fn on_played_to_end(&mut self, intent: &PlaybackIntent) {
        // Raised in place on the UI context. Emitting never blocks, so this
        // binding skips the background hop the surface binding makes.
        intent.raise(PlayerEvent::FinishedPlaying);
        if self.mode == Some(PlayerMode::Single) && self.state == BindingState::Playing {
            self.state = BindingState::Ready;
        }
    }
}

impl BackendBinding for AssetBinding {
    type Signal = AssetSignal;

    fn kind(&self) -> BackendKind {
        BackendKind::Asset
    }

    fn state(&self) -> BindingState {
        self.state
    }

    fn attach(&mut self) {
        if self.alive().is_err() {
            return;
        }
        if let Some(backend) = self.backend.as_mut() {
            backend.set_listener(Some(self.listener.clone()));
        }
        self.load();
    }

    fn on_intent(&mut self, event: &PlayerEvent) {
        if self.alive().is_err() {
            return;
        }

        match event {
            PlayerEvent::PathChanged => self.load(),
            PlayerEvent::Buffered => {
                if self.mode.is_none() {
                    self.load();
                }
            }
            PlayerEvent::FrameChanged { frame } => {
                if let (Some(backend), Some(_)) = (self.backend.as_mut(), self.mode) {
                    backend.set_layer_frame(frame.bounds());
                }
            }
            other => debug!(event = ?other, "Notification not handled by asset binding"),
        }
    }

    fn on_command(&mut self, command: PlaybackCommand) {
        if self.alive().is_err() {
            return;
        }
        self.apply(command);
    }

    fn on_native(&mut self, signal: AssetSignal) {
        let Ok(intent) = self.alive() else {
            return;
        };

        match signal {
            AssetSignal::ItemStatusChanged(status) => self.on_item_status(&intent, status),
            AssetSignal::PlayedToEnd => self.on_played_to_end(&intent),
        }
    }

    fn dispose(&mut self) {
        if self.state == BindingState::Disposed {
            return;
        }

        if let Some(mut backend) = self.backend.take() {
            backend.set_listener(None);
            if let Some(mode) = self.mode.take() {
                if let Err(err) = backend.pause(mode) {
                    debug!(error = %err, "Pause during dispose failed");
                }
            }
            backend.release_player();
            backend.release_layer();
        }

        self.intent = None;
        self.pending = None;
        self.mode = None;
        self.stalled_from = None;
        self.state = BindingState::Disposed;
        debug!("Asset binding disposed");
    }
}

impl Drop for AssetBinding {
    fn drop(&mut self) {
        self.dispose();
    }
}
