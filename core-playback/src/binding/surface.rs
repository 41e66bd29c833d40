//! Binding for decoders that render into a separately managed surface.
//!
//! The decoder lives as long as the binding. The rendering surface comes and
//! goes with the OS windowing system, so loads wait in the
//! [`SurfaceTracker`] until a drawable surface exists. A destroyed surface
//! keeps the decoder and replays the load on the next surface.
//!
//! Native readiness is tracked apart from the intent's `is_ready`: a local
//! source without auto-buffer is reported ready as soon as its data source is
//! set, but the decoder is only prepared when playback is first requested.

use super::{
    live_intent, BackendBinding, BackendKind, BindingState, Dead, LoadRequest, SurfaceState,
    SurfaceTracker,
};
use crate::command::PlaybackCommand;
use crate::intent::PlaybackIntent;
use crate::source::MediaSource;
use bridge_traits::{
    PathResolver, RenderSurface, ScalingMode, SignalSink, SurfaceDecoder, SurfaceSignal,
    UiDispatcher, VideoSize,
};
use core_runtime::config::PlayerConfig;
use core_runtime::events::PlayerEvent;
use core_runtime::logging::redact_source;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, warn};

pub struct SurfaceBinding {
    intent: Option<PlaybackIntent>,
    decoder: Option<Box<dyn SurfaceDecoder>>,
    surface: Option<Box<dyn RenderSurface>>,
    listener: SignalSink<SurfaceSignal>,
    dispatcher: Arc<dyn UiDispatcher>,
    resolver: Arc<dyn PathResolver>,
    scaling_mode: ScalingMode,
    tracker: SurfaceTracker,
    state: BindingState,
    pending: Option<PlaybackCommand>,
    /// Source currently assigned to the decoder.
    source: Option<MediaSource>,
    preparing: bool,
    prepared: bool,
}

impl SurfaceBinding {
    /// Native listeners are registered in [`attach`](BackendBinding::attach).
    pub fn new(
        intent: PlaybackIntent,
        decoder: Box<dyn SurfaceDecoder>,
        surface: Box<dyn RenderSurface>,
        config: &PlayerConfig,
        listener: SignalSink<SurfaceSignal>,
    ) -> Self {
        Self {
            intent: Some(intent),
            decoder: Some(decoder),
            surface: Some(surface),
            listener,
            dispatcher: Arc::clone(&config.ui_dispatcher),
            resolver: Arc::clone(&config.path_resolver),
            scaling_mode: config.scaling_mode,
            tracker: SurfaceTracker::new(),
            state: BindingState::Idle,
            pending: None,
            source: None,
            preparing: false,
            prepared: false,
        }
    }

    pub fn pending_command(&self) -> Option<PlaybackCommand> {
        self.pending
    }

    pub fn surface_state(&self) -> SurfaceState {
        self.tracker.state()
    }

    /// `true` once the decoder finished an asynchronous prepare for the
    /// current source.
    pub fn is_prepared(&self) -> bool {
        self.prepared
    }

    fn alive(&self) -> Result<PlaybackIntent, Dead> {
        live_intent(self.state, self.intent.as_ref())
    }

    // ------------------------------------------------------------------
    // Loading
    // ------------------------------------------------------------------

    fn load(&mut self) {
        let Ok(intent) = self.alive() else {
            return;
        };
        let Some(path) = intent.path().filter(|path| !path.trim().is_empty()) else {
            debug!("No source to load");
            return;
        };

        let Some(request) = self.tracker.request_load(LoadRequest { path }) else {
            debug!("Load waiting for a surface");
            return;
        };
        self.load_source(&intent, &request.path);
    }

    fn load_source(&mut self, intent: &PlaybackIntent, path: &str) {
        let source = match MediaSource::resolve(path, self.resolver.as_ref()) {
            Ok(source) => source,
            Err(err) => {
                warn!(source = %redact_source(path), error = %err, "Cannot load source");
                self.fail_load();
                return;
            }
        };
        let Some(decoder) = self.decoder.as_mut() else {
            return;
        };

        intent.begin_load_cycle();
        self.state = BindingState::Loading;
        self.source = None;
        self.preparing = false;
        self.prepared = false;
        debug!(source = %redact_source(source.uri()), remote = source.is_remote(), "Loading source");

        if let Err(err) = decoder.reset() {
            warn!(error = %err, "Decoder reset failed");
        }
        if let Err(err) = decoder.set_data_source(source.uri()) {
            error!(source = %redact_source(source.uri()), error = %err, "Data source rejected");
            self.fail_load();
            return;
        }

        let buffer_now = source.is_remote() || intent.auto_buffer();
        self.source = Some(source);

        if buffer_now {
            self.begin_prepare();
        } else {
            self.on_ready(intent, false);
        }
    }

    fn fail_load(&mut self) {
        self.state = BindingState::Idle;
        self.source = None;
        self.preparing = false;
        self.prepared = false;
        if let Some(command) = self.pending.take() {
            debug!(?command, "Dropped deferred command after failed load");
        }
    }

    fn begin_prepare(&mut self) {
        if self.prepared {
            return;
        }
        if self.source.is_none() {
            // A reset decoder has nothing to prepare.
            debug!("No data source assigned; reloading");
            self.load();
            return;
        }
        self.state = BindingState::Buffering;
        if self.preparing {
            return;
        }
        let Some(decoder) = self.decoder.as_mut() else {
            return;
        };

        match decoder.prepare_async() {
            Ok(()) => self.preparing = true,
            Err(err) => {
                error!(error = %err, "Prepare failed");
                self.fail_load();
            }
        }
    }

    fn buffer(&mut self) {
        if self.source.is_none() {
            debug!("Nothing loaded to buffer");
            return;
        }
        self.begin_prepare();
    }

    // ------------------------------------------------------------------
    // Readiness
    // ------------------------------------------------------------------

    fn on_ready(&mut self, intent: &PlaybackIntent, prepared_async: bool) {
        intent.set_ready(true);
        self.configure_decoder(intent);
        self.state = BindingState::Ready;
        debug!(prepared_async, "Backend ready");

        let deferred = self.pending.take();
        if intent.auto_play() || (prepared_async && intent.auto_buffer()) {
            self.start_playback();
        }
        if let Some(command) = deferred {
            debug!(?command, "Applying deferred command");
            self.apply(command);
        }
    }

    fn configure_decoder(&mut self, intent: &PlaybackIntent) {
        let Some(decoder) = self.decoder.as_mut() else {
            return;
        };
        if self.prepared {
            if let Err(err) = decoder.set_scaling_mode(self.scaling_mode) {
                warn!(error = %err, "Scaling mode rejected");
            }
        }
        if let Err(err) = decoder.set_looping(intent.looping()) {
            warn!(error = %err, "Looping flag rejected");
        }
    }

    fn on_prepared(&mut self, intent: &PlaybackIntent) {
        if !self.preparing {
            debug!("Ignoring prepared signal from an abandoned load");
            return;
        }
        self.preparing = false;
        self.prepared = true;
        self.on_ready(intent, true);
    }

    // ------------------------------------------------------------------
    // Commands
    // ------------------------------------------------------------------

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

        if self.state == BindingState::Stopped && command.starts_playback() {
            // Stop reset the decoder; reload and play once ready again.
            self.defer(command);
            self.load();
            return;
        }

        match command {
            PlaybackCommand::Play => self.play_from_start(),
            PlaybackCommand::Resume => self.start_playback(),
            PlaybackCommand::Pause => self.pause(),
            PlaybackCommand::Stop => self.stop(),
            PlaybackCommand::SeekToBeginning => self.seek_to_beginning(),
        }
    }

    fn play_from_start(&mut self) {
        if !self.prepared {
            self.defer(PlaybackCommand::Play);
            self.begin_prepare();
            return;
        }
        if let Some(decoder) = self.decoder.as_mut() {
            if let Err(err) = decoder.seek_to(Duration::ZERO) {
                warn!(error = %err, "Seek before play failed");
            }
        }
        self.start_playback();
    }

    /// Starts from the current position. Starting twice is a no-op.
    fn start_playback(&mut self) {
        if !self.prepared {
            self.defer(PlaybackCommand::Resume);
            self.begin_prepare();
            return;
        }
        let Some(decoder) = self.decoder.as_mut() else {
            return;
        };
        if decoder.is_playing() {
            self.state = BindingState::Playing;
            return;
        }

        match decoder.start() {
            Ok(()) => self.state = BindingState::Playing,
            Err(err) => warn!(error = %err, "Start failed"),
        }
    }

    fn pause(&mut self) {
        if self.source.is_none() {
            debug!(state = ?self.state, "Nothing loaded to pause");
            return;
        }
        let Some(decoder) = self.decoder.as_mut() else {
            return;
        };
        if self.prepared && decoder.is_playing() {
            if let Err(err) = decoder.pause() {
                warn!(error = %err, "Pause failed");
                return;
            }
        }
        self.state = BindingState::Paused;
    }

    fn stop(&mut self) {
        let Ok(intent) = self.alive() else {
            return;
        };
        let Some(decoder) = self.decoder.as_mut() else {
            return;
        };

        if self.prepared || self.preparing {
            if let Err(err) = decoder.stop() {
                warn!(error = %err, "Stop failed");
            }
        }
        if let Err(err) = decoder.reset() {
            warn!(error = %err, "Decoder reset failed");
        }

        intent.set_ready(false);
        self.source = None;
        self.preparing = false;
        self.prepared = false;
        self.state = BindingState::Stopped;
    }

    fn seek_to_beginning(&mut self) {
        if self.source.is_none() || !self.prepared {
            return;
        }
        let Some(decoder) = self.decoder.as_mut() else {
            return;
        };

        let resume_state = self.state;
        self.state = BindingState::SeekingToBeginning;
        if let Err(err) = decoder.seek_to(Duration::ZERO) {
            warn!(error = %err, "Seek to beginning failed");
        }
        self.state = resume_state;
    }

    // ------------------------------------------------------------------
    // Native callbacks
    // ------------------------------------------------------------------

    fn on_completed(&mut self, intent: &PlaybackIntent) {
        let finished = intent.clone();
        self.dispatcher.spawn_in_background(Box::pin(async move {
            finished.raise(PlayerEvent::FinishedPlaying);
        }));

        if !intent.looping() && self.state == BindingState::Playing {
            self.state = BindingState::Ready;
        }
    }

    fn on_video_size(&mut self, intent: &PlaybackIntent, size: VideoSize) {
        if !intent.record_video_size(size) {
            return;
        }
        debug!(width = size.width, height = size.height, "Video size discovered");

        let loaded = intent.clone();
        self.dispatcher.spawn_in_background(Box::pin(async move {
            loaded.raise(PlayerEvent::LoadCompleted);
        }));
    }

    fn on_surface_created(&mut self, intent: &PlaybackIntent, valid: bool) {
        if let (Some(decoder), Some(surface)) = (self.decoder.as_mut(), self.surface.as_ref()) {
            if let Err(err) = decoder.attach_display(surface.handle()) {
                warn!(error = %err, "Attaching display failed");
            }
        }

        if let Some(request) = self.tracker.surface_created(valid) {
            debug!("Replaying load deferred for a surface");
            self.load_source(intent, &request.path);
        }
    }

    fn on_surface_destroyed(&mut self, intent: &PlaybackIntent) {
        intent.set_ready(false);
        if self.preparing {
            debug!("Abandoning prepare for the lost surface");
            self.preparing = false;
        }

        self.tracker.surface_destroyed();
        if let Some(surface) = self.surface.as_mut() {
            surface.release_surface();
        }
        self.tracker.surface_released();

        if self.source.is_none() {
            return;
        }
        if let Some(path) = intent.path().filter(|path| !path.trim().is_empty()) {
            debug!("Surface destroyed; load will replay on the next surface");
            self.tracker.defer(LoadRequest { path });
            self.state = BindingState::Idle;
        }
    }
}

impl BackendBinding for SurfaceBinding {
    type Signal = SurfaceSignal;

    fn kind(&self) -> BackendKind {
        BackendKind::Surface
    }

    fn state(&self) -> BindingState {
        self.state
    }

    fn attach(&mut self) {
        let Ok(intent) = self.alive() else {
            return;
        };

        if let Some(decoder) = self.decoder.as_mut() {
            decoder.set_listener(Some(self.listener.clone()));
        }
        if let Some(surface) = self.surface.as_mut() {
            surface.set_listener(Some(self.listener.clone()));
            let frame = intent.frame();
            if !frame.is_empty() {
                surface.set_frame(frame);
            }
        }

        self.load();
    }

    fn on_intent(&mut self, event: &PlayerEvent) {
        if self.alive().is_err() {
            return;
        }

        match event {
            PlayerEvent::PathChanged => self.load(),
            PlayerEvent::Buffered => self.buffer(),
            PlayerEvent::FrameChanged { frame } => {
                if let Some(surface) = self.surface.as_mut() {
                    surface.set_frame(*frame);
                }
            }
            other => debug!(event = ?other, "Notification not handled by surface binding"),
        }
    }

    fn on_command(&mut self, command: PlaybackCommand) {
        if self.alive().is_err() {
            return;
        }
        self.apply(command);
    }

    fn on_native(&mut self, signal: SurfaceSignal) {
        let Ok(intent) = self.alive() else {
            return;
        };

        match signal {
            SurfaceSignal::Prepared => self.on_prepared(&intent),
            SurfaceSignal::Completed => self.on_completed(&intent),
            SurfaceSignal::VideoSizeChanged(size) => self.on_video_size(&intent, size),
            SurfaceSignal::SurfaceCreated { valid } => self.on_surface_created(&intent, valid),
            SurfaceSignal::SurfaceChanged { width, height } => {
                debug!(width, height, "Surface changed")
            }
            SurfaceSignal::SurfaceDestroyed => self.on_surface_destroyed(&intent),
        }
    }

    fn dispose(&mut self) {
        if self.state == BindingState::Disposed {
            return;
        }

        if let Some(decoder) = self.decoder.as_mut() {
            decoder.set_listener(None);
        }
        if let Some(surface) = self.surface.as_mut() {
            surface.set_listener(None);
        }

        if let Some(mut decoder) = self.decoder.take() {
            if self.prepared || self.preparing {
                if let Err(err) = decoder.stop() {
                    debug!(error = %err, "Stop during dispose failed");
                }
            }
            decoder.release();
        }
        if let Some(mut surface) = self.surface.take() {
            if self.tracker.has_surface() {
                surface.release_surface();
            }
            surface.detach();
        }

        self.intent = None;
        self.pending = None;
        self.source = None;
        self.preparing = false;
        self.prepared = false;
        self.tracker.clear();
        self.state = BindingState::Disposed;
        debug!("Surface binding disposed");
    }
}

impl Drop for SurfaceBinding {
    fn drop(&mut self) {
        self.dispose();
    }
}
