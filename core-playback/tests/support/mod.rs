//! Recording fakes for the native backends.
//!
//! Each fake hands out a boxed trait object for the binding while the test
//! keeps a clone that shares the same state, so native calls can be asserted
//! after the binding has taken ownership.

#![allow(dead_code)]

use bridge_desktop::{DesktopPathResolver, TokioUiDispatcher};
use bridge_traits::error::{BridgeError, Result};
use bridge_traits::{
    AssetPlayerBackend, AssetSignal, DispatchTask, PlayerMode, Rect, RenderSurface, ScalingMode,
    SignalSink, SurfaceDecoder, SurfaceHandle, SurfaceSignal, UiDispatcher, VideoGravity,
    VideoSize,
};
use core_runtime::config::PlayerConfig;
use core_runtime::events::{EventStream, PlayerEvent};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;

pub const MEDIA_ROOT: &str = "/media";

// ============================================================================
// Dispatcher and configuration
// ============================================================================

/// Runs every task to completion on the calling thread.
pub struct ImmediateDispatcher;

impl UiDispatcher for ImmediateDispatcher {
    fn spawn_on_ui(&self, task: DispatchTask) {
        futures::executor::block_on(task);
    }

    fn spawn_in_background(&self, task: DispatchTask) {
        futures::executor::block_on(task);
    }
}

pub fn immediate_config() -> PlayerConfig {
    PlayerConfig::builder()
        .ui_dispatcher(Arc::new(ImmediateDispatcher))
        .path_resolver(Arc::new(DesktopPathResolver::with_root(MEDIA_ROOT)))
        .build()
        .unwrap()
}

/// Config whose UI context is the current Tokio runtime. Must be called from
/// inside a runtime.
pub fn tokio_config() -> PlayerConfig {
    let handle = tokio::runtime::Handle::current();
    PlayerConfig::builder()
        .ui_dispatcher(Arc::new(TokioUiDispatcher::with_handles(
            handle.clone(),
            handle,
        )))
        .path_resolver(Arc::new(DesktopPathResolver::with_root(MEDIA_ROOT)))
        .build()
        .unwrap()
}

/// Polls `condition` until it holds, failing the test after two seconds.
pub async fn wait_until(mut condition: impl FnMut() -> bool) {
    let reached = tokio::time::timeout(Duration::from_secs(2), async {
        while !condition() {
            tokio::time::sleep(Duration::from_millis(2)).await;
        }
    })
    .await;
    assert!(reached.is_ok(), "condition not reached in time");
}

/// Drains every event currently queued on `events`.
pub fn drain(events: &mut EventStream) -> Vec<PlayerEvent> {
    let mut seen = Vec::new();
    while let Some(Ok(event)) = events.try_recv() {
        seen.push(event);
    }
    seen
}

// ============================================================================
// Surface-style decoder
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecoderCall {
    SetListener(bool),
    AttachDisplay(SurfaceHandle),
    Reset,
    SetDataSource(String),
    PrepareAsync,
    SetScalingMode(ScalingMode),
    SetLooping(bool),
    Start,
    Pause,
    Stop,
    SeekTo(Duration),
    Release,
}

#[derive(Default)]
struct DecoderState {
    calls: Vec<DecoderCall>,
    listener: Option<SignalSink<SurfaceSignal>>,
    playing: bool,
    position: Duration,
    fail_data_source: bool,
    fail_seek: bool,
    panic_on_start: bool,
}

#[derive(Clone, Default)]
pub struct FakeDecoder {
    state: Arc<Mutex<DecoderState>>,
}

impl FakeDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn boxed(&self) -> Box<dyn SurfaceDecoder> {
        Box::new(self.clone())
    }

    pub fn calls(&self) -> Vec<DecoderCall> {
        self.state.lock().calls.clone()
    }

    pub fn count(&self, call: &DecoderCall) -> usize {
        self.state.lock().calls.iter().filter(|c| *c == call).count()
    }

    pub fn clear_calls(&self) {
        self.state.lock().calls.clear();
    }

    pub fn playing(&self) -> bool {
        self.state.lock().playing
    }

    pub fn position(&self) -> Duration {
        self.state.lock().position
    }

    /// Moves the playhead forward as if the decoder had been playing.
    pub fn advance(&self, by: Duration) {
        let mut state = self.state.lock();
        if state.playing {
            state.position += by;
        }
    }

    pub fn has_listener(&self) -> bool {
        self.state.lock().listener.is_some()
    }

    pub fn fail_data_source(&self) {
        self.state.lock().fail_data_source = true;
    }

    pub fn fail_seek(&self) {
        self.state.lock().fail_seek = true;
    }

    pub fn panic_on_start(&self) {
        self.state.lock().panic_on_start = true;
    }

    fn record(&self, call: DecoderCall) {
        self.state.lock().calls.push(call);
    }
}

impl SurfaceDecoder for FakeDecoder {
    fn set_listener(&mut self, listener: Option<SignalSink<SurfaceSignal>>) {
        self.record(DecoderCall::SetListener(listener.is_some()));
        self.state.lock().listener = listener;
    }

    fn attach_display(&mut self, surface: SurfaceHandle) -> Result<()> {
        self.record(DecoderCall::AttachDisplay(surface));
        Ok(())
    }

    fn reset(&mut self) -> Result<()> {
        self.record(DecoderCall::Reset);
        let mut state = self.state.lock();
        state.playing = false;
        state.position = Duration::ZERO;
        Ok(())
    }

    fn set_data_source(&mut self, uri: &str) -> Result<()> {
        self.record(DecoderCall::SetDataSource(uri.to_string()));
        if self.state.lock().fail_data_source {
            return Err(BridgeError::DataSource(format!("cannot open {}", uri)));
        }
        Ok(())
    }

    fn prepare_async(&mut self) -> Result<()> {
        self.record(DecoderCall::PrepareAsync);
        Ok(())
    }

    fn set_scaling_mode(&mut self, mode: ScalingMode) -> Result<()> {
        self.record(DecoderCall::SetScalingMode(mode));
        Ok(())
    }

    fn set_looping(&mut self, looping: bool) -> Result<()> {
        self.record(DecoderCall::SetLooping(looping));
        Ok(())
    }

    fn start(&mut self) -> Result<()> {
        self.record(DecoderCall::Start);
        if self.state.lock().panic_on_start {
            panic!("decoder crashed on start");
        }
        self.state.lock().playing = true;
        Ok(())
    }

    fn pause(&mut self) -> Result<()> {
        self.record(DecoderCall::Pause);
        self.state.lock().playing = false;
        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        self.record(DecoderCall::Stop);
        self.state.lock().playing = false;
        Ok(())
    }

    fn seek_to(&mut self, position: Duration) -> Result<()> {
        self.record(DecoderCall::SeekTo(position));
        let mut state = self.state.lock();
        if state.fail_seek {
            return Err(BridgeError::InvalidState("seek while busy".to_string()));
        }
        state.position = position;
        Ok(())
    }

    fn is_playing(&self) -> bool {
        self.state.lock().playing
    }

    fn release(&mut self) {
        self.record(DecoderCall::Release);
    }
}

// ============================================================================
// Rendering surface
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceCall {
    SetListener(bool),
    SetFrame(Rect),
    ReleaseSurface,
    Detach,
}

pub const SURFACE_HANDLE: SurfaceHandle = SurfaceHandle(7);

#[derive(Clone, Default)]
pub struct FakeSurface {
    calls: Arc<Mutex<Vec<SurfaceCall>>>,
}

impl FakeSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn boxed(&self) -> Box<dyn RenderSurface> {
        Box::new(self.clone())
    }

    pub fn calls(&self) -> Vec<SurfaceCall> {
        self.calls.lock().clone()
    }

    pub fn count(&self, call: &SurfaceCall) -> usize {
        self.calls.lock().iter().filter(|c| *c == call).count()
    }
}

impl RenderSurface for FakeSurface {
    fn set_listener(&mut self, listener: Option<SignalSink<SurfaceSignal>>) {
        self.calls
            .lock()
            .push(SurfaceCall::SetListener(listener.is_some()));
    }

    fn handle(&self) -> SurfaceHandle {
        SURFACE_HANDLE
    }

    fn set_frame(&mut self, frame: Rect) {
        self.calls.lock().push(SurfaceCall::SetFrame(frame));
    }

    fn release_surface(&mut self) {
        self.calls.lock().push(SurfaceCall::ReleaseSurface);
    }

    fn detach(&mut self) {
        self.calls.lock().push(SurfaceCall::Detach);
    }
}

// ============================================================================
// Asset-style player
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum AssetCall {
    SetListener(bool),
    OpenAsset(String),
    CreatePlayer(PlayerMode, VideoGravity, Rect),
    Play(PlayerMode),
    Pause(PlayerMode),
    SeekToZero(PlayerMode),
    SetLayerFrame(Rect),
    ReleasePlayer,
    ReleaseLayer,
}

struct AssetState {
    calls: Vec<AssetCall>,
    listener: Option<SignalSink<AssetSignal>>,
    natural_size: Option<VideoSize>,
    fail_open: bool,
    fail_seek: bool,
    fail_pause: bool,
    playing: bool,
    position: Duration,
}

#[derive(Clone)]
pub struct FakeAssetPlayer {
    state: Arc<Mutex<AssetState>>,
}

impl FakeAssetPlayer {
    /// A player whose assets report a 1920x1080 video track.
    pub fn new() -> Self {
        Self::with_natural_size(Some(VideoSize::new(1920, 1080)))
    }

    pub fn with_natural_size(natural_size: Option<VideoSize>) -> Self {
        Self {
            state: Arc::new(Mutex::new(AssetState {
                calls: Vec::new(),
                listener: None,
                natural_size,
                fail_open: false,
                fail_seek: false,
                fail_pause: false,
                playing: false,
                position: Duration::ZERO,
            })),
        }
    }

    pub fn boxed(&self) -> Box<dyn AssetPlayerBackend> {
        Box::new(self.clone())
    }

    pub fn calls(&self) -> Vec<AssetCall> {
        self.state.lock().calls.clone()
    }

    pub fn count(&self, call: &AssetCall) -> usize {
        self.state.lock().calls.iter().filter(|c| *c == call).count()
    }

    pub fn clear_calls(&self) {
        self.state.lock().calls.clear();
    }

    pub fn playing(&self) -> bool {
        self.state.lock().playing
    }

    pub fn position(&self) -> Duration {
        self.state.lock().position
    }

    pub fn advance(&self, by: Duration) {
        let mut state = self.state.lock();
        if state.playing {
            state.position += by;
        }
    }

    pub fn has_listener(&self) -> bool {
        self.state.lock().listener.is_some()
    }

    pub fn fail_open(&self) {
        self.state.lock().fail_open = true;
    }

    pub fn fail_seek(&self) {
        self.state.lock().fail_seek = true;
    }

    pub fn fail_pause(&self) {
        self.state.lock().fail_pause = true;
    }

    fn record(&self, call: AssetCall) {
        self.state.lock().calls.push(call);
    }
}

impl AssetPlayerBackend for FakeAssetPlayer {
    fn set_listener(&mut self, listener: Option<SignalSink<AssetSignal>>) {
        self.record(AssetCall::SetListener(listener.is_some()));
        self.state.lock().listener = listener;
    }

    fn open_asset(&mut self, url: &str) -> Result<Option<VideoSize>> {
        self.record(AssetCall::OpenAsset(url.to_string()));
        let state = self.state.lock();
        if state.fail_open {
            return Err(BridgeError::DataSource(format!("cannot open {}", url)));
        }
        Ok(state.natural_size)
    }

    fn create_player(&mut self, mode: PlayerMode, gravity: VideoGravity, frame: Rect) -> Result<()> {
        self.record(AssetCall::CreatePlayer(mode, gravity, frame));
        let mut state = self.state.lock();
        state.playing = false;
        state.position = Duration::ZERO;
        Ok(())
    }

    fn play(&mut self, mode: PlayerMode) -> Result<()> {
        self.record(AssetCall::Play(mode));
        self.state.lock().playing = true;
        Ok(())
    }

    fn pause(&mut self, mode: PlayerMode) -> Result<()> {
        self.record(AssetCall::Pause(mode));
        let mut state = self.state.lock();
        if state.fail_pause {
            return Err(BridgeError::InvalidState("pause rejected".to_string()));
        }
        state.playing = false;
        Ok(())
    }

    fn seek_to_zero(&mut self, mode: PlayerMode) -> Result<()> {
        self.record(AssetCall::SeekToZero(mode));
        let mut state = self.state.lock();
        if state.fail_seek {
            return Err(BridgeError::InvalidState("seek while busy".to_string()));
        }
        state.position = Duration::ZERO;
        Ok(())
    }

    fn set_layer_frame(&mut self, frame: Rect) {
        self.record(AssetCall::SetLayerFrame(frame));
    }

    fn release_player(&mut self) {
        self.record(AssetCall::ReleasePlayer);
        self.state.lock().playing = false;
    }

    fn release_layer(&mut self) {
        self.record(AssetCall::ReleaseLayer);
    }
}
