//! Asset binding behavior against a recording asset player.

mod support;

use bridge_traits::{AssetSignal, ItemStatus, PlayerMode, Rect, SignalSink, VideoGravity, VideoSize};
use core_playback::binding::{AssetBinding, BackendBinding, BindingState};
use core_playback::{PlaybackCommand, PlaybackIntent};
use core_runtime::events::{EventOrigin, EventStream, PlayerEvent};
use std::time::Duration;
use support::{drain, immediate_config, AssetCall, FakeAssetPlayer};
use tokio::sync::mpsc;

const LOCAL_CLIP: &str = "/media/clips/intro.mp4";
const LOCAL_URI: &str = "file:///media/clips/intro.mp4";
const REMOTE_CLIP: &str = "https://cdn.example.com/live/intro.m3u8";

struct Harness {
    intent: PlaybackIntent,
    player: FakeAssetPlayer,
    binding: AssetBinding,
    reported: EventStream,
    _signals: mpsc::UnboundedReceiver<AssetSignal>,
}

impl Harness {
    fn new() -> Self {
        Self::build(PlaybackIntent::default(), FakeAssetPlayer::new())
    }

    fn with_intent(intent: PlaybackIntent) -> Self {
        Self::build(intent, FakeAssetPlayer::new())
    }

    fn build(intent: PlaybackIntent, player: FakeAssetPlayer) -> Self {
        let config = immediate_config();
        let (sink, signals) = SignalSink::channel();
        let reported = intent
            .subscribe()
            .filter(|event| event.origin() == EventOrigin::Binding);

        let mut binding = AssetBinding::new(intent.clone(), player.boxed(), &config, sink);
        binding.attach();

        Self {
            intent,
            player,
            binding,
            reported,
            _signals: signals,
        }
    }

    fn set_path(&mut self, path: &str) {
        self.intent.set_path(path);
        self.binding.on_intent(&PlayerEvent::PathChanged);
    }

    fn command(&mut self, command: PlaybackCommand) {
        self.binding.on_command(command);
    }

    fn signal(&mut self, signal: AssetSignal) {
        self.binding.on_native(signal);
    }

    fn playing_local(&mut self) {
        self.set_path(LOCAL_CLIP);
        self.command(PlaybackCommand::Play);
        assert_eq!(self.binding.state(), BindingState::Playing);
    }
}

// ============================================================================
// Loading and readiness
// ============================================================================

#[test]
fn test_local_source_is_ready_immediately() {
    let mut h = Harness::new();

    h.set_path(LOCAL_CLIP);

    assert!(h.intent.is_ready());
    assert_eq!(h.binding.state(), BindingState::Ready);
    assert_eq!(h.binding.player_mode(), Some(PlayerMode::Single));
    assert_eq!(
        h.player.calls(),
        vec![
            AssetCall::SetListener(true),
            AssetCall::OpenAsset(LOCAL_URI.to_string()),
            AssetCall::CreatePlayer(
                PlayerMode::Single,
                VideoGravity::ResizeAspectFill,
                Rect::default()
            ),
        ]
    );
}

#[test]
fn test_natural_size_reports_load_completed_once() {
    let mut h = Harness::new();

    h.set_path(LOCAL_CLIP);

    assert_eq!(h.intent.video_size(), VideoSize::new(1920, 1080));
    assert_eq!(drain(&mut h.reported), vec![PlayerEvent::LoadCompleted]);
}

#[test]
fn test_asset_without_video_track_keeps_size_unknown() {
    let mut h = Harness::build(
        PlaybackIntent::default(),
        FakeAssetPlayer::with_natural_size(None),
    );

    h.set_path(LOCAL_CLIP);

    assert_eq!(h.intent.video_size(), VideoSize::ZERO);
    assert!(drain(&mut h.reported).is_empty());
    assert!(h.intent.is_ready());
}

#[test]
fn test_layer_uses_frame_bounds() {
    let mut h = Harness::new();
    h.intent.set_frame(Rect::new(10.0, 20.0, 320.0, 180.0));

    h.set_path(LOCAL_CLIP);

    assert!(h.player.calls().contains(&AssetCall::CreatePlayer(
        PlayerMode::Single,
        VideoGravity::ResizeAspectFill,
        Rect::new(0.0, 0.0, 320.0, 180.0)
    )));

    let frame = Rect::new(0.0, 64.0, 640.0, 360.0);
    h.intent.set_frame(frame);
    h.binding.on_intent(&PlayerEvent::FrameChanged { frame });

    assert_eq!(
        h.player.count(&AssetCall::SetLayerFrame(frame.bounds())),
        1
    );
}

#[test]
fn test_reload_releases_previous_player() {
    let mut h = Harness::new();
    h.set_path(LOCAL_CLIP);

    h.set_path(REMOTE_CLIP);

    assert_eq!(h.player.count(&AssetCall::ReleasePlayer), 1);
    assert_eq!(h.binding.state(), BindingState::Buffering);
    assert!(!h.intent.is_ready());
}

#[test]
fn test_open_failure_returns_to_idle() {
    let player = FakeAssetPlayer::new();
    player.fail_open();
    let mut h = Harness::build(PlaybackIntent::default(), player);
    h.intent.set_path(REMOTE_CLIP);

    h.command(PlaybackCommand::Play);

    assert_eq!(h.binding.state(), BindingState::Idle);
    assert_eq!(h.binding.pending_command(), None);
    assert_eq!(h.binding.player_mode(), None);
    assert!(!h.intent.is_ready());
}

#[test]
fn test_buffer_with_existing_player_is_noop() {
    let mut h = Harness::new();
    h.set_path(REMOTE_CLIP);
    h.player.clear_calls();

    h.intent.buffer();
    h.binding.on_intent(&PlayerEvent::Buffered);

    assert!(h.player.calls().is_empty());
}

// ============================================================================
// Deferred commands
// ============================================================================

#[test]
fn test_remote_play_deferred_until_ready_to_play() {
    let mut h = Harness::new();
    h.set_path(REMOTE_CLIP);
    assert_eq!(h.binding.state(), BindingState::Buffering);

    h.command(PlaybackCommand::Play);
    assert_eq!(h.binding.pending_command(), Some(PlaybackCommand::Play));
    assert!(!h.player.playing());

    h.signal(AssetSignal::ItemStatusChanged(ItemStatus::ReadyToPlay));

    assert!(h.intent.is_ready());
    assert!(h.player.playing());
    assert_eq!(h.player.position(), Duration::ZERO);
    assert_eq!(h.binding.state(), BindingState::Playing);

    let calls = h.player.calls();
    let tail = &calls[calls.len() - 2..];
    assert_eq!(
        tail,
        &[
            AssetCall::SeekToZero(PlayerMode::Single),
            AssetCall::Play(PlayerMode::Single)
        ]
    );
}

#[test]
fn test_only_latest_deferred_command_applies() {
    let mut h = Harness::new();
    h.set_path(REMOTE_CLIP);

    h.command(PlaybackCommand::Play);
    h.command(PlaybackCommand::Pause);

    h.signal(AssetSignal::ItemStatusChanged(ItemStatus::ReadyToPlay));

    assert_eq!(h.player.count(&AssetCall::Play(PlayerMode::Single)), 0);
    assert_eq!(h.binding.state(), BindingState::Paused);
}

#[test]
fn test_local_auto_play_starts_without_play() {
    let intent = PlaybackIntent::default();
    intent.set_auto_play(true);
    let mut h = Harness::with_intent(intent);

    h.set_path(LOCAL_CLIP);

    assert!(h.player.playing());
    assert_eq!(h.binding.state(), BindingState::Playing);
}

#[test]
fn test_auto_buffer_waits_for_status_then_starts() {
    let intent = PlaybackIntent::default();
    intent.set_auto_buffer(true);
    let mut h = Harness::with_intent(intent);

    h.set_path(LOCAL_CLIP);
    assert_eq!(h.binding.state(), BindingState::Buffering);
    assert!(!h.player.playing());

    h.signal(AssetSignal::ItemStatusChanged(ItemStatus::ReadyToPlay));

    assert!(h.player.playing());
}

// ============================================================================
// Item status
// ============================================================================

#[test]
fn test_failed_item_resets_readiness() {
    let mut h = Harness::new();
    h.set_path(REMOTE_CLIP);
    h.command(PlaybackCommand::Play);

    h.signal(AssetSignal::ItemStatusChanged(ItemStatus::Failed));

    assert!(!h.intent.is_ready());
    assert_eq!(h.binding.state(), BindingState::Idle);
    assert_eq!(h.binding.pending_command(), None);
}

#[test]
fn test_unknown_status_after_ready_buffers_again() {
    let mut h = Harness::new();
    h.set_path(REMOTE_CLIP);
    h.signal(AssetSignal::ItemStatusChanged(ItemStatus::ReadyToPlay));
    assert!(h.intent.is_ready());

    h.signal(AssetSignal::ItemStatusChanged(ItemStatus::Unknown));
    assert!(!h.intent.is_ready());
    assert_eq!(h.binding.state(), BindingState::Buffering);

    h.command(PlaybackCommand::Resume);
    assert_eq!(h.binding.pending_command(), Some(PlaybackCommand::Resume));

    h.signal(AssetSignal::ItemStatusChanged(ItemStatus::ReadyToPlay));
    assert!(h.player.playing());
}

#[test]
fn test_status_flap_keeps_host_pause() {
    let intent = PlaybackIntent::default();
    intent.set_auto_play(true);
    let mut h = Harness::with_intent(intent);
    h.set_path(REMOTE_CLIP);
    h.signal(AssetSignal::ItemStatusChanged(ItemStatus::ReadyToPlay));
    assert!(h.player.playing());
    h.command(PlaybackCommand::Pause);

    h.signal(AssetSignal::ItemStatusChanged(ItemStatus::Unknown));
    h.signal(AssetSignal::ItemStatusChanged(ItemStatus::ReadyToPlay));

    assert!(h.intent.is_ready());
    assert!(!h.player.playing());
    assert_eq!(h.binding.state(), BindingState::Paused);
    assert_eq!(h.player.count(&AssetCall::Play(PlayerMode::Single)), 1);
}

// ============================================================================
// Transport
// ============================================================================

#[test]
fn test_seek_failure_does_not_block_play() {
    let mut h = Harness::new();
    h.player.fail_seek();
    h.set_path(LOCAL_CLIP);
    h.player.clear_calls();

    h.command(PlaybackCommand::Play);

    assert_eq!(
        h.player.calls(),
        vec![
            AssetCall::SeekToZero(PlayerMode::Single),
            AssetCall::Play(PlayerMode::Single)
        ]
    );
    assert!(h.player.playing());
    assert_eq!(h.binding.state(), BindingState::Playing);
}

#[test]
fn test_pause_failure_does_not_block_stop_rewind() {
    let mut h = Harness::new();
    h.playing_local();
    h.player.advance(Duration::from_secs(5));
    h.player.fail_pause();

    h.command(PlaybackCommand::Stop);

    assert_eq!(h.player.count(&AssetCall::SeekToZero(PlayerMode::Single)), 2);
    assert_eq!(h.player.position(), Duration::ZERO);
    assert_eq!(h.binding.state(), BindingState::Stopped);
}

#[test]
fn test_failed_seek_to_beginning_keeps_play_state() {
    let mut h = Harness::new();
    h.playing_local();
    h.player.fail_seek();

    h.command(PlaybackCommand::SeekToBeginning);
    assert_eq!(h.binding.state(), BindingState::Playing);

    h.command(PlaybackCommand::Pause);
    h.command(PlaybackCommand::SeekToBeginning);
    assert_eq!(h.binding.state(), BindingState::Paused);
}

#[test]
fn test_pause_keeps_position_and_resume_continues() {
    let mut h = Harness::new();
    h.playing_local();
    h.player.advance(Duration::from_secs(4));

    h.command(PlaybackCommand::Pause);
    assert_eq!(h.player.position(), Duration::from_secs(4));
    assert_eq!(h.binding.state(), BindingState::Paused);

    h.command(PlaybackCommand::Resume);
    assert!(h.player.playing());
    assert_eq!(h.player.position(), Duration::from_secs(4));
}

#[test]
fn test_stop_then_play_restarts_from_zero() {
    let mut h = Harness::new();
    h.playing_local();
    h.player.advance(Duration::from_secs(5));

    h.command(PlaybackCommand::Stop);
    assert!(!h.player.playing());
    assert_eq!(h.player.position(), Duration::ZERO);
    assert_eq!(h.binding.state(), BindingState::Stopped);

    h.player.clear_calls();
    h.command(PlaybackCommand::Play);

    assert_eq!(
        h.player.calls(),
        vec![
            AssetCall::SeekToZero(PlayerMode::Single),
            AssetCall::Play(PlayerMode::Single)
        ]
    );
    assert_eq!(h.binding.state(), BindingState::Playing);
}

#[test]
fn test_looping_uses_looping_player() {
    let intent = PlaybackIntent::default();
    intent.set_looping(true);
    let mut h = Harness::with_intent(intent);

    h.set_path(REMOTE_CLIP);
    assert_eq!(h.binding.player_mode(), Some(PlayerMode::Looping));
    assert!(h.intent.is_ready());

    h.command(PlaybackCommand::SeekToBeginning);

    assert_eq!(h.player.count(&AssetCall::SeekToZero(PlayerMode::Looping)), 1);
    assert_eq!(h.player.count(&AssetCall::SeekToZero(PlayerMode::Single)), 0);
    assert_eq!(h.binding.state(), BindingState::Ready);
}

#[test]
fn test_looping_change_applies_on_next_load() {
    let mut h = Harness::new();
    h.set_path(LOCAL_CLIP);

    h.intent.set_looping(true);
    h.command(PlaybackCommand::SeekToBeginning);
    assert_eq!(h.player.count(&AssetCall::SeekToZero(PlayerMode::Single)), 1);

    h.set_path(LOCAL_CLIP);
    assert_eq!(h.binding.player_mode(), Some(PlayerMode::Looping));
}

#[test]
fn test_played_to_end_reports_finished() {
    let mut h = Harness::new();
    h.playing_local();
    drain(&mut h.reported);

    h.signal(AssetSignal::PlayedToEnd);

    assert_eq!(drain(&mut h.reported), vec![PlayerEvent::FinishedPlaying]);
    assert_eq!(h.binding.state(), BindingState::Ready);
}

// ============================================================================
// Disposal
// ============================================================================

#[test]
fn test_dispose_is_idempotent() {
    let mut h = Harness::new();
    h.playing_local();

    h.binding.dispose();
    h.binding.dispose();

    assert_eq!(h.binding.state(), BindingState::Disposed);
    assert_eq!(h.player.count(&AssetCall::SetListener(false)), 1);
    assert_eq!(h.player.count(&AssetCall::ReleasePlayer), 1);
    assert_eq!(h.player.count(&AssetCall::ReleaseLayer), 1);
    assert!(!h.player.has_listener());

    let calls_after_dispose = h.player.calls().len();
    h.signal(AssetSignal::PlayedToEnd);
    drop(h.binding);

    assert_eq!(h.player.calls().len(), calls_after_dispose);
    assert!(drain(&mut h.reported).iter().all(|event| *event != PlayerEvent::FinishedPlaying));
}
