//! # Binding Driver
//!
//! Attaches a [`PlaybackIntent`] to a native backend and keeps the resulting
//! binding running on the UI-affine context.
//!
//! One driver task per binding multiplexes four inputs:
//!
//! 1. dispose requests from the [`BindingHandle`]
//! 2. playback commands relayed through the command channel
//! 3. native signals from the backend's [`SignalSink`]
//! 4. host notifications from the intent
//!
//! Host notifications arrive on a lossless per-binding feed from the intent.
//! Command notifications are re-raised on the command channel and consumed
//! before the next notification, so a binding sees commands and path changes
//! in the order the host issued them. The binding's own notifications
//! (`FinishedPlaying`, `LoadCompleted`) never reach the feed.
//!
//! Every entry point into the binding runs under a panic guard: a panicking
//! native call is logged and the driver keeps going.

use crate::binding::{AssetBinding, BackendBinding, BackendKind, SurfaceBinding};
use crate::command::{CommandChannel, PlaybackCommand};
use crate::error::{PlaybackError, Result};
use crate::intent::PlaybackIntent;
use bridge_traits::{
    AssetPlayerBackend, AssetSignal, DispatchTask, RenderSurface, SignalSink, SurfaceDecoder,
    SurfaceSignal,
};
use core_runtime::config::PlayerConfig;
use core_runtime::events::PlayerEvent;
use parking_lot::Mutex;
use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, info, info_span, Instrument};
use uuid::Uuid;

/// Native objects handed over by the host when a player view is created.
pub enum NativeBackend {
    Surface {
        decoder: Box<dyn SurfaceDecoder>,
        surface: Box<dyn RenderSurface>,
    },
    Asset(Box<dyn AssetPlayerBackend>),
}

impl NativeBackend {
    pub fn kind(&self) -> BackendKind {
        match self {
            NativeBackend::Surface { .. } => BackendKind::Surface,
            NativeBackend::Asset(_) => BackendKind::Asset,
        }
    }
}

impl fmt::Debug for NativeBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("NativeBackend").field(&self.kind()).finish()
    }
}

/// Platform the crate was compiled for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostPlatform {
    Android,
    Ios,
    Desktop,
}

impl HostPlatform {
    pub fn current() -> Self {
        if cfg!(target_os = "android") {
            HostPlatform::Android
        } else if cfg!(target_os = "ios") {
            HostPlatform::Ios
        } else {
            HostPlatform::Desktop
        }
    }

    /// Backend family the platform's native player provides. Desktop hosts
    /// bring their own backend.
    pub fn native_backend_kind(&self) -> Option<BackendKind> {
        match self {
            HostPlatform::Android => Some(BackendKind::Surface),
            HostPlatform::Ios => Some(BackendKind::Asset),
            HostPlatform::Desktop => None,
        }
    }
}

/// Listener the native side emits callbacks through.
#[derive(Debug, Clone)]
pub enum NativeSignals {
    Surface(SignalSink<SurfaceSignal>),
    Asset(SignalSink<AssetSignal>),
}

type DisposeAck = oneshot::Sender<()>;

/// Host-side handle to a running binding.
///
/// Dropping the handle disposes the binding without waiting for it.
pub struct BindingHandle {
    id: Uuid,
    kind: BackendKind,
    signals: NativeSignals,
    dispose_tx: Mutex<Option<oneshot::Sender<DisposeAck>>>,
}

impl BindingHandle {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn kind(&self) -> BackendKind {
        self.kind
    }

    pub fn signals(&self) -> &NativeSignals {
        &self.signals
    }

    pub fn surface_signals(&self) -> Option<SignalSink<SurfaceSignal>> {
        match &self.signals {
            NativeSignals::Surface(sink) => Some(sink.clone()),
            NativeSignals::Asset(_) => None,
        }
    }

    pub fn asset_signals(&self) -> Option<SignalSink<AssetSignal>> {
        match &self.signals {
            NativeSignals::Asset(sink) => Some(sink.clone()),
            NativeSignals::Surface(_) => None,
        }
    }

    /// `true` once disposal was requested or the driver stopped on its own.
    pub fn is_disposed(&self) -> bool {
        self.dispose_tx
            .lock()
            .as_ref()
            .map_or(true, |request| request.is_closed())
    }

    /// Disposes the binding and waits until its native resources are
    /// released. Calling it again is a no-op.
    ///
    /// # Errors
    ///
    /// [`PlaybackError::ChannelClosed`] if the driver task was dropped by the
    /// dispatcher before it could finish.
    pub async fn dispose(&self) -> Result<()> {
        let Some(request) = self.dispose_tx.lock().take() else {
            return Ok(());
        };

        let (ack_tx, ack_rx) = oneshot::channel();
        if request.send(ack_tx).is_err() {
            debug!(binding_id = %self.id, "Binding already stopped");
            return Ok(());
        }
        ack_rx.await.map_err(|_| PlaybackError::ChannelClosed)
    }
}

impl fmt::Debug for BindingHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BindingHandle")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("disposed", &self.is_disposed())
            .finish()
    }
}

/// Attaches `intent` to `backend` and starts the driver on the UI context.
///
/// The intent subscription is taken before this returns, so notifications
/// raised right after `attach` are not lost. The binding performs its initial
/// load on the UI context if the intent already has a path.
///
/// # Errors
///
/// [`PlaybackError::Disposed`] if the intent was already disposed.
pub fn attach(
    intent: &PlaybackIntent,
    backend: NativeBackend,
    config: &PlayerConfig,
) -> Result<BindingHandle> {
    if intent.is_disposed() {
        return Err(PlaybackError::Disposed);
    }

    let id = Uuid::new_v4();
    let kind = backend.kind();
    let (dispose_tx, dispose_rx) = oneshot::channel();
    let commands = CommandChannel::new();
    let command_rx = commands.subscribe();
    let events = intent.subscribe_binding();
    let span = info_span!("binding", binding_id = %id, backend = ?kind);

    let (signals, task): (NativeSignals, DispatchTask) = match backend {
        NativeBackend::Surface { decoder, surface } => {
            let (sink, signal_rx) = SignalSink::channel();
            let binding =
                SurfaceBinding::new(intent.clone(), decoder, surface, config, sink.clone());
            let inputs = DriverInputs {
                dispose_rx,
                commands,
                command_rx,
                signal_rx,
                events,
            };
            let task: DispatchTask = Box::pin(drive(binding, inputs).instrument(span));
            (NativeSignals::Surface(sink), task)
        }
        NativeBackend::Asset(backend) => {
            let (sink, signal_rx) = SignalSink::channel();
            let binding = AssetBinding::new(intent.clone(), backend, config, sink.clone());
            let inputs = DriverInputs {
                dispose_rx,
                commands,
                command_rx,
                signal_rx,
                events,
            };
            let task: DispatchTask = Box::pin(drive(binding, inputs).instrument(span));
            (NativeSignals::Asset(sink), task)
        }
    };

    config.ui_dispatcher.spawn_on_ui(task);
    info!(binding_id = %id, backend = ?kind, "Binding attached");

    Ok(BindingHandle {
        id,
        kind,
        signals,
        dispose_tx: Mutex::new(Some(dispose_tx)),
    })
}

struct DriverInputs<S> {
    dispose_rx: oneshot::Receiver<DisposeAck>,
    commands: CommandChannel,
    command_rx: mpsc::UnboundedReceiver<PlaybackCommand>,
    signal_rx: mpsc::UnboundedReceiver<S>,
    events: mpsc::UnboundedReceiver<PlayerEvent>,
}

async fn drive<B>(mut binding: B, mut inputs: DriverInputs<B::Signal>)
where
    B: BackendBinding + 'static,
{
    guarded("attach", || binding.attach());

    let ack = loop {
        tokio::select! {
            biased;

            request = &mut inputs.dispose_rx => {
                // An error means the handle was dropped; dispose all the same.
                break request.ok();
            }
            Some(command) = inputs.command_rx.recv() => {
                guarded("command", || binding.on_command(command));
            }
            Some(signal) = inputs.signal_rx.recv() => {
                guarded("native signal", || binding.on_native(signal));
            }
            event = inputs.events.recv() => match event {
                Some(event) => match PlaybackCommand::from_event(&event) {
                    Some(command) => inputs.commands.raise(command),
                    None => guarded("intent notification", || binding.on_intent(&event)),
                },
                None => {
                    debug!("Intent disposed");
                    break None;
                }
            },
        }
    };

    guarded("dispose", || binding.dispose());
    info!(state = ?binding.state(), "Binding stopped");

    if let Some(ack) = ack {
        ack.send(()).ok();
    }
}

fn guarded(operation: &'static str, f: impl FnOnce()) {
    if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(f)) {
        error!(
            operation,
            panic = %panic_message(payload.as_ref()),
            "Binding entry point panicked"
        );
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
