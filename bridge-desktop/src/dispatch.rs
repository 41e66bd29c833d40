//! UI-affine dispatcher backed by Tokio runtimes.

use bridge_traits::{
    dispatch::{DispatchTask, UiDispatcher},
    error::{BridgeError, Result},
};
use std::thread;
use tokio::runtime::{Builder, Handle, Runtime};
use tokio::sync::oneshot;
use tracing::{debug, warn};

const UI_THREAD_NAME: &str = "mvb-ui";

/// Desktop [`UiDispatcher`].
///
/// The UI-affine context is a dedicated thread driving a current-thread Tokio
/// runtime, so every task spawned on it is polled on that one thread in
/// submission order. Background work goes to a multi-threaded runtime: the
/// ambient one if the dispatcher is created inside a Tokio context, otherwise a
/// runtime owned by the dispatcher.
pub struct TokioUiDispatcher {
    ui: Handle,
    background: Handle,
    ui_thread: Option<thread::JoinHandle<()>>,
    shutdown: Option<oneshot::Sender<()>>,
    owned_background: Option<Runtime>,
}

impl TokioUiDispatcher {
    /// Start a dedicated UI thread.
    pub fn new() -> Result<Self> {
        let ui_runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| BridgeError::NotAvailable(format!("UI runtime: {}", e)))?;
        let ui = ui_runtime.handle().clone();

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let ui_thread = thread::Builder::new()
            .name(UI_THREAD_NAME.to_string())
            .spawn(move || {
                // Driving the runtime is what makes spawned UI tasks progress.
                ui_runtime.block_on(async {
                    shutdown_rx.await.ok();
                });
                debug!("UI dispatcher thread exiting");
            })?;

        let (background, owned_background) = match Handle::try_current() {
            Ok(handle) => (handle, None),
            Err(_) => {
                let runtime = Builder::new_multi_thread()
                    .thread_name("mvb-background")
                    .enable_all()
                    .build()
                    .map_err(|e| {
                        BridgeError::NotAvailable(format!("Background runtime: {}", e))
                    })?;
                (runtime.handle().clone(), Some(runtime))
            }
        };

        Ok(Self {
            ui,
            background,
            ui_thread: Some(ui_thread),
            shutdown: Some(shutdown_tx),
            owned_background,
        })
    }

    /// Reuse runtimes the host already drives. `ui` must belong to a runtime
    /// whose tasks are polled on a single thread.
    pub fn with_handles(ui: Handle, background: Handle) -> Self {
        Self {
            ui,
            background,
            ui_thread: None,
            shutdown: None,
            owned_background: None,
        }
    }
}

impl UiDispatcher for TokioUiDispatcher {
    fn spawn_on_ui(&self, task: DispatchTask) {
        self.ui.spawn(task);
    }

    fn spawn_in_background(&self, task: DispatchTask) {
        self.background.spawn(task);
    }
}

impl Drop for TokioUiDispatcher {
    fn drop(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            shutdown.send(()).ok();
        }

        if let Some(handle) = self.ui_thread.take() {
            if handle.thread().id() == thread::current().id() {
                warn!("UI dispatcher dropped on its own thread; not joining");
            } else if handle.join().is_err() {
                warn!("UI dispatcher thread panicked");
            }
        }

        if let Some(runtime) = self.owned_background.take() {
            runtime.shutdown_background();
        }
    }
}

impl std::fmt::Debug for TokioUiDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokioUiDispatcher")
            .field("dedicated_ui_thread", &self.ui_thread.is_some())
            .field("owns_background", &self.owned_background.is_some())
            .finish()
    }
}
