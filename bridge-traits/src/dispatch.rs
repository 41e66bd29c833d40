//! Cross-context dispatch.
//!
//! Every native media call and every intent mutation that affects backend
//! state happens on one UI-affine context per player. Hosts provide that
//! context (the Android main looper, the iOS main queue, a dedicated desktop
//! thread) through [`UiDispatcher`].

use futures::future::BoxFuture;

/// Unit of work handed to a dispatcher.
pub type DispatchTask = BoxFuture<'static, ()>;

/// Host primitive for running work on the UI-affine context or off it.
///
/// # Contract
///
/// - Tasks passed to [`spawn_on_ui`](UiDispatcher::spawn_on_ui) run one at a
///   time on the same context, and each task is polled only on that context.
///   Order of submission is preserved.
/// - Tasks passed to [`spawn_in_background`](UiDispatcher::spawn_in_background)
///   may run anywhere, concurrently with UI work.
/// - Neither method blocks the caller.
pub trait UiDispatcher: Send + Sync {
    /// Run `task` on the UI-affine context.
    fn spawn_on_ui(&self, task: DispatchTask);

    /// Run `task` off the UI-affine context, for notifications that must not
    /// hold up rendering.
    fn spawn_in_background(&self, task: DispatchTask);
}
