//! Native callback channel.
//!
//! Native players report readiness, completion and geometry from threads they
//! own. A [`SignalSink`] is handed to the native side at construction; every
//! signal it emits is queued for the binding, which drains the queue on the
//! UI-affine context. Native code never touches binding state directly.

use tokio::sync::mpsc;

/// Sending half of a native signal queue.
///
/// Cloning is cheap; each native object registers its own clone as listener.
pub struct SignalSink<S> {
    sender: mpsc::UnboundedSender<S>,
}

impl<S> SignalSink<S> {
    /// Creates a sink together with the receiver the binding drains.
    pub fn channel() -> (SignalSink<S>, mpsc::UnboundedReceiver<S>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (SignalSink { sender }, receiver)
    }

    /// Queues a signal. Returns `false` once the binding is gone; native code
    /// may ignore the result since a torn-down binding has nothing to update.
    pub fn emit(&self, signal: S) -> bool {
        self.sender.send(signal).is_ok()
    }

    /// `true` once the receiving binding has been dropped.
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}

impl<S> Clone for SignalSink<S> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

impl<S> std::fmt::Debug for SignalSink<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignalSink")
            .field("closed", &self.is_closed())
            .finish()
    }
}
