//! Shutdown requests over a channel
//!
//! Components that hit an unrecoverable condition send a request; the
//! process owner (the CLI, or whatever embeds the crate) holds the listener
//! and decides how to stop. Nothing here exits the process.

use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};

/// Why a component asked for shutdown
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShutdownRequest {
    /// Component that raised the request
    pub origin: String,
    /// Human-readable cause
    pub reason: String,
}

/// Sending half, cloned into every component that may request shutdown
#[derive(Debug, Clone)]
pub struct ShutdownNotifier {
    sender: Sender<ShutdownRequest>,
}

impl ShutdownNotifier {
    /// Send a shutdown request.
    ///
    /// Returns false if the listener is gone, in which case nobody is left
    /// to act on it.
    pub fn request(&self, origin: impl Into<String>, reason: impl Into<String>) -> bool {
        self.sender
            .send(ShutdownRequest {
                origin: origin.into(),
                reason: reason.into(),
            })
            .is_ok()
    }
}

/// Receiving half, held by the process owner
#[derive(Debug)]
pub struct ShutdownListener {
    receiver: Receiver<ShutdownRequest>,
}

impl ShutdownListener {
    /// Next pending request, if any, without blocking
    pub fn try_recv(&self) -> Option<ShutdownRequest> {
        match self.receiver.try_recv() {
            Ok(request) => Some(request),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }

    /// All pending requests, oldest first
    pub fn drain(&self) -> Vec<ShutdownRequest> {
        std::iter::from_fn(|| self.try_recv()).collect()
    }
}

/// Create a connected notifier/listener pair
pub fn shutdown_channel() -> (ShutdownNotifier, ShutdownListener) {
    let (sender, receiver) = mpsc::channel();
    (
        ShutdownNotifier { sender },
        ShutdownListener { receiver },
    )
}
