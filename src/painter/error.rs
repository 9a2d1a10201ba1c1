//! Error types for the painter event loop.

use std::sync::mpsc;

/// Error returned by [`EventLoop`](super::EventLoop) and [`LoopHandle`](super::LoopHandle).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoopError {
    /// `start` was called before a texture factory was connected.
    NotConnected,
    /// `start` was called on a loop that already has a worker.
    AlreadyStarted,
    /// The loop has stopped and no longer accepts operations.
    Stopped,
    /// The texture factory failed; the message is the factory's error chain.
    TextureAllocation(String),
    /// The worker thread could not be spawned.
    Spawn(String),
    /// The worker thread panicked outside of operation execution.
    WorkerPanicked,
}

impl std::fmt::Display for LoopError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoopError::NotConnected => write!(f, "no texture factory connected to the event loop"),
            LoopError::AlreadyStarted => write!(f, "event loop already started"),
            LoopError::Stopped => write!(f, "event loop stopped"),
            LoopError::TextureAllocation(msg) => write!(f, "failed to allocate texture: {}", msg),
            LoopError::Spawn(msg) => write!(f, "failed to spawn event loop worker: {}", msg),
            LoopError::WorkerPanicked => write!(f, "event loop worker panicked"),
        }
    }
}

impl std::error::Error for LoopError {}

impl<T> From<mpsc::SendError<T>> for LoopError {
    fn from(_: mpsc::SendError<T>) -> Self {
        LoopError::Stopped
    }
}

impl From<anyhow::Error> for LoopError {
    fn from(err: anyhow::Error) -> Self {
        LoopError::TextureAllocation(format!("{:#}", err))
    }
}
