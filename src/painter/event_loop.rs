// src/painter/event_loop.rs

//! EventLoop - single worker executing posted operations in order.
//!
//! Threading model:
//! - Any number of producers post through cloned [`LoopHandle`]s (unbounded
//!   mpsc channel, never blocks on execution).
//! - One worker thread owns the canvas state and the current texture.
//! - The worker blocks for the first pending entry, then drains everything else
//!   already queued into a batch. Operations posted while the batch runs
//!   (including recursive posts from inside an operation) land in a later batch.
//! - If any operation in a batch reported ready, the texture moves to the
//!   [`RenderSink`] once the batch is done and a fresh one is allocated.
//!
//! Lifecycle: `Uninitialized → Running → Stopping → Stopped`.

use super::error::LoopError;
use super::op::Operation;
use crate::canvas::CanvasState;
use crate::texture::{RenderSink, Texture, TextureFactory};
use log::*;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

/// Observable lifecycle of an [`EventLoop`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum LoopState {
    /// Created; posts are queued until `start`.
    Uninitialized = 0,
    /// Worker is executing operations.
    Running = 1,
    /// Stop requested; worker drains what is queued and exits.
    Stopping = 2,
    /// Worker gone. Posts are rejected.
    Stopped = 3,
}

impl LoopState {
    fn from_u8(v: u8) -> Self {
        match v {
            0 => LoopState::Uninitialized,
            1 => LoopState::Running,
            2 => LoopState::Stopping,
            _ => LoopState::Stopped,
        }
    }
}

impl std::fmt::Display for LoopState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoopState::Uninitialized => write!(f, "Uninitialized"),
            LoopState::Running => write!(f, "Running"),
            LoopState::Stopping => write!(f, "Stopping"),
            LoopState::Stopped => write!(f, "Stopped"),
        }
    }
}

/// Queue entry. `Stop` is ordered behind everything posted before it.
enum Envelope {
    Op(Operation),
    Stop,
}

#[derive(Debug)]
struct Shared {
    state: AtomicU8,
}

impl Shared {
    fn state(&self) -> LoopState {
        LoopState::from_u8(self.state.load(Ordering::Acquire))
    }

    fn set_state(&self, state: LoopState) {
        self.state.store(state as u8, Ordering::Release);
    }

    fn transition(&self, from: LoopState, to: LoopState) -> bool {
        self.state
            .compare_exchange(from as u8, to as u8, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }
}

/// Cloneable posting side of an [`EventLoop`]. Safe to use from any thread,
/// including from inside an executing operation.
#[derive(Debug, Clone)]
pub struct LoopHandle {
    tx: Sender<Envelope>,
    shared: Arc<Shared>,
}

impl LoopHandle {
    /// Appends `op` to the tail of the queue and returns immediately.
    ///
    /// # Errors
    /// `LoopError::Stopped` once the loop has stopped.
    pub fn post(&self, op: Operation) -> Result<(), LoopError> {
        if self.shared.state() == LoopState::Stopped {
            return Err(LoopError::Stopped);
        }
        trace!("LoopHandle: post '{}'", op.name());
        self.tx.send(Envelope::Op(op))?;
        Ok(())
    }

    /// Posts every operation in order. Returns how many were posted.
    pub fn post_all(&self, ops: impl IntoIterator<Item = Operation>) -> Result<usize, LoopError> {
        let mut posted = 0;
        for op in ops {
            self.post(op)?;
            posted += 1;
        }
        Ok(posted)
    }

    pub fn state(&self) -> LoopState {
        self.shared.state()
    }
}

/// Owner of the worker thread.
pub struct EventLoop {
    handle: LoopHandle,
    rx: Option<Receiver<Envelope>>,
    sink: Arc<dyn RenderSink>,
    factory: Option<Arc<dyn TextureFactory>>,
    worker: Option<JoinHandle<Result<(), LoopError>>>,
}

impl std::fmt::Debug for EventLoop {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventLoop")
            .field("state", &self.state())
            .field("connected", &self.factory.is_some())
            .finish_non_exhaustive()
    }
}

impl EventLoop {
    /// Creates a loop presenting ready textures to `sink`. Nothing runs until `start`.
    pub fn new(sink: Arc<dyn RenderSink>) -> Self {
        let (tx, rx) = mpsc::channel();
        let shared = Arc::new(Shared {
            state: AtomicU8::new(LoopState::Uninitialized as u8),
        });

        EventLoop {
            handle: LoopHandle { tx, shared },
            rx: Some(rx),
            sink,
            factory: None,
            worker: None,
        }
    }

    /// Binds the factory used for the initial texture and after each ready batch.
    pub fn connect(&mut self, factory: Arc<dyn TextureFactory>) {
        self.factory = Some(factory);
    }

    /// Allocates the first texture and spawns the worker.
    ///
    /// # Errors
    /// - `NotConnected` if no factory was connected.
    /// - `AlreadyStarted` on a second call.
    /// - `Stopped` if the loop has already been stopped.
    /// - `TextureAllocation` if the factory fails; the loop stays startable.
    pub fn start(&mut self) -> Result<(), LoopError> {
        match self.state() {
            LoopState::Uninitialized => {}
            LoopState::Stopped => return Err(LoopError::Stopped),
            LoopState::Running | LoopState::Stopping => return Err(LoopError::AlreadyStarted),
        }
        let factory = self.factory.clone().ok_or(LoopError::NotConnected)?;
        let texture = factory.new_texture(factory.size())?;
        let rx = self.rx.take().ok_or(LoopError::AlreadyStarted)?;

        info!("EventLoop: Starting worker with {:?} texture", texture.size());
        let shared = self.handle.shared.clone();
        let sink = self.sink.clone();
        shared.set_state(LoopState::Running);

        let spawned = thread::Builder::new()
            .name("painter-loop".to_string())
            .spawn(move || {
                let result = Worker {
                    rx,
                    factory,
                    sink,
                    texture: Some(texture),
                    state: CanvasState::new(),
                }
                .run();
                shared.set_state(LoopState::Stopped);
                if let Err(e) = &result {
                    error!("EventLoop: Worker exited with error: {}", e);
                }
                info!("EventLoop: Worker stopped");
                result
            });

        match spawned {
            Ok(handle) => {
                self.worker = Some(handle);
                Ok(())
            }
            Err(e) => {
                error!("EventLoop: Failed to spawn worker thread: {}", e);
                self.handle.shared.set_state(LoopState::Stopped);
                Err(LoopError::Spawn(e.to_string()))
            }
        }
    }

    /// `connect` followed by `start`.
    pub fn start_with(&mut self, factory: Arc<dyn TextureFactory>) -> Result<(), LoopError> {
        self.connect(factory);
        self.start()
    }

    /// See [`LoopHandle::post`].
    pub fn post(&self, op: Operation) -> Result<(), LoopError> {
        self.handle.post(op)
    }

    /// A cloneable handle for producers.
    pub fn handle(&self) -> LoopHandle {
        self.handle.clone()
    }

    pub fn state(&self) -> LoopState {
        self.handle.state()
    }

    /// Requests termination and blocks until the worker has drained the queue
    /// and exited.
    ///
    /// Everything posted before this call runs, and so does everything those
    /// operations post in turn. Calling it again after the loop stopped returns
    /// `Ok(())` immediately.
    ///
    /// # Errors
    /// The worker's terminal error, if it failed.
    pub fn stop_and_wait(&mut self) -> Result<(), LoopError> {
        let Some(worker) = self.worker.take() else {
            if self.state() != LoopState::Stopped {
                debug!("EventLoop: Stopped before start, dropping queued operations");
                self.rx = None;
                self.handle.shared.set_state(LoopState::Stopped);
            }
            return Ok(());
        };

        if self
            .handle
            .shared
            .transition(LoopState::Running, LoopState::Stopping)
        {
            info!("EventLoop: Stop requested, draining queue");
        }
        // Fails only if the worker already exited on its own.
        let _ = self.handle.tx.send(Envelope::Stop);

        let result = match worker.join() {
            Ok(result) => result,
            Err(payload) => {
                error!(
                    "EventLoop: Worker thread panicked: {}",
                    panic_message(payload.as_ref())
                );
                Err(LoopError::WorkerPanicked)
            }
        };
        self.handle.shared.set_state(LoopState::Stopped);
        result
    }
}

impl Drop for EventLoop {
    fn drop(&mut self) {
        if self.worker.is_some() {
            debug!("EventLoop dropped while running");
            if let Err(e) = self.stop_and_wait() {
                error!("EventLoop: Error while stopping on drop: {}", e);
            }
        }
    }
}

/// State owned by the worker thread.
struct Worker {
    rx: Receiver<Envelope>,
    factory: Arc<dyn TextureFactory>,
    sink: Arc<dyn RenderSink>,
    /// `None` only between a handoff and the next successful allocation.
    texture: Option<Box<dyn Texture>>,
    state: CanvasState,
}

impl Worker {
    fn run(mut self) -> Result<(), LoopError> {
        let mut batch = Vec::new();
        let mut stopping = false;

        loop {
            let first = if stopping {
                match self.rx.try_recv() {
                    Ok(envelope) => envelope,
                    Err(_) => {
                        debug!("EventLoop: Queue drained after stop");
                        return Ok(());
                    }
                }
            } else {
                match self.rx.recv() {
                    Ok(envelope) => envelope,
                    Err(_) => {
                        info!("EventLoop: All handles dropped, shutting down");
                        return Ok(());
                    }
                }
            };

            batch.push(first);
            loop {
                match self.rx.try_recv() {
                    Ok(envelope) => batch.push(envelope),
                    Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
                }
            }
            trace!("EventLoop: Batch of {} entries", batch.len());

            let mut ready = false;
            for envelope in batch.drain(..) {
                match envelope {
                    Envelope::Op(op) => ready |= self.execute(op),
                    Envelope::Stop => stopping = true,
                }
            }

            if ready {
                self.present()?;
            }
        }
    }

    /// Runs one operation. A panic is logged and counts as not ready.
    fn execute(&mut self, op: Operation) -> bool {
        let name = op.name().to_owned();
        let Some(texture) = self.texture.as_deref_mut() else {
            warn!("EventLoop: No texture for '{}', skipping", name);
            return false;
        };
        let state = &mut self.state;

        match panic::catch_unwind(AssertUnwindSafe(|| op.execute(texture, state))) {
            Ok(ready) => ready,
            Err(payload) => {
                error!(
                    "EventLoop: Operation '{}' panicked, skipping: {}",
                    name,
                    panic_message(payload.as_ref())
                );
                false
            }
        }
    }

    /// Hands the texture to the sink and allocates the next one.
    fn present(&mut self) -> Result<(), LoopError> {
        if let Some(done) = self.texture.take() {
            debug!("EventLoop: Presenting {:?} texture", done.size());
            self.sink.update(done);
        }
        self.texture = Some(self.factory.new_texture(self.factory.size())?);
        Ok(())
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "non-string panic payload"
    }
}
