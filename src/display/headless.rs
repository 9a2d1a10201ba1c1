// src/display/headless.rs
//! Headless display: render sink and texture factory without a native window.
//!
//! Presented textures travel over a channel to a dedicated `display` thread,
//! which keeps the most recent frame and counts presentations. The loop worker
//! never waits on the display.

use super::messages::{DisplayEvent, DisplayStatus, MouseButton};
use crate::config::DisplayConfig;
use crate::geometry::{Point, Size};
use crate::painter::op::reposition_all;
use crate::painter::{LoopError, LoopHandle, Operation, UPDATE_OP};
use crate::texture::{RenderSink, SoftwareTexture, Texture, TextureFactory};
use anyhow::{Context, Result};
use log::*;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::{Arc, Condvar, Mutex};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

#[derive(Debug, Default)]
struct Presented {
    frames: u64,
    last: Option<Box<dyn Texture>>,
}

#[derive(Debug, Default)]
struct FrameStore {
    presented: Mutex<Presented>,
    changed: Condvar,
}

pub struct HeadlessDisplay {
    title: String,
    size: Mutex<Size>,
    frame_tx: Mutex<Option<Sender<Box<dyn Texture>>>>,
    store: Arc<FrameStore>,
    thread: Mutex<Option<JoinHandle<()>>>,
}

impl std::fmt::Debug for HeadlessDisplay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HeadlessDisplay")
            .field("title", &self.title)
            .field("frames", &self.frames())
            .finish_non_exhaustive()
    }
}

impl HeadlessDisplay {
    /// Creates the display and spawns its presentation thread.
    pub fn new(config: &DisplayConfig, size: Size) -> Result<Arc<Self>> {
        info!(
            "HeadlessDisplay: Creating '{}' ({}x{})",
            config.title, size.width, size.height
        );

        let (frame_tx, frame_rx) = channel();
        let store = Arc::new(FrameStore::default());
        let thread_store = store.clone();

        let thread = thread::Builder::new()
            .name("display".to_string())
            .spawn(move || Self::run(frame_rx, thread_store))
            .context("Failed to spawn display thread")?;

        Ok(Arc::new(HeadlessDisplay {
            title: config.title.clone(),
            size: Mutex::new(size),
            frame_tx: Mutex::new(Some(frame_tx)),
            store,
            thread: Mutex::new(Some(thread)),
        }))
    }

    fn run(frame_rx: Receiver<Box<dyn Texture>>, store: Arc<FrameStore>) {
        info!("HeadlessDisplay: Thread started");
        for texture in frame_rx {
            let mut presented = lock(&store.presented);
            presented.frames += 1;
            trace!(
                "HeadlessDisplay: Frame {} ({:?})",
                presented.frames,
                texture.size()
            );
            presented.last = Some(texture);
            store.changed.notify_all();
        }
        info!("HeadlessDisplay: Thread stopped");
    }

    /// Number of textures presented so far.
    pub fn frames(&self) -> u64 {
        lock(&self.store.presented).frames
    }

    /// Reads a pixel from the most recently presented frame.
    pub fn last_frame_pixel(&self, p: Point) -> Option<crate::color::Color> {
        lock(&self.store.presented)
            .last
            .as_ref()
            .and_then(|t| t.pixel(p))
    }

    /// Blocks until at least `count` frames were presented or `timeout` passes.
    pub fn wait_for_frames(&self, count: u64, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        let mut presented = lock(&self.store.presented);
        while presented.frames < count {
            let now = Instant::now();
            if now >= deadline {
                return false;
            }
            presented = match self.store.changed.wait_timeout(presented, deadline - now) {
                Ok((guard, _)) => guard,
                Err(poisoned) => poisoned.into_inner().0,
            };
        }
        true
    }

    /// Reacts to a window event. Pointer input is turned into operations on `handle`.
    pub fn handle_event(
        &self,
        event: DisplayEvent,
        handle: &LoopHandle,
    ) -> Result<DisplayStatus, LoopError> {
        match event {
            DisplayEvent::Resize {
                width_px,
                height_px,
            } => {
                info!("HeadlessDisplay: Resize to {}x{}", width_px, height_px);
                *lock(&self.size) = Size::new(width_px, height_px);
            }
            DisplayEvent::PointerPress {
                button: MouseButton::Right,
                x,
                y,
            } => {
                debug!("HeadlessDisplay: Reposition figures to ({}, {})", x, y);
                handle.post(Operation::list([
                    reposition_all(Point::new(x, y)),
                    UPDATE_OP,
                ]))?;
            }
            DisplayEvent::PointerPress { button, .. } => {
                trace!("HeadlessDisplay: Ignoring {:?} press", button);
            }
            DisplayEvent::CloseRequested => {
                info!("HeadlessDisplay: Close requested");
                return Ok(DisplayStatus::Shutdown);
            }
        }
        Ok(DisplayStatus::Running)
    }

    /// Stops accepting frames and joins the display thread.
    pub fn shutdown(&self) {
        lock(&self.frame_tx).take();
        if let Some(handle) = lock(&self.thread).take() {
            if let Err(e) = handle.join() {
                error!("HeadlessDisplay: Thread panicked: {:?}", e);
            }
        }
    }
}

impl RenderSink for HeadlessDisplay {
    fn update(&self, texture: Box<dyn Texture>) {
        let tx = lock(&self.frame_tx);
        match tx.as_ref() {
            Some(tx) => {
                if tx.send(texture).is_err() {
                    warn!("HeadlessDisplay: Display thread gone, dropping frame");
                }
            }
            None => warn!("HeadlessDisplay: Frame after shutdown dropped"),
        }
    }
}

impl TextureFactory for HeadlessDisplay {
    fn size(&self) -> Size {
        *lock(&self.size)
    }

    fn new_texture(&self, size: Size) -> Result<Box<dyn Texture>> {
        Ok(Box::new(SoftwareTexture::new(size)))
    }
}

impl Drop for HeadlessDisplay {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn lock<T>(m: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
