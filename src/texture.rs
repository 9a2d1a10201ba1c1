// src/texture.rs

//! Render targets and the two contracts around them.
//!
//! - [`Texture`]: what operations draw into.
//! - [`TextureFactory`]: allocates a fresh texture for the loop (at start and
//!   after each presented batch).
//! - [`RenderSink`]: takes ownership of a completed texture.
//!
//! Ownership of a texture moves: factory → loop worker → sink. Nothing shares a
//! texture between threads.

use crate::color::Color;
use crate::geometry::{Point, Rect, Size};
use anyhow::Result;
use std::fmt;

/// A drawable render target.
pub trait Texture: Send + fmt::Debug {
    fn size(&self) -> Size;

    /// Fills `rect` (clipped to the texture) with `color`, replacing what was there.
    fn fill(&mut self, rect: Rect, color: Color);

    /// Reads one pixel back. `None` outside the texture.
    fn pixel(&self, p: Point) -> Option<Color>;

    fn bounds(&self) -> Rect {
        Rect::from_size(self.size())
    }
}

/// Allocates textures for the event loop.
pub trait TextureFactory: Send + Sync {
    /// Size the next texture should have.
    fn size(&self) -> Size;

    fn new_texture(&self, size: Size) -> Result<Box<dyn Texture>>;
}

/// Receives completed textures.
///
/// Called from the loop worker thread, at most once per ready batch.
pub trait RenderSink: Send + Sync {
    fn update(&self, texture: Box<dyn Texture>);
}

const BYTES_PER_PIXEL: usize = 4;

/// CPU framebuffer, RGBA8, row-major.
pub struct SoftwareTexture {
    size: Size,
    framebuffer: Box<[u8]>,
    fills: usize,
}

impl SoftwareTexture {
    /// A fully transparent texture of `size`.
    pub fn new(size: Size) -> Self {
        let framebuffer = vec![0u8; size.area() * BYTES_PER_PIXEL].into_boxed_slice();
        Self {
            size,
            framebuffer,
            fills: 0,
        }
    }

    /// Number of `fill` calls made so far, clipped-away ones included.
    pub fn fill_count(&self) -> usize {
        self.fills
    }

    fn offset(&self, x: usize, y: usize) -> usize {
        (y * self.size.width as usize + x) * BYTES_PER_PIXEL
    }
}

impl fmt::Debug for SoftwareTexture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SoftwareTexture")
            .field("size", &self.size)
            .field("fills", &self.fills)
            .finish_non_exhaustive()
    }
}

impl Texture for SoftwareTexture {
    fn size(&self) -> Size {
        self.size
    }

    fn fill(&mut self, rect: Rect, color: Color) {
        self.fills += 1;
        let clipped = rect.intersect(&self.bounds());
        if clipped.is_empty() {
            return;
        }

        let rgba = color.to_rgba_bytes();
        let (x0, x1) = (clipped.min.x as usize, clipped.max.x as usize);
        for y in clipped.min.y as usize..clipped.max.y as usize {
            let start = self.offset(x0, y);
            let end = self.offset(x1, y);
            for px in self.framebuffer[start..end].chunks_exact_mut(BYTES_PER_PIXEL) {
                px.copy_from_slice(&rgba);
            }
        }
    }

    fn pixel(&self, p: Point) -> Option<Color> {
        if !self.bounds().contains(p) {
            return None;
        }
        let i = self.offset(p.x as usize, p.y as usize);
        let mut bytes = [0u8; BYTES_PER_PIXEL];
        bytes.copy_from_slice(&self.framebuffer[i..i + BYTES_PER_PIXEL]);
        Some(Color::from_rgba_bytes(bytes))
    }
}

/// Factory producing [`SoftwareTexture`]s of a fixed size.
#[derive(Debug, Clone, Copy)]
pub struct SoftwareTextureFactory {
    size: Size,
}

impl SoftwareTextureFactory {
    pub fn new(size: Size) -> Self {
        Self { size }
    }
}

impl TextureFactory for SoftwareTextureFactory {
    fn size(&self) -> Size {
        self.size
    }

    fn new_texture(&self, size: Size) -> Result<Box<dyn Texture>> {
        Ok(Box::new(SoftwareTexture::new(size)))
    }
}
