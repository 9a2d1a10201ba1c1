// src/lib.rs

//! A drawing surface driven by a tiny text command language.
//!
//! Commands arrive as HTTP request bodies, are parsed into operations and
//! queued onto a single-consumer event loop that owns the canvas state and the
//! render target.

pub mod canvas;
pub mod color;
pub mod config;
pub mod display;
pub mod geometry;
pub mod lang;
pub mod painter;
pub mod texture;
