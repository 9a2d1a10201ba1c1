// src/display/mod.rs
//! Display side of the painter.
//!
//! - HeadlessDisplay: render sink and texture factory backed by a display thread
//! - Messages: events the display reacts to

pub mod headless;
pub mod messages;

pub use headless::HeadlessDisplay;
pub use messages::{DisplayEvent, DisplayStatus, MouseButton};
