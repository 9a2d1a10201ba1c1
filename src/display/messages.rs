// src/display/messages.rs
//! Events delivered to the display and what it answers.

/// Pointer buttons the display distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Right,
}

/// Platform-agnostic display events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayEvent {
    /// Window/framebuffer resize. Applies to textures allocated afterwards.
    Resize { width_px: u32, height_px: u32 },

    /// Pointer button press at window coordinates.
    PointerPress { button: MouseButton, x: i32, y: i32 },

    /// User requested window close.
    CloseRequested,
}

/// Whether the display wants to keep running after an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayStatus {
    Running,
    Shutdown,
}
