// src/canvas.rs

//! Canvas state mutated by operations on the loop worker.
//!
//! The state never leaves the worker thread, so none of it is synchronized.

use crate::color::Color;
use crate::geometry::{Point, Rect};
use crate::texture::Texture;

/// Width of the vertical bar of a figure (and height of the horizontal one).
pub const FIGURE_WIDTH: i32 = 100;
/// Height of the vertical bar of a figure (and width of the horizontal one).
pub const FIGURE_HEIGHT: i32 = 300;

/// A yellow cross: two overlapping bars centred on one point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Figure {
    center: Point,
    width: i32,
    height: i32,
}

impl Figure {
    pub fn new(center: Point) -> Self {
        Figure {
            center,
            width: FIGURE_WIDTH,
            height: FIGURE_HEIGHT,
        }
    }

    pub fn center(&self) -> Point {
        self.center
    }

    /// Relocates the figure; the shape stays the same.
    pub fn move_to(&mut self, center: Point) {
        self.center = center;
    }

    /// The vertical and the horizontal bar, in draw order.
    pub fn bars(&self) -> [Rect; 2] {
        [
            Rect::centered(self.center, self.width, self.height),
            Rect::centered(self.center, self.height, self.width),
        ]
    }

    pub fn draw(&self, texture: &mut dyn Texture) {
        for bar in self.bars() {
            texture.fill(bar, Color::YELLOW);
        }
    }
}

/// Everything the update operation needs to produce a frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanvasState {
    pub background: Color,
    /// Two opposite corners of the highlight rectangle, in any order.
    pub highlight: [Point; 2],
    pub figures: Vec<Figure>,
}

impl Default for CanvasState {
    fn default() -> Self {
        CanvasState {
            background: Color::BLACK,
            highlight: [Point::ORIGIN, Point::ORIGIN],
            figures: Vec::new(),
        }
    }
}

impl CanvasState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Back to a black, empty canvas.
    pub fn reset(&mut self) {
        *self = CanvasState::default();
    }

    pub fn highlight_rect(&self) -> Rect {
        Rect::from_corners(self.highlight[0], self.highlight[1])
    }

    pub fn add_figure(&mut self, center: Point) {
        self.figures.push(Figure::new(center));
    }

    /// Moves every figure to `center`, keeping the list length.
    pub fn move_all_figures(&mut self, center: Point) {
        for figure in &mut self.figures {
            figure.move_to(center);
        }
    }

    /// Drops all figures and leaves a single one at `center`.
    pub fn replace_figures(&mut self, center: Point) {
        self.figures.clear();
        self.figures.push(Figure::new(center));
    }

    /// Draws the full frame: background, then highlight, then figures in list order.
    pub fn render(&self, texture: &mut dyn Texture) {
        let bounds = texture.bounds();
        texture.fill(bounds, self.background);
        texture.fill(self.highlight_rect(), Color::BLACK);
        for figure in &self.figures {
            figure.draw(texture);
        }
    }
}
