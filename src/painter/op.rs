// src/painter/op.rs

//! Operations executed by the event loop.
//!
//! An [`Operation`] is consumed by [`Operation::execute`], which applies it to
//! the current texture and canvas state and reports whether the texture is now
//! ready to be presented.
//!
//! Three shapes exist:
//! - `Func`: a named closure mutating the canvas state. Never ready.
//! - `Update`: renders the canvas state into the texture. Always ready.
//! - `List`: runs its members in order; ready if any member was.
//!
//! Geometry factories (`draw_rectangle`, `place_figure`, `move_figure`) validate
//! their text arguments once and return `None` for malformed input.

use crate::canvas::CanvasState;
use crate::color::Color;
use crate::geometry::{Point, Size};
use crate::texture::Texture;
use log::*;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

/// Boxed body of a primitive operation.
pub type OperationFn = Box<dyn FnOnce(&mut dyn Texture, &mut CanvasState) + Send + 'static>;

/// Shared update signal. Carries no state, so any number of callers may post it.
pub const UPDATE_OP: Operation = Operation::Update;

/// How numeric command arguments map to pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoordinateMode {
    /// Arguments are pixel positions, truncated toward zero.
    #[default]
    Absolute,
    /// Arguments are fractions of the texture width (x) and height (y),
    /// resolved against the texture the operation executes on.
    Normalized,
}

impl CoordinateMode {
    pub fn resolve(self, size: Size, x: f64, y: f64) -> Point {
        match self {
            CoordinateMode::Absolute => Point::new(x as i32, y as i32),
            CoordinateMode::Normalized => Point::new(
                (size.width as f64 * x) as i32,
                (size.height as f64 * y) as i32,
            ),
        }
    }
}

/// A named primitive operation.
pub struct OperationFunc {
    name: Cow<'static, str>,
    f: OperationFn,
}

impl OperationFunc {
    pub fn new<F>(name: impl Into<Cow<'static, str>>, f: F) -> Self
    where
        F: FnOnce(&mut dyn Texture, &mut CanvasState) + Send + 'static,
    {
        OperationFunc {
            name: name.into(),
            f: Box::new(f),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Debug for OperationFunc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("OperationFunc").field(&self.name).finish()
    }
}

/// A unit of work for the event loop.
#[derive(Debug)]
pub enum Operation {
    Func(OperationFunc),
    Update,
    List(Vec<Operation>),
}

impl Operation {
    /// Wraps a closure as a primitive operation.
    pub fn func<F>(name: impl Into<Cow<'static, str>>, f: F) -> Self
    where
        F: FnOnce(&mut dyn Texture, &mut CanvasState) + Send + 'static,
    {
        Operation::Func(OperationFunc::new(name, f))
    }

    pub fn list(ops: impl IntoIterator<Item = Operation>) -> Self {
        Operation::List(ops.into_iter().collect())
    }

    /// Label used in logs and tests.
    pub fn name(&self) -> &str {
        match self {
            Operation::Func(func) => func.name(),
            Operation::Update => "update",
            Operation::List(_) => "list",
        }
    }

    /// Applies the operation. Returns `true` if the texture should be presented.
    pub fn execute(self, texture: &mut dyn Texture, state: &mut CanvasState) -> bool {
        match self {
            Operation::Func(func) => {
                (func.f)(texture, state);
                false
            }
            Operation::Update => {
                state.render(texture);
                true
            }
            Operation::List(ops) => {
                let mut ready = false;
                for op in ops {
                    // Every member runs; readiness is only accumulated.
                    ready = op.execute(texture, state) || ready;
                }
                ready
            }
        }
    }
}

/// Sets the background to white.
pub fn white_fill() -> Operation {
    Operation::func("white", |_, state| state.background = Color::WHITE)
}

/// Sets the background to green.
pub fn green_fill() -> Operation {
    Operation::func("green", |_, state| state.background = Color::GREEN)
}

/// Black background, collapsed highlight, no figures.
pub fn reset() -> Operation {
    Operation::func("reset", |_, state| state.reset())
}

/// `bgrect x1 y1 x2 y2`: sets both highlight corners.
pub fn draw_rectangle(args: &[&str], mode: CoordinateMode) -> Option<Operation> {
    let [x1, y1, x2, y2] = parse_args::<4>("bgrect", args)?;
    Some(Operation::func("bgrect", move |texture, state| {
        let size = texture.size();
        state.highlight = [mode.resolve(size, x1, y1), mode.resolve(size, x2, y2)];
    }))
}

/// `figure x y`: appends a figure centred at the position.
pub fn place_figure(args: &[&str], mode: CoordinateMode) -> Option<Operation> {
    let [x, y] = parse_args::<2>("figure", args)?;
    Some(Operation::func("figure", move |texture, state| {
        state.add_figure(mode.resolve(texture.size(), x, y));
    }))
}

/// `move x y`: the figure list becomes a single figure at the position.
pub fn move_figure(args: &[&str], mode: CoordinateMode) -> Option<Operation> {
    let [x, y] = parse_args::<2>("move", args)?;
    Some(Operation::func("move", move |texture, state| {
        state.replace_figures(mode.resolve(texture.size(), x, y));
    }))
}

/// Moves every existing figure to `center` (pixels). Used by pointer input.
pub fn reposition_all(center: Point) -> Operation {
    Operation::func("reposition", move |_, state| state.move_all_figures(center))
}

fn parse_args<const N: usize>(command: &str, args: &[&str]) -> Option<[f64; N]> {
    if args.len() != N {
        warn!(
            "Painter: '{}' takes {} arguments, got {}",
            command,
            N,
            args.len()
        );
        return None;
    }

    let mut values = [0.0; N];
    for (value, arg) in values.iter_mut().zip(args) {
        match arg.parse::<f64>() {
            Ok(v) if v.is_finite() => *value = v,
            Ok(_) | Err(_) => {
                warn!("Painter: '{}' got non-numeric argument {:?}", command, arg);
                return None;
            }
        }
    }
    Some(values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::Figure;
    use crate::texture::SoftwareTexture;
    use std::sync::{Arc, Mutex};
    use test_log::test;

    fn texture() -> SoftwareTexture {
        SoftwareTexture::new(Size::new(800, 800))
    }

    fn recording(log: &Arc<Mutex<Vec<&'static str>>>, tag: &'static str) -> Operation {
        let log = log.clone();
        Operation::func(tag, move |_, _| log.lock().unwrap().push(tag))
    }

    #[test]
    fn func_is_never_ready() {
        let mut state = CanvasState::new();
        assert!(!white_fill().execute(&mut texture(), &mut state));
        assert_eq!(state.background, Color::WHITE);
        assert!(!green_fill().execute(&mut texture(), &mut state));
        assert_eq!(state.background, Color::GREEN);
    }

    #[test]
    fn fills_do_not_touch_pixels() {
        let mut t = texture();
        let mut state = CanvasState::new();
        white_fill().execute(&mut t, &mut state);
        assert_eq!(t.fill_count(), 0);
    }

    #[test]
    fn update_renders_and_is_ready() {
        let mut t = texture();
        let mut state = CanvasState::new();
        state.background = Color::WHITE;
        assert!(UPDATE_OP.execute(&mut t, &mut state));
        assert_eq!(t.pixel(Point::new(700, 700)), Some(Color::WHITE));
    }

    #[test]
    fn list_readiness_is_or_and_runs_every_member() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut state = CanvasState::new();

        let all_plain = Operation::list([recording(&log, "a"), recording(&log, "b")]);
        assert!(!all_plain.execute(&mut texture(), &mut state));

        let ready_first = Operation::list([
            Operation::Update,
            recording(&log, "c"),
            Operation::list([recording(&log, "d")]),
        ]);
        assert!(ready_first.execute(&mut texture(), &mut state));

        assert!(!Operation::List(Vec::new()).execute(&mut texture(), &mut state));
        assert_eq!(*log.lock().unwrap(), vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn reset_clears_everything() {
        let mut state = CanvasState::new();
        state.background = Color::GREEN;
        state.highlight = [Point::new(1, 1), Point::new(9, 9)];
        state.add_figure(Point::new(3, 3));

        reset().execute(&mut texture(), &mut state);
        assert_eq!(state, CanvasState::default());
    }

    #[test]
    fn draw_rectangle_needs_four_numbers() {
        let mode = CoordinateMode::Absolute;
        assert!(draw_rectangle(&["1", "2", "3"], mode).is_none());
        assert!(draw_rectangle(&["1", "2", "3", "4", "5"], mode).is_none());
        assert!(draw_rectangle(&["1", "2", "x", "4"], mode).is_none());
        assert!(draw_rectangle(&["1", "2", "NaN", "4"], mode).is_none());

        let op = draw_rectangle(&["10", "20", "30.9", "40"], mode).unwrap();
        let mut state = CanvasState::new();
        assert!(!op.execute(&mut texture(), &mut state));
        assert_eq!(state.highlight, [Point::new(10, 20), Point::new(30, 40)]);
    }

    #[test]
    fn place_figure_appends() {
        let mut state = CanvasState::new();
        let mode = CoordinateMode::Absolute;
        place_figure(&["100", "100"], mode)
            .unwrap()
            .execute(&mut texture(), &mut state);
        place_figure(&["200", "50"], mode)
            .unwrap()
            .execute(&mut texture(), &mut state);

        assert_eq!(
            state.figures,
            vec![
                Figure::new(Point::new(100, 100)),
                Figure::new(Point::new(200, 50))
            ]
        );
        assert!(place_figure(&["1"], mode).is_none());
    }

    #[test]
    fn move_figure_replaces_list() {
        let mut state = CanvasState::new();
        state.add_figure(Point::new(1, 1));
        state.add_figure(Point::new(2, 2));

        move_figure(&["56", "57"], CoordinateMode::Absolute)
            .unwrap()
            .execute(&mut texture(), &mut state);
        assert_eq!(state.figures, vec![Figure::new(Point::new(56, 57))]);
        assert!(move_figure(&[], CoordinateMode::Absolute).is_none());
    }

    #[test]
    fn reposition_all_keeps_count() {
        let mut state = CanvasState::new();
        state.add_figure(Point::new(1, 1));
        state.add_figure(Point::new(2, 2));
        reposition_all(Point::new(9, 9)).execute(&mut texture(), &mut state);
        assert_eq!(state.figures.len(), 2);
        assert!(state.figures.iter().all(|f| f.center() == Point::new(9, 9)));
    }

    #[test]
    fn normalized_coordinates_scale_with_texture_at_execution() {
        let op = place_figure(&["0.5", "0.25"], CoordinateMode::Normalized).unwrap();
        let mut state = CanvasState::new();
        let mut t = SoftwareTexture::new(Size::new(400, 200));
        op.execute(&mut t, &mut state);
        assert_eq!(state.figures[0].center(), Point::new(200, 50));

        let op = place_figure(&["0.5", "0.25"], CoordinateMode::Normalized).unwrap();
        op.execute(&mut texture(), &mut state);
        assert_eq!(state.figures[1].center(), Point::new(400, 200));
    }

    #[test]
    fn names_identify_commands() {
        assert_eq!(white_fill().name(), "white");
        assert_eq!(UPDATE_OP.name(), "update");
        assert_eq!(Operation::List(Vec::new()).name(), "list");
        assert_eq!(reset().name(), "reset");
    }
}
