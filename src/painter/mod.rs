// src/painter/mod.rs

//! Operation model and the event loop that executes it.

mod error;
mod event_loop;
pub mod op;

pub use error::LoopError;
pub use event_loop::{EventLoop, LoopHandle, LoopState};
pub use op::{CoordinateMode, Operation, OperationFunc, UPDATE_OP};
