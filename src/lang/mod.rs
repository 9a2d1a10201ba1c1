// src/lang/mod.rs

//! The command language and the transport that delivers it.

pub mod http;
mod parser;

pub use http::{router, CommandService, SubmitError};
pub use parser::Parser;
