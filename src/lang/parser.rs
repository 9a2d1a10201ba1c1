// src/lang/parser.rs

//! Turns the line-oriented command script into painter operations.
//!
//! One line is one command: a name followed by whitespace-separated arguments.
//! Unknown names and malformed arguments drop the line; they are logged but
//! never reported to the caller.

use crate::painter::op::{self, CoordinateMode, Operation, UPDATE_OP};
use log::*;
use std::io::{self, BufRead, BufReader, Read};

/// Command parser. Carries the coordinate convention for geometry commands.
#[derive(Debug, Clone, Copy, Default)]
pub struct Parser {
    coordinates: CoordinateMode,
}

impl Parser {
    pub fn new(coordinates: CoordinateMode) -> Self {
        Parser { coordinates }
    }

    pub fn coordinates(&self) -> CoordinateMode {
        self.coordinates
    }

    /// Builds the operation for one command, or `None` if the line must be dropped.
    pub fn parse_command(&self, name: &str, args: &[&str]) -> Option<Operation> {
        match name {
            "white" => Some(op::white_fill()),
            "green" => Some(op::green_fill()),
            "bgrect" => op::draw_rectangle(args, self.coordinates),
            "figure" => op::place_figure(args, self.coordinates),
            "move" => op::move_figure(args, self.coordinates),
            "update" => Some(UPDATE_OP),
            "reset" => Some(op::reset()),
            _ => {
                debug!("Parser: Unknown command '{}'", name);
                None
            }
        }
    }

    /// Parses a single line. Blank lines yield `None`.
    pub fn parse_line(&self, line: &str) -> Option<Operation> {
        let mut tokens = line.split_whitespace();
        let name = tokens.next()?;
        let args: Vec<&str> = tokens.collect();
        self.parse_command(name, &args)
    }

    /// Reads the whole script and returns its operations in line order.
    ///
    /// # Errors
    /// Only I/O errors from `input` (including invalid UTF-8).
    pub fn parse<R: Read>(&self, input: R) -> io::Result<Vec<Operation>> {
        let mut ops = Vec::new();
        let mut dropped = 0usize;

        for line in BufReader::new(input).lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            match self.parse_line(&line) {
                Some(op) => ops.push(op),
                None => dropped += 1,
            }
        }

        if dropped > 0 {
            debug!("Parser: Dropped {} malformed or unknown lines", dropped);
        }
        trace!("Parser: Parsed {} operations", ops.len());
        Ok(ops)
    }
}
