//! Template to render function compiler.
//!
//! The pipeline is `scan -> parse -> transform -> hoist -> cache -> codegen`.
//! Each stage is usable on its own; [`compiler::compile`] chains them.

use std::ops::Range;

#[cfg(feature = "serde")]
use serde::Serialize;

pub mod codegen;
pub mod compiler;
pub mod error;
pub mod flags;
pub mod ir;
pub mod parser;
pub mod scanner;
pub mod transformer;
pub mod util;

pub use compiler::{compile, compile_bytes, CompileOption, CompileOutput, Diagnostic};

// use plain &str here for now
// may change to tendril
pub type Name<'a> = &'a str;

#[derive(PartialEq, Eq, Clone, Copy, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Position {
    /// the 0-indexed byte offset in the source str
    pub offset: usize,
    /// the line number in the source code, 1-based
    pub line: usize,
    /// the column number in the source code, 1-based
    pub column: usize,
}

impl Default for Position {
    fn default() -> Self {
        Self {
            offset: 0,
            line: 1,
            column: 1,
        }
    }
}

#[derive(Default, PartialEq, Eq, Clone, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct SourceLocation {
    pub start: Position,
    pub end: Position,
}

impl SourceLocation {
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }
    /// a location spanning from self's start to other's end
    pub fn merge(&self, other: &Self) -> Self {
        Self {
            start: self.start,
            end: other.end,
        }
    }
}

impl From<SourceLocation> for Range<usize> {
    fn from(location: SourceLocation) -> Self {
        location.start.offset..location.end.offset
    }
}

impl From<&SourceLocation> for Range<usize> {
    fn from(location: &SourceLocation) -> Self {
        location.start.offset..location.end.offset
    }
}

#[cfg(test)]
#[macro_export]
macro_rules! cast {
    ($target: expr, $pat: path) => {{
        if let $pat(a) = $target {
            a
        } else {
            panic!("mismatch variant when cast to {}", stringify!($pat));
        }
    }};
}
