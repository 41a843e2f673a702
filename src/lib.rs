#![allow(clippy::module_inception)]

use std::rc::Rc;

use crate::{
    config::Config,
    errors::errors::Error,
    lexer::lexer::tokenize_with_origin,
    parser::parser::{parse, Program},
};

pub mod ast;
pub mod config;
pub mod errors;
pub mod lexer;
pub mod macros;
pub mod parser;

extern crate regex;

/// A location in a source file.
///
/// `line` is 1-based, `column` is 0-based and `offset` counts every character
/// consumed since the start of the file (or since the lexing origin).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    pub line: u32,
    pub column: u32,
    pub offset: u32,
    pub file: Rc<String>,
}

impl Position {
    pub fn new(line: u32, column: u32, offset: u32, file: Rc<String>) -> Self {
        Position {
            line,
            column,
            offset,
            file,
        }
    }

    #[cfg(test)]
    pub fn null() -> Self {
        Position::new(0, 0, 0, Rc::new(String::from("<null>")))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

impl Span {
    /// Joins two spans into one covering both, keeping `self`'s start.
    pub fn to(&self, other: &Span) -> Span {
        Span {
            start: self.start.clone(),
            end: other.end.clone(),
        }
    }
}

/// Lexes and parses a whole source file in one call.
pub fn parse_source(source: &str, config: &Config) -> Result<Program, Error> {
    let tokens = tokenize_with_origin(source, &config.file_name, config.origin)?;
    Ok(parse(&tokens, config)?)
}

/// Finds the line containing a character offset.
///
/// Returns the 1-based line number, the line text and the column of the
/// offset within that line, or `None` when the offset is past the end.
pub fn get_line_at_position(source: &str, offset: u32) -> Option<(usize, String, usize)> {
    let mut start = 0;

    for (index, line) in source.split_inclusive('\n').enumerate() {
        let length = line.chars().count();
        let end = start + length;

        if (start..end).contains(&(offset as usize)) {
            return Some((index + 1, line.to_string(), offset as usize - start));
        }

        start = end;
    }

    None
}
