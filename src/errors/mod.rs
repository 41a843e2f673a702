//! Error types and error handling for the front end.
//!
//! This module defines the error values produced while lexing and parsing.
//! It includes:
//!
//! - `LexError` for fatal tokenization failures
//! - `ParseError` carrying the offending token and fix suggestions
//! - The umbrella `Error` type and the `ParseResult` alias
//! - Tips used when rendering errors

pub mod errors;
