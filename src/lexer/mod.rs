//! Lexical analysis module for the front end.
//!
//! This module contains the lexer (tokenizer) that converts source code
//! into a `TokenSequence` for parsing. It handles:
//!
//! - Tokenization of source code using an ordered table of regex patterns
//! - Recognition of keywords, identifiers, literals, and operators
//! - Nested block comments, prefixed strings and f-string brace tracking
//! - Token position tracking (line, column, offset) for error reporting
//! - `TokenCursor`, the bounded reader the parser walks tokens with

pub mod cursor;
pub mod lexer;
pub mod tokens;
