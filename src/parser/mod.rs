//! Parser module for building the AST.
//!
//! This module turns a `TokenSequence` into nodes of an `Ast` arena. It is
//! a recursive descent parser with precedence climbing for binary
//! operators:
//!
//! - Declarations with their modifiers (`decl`)
//! - Statements and suites (`stmt`)
//! - Expressions, including interpolated strings (`expr`)
//! - Type annotations and turbofish generics (`types`)
//!
//! Dispatch goes through the lookup tables in `lookups`, and every parse
//! stops at the first error.

pub mod decl;
pub mod expr;
pub mod hints;
pub mod lookups;
pub mod parser;
pub mod stmt;
pub mod types;

#[cfg(test)]
mod tests;
