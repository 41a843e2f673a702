//! Syntax tree produced by the parser.
//!
//! Submodules:
//! - ast: the node arena, `NodeKind` and the visitor walk
//! - expressions: expression node payloads
//! - types: type annotation payloads
//! - statements: statement node payloads
//! - declarations: declaration node payloads
pub mod ast;
pub mod declarations;
pub mod expressions;
pub mod statements;
pub mod types;
