use crate::lexer::tokens::Token;

use super::ast::NodeId;

/// A type in annotation position.
///
/// `base` is an identifier, scope path, tuple of types or function pointer.
/// `specifiers` are leading qualifiers such as `const`, `pointers` the prefix
/// `*` and `&` operators in source order.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeExpr {
    pub specifiers: Vec<Token>,
    pub pointers: Vec<Token>,
    pub base: NodeId,
    pub generics: Option<NodeId>,
    pub nullable: bool,
}

/// `fn (A, B) -> R`
#[derive(Debug, Clone, PartialEq)]
pub struct FnPointerType {
    pub params: Vec<NodeId>,
    pub returns: Option<NodeId>,
}
