use crate::lexer::tokens::{Token, TokenKind};

use super::ast::NodeId;

/// The leading modifier run of a declaration, in source order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Modifiers {
    pub tokens: Vec<Token>,
}

impl Modifiers {
    pub fn has(&self, kind: TokenKind) -> bool {
        self.tokens.iter().any(|token| token.kind == kind)
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

/// Function declaration. Lambdas reuse this with no name.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDecl {
    pub modifiers: Modifiers,
    pub name: Option<NodeId>,
    pub params: Vec<NodeId>,
    pub returns: Option<NodeId>,
    pub requires: Option<NodeId>,
    pub body: Option<NodeId>,
}

/// A `NamedVar` with an optional initializer, used by parameters and `let`
#[derive(Debug, Clone, PartialEq)]
pub struct VarDecl {
    pub var: NodeId,
    pub value: Option<NodeId>,
}

/// `let` or `const` with one or more bindings
#[derive(Debug, Clone, PartialEq)]
pub struct LetDecl {
    pub modifiers: Modifiers,
    pub vars: Vec<NodeId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Struct,
    Class,
    Interface,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordDecl {
    pub kind: RecordKind,
    pub modifiers: Modifiers,
    pub name: String,
    pub requires: Option<NodeId>,
    pub derives: Option<NodeId>,
    pub members: Vec<NodeId>,
    /// Declared with `;` instead of a body
    pub is_forward: bool,
}

/// `derives pub A, B`: each base type with its optional access specifier
#[derive(Debug, Clone, PartialEq)]
pub struct DerivesDecl {
    pub bases: Vec<(Option<TokenKind>, NodeId)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumDecl {
    pub modifiers: Modifiers,
    pub name: String,
    pub derives: Option<NodeId>,
    pub members: Vec<NodeId>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumMember {
    pub name: String,
    pub value: Option<NodeId>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeAliasDecl {
    pub modifiers: Modifiers,
    pub name: String,
    pub requires: Option<NodeId>,
    pub ty: NodeId,
}

/// `ffi "lang" <declaration or import>`
#[derive(Debug, Clone, PartialEq)]
pub struct FfiDecl {
    pub modifiers: Modifiers,
    pub language: String,
    pub target: NodeId,
}

/// Operator overload: `op + fn add(...)`
#[derive(Debug, Clone, PartialEq)]
pub struct OpDecl {
    pub modifiers: Modifiers,
    pub op: Vec<Token>,
    pub func: NodeId,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModuleDecl {
    pub modifiers: Modifiers,
    pub name: NodeId,
    pub body: Vec<NodeId>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExtendDecl {
    pub modifiers: Modifiers,
    pub target: NodeId,
    pub derives: Option<NodeId>,
    pub body: Vec<NodeId>,
}

/// `requires <T, const N: int = 4> if T has Display`
#[derive(Debug, Clone, PartialEq)]
pub struct RequiresDecl {
    pub params: Vec<NodeId>,
    pub bounds: Vec<NodeId>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RequiresParam {
    pub name: String,
    pub ty: Option<NodeId>,
    pub default: Option<NodeId>,
    pub is_const: bool,
}
