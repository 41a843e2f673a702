use super::ast::NodeId;

/// A suite: either `{ ... }` or a single statement introduced by `:`
#[derive(Debug, Clone, PartialEq)]
pub struct BlockStmt {
    pub body: Vec<NodeId>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExpressionStmt {
    pub expr: NodeId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IfKind {
    If,
    Unless,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IfStmt {
    pub kind: IfKind,
    pub condition: NodeId,
    pub body: NodeId,
    pub else_bodies: Vec<NodeId>,
    pub has_const: bool,
    pub has_eval: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElseKind {
    Else,
    ElseIf,
    ElseUnless,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ElseStmt {
    pub kind: ElseKind,
    pub condition: Option<NodeId>,
    pub body: NodeId,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WhileStmt {
    pub condition: NodeId,
    pub body: NodeId,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ForHead {
    /// `for a, b in xs`
    Python { vars: Vec<NodeId>, iterable: NodeId },
    /// `for init; condition; update`
    CStyle {
        init: Option<NodeId>,
        condition: Option<NodeId>,
        update: Option<NodeId>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForStmt {
    pub head: ForHead,
    pub body: NodeId,
}

/// `const? name (: Type)?`
#[derive(Debug, Clone, PartialEq)]
pub struct NamedVar {
    pub name: String,
    pub ty: Option<NodeId>,
    pub is_const: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SwitchStmt {
    pub condition: NodeId,
    pub cases: Vec<NodeId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaseKind {
    Case,
    Fallthrough,
    Default,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SwitchCase {
    pub kind: CaseKind,
    pub condition: Option<NodeId>,
    pub body: NodeId,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TryStmt {
    pub body: NodeId,
    pub catches: Vec<NodeId>,
    pub finally: Option<NodeId>,
}

/// `binding` is a `NamedVar`, a bare type, or absent for a catch-all.
#[derive(Debug, Clone, PartialEq)]
pub struct CatchStmt {
    pub binding: Option<NodeId>,
    pub body: NodeId,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FinallyStmt {
    pub body: NodeId,
}

/// Payload of `panic`, `yield` and `delete`
#[derive(Debug, Clone, PartialEq)]
pub struct ValueStmt {
    pub value: NodeId,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReturnStmt {
    pub value: Option<NodeId>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ImportTarget {
    Path(NodeId),
    File(String),
}

/// One imported item: a module path or file, plus a wildcard, an item
/// list or an alias.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportSpec {
    pub target: ImportTarget,
    pub wildcard: bool,
    pub items: Vec<NodeId>,
    pub alias: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImportStmt {
    pub explicit_module: bool,
    pub spec: NodeId,
}
