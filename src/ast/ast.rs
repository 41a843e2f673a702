use crate::Span;

use super::{
    declarations::{
        DerivesDecl, EnumDecl, EnumMember, ExtendDecl, FfiDecl, FunctionDecl, LetDecl, ModuleDecl,
        OpDecl, RecordDecl, RequiresDecl, RequiresParam, TypeAliasDecl, VarDecl,
    },
    expressions::{
        ArgumentExpr, AsyncThreadingExpr, BinaryExpr, CallExpr, CastExpr, CollectionExpr,
        DotPathExpr, GenericInvokeExpr, IdentExpr, IndexExpr, InstOfExpr, LambdaExpr, LiteralExpr,
        MapExpr, ObjInitExpr, ParenthesizedExpr, ScopePathExpr, TernaryExpr, TernaryKind,
        UnaryExpr,
    },
    statements::{
        BlockStmt, CatchStmt, ElseStmt, ExpressionStmt, FinallyStmt, ForHead, ForStmt, IfStmt,
        ImportSpec, ImportStmt, ImportTarget, NamedVar, ReturnStmt, SwitchCase, SwitchStmt,
        TryStmt, ValueStmt, WhileStmt,
    },
    types::{FnPointerType, TypeExpr},
};

/// Handle to a node in an [`Ast`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub kind: NodeKind,
    pub span: Span,
}

/// Every node of one parsed file.
///
/// Nodes refer to their children by `NodeId`. The parser stores each id in
/// exactly one parent, so the arena forms a tree rooted at the program's
/// declarations and annotations.
#[derive(Debug, Clone, Default)]
pub struct Ast {
    nodes: Vec<Node>,
}

impl Ast {
    pub fn new() -> Self {
        Ast { nodes: vec![] }
    }

    pub fn alloc(&mut self, kind: NodeKind, span: Span) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node { kind, span });
        id
    }

    pub fn get(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.get(id).kind
    }

    pub fn span(&self, id: NodeId) -> &Span {
        &self.get(id).span
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Drops every node allocated after the arena had `len` nodes.
    /// Used to discard the output of a failed speculative parse.
    pub fn truncate(&mut self, len: usize) {
        self.nodes.truncate(len);
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(index, node)| (NodeId(index as u32), node))
    }

    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        self.kind(id).children()
    }
}

/// Discriminant of a [`NodeKind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NodeTag {
    Literal,
    Ident,
    Binary,
    Unary,
    Ternary,
    Cast,
    InstOf,
    AsyncThreading,
    ScopePath,
    DotPath,
    Index,
    Call,
    Argument,
    GenericInvoke,
    Tuple,
    Array,
    Set,
    Map,
    Parenthesized,
    ObjInit,
    Lambda,
    Type,
    FnPointer,

    Block,
    ExprStmt,
    If,
    Else,
    While,
    For,
    NamedVar,
    Switch,
    Case,
    Try,
    Catch,
    Finally,
    Panic,
    Yield,
    Delete,
    Return,
    Break,
    Continue,
    Import,
    ImportSpec,

    Function,
    Var,
    Let,
    Const,
    Record,
    Derives,
    Enum,
    EnumMember,
    TypeAlias,
    Ffi,
    Op,
    Module,
    Extend,
    Requires,
    RequiresParam,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    // Expressions
    Literal(LiteralExpr),
    Ident(IdentExpr),
    Binary(BinaryExpr),
    Unary(UnaryExpr),
    Ternary(TernaryExpr),
    Cast(CastExpr),
    InstOf(InstOfExpr),
    AsyncThreading(AsyncThreadingExpr),
    ScopePath(ScopePathExpr),
    DotPath(DotPathExpr),
    Index(IndexExpr),
    Call(CallExpr),
    Argument(ArgumentExpr),
    GenericInvoke(GenericInvokeExpr),
    Tuple(CollectionExpr),
    Array(CollectionExpr),
    Set(CollectionExpr),
    Map(MapExpr),
    Parenthesized(ParenthesizedExpr),
    ObjInit(ObjInitExpr),
    Lambda(LambdaExpr),
    Type(TypeExpr),
    FnPointer(FnPointerType),

    // Statements
    Block(BlockStmt),
    ExprStmt(ExpressionStmt),
    If(IfStmt),
    Else(ElseStmt),
    While(WhileStmt),
    For(ForStmt),
    NamedVar(NamedVar),
    Switch(SwitchStmt),
    Case(SwitchCase),
    Try(TryStmt),
    Catch(CatchStmt),
    Finally(FinallyStmt),
    Panic(ValueStmt),
    Yield(ValueStmt),
    Delete(ValueStmt),
    Return(ReturnStmt),
    Break,
    Continue,
    Import(ImportStmt),
    ImportSpec(ImportSpec),

    // Declarations
    Function(FunctionDecl),
    Var(VarDecl),
    Let(LetDecl),
    Const(LetDecl),
    Record(RecordDecl),
    Derives(DerivesDecl),
    Enum(EnumDecl),
    EnumMember(EnumMember),
    TypeAlias(TypeAliasDecl),
    Ffi(FfiDecl),
    Op(OpDecl),
    Module(ModuleDecl),
    Extend(ExtendDecl),
    Requires(RequiresDecl),
    RequiresParam(RequiresParam),
}

impl NodeKind {
    pub fn tag(&self) -> NodeTag {
        match self {
            NodeKind::Literal(_) => NodeTag::Literal,
            NodeKind::Ident(_) => NodeTag::Ident,
            NodeKind::Binary(_) => NodeTag::Binary,
            NodeKind::Unary(_) => NodeTag::Unary,
            NodeKind::Ternary(_) => NodeTag::Ternary,
            NodeKind::Cast(_) => NodeTag::Cast,
            NodeKind::InstOf(_) => NodeTag::InstOf,
            NodeKind::AsyncThreading(_) => NodeTag::AsyncThreading,
            NodeKind::ScopePath(_) => NodeTag::ScopePath,
            NodeKind::DotPath(_) => NodeTag::DotPath,
            NodeKind::Index(_) => NodeTag::Index,
            NodeKind::Call(_) => NodeTag::Call,
            NodeKind::Argument(_) => NodeTag::Argument,
            NodeKind::GenericInvoke(_) => NodeTag::GenericInvoke,
            NodeKind::Tuple(_) => NodeTag::Tuple,
            NodeKind::Array(_) => NodeTag::Array,
            NodeKind::Set(_) => NodeTag::Set,
            NodeKind::Map(_) => NodeTag::Map,
            NodeKind::Parenthesized(_) => NodeTag::Parenthesized,
            NodeKind::ObjInit(_) => NodeTag::ObjInit,
            NodeKind::Lambda(_) => NodeTag::Lambda,
            NodeKind::Type(_) => NodeTag::Type,
            NodeKind::FnPointer(_) => NodeTag::FnPointer,
            NodeKind::Block(_) => NodeTag::Block,
            NodeKind::ExprStmt(_) => NodeTag::ExprStmt,
            NodeKind::If(_) => NodeTag::If,
            NodeKind::Else(_) => NodeTag::Else,
            NodeKind::While(_) => NodeTag::While,
            NodeKind::For(_) => NodeTag::For,
            NodeKind::NamedVar(_) => NodeTag::NamedVar,
            NodeKind::Switch(_) => NodeTag::Switch,
            NodeKind::Case(_) => NodeTag::Case,
            NodeKind::Try(_) => NodeTag::Try,
            NodeKind::Catch(_) => NodeTag::Catch,
            NodeKind::Finally(_) => NodeTag::Finally,
            NodeKind::Panic(_) => NodeTag::Panic,
            NodeKind::Yield(_) => NodeTag::Yield,
            NodeKind::Delete(_) => NodeTag::Delete,
            NodeKind::Return(_) => NodeTag::Return,
            NodeKind::Break => NodeTag::Break,
            NodeKind::Continue => NodeTag::Continue,
            NodeKind::Import(_) => NodeTag::Import,
            NodeKind::ImportSpec(_) => NodeTag::ImportSpec,
            NodeKind::Function(_) => NodeTag::Function,
            NodeKind::Var(_) => NodeTag::Var,
            NodeKind::Let(_) => NodeTag::Let,
            NodeKind::Const(_) => NodeTag::Const,
            NodeKind::Record(_) => NodeTag::Record,
            NodeKind::Derives(_) => NodeTag::Derives,
            NodeKind::Enum(_) => NodeTag::Enum,
            NodeKind::EnumMember(_) => NodeTag::EnumMember,
            NodeKind::TypeAlias(_) => NodeTag::TypeAlias,
            NodeKind::Ffi(_) => NodeTag::Ffi,
            NodeKind::Op(_) => NodeTag::Op,
            NodeKind::Module(_) => NodeTag::Module,
            NodeKind::Extend(_) => NodeTag::Extend,
            NodeKind::Requires(_) => NodeTag::Requires,
            NodeKind::RequiresParam(_) => NodeTag::RequiresParam,
        }
    }

    /// Direct children in source order.
    pub fn children(&self) -> Vec<NodeId> {
        let mut out = vec![];

        match self {
            NodeKind::Literal(node) => out.extend(&node.format_args),
            NodeKind::Ident(_) | NodeKind::Break | NodeKind::Continue => {}
            NodeKind::Binary(node) => out.extend([node.lhs, node.rhs]),
            NodeKind::Unary(node) => out.push(node.operand),
            NodeKind::Ternary(node) => match node.kind {
                TernaryKind::Question => out.extend([node.condition, node.if_true, node.if_false]),
                TernaryKind::Inline => out.extend([node.if_true, node.condition, node.if_false]),
            },
            NodeKind::Cast(node) => out.extend([node.value, node.target]),
            NodeKind::InstOf(node) => out.extend([node.value, node.target]),
            NodeKind::AsyncThreading(node) => out.push(node.value),
            NodeKind::ScopePath(node) => out.extend(&node.segments),
            NodeKind::DotPath(node) => out.extend([node.lhs, node.rhs]),
            NodeKind::Index(node) => out.extend([node.lhs, node.index]),
            NodeKind::Call(node) => {
                out.push(node.path);
                out.extend(node.generics);
                out.extend(&node.args);
            }
            NodeKind::Argument(node) => out.push(node.value),
            NodeKind::GenericInvoke(node) => out.extend(&node.args),
            NodeKind::Tuple(node) | NodeKind::Array(node) | NodeKind::Set(node) => {
                out.extend(&node.elements)
            }
            NodeKind::Map(node) => {
                for (key, value) in &node.pairs {
                    out.extend([*key, *value]);
                }
            }
            NodeKind::Parenthesized(node) => out.push(node.value),
            NodeKind::ObjInit(node) => {
                out.extend(node.path);
                out.extend(&node.fields);
            }
            NodeKind::Lambda(node) => out.push(node.func),
            NodeKind::Type(node) => {
                out.push(node.base);
                out.extend(node.generics);
            }
            NodeKind::FnPointer(node) => {
                out.extend(&node.params);
                out.extend(node.returns);
            }

            NodeKind::Block(node) => out.extend(&node.body),
            NodeKind::ExprStmt(node) => out.push(node.expr),
            NodeKind::If(node) => {
                out.extend([node.condition, node.body]);
                out.extend(&node.else_bodies);
            }
            NodeKind::Else(node) => {
                out.extend(node.condition);
                out.push(node.body);
            }
            NodeKind::While(node) => out.extend([node.condition, node.body]),
            NodeKind::For(node) => {
                match &node.head {
                    ForHead::Python { vars, iterable } => {
                        out.extend(vars);
                        out.push(*iterable);
                    }
                    ForHead::CStyle {
                        init,
                        condition,
                        update,
                    } => {
                        out.extend(*init);
                        out.extend(*condition);
                        out.extend(*update);
                    }
                }
                out.push(node.body);
            }
            NodeKind::NamedVar(node) => out.extend(node.ty),
            NodeKind::Switch(node) => {
                out.push(node.condition);
                out.extend(&node.cases);
            }
            NodeKind::Case(node) => {
                out.extend(node.condition);
                out.push(node.body);
            }
            NodeKind::Try(node) => {
                out.push(node.body);
                out.extend(&node.catches);
                out.extend(node.finally);
            }
            NodeKind::Catch(node) => {
                out.extend(node.binding);
                out.push(node.body);
            }
            NodeKind::Finally(node) => out.push(node.body),
            NodeKind::Panic(node) | NodeKind::Yield(node) | NodeKind::Delete(node) => {
                out.push(node.value)
            }
            NodeKind::Return(node) => out.extend(node.value),
            NodeKind::Import(node) => out.push(node.spec),
            NodeKind::ImportSpec(node) => {
                if let ImportTarget::Path(path) = &node.target {
                    out.push(*path);
                }
                out.extend(&node.items);
            }

            NodeKind::Function(node) => {
                out.extend(node.name);
                out.extend(node.requires);
                out.extend(&node.params);
                out.extend(node.returns);
                out.extend(node.body);
            }
            NodeKind::Var(node) => {
                out.push(node.var);
                out.extend(node.value);
            }
            NodeKind::Let(node) | NodeKind::Const(node) => out.extend(&node.vars),
            NodeKind::Record(node) => {
                out.extend(node.requires);
                out.extend(node.derives);
                out.extend(&node.members);
            }
            NodeKind::Derives(node) => out.extend(node.bases.iter().map(|(_, ty)| *ty)),
            NodeKind::Enum(node) => {
                out.extend(node.derives);
                out.extend(&node.members);
            }
            NodeKind::EnumMember(node) => out.extend(node.value),
            NodeKind::TypeAlias(node) => {
                out.extend(node.requires);
                out.push(node.ty);
            }
            NodeKind::Ffi(node) => out.push(node.target),
            NodeKind::Op(node) => out.push(node.func),
            NodeKind::Module(node) => {
                out.push(node.name);
                out.extend(&node.body);
            }
            NodeKind::Extend(node) => {
                out.push(node.target);
                out.extend(node.derives);
                out.extend(&node.body);
            }
            NodeKind::Requires(node) => {
                out.extend(&node.params);
                out.extend(&node.bounds);
            }
            NodeKind::RequiresParam(node) => {
                out.extend(node.ty);
                out.extend(node.default);
            }
        }

        out
    }
}

/// A pass over the tree. Both hooks default to doing nothing.
pub trait Visitor {
    fn enter(&mut self, _ast: &Ast, _id: NodeId) {}
    fn leave(&mut self, _ast: &Ast, _id: NodeId) {}
}

/// Depth-first walk from `id`, calling `enter` before and `leave` after the
/// children of every node.
pub fn walk<V: Visitor + ?Sized>(ast: &Ast, id: NodeId, visitor: &mut V) {
    visitor.enter(ast, id);

    for child in ast.children(id) {
        walk(ast, child, visitor);
    }

    visitor.leave(ast, id);
}
