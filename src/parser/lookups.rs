use std::collections::HashMap;

use lazy_static::lazy_static;

use crate::{
    ast::{ast::NodeId, declarations::Modifiers},
    errors::errors::ParseResult,
    lexer::tokens::TokenKind,
};

use super::{decl::*, expr::*, parser::Parser, stmt::*};

/// Binary operator precedence, weakest first.
#[derive(PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Debug)]
pub enum BindingPower {
    Default,
    Assignment,
    Range,
    LogicalOr,
    LogicalAnd,
    BitwiseOr,
    BitwiseXor,
    BitwiseAnd,
    Equality,
    Relational,
    Shift,
    Additive,
    Multiplicative,
}

pub type NudHandler = fn(&mut Parser<'_>) -> ParseResult<NodeId>;
pub type StmtHandler = fn(&mut Parser<'_>) -> ParseResult<NodeId>;
pub type DeclHandler = fn(&mut Parser<'_>, Modifiers) -> ParseResult<NodeId>;

lazy_static! {
    pub static ref BP_LOOKUP: HashMap<TokenKind, BindingPower> = {
        let mut map = HashMap::new();

        // Multiplicative
        map.insert(TokenKind::Mul, BindingPower::Multiplicative);
        map.insert(TokenKind::Div, BindingPower::Multiplicative);
        map.insert(TokenKind::Mod, BindingPower::Multiplicative);
        map.insert(TokenKind::Pow, BindingPower::Multiplicative);

        // Additive
        map.insert(TokenKind::Add, BindingPower::Additive);
        map.insert(TokenKind::Sub, BindingPower::Additive);

        map.insert(TokenKind::LeftShift, BindingPower::Shift);
        map.insert(TokenKind::RightShift, BindingPower::Shift);

        // Relational, `in` is rewritten to a membership call
        map.insert(TokenKind::Less, BindingPower::Relational);
        map.insert(TokenKind::Greater, BindingPower::Relational);
        map.insert(TokenKind::LessEquals, BindingPower::Relational);
        map.insert(TokenKind::GreaterEquals, BindingPower::Relational);
        map.insert(TokenKind::In, BindingPower::Relational);

        map.insert(TokenKind::Equal, BindingPower::Equality);
        map.insert(TokenKind::NotEqual, BindingPower::Equality);

        map.insert(TokenKind::BitAnd, BindingPower::BitwiseAnd);
        map.insert(TokenKind::BitXor, BindingPower::BitwiseXor);
        map.insert(TokenKind::BitOr, BindingPower::BitwiseOr);

        map.insert(TokenKind::LogicalAnd, BindingPower::LogicalAnd);
        map.insert(TokenKind::LogicalOr, BindingPower::LogicalOr);

        map.insert(TokenKind::Range, BindingPower::Range);
        map.insert(TokenKind::RangeInclusive, BindingPower::Range);

        // Assignment
        map.insert(TokenKind::Assign, BindingPower::Assignment);
        map.insert(TokenKind::AddAssign, BindingPower::Assignment);
        map.insert(TokenKind::SubAssign, BindingPower::Assignment);
        map.insert(TokenKind::MulAssign, BindingPower::Assignment);
        map.insert(TokenKind::DivAssign, BindingPower::Assignment);
        map.insert(TokenKind::ModAssign, BindingPower::Assignment);

        map
    };

    /// Handlers for the first token of an expression.
    pub static ref NUD_LOOKUP: HashMap<TokenKind, NudHandler> = {
        let mut map: HashMap<TokenKind, NudHandler> = HashMap::new();

        // Literals and symbols
        map.insert(TokenKind::Integer, parse_literal_expr);
        map.insert(TokenKind::Float, parse_literal_expr);
        map.insert(TokenKind::String, parse_literal_expr);
        map.insert(TokenKind::Char, parse_literal_expr);
        map.insert(TokenKind::True, parse_literal_expr);
        map.insert(TokenKind::False, parse_literal_expr);
        map.insert(TokenKind::Null, parse_literal_expr);
        map.insert(TokenKind::Identifier, parse_ident_expr);
        map.insert(TokenKind::PrimitiveType, parse_ident_expr);

        // Prefix operators
        map.insert(TokenKind::Sub, parse_prefix_expr);
        map.insert(TokenKind::Not, parse_prefix_expr);
        map.insert(TokenKind::BitNot, parse_prefix_expr);
        map.insert(TokenKind::BitAnd, parse_prefix_expr);
        map.insert(TokenKind::Mul, parse_prefix_expr);
        map.insert(TokenKind::Increment, parse_prefix_expr);
        map.insert(TokenKind::Decrement, parse_prefix_expr);

        // Groupings and collections
        map.insert(TokenKind::OpenParen, parse_grouping_expr);
        map.insert(TokenKind::OpenBracket, parse_array_expr);
        map.insert(TokenKind::OpenBrace, parse_brace_expr);

        map.insert(TokenKind::Fn, parse_lambda_expr);
        map.insert(TokenKind::Await, parse_async_expr);
        map.insert(TokenKind::Spawn, parse_async_expr);
        map.insert(TokenKind::Thread, parse_async_expr);
        map.insert(TokenKind::Scope, parse_global_scope_expr);

        map
    };

    /// Statements that start with a keyword.
    pub static ref STMT_LOOKUP: HashMap<TokenKind, StmtHandler> = {
        let mut map: HashMap<TokenKind, StmtHandler> = HashMap::new();
        map.insert(TokenKind::If, parse_if_stmt);
        map.insert(TokenKind::Unless, parse_if_stmt);
        map.insert(TokenKind::While, parse_while_stmt);
        map.insert(TokenKind::For, parse_for_stmt);
        map.insert(TokenKind::Switch, parse_switch_stmt);
        map.insert(TokenKind::Try, parse_try_stmt);
        map.insert(TokenKind::Finally, parse_finally_stmt);
        map.insert(TokenKind::Panic, parse_panic_stmt);
        map.insert(TokenKind::Yield, parse_yield_stmt);
        map.insert(TokenKind::Delete, parse_delete_stmt);
        map.insert(TokenKind::Return, parse_return_stmt);
        map.insert(TokenKind::Break, parse_break_stmt);
        map.insert(TokenKind::Continue, parse_continue_stmt);
        map.insert(TokenKind::Import, parse_import_stmt);
        map.insert(TokenKind::OpenBrace, parse_block_stmt);
        map
    };

    /// Declarations, entered after the modifier run has been consumed.
    pub static ref DECL_LOOKUP: HashMap<TokenKind, DeclHandler> = {
        let mut map: HashMap<TokenKind, DeclHandler> = HashMap::new();
        map.insert(TokenKind::Fn, parse_function_decl);
        map.insert(TokenKind::Op, parse_op_decl);
        map.insert(TokenKind::Let, parse_let_decl);
        map.insert(TokenKind::Const, parse_const_decl);
        map.insert(TokenKind::Struct, parse_record_decl);
        map.insert(TokenKind::Class, parse_record_decl);
        map.insert(TokenKind::Interface, parse_record_decl);
        map.insert(TokenKind::Enum, parse_enum_decl);
        map.insert(TokenKind::Type, parse_type_alias_decl);
        map.insert(TokenKind::Ffi, parse_ffi_decl);
        map.insert(TokenKind::Module, parse_module_decl);
        map.insert(TokenKind::Extend, parse_extend_decl);
        map
    };
}

pub fn binding_power(kind: TokenKind) -> BindingPower {
    BP_LOOKUP.get(&kind).copied().unwrap_or(BindingPower::Default)
}

pub fn is_binary_operator(kind: TokenKind) -> bool {
    binding_power(kind) > BindingPower::Default
}

pub fn is_postfix_operator(kind: TokenKind) -> bool {
    matches!(kind, TokenKind::Increment | TokenKind::Decrement)
}

/// Qualifiers allowed before a type: `const int`, `static Foo`.
pub fn is_type_qualifier(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Const
            | TokenKind::Static
            | TokenKind::Async
            | TokenKind::Ffi
            | TokenKind::Eval
            | TokenKind::Module
    )
}

pub fn is_access_specifier(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Pub | TokenKind::Priv | TokenKind::Prot | TokenKind::Internal
    )
}

pub fn is_modifier(kind: TokenKind) -> bool {
    is_access_specifier(kind)
        || matches!(
            kind,
            TokenKind::Inline
                | TokenKind::Static
                | TokenKind::Async
                | TokenKind::Eval
                | TokenKind::Const
                | TokenKind::Unsafe
                | TokenKind::Ffi
        )
}

/// Modifiers a declaration keyword accepts, with a name for error messages.
pub fn allowed_modifiers(kind: TokenKind) -> (&'static str, &'static [TokenKind]) {
    const ACCESS: &[TokenKind] = &[
        TokenKind::Pub,
        TokenKind::Priv,
        TokenKind::Prot,
        TokenKind::Internal,
    ];
    const FUNCTION: &[TokenKind] = &[
        TokenKind::Pub,
        TokenKind::Priv,
        TokenKind::Prot,
        TokenKind::Internal,
        TokenKind::Inline,
        TokenKind::Async,
        TokenKind::Static,
        TokenKind::Const,
        TokenKind::Eval,
        TokenKind::Unsafe,
    ];
    const STORAGE: &[TokenKind] = &[
        TokenKind::Pub,
        TokenKind::Priv,
        TokenKind::Prot,
        TokenKind::Internal,
        TokenKind::Ffi,
        TokenKind::Static,
        TokenKind::Async,
        TokenKind::Eval,
    ];
    const CONDITIONAL: &[TokenKind] = &[TokenKind::Const, TokenKind::Eval];

    match kind {
        TokenKind::Fn => ("a function", FUNCTION),
        TokenKind::Op => ("an operator", FUNCTION),
        TokenKind::Let => ("a variable", STORAGE),
        TokenKind::Const => ("a constant", STORAGE),
        TokenKind::Struct => ("a struct", ACCESS),
        TokenKind::Class => ("a class", ACCESS),
        TokenKind::Interface => ("an interface", ACCESS),
        TokenKind::Enum => ("an enum", ACCESS),
        TokenKind::Type => ("a type alias", ACCESS),
        TokenKind::Module => ("a module", ACCESS),
        TokenKind::Extend => ("an extension", ACCESS),
        TokenKind::Ffi => ("an ffi block", ACCESS),
        TokenKind::If | TokenKind::Unless => ("a conditional", CONDITIONAL),
        _ => ("a statement", &[]),
    }
}
