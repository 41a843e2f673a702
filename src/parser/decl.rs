//! Declaration parsing.
//!
//! `parse_decl` is the entry point for every item in a file or block. It
//! reads a run of modifiers (`pub`, `static`, `inline` ...), checks them
//! against the declaration that follows and dispatches through
//! `DECL_LOOKUP`. Anything that is not a declaration is parsed as a
//! statement.

use tracing::trace;

use crate::{
    ast::{
        ast::{NodeId, NodeKind},
        declarations::{
            DerivesDecl, EnumDecl, EnumMember, ExtendDecl, FfiDecl, FunctionDecl, LetDecl,
            Modifiers, ModuleDecl, OpDecl, RecordDecl, RecordKind, RequiresDecl, RequiresParam,
            TypeAliasDecl, VarDecl,
        },
        statements::NamedVar,
    },
    errors::errors::{ParseError, ParseErrorImpl, ParseResult},
    lexer::tokens::TokenKind,
    Position,
};

use super::{
    expr::{parse_expr, parse_ident_expr, parse_operand, parse_scope_expr},
    lookups::{allowed_modifiers, is_access_specifier, is_modifier, DECL_LOOKUP},
    parser::Parser,
    stmt::{parse_block_stmt, parse_if_with, parse_import_stmt, parse_named_var, parse_stmt, parse_suite},
    types::{close_generic_list, parse_type},
};

/// Whether the current token is a modifier rather than the start of the
/// declaration itself.
///
/// `const` and `ffi` are declaration keywords of their own, so they only
/// count as modifiers in front of another modifier or a declaration.
fn at_modifier(parser: &Parser) -> bool {
    let kind = parser.current_kind();

    if !is_modifier(kind) {
        return false;
    }

    if !matches!(kind, TokenKind::Const | TokenKind::Ffi) {
        return true;
    }

    let next = parser.peek_kind(1);
    is_modifier(next)
        || DECL_LOOKUP.contains_key(&next)
        || matches!(next, TokenKind::If | TokenKind::Unless)
}

pub fn parse_decl(parser: &mut Parser) -> ParseResult<NodeId> {
    let mut modifiers = Modifiers::default();
    while at_modifier(parser) {
        modifiers.tokens.push(parser.advance());
    }

    let kind = parser.current_kind();
    let (target, allowed) = allowed_modifiers(kind);

    if let Some(token) = modifiers
        .tokens
        .iter()
        .find(|token| !allowed.contains(&token.kind))
    {
        return Err(ParseError::new(
            ParseErrorImpl::InvalidModifier {
                modifier: token.value.clone(),
                target: String::from(target),
            },
            token.clone(),
        ));
    }

    match kind {
        TokenKind::If | TokenKind::Unless => parse_if_with(
            parser,
            modifiers.has(TokenKind::Const),
            modifiers.has(TokenKind::Eval),
        ),
        _ => match DECL_LOOKUP.get(&kind) {
            Some(handler) => handler(parser, modifiers),
            None => parse_stmt(parser),
        },
    }
}

/// Where a declaration starts: its first modifier, or the current token.
fn decl_start(parser: &Parser, modifiers: &Modifiers) -> Position {
    match modifiers.tokens.first() {
        Some(token) => token.position.clone(),
        None => parser.current().position.clone(),
    }
}

/// `{ decl* }` of records, modules and extensions.
fn parse_decl_body(parser: &mut Parser) -> ParseResult<Vec<NodeId>> {
    parser.with_brace_expr(|parser| {
        parser.expect(TokenKind::OpenBrace)?;

        let mut body = vec![];
        while parser.has_tokens() && parser.current_kind() != TokenKind::CloseBrace {
            body.push(parse_decl(parser)?);
        }

        parser.expect(TokenKind::CloseBrace)?;
        Ok(body)
    })
}

/// `name` or `a::b::name`
fn parse_path_name(parser: &mut Parser) -> ParseResult<NodeId> {
    let start = parser.current().position.clone();

    if parser.current_kind() != TokenKind::Identifier {
        return Err(parser.unexpected(TokenKind::Identifier));
    }

    let name = parse_ident_expr(parser)?;
    parse_scope_expr(parser, Some(name), start, false)
}

// FUNCTIONS

pub fn parse_function_decl(parser: &mut Parser, modifiers: Modifiers) -> ParseResult<NodeId> {
    parse_function(parser, modifiers, false)
}

/// `fn name(params) -> T requires <...> { body }`
///
/// Named functions may end in `;` instead of a body. Lambdas have no name
/// and always have a block body.
pub fn parse_function(
    parser: &mut Parser,
    modifiers: Modifiers,
    anonymous: bool,
) -> ParseResult<NodeId> {
    let start = decl_start(parser, &modifiers);
    parser.expect(TokenKind::Fn)?;

    let name = if anonymous {
        None
    } else {
        Some(parse_path_name(parser)?)
    };

    parser.expect(TokenKind::OpenParen)?;

    let mut params = vec![];
    while parser.has_tokens() && parser.current_kind() != TokenKind::CloseParen {
        params.push(parse_param(parser)?);

        if !parser.eat(TokenKind::Comma) {
            break;
        }
    }

    parser.expect(TokenKind::CloseParen)?;

    let returns = if parser.eat(TokenKind::Arrow) {
        Some(parse_type(parser)?)
    } else {
        None
    };

    let requires = if parser.current_kind() == TokenKind::Requires {
        Some(parse_requires(parser)?)
    } else {
        None
    };

    let body = if anonymous {
        Some(parse_block_stmt(parser)?)
    } else if parser.eat(TokenKind::Semicolon) {
        None
    } else {
        Some(parse_suite(parser)?)
    };

    let span = parser.span_from(&start);
    Ok(parser.alloc(
        NodeKind::Function(FunctionDecl {
            modifiers,
            name,
            params,
            returns,
            requires,
            body,
        }),
        span,
    ))
}

/// A parameter. Every parameter but `self` needs a type.
fn parse_param(parser: &mut Parser) -> ParseResult<NodeId> {
    let start = parser.current().position.clone();
    let is_self = parser.current().value == "self";

    let var = parse_named_var(parser)?;

    if !is_self && !has_type(parser, var) {
        return Err(parser.error_here("expected ':' and a type for the parameter"));
    }

    finish_var(parser, var, start)
}

fn has_type(parser: &Parser, var: NodeId) -> bool {
    matches!(
        parser.ast().kind(var),
        NodeKind::NamedVar(NamedVar { ty: Some(_), .. })
    )
}

/// `name (: Type)? (= value)?`
pub(crate) fn parse_var_decl(parser: &mut Parser) -> ParseResult<NodeId> {
    let start = parser.current().position.clone();
    let var = parse_named_var(parser)?;
    finish_var(parser, var, start)
}

fn finish_var(parser: &mut Parser, var: NodeId, start: Position) -> ParseResult<NodeId> {
    let value = if parser.eat(TokenKind::Assign) {
        Some(parse_expr(parser)?)
    } else {
        None
    };

    let span = parser.span_from(&start);
    Ok(parser.alloc(NodeKind::Var(VarDecl { var, value }), span))
}

/// `op + fn add(self, other: Self) -> Self { ... }`
pub fn parse_op_decl(parser: &mut Parser, modifiers: Modifiers) -> ParseResult<NodeId> {
    let start = decl_start(parser, &modifiers);
    parser.expect(TokenKind::Op)?;

    let mut op = vec![];
    while parser.has_tokens() && parser.current_kind() != TokenKind::Fn {
        op.push(parser.advance());
    }

    if op.is_empty() {
        return Err(parser.error_here("expected an operator after 'op'"));
    }

    let func = parse_function(parser, Modifiers::default(), false)?;

    let span = parser.span_from(&start);
    Ok(parser.alloc(
        NodeKind::Op(OpDecl {
            modifiers,
            op,
            func,
        }),
        span,
    ))
}

/// `requires <T, const N: int = 4> if T has Display`
pub fn parse_requires(parser: &mut Parser) -> ParseResult<NodeId> {
    let start = parser.current().position.clone();
    parser.expect(TokenKind::Requires)?;
    parser.expect(TokenKind::Less)?;

    parser.generic_depth += 1;
    let params = parse_requires_params(parser);
    parser.generic_depth -= 1;
    let params = params?;

    let mut bounds = vec![];
    if parser.eat(TokenKind::If) {
        loop {
            bounds.push(parser.without_brace_expr(parse_expr)?);

            if !parser.eat(TokenKind::Comma) {
                break;
            }
        }
    }

    let span = parser.span_from(&start);
    Ok(parser.alloc(NodeKind::Requires(RequiresDecl { params, bounds }), span))
}

fn parse_requires_params(parser: &mut Parser) -> ParseResult<Vec<NodeId>> {
    let mut params = vec![];

    loop {
        params.push(parse_requires_param(parser)?);

        if parser.pending_gt || !parser.eat(TokenKind::Comma) {
            break;
        }
    }

    close_generic_list(parser)?;
    Ok(params)
}

/// `T`, `T: Kind = Default`, `const N: int = 4`
///
/// Defaults of `const` parameters are values and stop at the first
/// operator, so `= 4>` closes the list.
fn parse_requires_param(parser: &mut Parser) -> ParseResult<NodeId> {
    let start = parser.current().position.clone();
    let is_const = parser.eat(TokenKind::Const);
    let name = parser.expect(TokenKind::Identifier)?.value;

    let ty = if parser.eat(TokenKind::Colon) {
        Some(parse_type(parser)?)
    } else {
        None
    };

    let default = if !parser.pending_gt && parser.eat(TokenKind::Assign) {
        if is_const {
            Some(parse_operand(parser)?)
        } else {
            Some(parse_type(parser)?)
        }
    } else {
        None
    };

    let span = parser.span_from(&start);
    Ok(parser.alloc(
        NodeKind::RequiresParam(RequiresParam {
            name,
            ty,
            default,
            is_const,
        }),
        span,
    ))
}

// VARIABLES

pub fn parse_let_decl(parser: &mut Parser, modifiers: Modifiers) -> ParseResult<NodeId> {
    parse_storage_decl(parser, modifiers, TokenKind::Let)
}

pub fn parse_const_decl(parser: &mut Parser, modifiers: Modifiers) -> ParseResult<NodeId> {
    parse_storage_decl(parser, modifiers, TokenKind::Const)
}

/// `let a: int = 1, b = 2;` and the same with `const`. A `let` binding
/// needs a type or a value, a `const` binding always needs a value.
fn parse_storage_decl(
    parser: &mut Parser,
    modifiers: Modifiers,
    keyword: TokenKind,
) -> ParseResult<NodeId> {
    let start = decl_start(parser, &modifiers);
    parser.expect(keyword)?;

    let mut vars = vec![];
    loop {
        let var = parse_var_decl(parser)?;

        if let NodeKind::Var(VarDecl { var: named, value }) = parser.ast().kind(var) {
            if keyword == TokenKind::Const && value.is_none() {
                return Err(parser.error_here("expected a value in constant definition"));
            }

            if value.is_none() && !has_type(parser, *named) {
                return Err(parser.error_here("expected a type or a value for the variable"));
            }
        }

        vars.push(var);

        if !parser.eat(TokenKind::Comma) {
            break;
        }
    }

    parser.expect(TokenKind::Semicolon)?;

    let decl = LetDecl { modifiers, vars };
    let span = parser.span_from(&start);

    Ok(parser.alloc(
        if keyword == TokenKind::Const {
            NodeKind::Const(decl)
        } else {
            NodeKind::Let(decl)
        },
        span,
    ))
}

// TYPES

pub fn parse_record_decl(parser: &mut Parser, modifiers: Modifiers) -> ParseResult<NodeId> {
    let start = decl_start(parser, &modifiers);
    let kind = match parser.advance().kind {
        TokenKind::Struct => RecordKind::Struct,
        TokenKind::Class => RecordKind::Class,
        _ => RecordKind::Interface,
    };

    let name = parser.expect(TokenKind::Identifier)?.value;

    let requires = if parser.current_kind() == TokenKind::Requires {
        Some(parse_requires(parser)?)
    } else {
        None
    };

    let derives = if parser.current_kind() == TokenKind::Derives {
        Some(parse_derives(parser)?)
    } else {
        None
    };

    let is_forward = parser.eat(TokenKind::Semicolon);
    let members = if is_forward {
        vec![]
    } else {
        parse_decl_body(parser)?
    };

    trace!(name = %name, members = members.len(), "parsed record");

    let span = parser.span_from(&start);
    Ok(parser.alloc(
        NodeKind::Record(RecordDecl {
            kind,
            modifiers,
            name,
            requires,
            derives,
            members,
            is_forward,
        }),
        span,
    ))
}

/// `derives pub Base, Other`
fn parse_derives(parser: &mut Parser) -> ParseResult<NodeId> {
    let start = parser.current().position.clone();
    parser.expect(TokenKind::Derives)?;

    let mut bases = vec![];
    loop {
        let access = if is_access_specifier(parser.current_kind()) {
            Some(parser.advance().kind)
        } else {
            None
        };

        bases.push((access, parse_type(parser)?));

        if !parser.eat(TokenKind::Comma) {
            break;
        }
    }

    let span = parser.span_from(&start);
    Ok(parser.alloc(NodeKind::Derives(DerivesDecl { bases }), span))
}

/// `enum Color derives u8 { Red = 1, Green, Blue }`
pub fn parse_enum_decl(parser: &mut Parser, modifiers: Modifiers) -> ParseResult<NodeId> {
    let start = decl_start(parser, &modifiers);
    parser.expect(TokenKind::Enum)?;

    let name = parser.expect(TokenKind::Identifier)?.value;

    let derives = if parser.eat(TokenKind::Derives) {
        Some(parse_type(parser)?)
    } else {
        None
    };

    let members = parser.with_brace_expr(|parser| {
        parser.expect(TokenKind::OpenBrace)?;

        let mut members = vec![];
        while parser.has_tokens() && parser.current_kind() != TokenKind::CloseBrace {
            let member_start = parser.current().position.clone();
            let name = parser.expect(TokenKind::Identifier)?.value;

            let value = if parser.eat(TokenKind::Assign) {
                Some(parse_expr(parser)?)
            } else {
                None
            };

            let span = parser.span_from(&member_start);
            members.push(parser.alloc(NodeKind::EnumMember(EnumMember { name, value }), span));

            if !parser.eat(TokenKind::Comma) {
                break;
            }
        }

        parser.expect(TokenKind::CloseBrace)?;
        Ok(members)
    })?;

    let span = parser.span_from(&start);
    Ok(parser.alloc(
        NodeKind::Enum(EnumDecl {
            modifiers,
            name,
            derives,
            members,
        }),
        span,
    ))
}

/// `type Name requires <T> = T;`
pub fn parse_type_alias_decl(parser: &mut Parser, modifiers: Modifiers) -> ParseResult<NodeId> {
    let start = decl_start(parser, &modifiers);
    parser.expect(TokenKind::Type)?;

    let name = parser.expect(TokenKind::Identifier)?.value;

    let requires = if parser.current_kind() == TokenKind::Requires {
        Some(parse_requires(parser)?)
    } else {
        None
    };

    parser.expect(TokenKind::Assign)?;
    let ty = parse_type(parser)?;
    parser.expect(TokenKind::Semicolon)?;

    let span = parser.span_from(&start);
    Ok(parser.alloc(
        NodeKind::TypeAlias(TypeAliasDecl {
            modifiers,
            name,
            requires,
            ty,
        }),
        span,
    ))
}

// SCOPES

/// `ffi "c" <import or declaration>`
pub fn parse_ffi_decl(parser: &mut Parser, modifiers: Modifiers) -> ParseResult<NodeId> {
    let start = decl_start(parser, &modifiers);
    parser.expect(TokenKind::Ffi)?;

    let language = parser
        .expect_detailed(TokenKind::String, "expected a language string after 'ffi'")?
        .value;
    let language = String::from(language.trim_matches('"'));

    let target = if parser.current_kind() == TokenKind::Import {
        parse_import_stmt(parser)?
    } else {
        parse_decl(parser)?
    };

    let span = parser.span_from(&start);
    Ok(parser.alloc(
        NodeKind::Ffi(FfiDecl {
            modifiers,
            language,
            target,
        }),
        span,
    ))
}

/// `module a::b { decl* }`
pub fn parse_module_decl(parser: &mut Parser, modifiers: Modifiers) -> ParseResult<NodeId> {
    let start = decl_start(parser, &modifiers);
    parser.expect(TokenKind::Module)?;

    let name = parse_path_name(parser)?;
    let body = parse_decl_body(parser)?;

    let span = parser.span_from(&start);
    Ok(parser.alloc(
        NodeKind::Module(ModuleDecl {
            modifiers,
            name,
            body,
        }),
        span,
    ))
}

/// `extend Type derives Base { decl* }`
pub fn parse_extend_decl(parser: &mut Parser, modifiers: Modifiers) -> ParseResult<NodeId> {
    let start = decl_start(parser, &modifiers);
    parser.expect(TokenKind::Extend)?;

    let target = parse_type(parser)?;

    let derives = if parser.current_kind() == TokenKind::Derives {
        Some(parse_derives(parser)?)
    } else {
        None
    };

    let body = parse_decl_body(parser)?;

    let span = parser.span_from(&start);
    Ok(parser.alloc(
        NodeKind::Extend(ExtendDecl {
            modifiers,
            target,
            derives,
            body,
        }),
        span,
    ))
}
