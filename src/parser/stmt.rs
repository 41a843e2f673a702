//! Statement parsing.
//!
//! Statements start with a keyword looked up in `STMT_LOOKUP`; anything else
//! is an expression statement ending in `;`. Bodies are suites: a `{ ... }`
//! block, or `:` followed by a single declaration or statement.

use tracing::{trace, warn};

use crate::{
    ast::{
        ast::{Ast, NodeId, NodeKind},
        declarations::{LetDecl, Modifiers},
        expressions::ScopePathExpr,
        statements::{
            BlockStmt, CaseKind, CatchStmt, ElseKind, ElseStmt, ExpressionStmt, FinallyStmt,
            ForHead, ForStmt, IfKind, IfStmt, ImportSpec, ImportStmt, ImportTarget, NamedVar,
            ReturnStmt, SwitchCase, SwitchStmt, TryStmt, ValueStmt, WhileStmt,
        },
    },
    errors::errors::{ParseError, ParseErrorImpl, ParseResult},
    lexer::tokens::TokenKind,
    Position,
};

use super::{
    decl::{parse_const_decl, parse_decl, parse_let_decl, parse_var_decl},
    expr::{parse_expr, parse_ident_expr},
    lookups::STMT_LOOKUP,
    parser::Parser,
    types::parse_type,
};

/// The statement a clause keyword must follow.
fn clause_owner(kind: TokenKind) -> Option<&'static str> {
    match kind {
        TokenKind::Else => Some("'if' or 'unless'"),
        TokenKind::Case | TokenKind::Default => Some("'switch'"),
        TokenKind::Catch => Some("'try'"),
        _ => None,
    }
}

pub fn parse_stmt(parser: &mut Parser) -> ParseResult<NodeId> {
    let kind = parser.current_kind();

    if let Some(handler) = STMT_LOOKUP.get(&kind) {
        return handler(parser);
    }

    if let Some(expected) = clause_owner(kind) {
        let token = parser.current().clone();
        return Err(ParseError::new(
            ParseErrorImpl::DanglingClause {
                keyword: token.value.clone(),
                expected: String::from(expected),
            },
            token,
        ));
    }

    parse_expr_stmt(parser)
}

fn parse_expr_stmt(parser: &mut Parser) -> ParseResult<NodeId> {
    let start = parser.current().position.clone();
    let expr = parse_expr(parser)?;
    parser.expect(TokenKind::Semicolon)?;

    let span = parser.span_from(&start);
    Ok(parser.alloc(NodeKind::ExprStmt(ExpressionStmt { expr }), span))
}

/// `{ decl* }`
pub fn parse_block_stmt(parser: &mut Parser) -> ParseResult<NodeId> {
    let start = parser.current().position.clone();

    let body = parser.with_brace_expr(|parser| {
        parser.expect(TokenKind::OpenBrace)?;

        let mut body = vec![];
        while parser.has_tokens() && parser.current_kind() != TokenKind::CloseBrace {
            body.push(parse_decl(parser)?);
        }

        parser.expect(TokenKind::CloseBrace)?;
        Ok(body)
    })?;

    let span = parser.span_from(&start);
    Ok(parser.alloc(NodeKind::Block(BlockStmt { body }), span))
}

/// A block, or `:` and one declaration wrapped in a block.
pub fn parse_suite(parser: &mut Parser) -> ParseResult<NodeId> {
    match parser.current_kind() {
        TokenKind::OpenBrace => parse_block_stmt(parser),
        TokenKind::Colon => {
            let start = parser.advance().position;
            let decl = parser.with_brace_expr(parse_decl)?;

            let span = parser.span_from(&start);
            Ok(parser.alloc(NodeKind::Block(BlockStmt { body: vec![decl] }), span))
        }
        _ => Err(parser.error_here("expected a suite block or a single statement, '{' or ':'")),
    }
}

fn parse_condition(parser: &mut Parser) -> ParseResult<NodeId> {
    parser.without_brace_expr(parse_expr)
}

pub fn parse_if_stmt(parser: &mut Parser) -> ParseResult<NodeId> {
    parse_if_with(parser, false, false)
}

/// `if`/`unless` with its else chain. `has_const` and `has_eval` come from
/// modifiers already consumed by the declaration parser.
pub fn parse_if_with(parser: &mut Parser, has_const: bool, has_eval: bool) -> ParseResult<NodeId> {
    let start = parser.current().position.clone();
    let kind = match parser.advance().kind {
        TokenKind::Unless => IfKind::Unless,
        _ => IfKind::If,
    };

    let condition = parse_condition(parser)?;
    let body = parse_suite(parser)?;

    let mut else_bodies = vec![];
    let mut closed = false;

    while parser.current_kind() == TokenKind::Else {
        if closed {
            return Err(parser.error_here("redefinition of captured else block"));
        }

        let else_start = parser.advance().position;

        let (kind, condition) = match parser.current_kind() {
            TokenKind::If => {
                parser.advance();
                (ElseKind::ElseIf, Some(parse_condition(parser)?))
            }
            TokenKind::Unless => {
                parser.advance();
                (ElseKind::ElseUnless, Some(parse_condition(parser)?))
            }
            _ => {
                closed = true;
                (ElseKind::Else, None)
            }
        };

        let body = parse_suite(parser)?;

        let span = parser.span_from(&else_start);
        else_bodies.push(parser.alloc(
            NodeKind::Else(ElseStmt {
                kind,
                condition,
                body,
            }),
            span,
        ));
    }

    let span = parser.span_from(&start);
    Ok(parser.alloc(
        NodeKind::If(IfStmt {
            kind,
            condition,
            body,
            else_bodies,
            has_const,
            has_eval,
        }),
        span,
    ))
}

pub fn parse_while_stmt(parser: &mut Parser) -> ParseResult<NodeId> {
    let start = parser.current().position.clone();
    parser.expect(TokenKind::While)?;

    let condition = parse_condition(parser)?;
    let body = parse_suite(parser)?;

    let span = parser.span_from(&start);
    Ok(parser.alloc(NodeKind::While(WhileStmt { condition, body }), span))
}

/// `const? name (: Type)?`
pub fn parse_named_var(parser: &mut Parser) -> ParseResult<NodeId> {
    let start = parser.current().position.clone();
    let is_const = parser.eat(TokenKind::Const);
    let name = parser.expect(TokenKind::Identifier)?.value;

    let ty = if parser.eat(TokenKind::Colon) {
        Some(parse_type(parser)?)
    } else {
        None
    };

    let span = parser.span_from(&start);
    Ok(parser.alloc(NodeKind::NamedVar(NamedVar { name, ty, is_const }), span))
}

/// Parses both loop forms:
///
/// - `for a, b in items`, also written `for (a, b) in items` or
///   `for (a, b in items)`
/// - `for init; condition; update`, optionally in parentheses
///
/// The first form is tried when the head starts like a variable list. If
/// the list does not end at `in`, the parser backs up and reads the second
/// form instead, so `for i: int = 0; i < 3; i += 1` still parses.
pub fn parse_for_stmt(parser: &mut Parser) -> ParseResult<NodeId> {
    let start = parser.current().position.clone();
    parser.expect(TokenKind::For)?;

    let paren = parser.eat(TokenKind::OpenParen);
    let checkpoint = parser.checkpoint();
    let mut head = None;

    if starts_var_list(parser) {
        match parse_for_vars(parser) {
            Ok(vars) if at_python_in(parser, paren) => {
                head = Some(parse_python_tail(parser, vars, paren)?);
            }
            _ => {
                trace!("for head is not a for-in, reading it as init; condition; update");
                parser.restore(checkpoint);
            }
        }
    }

    let head = match head {
        Some(head) => head,
        None if paren => parse_c_head(parser, true)?,
        None => parser.without_brace_expr(|parser| parse_c_head(parser, false))?,
    };

    let body = parse_suite(parser)?;

    let span = parser.span_from(&start);
    Ok(parser.alloc(NodeKind::For(ForStmt { head, body }), span))
}

fn starts_var_list(parser: &Parser) -> bool {
    let offset = usize::from(parser.current_kind() == TokenKind::Const);

    parser.peek_kind(offset) == TokenKind::Identifier
        && matches!(
            parser.peek_kind(offset + 1),
            TokenKind::Comma | TokenKind::Colon | TokenKind::In
        )
}

fn at_python_in(parser: &Parser, paren: bool) -> bool {
    match parser.current_kind() {
        TokenKind::In => true,
        TokenKind::CloseParen => paren && parser.peek_kind(1) == TokenKind::In,
        _ => false,
    }
}

fn parse_for_vars(parser: &mut Parser) -> ParseResult<Vec<NodeId>> {
    let mut vars = vec![];

    loop {
        vars.push(parse_named_var(parser)?);

        if !parser.eat(TokenKind::Comma) {
            break;
        }
    }

    Ok(vars)
}

/// Names of typed variables in an unpacking loop head like `for a: int, b in xs`.
///
/// A single loop variable may carry a type; once there are several the
/// types are ignored and reported.
pub(crate) fn typed_unpacking_vars<'a>(ast: &'a Ast, vars: &[NodeId]) -> Vec<&'a str> {
    if vars.len() < 2 {
        return vec![];
    }

    vars.iter()
        .filter_map(|var| match ast.kind(*var) {
            NodeKind::NamedVar(NamedVar {
                name, ty: Some(_), ..
            }) => Some(name.as_str()),
            _ => None,
        })
        .collect()
}

fn parse_python_tail(
    parser: &mut Parser,
    vars: Vec<NodeId>,
    paren: bool,
) -> ParseResult<ForHead> {
    for name in typed_unpacking_vars(parser.ast(), &vars) {
        warn!(name = %name, "type annotation on an unpacking loop variable is ignored");
    }

    // `for (a, b) in xs` closes the parenthesis before `in`
    let closed = paren && parser.eat(TokenKind::CloseParen);
    parser.expect(TokenKind::In)?;

    let iterable = if paren && !closed {
        let iterable = parse_expr(parser)?;
        parser.expect(TokenKind::CloseParen)?;
        iterable
    } else {
        parse_condition(parser)?
    };

    Ok(ForHead::Python { vars, iterable })
}

fn parse_c_head(parser: &mut Parser, paren: bool) -> ParseResult<ForHead> {
    let init = match parser.current_kind() {
        TokenKind::Semicolon => {
            parser.advance();
            None
        }
        TokenKind::Let => Some(parse_let_decl(parser, Modifiers::default())?),
        TokenKind::Const => Some(parse_const_decl(parser, Modifiers::default())?),
        TokenKind::Identifier if parser.peek_kind(1) == TokenKind::Colon => {
            Some(parse_implicit_let(parser)?)
        }
        _ => Some(parse_expr_stmt(parser)?),
    };

    let condition = if parser.current_kind() == TokenKind::Semicolon {
        None
    } else {
        Some(parse_expr(parser)?)
    };
    parser.expect(TokenKind::Semicolon)?;

    let update_ends = if paren {
        parser.current_kind() == TokenKind::CloseParen
    } else {
        matches!(
            parser.current_kind(),
            TokenKind::OpenBrace | TokenKind::Colon
        )
    };

    let update = if update_ends {
        None
    } else {
        Some(parse_expr(parser)?)
    };

    if paren {
        parser.expect(TokenKind::CloseParen)?;
    }

    Ok(ForHead::CStyle {
        init,
        condition,
        update,
    })
}

/// `i: int = 0;` in a loop head, read as `let i: int = 0;`
fn parse_implicit_let(parser: &mut Parser) -> ParseResult<NodeId> {
    let start = parser.current().position.clone();
    let var = parse_var_decl(parser)?;
    parser.expect(TokenKind::Semicolon)?;

    let span = parser.span_from(&start);
    Ok(parser.alloc(
        NodeKind::Let(LetDecl {
            modifiers: Modifiers::default(),
            vars: vec![var],
        }),
        span,
    ))
}

/// `switch e { case ... }`, or `switch e: case ...` with a single case.
pub fn parse_switch_stmt(parser: &mut Parser) -> ParseResult<NodeId> {
    let start = parser.current().position.clone();
    parser.expect(TokenKind::Switch)?;

    let condition = parse_condition(parser)?;
    let mut cases = vec![];

    match parser.current_kind() {
        TokenKind::OpenBrace => {
            parser.advance();

            while parser.has_tokens() && parser.current_kind() != TokenKind::CloseBrace {
                cases.push(parse_case(parser)?);
            }

            parser.expect(TokenKind::CloseBrace)?;
        }
        TokenKind::Colon => {
            parser.advance();
            warn!("redundant switch statement with only one case");
            cases.push(parse_case(parser)?);
        }
        TokenKind::Semicolon => {
            return Err(parser.error_here("expected a scope with cases but found ';'"));
        }
        _ => return Err(parser.unexpected(TokenKind::OpenBrace)),
    }

    let span = parser.span_from(&start);
    Ok(parser.alloc(NodeKind::Switch(SwitchStmt { condition, cases }), span))
}

/// One case.
///
/// - `case e { }` is a plain case
/// - `case e: stmt` and `case e: { }` fall through
/// - `default { }`, `default: stmt` and `default: { }` are the default
///
/// A fallthrough `case e:` directly followed by another case has an empty
/// body.
fn parse_case(parser: &mut Parser) -> ParseResult<NodeId> {
    let start = parser.current().position.clone();

    let (mut kind, condition) = match parser.current_kind() {
        TokenKind::Case => {
            parser.advance();
            (CaseKind::Case, Some(parse_condition(parser)?))
        }
        TokenKind::Default => {
            parser.advance();
            (CaseKind::Default, None)
        }
        _ => return Err(parser.error_here("expected 'case' or 'default'")),
    };

    if parser.current_kind() == TokenKind::Colon {
        if kind == CaseKind::Case {
            kind = CaseKind::Fallthrough;
        }

        if parser.peek_kind(1) == TokenKind::OpenBrace {
            parser.advance();
        }
    } else if kind == CaseKind::Default && parser.current_kind() != TokenKind::OpenBrace {
        return Err(parser.error_here("expected '{', or ':' for default case"));
    }

    let body = if parser.current_kind() == TokenKind::Colon
        && matches!(
            parser.peek_kind(1),
            TokenKind::Case | TokenKind::Default | TokenKind::CloseBrace
        ) {
        let colon = parser.advance();
        parser.alloc(NodeKind::Block(BlockStmt { body: vec![] }), colon.span())
    } else {
        parse_suite(parser)?
    };

    let span = parser.span_from(&start);
    Ok(parser.alloc(
        NodeKind::Case(SwitchCase {
            kind,
            condition,
            body,
        }),
        span,
    ))
}

pub fn parse_try_stmt(parser: &mut Parser) -> ParseResult<NodeId> {
    let start = parser.current().position.clone();
    parser.expect(TokenKind::Try)?;

    let body = parse_suite(parser)?;

    let mut catches = vec![];
    while parser.current_kind() == TokenKind::Catch {
        catches.push(parse_catch(parser)?);
    }

    let finally = if parser.current_kind() == TokenKind::Finally {
        Some(parse_finally_stmt(parser)?)
    } else {
        None
    };

    if catches.is_empty() && finally.is_none() {
        return Err(parser.error_here("expected 'catch' or 'finally' after a try block"));
    }

    let span = parser.span_from(&start);
    Ok(parser.alloc(
        NodeKind::Try(TryStmt {
            body,
            catches,
            finally,
        }),
        span,
    ))
}

/// `catch`, `catch Type`, `catch e: Type`, each optionally in parentheses.
fn parse_catch(parser: &mut Parser) -> ParseResult<NodeId> {
    let start = parser.current().position.clone();
    parser.expect(TokenKind::Catch)?;

    let paren = parser.eat(TokenKind::OpenParen);

    let binding = match parser.current_kind() {
        TokenKind::OpenBrace | TokenKind::Colon if !paren => None,
        TokenKind::Identifier if parser.peek_kind(1) == TokenKind::Colon => {
            Some(parse_named_var(parser)?)
        }
        _ => Some(parse_type(parser)?),
    };

    if paren {
        parser.expect(TokenKind::CloseParen)?;
    }

    let body = parse_suite(parser)?;

    let span = parser.span_from(&start);
    Ok(parser.alloc(NodeKind::Catch(CatchStmt { binding, body }), span))
}

pub fn parse_finally_stmt(parser: &mut Parser) -> ParseResult<NodeId> {
    let start = parser.current().position.clone();
    parser.expect(TokenKind::Finally)?;
    let body = parse_suite(parser)?;

    let span = parser.span_from(&start);
    Ok(parser.alloc(NodeKind::Finally(FinallyStmt { body }), span))
}

/// `keyword value ;`
fn parse_value_stmt(parser: &mut Parser) -> ParseResult<(NodeId, Position)> {
    let start = parser.advance().position;
    let value = parse_expr(parser)?;
    parser.expect(TokenKind::Semicolon)?;
    Ok((value, start))
}

pub fn parse_panic_stmt(parser: &mut Parser) -> ParseResult<NodeId> {
    let (value, start) = parse_value_stmt(parser)?;
    let span = parser.span_from(&start);
    Ok(parser.alloc(NodeKind::Panic(ValueStmt { value }), span))
}

pub fn parse_yield_stmt(parser: &mut Parser) -> ParseResult<NodeId> {
    let (value, start) = parse_value_stmt(parser)?;
    let span = parser.span_from(&start);
    Ok(parser.alloc(NodeKind::Yield(ValueStmt { value }), span))
}

pub fn parse_delete_stmt(parser: &mut Parser) -> ParseResult<NodeId> {
    let (value, start) = parse_value_stmt(parser)?;
    let span = parser.span_from(&start);
    Ok(parser.alloc(NodeKind::Delete(ValueStmt { value }), span))
}

pub fn parse_return_stmt(parser: &mut Parser) -> ParseResult<NodeId> {
    let start = parser.current().position.clone();
    parser.expect(TokenKind::Return)?;

    let value = if parser.current_kind() == TokenKind::Semicolon {
        None
    } else {
        Some(parse_expr(parser)?)
    };
    parser.expect(TokenKind::Semicolon)?;

    let span = parser.span_from(&start);
    Ok(parser.alloc(NodeKind::Return(ReturnStmt { value }), span))
}

pub fn parse_break_stmt(parser: &mut Parser) -> ParseResult<NodeId> {
    let start = parser.current().position.clone();
    parser.expect(TokenKind::Break)?;
    parser.expect(TokenKind::Semicolon)?;

    let span = parser.span_from(&start);
    Ok(parser.alloc(NodeKind::Break, span))
}

pub fn parse_continue_stmt(parser: &mut Parser) -> ParseResult<NodeId> {
    let start = parser.current().position.clone();
    parser.expect(TokenKind::Continue)?;
    parser.expect(TokenKind::Semicolon)?;

    let span = parser.span_from(&start);
    Ok(parser.alloc(NodeKind::Continue, span))
}

// IMPORTS

fn invalid_import(parser: &Parser, message: &str) -> ParseError {
    ParseError::new(
        ParseErrorImpl::InvalidImport {
            message: String::from(message),
        },
        parser.current().clone(),
    )
}

/// `import module? spec ;`
pub fn parse_import_stmt(parser: &mut Parser) -> ParseResult<NodeId> {
    let start = parser.current().position.clone();
    parser.expect(TokenKind::Import)?;

    let explicit_module = parser.eat(TokenKind::Module);
    let spec = parse_import_spec(parser, false)?;
    parser.expect(TokenKind::Semicolon)?;

    let span = parser.span_from(&start);
    Ok(parser.alloc(
        NodeKind::Import(ImportStmt {
            explicit_module,
            spec,
        }),
        span,
    ))
}

/// A module path or file, then `::*`, `::{ items }` or `as alias`.
fn parse_import_spec(parser: &mut Parser, nested: bool) -> ParseResult<NodeId> {
    let start = parser.current().position.clone();

    let target = match parser.current_kind() {
        TokenKind::String => {
            if nested {
                return Err(invalid_import(
                    parser,
                    "file imports are not allowed inside an import list",
                ));
            }

            let token = parser.current().clone();
            if token.value.starts_with('f') {
                return Err(invalid_import(parser, "file paths cannot be f-strings"));
            }

            parser.advance();
            let path = token
                .value
                .trim_start_matches(|c: char| c.is_ascii_alphabetic())
                .trim_matches('"');
            ImportTarget::File(String::from(path))
        }
        TokenKind::Identifier | TokenKind::PrimitiveType | TokenKind::Scope => {
            ImportTarget::Path(parse_import_path(parser)?)
        }
        _ => return Err(parser.unexpected(TokenKind::Identifier)),
    };

    let is_file = matches!(target, ImportTarget::File(_));
    let mut wildcard = false;
    let mut items = vec![];

    if parser.current_kind() == TokenKind::Scope {
        match parser.peek_kind(1) {
            TokenKind::Mul => {
                if is_file {
                    return Err(invalid_import(parser, "wildcards cannot be used on a file import"));
                }

                parser.advance();
                parser.advance();
                wildcard = true;
            }
            TokenKind::OpenBrace => {
                if is_file {
                    return Err(invalid_import(parser, "file imports cannot list items"));
                }

                parser.advance();
                parser.advance();

                while parser.has_tokens() && parser.current_kind() != TokenKind::CloseBrace {
                    items.push(parse_import_spec(parser, true)?);

                    if !parser.eat(TokenKind::Comma) {
                        break;
                    }
                }

                parser.expect(TokenKind::CloseBrace)?;
            }
            _ => return Err(parser.error_here("expected '*' or '{' after '::' in an import")),
        }
    }

    let alias = if parser.current_kind() == TokenKind::As {
        if wildcard {
            return Err(invalid_import(parser, "wildcard imports cannot be aliased"));
        }

        parser.advance();
        Some(parser.expect(TokenKind::Identifier)?.value)
    } else {
        None
    };

    let span = parser.span_from(&start);
    Ok(parser.alloc(
        NodeKind::ImportSpec(ImportSpec {
            target,
            wildcard,
            items,
            alias,
        }),
        span,
    ))
}

/// `a::b::c`, stopping in front of `::*` and `::{`.
fn parse_import_path(parser: &mut Parser) -> ParseResult<NodeId> {
    let start = parser.current().position.clone();
    let global = parser.eat(TokenKind::Scope);

    let mut segments = vec![parse_import_segment(parser)?];

    while parser.current_kind() == TokenKind::Scope
        && matches!(
            parser.peek_kind(1),
            TokenKind::Identifier | TokenKind::PrimitiveType
        )
    {
        parser.advance();
        segments.push(parse_import_segment(parser)?);
    }

    if segments.len() == 1 && !global {
        return Ok(segments[0]);
    }

    let span = parser.span_from(&start);
    Ok(parser.alloc(NodeKind::ScopePath(ScopePathExpr { segments, global }), span))
}

fn parse_import_segment(parser: &mut Parser) -> ParseResult<NodeId> {
    match parser.current_kind() {
        TokenKind::Identifier | TokenKind::PrimitiveType => parse_ident_expr(parser),
        _ => Err(parser.unexpected(TokenKind::Identifier)),
    }
}
