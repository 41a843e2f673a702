//! Type annotation parsing.
//!
//! Types are written `qualifiers* (* | &)* base (::<generics>)? ?`, where the
//! base is a name, a scope path, a tuple of types or `fn (A) -> R`.
//! Generic arguments always use the turbofish, so `Vec<int>` in type
//! position is rejected with a suggestion.

use crate::{
    ast::{
        ast::{NodeId, NodeKind, NodeTag},
        expressions::{CollectionExpr, GenericInvokeExpr},
        types::{FnPointerType, TypeExpr},
    },
    errors::errors::{ParseError, ParseErrorImpl, ParseResult},
    lexer::tokens::TokenKind,
};

use super::{
    expr::{parse_global_scope_expr, parse_ident_expr, parse_scope_expr},
    hints,
    lookups::is_type_qualifier,
    parser::Parser,
};

fn invalid_type(parser: &Parser, message: &str) -> ParseError {
    ParseError::new(
        ParseErrorImpl::InvalidType {
            message: String::from(message),
        },
        parser.current().clone(),
    )
}

/// Whether `kind` can start a type.
fn starts_type(kind: TokenKind) -> bool {
    is_type_qualifier(kind)
        || matches!(
            kind,
            TokenKind::Identifier
                | TokenKind::PrimitiveType
                | TokenKind::Mul
                | TokenKind::BitAnd
                | TokenKind::Fn
                | TokenKind::OpenParen
                | TokenKind::Scope
        )
}

pub fn parse_type(parser: &mut Parser) -> ParseResult<NodeId> {
    let start = parser.current().position.clone();

    let mut specifiers = vec![];
    while is_type_qualifier(parser.current_kind()) {
        specifiers.push(parser.advance());
    }

    let mut pointers = vec![];
    loop {
        match parser.current_kind() {
            TokenKind::Mul | TokenKind::BitAnd | TokenKind::LogicalAnd => {
                pointers.push(parser.advance())
            }
            TokenKind::Sub
            | TokenKind::Not
            | TokenKind::BitNot
            | TokenKind::Increment
            | TokenKind::Decrement
            | TokenKind::Pow => {
                return Err(invalid_type(parser, "invalid type operator")
                    .with_fix("only '*' and '&' may prefix a type"));
            }
            _ => break,
        }
    }

    let mut grouped = false;
    let base = match parser.current_kind() {
        TokenKind::Fn => parse_fn_pointer(parser)?,
        TokenKind::OpenParen => {
            let base = parse_tuple_type(parser)?;
            grouped = parser.ast().kind(base).tag() != NodeTag::Tuple;
            base
        }
        TokenKind::Identifier | TokenKind::PrimitiveType => {
            let name_start = parser.current().position.clone();
            let name = parse_ident_expr(parser)?;
            parse_scope_expr(parser, Some(name), name_start, false)?
        }
        TokenKind::Scope => parse_global_scope_expr(parser)?,
        found => {
            let message = format!("expected a type but found '{}'", parser.current().value);
            return Err(invalid_type(parser, &message).with_fix(hints::for_type(found)));
        }
    };

    let generics = if parser.current_kind() == TokenKind::Scope
        && parser.peek_kind(1) == TokenKind::Less
    {
        parser.advance();
        Some(parse_generic_invoke(parser)?)
    } else {
        None
    };

    let mut nullable = false;

    // an owed '>' means an enclosing generic list is still being closed
    if !parser.pending_gt {
        match parser.current_kind() {
            TokenKind::OpenParen => {
                return Err(invalid_type(
                    parser,
                    "expected a type, but found a function call",
                ));
            }
            TokenKind::OpenBracket => {
                return Err(invalid_type(parser, "array syntax is not a type")
                    .with_fix(hints::for_type(TokenKind::OpenBracket)));
            }
            TokenKind::Less if looks_like_generics(parser) => {
                return Err(invalid_type(parser, "generic arguments need a turbofish")
                    .with_fix(hints::for_type(TokenKind::Less)));
            }
            TokenKind::Question => {
                parser.advance();
                nullable = true;
            }
            _ => {}
        }
    }

    if grouped && specifiers.is_empty() && pointers.is_empty() && generics.is_none() && !nullable
    {
        return Ok(base);
    }

    let span = parser.span_from(&start);
    Ok(parser.alloc(
        NodeKind::Type(TypeExpr {
            specifiers,
            pointers,
            base,
            generics,
            nullable,
        }),
        span,
    ))
}

/// `Name<T>` written without `::`. Only flagged when the tokens after `<`
/// read as a type list, so `x as int < y` is still a comparison.
fn looks_like_generics(parser: &Parser) -> bool {
    starts_type(parser.peek_kind(1))
        && matches!(
            parser.peek_kind(2),
            TokenKind::Greater
                | TokenKind::RightShift
                | TokenKind::Comma
                | TokenKind::Less
                | TokenKind::Scope
        )
}

/// `(T)` is `T`, `(T, U)` is a tuple type.
fn parse_tuple_type(parser: &mut Parser) -> ParseResult<NodeId> {
    let start = parser.current().position.clone();
    parser.expect(TokenKind::OpenParen)?;

    if parser.current_kind() == TokenKind::CloseParen {
        return Err(invalid_type(parser, "empty tuple types are not allowed"));
    }

    let first = parse_type(parser)?;

    if parser.current_kind() != TokenKind::Comma {
        parser.expect(TokenKind::CloseParen)?;
        return Ok(first);
    }

    let mut elements = vec![first];
    while parser.eat(TokenKind::Comma) {
        if parser.current_kind() == TokenKind::CloseParen {
            break;
        }
        elements.push(parse_type(parser)?);
    }

    parser.expect(TokenKind::CloseParen)?;

    let span = parser.span_from(&start);
    Ok(parser.alloc(NodeKind::Tuple(CollectionExpr { elements }), span))
}

/// `fn (A, B) -> R`
fn parse_fn_pointer(parser: &mut Parser) -> ParseResult<NodeId> {
    let start = parser.current().position.clone();
    parser.expect(TokenKind::Fn)?;
    parser.expect(TokenKind::OpenParen)?;

    let mut params = vec![];
    while parser.has_tokens() && parser.current_kind() != TokenKind::CloseParen {
        params.push(parse_type(parser)?);

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

    let span = parser.span_from(&start);
    Ok(parser.alloc(
        NodeKind::FnPointer(FnPointerType { params, returns }),
        span,
    ))
}

/// Parses `<T, U>` after a `::`.
///
/// A `>>` closing two lists at once is consumed by the inner list, which
/// leaves `pending_gt` set for the outer one.
pub fn parse_generic_invoke(parser: &mut Parser) -> ParseResult<NodeId> {
    let start = parser.current().position.clone();
    parser.expect(TokenKind::Less)?;

    parser.generic_depth += 1;
    let args = parse_generic_args(parser);
    parser.generic_depth -= 1;
    let args = args?;

    let span = parser.span_from(&start);
    Ok(parser.alloc(
        NodeKind::GenericInvoke(GenericInvokeExpr { args }),
        span,
    ))
}

fn parse_generic_args(parser: &mut Parser) -> ParseResult<Vec<NodeId>> {
    let mut args = vec![];
    loop {
        args.push(parse_type(parser)?);

        if parser.pending_gt || !parser.eat(TokenKind::Comma) {
            break;
        }
    }

    close_generic_list(parser)?;
    Ok(args)
}

/// Consumes the `>` ending the innermost open list.
///
/// Must be called while the list still counts in `generic_depth`. The
/// outermost list never splits a `>>`.
pub(crate) fn close_generic_list(parser: &mut Parser) -> ParseResult<()> {
    if parser.pending_gt {
        parser.pending_gt = false;
    } else if parser.current_kind() == TokenKind::RightShift && parser.generic_depth > 1 {
        parser.advance();
        parser.pending_gt = true;
    } else {
        parser.expect(TokenKind::Greater)?;
    }

    Ok(())
}
