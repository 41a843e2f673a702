//! Expression parsing.
//!
//! Expressions are parsed in two layers. `parse_operand` builds a primary
//! expression through `NUD_LOOKUP` and then applies postfix forms (calls,
//! indexing, member and scope access, turbofish, object initializers,
//! casts, `++`/`--`). `parse_expr` combines operands with binary operators
//! by precedence climbing and handles the ternaries and `has`/`derives`
//! checks that may follow a complete operand.
//!
//! Both loops are capped at `remaining tokens * expr_iteration_factor`
//! iterations.

use tracing::trace;

use crate::{
    ast::{
        ast::{NodeId, NodeKind, NodeTag},
        declarations::Modifiers,
        expressions::{
            ArgumentExpr, ArgumentKind, AsyncKind, AsyncThreadingExpr, BinaryExpr, CallExpr,
            CastExpr, CollectionExpr, DotPathExpr, Fixity, IdentExpr, IndexExpr, InstOfExpr,
            InstOfKind, LambdaExpr, LiteralExpr, LiteralKind, MapExpr, ObjInitExpr,
            ParenthesizedExpr, ScopePathExpr, TernaryExpr, TernaryKind, UnaryExpr,
        },
        types::TypeExpr,
    },
    config::Origin,
    errors::errors::{ParseError, ParseErrorImpl, ParseResult},
    lexer::tokens::{unescape, Token, TokenKind},
    Position,
};

use super::{
    decl::parse_function,
    hints,
    lookups::{binding_power, is_binary_operator, is_postfix_operator, BindingPower, NUD_LOOKUP},
    parser::Parser,
    types::{parse_generic_invoke, parse_type},
};

/// Parses a complete expression.
pub fn parse_expr(parser: &mut Parser) -> ParseResult<NodeId> {
    let limit = iteration_limit(parser);
    let mut steps = 0;
    let mut lhs = parse_operand(parser)?;

    loop {
        steps += 1;
        if steps > limit {
            return Err(too_long(parser));
        }

        lhs = match parser.current_kind() {
            kind if is_binary_operator(kind) => {
                parse_binary(parser, lhs, BindingPower::Assignment)?
            }
            TokenKind::Question => parse_ternary(parser, lhs)?,
            TokenKind::If => parse_if_ternary(parser, lhs)?,
            TokenKind::Has | TokenKind::Derives => parse_inst_of(parser, lhs)?,
            _ => break,
        };
    }

    Ok(lhs)
}

/// Parses a primary expression followed by any postfix forms.
pub fn parse_operand(parser: &mut Parser) -> ParseResult<NodeId> {
    let limit = iteration_limit(parser);
    let mut steps = 0;
    let mut lhs = parse_primary(parser)?;

    loop {
        steps += 1;
        if steps > limit {
            return Err(too_long(parser));
        }

        lhs = match parser.current_kind() {
            TokenKind::OpenParen => parse_call(parser, lhs, None)?,
            TokenKind::OpenBracket => parse_index(parser, lhs)?,
            TokenKind::Dot => parse_dot(parser, lhs)?,
            TokenKind::Scope if parser.peek_kind(1) == TokenKind::Less => {
                parse_turbofish(parser, lhs)?
            }
            TokenKind::Scope => {
                let start = start_of(parser, lhs);
                parse_scope_expr(parser, Some(lhs), start, false)?
            }
            TokenKind::OpenBrace if starts_obj_init(parser, lhs) => {
                parse_obj_init(parser, Some(lhs))?
            }
            TokenKind::As => parse_cast(parser, lhs)?,
            kind if is_postfix_operator(kind) => parse_postfix(parser, lhs)?,
            _ => break,
        };
    }

    Ok(lhs)
}

/// Dispatches on the current token to the matching NUD handler.
pub fn parse_primary(parser: &mut Parser) -> ParseResult<NodeId> {
    let kind = parser.current_kind();

    match NUD_LOOKUP.get(&kind) {
        Some(handler) => handler(parser),
        None => {
            let token = parser.current().clone();
            let mut error = ParseError::new(
                ParseErrorImpl::ExpectedExpression {
                    token: token.value.clone(),
                },
                token,
            );

            if let Some(hint) = hints::for_expression(kind) {
                error = error.with_fix(hint);
            }

            Err(error)
        }
    }
}

fn iteration_limit(parser: &Parser) -> usize {
    parser.remaining() * parser.config().expr_iteration_factor
}

fn too_long(parser: &Parser) -> ParseError {
    ParseError::new(ParseErrorImpl::ExpressionTooLong, parser.current().clone())
}

fn blank_literal(parser: &Parser, message: &str) -> ParseError {
    ParseError::new(
        ParseErrorImpl::BlankLiteral {
            message: String::from(message),
        },
        parser.current().clone(),
    )
}

fn start_of(parser: &Parser, id: NodeId) -> Position {
    parser.ast().span(id).start.clone()
}

/// Precedence climbing over binary operators whose binding power is at
/// least `min`.
///
/// The right operand of an assignment is a whole expression, so
/// assignments associate to the right and may hold a ternary.
pub fn parse_binary(
    parser: &mut Parser,
    mut lhs: NodeId,
    min: BindingPower,
) -> ParseResult<NodeId> {
    while is_binary_operator(parser.current_kind()) && binding_power(parser.current_kind()) >= min
    {
        let op = parser.advance();
        let op_bp = binding_power(op.kind);

        let rhs = if op_bp == BindingPower::Assignment {
            parse_expr(parser)?
        } else {
            let mut rhs = parse_operand(parser)?;

            while is_binary_operator(parser.current_kind())
                && binding_power(parser.current_kind()) > op_bp
            {
                let next = binding_power(parser.current_kind());
                rhs = parse_binary(parser, rhs, next)?;
            }

            rhs
        };

        lhs = make_binary(parser, lhs, op, rhs);
    }

    Ok(lhs)
}

/// Builds the node for `lhs op rhs`. `a in b` becomes `b.contains(a)`.
fn make_binary(parser: &mut Parser, lhs: NodeId, op: Token, rhs: NodeId) -> NodeId {
    let lhs_span = parser.ast().span(lhs).clone();
    let rhs_span = parser.ast().span(rhs).clone();
    let span = lhs_span.to(&rhs_span);

    if op.kind != TokenKind::In {
        return parser.alloc(NodeKind::Binary(BinaryExpr { lhs, op, rhs }), span);
    }

    trace!("rewriting 'in' to a contains call");

    let method = parser.alloc(
        NodeKind::Ident(IdentExpr {
            name: String::from("contains"),
            is_reserved_primitive: false,
        }),
        op.span(),
    );
    let path = parser.alloc(
        NodeKind::DotPath(DotPathExpr { lhs: rhs, rhs: method }),
        rhs_span,
    );
    let argument = parser.alloc(
        NodeKind::Argument(ArgumentExpr {
            kind: ArgumentKind::Positional,
            name: None,
            value: lhs,
        }),
        lhs_span,
    );

    parser.alloc(
        NodeKind::Call(CallExpr {
            path,
            generics: None,
            args: vec![argument],
        }),
        span,
    )
}

/// `cond ? a : b`
fn parse_ternary(parser: &mut Parser, condition: NodeId) -> ParseResult<NodeId> {
    let start = start_of(parser, condition);
    parser.expect(TokenKind::Question)?;

    let if_true = parse_expr(parser)?;
    parser.expect(TokenKind::Colon)?;
    let if_false = parse_expr(parser)?;

    let span = parser.span_from(&start);
    Ok(parser.alloc(
        NodeKind::Ternary(TernaryExpr {
            kind: TernaryKind::Question,
            condition,
            if_true,
            if_false,
        }),
        span,
    ))
}

/// `a if cond else b`
fn parse_if_ternary(parser: &mut Parser, if_true: NodeId) -> ParseResult<NodeId> {
    let start = start_of(parser, if_true);
    parser.expect(TokenKind::If)?;

    let condition = parse_expr(parser)?;
    parser.expect(TokenKind::Else)?;
    let if_false = parse_expr(parser)?;

    let span = parser.span_from(&start);
    Ok(parser.alloc(
        NodeKind::Ternary(TernaryExpr {
            kind: TernaryKind::Inline,
            condition,
            if_true,
            if_false,
        }),
        span,
    ))
}

fn parse_inst_of(parser: &mut Parser, value: NodeId) -> ParseResult<NodeId> {
    let start = start_of(parser, value);
    let kind = match parser.advance().kind {
        TokenKind::Has => InstOfKind::Has,
        _ => InstOfKind::Derives,
    };

    let target = parse_type(parser)?;

    let span = parser.span_from(&start);
    Ok(parser.alloc(
        NodeKind::InstOf(InstOfExpr {
            value,
            kind,
            target,
        }),
        span,
    ))
}

fn parse_cast(parser: &mut Parser, value: NodeId) -> ParseResult<NodeId> {
    let start = start_of(parser, value);
    parser.expect(TokenKind::As)?;
    let target = parse_type(parser)?;

    let span = parser.span_from(&start);
    Ok(parser.alloc(NodeKind::Cast(CastExpr { value, target }), span))
}

fn parse_postfix(parser: &mut Parser, operand: NodeId) -> ParseResult<NodeId> {
    let start = start_of(parser, operand);
    let op = parser.advance();

    let span = parser.span_from(&start);
    Ok(parser.alloc(
        NodeKind::Unary(UnaryExpr {
            operand,
            op,
            fixity: Fixity::Postfix,
        }),
        span,
    ))
}

/// `path(args)`, with the generics of a preceding turbofish if any.
fn parse_call(
    parser: &mut Parser,
    path: NodeId,
    generics: Option<NodeId>,
) -> ParseResult<NodeId> {
    let start = start_of(parser, path);

    let args = parser.with_brace_expr(|parser| {
        parser.expect(TokenKind::OpenParen)?;

        let mut args = vec![];
        while parser.has_tokens() && parser.current_kind() != TokenKind::CloseParen {
            args.push(parse_argument(parser)?);

            if !parser.eat(TokenKind::Comma) {
                break;
            }
        }

        parser.expect(TokenKind::CloseParen)?;
        Ok(args)
    })?;

    let span = parser.span_from(&start);
    Ok(parser.alloc(
        NodeKind::Call(CallExpr {
            path,
            generics,
            args,
        }),
        span,
    ))
}

/// A call argument, `name = value` for keyword arguments.
fn parse_argument(parser: &mut Parser) -> ParseResult<NodeId> {
    let start = parser.current().position.clone();

    let (kind, name) = if parser.current_kind() == TokenKind::Identifier
        && parser.peek_kind(1) == TokenKind::Assign
    {
        let name = parser.advance().value;
        parser.advance();
        (ArgumentKind::Keyword, Some(name))
    } else {
        (ArgumentKind::Positional, None)
    };

    let value = parse_expr(parser)?;

    let span = parser.span_from(&start);
    Ok(parser.alloc(NodeKind::Argument(ArgumentExpr { kind, name, value }), span))
}

fn parse_index(parser: &mut Parser, lhs: NodeId) -> ParseResult<NodeId> {
    let start = start_of(parser, lhs);

    let index = parser.with_brace_expr(|parser| {
        parser.expect(TokenKind::OpenBracket)?;
        let index = parse_expr(parser)?;
        parser.expect(TokenKind::CloseBracket)?;
        Ok(index)
    })?;

    let span = parser.span_from(&start);
    Ok(parser.alloc(NodeKind::Index(IndexExpr { lhs, index }), span))
}

/// `lhs.name`, or `lhs.0` for tuple fields
fn parse_dot(parser: &mut Parser, lhs: NodeId) -> ParseResult<NodeId> {
    let start = start_of(parser, lhs);
    parser.expect(TokenKind::Dot)?;

    let rhs = match parser.current_kind() {
        TokenKind::Identifier | TokenKind::PrimitiveType => parse_ident_expr(parser)?,
        TokenKind::Integer => parse_literal_expr(parser)?,
        _ => return Err(parser.unexpected(TokenKind::Identifier)),
    };

    let span = parser.span_from(&start);
    Ok(parser.alloc(NodeKind::DotPath(DotPathExpr { lhs, rhs }), span))
}

fn parse_path_segment(parser: &mut Parser) -> ParseResult<NodeId> {
    match parser.current_kind() {
        TokenKind::Identifier | TokenKind::PrimitiveType => parse_ident_expr(parser),
        _ => Err(parser.unexpected(TokenKind::Identifier)),
    }
}

/// Consumes `::name` segments after `first`.
///
/// Stops in front of a `::<` so the turbofish is parsed by the caller. A
/// single segment without a leading `::` is returned as is.
pub fn parse_scope_expr(
    parser: &mut Parser,
    first: Option<NodeId>,
    start: Position,
    global: bool,
) -> ParseResult<NodeId> {
    let mut segments: Vec<NodeId> = first.into_iter().collect();

    while parser.current_kind() == TokenKind::Scope {
        parser.advance();

        if parser.current_kind() == TokenKind::Less {
            parser.reverse(1);
            break;
        }

        segments.push(parse_path_segment(parser)?);
    }

    if segments.is_empty() {
        return Err(parser.error_here("expected a name after '::'"));
    }

    if segments.len() == 1 && !global {
        return Ok(segments[0]);
    }

    let span = parser.span_from(&start);
    Ok(parser.alloc(NodeKind::ScopePath(ScopePathExpr { segments, global }), span))
}

/// `path::<T, U>` followed by a call, or used as a type.
fn parse_turbofish(parser: &mut Parser, path: NodeId) -> ParseResult<NodeId> {
    let start = start_of(parser, path);
    parser.expect(TokenKind::Scope)?;
    let generics = parse_generic_invoke(parser)?;

    if parser.current_kind() == TokenKind::OpenParen {
        return parse_call(parser, path, Some(generics));
    }

    let span = parser.span_from(&start);
    Ok(parser.alloc(
        NodeKind::Type(TypeExpr {
            specifiers: vec![],
            pointers: vec![],
            base: path,
            generics: Some(generics),
            nullable: false,
        }),
        span,
    ))
}

/// Whether the `{` after `lhs` opens an object initializer.
///
/// Needs a path on the left and either `}` or `name =` after the brace,
/// and is disabled inside conditions.
fn starts_obj_init(parser: &Parser, lhs: NodeId) -> bool {
    if !parser.allow_brace_expr || parser.current_kind() != TokenKind::OpenBrace {
        return false;
    }

    let is_path = matches!(
        parser.ast().kind(lhs).tag(),
        NodeTag::Ident | NodeTag::ScopePath | NodeTag::DotPath | NodeTag::Type
    );

    is_path
        && (parser.peek_kind(1) == TokenKind::CloseBrace
            || (parser.peek_kind(1) == TokenKind::Identifier
                && parser.peek_kind(2) == TokenKind::Assign))
}

/// `Path { a = 1, b = 2 }` or, without a path, `{ .a = 1, .b = 2 }`.
fn parse_obj_init(parser: &mut Parser, path: Option<NodeId>) -> ParseResult<NodeId> {
    let start = match path {
        Some(path) => start_of(parser, path),
        None => parser.current().position.clone(),
    };
    let anonymous = path.is_none();

    let fields = parser.with_brace_expr(|parser| {
        parser.expect(TokenKind::OpenBrace)?;

        let mut fields = vec![];
        while parser.has_tokens() && parser.current_kind() != TokenKind::CloseBrace {
            fields.push(parse_field_init(parser, anonymous)?);

            if !parser.eat(TokenKind::Comma) {
                break;
            }
        }

        parser.expect(TokenKind::CloseBrace)?;
        Ok(fields)
    })?;

    let span = parser.span_from(&start);
    Ok(parser.alloc(NodeKind::ObjInit(ObjInitExpr { path, fields }), span))
}

fn parse_field_init(parser: &mut Parser, anonymous: bool) -> ParseResult<NodeId> {
    let start = parser.current().position.clone();

    if anonymous {
        parser.expect(TokenKind::Dot)?;
    }

    let name = parser.expect(TokenKind::Identifier)?.value;
    parser.expect(TokenKind::Assign)?;
    let value = parse_expr(parser)?;

    let span = parser.span_from(&start);
    Ok(parser.alloc(
        NodeKind::Argument(ArgumentExpr {
            kind: ArgumentKind::Keyword,
            name: Some(name),
            value,
        }),
        span,
    ))
}

// NUD HANDLERS

pub fn parse_literal_expr(parser: &mut Parser) -> ParseResult<NodeId> {
    let token = parser.advance();

    let kind = match token.kind {
        TokenKind::Integer => LiteralKind::Integer,
        TokenKind::Float => LiteralKind::Float,
        TokenKind::True | TokenKind::False => LiteralKind::Bool,
        TokenKind::Null => LiteralKind::Null,
        TokenKind::String | TokenKind::Char => return parse_text_literal(parser, token),
        _ => return Err(crate::MK_PARSE_ERROR!(token, "expected a literal")),
    };

    let span = token.span();
    Ok(parser.alloc(NodeKind::Literal(LiteralExpr::new(kind, token.value)), span))
}

/// Splits the prefix letter off a string or char token.
fn split_prefix(value: &str) -> (Option<char>, String) {
    let mut chars = value.chars();

    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() => (Some(c), String::from(chars.as_str())),
        _ => (None, String::from(value)),
    }
}

fn parse_text_literal(parser: &mut Parser, token: Token) -> ParseResult<NodeId> {
    let (prefix, mut text) = split_prefix(&token.value);
    let is_format = prefix == Some('f');

    let kind = if token.kind == TokenKind::Char {
        LiteralKind::Char
    } else {
        LiteralKind::String
    };

    if kind == LiteralKind::Char && unescape(&text[1..text.len() - 1]).chars().count() != 1 {
        return Err(crate::MK_PARSE_ERROR!(
            token,
            "a char literal holds exactly one character"
        ));
    }

    // "a" "b" is "ab"; f-strings are never joined so their spans keep
    // their positions
    if kind == LiteralKind::String && !is_format {
        while parser.current_kind() == TokenKind::String {
            let (next_prefix, next_text) = split_prefix(&parser.current().value);
            if next_prefix != prefix {
                break;
            }

            text.pop();
            text.push_str(&next_text[1..]);
            parser.advance();
        }
    }

    if kind == LiteralKind::String && parser.current_kind() == TokenKind::String {
        let error = crate::MK_PARSE_ERROR!(
            parser.current().clone(),
            "only unprefixed or same-prefix string literals can be joined"
        );
        return Err(error.with_fix("use the same prefix on both literals, or join them with '+'"));
    }

    let mut literal = LiteralExpr::new(kind, text);
    literal.prefix = prefix;

    if is_format {
        interpolate(parser, &token, &mut literal)?;
    }

    let span = parser.span_from(&token.position);
    Ok(parser.alloc(NodeKind::Literal(literal), span))
}

/// Parses the `{...}` spans of an f-string into format arguments.
///
/// Each span is lexed at its own position in the file and parsed as an
/// expression. The spans are emptied out of the stored text, then bare
/// braces get a `\\` in front and escaped braces lose their backslash.
fn interpolate(parser: &mut Parser, token: &Token, literal: &mut LiteralExpr) -> ParseResult<()> {
    let malformed = |message: &str| {
        ParseError::new(
            ParseErrorImpl::MalformedFormatString {
                message: String::from(message),
            },
            token.clone(),
        )
    };

    let chars: Vec<char> = literal.value.chars().collect();
    let mut spans = vec![];
    let mut escaped = false;
    let mut depth = 0i32;
    let mut start = 0;

    for (index, &c) in chars.iter().enumerate() {
        match c {
            '\\' => {
                escaped = !escaped;
                continue;
            }
            '{' if !escaped => {
                if depth == 0 {
                    start = index + 1;
                }
                depth += 1;
            }
            '}' if !escaped => {
                depth -= 1;

                if depth == 0 {
                    spans.push((start, index));
                } else if depth < 0 {
                    return Err(malformed("unmatched '}'"));
                }
            }
            _ => {}
        }

        escaped = false;
    }

    if depth != 0 {
        return Err(malformed("unterminated '{'"));
    }

    // the prefix letter sits before the text
    let prefix_len = literal.prefix.map_or(0, |_| 1);
    let mut stripped = String::new();
    let mut last = 0;

    for (start, end) in spans {
        let inner: String = chars[start..end].iter().collect();

        if inner.trim().is_empty() {
            return Err(malformed(
                "blank f-strings are not allowed, use \"\\{\\}\" for literal braces",
            ));
        }

        let shift = prefix_len + start as u32;
        let origin = Origin::new(
            token.position.line,
            token.position.column + shift,
            token.position.offset + shift,
        );

        let arg = parser.parse_fragment(&inner, origin, token)?;
        literal.format_args.push(arg);

        stripped.extend(&chars[last..start]);
        last = end;
    }

    stripped.extend(&chars[last..]);

    trace!(args = literal.format_args.len(), "interpolated f-string");

    literal.value = normalize_braces(&stripped);
    literal.contains_format_args = true;
    Ok(())
}

fn normalize_braces(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut index = 0;

    while index < chars.len() {
        match chars[index] {
            '\\' => match chars.get(index + 1) {
                Some(brace @ ('{' | '}')) => {
                    out.push(*brace);
                    index += 2;
                }
                Some(next) => {
                    out.push('\\');
                    out.push(*next);
                    index += 2;
                }
                None => {
                    out.push('\\');
                    index += 1;
                }
            },
            brace @ ('{' | '}') => {
                out.push_str("\\\\");
                out.push(brace);
                index += 1;
            }
            c => {
                out.push(c);
                index += 1;
            }
        }
    }

    out
}

pub fn parse_ident_expr(parser: &mut Parser) -> ParseResult<NodeId> {
    let token = parser.advance();
    let span = token.span();

    Ok(parser.alloc(
        NodeKind::Ident(IdentExpr {
            is_reserved_primitive: token.kind == TokenKind::PrimitiveType,
            name: token.value,
        }),
        span,
    ))
}

pub fn parse_prefix_expr(parser: &mut Parser) -> ParseResult<NodeId> {
    let op = parser.advance();
    let start = op.position.clone();
    let operand = parse_operand(parser)?;

    let span = parser.span_from(&start);
    Ok(parser.alloc(
        NodeKind::Unary(UnaryExpr {
            operand,
            op,
            fixity: Fixity::Prefix,
        }),
        span,
    ))
}

/// `(e)`, or a tuple when a comma follows the first element: `(e,)`.
pub fn parse_grouping_expr(parser: &mut Parser) -> ParseResult<NodeId> {
    let start = parser.current().position.clone();

    parser.with_brace_expr(|parser| {
        parser.expect(TokenKind::OpenParen)?;

        if parser.current_kind() == TokenKind::CloseParen {
            return Err(blank_literal(
                parser,
                "tuple literals must have at least one element",
            ));
        }

        let first = parse_expr(parser)?;

        if parser.current_kind() != TokenKind::Comma {
            parser.expect(TokenKind::CloseParen)?;
            let span = parser.span_from(&start);
            return Ok(parser.alloc(
                NodeKind::Parenthesized(ParenthesizedExpr { value: first }),
                span,
            ));
        }

        let mut elements = vec![first];
        while parser.eat(TokenKind::Comma) {
            if parser.current_kind() == TokenKind::CloseParen {
                break;
            }
            elements.push(parse_expr(parser)?);
        }

        parser.expect(TokenKind::CloseParen)?;
        let span = parser.span_from(&start);
        Ok(parser.alloc(NodeKind::Tuple(CollectionExpr { elements }), span))
    })
}

pub fn parse_array_expr(parser: &mut Parser) -> ParseResult<NodeId> {
    let start = parser.current().position.clone();

    parser.with_brace_expr(|parser| {
        parser.expect(TokenKind::OpenBracket)?;

        if parser.current_kind() == TokenKind::CloseBracket {
            return Err(blank_literal(
                parser,
                "empty array literals have no element type, use a typed constructor",
            ));
        }

        let mut elements = vec![parse_expr(parser)?];
        while parser.eat(TokenKind::Comma) {
            if parser.current_kind() == TokenKind::CloseBracket {
                break;
            }
            elements.push(parse_expr(parser)?);
        }

        parser.expect(TokenKind::CloseBracket)?;
        let span = parser.span_from(&start);
        Ok(parser.alloc(NodeKind::Array(CollectionExpr { elements }), span))
    })
}

/// A brace in expression position: `{ .a = 1 }`, `{k: v}` or `{a, b}`.
pub fn parse_brace_expr(parser: &mut Parser) -> ParseResult<NodeId> {
    match parser.peek_kind(1) {
        TokenKind::CloseBrace => {
            return Err(blank_literal(
                parser,
                "blank braces are ambiguous, use a more explicit initializer",
            ));
        }
        TokenKind::Dot => return parse_obj_init(parser, None),
        _ => {}
    }

    let start = parser.current().position.clone();

    parser.with_brace_expr(|parser| {
        parser.expect(TokenKind::OpenBrace)?;
        let first = parse_expr(parser)?;

        if parser.eat(TokenKind::Colon) {
            let mut pairs = vec![(first, parse_expr(parser)?)];

            while parser.eat(TokenKind::Comma) {
                if parser.current_kind() == TokenKind::CloseBrace {
                    break;
                }

                let key = parse_expr(parser)?;
                parser.expect(TokenKind::Colon)?;
                pairs.push((key, parse_expr(parser)?));
            }

            parser.expect(TokenKind::CloseBrace)?;
            let span = parser.span_from(&start);
            return Ok(parser.alloc(NodeKind::Map(MapExpr { pairs }), span));
        }

        let mut elements = vec![first];
        while parser.eat(TokenKind::Comma) {
            if parser.current_kind() == TokenKind::CloseBrace {
                break;
            }
            elements.push(parse_expr(parser)?);
        }

        parser.expect(TokenKind::CloseBrace)?;
        let span = parser.span_from(&start);
        Ok(parser.alloc(NodeKind::Set(CollectionExpr { elements }), span))
    })
}

pub fn parse_lambda_expr(parser: &mut Parser) -> ParseResult<NodeId> {
    let func = parse_function(parser, Modifiers::default(), true)?;
    let span = parser.ast().span(func).clone();

    Ok(parser.alloc(NodeKind::Lambda(LambdaExpr { func }), span))
}

/// `await e`, `spawn e`, `thread e`
pub fn parse_async_expr(parser: &mut Parser) -> ParseResult<NodeId> {
    let token = parser.advance();
    let kind = match token.kind {
        TokenKind::Await => AsyncKind::Await,
        TokenKind::Spawn => AsyncKind::Spawn,
        _ => AsyncKind::Thread,
    };

    let value = parse_operand(parser)?;

    let span = parser.span_from(&token.position);
    Ok(parser.alloc(
        NodeKind::AsyncThreading(AsyncThreadingExpr { kind, value }),
        span,
    ))
}

/// `::name::...`, a path from the global scope.
pub fn parse_global_scope_expr(parser: &mut Parser) -> ParseResult<NodeId> {
    let start = parser.current().position.clone();
    parse_scope_expr(parser, None, start, true)
}
