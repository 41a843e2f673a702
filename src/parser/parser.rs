//! Parser state and the parsing entry point.
//!
//! This module contains the `Parser` struct shared by the expression,
//! type, statement and declaration parsers. It wraps a `TokenCursor` and
//! owns the `Ast` arena nodes are allocated into. It provides:
//!
//! - Token inspection and consumption that never moves past EOF
//! - `expect` helpers that build errors with fix suggestions
//! - Checkpoints for speculative parses that may be rolled back
//! - Sub-parsing of token fragments into the same arena

use std::rc::Rc;

use tracing::{debug, debug_span};

use crate::{
    ast::ast::{Ast, NodeId, NodeKind},
    config::{Config, Origin},
    errors::errors::{ParseError, ParseErrorImpl, ParseResult},
    lexer::{
        cursor::{Checkpoint, TokenCursor},
        lexer::tokenize_with_origin,
        tokens::{Token, TokenKind, TokenSequence},
    },
    Position, Span, MK_PARSE_ERROR,
};

use super::{decl::parse_decl, expr::parse_expr, hints};

/// Output of a successful parse.
#[derive(Debug, Clone)]
pub struct Program {
    /// Arena holding every node of the file
    pub ast: Ast,
    /// Top-level declarations in source order
    pub declarations: Vec<NodeId>,
    /// Expressions parsed from compiler directives
    pub annotations: Vec<NodeId>,
}

/// A saved parser state, see [`Parser::checkpoint`].
#[derive(Debug, Clone, Copy)]
pub struct ParserCheckpoint {
    cursor: Checkpoint,
    nodes: usize,
    pending_gt: bool,
}

/// The parsing state shared by every parsing function.
///
/// It holds the cursor over the token stream and the arena the parsed
/// nodes are allocated into, together with the few context flags the
/// grammar needs.
pub struct Parser<'a> {
    /// Reader over the tokens being parsed
    cursor: TokenCursor<'a>,
    /// Arena receiving every allocated node
    ast: Ast,
    /// Settings for the file being parsed
    config: &'a Config,
    /// A `>>` was split and its second `>` is still owed to an outer
    /// generic argument list
    pub(crate) pending_gt: bool,
    /// Generic argument lists currently open
    pub(crate) generic_depth: usize,
    /// Whether `Path { ... }` may be read as an object initializer. Turned
    /// off in conditions so that `if x {}` keeps its body.
    pub(crate) allow_brace_expr: bool,
    /// Returned once the cursor is past the last token
    eof: Token,
}

impl<'a> Parser<'a> {
    /// Creates a new Parser over a token sequence.
    ///
    /// # Arguments
    ///
    /// * `tokens` - The sequence to parse
    /// * `config` - Settings for the file
    ///
    /// # Returns
    ///
    /// A Parser with an empty arena, positioned at the first token.
    pub fn new(tokens: &'a TokenSequence, config: &'a Config) -> Self {
        Parser::with_ast(tokens, config, Ast::new())
    }

    /// Creates a Parser that keeps allocating into an existing arena.
    pub fn with_ast(tokens: &'a TokenSequence, config: &'a Config, ast: Ast) -> Self {
        let position = match tokens.tokens().last() {
            Some(last) => last.position.clone(),
            None => Position::new(
                config.origin.line,
                config.origin.column,
                config.origin.offset,
                Rc::clone(tokens.file()),
            ),
        };

        Parser {
            cursor: tokens.cursor(),
            ast,
            config,
            pending_gt: false,
            generic_depth: 0,
            allow_brace_expr: true,
            eof: Token::synthetic(TokenKind::EOF, "\0", position),
        }
    }

    pub fn config(&self) -> &'a Config {
        self.config
    }

    pub fn ast(&self) -> &Ast {
        &self.ast
    }

    pub fn into_ast(self) -> Ast {
        self.ast
    }

    /// Returns the current token without advancing.
    pub fn current(&self) -> &Token {
        self.cursor.peek(0).unwrap_or(&self.eof)
    }

    /// Returns the kind of the current token.
    pub fn current_kind(&self) -> TokenKind {
        self.current().kind
    }

    /// Returns the token `n` places ahead, or EOF past the end.
    pub fn peek(&self, n: usize) -> &Token {
        self.cursor.peek(n).unwrap_or(&self.eof)
    }

    pub fn peek_kind(&self, n: usize) -> TokenKind {
        self.peek(n).kind
    }

    /// The last consumed token.
    pub fn previous(&self) -> Option<&Token> {
        self.cursor.peek_back(1)
    }

    /// Advances to the next token and returns the one consumed.
    ///
    /// The cursor never moves past an EOF token, so repeated calls at the
    /// end of input keep returning it.
    pub fn advance(&mut self) -> Token {
        let token = self.current().clone();

        if token.kind != TokenKind::EOF && self.cursor.remaining() > 0 {
            self.cursor.advance(1);
        }

        token
    }

    /// Steps back `n` tokens.
    pub fn reverse(&mut self, n: usize) {
        self.cursor.reverse(n);
    }

    /// Consumes the current token if it is of the given kind.
    pub fn eat(&mut self, kind: TokenKind) -> bool {
        if self.current_kind() == kind {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Tokens left, counting the current one.
    pub fn remaining(&self) -> usize {
        self.cursor.remaining()
    }

    /// Checks if there are more tokens to parse.
    ///
    /// # Returns
    ///
    /// Returns true while the current token is not EOF.
    pub fn has_tokens(&self) -> bool {
        self.cursor.remaining() > 0 && self.current_kind() != TokenKind::EOF
    }

    /// Expects a token of the specified kind, with optional custom error.
    ///
    /// # Arguments
    ///
    /// * `expected_kind` - The expected TokenKind
    /// * `error` - Optional custom error to return if expectation fails
    ///
    /// # Returns
    ///
    /// Returns Ok(Token) if the current token matches, otherwise returns an Error.
    pub fn expect_error(
        &mut self,
        expected_kind: TokenKind,
        error: Option<ParseError>,
    ) -> ParseResult<Token> {
        if self.current_kind() == expected_kind {
            return Ok(self.advance());
        }

        Err(error.unwrap_or_else(|| self.unexpected(expected_kind)))
    }

    /// Builds the "expected X but found Y" error for the current token
    /// without consuming it.
    pub fn unexpected(&self, expected_kind: TokenKind) -> ParseError {
        let token = self.current().clone();
        let mut error = ParseError::new(
            ParseErrorImpl::UnexpectedToken {
                expected: expected_kind.spelling(),
                found: token.value.clone(),
            },
            token,
        );

        if let Some(hint) = hints::for_expected(expected_kind, self.current_kind()) {
            error = error.with_fix(hint);
        }

        error
    }

    /// Expects a token of the specified kind with default error message.
    ///
    /// # Arguments
    ///
    /// * `expected_kind` - The expected TokenKind
    ///
    /// # Returns
    ///
    /// Returns Ok(Token) if the current token matches, otherwise returns a default Error.
    pub fn expect(&mut self, expected_kind: TokenKind) -> ParseResult<Token> {
        self.expect_error(expected_kind, None)
    }

    /// Expects a token of the specified kind, failing with `message`.
    pub fn expect_detailed(
        &mut self,
        expected_kind: TokenKind,
        message: &str,
    ) -> ParseResult<Token> {
        let error = MK_PARSE_ERROR!(self.current().clone(), message);
        self.expect_error(expected_kind, Some(error))
    }

    /// Error for the current token with a custom message.
    pub fn error_here(&self, message: &str) -> ParseError {
        MK_PARSE_ERROR!(self.current().clone(), message)
    }

    /// Saves the cursor position and arena size.
    pub fn checkpoint(&self) -> ParserCheckpoint {
        ParserCheckpoint {
            cursor: self.cursor.checkpoint(),
            nodes: self.ast.len(),
            pending_gt: self.pending_gt,
        }
    }

    /// Rolls back to a checkpoint, discarding nodes allocated since.
    pub fn restore(&mut self, checkpoint: ParserCheckpoint) {
        self.cursor.restore(checkpoint.cursor);
        self.ast.truncate(checkpoint.nodes);
        self.pending_gt = checkpoint.pending_gt;
    }

    /// Allocates a node in the arena.
    pub fn alloc(&mut self, kind: NodeKind, span: Span) -> NodeId {
        self.ast.alloc(kind, span)
    }

    /// Span from `start` to the end of the last consumed token.
    pub fn span_from(&self, start: &Position) -> Span {
        let end = match self.previous() {
            Some(token) => token.span().end,
            None => start.clone(),
        };

        Span {
            start: start.clone(),
            end,
        }
    }

    /// Runs `f` with object initializers after paths disabled.
    pub fn without_brace_expr<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> ParseResult<T>,
    ) -> ParseResult<T> {
        let saved = self.allow_brace_expr;
        self.allow_brace_expr = false;
        let result = f(self);
        self.allow_brace_expr = saved;
        result
    }

    /// Runs `f` with object initializers allowed again, for nested
    /// delimiters inside a condition.
    pub fn with_brace_expr<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> ParseResult<T>,
    ) -> ParseResult<T> {
        let saved = self.allow_brace_expr;
        self.allow_brace_expr = true;
        let result = f(self);
        self.allow_brace_expr = saved;
        result
    }

    /// Lexes `source` at `origin` and parses it as one expression into this
    /// parser's arena.
    ///
    /// Used for interpolated string spans and compiler directives. The
    /// fragment gets its own token sequence and cursor; `token` is blamed for
    /// lexing failures.
    pub fn parse_fragment(
        &mut self,
        source: &str,
        origin: Origin,
        token: &Token,
    ) -> ParseResult<NodeId> {
        let tokens = tokenize_with_origin(source, &token.position.file, origin).map_err(|e| {
            ParseError::new(
                ParseErrorImpl::InterpolationLex {
                    message: e.to_string(),
                },
                token.clone(),
            )
        })?;

        let ast = std::mem::take(&mut self.ast);
        let mut fragment = Parser::with_ast(&tokens, self.config, ast);

        let result = parse_expr(&mut fragment).and_then(|id| {
            if fragment.has_tokens() {
                Err(fragment.error_here("unexpected token after embedded expression"))
            } else {
                Ok(id)
            }
        });

        self.ast = fragment.into_ast();
        result
    }
}

/// Splits compiler directive tokens out of a sequence.
///
/// The lexer never produces them, but a preprocessor handing over a token
/// stream may.
fn take_directives(tokens: &TokenSequence) -> (Vec<Token>, TokenSequence) {
    let mut directives = vec![];
    let mut body = TokenSequence::new(Rc::clone(tokens.file()));

    for token in tokens {
        if token.kind == TokenKind::CompilerDirective {
            directives.push(token.clone());
        } else {
            body.push(token.clone());
        }
    }

    (directives, body)
}

/// Parses one `#[...]` directive into an annotation expression.
fn parse_annotation(parser: &mut Parser, directive: &Token) -> ParseResult<NodeId> {
    let inner = directive
        .value
        .strip_prefix("#[")
        .and_then(|rest| rest.strip_suffix(']'))
        .ok_or_else(|| MK_PARSE_ERROR!(directive.clone(), "malformed compiler directive"))?;

    let origin = Origin::new(
        directive.position.line,
        directive.position.column + 2,
        directive.position.offset + 2,
    );

    parser.parse_fragment(inner, origin, directive)
}

/// Parses a token sequence into a [`Program`].
///
/// This is the main entry point for parsing. Compiler directives are
/// parsed into annotations first, then declarations are parsed until EOF.
///
/// # Arguments
///
/// * `tokens` - The sequence to parse, ending in EOF
/// * `config` - Settings for the file
///
/// # Returns
///
/// The parsed Program, or the first ParseError encountered.
pub fn parse(tokens: &TokenSequence, config: &Config) -> ParseResult<Program> {
    let _span = debug_span!("parse", file = %tokens.file()).entered();

    let (directives, body) = take_directives(tokens);
    let mut parser = Parser::new(&body, config);

    let mut annotations = vec![];
    for directive in &directives {
        annotations.push(parse_annotation(&mut parser, directive)?);
    }

    let mut declarations = vec![];
    while parser.has_tokens() {
        declarations.push(parse_decl(&mut parser)?);
    }

    debug!(
        declarations = declarations.len(),
        annotations = annotations.len(),
        nodes = parser.ast().len(),
        "parsed"
    );

    Ok(Program {
        ast: parser.into_ast(),
        declarations,
        annotations,
    })
}
