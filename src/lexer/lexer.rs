use std::rc::Rc;

use lazy_static::lazy_static;
use regex::Regex;
use tracing::{debug, debug_span, trace};

use crate::{
    config::Origin,
    errors::errors::{LexError, LexErrorImpl},
    Position, MK_DEFAULT_HANDLER, MK_TOKEN,
};

use super::tokens::{
    Token, TokenKind, TokenSequence, MAX_OPERATOR_LENGTH, OPERATOR_LOOKUP, RESERVED_LOOKUP,
};

pub type RegexHandler = fn(&mut Lexer, &Regex) -> Result<(), LexError>;

pub struct RegexPattern {
    regex: Regex,
    handler: RegexHandler,
}

fn pattern(regex: &str, handler: RegexHandler) -> RegexPattern {
    RegexPattern {
        regex: Regex::new(regex).expect("lexer patterns are valid regular expressions"),
        handler,
    }
}

lazy_static! {
    /// Dispatch table, tried in order against the unconsumed input.
    /// Every pattern is anchored; the first match picks the handler.
    static ref PATTERNS: Vec<RegexPattern> = vec![
        pattern(r"^\s+", skip_handler),
        pattern(r"^//[^\n]*", skip_handler),
        pattern(r"^/\*", block_comment_handler),
        pattern(r#"^[rbfu]?["']"#, string_handler),
        pattern(r"^[0-9]", number_handler),
        pattern(r"^[A-Za-z_][A-Za-z0-9_]*", symbol_handler),
        pattern(r"^#", directive_handler),
        pattern(r"^[.:]", punctuation_handler),
        pattern(r"^\(", MK_DEFAULT_HANDLER!(TokenKind::OpenParen, "(")),
        pattern(r"^\)", MK_DEFAULT_HANDLER!(TokenKind::CloseParen, ")")),
        pattern(r"^\[", MK_DEFAULT_HANDLER!(TokenKind::OpenBracket, "[")),
        pattern(r"^\]", MK_DEFAULT_HANDLER!(TokenKind::CloseBracket, "]")),
        pattern(r"^\{", MK_DEFAULT_HANDLER!(TokenKind::OpenBrace, "{")),
        pattern(r"^\}", MK_DEFAULT_HANDLER!(TokenKind::CloseBrace, "}")),
        pattern(r"^,", MK_DEFAULT_HANDLER!(TokenKind::Comma, ",")),
        pattern(r"^;", MK_DEFAULT_HANDLER!(TokenKind::Semicolon, ";")),
        pattern(r"^\?", MK_DEFAULT_HANDLER!(TokenKind::Question, "?")),
        pattern(r"^[+\-*/%=!<>&|^~]+", operator_handler),
    ];
}

/// Character-level lexer state.
///
/// `pos` is a byte index into `source`; `line`, `column` and `offset` count
/// characters and are what ends up in token positions.
pub struct Lexer {
    tokens: TokenSequence,
    source: String,
    pos: usize,
    line: u32,
    column: u32,
    offset: u32,
    file: Rc<String>,
}

impl Lexer {
    pub fn new(source: &str, file: &str, origin: Origin) -> Lexer {
        let file = Rc::new(String::from(file));

        Lexer {
            tokens: TokenSequence::new(Rc::clone(&file)),
            source: String::from(source),
            pos: 0,
            line: origin.line,
            column: origin.column,
            offset: origin.offset,
            file,
        }
    }

    pub fn position(&self) -> Position {
        Position::new(self.line, self.column, self.offset, Rc::clone(&self.file))
    }

    /// Advances by `n` characters, keeping line and column counts.
    pub fn advance_n(&mut self, n: usize) {
        for _ in 0..n {
            let Some(c) = self.at() else {
                break;
            };

            self.pos += c.len_utf8();
            self.offset += 1;

            if c == '\n' {
                self.line += 1;
                self.column = 0;
            } else {
                self.column += 1;
            }
        }
    }

    pub fn push(&mut self, token: Token) {
        trace!(
            kind = ?token.kind,
            value = %token.value,
            line = token.position.line,
            column = token.position.column,
            "token"
        );
        self.tokens.push(token);
    }

    /// Pushes the source text between `start_byte` and the current position.
    fn push_from(&mut self, kind: TokenKind, start: Position, start_byte: usize) {
        let value = String::from(&self.source[start_byte..self.pos]);
        let length = value.chars().count() as u32;
        self.push(MK_TOKEN!(kind, value, start, length));
    }

    pub fn at(&self) -> Option<char> {
        self.remainder().chars().next()
    }

    pub fn peek(&self, n: usize) -> Option<char> {
        self.remainder().chars().nth(n)
    }

    pub fn remainder(&self) -> &str {
        &self.source[self.pos..]
    }

    pub fn at_eof(&self) -> bool {
        self.pos >= self.source.len()
    }
}

fn skip_handler(lexer: &mut Lexer, regex: &Regex) -> Result<(), LexError> {
    let length = regex
        .find(lexer.remainder())
        .map(|matched| matched.as_str().chars().count())
        .unwrap_or(0);

    lexer.advance_n(length);
    Ok(())
}

fn block_comment_handler(lexer: &mut Lexer, _regex: &Regex) -> Result<(), LexError> {
    let start = lexer.position();
    let mut depth = 0usize;

    loop {
        if lexer.remainder().starts_with("/*") {
            depth += 1;
            lexer.advance_n(2);
        } else if lexer.remainder().starts_with("*/") {
            depth -= 1;
            lexer.advance_n(2);

            if depth == 0 {
                return Ok(());
            }
        } else if lexer.at_eof() {
            return Err(LexError::new(LexErrorImpl::UnterminatedComment, start));
        } else {
            lexer.advance_n(1);
        }
    }
}

fn string_handler(lexer: &mut Lexer, _regex: &Regex) -> Result<(), LexError> {
    let start = lexer.position();
    let start_byte = lexer.pos;

    let mut prefix = None;
    if let Some(c) = lexer.at().filter(|c| c.is_ascii_alphabetic()) {
        prefix = Some(c);
        lexer.advance_n(1);
    }

    let quote = lexer.at().unwrap_or('"');
    let is_format = prefix == Some('f');
    let mut brace_depth = 0i32;
    lexer.advance_n(1);

    loop {
        match lexer.at() {
            None => {
                let error = if is_format && brace_depth > 0 {
                    LexErrorImpl::UnbalancedFormatBrace
                } else if quote == '\'' {
                    LexErrorImpl::UnterminatedChar
                } else {
                    LexErrorImpl::UnterminatedString
                };

                return Err(LexError::new(error, start));
            }
            Some('\\') => lexer.advance_n(2),
            Some(c) if c == quote && brace_depth == 0 => {
                lexer.advance_n(1);
                break;
            }
            Some('{') if is_format => {
                brace_depth += 1;
                lexer.advance_n(1);
            }
            Some('}') if is_format => {
                brace_depth -= 1;

                if brace_depth < 0 {
                    return Err(LexError::new(
                        LexErrorImpl::UnbalancedFormatBrace,
                        lexer.position(),
                    ));
                }

                lexer.advance_n(1);
            }
            Some(_) => lexer.advance_n(1),
        }
    }

    let kind = if quote == '\'' {
        TokenKind::Char
    } else {
        TokenKind::String
    };

    lexer.push_from(kind, start, start_byte);
    Ok(())
}

fn number_handler(lexer: &mut Lexer, _regex: &Regex) -> Result<(), LexError> {
    let start = lexer.position();
    let start_byte = lexer.pos;
    let is_radix = lexer.remainder().starts_with("0x")
        || lexer.remainder().starts_with("0X")
        || lexer.remainder().starts_with("0b")
        || lexer.remainder().starts_with("0B");

    let mut dot_count = 0;
    let mut has_exponent = false;

    while let Some(c) = lexer.at() {
        match c {
            // `1..5` is a range and `1.foo` a member access
            '.' if !lexer.peek(1).is_some_and(|n| n.is_ascii_digit()) => break,
            '.' => {
                dot_count += 1;

                if dot_count > 1 {
                    let token = String::from(&lexer.source[start_byte..lexer.pos]);
                    return Err(LexError::new(LexErrorImpl::MalformedFloat { token }, start));
                }

                lexer.advance_n(1);
            }
            'e' | 'E' if !is_radix => {
                let signed = matches!(lexer.peek(1), Some('+') | Some('-'));
                let digit = lexer.peek(1 + usize::from(signed));

                if !digit.is_some_and(|n| n.is_ascii_digit()) {
                    lexer.advance_n(1 + usize::from(signed));
                    let token = String::from(&lexer.source[start_byte..lexer.pos]);
                    return Err(LexError::new(LexErrorImpl::MalformedFloat { token }, start));
                }

                has_exponent = true;
                lexer.advance_n(1 + usize::from(signed));
            }
            c if c.is_ascii_alphanumeric() || c == '_' => lexer.advance_n(1),
            _ => break,
        }
    }

    let kind = if dot_count == 1 || has_exponent {
        TokenKind::Float
    } else {
        TokenKind::Integer
    };

    lexer.push_from(kind, start, start_byte);
    Ok(())
}

fn symbol_handler(lexer: &mut Lexer, regex: &Regex) -> Result<(), LexError> {
    let start = lexer.position();
    let start_byte = lexer.pos;
    let Some(word) = regex.find(lexer.remainder()).map(|m| String::from(m.as_str())) else {
        return Ok(());
    };

    lexer.advance_n(word.chars().count());

    let kind = RESERVED_LOOKUP
        .get(word.as_str())
        .copied()
        .unwrap_or(TokenKind::Identifier);

    lexer.push_from(kind, start, start_byte);
    Ok(())
}

fn directive_handler(lexer: &mut Lexer, _regex: &Regex) -> Result<(), LexError> {
    let start = lexer.position();
    let start_byte = lexer.pos;

    if lexer.peek(1) != Some('[') {
        return Err(LexError::new(LexErrorImpl::MalformedDirective, start));
    }

    lexer.advance_n(2);
    let mut depth = 1;

    while depth > 0 {
        match lexer.at() {
            None => return Err(LexError::new(LexErrorImpl::UnterminatedDirective, start)),
            Some('[') => depth += 1,
            Some(']') => depth -= 1,
            Some(_) => {}
        }

        lexer.advance_n(1);
    }

    // Directives are lexed in full so the error can quote them, but are not
    // accepted yet.
    let directive = String::from(&lexer.source[start_byte..lexer.pos]);
    Err(LexError::new(
        LexErrorImpl::UnsupportedDirective { directive },
        start,
    ))
}

fn punctuation_handler(lexer: &mut Lexer, _regex: &Regex) -> Result<(), LexError> {
    let start = lexer.position();
    let start_byte = lexer.pos;
    let remainder = lexer.remainder();

    let (kind, length) = if remainder.starts_with("...") {
        (TokenKind::Ellipsis, 3)
    } else if remainder.starts_with("..=") {
        (TokenKind::RangeInclusive, 3)
    } else if remainder.starts_with("..") {
        (TokenKind::Range, 2)
    } else if remainder.starts_with('.') {
        (TokenKind::Dot, 1)
    } else if remainder.starts_with("::") {
        (TokenKind::Scope, 2)
    } else {
        (TokenKind::Colon, 1)
    };

    lexer.advance_n(length);
    lexer.push_from(kind, start, start_byte);
    Ok(())
}

fn operator_handler(lexer: &mut Lexer, regex: &Regex) -> Result<(), LexError> {
    let start = lexer.position();
    let start_byte = lexer.pos;
    let run = regex
        .find(lexer.remainder())
        .map(|m| String::from(m.as_str()))
        .unwrap_or_default();

    let longest = (1..=run.len().min(MAX_OPERATOR_LENGTH))
        .rev()
        .find_map(|length| OPERATOR_LOOKUP.get(&run[..length]).map(|kind| (*kind, length)));

    match longest {
        Some((kind, length)) => {
            lexer.advance_n(length);
            lexer.push_from(kind, start, start_byte);
            Ok(())
        }
        None => Err(LexError::new(
            LexErrorImpl::UnrecognisedToken { token: run },
            start,
        )),
    }
}

/// Tokenizes a whole file starting at line 1, column 0.
pub fn tokenize(source: &str, file: &str) -> Result<TokenSequence, LexError> {
    tokenize_with_origin(source, file, Origin::default())
}

/// Tokenizes `source` as if it started at `origin` within `file`.
///
/// The returned sequence always ends with exactly one EOF token. The first
/// lexical error aborts tokenization.
pub fn tokenize_with_origin(
    source: &str,
    file: &str,
    origin: Origin,
) -> Result<TokenSequence, LexError> {
    let _span = debug_span!("tokenize", file = %file).entered();
    let mut lexer = Lexer::new(source, file, origin);

    while !lexer.at_eof() {
        let remainder = lexer.remainder();
        let matched = PATTERNS
            .iter()
            .find(|pattern| pattern.regex.is_match(remainder));

        match matched {
            Some(pattern) => (pattern.handler)(&mut lexer, &pattern.regex)?,
            None => {
                let token = lexer.at().map(String::from).unwrap_or_default();
                return Err(LexError::new(
                    LexErrorImpl::UnrecognisedToken { token },
                    lexer.position(),
                ));
            }
        }
    }

    let position = lexer.position();
    lexer.push(MK_TOKEN!(TokenKind::EOF, String::from("\0"), position, 1));

    debug!(tokens = lexer.tokens.len(), "tokenized");
    Ok(lexer.tokens)
}
