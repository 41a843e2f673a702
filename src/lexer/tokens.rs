use lazy_static::lazy_static;
use std::{collections::HashMap, fmt::Display, ops::Range, rc::Rc};

use crate::{Position, Span};

use super::cursor::TokenCursor;

lazy_static! {
    pub static ref RESERVED_LOOKUP: HashMap<&'static str, TokenKind> = {
        let mut map = HashMap::new();
        map.insert("true", TokenKind::True);
        map.insert("false", TokenKind::False);
        map.insert("null", TokenKind::Null);

        map.insert("if", TokenKind::If);
        map.insert("else", TokenKind::Else);
        map.insert("unless", TokenKind::Unless);
        map.insert("while", TokenKind::While);
        map.insert("for", TokenKind::For);
        map.insert("in", TokenKind::In);
        map.insert("switch", TokenKind::Switch);
        map.insert("case", TokenKind::Case);
        map.insert("default", TokenKind::Default);
        map.insert("break", TokenKind::Break);
        map.insert("continue", TokenKind::Continue);
        map.insert("return", TokenKind::Return);
        map.insert("yield", TokenKind::Yield);
        map.insert("delete", TokenKind::Delete);
        map.insert("panic", TokenKind::Panic);
        map.insert("try", TokenKind::Try);
        map.insert("catch", TokenKind::Catch);
        map.insert("finally", TokenKind::Finally);

        map.insert("import", TokenKind::Import);
        map.insert("as", TokenKind::As);
        map.insert("fn", TokenKind::Fn);
        map.insert("op", TokenKind::Op);
        map.insert("let", TokenKind::Let);
        map.insert("const", TokenKind::Const);
        map.insert("struct", TokenKind::Struct);
        map.insert("class", TokenKind::Class);
        map.insert("interface", TokenKind::Interface);
        map.insert("enum", TokenKind::Enum);
        map.insert("type", TokenKind::Type);
        map.insert("ffi", TokenKind::Ffi);
        map.insert("module", TokenKind::Module);
        map.insert("extend", TokenKind::Extend);
        map.insert("derives", TokenKind::Derives);
        map.insert("has", TokenKind::Has);
        map.insert("requires", TokenKind::Requires);

        map.insert("inline", TokenKind::Inline);
        map.insert("static", TokenKind::Static);
        map.insert("async", TokenKind::Async);
        map.insert("eval", TokenKind::Eval);
        map.insert("priv", TokenKind::Priv);
        map.insert("pub", TokenKind::Pub);
        map.insert("prot", TokenKind::Prot);
        map.insert("internal", TokenKind::Internal);
        map.insert("unsafe", TokenKind::Unsafe);

        map.insert("await", TokenKind::Await);
        map.insert("spawn", TokenKind::Spawn);
        map.insert("thread", TokenKind::Thread);

        for primitive in [
            "void", "bool", "char", "string", "int", "float", "i8", "i16", "i32", "i64", "i128",
            "u8", "u16", "u32", "u64", "u128", "f32", "f64", "usize", "isize",
        ] {
            map.insert(primitive, TokenKind::PrimitiveType);
        }

        map
    };

    pub static ref OPERATOR_LOOKUP: HashMap<&'static str, TokenKind> = {
        let mut map = HashMap::new();
        map.insert("->", TokenKind::Arrow);
        map.insert("=", TokenKind::Assign);
        map.insert("+=", TokenKind::AddAssign);
        map.insert("-=", TokenKind::SubAssign);
        map.insert("*=", TokenKind::MulAssign);
        map.insert("/=", TokenKind::DivAssign);
        map.insert("%=", TokenKind::ModAssign);
        map.insert("==", TokenKind::Equal);
        map.insert("!=", TokenKind::NotEqual);
        map.insert("<", TokenKind::Less);
        map.insert(">", TokenKind::Greater);
        map.insert("<=", TokenKind::LessEquals);
        map.insert(">=", TokenKind::GreaterEquals);
        map.insert("+", TokenKind::Add);
        map.insert("-", TokenKind::Sub);
        map.insert("*", TokenKind::Mul);
        map.insert("/", TokenKind::Div);
        map.insert("%", TokenKind::Mod);
        map.insert("**", TokenKind::Pow);
        map.insert("<<", TokenKind::LeftShift);
        map.insert(">>", TokenKind::RightShift);
        map.insert("&", TokenKind::BitAnd);
        map.insert("|", TokenKind::BitOr);
        map.insert("^", TokenKind::BitXor);
        map.insert("~", TokenKind::BitNot);
        map.insert("&&", TokenKind::LogicalAnd);
        map.insert("||", TokenKind::LogicalOr);
        map.insert("!", TokenKind::Not);
        map.insert("++", TokenKind::Increment);
        map.insert("--", TokenKind::Decrement);
        map
    };
}

/// Longest operator spelling in `OPERATOR_LOOKUP`.
pub const MAX_OPERATOR_LENGTH: usize = 2;

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum TokenKind {
    EOF,

    // Literals
    Integer,
    Float,
    String,
    Char,
    True,
    False,
    Null,
    CompilerDirective,

    Identifier,
    PrimitiveType,

    // Punctuation
    OpenParen,
    CloseParen,
    OpenBracket,
    CloseBracket,
    OpenBrace,
    CloseBrace,
    Comma,
    Semicolon,
    Colon,
    Dot,
    Question,
    Ellipsis,
    Scope,          // ::
    Arrow,          // ->
    Range,          // ..
    RangeInclusive, // ..=

    // Assignment
    Assign,
    AddAssign,
    SubAssign,
    MulAssign,
    DivAssign,
    ModAssign,

    // Comparison, `<` and `>` double as angle brackets
    Equal,
    NotEqual,
    Less,
    Greater,
    LessEquals,
    GreaterEquals,

    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Pow,

    // Bitwise
    LeftShift,
    RightShift,
    BitAnd,
    BitOr,
    BitXor,
    BitNot,

    LogicalAnd,
    LogicalOr,
    Not,
    Increment,
    Decrement,

    // Reserved
    If,
    Else,
    Unless,
    While,
    For,
    In,
    Switch,
    Case,
    Default,
    Break,
    Continue,
    Return,
    Yield,
    Delete,
    Panic,
    Try,
    Catch,
    Finally,

    Import,
    As,
    Fn,
    Op,
    Let,
    Const,
    Struct,
    Class,
    Interface,
    Enum,
    Type,
    Ffi,
    Module,
    Extend,
    Derives,
    Has,
    Requires,

    Inline,
    Static,
    Async,
    Eval,
    Priv,
    Pub,
    Prot,
    Internal,
    Unsafe,

    Await,
    Spawn,
    Thread,
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl TokenKind {
    pub fn is_literal(&self) -> bool {
        matches!(
            self,
            TokenKind::Integer
                | TokenKind::Float
                | TokenKind::String
                | TokenKind::Char
                | TokenKind::True
                | TokenKind::False
                | TokenKind::Null
        )
    }

    pub fn is_keyword(&self) -> bool {
        RESERVED_LOOKUP
            .values()
            .any(|kind| kind == self && *kind != TokenKind::PrimitiveType)
    }

    /// How the token kind is written in source, used in error messages.
    pub fn spelling(&self) -> String {
        let fixed = match self {
            TokenKind::EOF => "end of file",
            TokenKind::Integer | TokenKind::Float => "number",
            TokenKind::String => "string",
            TokenKind::Char => "char",
            TokenKind::CompilerDirective => "directive",
            TokenKind::Identifier => "identifier",
            TokenKind::PrimitiveType => "primitive type",
            TokenKind::OpenParen => "(",
            TokenKind::CloseParen => ")",
            TokenKind::OpenBracket => "[",
            TokenKind::CloseBracket => "]",
            TokenKind::OpenBrace => "{",
            TokenKind::CloseBrace => "}",
            TokenKind::Comma => ",",
            TokenKind::Semicolon => ";",
            TokenKind::Colon => ":",
            TokenKind::Dot => ".",
            TokenKind::Question => "?",
            TokenKind::Ellipsis => "...",
            TokenKind::Scope => "::",
            TokenKind::Range => "..",
            TokenKind::RangeInclusive => "..=",
            _ => "",
        };

        if !fixed.is_empty() {
            return String::from(fixed);
        }

        OPERATOR_LOOKUP
            .iter()
            .chain(RESERVED_LOOKUP.iter())
            .find(|(_, kind)| *kind == self)
            .map(|(spelling, _)| String::from(*spelling))
            .unwrap_or_else(|| format!("{:?}", self))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub value: String,
    pub position: Position,
    pub length: u32,
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Token {{\nkind: {},\nvalue: {}}}", self.kind, self.value)
    }
}

impl Token {
    /// Builds a token that does not come from source text, placed at `position`.
    pub fn synthetic(kind: TokenKind, value: &str, position: Position) -> Self {
        Token {
            kind,
            value: String::from(value),
            position,
            length: 0,
        }
    }

    pub fn span(&self) -> Span {
        let mut end = self.position.clone();
        end.column += self.length;
        end.offset += self.length;

        Span {
            start: self.position.clone(),
            end,
        }
    }
}

/// The ordered tokens of one file.
///
/// A sequence is owned by whoever lexed it; parsers only ever read it through
/// a `TokenCursor`. The editing operations exist for token-stream rewriting
/// done before parsing.
#[derive(Debug, Clone)]
pub struct TokenSequence {
    tokens: Vec<Token>,
    file: Rc<String>,
}

impl TokenSequence {
    pub fn new(file: Rc<String>) -> Self {
        TokenSequence {
            tokens: vec![],
            file,
        }
    }

    pub fn file(&self) -> &Rc<String> {
        &self.file
    }

    pub fn push(&mut self, token: Token) {
        self.tokens.push(token);
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Token> {
        self.tokens.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Token> {
        self.tokens.iter()
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Copies `start..end` into a new sequence. `None` runs to the end.
    pub fn slice(&self, start: usize, end: Option<usize>) -> TokenSequence {
        let end = end.unwrap_or(self.tokens.len());

        TokenSequence {
            tokens: self.tokens[start..end].to_vec(),
            file: Rc::clone(&self.file),
        }
    }

    /// Splits off everything from `index` onwards into a second sequence.
    pub fn split_at(mut self, index: usize) -> (TokenSequence, TokenSequence) {
        let tail = self.tokens.split_off(index);
        let file = Rc::clone(&self.file);

        (self, TokenSequence { tokens: tail, file })
    }

    /// Removes a range of tokens and returns them.
    pub fn remove(&mut self, range: Range<usize>) -> Vec<Token> {
        self.tokens.drain(range).collect()
    }

    /// Inserts all tokens of `other` before `index`.
    pub fn insert(&mut self, index: usize, other: TokenSequence) {
        self.tokens.splice(index..index, other.tokens);
    }

    pub fn pop_back(&mut self) -> Option<Token> {
        self.tokens.pop()
    }

    pub fn pop_front(&mut self) -> Option<Token> {
        if self.tokens.is_empty() {
            None
        } else {
            Some(self.tokens.remove(0))
        }
    }

    pub fn cursor(&self) -> TokenCursor<'_> {
        TokenCursor::new(self)
    }
}

impl std::ops::Index<usize> for TokenSequence {
    type Output = Token;

    fn index(&self, index: usize) -> &Self::Output {
        &self.tokens[index]
    }
}

impl<'a> IntoIterator for &'a TokenSequence {
    type Item = &'a Token;
    type IntoIter = std::slice::Iter<'a, Token>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.iter()
    }
}

/// Decodes the escapes of a string or char literal body.
///
/// Handles `\n`, `\t`, `\r`, `\\`, `\"`, `\'`, `\0` and `\xHH`. Unknown escapes
/// keep their backslash.
pub fn unescape(literal: &str) -> String {
    let mut result = String::new();
    let mut chars = literal.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch != '\\' {
            result.push(ch);
            continue;
        }

        match chars.peek() {
            Some('n') => {
                result.push('\n');
                chars.next();
            }
            Some('t') => {
                result.push('\t');
                chars.next();
            }
            Some('r') => {
                result.push('\r');
                chars.next();
            }
            Some('\\') => {
                result.push('\\');
                chars.next();
            }
            Some('"') => {
                result.push('"');
                chars.next();
            }
            Some('\'') => {
                result.push('\'');
                chars.next();
            }
            Some('0') => {
                result.push('\0');
                chars.next();
            }
            Some('x') => {
                chars.next();
                let mut hex = String::new();

                while hex.len() < 2 {
                    match chars.peek() {
                        Some(c) if c.is_ascii_hexdigit() => {
                            hex.push(*c);
                            chars.next();
                        }
                        _ => break,
                    }
                }

                match u8::from_str_radix(&hex, 16) {
                    Ok(byte) => result.push(byte as char),
                    Err(_) => {
                        result.push_str("\\x");
                        result.push_str(&hex);
                    }
                }
            }
            // Keep the backslash
            _ => result.push(ch),
        }
    }

    result
}
