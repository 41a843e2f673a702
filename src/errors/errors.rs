use std::fmt::Display;

use thiserror::Error;

use crate::{lexer::tokens::Token, Position};

pub type ParseResult<T> = Result<T, ParseError>;

/// Any error the front end can produce for a file.
#[derive(Error, Debug, Clone)]
pub enum Error {
    #[error(transparent)]
    Lex(#[from] LexError),
    #[error(transparent)]
    Parse(#[from] ParseError),
}

impl Error {
    pub fn get_position(&self) -> &Position {
        match self {
            Error::Lex(error) => error.get_position(),
            Error::Parse(error) => &error.get_token().position,
        }
    }

    pub fn get_error_name(&self) -> &str {
        match self {
            Error::Lex(error) => error.get_error_name(),
            Error::Parse(error) => error.get_error_name(),
        }
    }

    pub fn get_tip(&self) -> ErrorTip {
        match self {
            Error::Lex(error) => error.get_tip(),
            Error::Parse(error) => error.get_tip(),
        }
    }
}

/// A fatal lexing error. Lexing stops at the first one.
#[derive(Error, Debug, Clone)]
#[error("{internal_error}")]
pub struct LexError {
    internal_error: LexErrorImpl,
    position: Position,
}

impl LexError {
    pub fn new(error_impl: LexErrorImpl, position: Position) -> Self {
        LexError {
            internal_error: error_impl,
            position,
        }
    }

    pub fn get_position(&self) -> &Position {
        &self.position
    }

    pub fn get_impl(&self) -> &LexErrorImpl {
        &self.internal_error
    }

    pub fn get_error_name(&self) -> &str {
        match &self.internal_error {
            LexErrorImpl::UnterminatedComment => "UnterminatedComment",
            LexErrorImpl::UnterminatedString => "UnterminatedString",
            LexErrorImpl::UnterminatedChar => "UnterminatedChar",
            LexErrorImpl::UnterminatedDirective => "UnterminatedDirective",
            LexErrorImpl::UnbalancedFormatBrace => "UnbalancedFormatBrace",
            LexErrorImpl::UnrecognisedToken { .. } => "UnrecognisedToken",
            LexErrorImpl::MalformedFloat { .. } => "MalformedFloat",
            LexErrorImpl::MalformedDirective => "MalformedDirective",
            LexErrorImpl::UnsupportedDirective { .. } => "UnsupportedDirective",
        }
    }

    pub fn get_tip(&self) -> ErrorTip {
        match &self.internal_error {
            LexErrorImpl::UnterminatedComment => {
                ErrorTip::Suggestion(String::from("close the block comment with '*/'"))
            }
            LexErrorImpl::UnterminatedString => {
                ErrorTip::Suggestion(String::from("close the string with a matching '\"'"))
            }
            LexErrorImpl::UnterminatedChar => {
                ErrorTip::Suggestion(String::from("close the char literal with a matching '''"))
            }
            LexErrorImpl::UnbalancedFormatBrace => ErrorTip::Suggestion(String::from(
                "escape literal braces in f-strings with '\\{' and '\\}'",
            )),
            LexErrorImpl::MalformedFloat { token } => ErrorTip::Suggestion(format!(
                "`{}` has more than one '.', use '..' for ranges",
                token
            )),
            LexErrorImpl::MalformedDirective => {
                ErrorTip::Suggestion(String::from("directives are written as '#[...]'"))
            }
            LexErrorImpl::UnrecognisedToken { .. }
            | LexErrorImpl::UnterminatedDirective
            | LexErrorImpl::UnsupportedDirective { .. } => ErrorTip::None,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LexErrorImpl {
    #[error("unterminated block comment")]
    UnterminatedComment,
    #[error("unterminated string")]
    UnterminatedString,
    #[error("unterminated char literal")]
    UnterminatedChar,
    #[error("unterminated compiler directive")]
    UnterminatedDirective,
    #[error("unbalanced '{{' in f-string")]
    UnbalancedFormatBrace,
    #[error("unrecognised token: {token:?}")]
    UnrecognisedToken { token: String },
    #[error("malformed float literal: {token:?}")]
    MalformedFloat { token: String },
    #[error("malformed compiler directive, expected '#['")]
    MalformedDirective,
    #[error("compiler directives are not supported: {directive:?}")]
    UnsupportedDirective { directive: String },
}

/// A fatal parse error about one token, with optional fix suggestions.
#[derive(Error, Debug, Clone)]
#[error("{internal_error}")]
pub struct ParseError {
    internal_error: ParseErrorImpl,
    token: Token,
    fixes: Vec<String>,
}

impl ParseError {
    pub fn new(error_impl: ParseErrorImpl, token: Token) -> Self {
        ParseError {
            internal_error: error_impl,
            token,
            fixes: vec![],
        }
    }

    pub fn with_fix(mut self, fix: impl Into<String>) -> Self {
        self.fixes.push(fix.into());
        self
    }

    pub fn get_token(&self) -> &Token {
        &self.token
    }

    pub fn get_impl(&self) -> &ParseErrorImpl {
        &self.internal_error
    }

    pub fn get_fixes(&self) -> &[String] {
        &self.fixes
    }

    pub fn get_error_name(&self) -> &str {
        match &self.internal_error {
            ParseErrorImpl::UnexpectedToken { .. } => "UnexpectedToken",
            ParseErrorImpl::UnexpectedTokenDetailed { .. } => "UnexpectedTokenDetailed",
            ParseErrorImpl::ExpectedExpression { .. } => "ExpectedExpression",
            ParseErrorImpl::ExpressionTooLong => "ExpressionTooLong",
            ParseErrorImpl::BlankLiteral { .. } => "BlankLiteral",
            ParseErrorImpl::DanglingClause { .. } => "DanglingClause",
            ParseErrorImpl::InvalidModifier { .. } => "InvalidModifier",
            ParseErrorImpl::InvalidType { .. } => "InvalidType",
            ParseErrorImpl::MalformedFormatString { .. } => "MalformedFormatString",
            ParseErrorImpl::InterpolationLex { .. } => "InterpolationLex",
            ParseErrorImpl::InvalidImport { .. } => "InvalidImport",
        }
    }

    pub fn get_tip(&self) -> ErrorTip {
        if let Some(fix) = self.fixes.first() {
            return ErrorTip::Suggestion(fix.clone());
        }

        match &self.internal_error {
            ParseErrorImpl::UnexpectedTokenDetailed { token, message } => {
                ErrorTip::Suggestion(format!("Unexpected token: `{}`, {}", token, message))
            }
            ParseErrorImpl::ExpressionTooLong => ErrorTip::Suggestion(String::from(
                "split the expression into smaller parts",
            )),
            ParseErrorImpl::DanglingClause { keyword, .. } => ErrorTip::Suggestion(format!(
                "remove the `{}` or attach it to the statement it belongs to",
                keyword
            )),
            ParseErrorImpl::InvalidModifier { modifier, target } => ErrorTip::Suggestion(format!(
                "remove `{}`, it cannot be applied to {}",
                modifier, target
            )),
            _ => ErrorTip::None,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseErrorImpl {
    #[error("expected '{expected}' but found '{found}'")]
    UnexpectedToken { expected: String, found: String },
    #[error("{message}: '{token}'")]
    UnexpectedTokenDetailed { token: String, message: String },
    #[error("expected an expression but found '{token}'")]
    ExpectedExpression { token: String },
    #[error("expression is too long")]
    ExpressionTooLong,
    #[error("blank literal disallowed: {message}")]
    BlankLiteral { message: String },
    #[error("found dangling '{keyword}' without a matching {expected}")]
    DanglingClause { keyword: String, expected: String },
    #[error("'{modifier}' is not a valid modifier for {target}")]
    InvalidModifier { modifier: String, target: String },
    #[error("invalid type: {message}")]
    InvalidType { message: String },
    #[error("malformed f-string: {message}")]
    MalformedFormatString { message: String },
    #[error("in f-string expression: {message}")]
    InterpolationLex { message: String },
    #[error("invalid import: {message}")]
    InvalidImport { message: String },
}

pub enum ErrorTip {
    None,
    Suggestion(String),
}

impl Display for ErrorTip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorTip::None => write!(f, ""),
            ErrorTip::Suggestion(suggestion) => write!(f, "{}", suggestion),
        }
    }
}
