//! Utility macros for the front end.
//!
//! This module defines helper macros used throughout the crate:
//!
//! - `MK_TOKEN!` - Creates a Token instance
//! - `MK_DEFAULT_HANDLER!` - Creates a lexer handler for single-character punctuation
//! - `MK_PARSE_ERROR!` - Creates a detailed parse error for a token
//!
//! These macros reduce boilerplate in the lexer and parser.

/// Creates a Token instance.
///
/// # Arguments
///
/// * `$kind` - The TokenKind
/// * `$value` - The token's source text
/// * `$position` - Where the token starts
/// * `$length` - Length of the token in characters
///
/// # Example
///
/// ```ignore
/// let token = MK_TOKEN!(TokenKind::Integer, "42".to_string(), position, 2);
/// ```
#[macro_export]
macro_rules! MK_TOKEN {
    ($kind:expr, $value:expr, $position:expr, $length:expr) => {
        Token {
            kind: $kind,
            value: $value,
            position: $position,
            length: $length,
        }
    };
}

/// Creates a lexer handler for a fixed single-token pattern.
///
/// The generated handler pushes a token of the given kind at the current
/// position and advances the lexer past it.
///
/// # Arguments
///
/// * `$kind` - The TokenKind to create
/// * `$value` - The literal string value (used for length calculation)
///
/// # Example
///
/// ```ignore
/// RegexPattern {
///     regex: Regex::new("^\\(").unwrap(),
///     handler: MK_DEFAULT_HANDLER!(TokenKind::OpenParen, "("),
/// }
/// ```
#[macro_export]
macro_rules! MK_DEFAULT_HANDLER {
    ($kind:expr, $value:literal) => {
        |lexer: &mut Lexer, _regex: &Regex| {
            let position = lexer.position();
            let length = $value.chars().count();
            lexer.push(MK_TOKEN!($kind, String::from($value), position, length as u32));
            lexer.advance_n(length);
            Ok(())
        }
    };
}

/// Creates a `ParseError` carrying a message about the given token.
///
/// # Example
///
/// ```ignore
/// return Err(MK_PARSE_ERROR!(parser.current().clone(), "expected a type"));
/// ```
#[macro_export]
macro_rules! MK_PARSE_ERROR {
    ($token:expr, $message:expr) => {
        $crate::errors::errors::ParseError::new(
            $crate::errors::errors::ParseErrorImpl::UnexpectedTokenDetailed {
                token: $token.value.clone(),
                message: String::from($message),
            },
            $token,
        )
    };
}
