//! Fix suggestions attached to parse errors.
//!
//! Kept apart from the parsing functions so they stay readable.

use crate::lexer::tokens::TokenKind;

/// Suggestion for an "expected X but found Y" error.
pub fn for_expected(expected: TokenKind, found: TokenKind) -> Option<&'static str> {
    match (expected, found) {
        (TokenKind::Semicolon, TokenKind::EOF) => Some("add ';' at the end of the statement"),
        (TokenKind::Semicolon, TokenKind::CloseBrace) => {
            Some("add ';' before closing the block")
        }
        (TokenKind::Semicolon, found) if found.is_literal() => {
            Some("a value can't follow another expression, add an operator or ';'")
        }
        (TokenKind::Semicolon, _) => Some("statements end with ';', did you miss one?"),

        (TokenKind::CloseParen, TokenKind::EOF) => Some("add ')' to close the parenthesis"),
        (TokenKind::CloseParen, TokenKind::Semicolon) => Some("every '(' needs a matching ')'"),
        (TokenKind::CloseBracket, TokenKind::EOF) => Some("add ']' to close the bracket"),
        (TokenKind::CloseBrace, _) => Some("every '{' needs a matching '}'"),
        (TokenKind::OpenBrace, _) => Some("blocks start with '{'"),

        (TokenKind::Greater, _) => Some("close the generic argument list with '>'"),
        (TokenKind::Colon, TokenKind::Assign) => Some("use ':' for types, '=' for values"),
        (TokenKind::Assign, TokenKind::Equal) => Some("use '=' to assign, '==' compares"),

        (TokenKind::Identifier, TokenKind::Integer) => Some("names can't start with a number"),
        (TokenKind::Identifier, found) if found.is_keyword() => {
            Some("this is a reserved keyword and cannot be used as a name")
        }
        (TokenKind::Identifier, _) => Some("names start with a letter or '_'"),

        (TokenKind::In, _) => Some("for-in loops are written as 'for x in items'"),
        (TokenKind::Else, _) => Some("ternaries are written as 'a if cond else b'"),

        _ => None,
    }
}

/// Suggestion when an expression was required but `found` starts none.
pub fn for_expression(found: TokenKind) -> Option<&'static str> {
    match found {
        TokenKind::Semicolon => Some("statement is incomplete"),
        TokenKind::Assign => Some("put the value after '='"),
        TokenKind::EOF => Some("the file ended in the middle of an expression"),
        TokenKind::CloseParen | TokenKind::CloseBracket | TokenKind::CloseBrace => {
            Some("remove the extra closing delimiter")
        }
        _ => Some("try a value, variable, or function call"),
    }
}

/// Suggestion when a type was required but `found` starts none.
pub fn for_type(found: TokenKind) -> &'static str {
    match found {
        TokenKind::Less => "generic arguments are written with turbofish syntax '::<T>'",
        TokenKind::OpenBracket => "arrays are not a type, use a pointer or a library type",
        _ => "try a type like 'int', 'string', or a struct name",
    }
}
