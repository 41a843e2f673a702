use super::tokens::{Token, TokenSequence};

/// A saved cursor position, handed back to [`TokenCursor::restore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checkpoint(usize);

/// A bounded random-access reader over a borrowed [`TokenSequence`].
///
/// Moving outside the sequence is a bug in the caller and panics; running
/// off the end of user input is handled by the EOF token instead.
#[derive(Debug, Clone)]
pub struct TokenCursor<'a> {
    tokens: &'a TokenSequence,
    pos: usize,
}

impl<'a> TokenCursor<'a> {
    pub fn new(tokens: &'a TokenSequence) -> Self {
        TokenCursor { tokens, pos: 0 }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    /// Number of tokens from the current one to the end, inclusive.
    pub fn remaining(&self) -> usize {
        self.tokens.len() - self.pos
    }

    pub fn current(&self) -> &'a Token {
        match self.tokens.get(self.pos) {
            Some(token) => token,
            None => panic!(
                "token cursor at {} is outside a sequence of {} tokens",
                self.pos,
                self.tokens.len()
            ),
        }
    }

    /// Looks `n` tokens ahead; `peek(0)` is the current token.
    pub fn peek(&self, n: usize) -> Option<&'a Token> {
        self.tokens.get(self.pos + n)
    }

    /// Looks `n` tokens behind the current one.
    pub fn peek_back(&self, n: usize) -> Option<&'a Token> {
        self.pos.checked_sub(n).and_then(|index| self.tokens.get(index))
    }

    pub fn advance(&mut self, n: usize) {
        assert!(
            self.pos + n <= self.tokens.len(),
            "cannot advance token cursor by {} from {} in a sequence of {} tokens",
            n,
            self.pos,
            self.tokens.len()
        );
        self.pos += n;
    }

    pub fn reverse(&mut self, n: usize) {
        assert!(
            n <= self.pos,
            "cannot reverse token cursor by {} from {}",
            n,
            self.pos
        );
        self.pos -= n;
    }

    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint(self.pos)
    }

    pub fn restore(&mut self, checkpoint: Checkpoint) {
        assert!(checkpoint.0 <= self.tokens.len());
        self.pos = checkpoint.0;
    }
}
