//! Front end configuration.
//!
//! - `Config` - per-file settings handed to the lexer and parser
//! - `Origin` - the starting line/column/offset used when lexing a fragment

/// Where lexing starts counting from.
///
/// Fragments (interpolated expressions, re-lexed annotations, token streams
/// handed over by a preprocessor) are lexed with a non-default origin so that
/// every token keeps its absolute position in the original file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Origin {
    pub line: u32,
    pub column: u32,
    pub offset: u32,
}

impl Origin {
    pub fn new(line: u32, column: u32, offset: u32) -> Self {
        Origin {
            line,
            column,
            offset,
        }
    }
}

impl Default for Origin {
    fn default() -> Self {
        Origin::new(1, 0, 0)
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Name recorded in every token position
    pub file_name: String,
    /// Starting position of the source text
    pub origin: Origin,
    /// An expression may loop at most `remaining tokens * factor` times
    pub expr_iteration_factor: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            file_name: String::from("<stdin>"),
            origin: Origin::default(),
            expr_iteration_factor: 2,
        }
    }
}

impl Config {
    pub fn new(file_name: impl Into<String>) -> Self {
        Config {
            file_name: file_name.into(),
            ..Default::default()
        }
    }

    pub fn with_origin(mut self, origin: Origin) -> Self {
        self.origin = origin;
        self
    }

    pub fn with_expr_iteration_factor(mut self, factor: usize) -> Self {
        self.expr_iteration_factor = factor;
        self
    }
}
