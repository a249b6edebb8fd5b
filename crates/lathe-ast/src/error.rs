use std::fmt;

/// Position in source text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    pub offset: usize, // Byte offset
    pub line: usize,   // Line number (1-based)
    pub column: usize, // Column number (1-based)
}

impl Position {
    pub fn new(offset: usize, line: usize, column: usize) -> Self {
        Self { offset, line, column }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// Lexer errors
#[derive(Debug, thiserror::Error)]
pub enum LexError {
    #[error("Unexpected character '{ch}' at {pos}")]
    UnexpectedChar { ch: char, pos: Position },

    #[error("Unterminated string at {pos}")]
    UnterminatedString { pos: Position },

    #[error("Invalid escape sequence '\\{ch}' at {pos}")]
    InvalidEscape { ch: char, pos: Position },

    #[error("Unexpected end of input")]
    UnexpectedEof,
}

impl LexError {
    pub fn position(&self) -> Option<Position> {
        match self {
            LexError::UnexpectedChar { pos, .. }
            | LexError::UnterminatedString { pos }
            | LexError::InvalidEscape { pos, .. } => Some(*pos),
            LexError::UnexpectedEof => None,
        }
    }
}

/// Errors raised while reading a compilation unit
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Unexpected token {token:?} at {pos}")]
    UnexpectedToken { token: String, pos: Position },

    #[error("Expected {expected}, found {found} at {pos}")]
    Expected { expected: String, found: String, pos: Position },

    #[error("Unknown field :{field} on {node} at {pos}")]
    UnknownField { field: String, node: String, pos: Position },

    #[error("Unknown modifier '{name}' at {pos}")]
    UnknownModifier { name: String, pos: Position },

    #[error("Unterminated list at {pos}")]
    UnterminatedList { pos: Position },

    #[error("Unexpected closing parenthesis at {pos}")]
    UnexpectedCloseParen { pos: Position },

    #[error("Empty input")]
    EmptyInput,

    #[error("Lexer error: {0}")]
    LexError(#[from] LexError),
}

impl ParseError {
    /// Where in the source the error was detected, when known.
    pub fn position(&self) -> Option<Position> {
        match self {
            ParseError::UnexpectedToken { pos, .. }
            | ParseError::Expected { pos, .. }
            | ParseError::UnknownField { pos, .. }
            | ParseError::UnknownModifier { pos, .. }
            | ParseError::UnterminatedList { pos }
            | ParseError::UnexpectedCloseParen { pos } => Some(*pos),
            ParseError::EmptyInput => None,
            ParseError::LexError(e) => e.position(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ParseError>;
