//! S-expression surface syntax for compilation units.

pub mod lexer;
pub mod parser;
pub mod printer;
pub mod types;

pub use lexer::{Lexer, Token, TokenType};
pub use parser::Parser;
pub use printer::{print_sexp, Printer};
pub use types::*;
