//! Host-side syntax tree for the Lathe rewrite engine.
//!
//! The tree is an arena of nodes addressed by [`NodeId`]. Each node carries
//! its underlying data plus a cached child list; direct mutation through
//! [`Ast::get_mut`] marks the node stale until [`Ast::resync`] rebuilds the
//! cached view. Compilation units are read from and written back to an
//! S-expression surface syntax.

pub mod builder;
pub mod emit;
pub mod error;
pub mod sexp;
pub mod tree;

// Re-export commonly used items
pub use builder::AstBuilder;
pub use emit::{emit, emit_string};
pub use error::{LexError, ParseError, Position, Result};
pub use sexp::{print_sexp, Parser, Printer, SExp};
pub use tree::{
    Annotation, AnnotationArg, ArgValue, Ast, CompilationUnit, Diagnostic, Flags, Import, Kind,
    Method, Modifiers, Node, NodeData, NodeId, Severity, Span, TypeDecl, TypeFlavor, VarDecl,
};

/// Parse S-expression text and lower it into a fresh [`Ast`].
pub fn parse_unit(input: &str) -> Result<Ast> {
    let sexp = Parser::parse_str(input)?;
    AstBuilder::new().build(&sexp)
}
