//! Arena syntax tree with an explicit mutate-then-resync contract.

mod arena;
mod diagnostic;
mod flags;
mod handle;
mod node;
mod span;

pub use arena::Ast;
pub use diagnostic::{Diagnostic, Severity};
pub use flags::Flags;
pub use handle::Node;
pub use node::{
    Annotation, AnnotationArg, ArgValue, CompilationUnit, Import, Kind, Method, Modifiers,
    NodeData, TypeDecl, TypeFlavor, VarDecl,
};
pub use span::Span;

/// Identifier of a node inside one [`Ast`].
///
/// Ids are only meaningful for the arena that issued them and stay valid for
/// the lifetime of that arena, even after the node is detached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}
