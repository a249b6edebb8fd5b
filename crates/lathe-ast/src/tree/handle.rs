use super::{Ast, Flags, Kind, Modifiers, NodeData, NodeId, Span};

/// Read-only navigation handle for one node.
#[derive(Clone, Copy)]
pub struct Node<'a> {
    ast: &'a Ast,
    id: NodeId,
}

impl<'a> Node<'a> {
    pub(super) fn new(ast: &'a Ast, id: NodeId) -> Self {
        Self { ast, id }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn ast(&self) -> &'a Ast {
        self.ast
    }

    pub fn kind(&self) -> Kind {
        self.ast.get(self.id).kind()
    }

    /// The underlying host data.
    pub fn data(&self) -> &'a NodeData {
        self.ast.get(self.id)
    }

    pub fn name(&self) -> Option<&'a str> {
        self.data().name()
    }

    pub fn span(&self) -> Span {
        self.ast.span(self.id)
    }

    pub fn modifiers(&self) -> Option<&'a Modifiers> {
        self.data().modifiers()
    }

    pub fn flags(&self) -> Flags {
        self.modifiers().map(|m| m.flags).unwrap_or_default()
    }

    pub fn is_stale(&self) -> bool {
        self.ast.is_stale(self.id)
    }

    pub fn up(&self) -> Option<Node<'a>> {
        self.ast.parent(self.id).map(|id| Node::new(self.ast, id))
    }

    /// Children as of the last resync of this node.
    pub fn children(&self) -> impl Iterator<Item = Node<'a>> + 'a {
        let ast = self.ast;
        ast.children(self.id).iter().map(move |&id| Node::new(ast, id))
    }

    pub fn children_of_kind(&self, kind: Kind) -> impl Iterator<Item = Node<'a>> + 'a {
        self.children().filter(move |n| n.kind() == kind)
    }

    /// Annotation-use children, in source order.
    pub fn annotations(&self) -> impl Iterator<Item = Node<'a>> + 'a {
        self.children_of_kind(Kind::Annotation)
    }

    /// Parameter children of a method.
    pub fn params(&self) -> impl Iterator<Item = Node<'a>> + 'a {
        self.children_of_kind(Kind::Parameter)
    }

    /// Nearest enclosing compilation unit (the root for attached nodes).
    pub fn compilation_unit(&self) -> Node<'a> {
        let mut current = *self;
        while let Some(parent) = current.up() {
            current = parent;
        }
        if current.kind() == Kind::CompilationUnit {
            current
        } else {
            Node::new(self.ast, self.ast.root())
        }
    }
}

impl std::fmt::Debug for Node<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Node")
            .field("id", &self.id)
            .field("kind", &self.kind())
            .field("name", &self.name())
            .finish()
    }
}
