use tracing::trace;

use super::{CompilationUnit, Diagnostic, Flags, Node, NodeData, NodeId, Severity, Span};

#[derive(Debug, Clone)]
struct Slot {
    data: NodeData,
    span: Span,
    parent: Option<NodeId>,
    // Derived from `data`; only valid while `stale` is false.
    children: Vec<NodeId>,
    stale: bool,
}

/// One compilation unit as an arena of nodes.
///
/// The root (always [`Ast::root`]) is a compilation unit. Nodes are never
/// freed: a node removed from its parent's data becomes detached but its id
/// stays readable, which keeps diagnostics on removed nodes meaningful.
///
/// Mutating a node's data through [`get_mut`](Ast::get_mut) or
/// [`modifiers_mut`](Ast::modifiers_mut) marks it stale. Until
/// [`resync`](Ast::resync) runs, [`children`](Ast::children) keeps returning
/// the view from before the mutation.
#[derive(Debug, Clone)]
pub struct Ast {
    slots: Vec<Slot>,
    // Ids of the nodes currently stale.
    dirty: Vec<NodeId>,
    diagnostics: Vec<Diagnostic>,
}

impl Ast {
    /// Create an arena holding an empty compilation unit.
    pub fn new(span: Span) -> Self {
        let root = Slot {
            data: NodeData::CompilationUnit(CompilationUnit::default()),
            span,
            parent: None,
            children: Vec::new(),
            stale: false,
        };
        Self { slots: vec![root], dirty: Vec::new(), diagnostics: Vec::new() }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Number of nodes ever allocated, attached or not.
    pub fn node_count(&self) -> usize {
        self.slots.len()
    }

    /// Add a node. Child ids referenced by `data` are adopted immediately.
    pub fn alloc(&mut self, data: NodeData, span: Span) -> NodeId {
        let id = NodeId(u32::try_from(self.slots.len()).unwrap_or(u32::MAX));
        self.slots.push(Slot { data, span, parent: None, children: Vec::new(), stale: false });
        self.resync(id);
        id
    }

    pub fn node(&self, id: NodeId) -> Node<'_> {
        Node::new(self, id)
    }

    pub fn get(&self, id: NodeId) -> &NodeData {
        &self.slots[id.index()].data
    }

    /// Direct access to the underlying data. Marks the node stale.
    pub fn get_mut(&mut self, id: NodeId) -> &mut NodeData {
        let slot = &mut self.slots[id.index()];
        if !slot.stale {
            slot.stale = true;
            self.dirty.push(id);
        }
        &mut slot.data
    }

    /// Direct access to a node's modifier set. Marks the node stale.
    pub fn modifiers_mut(&mut self, id: NodeId) -> Option<&mut super::Modifiers> {
        self.get_mut(id).modifiers_mut()
    }

    pub fn flags(&self, id: NodeId) -> Option<Flags> {
        self.get(id).modifiers().map(|m| m.flags)
    }

    pub fn span(&self, id: NodeId) -> Span {
        self.slots[id.index()].span
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.slots[id.index()].parent
    }

    /// Cached child view, as of the last resync.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.slots[id.index()].children
    }

    pub fn is_stale(&self, id: NodeId) -> bool {
        self.slots[id.index()].stale
    }

    /// Stale nodes in id order. Proportional to the number of stale nodes,
    /// not to the size of the arena.
    pub fn stale_nodes(&self) -> Vec<NodeId> {
        let mut ids = self.dirty.clone();
        ids.sort_unstable();
        ids
    }

    /// Rebuild the cached child view of `id` from its underlying data.
    ///
    /// Children that are no longer referenced lose their parent link; newly
    /// referenced ones are adopted.
    pub fn resync(&mut self, id: NodeId) {
        let fresh = self.slots[id.index()].data.child_ids();
        let previous = std::mem::take(&mut self.slots[id.index()].children);

        for old in previous {
            if !fresh.contains(&old) && self.slots[old.index()].parent == Some(id) {
                self.slots[old.index()].parent = None;
            }
        }
        for &child in &fresh {
            self.slots[child.index()].parent = Some(id);
        }

        trace!(node = %id, children = fresh.len(), "resync");
        let slot = &mut self.slots[id.index()];
        slot.children = fresh;
        if std::mem::replace(&mut slot.stale, false) {
            self.dirty.retain(|&d| d != id);
        }
    }

    /// Detach `child` from `parent`'s underlying data and resync `parent`.
    /// Returns false when `child` was not a child of `parent`.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> bool {
        if !self.get(parent).child_ids().contains(&child) {
            return false;
        }
        let removed = self.get_mut(parent).remove_child(child);
        self.resync(parent);
        removed
    }

    /// True if a chain of parent links leads from `id` to the root.
    pub fn is_attached(&self, id: NodeId) -> bool {
        let mut current = id;
        loop {
            if current == self.root() {
                return true;
            }
            match self.parent(current) {
                Some(parent) => current = parent,
                None => return false,
            }
        }
    }

    /// Compilation unit enclosing `id`.
    pub fn compilation_unit_of(&self, id: NodeId) -> NodeId {
        self.node(id).compilation_unit().id()
    }

    /// Ids of attached nodes in depth-first pre-order, following the cached
    /// child views.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.children(next).iter().rev());
        }
        out
    }

    // -- Diagnostics --

    pub fn report_error(&mut self, id: NodeId, message: impl Into<String>) {
        self.report(Severity::Error, id, message.into());
    }

    pub fn report_warning(&mut self, id: NodeId, message: impl Into<String>) {
        self.report(Severity::Warning, id, message.into());
    }

    fn report(&mut self, severity: Severity, node: NodeId, message: String) {
        let span = self.span(node);
        self.diagnostics.push(Diagnostic { severity, message, node, span });
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(|d| d.severity == Severity::Error)
    }

    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }
}
