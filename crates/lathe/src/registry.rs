//! Visitor registration.
//!
//! Visitors are registered once, at start-up, into a [`Registry`]. The
//! walker runs one round per distinct priority, lowest first, so a visitor
//! with a lower priority sees the whole unit before any later one does.

use std::fmt;

use lathe_ast::{Ast, NodeId};
use once_cell::sync::Lazy;

use crate::config::Configuration;
use crate::handlers::all_args_final::AllArgsFinalHandler;

/// Priority of visitors with no ordering requirement.
pub const DEFAULT_PRIORITY: i32 = 0;

/// Runs before visitors that generate members from a type's parameter
/// lists.
pub const ALL_ARGS_FINAL_PRIORITY: i32 = -2048;

/// What a visitor callback may touch during a pass.
pub struct PassContext<'a> {
    pub ast: &'a mut Ast,
    pub config: &'a Configuration,
}

/// A stateless tree visitor.
///
/// Callbacks must leave every node they mutate resynced.
pub trait AstVisitor: Send + Sync {
    fn name(&self) -> &'static str;

    fn priority(&self) -> i32 {
        DEFAULT_PRIORITY
    }

    fn visit_type(&self, _cx: &mut PassContext<'_>, _ty: NodeId) {}

    fn visit_method(&self, _cx: &mut PassContext<'_>, _method: NodeId) {}

    fn visit_parameter(&self, _cx: &mut PassContext<'_>, _param: NodeId) {}
}

#[derive(Default)]
pub struct Registry {
    visitors: Vec<Box<dyn AstVisitor>>,
}

static BUILTIN: Lazy<Registry> = Lazy::new(Registry::with_builtin_handlers);

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every handler shipped with lathe.
    pub fn with_builtin_handlers() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(AllArgsFinalHandler));
        registry
    }

    /// Process-wide registry of the built-in handlers.
    pub fn builtin() -> &'static Registry {
        &BUILTIN
    }

    /// Add a visitor. Visitors sharing a priority keep registration order.
    pub fn register(&mut self, visitor: Box<dyn AstVisitor>) {
        let at = self.visitors.partition_point(|v| v.priority() <= visitor.priority());
        self.visitors.insert(at, visitor);
    }

    /// Visitors in ascending priority order.
    pub fn visitors(&self) -> impl Iterator<Item = &dyn AstVisitor> {
        self.visitors.iter().map(|v| v.as_ref())
    }

    /// Visitors of one priority round.
    pub fn round(&self, priority: i32) -> impl Iterator<Item = &dyn AstVisitor> {
        self.visitors().filter(move |v| v.priority() == priority)
    }

    /// Distinct priorities, ascending.
    pub fn priorities(&self) -> Vec<i32> {
        let mut priorities: Vec<i32> = self.visitors.iter().map(|v| v.priority()).collect();
        priorities.dedup();
        priorities
    }

    pub fn len(&self) -> usize {
        self.visitors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.visitors.is_empty()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.visitors.iter().map(|v| (v.name(), v.priority()))).finish()
    }
}
