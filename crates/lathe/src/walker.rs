//! Depth-first dispatch of registered visitors over one compilation unit.

use lathe_ast::{Ast, Kind, NodeId, Severity};
use tracing::{debug, warn};

use crate::config::Configuration;
use crate::registry::{AstVisitor, PassContext, Registry};

/// Summary of one pass over a compilation unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PassReport {
    pub errors: usize,
    pub warnings: usize,
    pub rounds: usize,
}

impl PassReport {
    /// False when any diagnostic of error severity was reported; the unit
    /// must not be emitted then.
    pub fn succeeded(&self) -> bool {
        self.errors == 0
    }
}

pub struct Walker<'r> {
    registry: &'r Registry,
}

impl<'r> Walker<'r> {
    pub fn new(registry: &'r Registry) -> Self {
        Self { registry }
    }

    /// Run every priority round of `registry` over `ast`.
    pub fn run(registry: &Registry, ast: &mut Ast, config: &Configuration) -> PassReport {
        Walker::new(registry).pass(ast, config)
    }

    pub fn pass(&self, ast: &mut Ast, config: &Configuration) -> PassReport {
        let priorities = self.registry.priorities();
        for &priority in &priorities {
            let round: Vec<&dyn AstVisitor> = self.registry.round(priority).collect();
            debug!(priority, visitors = round.len(), "starting round");
            let mut cx = PassContext { ast: &mut *ast, config };
            walk(&mut cx, &round);
        }

        let (errors, warnings) =
            ast.diagnostics().iter().fold((0, 0), |(e, w), d| match d.severity {
                Severity::Error => (e + 1, w),
                Severity::Warning => (e, w + 1),
            });
        PassReport { errors, warnings, rounds: priorities.len() }
    }
}

fn walk(cx: &mut PassContext<'_>, round: &[&dyn AstVisitor]) {
    let mut stack = vec![cx.ast.root()];

    while let Some(id) = stack.pop() {
        // An earlier callback may have removed this node.
        if !cx.ast.is_attached(id) {
            continue;
        }

        for visitor in round {
            dispatch(*visitor, cx, id);
            repair_stale(cx.ast, visitor.name());
        }

        stack.extend(cx.ast.children(id).iter().rev());
    }
}

fn dispatch(visitor: &dyn AstVisitor, cx: &mut PassContext<'_>, id: NodeId) {
    match cx.ast.node(id).kind() {
        Kind::Type => visitor.visit_type(cx, id),
        Kind::Method => visitor.visit_method(cx, id),
        Kind::Parameter => visitor.visit_parameter(cx, id),
        _ => {}
    }
}

fn repair_stale(ast: &mut Ast, visitor: &str) {
    for id in ast.stale_nodes() {
        warn!(visitor, node = %id, kind = ast.node(id).kind().as_str(), "visitor left node stale");
        ast.resync(id);
    }
}
