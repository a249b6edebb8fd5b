//! `@AllArgsFinal`: make every method parameter of a class or enum final.
//!
//! Parameters that are already final are left alone, which makes running
//! the handler again on its own output a no-op. A parameter annotated with
//! `@NonFinal` keeps its modifiers; the opt-out annotation is consumed.

use lathe_ast::{Ast, Flags, Kind, NodeData, NodeId, TypeFlavor};
use tracing::debug;

use crate::config::{Configuration, ALL_ARGS_FINAL_FLAG_USAGE};
use crate::marker::{
    delete_marker, delete_now_unused_import, find_marker, has_marker_and_delete, AllArgsFinal,
    Marker, NonFinal,
};
use crate::policy::{self, GateOutcome};
use crate::registry::{AstVisitor, PassContext, ALL_ARGS_FINAL_PRIORITY};

pub const SHAPE_ERROR: &str = "@AllArgsFinal is only supported on a class or an enum.";

/// Counts of what one rewrite did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RewriteStats {
    pub methods: usize,
    pub marked: usize,
    pub opted_out: usize,
    pub already_final: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RewriteOutcome {
    /// No marker on the declaration.
    NotRequested,
    /// Configuration forbids the marker.
    Rejected,
    /// The marker's arguments did not decode.
    InvalidMarker,
    /// Interface or annotation type.
    Ineligible,
    Rewritten(RewriteStats),
}

impl RewriteOutcome {
    pub fn stats(&self) -> Option<RewriteStats> {
        match self {
            RewriteOutcome::Rewritten(stats) => Some(*stats),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Eligibility {
    Eligible,
    Ineligible,
}

impl Eligibility {
    fn of(ast: &Ast, ty: NodeId) -> Self {
        match ast.get(ty) {
            NodeData::Type(decl) => match decl.flavor() {
                TypeFlavor::Class | TypeFlavor::Enum => Eligibility::Eligible,
                TypeFlavor::Interface | TypeFlavor::Annotation => Eligibility::Ineligible,
            },
            _ => Eligibility::Ineligible,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AllArgsFinalHandler;

impl AstVisitor for AllArgsFinalHandler {
    fn name(&self) -> &'static str {
        "AllArgsFinal"
    }

    fn priority(&self) -> i32 {
        ALL_ARGS_FINAL_PRIORITY
    }

    fn visit_type(&self, cx: &mut PassContext<'_>, ty: NodeId) {
        handle_type(cx.ast, cx.config, ty);
    }
}

/// Process one type declaration.
pub fn handle_type(ast: &mut Ast, config: &Configuration, ty: NodeId) -> RewriteOutcome {
    let descriptor = AllArgsFinal::DESCRIPTOR;
    let Some(found) = find_marker(ast, ty, &descriptor) else {
        return RewriteOutcome::NotRequested;
    };
    let unit = ast.compilation_unit_of(ty);
    debug!(ty = %ty, marker = %found.node, via = ?found.matched, "matched");

    if let Err(e) = found.decode::<AllArgsFinal>() {
        ast.report_error(found.node, e.to_string());
        consume(ast, unit, found.node);
        return RewriteOutcome::InvalidMarker;
    }

    let gate =
        policy::check(ast, found.node, config, &ALL_ARGS_FINAL_FLAG_USAGE, &descriptor.label());
    consume(ast, unit, found.node);
    if gate == GateOutcome::Rejected {
        debug!(ty = %ty, "rejected by policy");
        return RewriteOutcome::Rejected;
    }

    if Eligibility::of(ast, ty) == Eligibility::Ineligible {
        ast.report_error(found.node, SHAPE_ERROR);
        return RewriteOutcome::Ineligible;
    }

    let stats = rewrite_type(ast, ty);
    delete_now_unused_import(ast, unit, NonFinal::DESCRIPTOR.qualified);
    debug!(ty = %ty, ?stats, "rewritten");
    RewriteOutcome::Rewritten(stats)
}

fn consume(ast: &mut Ast, unit: NodeId, marker: NodeId) {
    delete_marker(ast, marker);
    delete_now_unused_import(ast, unit, AllArgsFinal::DESCRIPTOR.qualified);
}

/// Finalize the parameters of every method directly declared in `ty`.
pub fn rewrite_type(ast: &mut Ast, ty: NodeId) -> RewriteStats {
    let methods: Vec<NodeId> =
        ast.node(ty).children_of_kind(Kind::Method).map(|m| m.id()).collect();

    let mut stats = RewriteStats::default();
    for method in methods {
        set_all_args_final(ast, method, &mut stats);
        stats.methods += 1;
    }
    stats
}

/// Finalize the parameters of one method, then resync it.
pub fn set_all_args_final(ast: &mut Ast, method: NodeId, stats: &mut RewriteStats) {
    let params = match ast.get(method) {
        NodeData::Method(m) => m.params.clone(),
        _ => return,
    };

    for param in params {
        if ast.flags(param).is_some_and(|f| f.contains(Flags::FINAL)) {
            stats.already_final += 1;
        } else if has_marker_and_delete(ast, param, &NonFinal::DESCRIPTOR) {
            stats.opted_out += 1;
        } else if let Some(mods) = ast.modifiers_mut(param) {
            mods.flags.insert(Flags::FINAL);
            ast.resync(param);
            stats.marked += 1;
        }
    }

    ast.resync(method);
}
