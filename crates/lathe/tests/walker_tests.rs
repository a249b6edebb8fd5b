mod common;

use std::sync::{Arc, Mutex};

use common::*;
use lathe::{AllArgsFinalHandler, AstVisitor, PassContext, Registry, Walker};
use lathe_ast::{Flags, NodeData, NodeId};

type Log = Arc<Mutex<Vec<String>>>;

/// Records every type and method it is dispatched on.
struct Recorder {
    name: &'static str,
    priority: i32,
    log: Log,
}

impl AstVisitor for Recorder {
    fn name(&self) -> &'static str {
        self.name
    }

    fn priority(&self) -> i32 {
        self.priority
    }

    fn visit_type(&self, cx: &mut PassContext<'_>, ty: NodeId) {
        let ty = cx.ast.node(ty).name().unwrap_or_default().to_string();
        self.log.lock().unwrap().push(format!("{}:{}", self.name, ty));
    }

    fn visit_method(&self, cx: &mut PassContext<'_>, method: NodeId) {
        let method = cx.ast.node(method).name().unwrap_or_default().to_string();
        self.log.lock().unwrap().push(format!("{}:{}()", self.name, method));
    }
}

/// Records whether each parameter it sees is already final.
struct FinalObserver {
    log: Log,
}

impl AstVisitor for FinalObserver {
    fn name(&self) -> &'static str {
        "observer"
    }

    fn visit_parameter(&self, cx: &mut PassContext<'_>, param: NodeId) {
        let node = cx.ast.node(param);
        let state = if node.flags().contains(Flags::FINAL) { "final" } else { "open" };
        self.log.lock().unwrap().push(format!("{}={}", node.name().unwrap_or_default(), state));
    }
}

/// Mutates parameter modifiers without resyncing.
struct Careless;

impl AstVisitor for Careless {
    fn name(&self) -> &'static str {
        "careless"
    }

    fn visit_parameter(&self, cx: &mut PassContext<'_>, param: NodeId) {
        if let Some(mods) = cx.ast.modifiers_mut(param) {
            mods.flags.insert(Flags::VOLATILE);
        }
    }
}

/// Drops every method named `gone` from the type it visits.
struct Pruner;

impl AstVisitor for Pruner {
    fn name(&self) -> &'static str {
        "pruner"
    }

    fn visit_type(&self, cx: &mut PassContext<'_>, ty: NodeId) {
        let doomed: Vec<NodeId> = cx
            .ast
            .children(ty)
            .iter()
            .copied()
            .filter(|&id| matches!(cx.ast.get(id), NodeData::Method(m) if m.name == "gone"))
            .collect();
        for id in doomed {
            cx.ast.remove_child(ty, id);
        }
    }
}

fn log() -> Log {
    Arc::new(Mutex::new(Vec::new()))
}

#[test]
fn test_rounds_run_in_priority_order() {
    let log = log();
    let mut registry = Registry::new();
    registry.register(Box::new(Recorder { name: "late", priority: 10, log: log.clone() }));
    registry.register(Box::new(Recorder { name: "early", priority: -10, log: log.clone() }));

    let mut ast = UnitBuilder::new().unmarked().method("a", "").method("b", "").build();
    let report = Walker::run(&registry, &mut ast, &config(""));

    assert_eq!(report.rounds, 2);
    assert_eq!(
        *log.lock().unwrap(),
        vec!["early:Foo", "early:a()", "early:b()", "late:Foo", "late:a()", "late:b()"]
    );
}

#[test]
fn test_later_rounds_see_final_parameters() {
    let log = log();
    let mut registry = Registry::new();
    registry.register(Box::new(FinalObserver { log: log.clone() }));
    registry.register(Box::new(AllArgsFinalHandler));

    let mut ast = UnitBuilder::new()
        .method("bar", &format!("{} {}", param("x"), opted_out("y")))
        .build();
    Walker::run(&registry, &mut ast, &config(""));

    assert_eq!(*log.lock().unwrap(), vec!["x=final", "y=open"]);
}

#[test]
fn test_stale_nodes_are_repaired() {
    let mut registry = Registry::new();
    registry.register(Box::new(Careless));

    let mut ast = UnitBuilder::new().unmarked().method("bar", &param("x")).build();
    Walker::run(&registry, &mut ast, &config(""));

    assert!(ast.stale_nodes().is_empty());
    let foo = type_named(&ast, "Foo");
    assert!(param_flags(&ast, foo)[0].contains(Flags::VOLATILE));
}

#[test]
fn test_children_are_read_after_callback() {
    let log = log();
    let mut registry = Registry::new();
    registry.register(Box::new(Pruner));
    registry.register(Box::new(Recorder { name: "rec", priority: 0, log: log.clone() }));

    let mut ast = UnitBuilder::new().unmarked().method("kept", "").method("gone", "").build();
    Walker::run(&registry, &mut ast, &config(""));

    assert_eq!(*log.lock().unwrap(), vec!["rec:Foo", "rec:kept()"]);
}

#[test]
fn test_empty_registry_does_nothing() {
    let mut ast = UnitBuilder::new().method("bar", &param("x")).build();
    let report = Walker::run(&Registry::new(), &mut ast, &config(""));

    assert_eq!(report.rounds, 0);
    assert!(report.succeeded());
    let foo = type_named(&ast, "Foo");
    assert!(!param_flags(&ast, foo)[0].contains(Flags::FINAL));
}
