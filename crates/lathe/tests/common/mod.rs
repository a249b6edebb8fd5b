// Test infrastructure and utilities for lathe crate tests
#![allow(dead_code)]

use lathe::{Configuration, PassReport, Registry, Walker};
use lathe_ast::{parse_unit, Ast, Flags, Kind, NodeId};

pub const IMPORTS: &str = r#"(Import :path "lathe.experimental.AllArgsFinal")
  (Import :path "lathe.experimental.NonFinal")"#;

/// Builder for the S-expression text of a one-type compilation unit
pub struct UnitBuilder {
    name: String,
    kind: String,
    marked: bool,
    members: Vec<String>,
}

impl UnitBuilder {
    pub fn new() -> Self {
        Self { name: "Foo".to_string(), kind: "class".to_string(), marked: true, members: vec![] }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = kind.into();
        self
    }

    pub fn unmarked(mut self) -> Self {
        self.marked = false;
        self
    }

    /// Add a method; `params` is the inner text of its `:params` list.
    pub fn method(mut self, name: &str, params: &str) -> Self {
        self.members.push(format!(r#"(Method :name "{name}" :returns "void" :params ({params}))"#));
        self
    }

    pub fn member(mut self, sexp: impl Into<String>) -> Self {
        self.members.push(sexp.into());
        self
    }

    pub fn source(&self) -> String {
        let annotations =
            if self.marked { ":annotations ((Annotation :type AllArgsFinal))" } else { "" };
        format!(
            r#"(CompilationUnit :package "app" :imports ({IMPORTS})
  :types ((Type :name "{}" :kind {} {} :members ({}))))"#,
            self.name,
            self.kind,
            annotations,
            self.members.join(" ")
        )
    }

    pub fn build(&self) -> Ast {
        parse_unit(&self.source()).unwrap()
    }
}

impl Default for UnitBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub fn param(name: &str) -> String {
    format!(r#"(Param :name "{name}" :type "int")"#)
}

pub fn final_param(name: &str) -> String {
    format!(r#"(Param :name "{name}" :type "int" :modifiers (final))"#)
}

pub fn opted_out(name: &str) -> String {
    format!(r#"(Param :name "{name}" :type "int" :annotations ((Annotation :type NonFinal)))"#)
}

pub fn config(toml: &str) -> Configuration {
    Configuration::from_toml_str(toml).unwrap()
}

/// Run the built-in registry over `ast`.
pub fn run(ast: &mut Ast, toml: &str) -> PassReport {
    Walker::run(Registry::builtin(), ast, &config(toml))
}

pub fn type_named(ast: &Ast, name: &str) -> NodeId {
    ast.descendants(ast.root())
        .into_iter()
        .find(|&id| ast.node(id).kind() == Kind::Type && ast.node(id).name() == Some(name))
        .unwrap_or_else(|| panic!("no type {name}"))
}

pub fn methods(ast: &Ast, ty: NodeId) -> Vec<NodeId> {
    ast.node(ty).children_of_kind(Kind::Method).map(|m| m.id()).collect()
}

pub fn params(ast: &Ast, method: NodeId) -> Vec<NodeId> {
    ast.node(method).params().map(|p| p.id()).collect()
}

/// Flags of every parameter of every method of `ty`, in order.
pub fn param_flags(ast: &Ast, ty: NodeId) -> Vec<Flags> {
    methods(ast, ty)
        .into_iter()
        .flat_map(|m| params(ast, m))
        .map(|p| ast.node(p).flags())
        .collect()
}

pub fn is_final(ast: &Ast, node: NodeId) -> bool {
    ast.node(node).flags().contains(Flags::FINAL)
}

pub fn annotation_names(ast: &Ast, node: NodeId) -> Vec<String> {
    ast.node(node).annotations().filter_map(|a| a.name().map(str::to_string)).collect()
}

pub fn import_paths(ast: &Ast) -> Vec<String> {
    ast.node(ast.root())
        .children_of_kind(Kind::Import)
        .filter_map(|i| i.name().map(str::to_string))
        .collect()
}
