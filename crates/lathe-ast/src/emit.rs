//! Raising the arena back into S-expressions.
//!
//! Emission reads the underlying node data, which is what later phases of
//! the host observe; it does not depend on cached child views.

use crate::sexp::{print_sexp, SExp};
use crate::tree::*;

/// Emit the compilation unit rooted at `ast.root()`.
pub fn emit(ast: &Ast) -> SExp {
    Emitter { ast }.node(ast.root())
}

/// Emit and pretty-print in one step.
pub fn emit_string(ast: &Ast) -> String {
    print_sexp(&emit(ast))
}

struct Emitter<'a> {
    ast: &'a Ast,
}

impl Emitter<'_> {
    fn node(&self, id: NodeId) -> SExp {
        match self.ast.get(id) {
            NodeData::CompilationUnit(cu) => {
                let mut form = Form::new("CompilationUnit");
                if let Some(package) = &cu.package {
                    form.field("package", SExp::string(package));
                }
                form.nodes("imports", self, &cu.imports);
                form.nodes("types", self, &cu.types);
                form.finish()
            }
            NodeData::Import(import) => {
                let mut form = Form::new("Import");
                form.field("path", SExp::string(&import.path));
                if import.is_static {
                    form.field("static", SExp::symbol("true"));
                }
                form.finish()
            }
            NodeData::Type(ty) => {
                let flavor = ty.flavor();
                let mut form = Form::new("Type");
                form.field("name", SExp::string(&ty.name));
                if flavor != TypeFlavor::Class {
                    form.field("kind", SExp::symbol(flavor.as_str()));
                }
                self.modifiers(&mut form, &ty.mods, flavor.flags());
                form.nodes("members", self, &ty.members);
                form.finish()
            }
            NodeData::Method(method) => {
                let mut form = Form::new("Method");
                form.field("name", SExp::string(&method.name));
                if let Some(ret) = &method.return_type {
                    form.field("returns", SExp::string(ret));
                }
                self.modifiers(&mut form, &method.mods, Flags::empty());
                form.nodes("params", self, &method.params);
                form.finish()
            }
            NodeData::Field(var) => self.var("Field", var),
            NodeData::Parameter(var) => self.var("Param", var),
            NodeData::Annotation(ann) => {
                let mut form = Form::new("Annotation");
                form.field("type", SExp::string(&ann.type_name));
                if !ann.args.is_empty() {
                    let mut args = Vec::with_capacity(ann.args.len() * 2);
                    for arg in &ann.args {
                        args.push(SExp::keyword(&arg.name));
                        args.push(match &arg.value {
                            ArgValue::Str(s) => SExp::string(s),
                            ArgValue::Int(n) => SExp::number(*n),
                            ArgValue::Bool(b) => SExp::symbol(b.to_string()),
                            ArgValue::Ident(i) => SExp::symbol(i),
                        });
                    }
                    form.field("args", SExp::list(args));
                }
                form.finish()
            }
        }
    }

    fn var(&self, head: &str, var: &VarDecl) -> SExp {
        let mut form = Form::new(head);
        form.field("name", SExp::string(&var.name));
        form.field("type", SExp::string(&var.ty));
        self.modifiers(&mut form, &var.mods, Flags::empty());
        form.finish()
    }

    /// `implied` bits are already expressed elsewhere (a type's `:kind`).
    fn modifiers(&self, form: &mut Form, mods: &Modifiers, implied: Flags) {
        let mut flags = mods.flags;
        flags.remove(implied);

        let names: Vec<SExp> = flags.names().map(SExp::symbol).collect();
        if !names.is_empty() {
            form.field("modifiers", SExp::list(names));
        }
        let unnamed = flags.unnamed_bits();
        if unnamed != 0 {
            form.field("flags", SExp::number(i64::try_from(unnamed).unwrap_or(i64::MAX)));
        }
        form.nodes("annotations", self, &mods.annotations);
    }
}

struct Form {
    elements: Vec<SExp>,
}

impl Form {
    fn new(head: &str) -> Self {
        Self { elements: vec![SExp::symbol(head)] }
    }

    fn field(&mut self, name: &str, value: SExp) {
        self.elements.push(SExp::keyword(name));
        self.elements.push(value);
    }

    fn nodes(&mut self, name: &str, emitter: &Emitter<'_>, ids: &[NodeId]) {
        if !ids.is_empty() {
            self.field(name, SExp::list(ids.iter().map(|&id| emitter.node(id)).collect()));
        }
    }

    fn finish(self) -> SExp {
        SExp::list(self.elements)
    }
}
