use super::helpers::*;
use crate::error::{ParseError, Result};
use crate::sexp::{List, SExp};
use crate::tree::*;

/// Lowers a `(CompilationUnit ...)` S-expression into an [`Ast`].
///
/// Children are allocated before their parents, so every node is already
/// synced when the builder returns.
pub struct AstBuilder {
    ast: Option<Ast>,
}

impl AstBuilder {
    pub fn new() -> Self {
        Self { ast: None }
    }

    pub fn build(mut self, sexp: &SExp) -> Result<Ast> {
        let list = expect_form(sexp, "CompilationUnit")?;
        self.ast = Some(Ast::new(span_of(list)));
        let mut fields = Fields::parse(list)?;

        let package = fields.take("package").map(expect_string).transpose()?;
        let imports = match fields.take("imports") {
            Some(s) => self.build_all(s, Self::build_import)?,
            None => Vec::new(),
        };
        let types = match fields.take("types") {
            Some(s) => self.build_all(s, Self::build_type)?,
            None => Vec::new(),
        };
        fields.finish()?;

        let mut ast = self.ast.take().ok_or(ParseError::EmptyInput)?;
        let root = ast.root();
        *ast.get_mut(root) = NodeData::CompilationUnit(CompilationUnit { package, imports, types });
        ast.resync(root);
        Ok(ast)
    }

    fn alloc(&mut self, data: NodeData, list: &List) -> Result<NodeId> {
        let ast = self.ast.as_mut().ok_or(ParseError::EmptyInput)?;
        Ok(ast.alloc(data, span_of(list)))
    }

    fn build_all(
        &mut self,
        sexp: &SExp,
        build: fn(&mut Self, &SExp) -> Result<NodeId>,
    ) -> Result<Vec<NodeId>> {
        expect_elements(sexp)?.iter().map(|element| build(self, element)).collect()
    }

    fn build_import(&mut self, sexp: &SExp) -> Result<NodeId> {
        let list = expect_form(sexp, "Import")?;
        let mut fields = Fields::parse(list)?;
        let path = expect_string(fields.require("path")?)?;
        let is_static = fields.take("static").map(expect_bool).transpose()?.unwrap_or(false);
        fields.finish()?;

        self.alloc(NodeData::Import(Import { path, is_static }), list)
    }

    fn build_type(&mut self, sexp: &SExp) -> Result<NodeId> {
        let list = expect_form(sexp, "Type")?;
        let mut fields = Fields::parse(list)?;
        let name = expect_string(fields.require("name")?)?;

        let flavor = match fields.take("kind") {
            Some(kind) => {
                let text = expect_symbol(kind)?;
                TypeFlavor::parse(text)
                    .ok_or_else(|| expected("class, enum, interface or annotation", kind))?
            }
            None => TypeFlavor::Class,
        };
        let mut mods = self.build_modifiers(&mut fields)?;
        mods.flags.insert(flavor.flags());

        let members = match fields.take("members") {
            Some(s) => self.build_all(s, Self::build_member)?,
            None => Vec::new(),
        };
        fields.finish()?;

        self.alloc(NodeData::Type(TypeDecl { name, mods, members }), list)
    }

    fn build_member(&mut self, sexp: &SExp) -> Result<NodeId> {
        let head = match sexp {
            SExp::List(l) => l.head(),
            _ => None,
        };
        match head {
            Some("Method") => self.build_method(sexp),
            Some("Field") => self.build_var(sexp, "Field"),
            Some("Type") => self.build_type(sexp),
            _ => Err(expected("(Method ...), (Field ...) or (Type ...)", sexp)),
        }
    }

    fn build_method(&mut self, sexp: &SExp) -> Result<NodeId> {
        let list = expect_form(sexp, "Method")?;
        let mut fields = Fields::parse(list)?;
        let name = expect_string(fields.require("name")?)?;
        let return_type = fields.take("returns").map(expect_string).transpose()?;
        let mods = self.build_modifiers(&mut fields)?;
        let params = match fields.take("params") {
            Some(s) => self.build_all(s, |b, p| b.build_var(p, "Param"))?,
            None => Vec::new(),
        };
        fields.finish()?;

        self.alloc(NodeData::Method(Method { name, mods, return_type, params }), list)
    }

    fn build_var(&mut self, sexp: &SExp, head: &str) -> Result<NodeId> {
        let list = expect_form(sexp, head)?;
        let mut fields = Fields::parse(list)?;
        let name = expect_string(fields.require("name")?)?;
        let ty = expect_string(fields.require("type")?)?;
        let mods = self.build_modifiers(&mut fields)?;
        fields.finish()?;

        let decl = VarDecl { name, ty, mods };
        let data = if head == "Param" { NodeData::Parameter(decl) } else { NodeData::Field(decl) };
        self.alloc(data, list)
    }

    /// `:modifiers (public final)`, `:flags <raw unnamed bits>` and
    /// `:annotations (...)`.
    fn build_modifiers(&mut self, fields: &mut Fields<'_>) -> Result<Modifiers> {
        let mut flags = Flags::empty();

        if let Some(names) = fields.take("modifiers") {
            for name in expect_elements(names)? {
                let text = expect_symbol(name)?;
                let flag = Flags::from_name(text).ok_or_else(|| ParseError::UnknownModifier {
                    name: text.to_string(),
                    pos: name.position(),
                })?;
                flags.insert(flag);
            }
        }
        if let Some(raw) = fields.take("flags") {
            let bits = u64::try_from(expect_number(raw)?)
                .map_err(|_| expected("non-negative bits", raw))?;
            flags.insert(Flags::from_bits_retain(bits));
        }

        let annotations = match fields.take("annotations") {
            Some(s) => self.build_all(s, Self::build_annotation)?,
            None => Vec::new(),
        };

        Ok(Modifiers { flags, annotations })
    }

    fn build_annotation(&mut self, sexp: &SExp) -> Result<NodeId> {
        let list = expect_form(sexp, "Annotation")?;
        let mut fields = Fields::parse(list)?;
        let type_name = match fields.require("type")? {
            SExp::Symbol(s) => s.value.clone(),
            other => expect_string(other)?,
        };
        let args = match fields.take("args") {
            Some(s) => build_args(s)?,
            None => Vec::new(),
        };
        fields.finish()?;

        self.alloc(NodeData::Annotation(Annotation { type_name, args }), list)
    }
}

impl Default for AstBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// `(:name value ...)` pairs of an annotation.
fn build_args(sexp: &SExp) -> Result<Vec<AnnotationArg>> {
    let elements = expect_elements(sexp)?;
    let mut args = Vec::new();

    for pair in elements.chunks(2) {
        let SExp::Keyword(key) = &pair[0] else {
            return Err(expected("keyword", &pair[0]));
        };
        let Some(value) = pair.get(1) else {
            return Err(ParseError::Expected {
                expected: format!("value after :{}", key.value),
                found: "end of list".to_string(),
                pos: key.pos,
            });
        };
        let value = match value {
            SExp::String(s) => ArgValue::Str(s.value.clone()),
            SExp::Number(n) => ArgValue::Int(n.value),
            SExp::Symbol(s) if s.value == "true" || s.value == "false" => {
                ArgValue::Bool(s.value == "true")
            }
            SExp::Symbol(s) => ArgValue::Ident(s.value.clone()),
            other => return Err(expected("string, number or identifier", other)),
        };
        args.push(AnnotationArg { name: key.value.clone(), value });
    }

    Ok(args)
}

fn span_of(list: &List) -> Span {
    Span::at(list.pos.offset)
}
