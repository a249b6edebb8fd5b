use super::{Flags, NodeId};

/// Declaration kind of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    CompilationUnit,
    Import,
    Type,
    Field,
    Method,
    Parameter,
    Annotation,
}

impl Kind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Kind::CompilationUnit => "compilation unit",
            Kind::Import => "import",
            Kind::Type => "type",
            Kind::Field => "field",
            Kind::Method => "method",
            Kind::Parameter => "parameter",
            Kind::Annotation => "annotation",
        }
    }
}

/// Underlying data of a node, in the host's own shape.
///
/// Child references live inside the data (`imports`, `members`,
/// `mods.annotations`, `params`, ...). The arena derives its cached child
/// list from them on [`resync`](super::Ast::resync).
#[derive(Debug, Clone, PartialEq)]
pub enum NodeData {
    CompilationUnit(CompilationUnit),
    Import(Import),
    Type(TypeDecl),
    Field(VarDecl),
    Method(Method),
    Parameter(VarDecl),
    Annotation(Annotation),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct CompilationUnit {
    pub package: Option<String>,
    pub imports: Vec<NodeId>,
    pub types: Vec<NodeId>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Import {
    pub path: String,
    pub is_static: bool,
}

impl Import {
    /// `a.b.*` style import
    pub fn is_on_demand(&self) -> bool {
        self.path.ends_with(".*")
    }
}

/// Modifier bits plus the annotation-use nodes written among them.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Modifiers {
    pub flags: Flags,
    pub annotations: Vec<NodeId>,
}

impl Modifiers {
    pub fn new(flags: Flags) -> Self {
        Self { flags, annotations: Vec::new() }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeFlavor {
    Class,
    Enum,
    Interface,
    Annotation,
}

impl TypeFlavor {
    pub fn as_str(&self) -> &'static str {
        match self {
            TypeFlavor::Class => "class",
            TypeFlavor::Enum => "enum",
            TypeFlavor::Interface => "interface",
            TypeFlavor::Annotation => "annotation",
        }
    }

    /// Bits the host uses to encode the flavor in a type's modifiers.
    pub fn flags(&self) -> Flags {
        match self {
            TypeFlavor::Class => Flags::empty(),
            TypeFlavor::Enum => Flags::ENUM,
            TypeFlavor::Interface => Flags::INTERFACE,
            TypeFlavor::Annotation => Flags::INTERFACE | Flags::ANNOTATION,
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "class" => Some(TypeFlavor::Class),
            "enum" => Some(TypeFlavor::Enum),
            "interface" => Some(TypeFlavor::Interface),
            "annotation" => Some(TypeFlavor::Annotation),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeDecl {
    pub name: String,
    pub mods: Modifiers,
    pub members: Vec<NodeId>,
}

impl TypeDecl {
    pub fn flavor(&self) -> TypeFlavor {
        let flags = self.mods.flags;
        if flags.contains(Flags::ANNOTATION) {
            TypeFlavor::Annotation
        } else if flags.contains(Flags::INTERFACE) {
            TypeFlavor::Interface
        } else if flags.contains(Flags::ENUM) {
            TypeFlavor::Enum
        } else {
            TypeFlavor::Class
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Method {
    pub name: String,
    pub mods: Modifiers,
    /// `None` for constructors
    pub return_type: Option<String>,
    pub params: Vec<NodeId>,
}

/// Field or parameter declaration
#[derive(Debug, Clone, PartialEq)]
pub struct VarDecl {
    pub name: String,
    pub ty: String,
    pub mods: Modifiers,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    /// Type name exactly as written: simple or fully qualified.
    pub type_name: String,
    pub args: Vec<AnnotationArg>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnnotationArg {
    pub name: String,
    pub value: ArgValue,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ArgValue {
    Str(String),
    Int(i64),
    Bool(bool),
    /// Bare identifier, e.g. an enum constant
    Ident(String),
}

impl NodeData {
    pub fn kind(&self) -> Kind {
        match self {
            NodeData::CompilationUnit(_) => Kind::CompilationUnit,
            NodeData::Import(_) => Kind::Import,
            NodeData::Type(_) => Kind::Type,
            NodeData::Field(_) => Kind::Field,
            NodeData::Method(_) => Kind::Method,
            NodeData::Parameter(_) => Kind::Parameter,
            NodeData::Annotation(_) => Kind::Annotation,
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            NodeData::CompilationUnit(_) => None,
            NodeData::Import(i) => Some(&i.path),
            NodeData::Type(t) => Some(&t.name),
            NodeData::Field(v) | NodeData::Parameter(v) => Some(&v.name),
            NodeData::Method(m) => Some(&m.name),
            NodeData::Annotation(a) => Some(&a.type_name),
        }
    }

    pub fn modifiers(&self) -> Option<&Modifiers> {
        match self {
            NodeData::Type(t) => Some(&t.mods),
            NodeData::Method(m) => Some(&m.mods),
            NodeData::Field(v) | NodeData::Parameter(v) => Some(&v.mods),
            NodeData::CompilationUnit(_) | NodeData::Import(_) | NodeData::Annotation(_) => None,
        }
    }

    pub fn modifiers_mut(&mut self) -> Option<&mut Modifiers> {
        match self {
            NodeData::Type(t) => Some(&mut t.mods),
            NodeData::Method(m) => Some(&mut m.mods),
            NodeData::Field(v) | NodeData::Parameter(v) => Some(&mut v.mods),
            NodeData::CompilationUnit(_) | NodeData::Import(_) | NodeData::Annotation(_) => None,
        }
    }

    /// Child references in traversal order.
    pub fn child_ids(&self) -> Vec<NodeId> {
        match self {
            NodeData::CompilationUnit(cu) => cu.imports.iter().chain(&cu.types).copied().collect(),
            NodeData::Type(t) => t.mods.annotations.iter().chain(&t.members).copied().collect(),
            NodeData::Method(m) => m.mods.annotations.iter().chain(&m.params).copied().collect(),
            NodeData::Field(v) | NodeData::Parameter(v) => v.mods.annotations.clone(),
            NodeData::Import(_) | NodeData::Annotation(_) => Vec::new(),
        }
    }

    /// Drop `child` from whichever list of this node holds it.
    pub fn remove_child(&mut self, child: NodeId) -> bool {
        fn drop_from(list: &mut Vec<NodeId>, child: NodeId) -> bool {
            let before = list.len();
            list.retain(|&id| id != child);
            list.len() != before
        }

        match self {
            NodeData::CompilationUnit(cu) => {
                drop_from(&mut cu.imports, child) || drop_from(&mut cu.types, child)
            }
            NodeData::Type(t) => {
                drop_from(&mut t.mods.annotations, child) || drop_from(&mut t.members, child)
            }
            NodeData::Method(m) => {
                drop_from(&mut m.mods.annotations, child) || drop_from(&mut m.params, child)
            }
            NodeData::Field(v) | NodeData::Parameter(v) => drop_from(&mut v.mods.annotations, child),
            NodeData::Import(_) | NodeData::Annotation(_) => false,
        }
    }
}
