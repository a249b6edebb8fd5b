//! Locating, decoding and consuming marker annotations.
//!
//! Matching is two-tier. The written type name must first equal the
//! marker's simple or qualified name; a simple name is then only accepted
//! when the compilation unit makes it resolve to the marker: a single-type
//! import, or else an on-demand import of its package or the same package.
//! A single-type import of a different type with the same simple name
//! shadows the last two.

use std::str::FromStr;

use lathe_ast::{ArgValue, Ast, NodeData, NodeId};
use tracing::debug;

/// Identifies a marker annotation by simple and fully qualified name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkerDescriptor {
    pub simple: &'static str,
    pub qualified: &'static str,
}

impl MarkerDescriptor {
    pub const fn new(simple: &'static str, qualified: &'static str) -> Self {
        Self { simple, qualified }
    }

    /// Package part of the qualified name; empty for the default package.
    pub fn package(&self) -> &'static str {
        self.qualified.rsplit_once('.').map_or("", |(pkg, _)| pkg)
    }

    /// `@Simple`, for messages.
    pub fn label(&self) -> String {
        format!("@{}", self.simple)
    }
}

/// How a written annotation name was confirmed to denote a marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameMatch {
    Qualified,
    Imported,
    OnDemandImport,
    SamePackage,
}

/// Resolve a written annotation type name against `descriptor` in the
/// context of the compilation unit containing `node`.
pub fn match_name(
    ast: &Ast,
    node: NodeId,
    written: &str,
    descriptor: &MarkerDescriptor,
) -> Option<NameMatch> {
    if written == descriptor.qualified {
        return Some(NameMatch::Qualified);
    }
    if written != descriptor.simple {
        return None;
    }

    let unit = ast.node(node).compilation_unit();
    let NodeData::CompilationUnit(cu) = unit.data() else {
        return None;
    };

    let on_demand = format!("{}.*", descriptor.package());
    let mut found = None;
    for &import in &cu.imports {
        let NodeData::Import(import) = ast.get(import) else { continue };
        if import.is_static {
            continue;
        }
        if import.path == descriptor.qualified {
            return Some(NameMatch::Imported);
        }
        // A single-type import of another type with this simple name
        // shadows on-demand imports and the unit's own package.
        if import.path.rsplit_once('.').is_some_and(|(_, s)| s == descriptor.simple) {
            return None;
        }
        if import.path == on_demand {
            found = Some(NameMatch::OnDemandImport);
        }
    }

    found.or_else(|| {
        (cu.package.as_deref().unwrap_or("") == descriptor.package())
            .then_some(NameMatch::SamePackage)
    })
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("{marker} does not accept argument '{name}'")]
    UnknownArgument { marker: String, name: String },

    #[error("{marker}: argument '{name}' must be {expected}")]
    WrongType { marker: String, name: String, expected: &'static str },
}

/// Arguments written on a marker use.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AnnotationValues {
    marker: String,
    values: Vec<(String, ArgValue)>,
}

impl AnnotationValues {
    pub fn new(marker: impl Into<String>, values: Vec<(String, ArgValue)>) -> Self {
        Self { marker: marker.into(), values }
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.iter().map(|(n, _)| n.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn raw(&self, name: &str) -> Option<&ArgValue> {
        self.values.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    fn wrong_type(&self, name: &str, expected: &'static str) -> DecodeError {
        DecodeError::WrongType { marker: self.marker.clone(), name: name.to_string(), expected }
    }

    pub fn get_str(&self, name: &str) -> Result<Option<&str>, DecodeError> {
        match self.raw(name) {
            None => Ok(None),
            Some(ArgValue::Str(s)) => Ok(Some(s)),
            Some(_) => Err(self.wrong_type(name, "a string")),
        }
    }

    pub fn get_bool(&self, name: &str) -> Result<Option<bool>, DecodeError> {
        match self.raw(name) {
            None => Ok(None),
            Some(ArgValue::Bool(b)) => Ok(Some(*b)),
            Some(_) => Err(self.wrong_type(name, "true or false")),
        }
    }

    /// Parse an identifier or string argument, e.g. an enum constant.
    pub fn get_parsed<T: FromStr>(&self, name: &str) -> Result<Option<T>, DecodeError> {
        let text = match self.raw(name) {
            None => return Ok(None),
            Some(ArgValue::Ident(s)) | Some(ArgValue::Str(s)) => s,
            Some(_) => return Err(self.wrong_type(name, "an identifier")),
        };
        text.parse().map(Some).map_err(|_| self.wrong_type(name, "a known constant"))
    }

    /// Fail on any argument outside `accepted`.
    pub fn only(&self, accepted: &[&str]) -> Result<(), DecodeError> {
        match self.names().find(|n| !accepted.contains(n)) {
            None => Ok(()),
            Some(name) => Err(DecodeError::UnknownArgument {
                marker: self.marker.clone(),
                name: name.to_string(),
            }),
        }
    }
}

/// A marker type with a typed payload.
pub trait Marker: Sized {
    const DESCRIPTOR: MarkerDescriptor;

    fn decode(values: &AnnotationValues) -> Result<Self, DecodeError>;
}

/// Marks every method parameter of a class or enum `final`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AllArgsFinal;

impl Marker for AllArgsFinal {
    const DESCRIPTOR: MarkerDescriptor =
        MarkerDescriptor::new("AllArgsFinal", "lathe.experimental.AllArgsFinal");

    fn decode(values: &AnnotationValues) -> Result<Self, DecodeError> {
        values.only(&[])?;
        Ok(AllArgsFinal)
    }
}

/// Opts a single parameter out of [`AllArgsFinal`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NonFinal;

impl Marker for NonFinal {
    const DESCRIPTOR: MarkerDescriptor =
        MarkerDescriptor::new("NonFinal", "lathe.experimental.NonFinal");

    fn decode(values: &AnnotationValues) -> Result<Self, DecodeError> {
        values.only(&[])?;
        Ok(NonFinal)
    }
}

/// A located marker-use node.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerUse {
    pub node: NodeId,
    pub matched: NameMatch,
    pub values: AnnotationValues,
}

impl MarkerUse {
    pub fn decode<M: Marker>(&self) -> Result<M, DecodeError> {
        M::decode(&self.values)
    }
}

/// Find the first annotation-use child of `node` that denotes `descriptor`.
///
/// Only direct children are scanned. Later uses of the same marker are
/// ignored.
pub fn find_marker(ast: &Ast, node: NodeId, descriptor: &MarkerDescriptor) -> Option<MarkerUse> {
    ast.node(node).annotations().find_map(|ann| {
        let NodeData::Annotation(data) = ann.data() else { return None };
        let matched = match_name(ast, ann.id(), &data.type_name, descriptor)?;
        let values = data.args.iter().map(|a| (a.name.clone(), a.value.clone())).collect();

        Some(MarkerUse {
            node: ann.id(),
            matched,
            values: AnnotationValues::new(descriptor.label(), values),
        })
    })
}

/// Remove a marker-use node from its parent and resync the parent.
/// Deleting a marker that is already detached does nothing.
pub fn delete_marker(ast: &mut Ast, marker: NodeId) -> bool {
    let Some(parent) = ast.parent(marker) else {
        return false;
    };
    let removed = ast.remove_child(parent, marker);
    if removed {
        debug!(marker = %marker, parent = %parent, "deleted marker");
    }
    removed
}

/// If `node` carries `descriptor`, delete that use and report true.
pub fn has_marker_and_delete(ast: &mut Ast, node: NodeId, descriptor: &MarkerDescriptor) -> bool {
    match find_marker(ast, node, descriptor) {
        Some(found) => {
            delete_marker(ast, found.node);
            true
        }
        None => false,
    }
}

/// Remove the single-type import of `qualified` from the compilation unit
/// rooted at `unit`, unless an attached annotation still resolves through
/// it. Returns true if an import was removed.
pub fn delete_now_unused_import(ast: &mut Ast, unit: NodeId, qualified: &str) -> bool {
    let NodeData::CompilationUnit(cu) = ast.get(unit) else {
        return false;
    };
    let Some(import) = cu.imports.iter().copied().find(|&id| {
        matches!(ast.get(id), NodeData::Import(i) if !i.is_static && i.path == qualified)
    }) else {
        return false;
    };

    let simple = qualified.rsplit_once('.').map_or(qualified, |(_, s)| s);
    let still_used = ast
        .descendants(unit)
        .into_iter()
        .any(|id| matches!(ast.get(id), NodeData::Annotation(a) if a.type_name == simple));
    if still_used {
        return false;
    }

    debug!(import = qualified, "deleted unused import");
    ast.remove_child(unit, import)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lathe_ast::{parse_unit, Kind};

    fn unit(imports: &str, package: &str, annotation: &str) -> Ast {
        parse_unit(&format!(
            r#"(CompilationUnit :package "{package}" :imports ({imports})
                 :types ((Type :name "Foo" :annotations ((Annotation :type "{annotation}")))))"#
        ))
        .unwrap()
    }

    fn first_type(ast: &Ast) -> NodeId {
        ast.node(ast.root()).children_of_kind(Kind::Type).next().unwrap().id()
    }

    #[test]
    fn test_descriptor_package() {
        assert_eq!(AllArgsFinal::DESCRIPTOR.package(), "lathe.experimental");
        assert_eq!(MarkerDescriptor::new("X", "X").package(), "");
    }

    #[test]
    fn test_match_qualified_without_import() {
        let ast = unit("", "app", "lathe.experimental.AllArgsFinal");
        let found = find_marker(&ast, first_type(&ast), &AllArgsFinal::DESCRIPTOR).unwrap();
        assert_eq!(found.matched, NameMatch::Qualified);
    }

    #[test]
    fn test_match_simple_needs_import() {
        let ast = unit("", "app", "AllArgsFinal");
        assert!(find_marker(&ast, first_type(&ast), &AllArgsFinal::DESCRIPTOR).is_none());
    }

    #[test]
    fn test_match_simple_with_import() {
        let ast = unit(r#"(Import :path "lathe.experimental.AllArgsFinal")"#, "app", "AllArgsFinal");
        let found = find_marker(&ast, first_type(&ast), &AllArgsFinal::DESCRIPTOR).unwrap();
        assert_eq!(found.matched, NameMatch::Imported);
    }

    #[test]
    fn test_match_simple_with_on_demand_import() {
        let ast = unit(r#"(Import :path "lathe.experimental.*")"#, "app", "AllArgsFinal");
        let found = find_marker(&ast, first_type(&ast), &AllArgsFinal::DESCRIPTOR).unwrap();
        assert_eq!(found.matched, NameMatch::OnDemandImport);
    }

    #[test]
    fn test_match_simple_in_same_package() {
        let ast = unit("", "lathe.experimental", "AllArgsFinal");
        let found = find_marker(&ast, first_type(&ast), &AllArgsFinal::DESCRIPTOR).unwrap();
        assert_eq!(found.matched, NameMatch::SamePackage);
    }

    #[test]
    fn test_static_import_does_not_count() {
        let ast = unit(
            r#"(Import :path "lathe.experimental.AllArgsFinal" :static true)"#,
            "app",
            "AllArgsFinal",
        );
        assert!(find_marker(&ast, first_type(&ast), &AllArgsFinal::DESCRIPTOR).is_none());
    }

    #[test]
    fn test_single_type_import_shadows_on_demand_import() {
        let ast = unit(
            r#"(Import :path "other.AllArgsFinal") (Import :path "lathe.experimental.*")"#,
            "app",
            "AllArgsFinal",
        );
        assert!(find_marker(&ast, first_type(&ast), &AllArgsFinal::DESCRIPTOR).is_none());
    }

    #[test]
    fn test_single_type_import_shadows_same_package() {
        let ast =
            unit(r#"(Import :path "other.AllArgsFinal")"#, "lathe.experimental", "AllArgsFinal");
        assert!(find_marker(&ast, first_type(&ast), &AllArgsFinal::DESCRIPTOR).is_none());
    }

    #[test]
    fn test_static_import_does_not_shadow() {
        let ast = unit(
            r#"(Import :path "other.AllArgsFinal" :static true) (Import :path "lathe.experimental.*")"#,
            "app",
            "AllArgsFinal",
        );
        let found = find_marker(&ast, first_type(&ast), &AllArgsFinal::DESCRIPTOR).unwrap();
        assert_eq!(found.matched, NameMatch::OnDemandImport);
    }

    #[test]
    fn test_shadowed_opt_out_is_kept() {
        let mut ast = parse_unit(
            r#"(CompilationUnit :package "app"
                 :imports ((Import :path "other.NonFinal") (Import :path "lathe.experimental.*"))
                 :types ((Type :name "Foo" :annotations ((Annotation :type NonFinal)))))"#,
        )
        .unwrap();
        let ty = first_type(&ast);
        assert!(!has_marker_and_delete(&mut ast, ty, &NonFinal::DESCRIPTOR));
        assert_eq!(ast.node(ty).annotations().count(), 1);
    }

    #[test]
    fn test_other_qualified_name_does_not_match() {
        let ast = unit(r#"(Import :path "other.AllArgsFinal")"#, "app", "other.AllArgsFinal");
        assert!(find_marker(&ast, first_type(&ast), &AllArgsFinal::DESCRIPTOR).is_none());
    }

    #[test]
    fn test_decode_rejects_arguments() {
        let values = AnnotationValues::new("@AllArgsFinal", vec![("x".into(), ArgValue::Int(1))]);
        assert_eq!(
            AllArgsFinal::decode(&values),
            Err(DecodeError::UnknownArgument { marker: "@AllArgsFinal".into(), name: "x".into() })
        );
    }

    #[test]
    fn test_typed_getters() {
        let values = AnnotationValues::new(
            "@Level",
            vec![
                ("value".into(), ArgValue::Ident("PUBLIC".into())),
                ("lazy".into(), ArgValue::Bool(true)),
                ("doc".into(), ArgValue::Str("d".into())),
            ],
        );
        assert_eq!(values.get_bool("lazy").unwrap(), Some(true));
        assert_eq!(values.get_str("doc").unwrap(), Some("d"));
        assert_eq!(values.get_parsed::<String>("value").unwrap(), Some("PUBLIC".to_string()));
        assert!(values.get_bool("doc").is_err());
        assert_eq!(values.get_str("missing").unwrap(), None);
        assert!(values.only(&["value", "lazy", "doc"]).is_ok());
    }

    #[test]
    fn test_delete_marker_is_idempotent() {
        let mut ast = unit("", "app", "lathe.experimental.AllArgsFinal");
        let ty = first_type(&ast);
        let found = find_marker(&ast, ty, &AllArgsFinal::DESCRIPTOR).unwrap();

        assert!(delete_marker(&mut ast, found.node));
        assert!(!delete_marker(&mut ast, found.node));
        assert_eq!(ast.node(ty).annotations().count(), 0);
        assert!(!ast.is_stale(ty));
    }

    #[test]
    fn test_delete_now_unused_import() {
        let mut ast = unit(
            r#"(Import :path "lathe.experimental.AllArgsFinal") (Import :path "java.util.List")"#,
            "app",
            "AllArgsFinal",
        );
        let root = ast.root();
        let ty = first_type(&ast);

        // Still referenced by the marker on Foo.
        assert!(!delete_now_unused_import(&mut ast, root, "lathe.experimental.AllArgsFinal"));

        assert!(has_marker_and_delete(&mut ast, ty, &AllArgsFinal::DESCRIPTOR));
        assert!(delete_now_unused_import(&mut ast, root, "lathe.experimental.AllArgsFinal"));
        assert!(!delete_now_unused_import(&mut ast, root, "lathe.experimental.AllArgsFinal"));
        assert_eq!(ast.node(root).children_of_kind(Kind::Import).count(), 1);
    }
}
