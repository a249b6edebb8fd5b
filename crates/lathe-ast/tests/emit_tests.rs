use lathe_ast::{emit_string, parse_unit, Flags, Kind, NodeData};

const UNIT: &str = r#"(CompilationUnit
  :package "p"
  :imports ((Import :path "lathe.experimental.NonFinal") (Import :path "java.util.*" :static true))
  :types ((Type :name "Foo" :kind enum :modifiers (public)
                :members ((Method :name "Foo" :params ((Param :name "v" :type "int" :flags 4294967296
                                                               :annotations ((Annotation :type "NonFinal")))))))))"#;

#[test]
fn test_emit_round_trip() {
    let ast = parse_unit(UNIT).unwrap();
    let emitted = emit_string(&ast);
    let again = parse_unit(&emitted).unwrap();

    assert_eq!(emit_string(&again), emitted);
    assert_eq!(again.node_count(), ast.node_count());
}

#[test]
fn test_emit_keeps_kind_out_of_modifiers() {
    let ast = parse_unit(UNIT).unwrap();
    let emitted = emit_string(&ast);

    assert!(emitted.contains(":kind enum"));
    assert!(emitted.contains(":modifiers (public)"));
    assert!(!emitted.contains("(public enum)"));
}

#[test]
fn test_emit_constructor_has_no_return_type() {
    let emitted = emit_string(&parse_unit(UNIT).unwrap());
    assert!(!emitted.contains(":returns"));
}

#[test]
fn test_emit_reflects_underlying_mutation() {
    let mut ast = parse_unit(UNIT).unwrap();
    let param = ast
        .descendants(ast.root())
        .into_iter()
        .find(|&id| ast.node(id).kind() == Kind::Parameter)
        .unwrap();

    ast.modifiers_mut(param).unwrap().flags.insert(Flags::FINAL);
    ast.resync(param);

    let emitted = emit_string(&ast);
    assert!(emitted.contains(":modifiers (final)"));
    assert!(emitted.contains(":flags 4294967296"));
}

#[test]
fn test_emit_skips_removed_annotation() {
    let mut ast = parse_unit(UNIT).unwrap();
    let ann = ast
        .descendants(ast.root())
        .into_iter()
        .find(|&id| matches!(ast.get(id), NodeData::Annotation(_)))
        .unwrap();
    let param = ast.parent(ann).unwrap();

    assert!(ast.remove_child(param, ann));
    assert!(!emit_string(&ast).contains("(Annotation"));
}
