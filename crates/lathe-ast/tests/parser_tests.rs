use lathe_ast::sexp::{print_sexp, Parser, Printer, SExp};
use lathe_ast::ParseError;

#[test]
fn test_parse_symbol() {
    let sexp = Parser::parse_str("foo").unwrap();
    match sexp {
        SExp::Symbol(s) => assert_eq!(s.value, "foo"),
        _ => panic!("Expected Symbol, got {:?}", sexp),
    }
}

#[test]
fn test_parse_number() {
    match Parser::parse_str("42").unwrap() {
        SExp::Number(n) => assert_eq!(n.value, 42),
        other => panic!("Expected Number, got {:?}", other),
    }
}

#[test]
fn test_parse_nested_list() {
    let sexp = Parser::parse_str("(Type :members ((Method :name \"m\")))").unwrap();
    let SExp::List(list) = sexp else { panic!("Expected list") };
    assert_eq!(list.head(), Some("Type"));
    assert_eq!(list.elements.len(), 3);
    assert!(matches!(list.elements[2], SExp::List(_)));
}

#[test]
fn test_parse_empty_input() {
    assert!(matches!(Parser::parse_str("   ; nothing"), Err(ParseError::EmptyInput)));
}

#[test]
fn test_parse_unterminated_list() {
    assert!(matches!(Parser::parse_str("(a (b)"), Err(ParseError::UnterminatedList { .. })));
}

#[test]
fn test_parse_error_position() {
    let err = Parser::parse_str("(a\n  (b").unwrap_err();
    let pos = err.position().unwrap();
    assert_eq!((pos.offset, pos.line, pos.column), (5, 2, 3));
    assert!(ParseError::EmptyInput.position().is_none());
}

#[test]
fn test_parse_unexpected_close() {
    assert!(matches!(Parser::parse_str(")"), Err(ParseError::UnexpectedCloseParen { .. })));
}

#[test]
fn test_parse_rejects_trailing_forms() {
    assert!(matches!(Parser::parse_str("(a) (b)"), Err(ParseError::UnexpectedToken { .. })));
}

#[test]
fn test_parse_number_out_of_range() {
    assert!(matches!(
        Parser::parse_str("99999999999999999999"),
        Err(ParseError::Expected { .. })
    ));
}

#[test]
fn test_print_short_list_on_one_line() {
    let sexp = Parser::parse_str("(Import   :path\n \"a.B\")").unwrap();
    assert_eq!(print_sexp(&sexp), "(Import :path \"a.B\")");
}

#[test]
fn test_print_breaks_long_list_keeping_pairs() {
    let sexp = Parser::parse_str("(Method :name \"averyveryverylongname\" :returns \"void\")").unwrap();
    let printed = Printer::new().with_width(30).print(&sexp);
    assert_eq!(printed, "(Method\n  :name \"averyveryverylongname\"\n  :returns \"void\")");
}

#[test]
fn test_print_escapes_strings() {
    let sexp = Parser::parse_str(r#""say \"hi\"""#).unwrap();
    assert_eq!(print_sexp(&sexp), r#""say \"hi\"""#);
}

#[test]
fn test_print_then_parse_preserves_structure() {
    let input = "(CompilationUnit :types ((Type :name \"Foo\" :members ((Method :name \"bar\" :params ((Param :name \"x\" :type \"int\")))))))";
    let sexp = Parser::parse_str(input).unwrap();
    let printed = Printer::new().with_width(20).print(&sexp);
    let reparsed = Parser::parse_str(&printed).unwrap();
    assert_eq!(print_sexp(&reparsed), print_sexp(&sexp));
}
