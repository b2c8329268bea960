use super::*;
use crate::lexer::Lexer;

fn parse(src: &str) -> Result<Program, ParseError> {
    let tokens = Lexer::new(src).tokenize()?;
    Parser::new(tokens).parse_program()
}

#[test]
fn parses_empty_configuration() {
    let program = parse("").expect("empty config is legal");
    assert!(program.processes.is_empty());
}

#[test]
fn parses_linear_process() {
    let program = parse(r#"process main { print("a"); print("b"); print("c"); }"#).expect("should parse");
    assert_eq!(program.processes.len(), 1);
    let def = &program.processes[0];
    assert_eq!(def.name, "main");
    assert!(!def.is_template);
    assert_eq!(def.statements.len(), 3);
    assert_eq!(def.statements[0].method.to_dotted_string(), "print");
}

#[test]
fn parses_template_with_dotted_method_and_object_prefix() {
    let program = parse("template T { a.b -> net.ipv4.addr(x, y); }").expect("should parse");
    let def = &program.processes[0];
    assert!(def.is_template);
    let stmt = &def.statements[0];
    assert_eq!(stmt.object_prefix.as_ref().unwrap().to_dotted_string(), "a.b");
    assert_eq!(stmt.method.to_dotted_string(), "net.ipv4.addr");
    assert_eq!(stmt.args.len(), 2);
}

#[test]
fn parses_explicit_label() {
    let program = parse(r#"process main { var("hello") x; print(x); }"#).expect("should parse");
    let def = &program.processes[0];
    assert_eq!(def.statements[0].label.as_deref(), Some("x"));
    assert_eq!(def.statements[0].effective_label(), "x");
    assert_eq!(def.statements[1].effective_label(), "print");
}

#[test]
fn parses_nested_list_argument() {
    let program = parse(r#"process main { call("T", {"world", x}); }"#).expect("should parse");
    let args = &program.processes[0].statements[0].args;
    assert_eq!(args.len(), 2);
    match &args[1] {
        Expr::List(items, _) => assert_eq!(items.len(), 2),
        other => panic!("expected list, got {other:?}"),
    }
}

#[test]
fn rejects_duplicate_process_names() {
    let err = parse("process main {} process main {}").unwrap_err();
    assert!(matches!(err, ParseError::DuplicateProcessName { name, .. } if name == "main"));
}

#[test]
fn reports_unexpected_token_with_span() {
    let err = parse("process main { print(; }").unwrap_err();
    match err {
        ParseError::UnexpectedToken { span, .. } => assert!(span.start > 0),
        other => panic!("expected UnexpectedToken, got {other:?}"),
    }
}

#[test]
fn reports_unexpected_eof_inside_unterminated_block() {
    let err = parse("process main { print(\"a\");").unwrap_err();
    assert!(matches!(err, ParseError::UnexpectedEof { .. }));
}

#[test]
fn statement_without_arguments_parses() {
    let program = parse("process main { block() b; }").expect("should parse");
    assert!(program.processes[0].statements[0].args.is_empty());
}

#[test]
fn unparse_then_reparse_is_stable() {
    let program = parse(r#"process main { var("hi") y; print(y); }"#).expect("should parse");
    let text = crate::ast::unparse(&program);
    let reparsed = parse(&text).expect("canonical form re-parses");
    assert_eq!(program.processes.len(), reparsed.processes.len());
    assert_eq!(
        program.processes[0].statements.len(),
        reparsed.processes[0].statements.len()
    );
}
