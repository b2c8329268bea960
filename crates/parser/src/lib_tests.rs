use super::*;

#[test]
fn parse_rejects_lexer_errors_as_parse_errors() {
    let err = parse("process main { print(\"unterminated); }").unwrap_err();
    assert!(matches!(err, ParseError::Lexer(LexerError::UnterminatedString { .. })));
}

#[test]
fn parse_end_to_end_scenario_one_linear_up() {
    let program = parse(r#"process main { print("a"); print("b"); print("c"); }"#).expect("should parse");
    assert_eq!(program.processes[0].statements.len(), 3);
}

#[test]
fn parse_end_to_end_scenario_four_template_call() {
    let program = parse(
        r#"
        template T { print(_args.0); }
        process main { call("T", {"world"}); }
        "#,
    )
    .expect("should parse");
    assert_eq!(program.processes.len(), 2);
    assert!(program.processes[0].is_template);
    assert!(!program.processes[1].is_template);
}
