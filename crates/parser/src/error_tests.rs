use super::*;
use crate::token::TokenKind;

#[test]
fn lexer_error_span_is_exposed() {
    let err: ParseError = LexerError::UnexpectedChar { ch: '-', span: Span::new(2, 3) }.into();
    assert_eq!(err.span(), Some(Span::new(2, 3)));
}

#[test]
fn unexpected_eof_has_no_span() {
    let err = ParseError::UnexpectedEof { expected: "identifier".to_string() };
    assert_eq!(err.span(), None);
    assert!(err.diagnostic("process main {").is_none());
}

#[test]
fn diagnostic_includes_line_and_column() {
    let src = "process main {\n  foo(\n";
    let err = ParseError::UnexpectedToken { found: TokenKind::Eof, expected: "')'".to_string(), span: Span::new(20, 21) };
    let diag = err.diagnostic(src).expect("span present");
    assert!(diag.contains("line 2"));
    assert!(diag.contains("^"));
}

#[test]
fn duplicate_process_name_message() {
    let err = ParseError::DuplicateProcessName { name: "main".to_string(), span: Span::new(0, 4) };
    assert_eq!(err.to_string(), "duplicate process name 'main'");
}
