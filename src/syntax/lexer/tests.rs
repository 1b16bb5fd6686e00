use super::*;

fn lex(source: &str) -> Vec<Lexeme> {
    let (tokens, diags) = Lexer::new(source).tokenize();
    assert!(diags.is_empty(), "unexpected diagnostics: {:?}", diags);
    tokens.into_iter().map(|t| t.node).collect()
}

fn lex_errors(source: &str) -> Vec<Diagnostic> {
    Lexer::new(source).tokenize().1
}

#[test]
fn test_keywords_and_idents() {
    let tokens = lex("pub fn predict_tree_0 mod model");
    assert_eq!(
        tokens,
        vec![
            Lexeme::Pub,
            Lexeme::Fn,
            Lexeme::Ident("predict_tree_0".into()),
            Lexeme::Mod,
            Lexeme::Ident("model".into()),
            Lexeme::Eof,
        ]
    );
}

#[test]
fn test_float_literals_with_suffix() {
    let tokens = lex("10.0f32 -1.5 1e-7f32 2.5E+3 3f64");
    assert_eq!(
        tokens,
        vec![
            Lexeme::Float {
                value: 10.0,
                suffix: Some("f32".into())
            },
            Lexeme::Minus,
            Lexeme::Float {
                value: 1.5,
                suffix: None
            },
            Lexeme::Float {
                value: 1e-7,
                suffix: Some("f32".into())
            },
            Lexeme::Float {
                value: 2500.0,
                suffix: None
            },
            Lexeme::Float {
                value: 3.0,
                suffix: Some("f64".into())
            },
            Lexeme::Eof,
        ]
    );
}

#[test]
fn test_integer_literals() {
    let tokens = lex("0 42usize 1_000 0xff");
    assert_eq!(
        tokens,
        vec![
            Lexeme::Integer {
                value: 0,
                suffix: None
            },
            Lexeme::Integer {
                value: 42,
                suffix: Some("usize".into())
            },
            Lexeme::Integer {
                value: 1000,
                suffix: None
            },
            Lexeme::Integer {
                value: 255,
                suffix: None
            },
            Lexeme::Eof,
        ]
    );
}

#[test]
fn test_method_call_on_integer_is_not_float() {
    let tokens = lex("1.max");
    assert_eq!(
        tokens,
        vec![
            Lexeme::Integer {
                value: 1,
                suffix: None
            },
            Lexeme::Dot,
            Lexeme::Ident("max".into()),
            Lexeme::Eof,
        ]
    );
}

#[test]
fn test_compound_symbols() {
    let tokens = lex(":: -> => == != <= >= += -= && || |");
    assert_eq!(
        tokens,
        vec![
            Lexeme::PathSep,
            Lexeme::Arrow,
            Lexeme::FatArrow,
            Lexeme::EqEq,
            Lexeme::NotEq,
            Lexeme::Le,
            Lexeme::Ge,
            Lexeme::PlusEq,
            Lexeme::MinusEq,
            Lexeme::AndAnd,
            Lexeme::OrOr,
            Lexeme::Pipe,
            Lexeme::Eof,
        ]
    );
}

#[test]
fn test_comments_are_skipped() {
    let tokens = lex("// header\n/// doc\nfn /* inner /* nested */ */ a");
    assert_eq!(
        tokens,
        vec![Lexeme::Fn, Lexeme::Ident("a".into()), Lexeme::Eof]
    );
}

#[test]
fn test_string_literal_escapes() {
    let tokens = lex(r#""a\"b\n""#);
    assert_eq!(tokens, vec![Lexeme::Str("a\"b\n".into()), Lexeme::Eof]);
}

#[test]
fn test_reserved_word() {
    let tokens = lex("match");
    assert_eq!(tokens, vec![Lexeme::Reserved("match".into()), Lexeme::Eof]);
}

#[test]
fn test_spans_are_byte_offsets() {
    let (tokens, _) = Lexer::new("fn  ab").tokenize();
    assert_eq!(tokens[0].span, Span::new(0, 2));
    assert_eq!(tokens[1].span, Span::new(4, 6));
    assert_eq!(tokens[2].span, Span::new(6, 6));
}

#[test]
fn test_invalid_suffix_is_reported() {
    let errors = lex_errors("1.0u8");
    assert_eq!(errors.len(), 1);
    assert!(errors[0].message.contains("invalid suffix `u8`"));
}

#[test]
fn test_unexpected_character() {
    let errors = lex_errors("fn a() { $ }");
    assert_eq!(errors.len(), 1);
    assert!(errors[0].message.contains("unexpected character '$'"));
}

#[test]
fn test_unterminated_block_comment() {
    let errors = lex_errors("fn a() /* never closed");
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].message, "unterminated block comment");
}

#[test]
fn test_unterminated_string() {
    let errors = lex_errors("\"abc");
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].message, "unterminated string literal");
}
