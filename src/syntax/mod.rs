//! Syntax check for generated source.
//!
//! A lexer and recursive-descent parser for the subset of Rust the code
//! generator emits. The check answers one question: does the text parse?
//! Name resolution and type checking are out of scope.

pub mod ast;
pub(crate) mod lexeme;
pub(crate) mod lexer;
pub(crate) mod parser;

use std::{panic, thread};

use crate::diagnostic::Diagnostic;
use crate::span::{Span, Spanned};

use lexer::Lexer;
use lexeme::Lexeme;
use parser::Parser;

/// Nesting the parser handles on the caller's stack.
const INLINE_NESTING: usize = 48;
/// Parser stack reserved per nesting level beyond that.
const STACK_PER_LEVEL: usize = 64 * 1024;
const BASE_STACK: usize = 1 << 20;

/// Parse `source` into a syntax tree.
///
/// Lexical errors are reported before any parsing is attempted; otherwise the
/// first parse error is returned. Deeply nested input is parsed on a
/// dedicated thread whose stack grows with the nesting depth.
pub fn parse_source(source: &str) -> Result<ast::File, Vec<Diagnostic>> {
    parse_with(source, |file| file)
}

/// Succeeds iff `source` is syntactically valid.
pub fn check(source: &str) -> Result<(), Vec<Diagnostic>> {
    // The tree is dropped on the parsing thread.
    parse_with(source, |_| ())
}

fn parse_with<T, F>(source: &str, finish: F) -> Result<T, Vec<Diagnostic>>
where
    T: Send + 'static,
    F: FnOnce(ast::File) -> T + Send + 'static,
{
    let (tokens, lex_errors) = Lexer::new(source).tokenize();
    if !lex_errors.is_empty() {
        return Err(lex_errors);
    }
    let depth = nesting_depth(&tokens);
    let parser = Parser::new(tokens);
    if depth <= INLINE_NESTING {
        return parser.parse_file().map(finish);
    }

    let stack_size = BASE_STACK + depth * STACK_PER_LEVEL;
    let spawned = thread::Builder::new()
        .name("boostc-parse".to_string())
        .stack_size(stack_size)
        .spawn(move || parser.parse_file().map(finish));
    match spawned {
        Ok(handle) => match handle.join() {
            Ok(result) => result,
            Err(payload) => panic::resume_unwind(payload),
        },
        Err(err) => Err(vec![Diagnostic::error(
            format!("cannot start a parser thread for nesting depth {depth}: {err}"),
            Span::dummy(),
        )
        .with_help(format!("{stack_size} bytes of stack were requested"))]),
    }
}

/// Upper bound on the parser's recursion: open delimiters plus `else if`
/// links, which chain without a brace.
fn nesting_depth(tokens: &[Spanned<Lexeme>]) -> usize {
    let mut open = 0usize;
    let mut deepest = 0usize;
    let mut else_ifs = 0usize;
    let mut previous: Option<&Lexeme> = None;
    for token in tokens {
        match &token.node {
            Lexeme::LParen | Lexeme::LBrace | Lexeme::LBracket => {
                open += 1;
                deepest = deepest.max(open);
            }
            Lexeme::RParen | Lexeme::RBrace | Lexeme::RBracket => open = open.saturating_sub(1),
            Lexeme::If if previous == Some(&Lexeme::Else) => else_ifs += 1,
            _ => {}
        }
        previous = Some(&token.node);
    }
    deepest + else_ifs
}

/// True if `name` can be used as a plain identifier in generated code.
pub fn is_identifier(name: &str) -> bool {
    let mut bytes = name.bytes();
    let starts_well = match bytes.next() {
        Some(first) => first == b'_' || first.is_ascii_alphabetic(),
        None => false,
    };
    starts_well
        && bytes.all(|b| b == b'_' || b.is_ascii_alphanumeric())
        && !lexeme::Lexeme::is_keyword(name)
}
