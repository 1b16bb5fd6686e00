use super::*;
use crate::syntax::lexer::Lexer;

fn parse(source: &str) -> File {
    let (tokens, diags) = Lexer::new(source).tokenize();
    assert!(diags.is_empty(), "lex errors: {:?}", diags);
    match Parser::new(tokens).parse_file() {
        Ok(file) => file,
        Err(errors) => panic!("parse errors: {:?}", errors),
    }
}

fn parse_err(source: &str) -> Diagnostic {
    let (tokens, _) = Lexer::new(source).tokenize();
    let errors = Parser::new(tokens)
        .parse_file()
        .expect_err("expected a parse error");
    assert_eq!(errors.len(), 1);
    errors.into_iter().next().unwrap()
}

fn only_fn(file: &File) -> &FnDef {
    match &file.items[0].node {
        Item::Fn(f) => f,
        other => panic!("expected fn, got {:?}", other),
    }
}

fn tail(f: &FnDef) -> &Expr {
    &f.body.node.tail.as_ref().expect("block has no tail").node
}

#[test]
fn test_module_with_consts_and_fns() {
    let file = parse(
        "pub mod model {\n\
         pub const NUM_CLASSES: usize = 1;\n\
         pub const BASE_SCORE: f32 = 0.5f32;\n\
         pub fn predict(features: &[f32]) -> f32 { BASE_SCORE }\n\
         fn helper() {}\n\
         }",
    );
    let module = match &file.items[0].node {
        Item::Mod(m) => m,
        other => panic!("expected mod, got {:?}", other),
    };
    assert_eq!(module.vis, Visibility::Public);
    assert_eq!(module.name.node, "model");
    let items = module.items.as_ref().unwrap();
    assert_eq!(items.len(), 4);
    assert!(matches!(&items[0].node, Item::Const(c) if c.name.node == "NUM_CLASSES"));
    match &items[2].node {
        Item::Fn(f) => {
            assert_eq!(f.params.len(), 1);
            assert!(matches!(
                &f.params[0].ty.node,
                Type::Ref { mutable: false, inner } if matches!(**inner, Type::Slice(_))
            ));
        }
        other => panic!("expected fn, got {:?}", other),
    }
}

#[test]
fn test_precedence_mul_over_add() {
    let file = parse("fn f() -> i32 { 1 + 2 * 3 }");
    match tail(only_fn(&file)) {
        Expr::Binary { op, rhs, .. } => {
            assert_eq!(*op, BinOp::Add);
            assert!(matches!(rhs.node, Expr::Binary { op: BinOp::Mul, .. }));
        }
        other => panic!("expected binary, got {:?}", other),
    }
}

#[test]
fn test_method_chain_with_closure() {
    let file = parse(
        "fn f(features: &[f32]) -> bool {\n\
         features.get(2).copied().filter(|value| !value.is_nan()).map_or(true, |value| value < 10.0f32)\n\
         }",
    );
    match tail(only_fn(&file)) {
        Expr::MethodCall { method, args, .. } => {
            assert_eq!(method.node, "map_or");
            assert_eq!(args.len(), 2);
            assert!(matches!(args[1].node, Expr::Closure { ref params, .. } if params.len() == 1));
        }
        other => panic!("expected method call, got {:?}", other),
    }
}

#[test]
fn test_if_else_chain_as_tail() {
    let file = parse("fn f(x: f32) -> f32 { if x < 1.0 { 1.0 } else if x < 2.0 { 2.0 } else { 3.0 } }");
    match tail(only_fn(&file)) {
        Expr::If { else_branch, .. } => {
            let branch = else_branch.as_ref().unwrap();
            assert!(matches!(branch.node, Expr::If { .. }));
        }
        other => panic!("expected if, got {:?}", other),
    }
}

#[test]
fn test_if_statement_needs_no_semicolon() {
    let file = parse("fn f() { if true { g(); } let x = 1; }");
    let f = only_fn(&file);
    assert_eq!(f.body.node.stmts.len(), 2);
    assert!(matches!(
        f.body.node.stmts[0].node,
        Stmt::Expr { semi: false, .. }
    ));
}

#[test]
fn test_compound_assignment_and_arrays() {
    let file = parse(
        "fn f() -> [f32; 2] {\n\
         let mut scores = [0.0f32; 2];\n\
         scores[1] += 0.5;\n\
         [scores[0], scores[1]]\n\
         }",
    );
    let f = only_fn(&file);
    assert!(matches!(
        f.body.node.stmts[0].node,
        Stmt::Let { mutable: true, init: Some(Spanned { node: Expr::ArrayRepeat { .. }, .. }), .. }
    ));
    assert!(matches!(
        f.body.node.stmts[1].node,
        Stmt::Expr { expr: Spanned { node: Expr::Assign { op: Some(BinOp::Add), .. }, .. }, semi: true }
    ));
    assert!(matches!(tail(f), Expr::Array(elems) if elems.len() == 2));
}

#[test]
fn test_paths_and_casts() {
    let file = parse("fn f() -> f64 { f32::NAN as f64 }");
    match tail(only_fn(&file)) {
        Expr::Cast { expr, .. } => {
            assert!(matches!(&expr.node, Expr::Path(p) if p.0 == ["f32", "NAN"]));
        }
        other => panic!("expected cast, got {:?}", other),
    }
}

#[test]
fn test_attributes_and_use() {
    let file = parse(
        "#![allow(clippy::all)]\n\
         use std::{f32, cmp::Ordering};\n\
         #[inline(always)]\n\
         pub(crate) fn f() {}",
    );
    assert_eq!(file.attrs.len(), 1);
    assert!(file.attrs[0].node.inner);
    assert!(matches!(&file.items[0].node, Item::Use(UseTree::Path { .. })));
    match &file.items[1].node {
        Item::Fn(f) => {
            assert_eq!(f.vis, Visibility::Restricted("crate".into()));
            assert_eq!(f.attrs[0].node.path.last(), "inline");
        }
        other => panic!("expected fn, got {:?}", other),
    }
}

#[test]
fn test_missing_semicolon() {
    let err = parse_err("fn f() { let x = 1 let y = 2; }");
    assert!(err.message.contains("expected ';'"), "{}", err.message);
}

#[test]
fn test_unclosed_block() {
    let err = parse_err("fn f() { if x { 1.0 } else { 2.0 }");
    assert!(err.message.contains("end of file"), "{}", err.message);
}

#[test]
fn test_unbalanced_paren() {
    let err = parse_err("fn f() -> f32 { (1.0 + 2.0 }");
    assert!(err.message.contains("expected ')'"), "{}", err.message);
}

#[test]
fn test_chained_comparison_rejected() {
    let err = parse_err("fn f() -> bool { 1 < 2 < 3 }");
    assert!(err.message.contains("cannot be chained"));
}

#[test]
fn test_unsupported_keyword() {
    let err = parse_err("fn f() { match x {} }");
    assert!(err.message.contains("unsupported keyword `match`"));
}

#[test]
fn test_stray_closing_brace() {
    let err = parse_err("pub mod m { fn f() {} } }");
    assert!(err.message.contains("expected item"), "{}", err.message);
}

#[test]
fn test_error_span_points_at_token() {
    let source = "fn f() { let = 1; }";
    let err = parse_err(source);
    assert_eq!(&source[err.span.start as usize..err.span.end as usize], "=");
}
