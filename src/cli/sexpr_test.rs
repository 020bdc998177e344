// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

use super::*;

#[test]
fn parses_add_command() {
    let expr = parse(r#"(add "foo" "bar")"#).unwrap();
    assert_eq!(
        expr,
        SExpr::List(vec![
            SExpr::Symbol("add".to_string()),
            SExpr::Str("foo".to_string()),
            SExpr::Str("bar".to_string()),
        ])
    );
}

#[test]
fn parses_query_with_multiple_terms() {
    let expr = parse(r#"(query "x" "y" "z")"#).unwrap();
    assert_eq!(
        expr,
        SExpr::List(vec![
            SExpr::Symbol("query".to_string()),
            SExpr::Str("x".to_string()),
            SExpr::Str("y".to_string()),
            SExpr::Str("z".to_string()),
        ])
    );
}

#[test]
fn parses_bare_symbol_list() {
    let expr = parse("(exit)").unwrap();
    assert_eq!(expr, SExpr::List(vec![SExpr::Symbol("exit".to_string())]));
}

#[test]
fn rejects_unterminated_list() {
    let err = parse(r#"(add "foo" "bar""#).unwrap_err();
    assert!(matches!(err, ReedError::Parse { .. }));
}

#[test]
fn rejects_unexpected_close_paren() {
    let err = parse(")").unwrap_err();
    assert!(matches!(err, ReedError::Parse { .. }));
}

#[test]
fn rejects_empty_input() {
    let err = parse("").unwrap_err();
    assert!(matches!(err, ReedError::Parse { .. }));
}

#[test]
fn whitespace_inside_string_is_preserved() {
    let expr = parse(r#"(add "foo" "hello world")"#).unwrap();
    assert_eq!(
        expr,
        SExpr::List(vec![
            SExpr::Symbol("add".to_string()),
            SExpr::Str("foo".to_string()),
            SExpr::Str("hello world".to_string()),
        ])
    );
}
