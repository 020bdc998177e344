// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

use super::*;
use crate::store::btree::BTreeConfig;
use tempfile::tempdir;

fn test_db() -> (tempfile::TempDir, Database) {
    let dir = tempdir().unwrap();
    let db = Database::open(dir.path(), BTreeConfig::default()).unwrap();
    (dir, db)
}

/// Unwraps a `LineError::Recoverable` message, panicking (failing the
/// test) if the line instead turned out to be fatal.
fn recoverable_message(result: Result<bool, LineError>) -> String {
    match result {
        Err(LineError::Recoverable(message)) => message,
        Err(LineError::Fatal(err)) => panic!("expected a recoverable error, got fatal: {err}"),
        Ok(stop) => panic!("expected a recoverable error, got Ok({stop})"),
    }
}

#[test]
fn add_then_get_line_sequence() {
    let (_dir, mut db) = test_db();
    assert!(matches!(run_line(&mut db, r#"(add "foo" "bar")"#), Ok(false)));
    assert!(matches!(run_line(&mut db, r#"(get "foo")"#), Ok(false)));
}

#[test]
fn exit_requests_loop_stop() {
    let (_dir, mut db) = test_db();
    assert!(matches!(run_line(&mut db, "(exit)"), Ok(true)));
}

#[test]
fn parse_error_is_prefixed_and_recoverable() {
    let (_dir, mut db) = test_db();
    let message = recoverable_message(run_line(&mut db, ")"));
    assert!(message.starts_with("PARSE ERROR"));
}

#[test]
fn command_error_is_prefixed_and_recoverable() {
    let (_dir, mut db) = test_db();
    let message = recoverable_message(run_line(&mut db, "(frobnicate)"));
    assert!(message.starts_with("COMMAND ERROR"));
}

#[test]
fn duplicate_add_reports_entity_exists_command_error() {
    let (_dir, mut db) = test_db();
    run_line(&mut db, r#"(add "foo" "bar")"#).unwrap();
    let message = recoverable_message(run_line(&mut db, r#"(add "foo" "baz")"#));
    assert_eq!(message, "COMMAND ERROR Entity exists");
}

#[test]
fn classify_treats_command_and_parse_errors_as_recoverable() {
    assert!(matches!(
        classify(ReedError::Command {
            reason: "bad".to_string()
        }),
        LineError::Recoverable(_)
    ));
    assert!(matches!(
        classify(ReedError::Parse {
            reason: "bad".to_string()
        }),
        LineError::Recoverable(_)
    ));
}

#[test]
fn classify_treats_io_corruption_and_precondition_errors_as_fatal() {
    assert!(matches!(
        classify(ReedError::Io {
            operation: "x".to_string(),
            reason: "y".to_string()
        }),
        LineError::Fatal(_)
    ));
    assert!(matches!(
        classify(ReedError::Corruption {
            reason: "bad block".to_string()
        }),
        LineError::Fatal(_)
    ));
    assert!(matches!(
        classify(ReedError::Precondition {
            reason: "bad index".to_string()
        }),
        LineError::Fatal(_)
    ));
}
